//! Color maps for tinting generated geometry.
//!
//! A [`ColorMap`] turns a normalized position in `[0, 1]` into an [`Rgba`] color.
//! The provided [`LinearSegmentedColorMap`] interpolates linearly between
//! equally spaced anchor colors and quantizes the result into a lookup table,
//! so nearby positions may map to the same entry.
//!
//! ```
//! use cart_pendulum_models::support::{
//!     color::{ColorMap, LinearSegmentedColorMap, Rgba},
//!     constraint::UnitInterval,
//! };
//!
//! let cmap = LinearSegmentedColorMap::red_green_blue();
//! assert_eq!(cmap.sample(UnitInterval::zero()), Rgba::opaque(1.0, 0.0, 0.0));
//! assert_eq!(cmap.sample(UnitInterval::one()), Rgba::opaque(0.0, 0.0, 1.0));
//! ```

use std::fmt;

use thiserror::Error;

use crate::support::constraint::{Constrained, UnitInterval};

/// Default number of lookup table entries.
pub const DEFAULT_LUT_SIZE: usize = 256;

/// A color with red, green, blue, and alpha channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Rgba {
    /// Creates a fully opaque color.
    #[must_use]
    pub const fn opaque(red: f64, green: f64, blue: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 1.0,
        }
    }
}

/// Formats the color as four space-separated channels (`"r g b a"`).
impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.red, self.green, self.blue, self.alpha)
    }
}

/// Maps a normalized position to a color.
pub trait ColorMap {
    /// Returns the color at `position`.
    fn sample(&self, position: Constrained<f64, UnitInterval>) -> Rgba;
}

/// Errors that can occur when defining a [`LinearSegmentedColorMap`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ColorMapError {
    #[error("a linear segmented color map needs at least 2 anchor colors, got {count}")]
    TooFewColors { count: usize },
    #[error("lookup table needs at least 2 entries, got {size}")]
    LutTooSmall { size: usize },
}

/// Piecewise linear color map over equally spaced anchor colors.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSegmentedColorMap {
    lut: Vec<Rgba>,
}

impl LinearSegmentedColorMap {
    /// Creates a map interpolating through `colors` with a `lut_size`-entry table.
    ///
    /// # Errors
    ///
    /// Returns a [`ColorMapError`] if fewer than two colors or table entries are given.
    pub fn from_colors(colors: &[Rgba], lut_size: usize) -> Result<Self, ColorMapError> {
        if colors.len() < 2 {
            return Err(ColorMapError::TooFewColors {
                count: colors.len(),
            });
        }
        if lut_size < 2 {
            return Err(ColorMapError::LutTooSmall { size: lut_size });
        }
        Ok(Self {
            lut: build_lut(colors, lut_size),
        })
    }

    /// The red → green → blue map used for pendulum rods.
    #[must_use]
    pub fn red_green_blue() -> Self {
        let colors = [
            Rgba::opaque(1.0, 0.0, 0.0),
            Rgba::opaque(0.0, 1.0, 0.0),
            Rgba::opaque(0.0, 0.0, 1.0),
        ];
        Self {
            lut: build_lut(&colors, DEFAULT_LUT_SIZE),
        }
    }

    /// Number of entries in the lookup table.
    #[must_use]
    pub fn lut_size(&self) -> usize {
        self.lut.len()
    }
}

impl Default for LinearSegmentedColorMap {
    fn default() -> Self {
        Self::red_green_blue()
    }
}

impl ColorMap for LinearSegmentedColorMap {
    fn sample(&self, position: Constrained<f64, UnitInterval>) -> Rgba {
        let n = self.lut.len();
        // Position 1 lands on the last entry rather than one past it.
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            clippy::cast_precision_loss
        )]
        let index = ((position.into_inner() * n as f64) as usize).min(n - 1);
        self.lut[index]
    }
}

/// Builds the quantized table; entry `k` is the interpolation at `k / (size - 1)`.
#[allow(clippy::cast_precision_loss)]
fn build_lut(colors: &[Rgba], size: usize) -> Vec<Rgba> {
    let last = (size - 1) as f64;
    let segments = (colors.len() - 1) as f64;
    let anchors: Vec<f64> = (0..colors.len())
        .map(|i| i as f64 / segments * last)
        .collect();

    let channel = |k: usize, get: fn(&Rgba) -> f64| -> f64 {
        let x = k as f64;
        let upper = anchors
            .iter()
            .position(|&a| a >= x)
            .unwrap_or(anchors.len() - 1)
            .max(1);
        let (x0, x1) = (anchors[upper - 1], anchors[upper]);
        let (y0, y1) = (get(&colors[upper - 1]), get(&colors[upper]));
        let distance = (x - x0) / (x1 - x0);
        (distance * (y1 - y0) + y0).clamp(0.0, 1.0)
    };

    (0..size)
        .map(|k| Rgba {
            red: channel(k, |c| c.red),
            green: channel(k, |c| c.green),
            blue: channel(k, |c| c.blue),
            alpha: channel(k, |c| c.alpha),
        })
        .collect()
}
