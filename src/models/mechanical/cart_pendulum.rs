//! Cart with a chain of serially connected pendulum bars.
//!
//! [`CartMultiPendulum`] is the [`twine_core::Model`] adapter: given
//! [`CartPendulumParams`] it generates an SDF document, loads it into a plant
//! created by the wrapped [`PlantBuilder`], and returns the finalized
//! [`AssembledSystem`]. The generation and assembly steps are also exposed
//! directly as [`generate`] and [`assemble`].
//!
//! ```
//! use cart_pendulum_models::models::mechanical::cart_pendulum::{
//!     CartPendulumParams, generate, plant_name,
//! };
//! use uom::si::{f64::Mass, mass::kilogram};
//!
//! let params = CartPendulumParams::from_flat_args(
//!     Mass::new::<kilogram>(1.0),
//!     [("m1", 1.0), ("l1", 1.0), ("m2", 0.5), ("l2", 0.5)],
//! )
//! .unwrap();
//!
//! let document = generate(&params).unwrap();
//! assert_eq!(document.num_pendulums(), 2);
//! assert!(document.as_str().contains(r#"<joint name="joint2" type="continuous">"#));
//! assert_eq!(plant_name(document.num_pendulums()), "CartDoublePendulum");
//! ```

pub(crate) mod core;

pub use self::core::{
    AssembleError, AssembledSystem, BuildStage, CART_FORCE_PORT, CartPendulumConfig,
    CartPendulumParams, ExportedPort, GenerateError, MODEL_NAME, ModelDocument, PendulumSpec,
    PlantError, QUERY_PORT, SDF_VERSION, STATE_PORT, assemble, assemble_with, generate,
    generate_with, plant_name,
};

use twine_core::Model;

use crate::support::{color::LinearSegmentedColorMap, plant::PlantBuilder};

/// Builds cart pendulum systems on a given plant service.
#[derive(Debug, Clone)]
pub struct CartMultiPendulum<B> {
    builder: B,
    config: CartPendulumConfig,
    color_map: LinearSegmentedColorMap,
}

impl<B: PlantBuilder> CartMultiPendulum<B> {
    /// Creates a model using the default configuration and rod colors.
    #[must_use]
    pub fn new(builder: B) -> Self {
        Self::with_config(builder, CartPendulumConfig::default())
    }

    /// Creates a model with an explicit time step and rod radius.
    #[must_use]
    pub fn with_config(builder: B, config: CartPendulumConfig) -> Self {
        Self {
            builder,
            config,
            color_map: LinearSegmentedColorMap::red_green_blue(),
        }
    }

    /// Replaces the map used to tint pendulum rods.
    #[must_use]
    pub fn with_color_map(mut self, color_map: LinearSegmentedColorMap) -> Self {
        self.color_map = color_map;
        self
    }

    #[must_use]
    pub fn config(&self) -> &CartPendulumConfig {
        &self.config
    }
}

impl<B: PlantBuilder> Model for CartMultiPendulum<B> {
    type Input = CartPendulumParams;
    type Output = AssembledSystem<B::Plant>;
    type Error = AssembleError<PlantError<B>>;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        assemble_with(&self.builder, input, &self.config, &self.color_map)
    }
}
