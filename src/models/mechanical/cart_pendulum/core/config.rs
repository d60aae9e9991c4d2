use uom::si::{
    f64::{Length, Time},
    length::meter,
};

use crate::support::constraint::{Constrained, NonNegative, StrictlyPositive};

/// Configuration for generating and assembling a cart pendulum system.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartPendulumConfig {
    /// Plant time step. Zero requests continuous dynamics.
    pub time_step: Constrained<Time, NonNegative>,

    /// Pendulum rod radius.
    ///
    /// Sets the rod visual radius, the rod's axial inertia, and the lateral
    /// stagger between successive pendulums (two radii).
    pub rod_radius: Constrained<Length, StrictlyPositive>,
}

impl Default for CartPendulumConfig {
    fn default() -> Self {
        Self {
            time_step: NonNegative::zero(),
            rod_radius: Constrained::new_unchecked(Length::new::<meter>(0.02)),
        }
    }
}
