//! Cart multi-pendulum model generation and assembly.
//!
//! Generation turns a cart mass and a chain of pendulum masses and lengths
//! into an SDF document. Assembly hands that document to an external plant
//! service, finalizes the plant, and exports its cart force input and state
//! output along with the scene graph query port.

mod assemble;
mod config;
mod document;
mod error;
mod naming;
mod params;

#[cfg(test)]
pub(crate) mod test_support;

pub use assemble::{
    AssembledSystem, CART_FORCE_PORT, ExportedPort, PlantError, QUERY_PORT, STATE_PORT, assemble,
    assemble_with,
};
pub use config::CartPendulumConfig;
pub use document::{MODEL_NAME, ModelDocument, SDF_VERSION, generate, generate_with};
pub use error::{AssembleError, BuildStage, GenerateError};
pub use naming::plant_name;
pub use params::{CartPendulumParams, PendulumSpec};
