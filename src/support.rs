//! Crate-level supporting utilities.
//!
//! - [`constraint`]: Type-level numeric constraints.
//! - [`color`]: Color maps used to tint generated geometry.
//! - [`sdf`]: A small element tree for building model documents.
//! - [`plant`]: Interfaces to the multibody plant and scene graph service.

pub mod color;
pub mod constraint;
pub mod plant;
pub mod sdf;
