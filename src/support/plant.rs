//! Interfaces to an external multibody plant and scene graph service.
//!
//! The dynamics solver, geometry engine, and model-document parser live
//! outside this crate. Models reach them only through these traits, so any
//! backend (or a test double) can stand in.
//!
//! A [`PlantBuilder`] creates an empty [`Plant`] paired with a scene graph.
//! The plant then loads documents, is finalized once, and exposes named ports.

use std::{error::Error as StdError, fmt};

use uom::si::f64::Time;

use crate::support::constraint::{Constrained, NonNegative};

/// Markup schema of a model document handed to a plant parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    Sdf,
}

impl DocumentFormat {
    /// The schema tag the parser expects (e.g. `"sdf"`).
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            DocumentFormat::Sdf => "sdf",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// The value carried by a port.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortKind {
    /// A fixed-size vector of reals.
    Vector { size: usize },
    /// An opaque value, such as a geometry query object.
    Abstract,
}

/// A port owned by a plant or its scene graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortDescriptor {
    pub name: String,
    pub kind: PortKind,
}

impl PortDescriptor {
    #[must_use]
    pub fn vector(name: impl Into<String>, size: usize) -> Self {
        Self {
            name: name.into(),
            kind: PortKind::Vector { size },
        }
    }

    #[must_use]
    pub fn abstract_value(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: PortKind::Abstract,
        }
    }

    /// Returns the vector size, or `None` for abstract ports.
    #[must_use]
    pub fn size(&self) -> Option<usize> {
        match self.kind {
            PortKind::Vector { size } => Some(size),
            PortKind::Abstract => None,
        }
    }
}

/// A multibody plant paired with a scene graph.
pub trait Plant {
    type Error: StdError + Send + Sync + 'static;

    /// Parses `document` and adds its models to the plant and scene graph.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is malformed or the plant is finalized.
    fn add_models_from_string(
        &mut self,
        document: &str,
        format: DocumentFormat,
    ) -> Result<(), Self::Error>;

    /// Locks the plant topology; no bodies or joints may be added afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the topology is invalid or already finalized.
    fn finalize(&mut self) -> Result<(), Self::Error>;

    /// Looks up a plant input port by name.
    ///
    /// # Errors
    ///
    /// Returns an error if no such port exists.
    fn input_port(&self, name: &str) -> Result<PortDescriptor, Self::Error>;

    /// Looks up a plant output port by name.
    ///
    /// # Errors
    ///
    /// Returns an error if no such port exists.
    fn output_port(&self, name: &str) -> Result<PortDescriptor, Self::Error>;

    /// The scene graph's geometry query output.
    fn query_output_port(&self) -> PortDescriptor;

    fn set_name(&mut self, name: &str);
}

/// Factory for plant and scene graph pairs.
pub trait PlantBuilder {
    type Plant: Plant;

    /// Creates an empty plant with the given discrete time step.
    ///
    /// A zero time step requests continuous (non-integrated) dynamics.
    ///
    /// # Errors
    ///
    /// Returns an error if the service cannot create a plant.
    fn create(
        &self,
        time_step: Constrained<Time, NonNegative>,
    ) -> Result<Self::Plant, <Self::Plant as Plant>::Error>;
}
