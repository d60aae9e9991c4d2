use std::fmt;

use thiserror::Error;

use crate::support::sdf::SdfError;

/// Errors that can occur while generating a model document.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// A required `m{i}` or `l{i}` argument was not supplied.
    #[error("missing argument '{key}'")]
    MissingArgument {
        /// The first missing key encountered while probing indices.
        key: String,
    },

    /// The same `m{i}` or `l{i}` argument was supplied more than once.
    #[error("duplicate argument '{key}'")]
    DuplicateArgument { key: String },

    /// The element tree could not be written out.
    #[error("failed to serialize model document")]
    Serialize(#[from] SdfError),
}

/// The plant construction step that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    CreatePlant,
    Parse,
    Finalize,
    ExportPorts,
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BuildStage::CreatePlant => "plant creation",
            BuildStage::Parse => "document parsing",
            BuildStage::Finalize => "finalization",
            BuildStage::ExportPorts => "port export",
        })
    }
}

/// Errors that can occur while assembling a cart pendulum system.
///
/// `E` is the plant service's error type, kept intact as the error source.
#[derive(Debug, Error)]
pub enum AssembleError<E> {
    /// Document generation failed.
    #[error(transparent)]
    Generate(#[from] GenerateError),

    /// The plant service rejected a construction step.
    #[error("plant construction failed during {stage}")]
    Build {
        stage: BuildStage,
        #[source]
        source: E,
    },
}

impl<E> AssembleError<E> {
    /// Returns a closure wrapping a plant error raised during `stage`.
    pub(super) fn at(stage: BuildStage) -> impl FnOnce(E) -> Self {
        move |source| Self::Build { stage, source }
    }
}
