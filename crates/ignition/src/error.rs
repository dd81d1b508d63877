//! Error types for the preview core.
//!
//! Every failure is reported as a value to the direct caller. The registry and
//! renderer add context but never swallow an error; nothing here is fatal to
//! the host process.

use std::path::PathBuf;
use std::sync::Arc;

use ignition_analyzer::AnalyzerError;
use thiserror::Error;

pub type Result<T, E = IgnitionError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum IgnitionError {
    /// The module does not exist or lies outside the workspace root.
    #[error("module not found: {0}")]
    NotFound(String),

    /// The analysis engine could not parse or transform a module.
    #[error("analysis failed: {0}")]
    Analysis(#[source] AnalyzerError),

    /// Creating the resource pair for a workspace failed.
    ///
    /// Every caller waiting on the same creation receives the same cause.
    #[error("failed to start resources for {}: {source}", .root.display())]
    Startup {
        root: PathBuf,
        #[source]
        source: Arc<IgnitionError>,
    },

    /// A component tag name is not a valid custom element name.
    #[error("invalid custom element name {tag:?}: {reason}")]
    RenderValidation { tag: String, reason: &'static str },

    #[error("workspace root must be an absolute path: {}", .0.display())]
    InvalidRoot(PathBuf),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The caller cancelled the preview request.
    #[error("preview request was cancelled")]
    Cancelled,

    #[error("server error: {0}")]
    Server(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IgnitionError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, IgnitionError::NotFound(_))
    }

    /// Wrap a creation failure so it can be shared between waiters.
    pub(crate) fn startup(root: impl Into<PathBuf>, source: Arc<IgnitionError>) -> Self {
        IgnitionError::Startup {
            root: root.into(),
            source,
        }
    }
}

impl From<AnalyzerError> for IgnitionError {
    fn from(err: AnalyzerError) -> Self {
        match err {
            AnalyzerError::NotFound(path) | AnalyzerError::OutsideRoot { path, .. } => {
                IgnitionError::NotFound(path.display().to_string())
            }
            other => IgnitionError::Analysis(other),
        }
    }
}
