//! Error types for module analysis and emission.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = AnalyzerError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// The requested file does not exist (or is not a regular file).
    #[error("module not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The requested file exists but resolves outside the analyzer's root.
    #[error("{} is outside of the workspace root {}", .path.display(), .root.display())]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("failed to parse {}: {}", .path.display(), .messages.join("; "))]
    Parse { path: PathBuf, messages: Vec<String> },

    #[error("failed to transform {}: {}", .path.display(), .messages.join("; "))]
    Transform { path: PathBuf, messages: Vec<String> },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AnalyzerError {
    /// Map an I/O error for `path`, turning `NotFound` into [`AnalyzerError::NotFound`].
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            AnalyzerError::NotFound(path)
        } else {
            AnalyzerError::Io { path, source }
        }
    }

    /// Whether this error means "there is no such module in this workspace".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AnalyzerError::NotFound(_) | AnalyzerError::OutsideRoot { .. }
        )
    }
}
