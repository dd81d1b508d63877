//! Error handling for the Ignition CLI.
//!
//! [`CliError`] wraps the library errors with `#[from]` conversions so command
//! implementations can use `?` throughout. `main` turns it into a `miette`
//! report with [`cli_error_to_miette`].

use std::path::PathBuf;

use ignition::IgnitionError;
use miette::Report;
use thiserror::Error;

pub type Result<T, E = CliError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Ignition(#[from] IgnitionError),

    /// Layered configuration could not be extracted.
    #[error("Configuration error: {0}")]
    Config(#[from] Box<figment::Error>),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        CliError::Config(Box::new(err))
    }
}

/// Convert a [`CliError`] into a report with a hint where one helps.
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Ignition(IgnitionError::NotFound(module)) => miette::miette!(
            "Module not found: {}\n\nHint: the file must exist inside the workspace (see --workspace)",
            module
        ),
        CliError::Ignition(IgnitionError::RenderValidation { tag, reason }) => miette::miette!(
            "Cannot preview element {:?}: {}\n\nHint: custom element names are lowercase and contain a hyphen",
            tag,
            reason
        ),
        CliError::Ignition(err @ IgnitionError::Startup { .. }) => {
            miette::miette!("{}\n\nHint: check --port and that the workspace directory exists", err)
        }
        CliError::Config(e) => miette::miette!(
            "Configuration error: {}\n\nHint: check ignition.toml and IGNITION_* environment variables",
            e
        ),
        _ => miette::miette!("{}", err),
    }
}
