//! Layered configuration loading.
//!
//! Priority, lowest first: built-in defaults, `ignition.toml` in the workspace
//! (or the file given with `--config`), `IGNITION_*` environment variables with
//! `__` separating nested keys (`IGNITION_SERVER__PORT=4000`), command-line flags.

use std::path::Path;

use figment::Figment;
use figment::providers::{Env, Format as _, Serialized, Toml};
use ignition::IgnitionConfig;

use crate::error::{CliError, Result};

pub const CONFIG_FILE: &str = "ignition.toml";
pub const ENV_PREFIX: &str = "IGNITION_";

/// Values set by command-line flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
}

/// Load and validate the configuration for `workspace`.
///
/// # Errors
///
/// Returns [`CliError::FileNotFound`] if an explicit config file is missing,
/// [`CliError::Config`] for malformed sources and
/// [`IgnitionError::InvalidConfig`](ignition::IgnitionError::InvalidConfig) for
/// values that fail validation.
pub fn load_config(
    workspace: &Path,
    config_path: Option<&Path>,
    overrides: CliOverrides,
) -> Result<IgnitionConfig> {
    let mut figment = Figment::new().merge(Serialized::defaults(IgnitionConfig::default()));

    let config_file = match config_path {
        Some(path) if !path.is_file() => return Err(CliError::FileNotFound(path.to_path_buf())),
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default_path = workspace.join(CONFIG_FILE);
            default_path.is_file().then_some(default_path)
        }
    };
    if let Some(path) = config_file {
        tracing::debug!(path = %path.display(), "loading configuration file");
        figment = figment.merge(Toml::file(path));
    }

    figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

    if let Some(port) = overrides.port {
        figment = figment.merge(Serialized::default("server.port", port));
    }

    let config: IgnitionConfig = figment.extract()?;
    config.validate()?;
    Ok(config)
}
