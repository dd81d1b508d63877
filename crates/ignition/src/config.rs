//! Configuration types.

use std::net::IpAddr;

use ignition_analyzer::ResolveConfig;
use serde::{Deserialize, Serialize};

use crate::error::{IgnitionError, Result};

/// Inspection route served next to the module prefix.
pub const INSPECT_PREFIX: &str = "/_ignition/inspect";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IgnitionConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub resolve: ResolveConfig,

    #[serde(default)]
    pub preview: PreviewConfig,
}

impl IgnitionConfig {
    /// Reject values that would only fail later, at server start or routing time.
    pub fn validate(&self) -> Result<()> {
        self.server.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    /// Listening port; an ephemeral port is chosen when unset.
    #[serde(default)]
    pub port: Option<u16>,

    /// URL path prefix under which workspace modules are served.
    #[serde(default = "default_source_prefix")]
    pub source_prefix: String,

    #[serde(default)]
    pub cors: CorsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: None,
            source_prefix: default_source_prefix(),
            cors: CorsConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.host.parse::<IpAddr>().is_err() && self.host != "localhost" {
            return Err(IgnitionError::InvalidConfig(format!(
                "server.host must be an IP address or \"localhost\", got {:?}",
                self.host
            )));
        }

        let prefix = self.source_prefix.trim_end_matches('/');
        if !prefix.starts_with('/') || prefix.len() < 2 {
            return Err(IgnitionError::InvalidConfig(format!(
                "server.source_prefix must be an absolute, non-root URL path, got {:?}",
                self.source_prefix
            )));
        }
        if prefix == INSPECT_PREFIX || INSPECT_PREFIX.starts_with(&format!("{prefix}/")) {
            return Err(IgnitionError::InvalidConfig(format!(
                "server.source_prefix {prefix:?} shadows the inspection route"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Send `Access-Control-Allow-Credentials: true`.
    ///
    /// Credentials cannot be combined with a wildcard origin, so the request
    /// origin is mirrored instead.
    #[serde(default = "default_allow_credentials")]
    pub allow_credentials: bool,

    /// `Access-Control-Max-Age` for preflight responses, in seconds.
    #[serde(default)]
    pub max_age: Option<u64>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_credentials: default_allow_credentials(),
            max_age: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Document title and page heading.
    #[serde(default = "default_title")]
    pub title: String,

    /// Width of each component container, in CSS pixels.
    #[serde(default = "default_container_width")]
    pub container_width: u32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            container_width: default_container_width(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".into()
}

fn default_source_prefix() -> String {
    "/_src".into()
}

fn default_allow_credentials() -> bool {
    true
}

fn default_title() -> String {
    "Lit Editor".into()
}

fn default_container_width() -> u32 {
    640
}
