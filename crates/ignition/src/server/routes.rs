//! Request routing, independent of the HTTP transport.

use crate::config::INSPECT_PREFIX;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Serve the module at this (still percent-encoded) workspace-relative path.
    Source(String),
    /// Describe how this path resolves, for debugging.
    Inspect(String),
    Fallback,
}

/// Maps request paths to [`Route`]s by literal prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    source_prefix: String,
    inspect_prefix: String,
}

impl RouteTable {
    /// `source_prefix` is normalized to have no trailing slash.
    pub fn new(source_prefix: &str) -> Self {
        Self {
            source_prefix: source_prefix.trim_end_matches('/').to_string(),
            inspect_prefix: INSPECT_PREFIX.to_string(),
        }
    }

    pub fn source_prefix(&self) -> &str {
        &self.source_prefix
    }

    pub fn route(&self, path: &str) -> Route {
        if let Some(rest) = strip_segment_prefix(path, &self.source_prefix) {
            return Route::Source(rest.to_string());
        }
        if let Some(rest) = strip_segment_prefix(path, &self.inspect_prefix) {
            return Route::Inspect(rest.to_string());
        }
        Route::Fallback
    }
}

/// `path` minus `prefix` and the following `/`, if `prefix` is a whole-segment prefix.
fn strip_segment_prefix<'p>(path: &'p str, prefix: &str) -> Option<&'p str> {
    let rest = path.strip_prefix(prefix)?;
    if rest.is_empty() {
        Some(rest)
    } else {
        rest.strip_prefix('/')
    }
}
