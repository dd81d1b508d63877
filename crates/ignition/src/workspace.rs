//! Workspace identity and workspace-relative module paths.

use std::fmt;
use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

use crate::error::{IgnitionError, Result};

/// Absolute path of one editing workspace. Key of the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WorkspaceRoot(PathBuf);

impl WorkspaceRoot {
    /// Lexically normalized workspace root.
    ///
    /// Symlinks are not resolved, so two spellings of the same directory
    /// through different links are distinct workspaces.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_absolute() {
            return Err(IgnitionError::InvalidRoot(path.to_path_buf()));
        }
        Ok(Self(path_clean::clean(path)))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for WorkspaceRoot {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for WorkspaceRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.display().fmt(f)
    }
}

/// A `/`-separated path relative to a workspace root.
///
/// Parsed from untrusted input (request URLs), so anything that could name a
/// location outside the root is rejected up front. Symlinks leading out of the
/// root are caught when the analysis engine locates the file
/// ([`AnalysisEngine::source_for_served_path`](ignition_analyzer::AnalysisEngine::source_for_served_path)).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModulePath(String);

impl ModulePath {
    /// Parse a request path: percent-decode, drop query and fragment, trim slashes.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.split(['?', '#']).next().unwrap_or_default();
        let decoded = percent_decode_str(raw)
            .decode_utf8()
            .map_err(|_| not_found(raw))?;

        if decoded.contains(['\\', '\0']) {
            return Err(not_found(&decoded));
        }

        let mut segments = Vec::new();
        for segment in decoded.split('/') {
            match segment {
                "" | "." => {}
                ".." => return Err(not_found(&decoded)),
                // `C:` drive prefixes and URL schemes
                s if segments.is_empty() && s.contains(':') => {
                    return Err(not_found(&decoded));
                }
                s => segments.push(s),
            }
        }

        if segments.is_empty() {
            return Err(not_found(&decoded));
        }
        Ok(Self(segments.join("/")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_path_buf(&self) -> PathBuf {
        self.0.split('/').collect()
    }
}

impl fmt::Display for ModulePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn not_found(path: &str) -> IgnitionError {
    IgnitionError::NotFound(path.to_string())
}
