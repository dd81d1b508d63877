//! Path handling shared by the commands.

use std::path::{Path, PathBuf};

use ignition::WorkspaceRoot;

use crate::error::{CliError, Result};

/// Join a relative `path` onto `cwd`.
pub fn resolve_path(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Nearest directory at or above `start_dir` holding a `package.json`.
pub fn find_package_json(start_dir: &Path) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .find(|dir| dir.join("package.json").is_file())
        .map(Path::to_path_buf)
}

/// Workspace root for a command.
///
/// An explicit `--workspace` wins. Otherwise the nearest `package.json` above
/// `source` (or above `cwd` when there is no source file) marks the root, and
/// `cwd` is the last resort.
pub fn resolve_workspace(
    explicit: Option<&Path>,
    source: Option<&Path>,
    cwd: &Path,
) -> Result<WorkspaceRoot> {
    let root = match explicit {
        Some(dir) => {
            let dir = resolve_path(dir, cwd);
            if !dir.is_dir() {
                return Err(CliError::InvalidArgument(format!(
                    "workspace is not a directory: {}",
                    dir.display()
                )));
            }
            dir
        }
        None => {
            let start = source.and_then(Path::parent).unwrap_or(cwd);
            find_package_json(start).unwrap_or_else(|| {
                tracing::debug!(cwd = %cwd.display(), "no package.json found, using working directory");
                cwd.to_path_buf()
            })
        }
    };
    Ok(WorkspaceRoot::new(root)?)
}

/// Absolute path of an existing source file.
pub fn validate_source(file: &Path, cwd: &Path) -> Result<PathBuf> {
    let path = resolve_path(file, cwd);
    if !path.is_file() {
        return Err(CliError::FileNotFound(path));
    }
    Ok(path)
}
