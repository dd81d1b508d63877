//! Analysis engine trait and the package analyzer implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::emit::{SpecifierRewriter, compile_script, content_type_for, is_script};
use crate::error::{AnalyzerError, Result};
use crate::extract::extract_custom_elements;
use crate::module::{EmittedModule, Module};
use crate::options::ResolveConfig;
use crate::paths::JsPathMapper;

/// Static analysis for one workspace root.
///
/// Implementations must be safe to call concurrently; every call reflects the
/// current on-disk content.
#[async_trait]
pub trait AnalysisEngine: Send + Sync {
    /// Canonical workspace root this engine is scoped to.
    fn root(&self) -> &Path;

    /// Analyze a module given as an absolute or root-relative path.
    async fn get_module(&self, path: &Path) -> Result<Module>;

    /// Absolute path of the source file behind a root-relative served path.
    async fn source_for_served_path(&self, served: &str) -> Option<PathBuf>;

    /// Browser-loadable bytes for a file inside the root.
    ///
    /// `prefix` is the URL path under which the server exposes the root; it is
    /// used to rewrite import specifiers.
    async fn emit(&self, source: &Path, prefix: &str) -> Result<EmittedModule>;
}

/// Analysis engine for a JavaScript/TypeScript package on disk.
pub struct PackageAnalyzer {
    root: PathBuf,
    paths: JsPathMapper,
    resolver: oxc_resolver::Resolver,
}

impl std::fmt::Debug for PackageAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackageAnalyzer")
            .field("root", &self.root)
            .field("paths", &self.paths)
            .finish_non_exhaustive()
    }
}

impl PackageAnalyzer {
    /// Create an analyzer for the package rooted at `root`.
    ///
    /// Reads `tsconfig.json` (if any) to learn where TypeScript output lives.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::NotFound`] if `root` does not exist.
    pub async fn load(root: impl AsRef<Path>, config: &ResolveConfig) -> Result<Self> {
        let root = root.as_ref();
        let root = tokio::fs::canonicalize(root)
            .await
            .map_err(|e| AnalyzerError::io(root, e))?;

        let tsconfig_path = root.join("tsconfig.json");
        let paths = match tokio::fs::read_to_string(&tsconfig_path).await {
            Ok(content) => JsPathMapper::from_tsconfig(&content).unwrap_or_else(|error| {
                warn!(
                    path = %tsconfig_path.display(),
                    %error,
                    "ignoring tsconfig.json that is not plain JSON"
                );
                JsPathMapper::new()
            }),
            Err(_) => JsPathMapper::new(),
        };

        debug!(root = %root.display(), ?paths, "package analyzer ready");

        Ok(Self {
            resolver: oxc_resolver::Resolver::new(config.to_resolver_options()),
            root,
            paths,
        })
    }

    /// Canonical absolute path and root-relative path of a file inside the root.
    async fn locate(&self, path: &Path) -> Result<(PathBuf, PathBuf)> {
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };

        let absolute = tokio::fs::canonicalize(&joined)
            .await
            .map_err(|e| AnalyzerError::io(path, e))?;
        let relative = absolute
            .strip_prefix(&self.root)
            .map_err(|_| AnalyzerError::OutsideRoot {
                path: path.to_path_buf(),
                root: self.root.clone(),
            })?
            .to_path_buf();

        let metadata = tokio::fs::metadata(&absolute)
            .await
            .map_err(|e| AnalyzerError::io(path, e))?;
        if !metadata.is_file() {
            return Err(AnalyzerError::NotFound(path.to_path_buf()));
        }

        Ok((absolute, relative))
    }

    pub fn paths(&self) -> &JsPathMapper {
        &self.paths
    }
}

#[async_trait]
impl AnalysisEngine for PackageAnalyzer {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn get_module(&self, path: &Path) -> Result<Module> {
        let (absolute, relative) = self.locate(path).await?;
        let source = tokio::fs::read_to_string(&absolute)
            .await
            .map_err(|e| AnalyzerError::io(&absolute, e))?;

        let exports = extract_custom_elements(&absolute, &source)?;
        let js_path = self.paths.js_path(&relative);
        debug!(
            module = %relative.display(),
            js_path,
            elements = exports.len(),
            "analyzed module"
        );

        Ok(Module::new(relative, js_path, exports))
    }

    async fn source_for_served_path(&self, served: &str) -> Option<PathBuf> {
        for candidate in self.paths.source_candidates(served) {
            match self.locate(&candidate).await {
                Ok((absolute, _)) => return Some(absolute),
                Err(AnalyzerError::OutsideRoot { path, .. }) => {
                    warn!(path = %path.display(), "refusing to serve path outside the root");
                    return None;
                }
                Err(_) => continue,
            }
        }
        None
    }

    async fn emit(&self, source: &Path, prefix: &str) -> Result<EmittedModule> {
        let (absolute, _) = self.locate(source).await?;
        let bytes = tokio::fs::read(&absolute)
            .await
            .map_err(|e| AnalyzerError::io(&absolute, e))?;

        if !is_script(&absolute) {
            return Ok(EmittedModule {
                content_type: content_type_for(&absolute),
                source_path: absolute,
                body: bytes,
            });
        }

        let text = String::from_utf8_lossy(&bytes);
        let compiled = compile_script(&absolute, &text)?;
        let rewriter = SpecifierRewriter {
            resolver: &self.resolver,
            paths: &self.paths,
            root: &self.root,
            prefix: prefix.trim_end_matches('/'),
        };
        let body = rewriter.rewrite(&absolute, &compiled).into_bytes();

        Ok(EmittedModule {
            source_path: absolute,
            content_type: "application/javascript",
            body,
        })
    }
}
