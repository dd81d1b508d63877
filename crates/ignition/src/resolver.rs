//! Module resolver: source file -> exported components and served path.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use ignition_analyzer::{AnalysisEngine, CustomElementExport};
use tracing::debug;

use crate::error::Result;

/// One exported custom element definition.
pub type ComponentExport = CustomElementExport;

/// A module resolved in one analysis pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedModule {
    /// Root-relative, `/`-separated served path.
    pub js_path: String,
    pub exports: Vec<ComponentExport>,
}

impl ResolvedModule {
    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.exports.iter().map(|export| export.tag_name.as_str())
    }
}

/// Resolves modules of one workspace through its analysis engine.
///
/// Nothing is cached: each call reflects the module as it is on disk now.
/// Callers that need a consistent view of the served path and the exports
/// should use [`ModuleResolver::resolve`].
#[derive(Clone)]
pub struct ModuleResolver {
    engine: Arc<dyn AnalysisEngine>,
}

impl ModuleResolver {
    pub fn new(engine: Arc<dyn AnalysisEngine>) -> Self {
        Self { engine }
    }

    pub fn root(&self) -> &Path {
        self.engine.root()
    }

    pub fn engine(&self) -> &Arc<dyn AnalysisEngine> {
        &self.engine
    }

    /// Served path and exports of `path`, from a single analysis.
    pub async fn resolve(&self, path: &Path) -> Result<ResolvedModule> {
        let module = self.engine.get_module(path).await?;
        debug!(
            module = %path.display(),
            js_path = %module.js_path,
            exports = module.custom_element_exports().len(),
            "resolved module"
        );

        let js_path = module.js_path.clone();
        Ok(ResolvedModule {
            js_path,
            exports: module.into_custom_element_exports(),
        })
    }

    /// Exported components of `path`, in discovery order.
    pub async fn resolve_exports(&self, path: &Path) -> Result<Vec<ComponentExport>> {
        Ok(self.resolve(path).await?.exports)
    }

    /// Path at which the browser-loadable form of `path` is served.
    pub async fn js_path(&self, path: &Path) -> Result<String> {
        Ok(self.resolve(path).await?.js_path)
    }
}

impl fmt::Debug for ModuleResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleResolver")
            .field("root", &self.engine.root())
            .finish()
    }
}
