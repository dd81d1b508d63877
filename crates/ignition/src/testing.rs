//! In-memory analysis engine for unit tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use ignition_analyzer::{
    AnalysisEngine, AnalyzerError, CustomElementExport, EmittedModule, Module,
};
use parking_lot::Mutex;

pub(crate) type CallLog = Arc<Mutex<Vec<String>>>;

struct FakeModule {
    js_path: String,
    tags: Vec<String>,
    broken: bool,
}

/// Engine with a fixed module table, recording every lookup and emit.
pub(crate) struct FakeEngine {
    root: PathBuf,
    modules: HashMap<PathBuf, FakeModule>,
    lookups: CallLog,
    emits: CallLog,
}

impl FakeEngine {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            modules: HashMap::new(),
            lookups: CallLog::default(),
            emits: CallLog::default(),
        }
    }

    pub fn with_module(mut self, source: &str, js_path: &str, tags: &[&str]) -> Self {
        self.modules.insert(
            PathBuf::from(source),
            FakeModule {
                js_path: js_path.to_string(),
                tags: tags.iter().map(|t| t.to_string()).collect(),
                broken: false,
            },
        );
        self
    }

    pub fn with_broken_module(mut self, source: &str, js_path: &str) -> Self {
        self.modules.insert(
            PathBuf::from(source),
            FakeModule {
                js_path: js_path.to_string(),
                tags: Vec::new(),
                broken: true,
            },
        );
        self
    }

    pub fn lookup_log(&self) -> CallLog {
        self.lookups.clone()
    }

    pub fn emit_log(&self) -> CallLog {
        self.emits.clone()
    }

    fn find(&self, path: &Path) -> Result<(&Path, &FakeModule), AnalyzerError> {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        self.modules
            .get_key_value(relative)
            .map(|(path, module)| (path.as_path(), module))
            .ok_or_else(|| AnalyzerError::NotFound(path.to_path_buf()))
    }
}

fn broken(path: &Path) -> AnalyzerError {
    AnalyzerError::Parse {
        path: path.to_path_buf(),
        messages: vec!["Unexpected token".into()],
    }
}

#[async_trait]
impl AnalysisEngine for FakeEngine {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn get_module(&self, path: &Path) -> Result<Module, AnalyzerError> {
        let (source, module) = self.find(path)?;
        if module.broken {
            return Err(broken(source));
        }
        let exports = module
            .tags
            .iter()
            .map(|tag| CustomElementExport::new(tag.as_str(), "Element"))
            .collect();
        Ok(Module::new(
            source.to_path_buf(),
            module.js_path.clone(),
            exports,
        ))
    }

    async fn source_for_served_path(&self, served: &str) -> Option<PathBuf> {
        self.lookups.lock().push(served.to_string());
        self.modules
            .iter()
            .find(|(_, module)| module.js_path == served)
            .map(|(source, _)| self.root.join(source))
    }

    async fn emit(&self, source: &Path, prefix: &str) -> Result<EmittedModule, AnalyzerError> {
        let (relative, module) = self.find(source)?;
        self.emits.lock().push(relative.display().to_string());
        if module.broken {
            return Err(broken(relative));
        }
        Ok(EmittedModule {
            source_path: self.root.join(relative),
            content_type: "application/javascript",
            body: format!("// {} via {}\n", relative.display(), prefix).into_bytes(),
        })
    }
}
