//! Module resolution settings.

use serde::{Deserialize, Serialize};

/// Settings for resolving import specifiers of served modules.
///
/// The defaults match what a browser-targeted dev server expects: development
/// builds of packages, browser entry points, and both ESM and TypeScript
/// sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveConfig {
    /// `package.json` `exports` conditions, in priority order.
    pub export_conditions: Vec<String>,

    /// Extensions tried for extensionless specifiers.
    pub extensions: Vec<String>,

    /// `package.json` fields consulted when there is no `exports` map.
    pub main_fields: Vec<String>,
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            export_conditions: ["development", "browser", "import", "default"]
                .map(String::from)
                .to_vec(),
            extensions: [".mjs", ".js", ".ts", ".tsx", ".cjs", ".json"]
                .map(String::from)
                .to_vec(),
            main_fields: ["module", "main"].map(String::from).to_vec(),
        }
    }
}

impl ResolveConfig {
    pub(crate) fn to_resolver_options(&self) -> oxc_resolver::ResolveOptions {
        oxc_resolver::ResolveOptions {
            condition_names: self.export_conditions.clone(),
            extensions: self.extensions.clone(),
            main_fields: self.main_fields.clone(),
            // TypeScript sources import siblings by their emitted `.js` name
            extension_alias: vec![(
                ".js".into(),
                vec![".ts".into(), ".tsx".into(), ".js".into()],
            )],
            ..Default::default()
        }
    }
}
