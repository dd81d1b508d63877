//! Analysis results.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One exported custom element definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomElementExport {
    /// The element name used in markup, e.g. `my-element`.
    #[serde(rename = "tagname")]
    pub tag_name: String,

    /// Local name of the defining class, if it has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,

    /// Name under which the class is exported (`default` for default exports).
    pub export_name: String,

    /// Source text of the `extends` clause.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub super_class: Option<String>,

    /// Free text of the class's JSDoc block.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Text of the `@summary` JSDoc tag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl CustomElementExport {
    /// Create an export with only a tag name and export name.
    pub fn new(tag_name: impl Into<String>, export_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            class_name: None,
            export_name: export_name.into(),
            super_class: None,
            description: None,
            summary: None,
        }
    }
}

/// An analyzed source module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    /// Source path relative to the workspace root.
    pub source_path: PathBuf,

    /// Root-relative, `/`-separated path of the browser-loadable module.
    pub js_path: String,

    custom_element_exports: Vec<CustomElementExport>,
}

impl Module {
    pub fn new(
        source_path: PathBuf,
        js_path: String,
        custom_element_exports: Vec<CustomElementExport>,
    ) -> Self {
        Self {
            source_path,
            js_path,
            custom_element_exports,
        }
    }

    /// Exported custom elements, in source order.
    pub fn custom_element_exports(&self) -> &[CustomElementExport] {
        &self.custom_element_exports
    }

    pub fn into_custom_element_exports(self) -> Vec<CustomElementExport> {
        self.custom_element_exports
    }
}

/// Bytes ready to be served to a browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedModule {
    /// Absolute path of the file the bytes were produced from.
    pub source_path: PathBuf,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_serializes_tagname_key() {
        let export = CustomElementExport::new("x-foo", "XFoo");
        let json = serde_json::to_value(&export).unwrap();

        assert_eq!(json["tagname"], "x-foo");
        assert_eq!(json["exportName"], "XFoo");
        assert!(json.get("description").is_none());
    }

    #[test]
    fn module_exposes_exports_in_order() {
        let module = Module::new(
            PathBuf::from("src/els.ts"),
            "src/els.js".to_string(),
            vec![
                CustomElementExport::new("x-foo", "XFoo"),
                CustomElementExport::new("x-bar", "XBar"),
            ],
        );

        let tags: Vec<_> = module
            .custom_element_exports()
            .iter()
            .map(|e| e.tag_name.as_str())
            .collect();
        assert_eq!(tags, ["x-foo", "x-bar"]);
    }
}
