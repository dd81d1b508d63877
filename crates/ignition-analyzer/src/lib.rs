//! Static analysis of custom element packages.
//!
//! This crate answers two questions about a JavaScript/TypeScript source file
//! that lives inside a workspace:
//!
//! - Which custom elements does it export? ([`AnalysisEngine::get_module`])
//! - What does the browser-loadable version of it look like?
//!   ([`AnalysisEngine::emit`])
//!
//! Parsing, transforming and module resolution are delegated to the OXC
//! toolchain. [`PackageAnalyzer`] is the production engine; other engines can
//! be plugged in through the [`AnalysisEngine`] trait.
//!
//! # Example
//!
//! ```rust,no_run
//! use ignition_analyzer::{AnalysisEngine, PackageAnalyzer, ResolveConfig};
//!
//! # async fn example() -> ignition_analyzer::Result<()> {
//! let analyzer = PackageAnalyzer::load("/project", &ResolveConfig::default()).await?;
//! let module = analyzer.get_module("src/my-element.ts".as_ref()).await?;
//!
//! assert_eq!(module.js_path, "src/my-element.js");
//! for element in module.custom_element_exports() {
//!     println!("<{}>", element.tag_name);
//! }
//! # Ok(())
//! # }
//! ```

mod emit;
mod engine;
mod error;
mod extract;
mod module;
mod options;
mod paths;

pub use emit::content_type_for;
pub use engine::{AnalysisEngine, PackageAnalyzer};
pub use error::{AnalyzerError, Result};
pub use module::{CustomElementExport, EmittedModule, Module};
pub use options::ResolveConfig;
pub use paths::{JsPathMapper, to_slash, url_path};
