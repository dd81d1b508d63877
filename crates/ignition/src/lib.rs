//! Live preview of custom element sources.
//!
//! For every workspace, a [`WorkspaceRegistry`] keeps one [`ResourcePair`]: an
//! [`AssetServer`] that serves the workspace's modules to the browser and a
//! [`ModuleResolver`] that finds the custom elements a source file exports.
//! [`render`] turns a resolved module into a preview document, and
//! [`open_preview`] ties the steps together.
//!
//! # Example
//!
//! ```rust,no_run
//! use ignition::{
//!     CancelSignal, IgnitionConfig, PreviewRequest, WorkspaceRegistry, WorkspaceRoot,
//!     open_preview,
//! };
//!
//! # async fn example() -> ignition::Result<()> {
//! let config = IgnitionConfig::default();
//! let registry = WorkspaceRegistry::with_config(config.clone());
//!
//! let request = PreviewRequest {
//!     workspace: WorkspaceRoot::new("/project")?,
//!     document: "src/my-element.ts".into(),
//! };
//! let preview = open_preview(&registry, &request, &config.preview, &CancelSignal::new()).await?;
//! println!("{}", preview.html);
//!
//! registry.shutdown_all().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod preview;
pub mod registry;
pub mod resolver;
pub mod server;
pub mod session;
pub mod workspace;

#[cfg(test)]
mod testing;

pub use config::{CorsConfig, IgnitionConfig, PreviewConfig, ServerConfig};
pub use error::{IgnitionError, Result};
pub use preview::{PreviewContext, TagName, render};
pub use registry::{AnalyzerServerFactory, ResourceFactory, ResourcePair, WorkspaceRegistry};
pub use resolver::{ComponentExport, ModuleResolver, ResolvedModule};
pub use server::{AssetServer, ServedAddress};
pub use session::{CancelSignal, PreviewDocument, PreviewRequest, open_preview};
pub use workspace::{ModulePath, WorkspaceRoot};

pub use ignition_analyzer::ResolveConfig;
