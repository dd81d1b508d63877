//! The "preview this file" operation.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{debug, info};

use crate::config::PreviewConfig;
use crate::error::{IgnitionError, Result};
use crate::preview::{PreviewContext, render};
use crate::registry::WorkspaceRegistry;
use crate::server::ServedAddress;
use crate::workspace::WorkspaceRoot;

/// Cancellation flag shared between the host and a preview request.
///
/// Cancelling only stops the request that observes it; shared workspace
/// resources are never torn down.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal(Arc<AtomicBool>);

impl CancelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(IgnitionError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewRequest {
    pub workspace: WorkspaceRoot,
    /// Document to preview, absolute or relative to the workspace.
    pub document: PathBuf,
}

/// A rendered preview, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewDocument {
    pub html: String,
    pub module_url: String,
    pub tags: Vec<String>,
    pub address: ServedAddress,
}

/// Acquire the workspace's resources, resolve the document and render its preview.
pub async fn open_preview(
    registry: &WorkspaceRegistry,
    request: &PreviewRequest,
    config: &PreviewConfig,
    cancel: &CancelSignal,
) -> Result<PreviewDocument> {
    cancel.check()?;
    let pair = registry.acquire(&request.workspace).await?;
    cancel.check()?;

    let resolved = pair.resolver.resolve(&request.document).await?;
    cancel.check()?;

    let module_url = pair.server.module_url(&resolved.js_path);
    let context = PreviewContext {
        title: config.title.clone(),
        source_path: display_path(&request.document, request.workspace.as_path()),
        js_path: resolved.js_path.clone(),
        server_root: pair.server.root().to_string(),
        workspace: request.workspace.to_string(),
        address: pair.address().to_string(),
        container_width: config.container_width,
    };
    let html = render(&module_url, &resolved.exports, &context)?;
    debug!(bytes = html.len(), "rendered preview");

    let tags: Vec<String> = resolved.tag_names().map(str::to_string).collect();
    info!(document = %context.source_path, url = %module_url, elements = tags.len(), "preview ready");

    Ok(PreviewDocument {
        html,
        module_url,
        tags,
        address: pair.address(),
    })
}

/// `document` relative to `root` when it lies inside it.
fn display_path(document: &Path, root: &Path) -> String {
    document
        .strip_prefix(root)
        .unwrap_or(document)
        .display()
        .to_string()
}
