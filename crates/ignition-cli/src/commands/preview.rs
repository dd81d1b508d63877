//! `ignition preview <FILE>`

use std::path::Path;

use ignition::{CancelSignal, PreviewDocument, PreviewRequest, WorkspaceRegistry, open_preview};
use tokio::signal;

use crate::cli::PreviewArgs;
use crate::commands::utils::{resolve_path, resolve_workspace, validate_source};
use crate::config::{CliOverrides, load_config};
use crate::error::Result;
use crate::ui;

/// Execute the preview command.
///
/// 1. Resolve the workspace and load its configuration
/// 2. Start (or reuse) the workspace's asset server and resolve the file
/// 3. Write the preview document to `--out` or stdout
/// 4. Keep serving modules until Ctrl+C, unless `--once` was given
pub async fn execute(args: PreviewArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let document = validate_source(&args.file, &cwd)?;
    let root = resolve_workspace(args.workspace.workspace.as_deref(), Some(&document), &cwd)?;
    let config = load_config(
        root.as_path(),
        args.workspace.config.as_deref(),
        CliOverrides { port: args.port },
    )?;

    let registry = WorkspaceRegistry::with_config(config.clone());
    let request = PreviewRequest {
        workspace: root,
        document,
    };

    // Ctrl+C while the server starts or the file is analyzed abandons the request.
    let cancel = CancelSignal::new();
    let interrupt = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        }
    });
    let result = open_preview(&registry, &request, &config.preview, &cancel).await;
    interrupt.abort();

    let preview = match result {
        Ok(preview) => preview,
        Err(err) => {
            registry.shutdown_all().await;
            return Err(err.into());
        }
    };

    let written = write_document(&preview, args.out.as_deref(), &cwd).await;
    if let Err(err) = written {
        registry.shutdown_all().await;
        return Err(err);
    }
    report(&preview);

    if !args.once {
        ui::info("Serving modules, press Ctrl+C to stop");
        signal::ctrl_c().await?;
        ui::info("Shutting down asset server...");
    }
    registry.shutdown_all().await;
    Ok(())
}

async fn write_document(preview: &PreviewDocument, out: Option<&Path>, cwd: &Path) -> Result<()> {
    match out {
        Some(out) => {
            let path = resolve_path(out, cwd);
            tokio::fs::write(&path, &preview.html).await?;
            ui::success(&format!("Wrote preview to {}", path.display()));
        }
        None => println!("{}", preview.html),
    }
    Ok(())
}

fn report(preview: &PreviewDocument) {
    if preview.tags.is_empty() {
        ui::warning("No custom elements are exported by this file");
    }
    ui::field("module", &preview.module_url);
    ui::field("server", &preview.address.origin());
    if !preview.tags.is_empty() {
        ui::field("elements", &preview.tags.join(", "));
    }
}
