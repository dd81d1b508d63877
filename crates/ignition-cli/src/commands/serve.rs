//! `ignition serve`

use ignition::WorkspaceRegistry;
use tokio::signal;

use crate::cli::ServeArgs;
use crate::commands::utils::resolve_workspace;
use crate::config::{CliOverrides, load_config};
use crate::error::Result;
use crate::ui;

/// Execute the serve command: start the workspace's asset server and keep it
/// running until Ctrl+C.
pub async fn execute(args: ServeArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let root = resolve_workspace(args.workspace.workspace.as_deref(), None, &cwd)?;
    let config = load_config(
        root.as_path(),
        args.workspace.config.as_deref(),
        CliOverrides { port: args.port },
    )?;

    let registry = WorkspaceRegistry::with_config(config);
    let pair = registry.acquire(&root).await?;

    ui::success(&format!("Serving {}", root));
    ui::field(
        "modules",
        &format!("{}{}/", pair.address().origin(), pair.server.source_prefix()),
    );
    ui::info("Press Ctrl+C to stop");

    signal::ctrl_c().await?;
    ui::info("Shutting down asset server...");
    drop(pair);
    registry.shutdown_all().await;
    Ok(())
}
