//! `ignition exports <FILE>`

use std::path::PathBuf;
use std::sync::Arc;

use ignition::{ComponentExport, IgnitionError, ModuleResolver};
use ignition_analyzer::PackageAnalyzer;
use serde::Serialize;

use crate::cli::ExportsArgs;
use crate::commands::utils::{resolve_workspace, validate_source};
use crate::config::{CliOverrides, load_config};
use crate::error::Result;

/// JSON printed to stdout.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportsReport {
    workspace: PathBuf,
    source_path: PathBuf,
    js_path: String,
    custom_element_exports: Vec<ComponentExport>,
}

/// Execute the exports command. Analysis only, no server is started.
pub async fn execute(args: ExportsArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let source = validate_source(&args.file, &cwd)?;
    let root = resolve_workspace(args.workspace.workspace.as_deref(), Some(&source), &cwd)?;
    let config = load_config(
        root.as_path(),
        args.workspace.config.as_deref(),
        CliOverrides::default(),
    )?;

    let analyzer = PackageAnalyzer::load(root.as_path(), &config.resolve)
        .await
        .map_err(IgnitionError::from)?;
    let resolver = ModuleResolver::new(Arc::new(analyzer));
    let resolved = resolver.resolve(&source).await?;

    let report = ExportsReport {
        workspace: root.as_path().to_path_buf(),
        source_path: source,
        js_path: resolved.js_path,
        custom_element_exports: resolved.exports,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
