//! Command-line interface definition.
//!
//! - `ignition preview <FILE>` - render a preview document and keep serving its modules
//! - `ignition exports <FILE>` - print the custom elements a file exports
//! - `ignition serve` - run only the asset server for a workspace

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Ignition - live previews for custom element sources
#[derive(Parser, Debug)]
#[command(
    name = "ignition",
    version,
    about = "Live previews for custom element sources",
    long_about = "Ignition finds the custom elements a JavaScript or TypeScript file exports,\n\
                  serves the module to the browser from a per-workspace asset server and\n\
                  renders a preview document that instantiates every element."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a preview document for a source file
    Preview(PreviewArgs),

    /// Print the custom elements exported by a source file as JSON
    Exports(ExportsArgs),

    /// Serve a workspace's modules until interrupted
    Serve(ServeArgs),
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct WorkspaceArgs {
    /// Workspace root [default: nearest directory with a package.json]
    #[arg(short, long, value_name = "DIR")]
    pub workspace: Option<PathBuf>,

    /// Configuration file [default: <workspace>/ignition.toml]
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct PreviewArgs {
    /// Source file to preview
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Write the document to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Asset server port [default: any free port]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Exit after writing the document instead of serving until Ctrl+C
    #[arg(long)]
    pub once: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ExportsArgs {
    /// Source file to analyze
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub workspace: WorkspaceArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[command(flatten)]
    pub workspace: WorkspaceArgs,

    /// Asset server port [default: any free port]
    #[arg(short, long)]
    pub port: Option<u16>,
}
