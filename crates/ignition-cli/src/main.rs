//! Ignition CLI entry point: argument parsing, logging setup and command dispatch.

use clap::Parser;
use ignition_cli::{cli, commands, error, logger, ui};
use miette::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let result = match args.command {
        cli::Command::Preview(preview_args) => commands::preview_execute(preview_args).await,
        cli::Command::Exports(exports_args) => commands::exports_execute(exports_args).await,
        cli::Command::Serve(serve_args) => commands::serve_execute(serve_args).await,
    };

    result.map_err(error::cli_error_to_miette)
}
