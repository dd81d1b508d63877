//! Logging setup.
//!
//! Verbosity comes from the global flags; without them `RUST_LOG` is honored
//! and the default is `info` for the ignition crates.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const CRATES: [&str; 3] = ["ignition", "ignition_analyzer", "ignition_cli"];

/// Directive enabling `level` for every ignition crate.
fn directives(level: &str) -> String {
    CRATES
        .iter()
        .map(|krate| format!("{krate}={level}"))
        .collect::<Vec<_>>()
        .join(",")
}

fn filter(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(directives("debug"))
    } else if quiet {
        EnvFilter::new(directives("error"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives("info")))
    }
}

/// Install the global tracing subscriber. Logs go to stderr so documents
/// written to stdout stay clean.
///
/// Call once, before anything logs.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .with_ansi(should_use_colors(no_color))
        .compact();

    tracing_subscriber::registry()
        .with(filter(verbose, quiet))
        .with(fmt_layer)
        .init();
}

/// Whether colored output should be used, honoring `--no-color`, `NO_COLOR`
/// and `FORCE_COLOR`.
pub fn should_use_colors(no_color: bool) -> bool {
    color_choice(
        no_color,
        std::env::var_os("NO_COLOR").is_some(),
        std::env::var_os("FORCE_COLOR").is_some(),
        console::Term::stderr().features().colors_supported(),
    )
}

/// `--no-color` beats `NO_COLOR`, which beats `FORCE_COLOR`, which beats
/// terminal detection.
fn color_choice(flag: bool, no_color_env: bool, force_color_env: bool, terminal: bool) -> bool {
    if flag || no_color_env {
        return false;
    }
    force_color_env || terminal
}
