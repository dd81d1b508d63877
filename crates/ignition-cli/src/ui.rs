//! Terminal status messages. Everything goes to stderr.

use std::sync::atomic::{AtomicBool, Ordering};

use owo_colors::OwoColorize;

static COLORS: AtomicBool = AtomicBool::new(true);

/// Apply `--no-color` / `NO_COLOR` to styled output.
pub fn init_colors(no_color: bool) {
    let enabled = crate::logger::should_use_colors(no_color);
    COLORS.store(enabled, Ordering::Relaxed);
    console::set_colors_enabled(enabled);
    console::set_colors_enabled_stderr(enabled);
}

fn colors() -> bool {
    COLORS.load(Ordering::Relaxed)
}

#[derive(Debug, Clone, Copy)]
enum Level {
    Success,
    Info,
    Warning,
}

fn line(level: Level, message: &str, colors: bool) -> String {
    match (level, colors) {
        (Level::Success, true) => format!("{} {}", "✓".green().bold(), message),
        (Level::Info, true) => format!("{} {}", "ℹ".blue().bold(), message),
        (Level::Warning, true) => format!("{} {}", "⚠".yellow().bold(), message.yellow()),
        (Level::Success, false) => format!("✓ {message}"),
        (Level::Info, false) => format!("ℹ {message}"),
        (Level::Warning, false) => format!("⚠ {message}"),
    }
}

pub fn success(message: &str) {
    eprintln!("{}", line(Level::Success, message, colors()));
}

pub fn info(message: &str) {
    eprintln!("{}", line(Level::Info, message, colors()));
}

pub fn warning(message: &str) {
    eprintln!("{}", line(Level::Warning, message, colors()));
}

/// A labelled value, e.g. the server URL.
pub fn field(label: &str, value: &str) {
    eprintln!(
        "  {} {}",
        console::style(format!("{label}:")).dim(),
        console::style(value).cyan()
    );
}
