//! Status message functions for terminal output.

use owo_colors::OwoColorize;

fn emit(symbol: impl std::fmt::Display, plain: &str, message: impl std::fmt::Display) {
    if super::colors_enabled() {
        eprintln!("{} {}", symbol, message);
    } else {
        eprintln!("{} {}", plain, message);
    }
}

/// Print a success message to stderr.
///
/// ```no_run
/// watchdoc::ui::success("Command execution completed");
/// ```
pub fn success(message: &str) {
    emit("✓".green().bold(), "✓", message);
}

/// Print an info message to stderr.
pub fn info(message: &str) {
    emit("ℹ".blue().bold(), "ℹ", message);
}

/// Print a warning message to stderr.
pub fn warning(message: &str) {
    if super::colors_enabled() {
        emit("⚠".yellow().bold(), "⚠", message.yellow());
    } else {
        emit("⚠", "⚠", message);
    }
}

/// Print an error message to stderr.
pub fn error(message: &str) {
    if super::colors_enabled() {
        emit("✗".red().bold(), "✗", message.red());
    } else {
        emit("✗", "✗", message);
    }
}
