//! Terminal output for the handful of user-facing status lines.
//!
//! Diagnostics go through `tracing`; this module covers the startup banner
//! and shutdown notices that should look the same regardless of log level.

mod messages;

pub use messages::{error, info, success, warning};

use crate::config::WatchdocConfig;
use crate::dev::WatchTargets;
use std::sync::atomic::{AtomicBool, Ordering};

static COLORS: AtomicBool = AtomicBool::new(true);

/// Decide once whether status lines are coloured.
///
/// `--no-color` always wins; otherwise `NO_COLOR`, `FORCE_COLOR` and the
/// terminal decide.
pub fn init_colors(no_color: bool) {
    COLORS.store(!no_color && crate::logger::should_use_colors(), Ordering::Relaxed);
}

pub(crate) fn colors_enabled() -> bool {
    COLORS.load(Ordering::Relaxed)
}

/// Print what is being served and watched.
pub fn banner(config: &WatchdocConfig, targets: &WatchTargets) {
    success(&format!("Development server running at {}", config.server_url()));
    info(&format!("Serving from: {}", targets.served_root().display()));

    for extra in targets.sources() {
        info(&format!("Also watching: {}", extra.display()));
    }

    if let Some(cmd) = config.command() {
        info(&format!("Command: {}", cmd));
    }
}
