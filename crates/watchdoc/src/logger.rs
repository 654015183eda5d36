//! Logging setup built on `tracing`.
//!
//! The filter is picked in this order:
//! 1. `--verbose`: debug for watchdoc
//! 2. `--quiet`: errors only
//! 3. `RUST_LOG`, if set
//! 4. info for watchdoc
//!
//! # Example
//!
//! ```rust,no_run
//! use watchdoc::logger::init_logger;
//!
//! init_logger(false, false, false);
//! tracing::info!("Watching for changes");
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "watchdoc=info";
const VERBOSE_FILTER: &str = "watchdoc=debug,tower_http=debug";
const QUIET_FILTER: &str = "watchdoc=error";

/// Build the filter for the given flags.
pub fn filter_for(verbose: bool, quiet: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Initialize the global tracing subscriber.
///
/// Call once, before anything logs.
pub fn init_logger(verbose: bool, quiet: bool, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_ansi(!no_color && should_use_colors())
        .compact();

    tracing_subscriber::registry()
        .with(filter_for(verbose, quiet))
        .with(fmt_layer)
        .init();
}

/// Whether log output should be coloured.
///
/// `NO_COLOR` wins over `FORCE_COLOR`; otherwise defer to the terminal.
pub fn should_use_colors() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    if std::env::var_os("FORCE_COLOR").is_some() {
        return true;
    }

    console::Term::stderr().features().colors_supported()
}
