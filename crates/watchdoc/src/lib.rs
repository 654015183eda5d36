//! watchdoc - a live-reload development server.
//!
//! Serves a directory over HTTP, watches it and any extra source
//! directories, and on change either runs a rebuild command or tells every
//! connected browser to reload.
//!
//! # Architecture
//!
//! - [`dev`] - watcher, debounce loop, reload registry and HTTP surface
//! - [`config`] - layered configuration (defaults, `watchdoc.toml`, env, flags)
//! - [`cli`] - command-line flags
//! - [`commands`] - wiring everything together
//! - [`error`] - error types and miette conversion
//! - [`logger`] and [`ui`] - diagnostics and status lines
//!
//! # Example
//!
//! ```rust,no_run
//! use watchdoc::{cli::Cli, commands, logger};
//!
//! #[tokio::main]
//! async fn main() -> watchdoc::Result<()> {
//!     logger::init_logger(false, false, false);
//!     commands::serve_execute(Cli::default()).await
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod dev;
pub mod error;
pub mod logger;
pub mod ui;

pub use config::WatchdocConfig;
pub use error::{CliError, ConfigError, Result, ResultExt};
