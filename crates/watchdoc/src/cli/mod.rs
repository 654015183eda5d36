//! Command-line interface definition for watchdoc.
//!
//! Every serving option is an `Option` so that only flags the user actually
//! typed override `watchdoc.toml` and `WATCHDOC_*` variables. Defaults live in
//! [`crate::config`].

mod tests;
mod validation;

use clap::Parser;
use std::path::PathBuf;

pub use validation::{parse_host, parse_port};

/// watchdoc - serve a directory and reload the browser when it changes
#[derive(Parser, Debug, Default)]
#[command(
    name = "watchdoc",
    version,
    about = "Serve a directory and reload the browser when it changes",
    long_about = "watchdoc serves a directory over HTTP and watches it for changes.\n\
                  Edits to served files make connected browsers reload; edits to the\n\
                  extra watch directories run a rebuild command instead."
)]
pub struct Cli {
    /// Port to listen on [default: 8080]
    #[arg(short, long, value_parser = parse_port)]
    pub port: Option<u16>,

    /// Interface to bind [default: 127.0.0.1]
    #[arg(long, value_parser = parse_host)]
    pub host: Option<String>,

    /// Directory to serve and watch for output changes [default: .]
    #[arg(short = 'd', long, value_name = "DIR")]
    pub serve_dir: Option<PathBuf>,

    /// Comma-separated source directories that trigger the rebuild command
    #[arg(short, long, value_name = "DIRS")]
    pub watch_dirs: Option<String>,

    /// Shell command to run when a source file changes
    #[arg(short, long, value_name = "COMMAND")]
    pub cmd: Option<String>,

    /// Do not open a browser on startup
    #[arg(long)]
    pub no_browser: bool,

    /// Path to a config file [default: ./watchdoc.toml if present]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}
