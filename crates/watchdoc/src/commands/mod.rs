//! Command implementations for the watchdoc CLI.
//!
//! watchdoc has a single mode of operation, [`serve`], which wires the
//! watcher, debounce loop and HTTP server together.

pub mod serve;

pub use serve::execute as serve_execute;
