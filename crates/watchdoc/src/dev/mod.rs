//! Development server module.
//!
//! Watches the served directory (and any extra source directories) and, when
//! files change:
//! - runs the rebuild command if a source file changed
//! - tells connected browsers to reload if a served file changed
//!
//! Served HTML gets a small client injected that listens on `/ws` for the
//! reload signal.

pub mod command;
pub mod debounce;
pub mod inject;
pub mod paths;
pub mod pipeline;
pub mod registry;
pub mod reload;
pub mod server;
pub mod state;
pub mod targets;
pub mod watcher;

// Re-exports
pub use debounce::{Action, DebounceDispatcher, Decision, DEBOUNCE_WINDOW};
pub use inject::{inject_reload_client, InjectorState};
pub use pipeline::{DispatchTarget, LiveReloadTarget, WatchLoop};
pub use registry::{ConnectionRegistry, ReloadConnection};
pub use reload::{ReloadBroadcaster, RELOAD_CLIENT_SCRIPT, RELOAD_ENDPOINT, RELOAD_MESSAGE};
pub use server::DevServer;
pub use state::{DevServerState, SharedState};
pub use targets::{resolve, WatchTargets};
pub use watcher::{ChangeEvent, ChangeKind, FileWatcher, WatchMessage, WatchStream};
