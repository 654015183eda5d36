//! Shared state for the development server.
//!
//! Built once at startup and handed to the HTTP layer and the watch loop.
//! The connection registry is the only mutable piece and guards itself.

use crate::dev::registry::ConnectionRegistry;
use crate::dev::reload::ReloadBroadcaster;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Shared development server state.
#[derive(Debug)]
pub struct DevServerState {
    /// Open live-reload connections
    pub registry: ConnectionRegistry,

    /// Directory served over HTTP (absolute, resolved)
    served_root: PathBuf,
}

impl DevServerState {
    /// Create new dev server state.
    ///
    /// # Arguments
    ///
    /// * `served_root` - Resolved directory to serve files from
    pub fn new(served_root: PathBuf) -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            served_root,
        }
    }

    pub fn served_root(&self) -> &Path {
        &self.served_root
    }

    /// Broadcaster bound to this state's registry.
    pub fn broadcaster(&self) -> ReloadBroadcaster {
        ReloadBroadcaster::new(self.registry.clone())
    }

    /// Get number of connected clients.
    pub fn client_count(&self) -> usize {
        self.registry.count()
    }
}

/// Shared state handle for passing around the application.
pub type SharedState = Arc<DevServerState>;
