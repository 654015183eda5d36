//! Reload signalling: endpoint, wire message, client script and broadcaster.

use crate::dev::registry::ConnectionRegistry;

/// Path of the WebSocket endpoint the client connects to.
pub const RELOAD_ENDPOINT: &str = "/ws";

/// Text frame that tells a browser to reload.
pub const RELOAD_MESSAGE: &str = "reload";

/// Script tag spliced into served HTML.
pub const RELOAD_CLIENT_SCRIPT: &str = concat!(
    "<script>\n",
    include_str!("../../assets/reload-client.js"),
    "</script>\n"
);

/// Pushes the reload signal to every open connection.
#[derive(Debug, Clone)]
pub struct ReloadBroadcaster {
    registry: ConnectionRegistry,
}

impl ReloadBroadcaster {
    pub fn new(registry: ConnectionRegistry) -> Self {
        Self { registry }
    }

    /// Best-effort reload of every connected browser.
    ///
    /// Returns how many connections accepted the signal.
    pub fn reload(&self) -> usize {
        tracing::info!("Output changed, notifying clients...");
        let notified = self.registry.broadcast(RELOAD_MESSAGE);
        tracing::info!("Notified {} browser(s) to reload", notified);
        notified
    }
}
