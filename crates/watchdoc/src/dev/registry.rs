//! Registry of open live-reload connections.
//!
//! Each connection is represented by the sending half of a small bounded
//! channel; the connection task owns the socket and drains the channel.
//! Every operation takes the same mutex. Broadcasting uses `try_send`, so the
//! lock is never held across a blocking send: a full or closed channel is a
//! failed send, and the connection is dropped from the set in the same pass.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Messages buffered per connection before it counts as unresponsive.
const CONNECTION_BUFFER: usize = 16;

/// Identity of a registered connection.
pub type ConnectionId = usize;

#[derive(Debug, Default)]
struct Connections {
    next_id: ConnectionId,
    senders: HashMap<ConnectionId, mpsc::Sender<String>>,
}

/// Shared handle to the set of open reload connections.
///
/// Cloning is cheap; all clones see the same set.
#[derive(Debug, Clone, Default)]
pub struct ConnectionRegistry {
    inner: Arc<Mutex<Connections>>,
}

/// Receiving side handed to a newly registered connection.
#[derive(Debug)]
pub struct ReloadConnection {
    id: ConnectionId,
    rx: mpsc::Receiver<String>,
}

impl ReloadConnection {
    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Next message for this connection.
    ///
    /// Returns `None` once the registry has evicted it.
    pub async fn recv(&mut self) -> Option<String> {
        self.rx.recv().await
    }
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to the set.
    pub fn register(&self) -> ReloadConnection {
        let (tx, rx) = mpsc::channel(CONNECTION_BUFFER);

        let mut connections = self.inner.lock();
        let id = connections.next_id;
        connections.next_id += 1;
        connections.senders.insert(id, tx);

        ReloadConnection { id, rx }
    }

    /// Remove a connection. Returns false if it was already gone.
    pub fn unregister(&self, id: ConnectionId) -> bool {
        self.inner.lock().senders.remove(&id).is_some()
    }

    /// Number of open connections.
    pub fn count(&self) -> usize {
        self.inner.lock().senders.len()
    }

    /// Send `message` to every connection, evicting any that fail.
    ///
    /// Returns the number of connections that accepted the message.
    pub fn broadcast(&self, message: &str) -> usize {
        let mut connections = self.inner.lock();

        connections.senders.retain(|id, tx| match tx.try_send(message.to_string()) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Error notifying client {}: {}", id, e);
                false
            }
        });

        connections.senders.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(conn: &mut ReloadConnection) -> usize {
        let mut received = 0;
        while conn.rx.try_recv().is_ok() {
            received += 1;
        }
        received
    }

    #[test]
    fn test_register_and_unregister() {
        let registry = ConnectionRegistry::new();

        let a = registry.register();
        let b = registry.register();
        assert_eq!(registry.count(), 2);
        assert_ne!(a.id(), b.id());

        assert!(registry.unregister(a.id()));
        assert!(!registry.unregister(a.id()));
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_broadcast_reaches_each_connection_once() {
        let registry = ConnectionRegistry::new();
        let mut conns: Vec<_> = (0..3).map(|_| registry.register()).collect();

        assert_eq!(registry.broadcast("reload"), 3);
        assert_eq!(registry.broadcast("reload"), 3);

        for conn in &mut conns {
            assert_eq!(drain(conn), 2);
        }
    }

    #[test]
    fn test_closed_connection_is_evicted_on_broadcast() {
        let registry = ConnectionRegistry::new();
        let mut kept = registry.register();
        let dropped = registry.register();
        let mut other = registry.register();

        drop(dropped);

        assert_eq!(registry.broadcast("reload"), 2);
        assert_eq!(registry.count(), 2);
        assert_eq!(drain(&mut kept), 1);
        assert_eq!(drain(&mut other), 1);
    }

    #[test]
    fn test_full_connection_is_evicted() {
        let registry = ConnectionRegistry::new();
        let _stalled = registry.register();

        for _ in 0..CONNECTION_BUFFER {
            assert_eq!(registry.broadcast("reload"), 1);
        }

        assert_eq!(registry.broadcast("reload"), 0);
        assert_eq!(registry.count(), 0);
    }

    #[tokio::test]
    async fn test_evicted_connection_sees_end_of_stream() {
        let registry = ConnectionRegistry::new();
        let mut conn = registry.register();

        registry.broadcast("reload");
        registry.unregister(conn.id());

        assert_eq!(conn.recv().await.as_deref(), Some("reload"));
        assert_eq!(conn.recv().await, None);
    }

    #[test]
    fn test_clones_share_membership() {
        let registry = ConnectionRegistry::new();
        let handle = registry.clone();

        let _conn = handle.register();

        assert_eq!(registry.count(), 1);
    }
}
