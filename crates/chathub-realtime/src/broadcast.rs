//! Fan-out delivery of one message to every open connection.

use std::sync::Arc;

use tracing::{debug, error};

use chathub_core::types::Message;

use crate::codec;
use crate::connection::registry::ConnectionRegistry;

/// Delivers messages to every currently-open connection in the registry.
///
/// Deliveries are attempted independently and never block: a connection
/// with a full or torn-down outbound queue is skipped and its own session
/// is responsible for detecting the failure and tearing down. `publish`
/// itself never fails.
#[derive(Debug, Clone)]
pub struct Broadcaster {
    registry: Arc<ConnectionRegistry>,
}

impl Broadcaster {
    /// Create a broadcaster over the given registry.
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Deliver a message to every open connection in the registry snapshot.
    ///
    /// Connections observed as closed are skipped silently; they are being
    /// deregistered by their own session. Per-connection ordering follows
    /// the order of `publish` calls; no ordering is guaranteed across
    /// connections.
    pub fn publish(&self, message: &Message) {
        let payload = match codec::encode(message) {
            Ok(payload) => payload,
            Err(e) => {
                error!(error = %e, "failed to encode broadcast message");
                return;
            }
        };

        let mut delivered = 0usize;
        for connection in self.registry.snapshot() {
            if !connection.is_open() {
                continue;
            }
            if connection.try_send(payload.clone()) {
                delivered += 1;
            }
        }

        debug!(delivered, kind = ?message.kind, "broadcast published");
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use chathub_core::types::ConnectionId;

    use super::*;
    use crate::connection::handle::ConnectionHandle;

    fn register_connection(
        registry: &Arc<ConnectionRegistry>,
        capacity: usize,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity);
        let handle = Arc::new(ConnectionHandle::new(ConnectionId::new(), tx));
        registry.register(Arc::clone(&handle)).expect("register");
        (handle, rx)
    }

    #[tokio::test]
    async fn test_publish_reaches_every_open_connection() {
        let registry = Arc::new(ConnectionRegistry::new());
        let broadcaster = Broadcaster::new(Arc::clone(&registry));
        let (_a, mut rx_a) = register_connection(&registry, 4);
        let (_b, mut rx_b) = register_connection(&registry, 4);

        broadcaster.publish(&Message::send("hi"));

        for rx in [&mut rx_a, &mut rx_b] {
            let payload = rx.recv().await.expect("delivery");
            assert_eq!(codec::decode(&payload).expect("decode"), Message::send("hi"));
        }
    }

    #[tokio::test]
    async fn test_publish_skips_closed_connections() {
        let registry = Arc::new(ConnectionRegistry::new());
        let broadcaster = Broadcaster::new(Arc::clone(&registry));
        let (_a, mut rx_a) = register_connection(&registry, 4);
        let (b, mut rx_b) = register_connection(&registry, 4);
        b.mark_closed();

        broadcaster.publish(&Message::send("hi"));

        assert!(rx_a.recv().await.is_some());
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_full_queue_does_not_abort_fan_out() {
        let registry = Arc::new(ConnectionRegistry::new());
        let broadcaster = Broadcaster::new(Arc::clone(&registry));
        let (full, _rx_full) = register_connection(&registry, 1);
        let (_ok, mut rx_ok) = register_connection(&registry, 4);

        // Saturate the first connection's queue.
        assert!(full.try_send("stuffing".to_string()));

        broadcaster.publish(&Message::send("hi"));

        let payload = rx_ok.recv().await.expect("delivery to healthy connection");
        assert_eq!(codec::decode(&payload).expect("decode"), Message::send("hi"));
        // The saturated connection stays open; its session handles recovery.
        assert!(full.is_open());
    }
}
