//! Central hub that wires the broadcast engine together.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info};

use chathub_core::config::realtime::RealtimeConfig;
use chathub_core::traits::{HistoryBackend, Transport};

use crate::broadcast::Broadcaster;
use crate::connection::registry::ConnectionRegistry;
use crate::history::InMemoryHistory;
use crate::session::ConnectionSession;

/// Composition root for the broadcast engine.
///
/// Owns the connection registry, the broadcaster, the history log, and
/// the shutdown signal. One [`ConnectionSession`] is run per inbound
/// connection.
pub struct ChatHub {
    registry: Arc<ConnectionRegistry>,
    broadcaster: Broadcaster,
    history: Arc<dyn HistoryBackend>,
    queue_capacity: usize,
    shutdown_tx: watch::Sender<bool>,
}

impl std::fmt::Debug for ChatHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatHub").finish()
    }
}

impl ChatHub {
    /// Create a hub with the default in-memory history log.
    pub fn new(config: &RealtimeConfig) -> Self {
        Self::with_history(config, Arc::new(InMemoryHistory::new()))
    }

    /// Create a hub over a custom history backend.
    pub fn with_history(config: &RealtimeConfig, history: Arc<dyn HistoryBackend>) -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        let registry = Arc::new(ConnectionRegistry::new());
        let broadcaster = Broadcaster::new(Arc::clone(&registry));

        info!("chat hub initialized");

        Self {
            registry,
            broadcaster,
            history,
            queue_capacity: config.channel_buffer_size,
            shutdown_tx,
        }
    }

    /// Run one session over an accepted transport until it closes.
    ///
    /// Called once per inbound connection; the caller's task becomes the
    /// session's receive loop.
    pub async fn handle_connection<T: Transport>(&self, transport: T) {
        let (session, outbound_rx) = ConnectionSession::new(
            Arc::clone(&self.registry),
            self.broadcaster.clone(),
            Arc::clone(&self.history),
            self.queue_capacity,
            self.shutdown_tx.subscribe(),
        );

        if let Err(e) = session.run(transport, outbound_rx).await {
            error!(error = %e, "connection session aborted");
        }
    }

    /// Number of registered connections whose transport is open.
    pub fn open_count(&self) -> usize {
        self.registry.open_count()
    }

    /// Total number of registered connections.
    pub fn connection_count(&self) -> usize {
        self.registry.len()
    }

    /// Signal every session to close and tear down.
    pub fn shutdown(&self) {
        info!("shutting down chat hub");
        let _ = self.shutdown_tx.send(true);
    }
}
