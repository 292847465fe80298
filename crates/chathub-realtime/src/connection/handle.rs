//! Individual connection handle.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use chathub_core::types::ConnectionId;

/// A handle to a single live connection.
///
/// Holds the sender side of the per-connection outbound queue, which
/// carries already-encoded frames to the writer task, plus the transport
/// open/closed status. Owned by its session; registered in the
/// [`ConnectionRegistry`](super::registry::ConnectionRegistry) for the
/// span during which the connection should receive broadcasts.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID, generated at accept time.
    pub id: ConnectionId,
    /// When the connection was established.
    pub connected_at: DateTime<Utc>,
    /// Sender for encoded outbound frames.
    sender: mpsc::Sender<String>,
    /// Whether the transport is still open.
    open: AtomicBool,
}

impl ConnectionHandle {
    /// Create a new open connection handle.
    pub fn new(id: ConnectionId, sender: mpsc::Sender<String>) -> Self {
        Self {
            id,
            connected_at: Utc::now(),
            sender,
            open: AtomicBool::new(true),
        }
    }

    /// Enqueue an encoded frame without blocking.
    ///
    /// Returns `false` when the frame was dropped: the queue is full
    /// (logged, the connection stays open) or the writer is gone (the
    /// handle is marked closed).
    pub fn try_send(&self, payload: String) -> bool {
        if !self.is_open() {
            return false;
        }
        match self.sender.try_send(payload) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(conn_id = %self.id, "outbound queue full, dropping frame");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_closed();
                false
            }
        }
    }

    /// Enqueue an encoded frame, waiting for queue capacity.
    ///
    /// Used by the owning session for history replay, where dropping
    /// frames is not acceptable. Returns `false` when the writer is gone.
    pub async fn send(&self, payload: String) -> bool {
        if !self.is_open() {
            return false;
        }
        match self.sender.send(payload).await {
            Ok(()) => true,
            Err(_) => {
                self.mark_closed();
                false
            }
        }
    }

    /// Check whether the transport is open.
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst)
    }

    /// Mark the transport as closed.
    pub fn mark_closed(&self) {
        self.open.store(false, Ordering::SeqCst);
    }
}
