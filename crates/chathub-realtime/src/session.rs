//! Per-connection session lifecycle.
//!
//! One session task owns one client connection from accept to teardown:
//! register, announce the new open count, replay history, loop on inbound
//! frames, then deregister and announce the decremented count. The
//! outbound direction runs as a separate writer task draining the
//! per-connection queue, so no lock is ever held across transport I/O.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use chathub_core::traits::{Frame, HistoryBackend, Transport, TransportReceiver, TransportSender};
use chathub_core::types::{ConnectionId, Message};
use chathub_core::AppResult;

use crate::broadcast::Broadcaster;
use crate::codec;
use crate::connection::handle::ConnectionHandle;
use crate::connection::registry::ConnectionRegistry;

/// One client's session: accept, join, replay, receive loop, teardown.
pub struct ConnectionSession {
    id: ConnectionId,
    handle: Arc<ConnectionHandle>,
    registry: Arc<ConnectionRegistry>,
    broadcaster: Broadcaster,
    history: Arc<dyn HistoryBackend>,
    shutdown: watch::Receiver<bool>,
}

impl ConnectionSession {
    /// Create a session with a fresh connection identifier.
    ///
    /// Returns the session plus the receive side of its outbound queue,
    /// which [`run`](Self::run) hands to the writer task.
    pub fn new(
        registry: Arc<ConnectionRegistry>,
        broadcaster: Broadcaster,
        history: Arc<dyn HistoryBackend>,
        queue_capacity: usize,
        shutdown: watch::Receiver<bool>,
    ) -> (Self, mpsc::Receiver<String>) {
        let id = ConnectionId::new();
        let (outbound_tx, outbound_rx) = mpsc::channel(queue_capacity);
        let handle = Arc::new(ConnectionHandle::new(id, outbound_tx));

        let session = Self {
            id,
            handle,
            registry,
            broadcaster,
            history,
            shutdown,
        };
        (session, outbound_rx)
    }

    /// Drive the session over the given transport until it closes.
    ///
    /// Returns an error only when registration fails (duplicate
    /// identifier — a generator defect); every transport failure is
    /// handled internally by tearing the session down.
    pub async fn run<T: Transport>(
        mut self,
        transport: T,
        outbound_rx: mpsc::Receiver<String>,
    ) -> AppResult<()> {
        let (mut sender, mut receiver) = transport.split();

        if let Err(e) = self.registry.register(Arc::clone(&self.handle)) {
            let _ = sender.close().await;
            return Err(e);
        }

        let writer = spawn_writer(sender, outbound_rx, Arc::clone(&self.handle));

        info!(conn_id = %self.id, "connection joined");

        // The join announcement counts this connection: membership was
        // acquired above, before the history snapshot is taken.
        self.announce_open_count();

        if self.replay_history().await {
            self.receive_loop(&mut receiver).await;
        }

        self.teardown(writer).await;
        Ok(())
    }

    /// Broadcast the current open-connection count to everyone.
    fn announce_open_count(&self) {
        self.broadcaster
            .publish(&Message::user_count_changed(self.registry.open_count()));
    }

    /// Replay the full history snapshot to this connection only.
    ///
    /// Returns `false` when the transport died mid-replay, in which case
    /// the session proceeds directly to teardown.
    async fn replay_history(&self) -> bool {
        let snapshot = self.history.snapshot().await;
        for message in &snapshot {
            let payload = match codec::encode(message) {
                Ok(payload) => payload,
                Err(e) => {
                    error!(conn_id = %self.id, error = %e, "failed to encode history entry");
                    continue;
                }
            };
            if !self.handle.send(payload).await {
                warn!(conn_id = %self.id, "transport closed during history replay");
                return false;
            }
        }

        if !snapshot.is_empty() {
            debug!(conn_id = %self.id, replayed = snapshot.len(), "history replayed");
        }
        true
    }

    /// Block on inbound frames until the connection closes, the transport
    /// errors, or shutdown is requested.
    async fn receive_loop<R: TransportReceiver>(&mut self, receiver: &mut R) {
        loop {
            tokio::select! {
                _ = async { let _ = self.shutdown.wait_for(|stop| *stop).await; } => {
                    debug!(conn_id = %self.id, "shutdown requested");
                    break;
                }
                frame = receiver.next_frame() => {
                    match frame {
                        None | Some(Ok(Frame::Close)) => break,
                        Some(Err(e)) => {
                            warn!(conn_id = %self.id, error = %e, "transport receive failed");
                            break;
                        }
                        Some(Ok(Frame::Binary(_))) => {
                            // No decodable message; nothing is appended or
                            // relayed, but a dead transport still ends the
                            // session.
                            if !self.handle.is_open() {
                                break;
                            }
                        }
                        Some(Ok(Frame::Text(payload))) => {
                            if !self.handle_text_frame(&payload).await {
                                break;
                            }
                        }
                    }
                }
            }
        }
    }

    /// Ingest one text frame. Returns `false` when the session must close.
    async fn handle_text_frame(&self, payload: &str) -> bool {
        let message = match codec::decode(payload) {
            Ok(message) => message,
            Err(e) => {
                debug!(conn_id = %self.id, error = %e, "ignoring undecodable frame");
                return self.handle.is_open();
            }
        };

        self.history.append(message.clone()).await;

        if message.text.is_empty() {
            // Empty messages are swallowed, not relayed.
            return self.handle.is_open();
        }

        self.broadcaster.publish(&message);
        true
    }

    /// Deregister, announce the decremented count, and close the transport.
    async fn teardown(self, writer: JoinHandle<()>) {
        self.handle.mark_closed();
        self.registry.deregister(&self.id);
        self.announce_open_count();
        info!(conn_id = %self.id, "connection left");

        // Dropping the handle releases the outbound queue; the writer
        // drains what is left and closes the transport cleanly.
        let ConnectionSession { handle, .. } = self;
        drop(handle);
        let _ = writer.await;
    }
}

/// Forward encoded frames from the outbound queue to the transport.
fn spawn_writer<S: TransportSender>(
    mut sender: S,
    mut outbound_rx: mpsc::Receiver<String>,
    handle: Arc<ConnectionHandle>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(payload) = outbound_rx.recv().await {
            if let Err(e) = sender.send_text(payload).await {
                warn!(conn_id = %handle.id, error = %e, "transport write failed");
                handle.mark_closed();
                break;
            }
        }
        if let Err(e) = sender.close().await {
            debug!(conn_id = %handle.id, error = %e, "transport close failed");
        }
    })
}
