//! Duplex transport contract.
//!
//! A transport is one client's persistent duplex byte-stream, already
//! accepted and protocol-upgraded by the HTTP layer. The engine only sees
//! frames: receive-next-frame on one half, send-text/close on the other.
//! Protocol-level keepalive (ping/pong) is handled below this boundary.

use async_trait::async_trait;

use crate::result::AppResult;

/// One inbound frame as seen by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// A UTF-8 text frame carrying an encoded message.
    Text(String),
    /// A binary frame; carries no decodable message.
    Binary(Vec<u8>),
    /// The peer initiated a close handshake.
    Close,
}

/// A duplex transport that can be split into independent halves.
///
/// Splitting lets the outbound writer run as its own task while the
/// session loop blocks on the receive half.
pub trait Transport: Send + 'static {
    /// The outbound half.
    type Sender: TransportSender;
    /// The inbound half.
    type Receiver: TransportReceiver;

    /// Split the transport into its send and receive halves.
    fn split(self) -> (Self::Sender, Self::Receiver);
}

/// The outbound half of a transport.
#[async_trait]
pub trait TransportSender: Send + 'static {
    /// Send one text frame with the given payload.
    async fn send_text(&mut self, payload: String) -> AppResult<()>;

    /// Close the transport cleanly.
    async fn close(&mut self) -> AppResult<()>;
}

/// The inbound half of a transport.
#[async_trait]
pub trait TransportReceiver: Send + 'static {
    /// Receive the next frame.
    ///
    /// Returns `None` when the stream has ended, `Some(Err(_))` on a
    /// transport error. Both drive the session to teardown.
    async fn next_frame(&mut self) -> Option<AppResult<Frame>>;
}
