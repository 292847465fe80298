//! Pluggable persistence contract for the message history log.

use async_trait::async_trait;

use crate::types::Message;

/// An append-only ordered log of every message ever received.
///
/// Writers append concurrently; readers take a consistent point-in-time
/// snapshot for replay to newly joined connections. Entries are never
/// removed or reordered. Durable storage would implement the same two
/// operations without changing the contract.
#[async_trait]
pub trait HistoryBackend: Send + Sync + 'static {
    /// Append a message to the end of the log.
    async fn append(&self, message: Message);

    /// Return the full log in insertion order as of call time.
    ///
    /// Messages appended after the call are not included; they reach new
    /// connections through the live broadcast path instead.
    async fn snapshot(&self) -> Vec<Message>;
}
