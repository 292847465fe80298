//! In-memory implementation of the message history log.

use async_trait::async_trait;
use tokio::sync::RwLock;

use chathub_core::traits::HistoryBackend;
use chathub_core::types::Message;

/// Process-lifetime append-only message log.
///
/// Lives for the life of the process; history does not survive a restart.
/// Swapping in durable storage means implementing
/// [`HistoryBackend`] over it and handing that to the hub instead.
#[derive(Debug, Default)]
pub struct InMemoryHistory {
    messages: RwLock<Vec<Message>>,
}

impl InMemoryHistory {
    /// Create a new empty history log.
    pub fn new() -> Self {
        Self {
            messages: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl HistoryBackend for InMemoryHistory {
    async fn append(&self, message: Message) {
        self.messages.write().await.push(message);
    }

    async fn snapshot(&self) -> Vec<Message> {
        self.messages.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_snapshot_preserves_insertion_order() {
        let history = InMemoryHistory::new();
        history.append(Message::send("first")).await;
        history.append(Message::send("second")).await;
        history.append(Message::send("third")).await;

        let texts: Vec<String> = history
            .snapshot()
            .await
            .into_iter()
            .map(|m| m.text)
            .collect();
        assert_eq!(texts, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_snapshot_is_point_in_time() {
        let history = InMemoryHistory::new();
        history.append(Message::send("before")).await;

        let snapshot = history.snapshot().await;
        history.append(Message::send("after")).await;

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].text, "before");
        assert_eq!(history.snapshot().await.len(), 2);
    }
}
