//! The chat message domain type and its wire representation.

use serde::{Deserialize, Serialize};

/// Discriminates the two message categories on the wire.
///
/// Serialized as a bare integer (`0` / `1`); unknown values are rejected
/// during deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum MessageKind {
    /// The number of open connections changed (join or leave).
    UserCountChanged = 0,
    /// A chat message sent by a client.
    Send = 1,
}

impl From<MessageKind> for u8 {
    fn from(kind: MessageKind) -> u8 {
        kind as u8
    }
}

impl TryFrom<u8> for MessageKind {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::UserCountChanged),
            1 => Ok(Self::Send),
            other => Err(format!("unknown message kind: {other}")),
        }
    }
}

/// An immutable chat message.
///
/// Created on receipt from a client or synthesized by a session for count
/// announcements; consumed by the wire codec and the history log. Carries
/// no identity and no timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message category.
    pub kind: MessageKind,
    /// Message payload; may be empty.
    pub text: String,
}

impl Message {
    /// Create a message with an explicit kind.
    pub fn new(kind: MessageKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Create a client chat message.
    pub fn send(text: impl Into<String>) -> Self {
        Self::new(MessageKind::Send, text)
    }

    /// Create a count announcement carrying the open-connection count.
    pub fn user_count_changed(count: usize) -> Self {
        Self::new(MessageKind::UserCountChanged, count.to_string())
    }
}
