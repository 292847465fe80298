//! JSON wire codec for chat messages.
//!
//! A message travels as a UTF-8 text payload of the form
//! `{"kind": 0|1, "text": "..."}`.

use chathub_core::types::Message;
use chathub_core::AppResult;

/// Encode a message to its wire payload.
pub fn encode(message: &Message) -> AppResult<String> {
    serde_json::to_string(message).map_err(Into::into)
}

/// Decode a wire payload into a message.
pub fn decode(payload: &str) -> AppResult<Message> {
    serde_json::from_str(payload).map_err(Into::into)
}
