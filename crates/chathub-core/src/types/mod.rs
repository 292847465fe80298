//! Domain types shared across all ChatHub crates.

pub mod id;
pub mod message;

pub use id::ConnectionId;
pub use message::{Message, MessageKind};
