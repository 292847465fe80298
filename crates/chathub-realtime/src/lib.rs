//! # chathub-realtime
//!
//! Connection lifecycle and fan-out broadcast engine for ChatHub. Provides:
//!
//! - Connection registry with atomic insert/remove/snapshot semantics
//! - Fan-out broadcast of messages to every open connection
//! - Append-only in-memory message history with replay on join
//! - Per-connection session state machine (join, replay, receive, teardown)
//! - The `ChatHub` composition root wiring the above together

pub mod broadcast;
pub mod codec;
pub mod connection;
pub mod history;
pub mod hub;
pub mod session;

pub use broadcast::Broadcaster;
pub use connection::handle::ConnectionHandle;
pub use connection::registry::ConnectionRegistry;
pub use history::InMemoryHistory;
pub use hub::ChatHub;
pub use session::ConnectionSession;
