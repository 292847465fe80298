//! Boundary traits for external collaborators.
//!
//! The engine depends only on these narrow contracts; concrete
//! implementations (axum WebSockets, the in-memory history log) live in
//! the outer crates.

pub mod history;
pub mod transport;

pub use history::HistoryBackend;
pub use transport::{Frame, Transport, TransportReceiver, TransportSender};
