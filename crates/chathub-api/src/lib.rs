//! # chathub-api
//!
//! HTTP layer for ChatHub built on Axum.
//!
//! Provides the WebSocket upgrade endpoint, the transport adapter that
//! maps axum WebSockets onto the core transport traits, the health
//! endpoint, and the router.

pub mod handlers;
pub mod router;
pub mod state;
pub mod transport;

pub use router::build_router;
pub use state::AppState;
