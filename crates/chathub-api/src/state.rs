//! Application state shared across all handlers.

use std::sync::Arc;

use chathub_core::config::AppConfig;
use chathub_realtime::ChatHub;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// The broadcast hub.
    pub hub: Arc<ChatHub>,
}

impl AppState {
    /// Create the application state.
    pub fn new(config: Arc<AppConfig>, hub: Arc<ChatHub>) -> Self {
        Self { config, hub }
    }
}
