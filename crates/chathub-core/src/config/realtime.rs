//! Real-time hub configuration.

use serde::{Deserialize, Serialize};

/// Real-time broadcast hub configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Per-connection outbound queue capacity, in frames.
    ///
    /// Broadcast deliveries to a connection whose queue is full are
    /// dropped rather than blocking the publisher.
    #[serde(default = "default_channel_buffer")]
    pub channel_buffer_size: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            channel_buffer_size: default_channel_buffer(),
        }
    }
}

fn default_channel_buffer() -> usize {
    256
}
