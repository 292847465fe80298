//! WebSocket upgrade handler.

use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use tracing::debug;

use crate::state::AppState;
use crate::transport::WsTransport;

/// GET /ws — WebSocket upgrade.
///
/// The upgraded task runs one connection session to completion; the hub
/// owns the rest of the lifecycle.
pub async fn ws_upgrade(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    debug!("websocket upgrade requested");
    ws.on_upgrade(move |socket| async move {
        state.hub.handle_connection(WsTransport::new(socket)).await;
    })
}
