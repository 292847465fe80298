//! Adapter mapping axum WebSockets onto the core transport traits.

use async_trait::async_trait;
use axum::extract::ws::{Message as WsMessage, WebSocket};
use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};

use chathub_core::traits::{Frame, Transport, TransportReceiver, TransportSender};
use chathub_core::{AppError, AppResult};

/// An accepted, upgraded WebSocket as seen by the engine.
pub struct WsTransport {
    socket: WebSocket,
}

impl WsTransport {
    /// Wrap an upgraded socket.
    pub fn new(socket: WebSocket) -> Self {
        Self { socket }
    }
}

impl Transport for WsTransport {
    type Sender = WsSender;
    type Receiver = WsReceiver;

    fn split(self) -> (WsSender, WsReceiver) {
        let (sink, stream) = self.socket.split();
        (WsSender { sink }, WsReceiver { stream })
    }
}

/// Outbound half of a WebSocket transport.
pub struct WsSender {
    sink: SplitSink<WebSocket, WsMessage>,
}

#[async_trait]
impl TransportSender for WsSender {
    async fn send_text(&mut self, payload: String) -> AppResult<()> {
        self.sink
            .send(WsMessage::Text(payload.into()))
            .await
            .map_err(|e| AppError::transport(format!("websocket send failed: {e}")))
    }

    async fn close(&mut self) -> AppResult<()> {
        self.sink
            .close()
            .await
            .map_err(|e| AppError::transport(format!("websocket close failed: {e}")))
    }
}

/// Inbound half of a WebSocket transport.
pub struct WsReceiver {
    stream: SplitStream<WebSocket>,
}

#[async_trait]
impl TransportReceiver for WsReceiver {
    async fn next_frame(&mut self) -> Option<AppResult<Frame>> {
        loop {
            return match self.stream.next().await? {
                Ok(WsMessage::Text(text)) => Some(Ok(Frame::Text(text.as_str().to_owned()))),
                Ok(WsMessage::Binary(data)) => Some(Ok(Frame::Binary(data.to_vec()))),
                Ok(WsMessage::Close(_)) => Some(Ok(Frame::Close)),
                // Keepalive frames are handled by axum below this
                // boundary; skip to the next frame.
                Ok(WsMessage::Ping(_) | WsMessage::Pong(_)) => continue,
                Err(e) => Some(Err(AppError::transport(format!(
                    "websocket receive failed: {e}"
                )))),
            };
        }
    }
}
