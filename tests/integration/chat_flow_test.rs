//! End-to-end chat flow over real WebSocket connections.

mod helpers;

use std::net::SocketAddr;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use chathub_core::types::{Message, MessageKind};

type WsClient = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn connect(addr: SocketAddr) -> WsClient {
    let (ws, _) = connect_async(format!("ws://{addr}/ws"))
        .await
        .expect("websocket connect");
    ws
}

/// Receive the next chat message, skipping any non-text frames.
async fn recv_message(ws: &mut WsClient) -> Message {
    loop {
        let frame = timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out waiting for message")
            .expect("stream ended")
            .expect("websocket error");
        if let WsMessage::Text(text) = frame {
            return serde_json::from_str(text.as_str()).expect("decode message");
        }
    }
}

async fn send_chat(ws: &mut WsClient, text: &str) {
    let payload = serde_json::to_string(&Message::send(text)).expect("encode message");
    ws.send(WsMessage::text(payload)).await.expect("send");
}

fn assert_count(message: Message, expected: usize) {
    assert_eq!(message.kind, MessageKind::UserCountChanged);
    assert_eq!(message.text, expected.to_string());
}

#[tokio::test]
async fn test_three_client_chat_flow() {
    let addr = helpers::TestApp::new().spawn().await;

    // A joins and sees itself counted.
    let mut a = connect(addr).await;
    assert_count(recv_message(&mut a).await, 1);

    // A's message is echoed back to A.
    send_chat(&mut a, "hi").await;
    assert_eq!(recv_message(&mut a).await, Message::send("hi"));

    // B joins: both get the new count, B gets the history replay.
    let mut b = connect(addr).await;
    assert_count(recv_message(&mut b).await, 2);
    assert_eq!(recv_message(&mut b).await, Message::send("hi"));
    assert_count(recv_message(&mut a).await, 2);

    // C joins: everyone gets the new count, C gets the replay.
    let mut c = connect(addr).await;
    assert_count(recv_message(&mut c).await, 3);
    assert_eq!(recv_message(&mut c).await, Message::send("hi"));
    assert_count(recv_message(&mut a).await, 3);
    assert_count(recv_message(&mut b).await, 3);

    // A live message reaches all three exactly once.
    send_chat(&mut b, "hello all").await;
    assert_eq!(recv_message(&mut a).await, Message::send("hello all"));
    assert_eq!(recv_message(&mut b).await, Message::send("hello all"));
    assert_eq!(recv_message(&mut c).await, Message::send("hello all"));

    // B leaves: the remaining clients see the decremented count.
    b.close(None).await.expect("close");
    assert_count(recv_message(&mut a).await, 2);
    assert_count(recv_message(&mut c).await, 2);
}

#[tokio::test]
async fn test_empty_message_is_not_relayed() {
    let addr = helpers::TestApp::new().spawn().await;

    let mut a = connect(addr).await;
    assert_count(recv_message(&mut a).await, 1);

    send_chat(&mut a, "").await;
    send_chat(&mut a, "after").await;

    // The empty message is swallowed; the next delivery is the non-empty
    // one.
    assert_eq!(recv_message(&mut a).await, Message::send("after"));
}

#[tokio::test]
async fn test_late_joiner_replays_full_history_in_order() {
    let addr = helpers::TestApp::new().spawn().await;

    let mut a = connect(addr).await;
    assert_count(recv_message(&mut a).await, 1);

    for text in ["one", "two", "three"] {
        send_chat(&mut a, text).await;
        assert_eq!(recv_message(&mut a).await, Message::send(text));
    }

    let mut b = connect(addr).await;
    assert_count(recv_message(&mut b).await, 2);
    for text in ["one", "two", "three"] {
        assert_eq!(recv_message(&mut b).await, Message::send(text));
    }
}
