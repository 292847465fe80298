//! Shared test helpers for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use chathub_api::state::AppState;
use chathub_core::config::AppConfig;
use chathub_realtime::ChatHub;

/// Test application context.
pub struct TestApp {
    /// The Axum router for making test requests.
    pub router: Router,
}

impl TestApp {
    /// Create a new test application with default configuration.
    pub fn new() -> Self {
        let config = Arc::new(AppConfig::default());
        let hub = Arc::new(ChatHub::new(&config.realtime));
        let state = AppState::new(Arc::clone(&config), hub);
        let router = chathub_api::router::build_router(state);
        Self { router }
    }

    /// Issue one request against the router without binding a socket.
    pub async fn request(&self, method: &str, path: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .expect("build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router response");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            // Not every response carries a JSON body (e.g. extractor
            // rejections return plain text); fall back to Null instead of
            // panicking so the caller can still inspect the status.
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    /// Serve the app on an ephemeral local port, returning its address.
    pub async fn spawn(self) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");

        tokio::spawn(async move {
            axum::serve(listener, self.router).await.expect("serve");
        });

        addr
    }
}
