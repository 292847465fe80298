//! Integration tests for the health endpoint and upgrade handling.

mod helpers;

use axum::http::StatusCode;

#[tokio::test]
async fn test_health_check() {
    let app = helpers::TestApp::new();

    let (status, body) = app.request("GET", "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.get("status").unwrap().as_str().unwrap(), "ok");
    assert_eq!(body.get("connections").unwrap().as_u64().unwrap(), 0);
    assert_eq!(body.get("open_connections").unwrap().as_u64().unwrap(), 0);
}

#[tokio::test]
async fn test_ws_route_rejects_plain_get() {
    let app = helpers::TestApp::new();

    // No upgrade headers: the WebSocket extractor refuses the request.
    let (status, _) = app.request("GET", "/ws").await;

    assert!(
        status.is_client_error(),
        "expected a 4xx rejection, got {status}"
    );
}
