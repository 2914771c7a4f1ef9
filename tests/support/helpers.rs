// tests/support/helpers.rs
use std::future::Future;
use std::time::Duration;

use axum::body::{self, Body};
use axum::http::{Method, Request, StatusCode, header::AUTHORIZATION};
use axum::response::Response;
use serde_json::Value;
use tower::util::ServiceExt as _;

use super::builders::{TestApp, TestAppBuilder};

pub const TEST_CLIENT_IP: &str = "203.0.113.10";

pub fn make_test_app() -> TestApp {
    TestAppBuilder::new().build()
}

pub fn make_test_router() -> axum::Router {
    make_test_app().router
}

/// Build a request the way the admin console sends it.
pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-forwarded-for", TEST_CLIENT_IP);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .expect("build request"),
        None => builder.body(Body::empty()).expect("build request"),
    }
}

pub async fn send(app: &TestApp, req: Request<Body>) -> Response {
    app.router.clone().oneshot(req).await.expect("router is infallible")
}

pub async fn read_json(resp: Response) -> Value {
    let body_bytes = body::to_bytes(resp.into_body(), 1024 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body_bytes).expect("expected valid json body")
}

/// Assert that a response is an error JSON with the expected status and error string.
pub async fn assert_error_response(resp: Response, expected_status: StatusCode, expected_error: &str) {
    // Check status first
    assert_eq!(resp.status(), expected_status);
    let (parts, body_stream) = resp.into_parts();
    let body_bytes = body::to_bytes(body_stream, 1024 * 1024).await.expect("read body");
    let ct = parts.headers.get("content-type").and_then(|v| v.to_str().ok()).unwrap_or("");
    assert!(ct.starts_with("application/json"), "unexpected content-type: {ct}");
    let json: Value = serde_json::from_slice(&body_bytes).expect("expected valid json body for error");
    let err_field = json.get("error").and_then(|v| v.as_str()).unwrap_or("");
    assert_eq!(err_field, expected_error, "unexpected error field: {err_field}");
    assert!(json.get("success").is_none(), "error bodies carry no success flag");
}

/// Poll `check` until it returns true; background follow-ups run detached.
pub async fn eventually<F, Fut>(mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for _ in 0..100 {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}

/// Give detached tasks a chance to run before asserting that nothing happened.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}
