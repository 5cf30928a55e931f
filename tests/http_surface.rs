//! Routing edges: health, CORS, fallbacks, request IDs, static client.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

mod common;

use common::{spawn_configured, spawn_memory_server, SlowStore};

#[tokio::test]
async fn test_health_reports_status_and_timestamp() {
    let server = spawn_memory_server().await;

    for path in ["/health", "/api/health"] {
        let res = server.client.get(server.url(path)).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["store"], "memory");
        let timestamp = body["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }
}

#[tokio::test]
async fn test_api_prefix_serves_same_items() {
    let server = spawn_memory_server().await;

    let res = server
        .client
        .post(server.url("/api/items"))
        .json(&json!({ "name": "Relay", "quantity": 4 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await.unwrap();

    let items: Vec<Value> = server
        .client
        .get(server.url("/items"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(items, vec![created]);
}

#[tokio::test]
async fn test_cors_headers_on_every_response() {
    let server = spawn_memory_server().await;

    let res = server
        .client
        .get(server.url("/items"))
        .header("origin", "http://elsewhere.example")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");

    let missing = server
        .client
        .get(server.url("/items/not-an-id"))
        .header("origin", "http://elsewhere.example")
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::BAD_REQUEST);
    assert_eq!(missing.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_options_answered_with_empty_200() {
    let server = spawn_memory_server().await;

    let preflight = server
        .client
        .request(Method::OPTIONS, server.url("/items/65a1f0c2e4b0a1b2c3d4e5f6"))
        .header("origin", "http://elsewhere.example")
        .header("access-control-request-method", "DELETE")
        .send()
        .await
        .unwrap();
    assert_eq!(preflight.status(), StatusCode::OK);
    assert_eq!(preflight.headers()["access-control-allow-origin"], "*");
    let allowed = preflight.headers()["access-control-allow-methods"]
        .to_str()
        .unwrap()
        .to_string();
    assert!(allowed.contains("DELETE"));

    for path in ["/items", "/anything/else"] {
        let bare = server
            .client
            .request(Method::OPTIONS, server.url(path))
            .send()
            .await
            .unwrap();
        assert_eq!(bare.status(), StatusCode::OK);
        assert!(bare.bytes().await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn test_unknown_route_404_and_wrong_method_405() {
    let server = spawn_memory_server().await;

    let res = server.client.get(server.url("/widgets")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "route_not_found");

    let res = server.client.post(server.url("/nothing/here")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    for (method, path) in [
        (Method::PATCH, "/items"),
        (Method::DELETE, "/health"),
        (Method::POST, "/items/65a1f0c2e4b0a1b2c3d4e5f6"),
    ] {
        let res = server
            .client
            .request(method.clone(), server.url(path))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED, "{method} {path}");
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["error"], "method_not_allowed");
    }
}

#[tokio::test]
async fn test_request_id_is_returned() {
    let server = spawn_memory_server().await;

    let generated = server.client.get(server.url("/health")).send().await.unwrap();
    assert!(generated.headers().contains_key("x-request-id"));

    let echoed = server
        .client
        .get(server.url("/health"))
        .header("x-request-id", "trace-me-123")
        .send()
        .await
        .unwrap();
    assert_eq!(echoed.headers()["x-request-id"], "trace-me-123");
}

#[tokio::test]
async fn test_static_client_is_served() {
    let server = spawn_memory_server().await;

    let res = server.client.get(server.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let html = res.text().await.unwrap();
    assert!(html.contains("js/main.js"));

    let script = server.client.get(server.url("/js/main.js")).send().await.unwrap();
    assert_eq!(script.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_oversized_body_is_413_with_error_body() {
    let server = spawn_memory_server().await;
    let name = "x".repeat(70 * 1024);

    let res = server
        .client
        .post(server.url("/items"))
        .json(&json!({ "name": name, "quantity": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
    let error: Value = res.json().await.unwrap();
    assert_eq!(error["error"], "payload_too_large");
    assert!(error["message"].as_str().is_some());

    let items: Vec<Value> = server
        .client
        .get(server.url("/items"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_undecodable_id_is_invalid_identifier() {
    let server = spawn_memory_server().await;
    let url = server.url("/items/%FF%FE");

    for method in [Method::GET, Method::DELETE] {
        let res = server.client.request(method, &url).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let error: Value = res.json().await.unwrap();
        assert_eq!(error["error"], "invalid_identifier");
    }

    let res = server
        .client
        .put(&url)
        .json(&json!({ "name": "Hinge", "quantity": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let error: Value = res.json().await.unwrap();
    assert_eq!(error["error"], "invalid_identifier");
}

#[tokio::test]
async fn test_slow_request_times_out_with_error_body() {
    let store = Arc::new(SlowStore::new(Duration::from_secs(3)));
    let server = spawn_configured(store, |config| config.timeouts.request_secs = 1).await;

    let res = server
        .client
        .get(server.url("/items"))
        .header("origin", "http://elsewhere.example")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::REQUEST_TIMEOUT);
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
    let error: Value = res.json().await.unwrap();
    assert_eq!(error["error"], "request_timeout");
    assert!(error["message"].as_str().unwrap().contains("1s"));
}
