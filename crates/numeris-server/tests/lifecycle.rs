//! End-to-end tests for probes, routing edges, CORS, and shutdown.

mod common;

use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

use common::{config_with_facts, spawn_default, spawn_numbers_api, spawn_server};

#[tokio::test]
async fn test_health_and_ready() {
    let server = spawn_default().await;

    let response = reqwest::get(server.url("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "numeris");
    assert_eq!(body["version"], numeris_server::VERSION);
    assert!(body["uptime_seconds"].is_u64());

    let response = reqwest::get(server.url("/ready")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.json::<Value>().await.unwrap(), json!({"ready": true}));

    server.readiness.set_ready(false);
    let response = reqwest::get(server.url("/ready")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json::<Value>().await.unwrap(), json!({"ready": false}));

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_unknown_path() {
    let server = spawn_default().await;

    let response = reqwest::get(server.url("/api/classify")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({"error": "Not Found", "path": "/api/classify"})
    );

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_wrong_method() {
    let server = spawn_default().await;
    let client = reqwest::Client::new();

    for method in [Method::POST, Method::HEAD, Method::DELETE] {
        let response = client
            .request(method.clone(), server.url("/api/classify-number?number=1"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED, "{method}");
        assert_eq!(response.headers()["allow"], "GET");
    }

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_request_id() {
    let server = spawn_default().await;
    let client = reqwest::Client::new();

    let response = client
        .get(server.url("/api/classify-number?number=153"))
        .header("x-request-id", "trace-me-42")
        .send()
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "trace-me-42");

    let first = client.get(server.url("/health")).send().await.unwrap();
    let second = client.get(server.url("/health")).send().await.unwrap();
    let first = first.headers()["x-request-id"].to_str().unwrap().to_string();
    let second = second.headers()["x-request-id"].to_str().unwrap().to_string();
    assert!(!first.is_empty());
    assert_ne!(first, second);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_cors_preflight_default_policy() {
    let server = spawn_default().await;
    let client = reqwest::Client::new();

    let response = client
        .request(Method::OPTIONS, server.url("/api/classify-number"))
        .header("origin", "https://frontend.example")
        .header("access-control-request-method", "GET")
        .header("access-control-request-headers", "x-requested-with")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let headers = response.headers();
    assert!(!headers.contains_key("content-type"));
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert!(headers["access-control-allow-methods"]
        .to_str()
        .unwrap()
        .contains("GET"));
    assert_eq!(headers["access-control-allow-headers"], "x-requested-with");
    assert_eq!(headers["access-control-max-age"], "86400");
    assert!(headers.contains_key("x-request-id"));

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_cors_simple_request() {
    let server = spawn_default().await;
    let client = reqwest::Client::new();

    let response = client
        .get(server.url("/api/classify-number?number=28"))
        .header("origin", "https://frontend.example")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["access-control-allow-origin"], "*");

    let response = client.get(server.url("/health")).send().await.unwrap();
    assert!(response.headers().get("access-control-allow-origin").is_none());

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_cors_restricted_policy() {
    let mut config = config_with_facts(spawn_numbers_api().await);
    config.cors.allow_any_origin = false;
    config.cors.allowed_origins = vec!["https://app.example".to_string()];
    let server = spawn_server(&config).await;
    let client = reqwest::Client::new();

    let preflight = |origin: &'static str| {
        client
            .request(Method::OPTIONS, server.url("/api/classify-number"))
            .header("origin", origin)
            .header("access-control-request-method", "GET")
            .send()
    };

    let allowed = preflight("https://app.example").await.unwrap();
    assert_eq!(allowed.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        allowed.headers()["access-control-allow-origin"],
        "https://app.example"
    );

    let denied = preflight("https://evil.example").await.unwrap();
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);

    let simple = client
        .get(server.url("/api/classify-number?number=28"))
        .header("origin", "https://evil.example")
        .send()
        .await
        .unwrap();
    assert_eq!(simple.status(), StatusCode::OK);
    assert!(simple.headers().get("access-control-allow-origin").is_none());

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_graceful_shutdown_stops_accepting() {
    let server = spawn_default().await;
    let url = server.url("/health");
    let readiness = server.readiness.clone();

    assert_eq!(reqwest::get(&url).await.unwrap().status(), StatusCode::OK);

    tokio::time::timeout(Duration::from_secs(5), server.stop())
        .await
        .expect("server should stop within its shutdown timeout")
        .unwrap();
    assert!(!readiness.is_ready());

    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .build()
        .unwrap();
    assert!(client.get(&url).send().await.is_err());
}
