//! End-to-end tests for `GET /api/classify-number`.

mod common;

use numeris_core::FALLBACK_FACT;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{config_with_facts, spawn_default, spawn_server, unreachable_base_url};

async fn get_json(url: &str) -> (StatusCode, Value) {
    let response = reqwest::get(url).await.unwrap();
    let status = response.status();
    assert_eq!(response.headers()["content-type"], "application/json");
    (status, response.json().await.unwrap())
}

#[tokio::test]
async fn test_armstrong_odd() {
    let server = spawn_default().await;

    let (status, body) = get_json(&server.url("/api/classify-number?number=153")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "number": 153,
            "is_prime": false,
            "is_perfect": false,
            "properties": ["armstrong", "odd"],
            "digit_sum": 9,
            "fun_fact": "153 is a narcissistic number."
        })
    );

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_perfect_even() {
    let server = spawn_default().await;

    let (status, body) = get_json(&server.url("/api/classify-number?number=28")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_perfect"], true);
    assert_eq!(body["is_prime"], false);
    assert_eq!(body["properties"], json!(["even"]));
    assert_eq!(body["digit_sum"], 10);
    assert_eq!(body["fun_fact"], "28 is the second perfect number.");

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_negative_armstrong() {
    let server = spawn_default().await;

    let (status, body) = get_json(&server.url("/api/classify-number?number=-371")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["number"], -371);
    assert_eq!(body["properties"], json!(["armstrong", "odd"]));
    assert_eq!(body["digit_sum"], 11);
    assert_eq!(body["fun_fact"], "-371 is negative.");

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_non_integer_is_rejected() {
    let server = spawn_default().await;

    let (status, body) = get_json(&server.url("/api/classify-number?number=abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"number": "abc", "error": true}));

    let (status, body) = get_json(&server.url("/api/classify-number?number=1.5")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"number": "1.5", "error": true}));

    // Echo is the decoded, untrimmed value.
    let (status, body) = get_json(&server.url("/api/classify-number?number=%2012a")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"number": " 12a", "error": true}));

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_missing_input_is_rejected() {
    let server = spawn_default().await;

    for path in [
        "/api/classify-number",
        "/api/classify-number?number=",
        "/api/classify-number?number",
        "/api/classify-number?number=+++",
        "/api/classify-number?other=5",
    ] {
        let (status, body) = get_json(&server.url(path)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{path}");
        assert_eq!(body, json!({"number": "missing", "error": true}), "{path}");
    }

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_first_number_param_wins() {
    let server = spawn_default().await;

    let (status, body) =
        get_json(&server.url("/api/classify-number?x=1&number=28&number=153")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["number"], 28);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_fact_error_falls_back() {
    let server = spawn_default().await;

    // The fake answers 500 for 7 and omits the text for 4.
    for (number, properties) in [(7, json!(["armstrong", "odd"])), (4, json!(["armstrong", "even"]))] {
        let (status, body) =
            get_json(&server.url(&format!("/api/classify-number?number={number}"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["properties"], properties);
        assert_eq!(body["fun_fact"], FALLBACK_FACT);
    }

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_fact_outage_keeps_status() {
    let server = spawn_server(&config_with_facts(unreachable_base_url().await)).await;

    let (status, body) = get_json(&server.url("/api/classify-number?number=153")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["properties"], json!(["armstrong", "odd"]));
    assert_eq!(body["fun_fact"], FALLBACK_FACT);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_facts_disabled() {
    let mut config = config_with_facts(unreachable_base_url().await);
    config.facts.enabled = false;
    let server = spawn_server(&config).await;

    let (status, body) = get_json(&server.url("/api/classify-number?number=6")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_perfect"], true);
    assert_eq!(body["fun_fact"], FALLBACK_FACT);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_i32_bounds() {
    let server = spawn_default().await;

    let (status, body) = get_json(&server.url("/api/classify-number?number=-2147483648")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["digit_sum"], 47);
    assert_eq!(body["properties"], json!(["even"]));

    let (status, body) = get_json(&server.url("/api/classify-number?number=2147483648")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"number": "2147483648", "error": true}));

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_path_case_and_trailing_slash() {
    let server = spawn_default().await;

    for path in ["/API/Classify-Number/?number=28", "/api/classify-number/?number=28"] {
        let (status, body) = get_json(&server.url(path)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["number"], 28);
        assert_eq!(body["is_perfect"], true);
    }

    server.stop().await.unwrap();
}
