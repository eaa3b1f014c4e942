//! HTTP contract tests
//!
//! Requests go through the full router with `tower::ServiceExt::oneshot`;
//! no socket is opened.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use fz152_api::{create_router, AppContext};
use fz152_domain::AppConfig;
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.anonymizer.hash_salt = Some("http-tests".to_string());
    config
}

fn router_with(config: AppConfig) -> Router {
    create_router(Arc::new(AppContext::new(config).unwrap()))
}

fn router() -> Router {
    router_with(test_config())
}

fn post_json(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

#[tokio::test]
async fn test_health() {
    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let (status, body) = send(router(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

/// Tests the anonymize endpoint contract.
///
/// # Test Steps
/// 1. Post a text with a name and a passport number
/// 2. Verify a 200 response with only `anonymized_text`
/// 3. Verify both placeholders are present
#[tokio::test]
async fn test_anonymize_endpoint() {
    let body = json!({"text": "Меня зовут Иван Петров, мой паспорт 4500 123456."}).to_string();
    let (status, body) = send(router(), post_json("/anonymize", body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"anonymized_text": "Меня зовут <PERSON>, мой паспорт <PASSPORT_RF>."})
    );
}

/// Tests the audit endpoint contract.
///
/// # Test Steps
/// 1. Post a Cyrillic text with one name
/// 2. Verify the entity type, character offsets and score
/// 3. Verify the value itself is not echoed back
#[tokio::test]
async fn test_audit_endpoint() {
    let body = json!({"text": "Меня зовут Иван Петров"}).to_string();
    let (status, body) = send(router(), post_json("/audit", body)).await;

    assert_eq!(status, StatusCode::OK);
    let entities = body["entities"].as_array().unwrap();
    assert_eq!(entities.len(), 1);
    assert_eq!(entities[0]["entity_type"], "PERSON");
    assert_eq!(entities[0]["start"], 11);
    assert_eq!(entities[0]["end"], 22);
    assert!((entities[0]["score"].as_f64().unwrap() - 0.85).abs() < 1e-9);
    assert!(!body.to_string().contains("Иван"));
}

#[tokio::test]
async fn test_empty_text() {
    let (status, body) = send(router(), post_json("/anonymize", r#"{"text": ""}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"anonymized_text": ""}));

    let (status, body) = send(router(), post_json("/audit", r#"{"text": ""}"#)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"entities": []}));
}

/// Tests request rejection by the extractors.
///
/// # Test Steps
/// 1. Post malformed JSON
/// 2. Post JSON without the `text` field
/// 3. Verify both are client errors and never reach the pipeline
#[tokio::test]
async fn test_malformed_requests_rejected() {
    let (status, _) = send(router(), post_json("/anonymize", "{not json")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(router(), post_json("/audit", r#"{"content": "x"}"#)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_oversized_body_rejected() {
    let mut config = test_config();
    config.server.max_body_bytes = 64;
    let body = json!({"text": "ИНН компании 7707083893. ".repeat(10)}).to_string();

    let (status, _) = send(router_with(config), post_json("/anonymize", body)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}

/// Tests that the parallel analysis mode answers like the sequential one.
///
/// # Test Steps
/// 1. Build one router per mode
/// 2. Post the same text to both
/// 3. Verify identical responses
#[tokio::test]
async fn test_parallel_mode_matches_sequential() {
    let mut parallel = test_config();
    parallel.analyzer.parallel = true;
    let text = json!({"text": "Перевод на IBAN DE89370400440532013000 и CVV 123."}).to_string();

    let (_, sequential_body) = send(router(), post_json("/anonymize", text.clone())).await;
    let (status, parallel_body) = send(router_with(parallel), post_json("/anonymize", text)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(parallel_body, sequential_body);
    assert_eq!(
        parallel_body["anonymized_text"],
        "Перевод на IBAN <BANK_ACCOUNT> и CVV <CVV>."
    );
}
