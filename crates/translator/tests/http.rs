//! Integration tests for the HTTP layer: exercises the real `axum`
//! router (request-id middleware, CORS, routing, JSON (de)serialization)
//! without spawning a TCP listener.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use translator_core::config::Config;

/// A configured LLM key is enough to clear the orchestrator's step-5
/// circuit/API-key gate (§4.10) so raw-syntax/deterministic queries reach
/// their own short-circuits; `build_services` never dials out, so this
/// never actually calls the LLM endpoint.
async fn test_app() -> axum::Router {
    let config = Config {
        llm_api_key: Some("test-key".to_string()),
        llm_base_url: "https://example.invalid".to_string(),
        llm_timeout: std::time::Duration::from_secs(15),
        database_url: None,
        log_all_translations: false,
        run_query_validation_checks: false,
    };
    let services = translator::build_services(config).await;
    translator::router(services, None)
}

/// No LLM key at all: the step-5 gate sends every query straight to the
/// fallback builder (§4.10), regardless of whether it would otherwise
/// have resolved deterministically or via raw-syntax passthrough.
async fn test_app_no_llm_key() -> axum::Router {
    let config = Config {
        llm_api_key: None,
        llm_base_url: "https://example.invalid".to_string(),
        llm_timeout: std::time::Duration::from_secs(15),
        database_url: None,
        log_all_translations: false,
        run_query_validation_checks: false,
    };
    let services = translator::build_services(config).await;
    translator::router(services, None)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn healthz_reports_ok() {
    let app = test_app().await;
    let response = app
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn translate_resolves_deterministically() {
    let app = test_app().await;
    let request = Request::builder()
        .method("POST")
        .uri("/translate")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "query": "mono red creatures" }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["source"], "deterministic");
    assert!(body["scryfallQuery"].as_str().unwrap().contains("c=r"));
}

#[tokio::test]
async fn translate_falls_back_for_every_query_without_an_llm_key() {
    let app = test_app_no_llm_key().await;
    let request = Request::builder()
        .method("POST")
        .uri("/translate")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "query": "mono red creatures" }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["source"], "fallback");
}

#[tokio::test]
async fn translate_rejects_a_query_shorter_than_three_characters_with_success_false() {
    let app = test_app().await;
    let request = Request::builder()
        .method("POST")
        .uri("/translate")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "query": "ab" }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn translate_rejects_an_empty_query_with_bad_request() {
    let app = test_app().await;
    let request = Request::builder()
        .method("POST")
        .uri("/translate")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "query": "" }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn inbound_request_id_is_echoed_on_the_response() {
    let app = test_app().await;
    let request = Request::builder()
        .uri("/healthz")
        .header("x-request-id", "fixed-id-123")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.headers().get("x-request-id").unwrap(), "fixed-id-123");
}

#[tokio::test]
async fn missing_request_id_is_generated() {
    let app = test_app().await;
    let response = app
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert!(response.headers().get("x-request-id").is_some());
}

#[tokio::test]
async fn raw_scryfall_syntax_passes_through() {
    let app = test_app().await;
    let request = Request::builder()
        .method("POST")
        .uri("/translate")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "query": "t:creature c:r mv<3" }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["source"], "raw_syntax");
}
