//! # Integration Tests for evreg-api
//!
//! Drives the full router: health probes, the copyright claim scenario over
//! HTTP, status mapping for each registry error, authentication rules,
//! and the OpenAPI document.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use evreg_api::state::{AppConfig, AppState};

const TOKEN: &str = "s3cret";
const ALICE: &str = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM";
const BOB: &str = "ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG";
const HASH: &str = "0x1234567890abcdef1234567890abcdef1234567890abcdef1234567890abcdef";
const OTHER_HASH: &str = "0x9876543210abcdef1234567890abcdef1234567890abcdef1234567890abcdef";

/// Helper: build the test app with a configured bearer secret.
fn test_app() -> Router {
    let config = AppConfig {
        auth_token: Some(TOKEN.to_string()),
        ..AppConfig::default()
    };
    evreg_api::app(AppState::with_config(config))
}

/// Helper: build the test app in development mode (no secret).
fn test_app_dev_mode() -> Router {
    evreg_api::app(AppState::new())
}

fn bearer(submitter: &str) -> String {
    format!("Bearer {submitter}:{TOKEN}")
}

/// Helper: send a request and return status plus parsed JSON body.
async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = auth {
        builder = builder.header("Authorization", value);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("Content-Type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, value)
}

fn screenshot(id: &str) -> Value {
    json!({
        "id": id,
        "description": "Screenshot of unauthorized use",
        "content_hash": HASH,
        "evidence_type": "image",
        "url": "https://example.com/evidence.png",
    })
}

async fn submit_as(app: &Router, submitter: &str, body: Value) -> (StatusCode, Value) {
    send(
        app,
        Method::POST,
        "/v1/evidence",
        Some(&bearer(submitter)),
        Some(body),
    )
    .await
}

// -- Health Probes ------------------------------------------------------------

#[tokio::test]
async fn test_health_probes() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/health/liveness", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ok".into()));

    let (status, body) = send(&app, Method::GET, "/health/readiness", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("ready".into()));
}

#[tokio::test]
async fn test_health_probe_ignores_bad_token() {
    let app = test_app();
    let (status, _) = send(
        &app,
        Method::GET,
        "/health/liveness",
        Some("Bearer alice:wrong"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

// -- Scenario -----------------------------------------------------------------

#[tokio::test]
async fn test_copyright_claim_scenario() {
    let app = test_app();

    let (status, body) = submit_as(&app, ALICE, screenshot("evidence-123")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], "evidence-123");

    let (status, body) = submit_as(
        &app,
        BOB,
        json!({
            "id": "evidence-123",
            "description": "Another piece of evidence",
            "content_hash": OTHER_HASH,
            "evidence_type": "document",
            "url": "https://example.com/evidence2.pdf",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");

    let update = json!({"description": "Updated", "url": "https://x/u.png"});
    let (status, body) = send(
        &app,
        Method::PUT,
        "/v1/evidence/evidence-123",
        Some(&bearer(BOB)),
        Some(update.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");

    let (status, body) = send(
        &app,
        Method::PUT,
        "/v1/evidence/evidence-123",
        Some(&bearer(ALICE)),
        Some(update),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "evidence-123");

    let (status, body) = send(&app, Method::GET, "/v1/evidence/evidence-123", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["submitter"], ALICE);
    assert_eq!(body["description"], "Updated");
    assert_eq!(body["url"], "https://x/u.png");
    assert_eq!(body["content_hash"], HASH);
    assert_eq!(body["evidence_type"], "image");
    assert!(body["submission_date"].is_string());

    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/evidence/evidence-123/verify",
        None,
        Some(json!({"content_hash": HASH})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matches"], true);

    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/evidence/evidence-123/verify",
        None,
        Some(json!({"content_hash": OTHER_HASH})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matches"], false);

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/v1/submitters/{ALICE}/evidence"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["submitter"], ALICE);
    assert_eq!(body["evidence_ids"], json!(["evidence-123"]));

    let (status, _) = send(
        &app,
        Method::GET,
        &format!("/v1/submitters/{BOB}/evidence"),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_listing_keeps_submission_order() {
    let app = test_app();
    for id in ["c", "a", "b"] {
        let (status, _) = submit_as(&app, ALICE, screenshot(id)).await;
        assert_eq!(status, StatusCode::CREATED);
    }
    let (_, body) = send(
        &app,
        Method::GET,
        &format!("/v1/submitters/{ALICE}/evidence"),
        None,
        None,
    )
    .await;
    assert_eq!(body["evidence_ids"], json!(["c", "a", "b"]));
}

// -- Error Mapping ------------------------------------------------------------

#[tokio::test]
async fn test_get_unknown_evidence_is_404() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/v1/evidence/nope", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_update_unknown_evidence_is_404() {
    let app = test_app();
    let (status, _) = send(
        &app,
        Method::PUT,
        "/v1/evidence/nope",
        Some(&bearer(ALICE)),
        Some(json!({"description": "d", "url": "u"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_verify_unknown_evidence_is_404() {
    let app = test_app();
    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/evidence/nope/verify",
        None,
        Some(json!({"content_hash": HASH})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_verify_is_case_sensitive() {
    let app = test_app();
    submit_as(&app, ALICE, screenshot("evidence-1")).await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/evidence/evidence-1/verify",
        None,
        Some(json!({"content_hash": HASH.to_uppercase()})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matches"], false);
}

#[tokio::test]
async fn test_malformed_json_is_400() {
    let app = test_app();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/v1/evidence")
                .header("Authorization", bearer(ALICE))
                .header("Content-Type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_field_is_client_error() {
    let app = test_app();
    let (status, _) = submit_as(&app, ALICE, json!({"id": "evidence-1"})).await;
    assert!(status.is_client_error(), "got {status}");
    assert_ne!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_blank_evidence_id_is_422() {
    let app = test_app();
    let (status, body) = submit_as(&app, ALICE, screenshot("  ")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_empty_optional_fields_accepted() {
    let app = test_app();
    let (status, _) = submit_as(
        &app,
        ALICE,
        json!({
            "id": "evidence-1",
            "description": "",
            "content_hash": "",
            "evidence_type": "",
            "url": "",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/evidence/evidence-1/verify",
        None,
        Some(json!({"content_hash": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["matches"], true);
}

// -- Authentication -----------------------------------------------------------

#[tokio::test]
async fn test_anonymous_submit_is_401() {
    let app = test_app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/evidence",
        None,
        Some(screenshot("evidence-1")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_anonymous_update_is_401() {
    let app = test_app();
    submit_as(&app, ALICE, screenshot("evidence-1")).await;
    let (status, _) = send(
        &app,
        Method::PUT,
        "/v1/evidence/evidence-1",
        None,
        Some(json!({"description": "d", "url": "u"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_wrong_secret_is_401_and_stores_nothing() {
    let app = test_app();
    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/evidence",
        Some(&format!("Bearer {ALICE}:guess")),
        Some(screenshot("evidence-1")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/v1/evidence/evidence-1", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dev_mode_uses_bearer_value_as_submitter() {
    let app = test_app_dev_mode();
    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/evidence",
        Some("Bearer did:key:z6MkAlice"),
        Some(screenshot("evidence-1")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, body) = send(&app, Method::GET, "/v1/evidence/evidence-1", None, None).await;
    assert_eq!(body["submitter"], "did:key:z6MkAlice");
}

// -- OpenAPI ------------------------------------------------------------------

#[tokio::test]
async fn test_openapi_document_served() {
    let app = test_app();
    let (status, body) = send(&app, Method::GET, "/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "Evidence Registry API");
    assert!(body["paths"]["/v1/evidence"].is_object());
}
