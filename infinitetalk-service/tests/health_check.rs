//! Integration tests for the operational endpoints.

mod common;

use common::{asset_server, generate_body, TestApp, FACE_BYTES, VOICE_BYTES};
use infinitetalk_service::services::engines::MockEngine;
use infinitetalk_service::services::init_metrics;

#[tokio::test]
async fn health_check_returns_ok() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "infinitetalk-service");
    assert_eq!(body["engine"], "mock");

    app.cleanup().await;
}

#[tokio::test]
async fn health_check_echoes_request_id() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(format!("{}/health", app.address))
        .header("x-request-id", "probe-42")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("probe-42")
    );

    app.cleanup().await;
}

#[tokio::test]
async fn responses_carry_generated_request_id() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to send request");

    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .expect("x-request-id header missing");
    assert!(!request_id.is_empty());

    app.cleanup().await;
}

#[tokio::test]
async fn readiness_check_returns_ok() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(format!("{}/ready", app.address))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ready");

    app.cleanup().await;
}

#[tokio::test]
async fn readiness_check_reports_unhealthy_engine() {
    let app = TestApp::spawn_with(MockEngine::failing("weights not loaded"), |_| {}).await;

    let response = app
        .client
        .get(format!("{}/ready", app.address))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 503);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "unavailable");
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .contains("weights not loaded"));

    app.cleanup().await;
}

#[tokio::test]
async fn metrics_endpoint_exports_generation_metrics() {
    // Only this test in the binary installs the process-wide recorder.
    init_metrics().expect("Failed to install metrics recorder");
    let server = asset_server(FACE_BYTES, VOICE_BYTES).await;
    let app = TestApp::spawn().await;

    let generated = app.post_generate(&generate_body(&server)).await;
    assert_eq!(generated.status().as_u16(), 200);

    let response = app
        .client
        .get(format!("{}/metrics", app.address))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    let body = response.text().await.expect("Failed to read body");
    assert!(
        body.contains(r#"generation_requests_total{outcome="completed"}"#),
        "{body}"
    );
    assert!(body.contains("asset_download_bytes_total"), "{body}");
    assert!(body.contains("http_requests_total"), "{body}");

    app.cleanup().await;
}
