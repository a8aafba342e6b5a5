mod common;

use common::{TestApp, TEST_API_KEY};

const UNUSED_API_BASE: &str = "http://127.0.0.1:9";

#[tokio::test]
async fn health_check_reports_key_present() {
    let app = TestApp::spawn(UNUSED_API_BASE, Some(TEST_API_KEY)).await;

    let response = app
        .client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body, serde_json::json!({ "status": "ok", "hasKey": true }));
}

#[tokio::test]
async fn health_check_reports_key_missing() {
    let app = TestApp::spawn(UNUSED_API_BASE, None).await;

    let response = app
        .client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body, serde_json::json!({ "status": "ok", "hasKey": false }));
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = TestApp::spawn(UNUSED_API_BASE, None).await;

    let response = app
        .client
        .get(format!("{}/health", app.address))
        .header("x-request-id", "req-42")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "req-42"
    );
}

#[tokio::test]
async fn metrics_endpoint_renders_prometheus_text() {
    let app = TestApp::spawn(UNUSED_API_BASE, None).await;

    // Make sure at least one request has been recorded.
    app.client
        .get(format!("{}/health", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    let response = app
        .client
        .get(format!("{}/metrics", app.address))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    let body = response.text().await.unwrap();
    assert!(body.contains("http_requests_total"));
}
