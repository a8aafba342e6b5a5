use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use ayurscan_service::config::HttpSettings;
use ayurscan_service::services::providers::{mock::MockVisionProvider, VisionProvider};
use ayurscan_service::services::Analyzer;
use ayurscan_service::startup::{build_router, AppState};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tower::util::ServiceExt;

const INDEX_HTML: &str = "<!doctype html><title>AyurScan test client</title>";
const APP_JS: &str = "console.log('ayurscan');";

/// A throwaway static directory with an index page and one asset.
fn static_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("ayurscan-static-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(dir.join("assets")).unwrap();
    std::fs::write(dir.join("index.html"), INDEX_HTML).unwrap();
    std::fs::write(dir.join("assets").join("app.js"), APP_JS).unwrap();
    dir
}

fn state() -> AppState {
    let provider: Arc<dyn VisionProvider> = Arc::new(MockVisionProvider::with_text("{}"));
    AppState::new(Analyzer::new(Some(provider)))
}

fn app(max_body_bytes: usize) -> Router {
    let http = HttpSettings {
        static_dir: static_dir(),
        max_body_bytes,
    };
    build_router(state(), &http)
}

async fn get(router: Router, uri: &str) -> (StatusCode, String) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8_lossy(&bytes).to_string())
}

async fn post_json(router: Router, body: String) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/analyze")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn root_serves_index() {
    let (status, body) = get(app(1024), "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, INDEX_HTML);
}

#[tokio::test]
async fn assets_are_served_from_the_static_dir() {
    let (status, body) = get(app(1024), "/assets/app.js").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, APP_JS);
}

#[tokio::test]
async fn unknown_paths_fall_back_to_index() {
    let (status, body) = get(app(1024), "/history/today").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, INDEX_HTML);
}

#[tokio::test]
async fn default_settings_serve_the_bundled_client_from_any_directory() {
    // Every other test here uses absolute paths, so moving away is safe.
    std::env::set_current_dir(std::env::temp_dir()).unwrap();

    let router = build_router(state(), &HttpSettings::default());
    let (status, body) = get(router, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<title>AyurScan</title>"));
}

#[tokio::test]
async fn get_on_the_analyze_path_serves_the_client() {
    let (status, body) = get(app(1024), "/api/analyze").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, INDEX_HTML);
}

#[tokio::test]
async fn falsy_image_values_count_as_missing() {
    for payload in [
        r#"{"imageBase64": false}"#,
        r#"{"imageBase64": 0}"#,
        r#"{"imageBase64": null}"#,
        r#"{"imageBase64": ""}"#,
    ] {
        let (status, body) = post_json(app(1024), payload.to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "payload: {}", payload);
        assert_eq!(body["error"], "imageBase64 is required");
    }
}

#[tokio::test]
async fn api_routes_win_over_static_files() {
    let (status, body) = get(app(1024), "/health").await;
    assert_eq!(status, StatusCode::OK);
    let health: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(health["hasKey"], true);
}

#[tokio::test]
async fn malformed_json_is_rejected_with_error_body() {
    let (status, body) = post_json(app(1024), "{ not json".to_string()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let image = "A".repeat(4096);
    let payload = serde_json::json!({ "imageBase64": image }).to_string();

    let (status, body) = post_json(app(1024), payload).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn analysis_is_returned_through_the_router() {
    let payload = serde_json::json!({ "imageBase64": "aGVsbG8=" }).to_string();

    let (status, body) = post_json(app(1024), payload).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!({}));
}
