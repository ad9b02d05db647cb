//! End-to-end tests for the HTTP API.
//!
//! Each test spawns the router on an ephemeral port backed by an in-memory
//! statistics store and a provider chain built from mocks (or a wiremock
//! stand-in for Gemini) and talks to it with reqwest.

use std::path::Path;
use std::sync::Arc;

use base64::Engine;
use serde_json::{json, Value};
use unmark_api::{build_router, AppState, MemoryKvStore, StatisticsStore, DEFAULT_STATIC_DIR};
use unmark_core::defaults::MAX_BODY_BYTES;
use unmark_core::Statistics;
use unmark_providers::{GeminiConfig, GeminiProvider, MockProvider, ProviderChain};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// 1x1 transparent PNG.
const PNG_B64: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";
const INPUT_B64: &str = "ZmFrZS1qcGVnLWJ5dGVz";

struct TestServer {
    base_url: String,
    client: reqwest::Client,
}

impl TestServer {
    async fn get_stats(&self) -> Statistics {
        self.client
            .get(format!("{}/api/stats", self.base_url))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap()
    }

    async fn remove(&self, body: Value) -> reqwest::Response {
        self.client
            .post(format!("{}/api/remove-watermark", self.base_url))
            .json(&body)
            .send()
            .await
            .unwrap()
    }
}

async fn spawn_server_with(
    chain: ProviderChain,
    static_dir: &Path,
    max_body_bytes: usize,
) -> TestServer {
    let stats = StatisticsStore::new(Arc::new(MemoryKvStore::new()));
    let router = build_router(AppState::new(chain, stats), static_dir, max_body_bytes);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    // Give server a moment to start
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    TestServer {
        base_url,
        client: reqwest::Client::new(),
    }
}

async fn spawn_server(chain: ProviderChain) -> TestServer {
    spawn_server_with(chain, Path::new(DEFAULT_STATIC_DIR), MAX_BODY_BYTES).await
}

fn image_body(removal_text: Option<&str>) -> Value {
    let mut body = json!({ "image": { "data": INPUT_B64, "mime_type": "image/jpeg" } });
    if let Some(text) = removal_text {
        body["removalText"] = json!(text);
    }
    body
}

fn png_bytes() -> Vec<u8> {
    base64::engine::general_purpose::STANDARD
        .decode(PNG_B64)
        .unwrap()
}

// -- Removal --

#[tokio::test]
async fn test_success_with_gemini_returns_png() {
    let gemini_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-test:generateContent"))
        .and(body_partial_json(json!({
            "contents": [{
                "parts": [
                    { "inline_data": { "mime_type": "image/jpeg", "data": INPUT_B64 } },
                    { "text": "Remove logo from this image while preserving the original image quality and content. Keep the image exactly the same except for removing the logo." }
                ]
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "Here is the edited image." },
                    { "inlineData": { "mimeType": "image/png", "data": PNG_B64 } }
                ] }
            }]
        })))
        .expect(1)
        .mount(&gemini_server)
        .await;

    let mut config = GeminiConfig::new("test-key");
    config.base_url = gemini_server.uri();
    config.model = "gemini-test".to_string();
    let chain =
        ProviderChain::default().with_provider(Arc::new(GeminiProvider::new(config).unwrap()));
    let server = spawn_server(chain).await;

    let response = server.remove(image_body(Some("logo"))).await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()["content-type"], "image/png");
    assert!(response.headers().contains_key("x-request-id"));
    let bytes = response.bytes().await.unwrap();
    assert_eq!(bytes.to_vec(), png_bytes());

    let stats = server.get_stats().await;
    assert_eq!(stats.total_runs, 1);
    assert_eq!(stats.successful_runs, 1);
    assert_eq!(stats.failed_runs, 0);
    assert!(stats.last_run_timestamp.is_some());
}

#[tokio::test]
async fn test_missing_image_is_500_and_counts_failure() {
    let server = spawn_server(
        ProviderChain::default().with_provider(Arc::new(MockProvider::succeeding("gemini", PNG_B64))),
    )
    .await;
    let before = server.get_stats().await;

    let response = server.remove(json!({})).await;

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Image is required");

    let after = server.get_stats().await;
    assert_eq!(after.total_runs, before.total_runs + 1);
    assert_eq!(after.failed_runs, before.failed_runs + 1);
    assert_eq!(after.successful_runs, before.successful_runs);

    let (date, today) = after.daily_stats.iter().next().unwrap();
    assert_eq!(date.len(), 10);
    assert_eq!(today.total, 1);
    assert_eq!(today.failed, 1);
}

#[tokio::test]
async fn test_invalid_json_is_500_with_parse_message() {
    let server = spawn_server(ProviderChain::default()).await;

    let response = server
        .client
        .post(format!("{}/api/remove-watermark", server.base_url))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body:"));

    let stats = server.get_stats().await;
    assert_eq!(stats.total_runs, 1);
    assert_eq!(stats.failed_runs, 1);
}

#[tokio::test]
async fn test_fallback_output_returned_when_primary_fails() {
    let fallback_png = png_bytes();
    let primary = Arc::new(MockProvider::failing("gemini", "quota exceeded"));
    let fallback = Arc::new(MockProvider::succeeding("openai", PNG_B64));
    let chain = ProviderChain::default()
        .with_provider(primary.clone())
        .with_provider(fallback.clone());
    let server = spawn_server(chain).await;

    let response = server.remove(image_body(None)).await;

    assert_eq!(response.status(), 200);
    assert_eq!(response.bytes().await.unwrap().to_vec(), fallback_png);
    assert_eq!(primary.call_count(), 1);
    assert_eq!(fallback.call_count(), 1);
    assert_eq!(primary.instructions(), fallback.instructions());
    assert!(fallback.instructions()[0].starts_with("Remove watermarks from this image"));

    let stats = server.get_stats().await;
    assert_eq!(stats.successful_runs, 1);
    assert_eq!(stats.failed_runs, 0);
}

#[tokio::test]
async fn test_all_providers_failing_is_500_with_last_error() {
    let chain = ProviderChain::default()
        .with_provider(Arc::new(MockProvider::failing("gemini", "quota exceeded")))
        .with_provider(Arc::new(MockProvider::failing("openai", "invalid image")));
    let server = spawn_server(chain).await;

    let response = server.remove(image_body(Some("logo"))).await;

    assert_eq!(response.status(), 500);
    assert_eq!(response.headers()["content-type"], "application/json");
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["error"],
        "Failed to process image with openai: invalid image"
    );
    assert!(body["details"].is_string());

    let stats = server.get_stats().await;
    assert_eq!(stats.total_runs, 1);
    assert_eq!(stats.failed_runs, 1);
    assert_eq!(stats.successful_runs, 0);
}

#[tokio::test]
async fn test_no_provider_configured() {
    let server = spawn_server(ProviderChain::default()).await;

    let response = server.remove(image_body(None)).await;

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "API key not configured");
}

#[tokio::test]
async fn test_undecodable_provider_output_is_500() {
    let chain = ProviderChain::default()
        .with_provider(Arc::new(MockProvider::succeeding("gemini", "***not-base64***")));
    let server = spawn_server(chain).await;

    let response = server.remove(image_body(None)).await;

    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to decode image data"));

    let stats = server.get_stats().await;
    assert_eq!(stats.failed_runs, 1);
}

// -- Statistics --

#[tokio::test]
async fn test_stats_are_zero_and_idempotent_before_any_run() {
    let server = spawn_server(ProviderChain::default()).await;

    let first: Value = server
        .client
        .get(format!("{}/api/stats", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let second = server.get_stats().await;

    assert_eq!(first["totalRuns"], 0);
    assert_eq!(first["successfulRuns"], 0);
    assert_eq!(first["failedRuns"], 0);
    assert!(first["dailyStats"].as_object().unwrap().is_empty());
    assert_eq!(second, Statistics::default());
}

// -- Pages --

#[tokio::test]
async fn test_status_page_renders_counts() {
    let server = spawn_server(
        ProviderChain::default().with_provider(Arc::new(MockProvider::succeeding("gemini", PNG_B64))),
    )
    .await;
    server.remove(image_body(None)).await;
    server.remove(json!({})).await;

    let response = server.client.get(&server.base_url).send().await.unwrap();

    assert_eq!(response.status(), 200);
    assert!(response.headers()["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    let html = response.text().await.unwrap();
    assert!(html.contains(r#"<p id="total-runs">2</p>"#));
    assert!(html.contains(r#"<p id="successful-runs">1</p>"#));
    assert!(html.contains(r#"<p id="failed-runs">1</p>"#));
    assert!(html.contains("50.0%"));
    assert!(html.contains(r#"<script src="/static/dashboard.js"></script>"#));
}

#[tokio::test]
async fn test_static_assets_served() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("dashboard.css"), "body { color: red; }").unwrap();
    let server = spawn_server_with(ProviderChain::default(), dir.path(), MAX_BODY_BYTES).await;

    let response = server
        .client
        .get(format!("{}/static/dashboard.css", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "body { color: red; }");

    let missing = server
        .client
        .get(format!("{}/static/nope.js", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 404);
}

#[tokio::test]
async fn test_default_static_dir_serves_dashboard_script() {
    let server = spawn_server(ProviderChain::default()).await;

    for asset in ["dashboard.js", "dashboard.css"] {
        let response = server
            .client
            .get(format!("{}/static/{}", server.base_url, asset))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200, "{} not served", asset);
    }
}

#[tokio::test]
async fn test_oversized_body_rejected_before_handler() {
    let server =
        spawn_server_with(ProviderChain::default(), Path::new(DEFAULT_STATIC_DIR), 1024).await;

    let data = "A".repeat(4096);
    let response = server
        .remove(json!({ "image": { "data": data, "mime_type": "image/png" } }))
        .await;

    assert_eq!(response.status(), 413);

    let stats = server.get_stats().await;
    assert_eq!(stats.total_runs, 0);
    assert_eq!(stats.failed_runs, 0);
}

#[tokio::test]
async fn test_health_lists_providers() {
    let chain = ProviderChain::default()
        .with_provider(Arc::new(MockProvider::succeeding("gemini", PNG_B64)))
        .with_provider(Arc::new(MockProvider::succeeding("openai", PNG_B64)));
    let server = spawn_server(chain).await;

    let body: Value = server
        .client
        .get(format!("{}/health", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["providers"], json!(["gemini", "openai"]));

    let stats = server.get_stats().await;
    assert_eq!(stats.total_runs, 0);
}
