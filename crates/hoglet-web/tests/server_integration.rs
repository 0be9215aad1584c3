//! Integration tests for the hoglet-web server.
//!
//! These tests start a real axum server on a random port and exercise
//! the page, the JSON API, and the demo flag endpoint.

use std::sync::Arc;

use hoglet::banner::component::Banner;
use hoglet::banner::{STYLE_FLAG_KEY, VARIANT_FLAG_KEY};
use hoglet::flags::memory::InMemoryFlagClient;
use hoglet::flags::{FlagClient, FlagValue};
use hoglet_web::{AppState, WebConfig, WsMessage, spawn_web};

/// Helper: spawn a test server on port 0 backed by an in-memory client.
async fn spawn_test_server(demo: bool) -> (Arc<InMemoryFlagClient>, String) {
    let client = Arc::new(InMemoryFlagClient::new());
    let dyn_client: Arc<dyn FlagClient> = client.clone();
    let banner = Arc::new(Banner::with_client(dyn_client.clone()));
    banner.mount();

    let (tx, _) = tokio::sync::broadcast::channel::<WsMessage>(64);
    let mut state = AppState::new(banner, Some(dyn_client), tx);
    if demo {
        state = state.with_demo(client.clone());
    }

    let config = WebConfig {
        bind_addr: ([127, 0, 0, 1], 0).into(),
        ..Default::default()
    };
    let addr = spawn_web(state, config).await;
    (client, format!("http://{addr}"))
}

/// Helper: spawn a server with no flag client at all.
async fn spawn_detached_server() -> String {
    let banner = Arc::new(Banner::detached());
    banner.mount();
    let (tx, _) = tokio::sync::broadcast::channel::<WsMessage>(64);
    let state = AppState::new(banner, None, tx);
    let config = WebConfig {
        bind_addr: ([127, 0, 0, 1], 0).into(),
        ..Default::default()
    };
    let addr = spawn_web(state, config).await;
    format!("http://{addr}")
}

// ── Page ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn page_embeds_default_banner() {
    let (_client, base) = spawn_test_server(false).await;

    let resp = reqwest::get(&base).await.unwrap();
    assert_eq!(resp.status(), 200);
    let html = resp.text().await.unwrap();
    assert!(html.contains("Proposed outbound campaign"));
    assert!(html.contains("data-variant=\"daurian\""));
    assert!(html.contains("This is a feature flags test!!"));
}

#[tokio::test]
async fn page_reflects_style_change_per_request() {
    let (client, base) = spawn_test_server(false).await;

    client.set_flag(STYLE_FLAG_KEY, FlagValue::tag("highlighted"));

    let html = reqwest::get(&base).await.unwrap().text().await.unwrap();
    assert!(html.contains("data-style=\"highlighted\""));
    assert!(html.contains("EXPERIMENT VARIANT: LOUD HEDGEHOG"));
}

// ── JSON API ─────────────────────────────────────────────────────────

#[tokio::test]
async fn api_banner_returns_default_view() {
    let (_client, base) = spawn_test_server(false).await;

    let resp = reqwest::get(format!("{base}/api/banner")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let json: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(json["variant"], "daurian");
    assert_eq!(json["style"], "control");
    assert!(json["badge"].is_null());
}

#[tokio::test]
async fn api_banner_reflects_flag_change() {
    let (client, base) = spawn_test_server(false).await;

    client.set_flag(VARIANT_FLAG_KEY, FlagValue::tag("long_eared"));

    let json: serde_json::Value = reqwest::get(format!("{base}/api/banner"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(json["variant"], "long_eared");
    assert_eq!(json["title"], "You rolled Long-eared 🦔");
}

#[tokio::test]
async fn api_flags_lists_raw_evaluations() {
    let (client, base) = spawn_test_server(false).await;

    client.set_flag(VARIANT_FLAG_KEY, FlagValue::tag("brandts"));
    client.set_flag("beta-rollout", FlagValue::Bool(true));

    let json: serde_json::Value = reqwest::get(format!("{base}/api/flags"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(json[VARIANT_FLAG_KEY], "brandts");
    assert_eq!(json["beta-rollout"], true);
}

#[tokio::test]
async fn detached_server_serves_defaults_everywhere() {
    let base = spawn_detached_server().await;

    let html = reqwest::get(&base).await.unwrap().text().await.unwrap();
    assert!(html.contains("data-variant=\"daurian\""));

    let json: serde_json::Value = reqwest::get(format!("{base}/api/flags"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(json, serde_json::json!({}));
}

// ── Demo flag endpoint ───────────────────────────────────────────────

#[tokio::test]
async fn post_flag_updates_demo_client() {
    let (_client, base) = spawn_test_server(true).await;

    let http = reqwest::Client::new();
    let resp = http
        .post(format!("{base}/api/flags"))
        .json(&serde_json::json!({"key": VARIANT_FLAG_KEY, "value": "brandts"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 204);

    let json: serde_json::Value = reqwest::get(format!("{base}/api/banner"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(json["variant"], "brandts");
}

#[tokio::test]
async fn post_flag_without_demo_mode_is_404() {
    let (_client, base) = spawn_test_server(false).await;

    let http = reqwest::Client::new();
    let resp = http
        .post(format!("{base}/api/flags"))
        .json(&serde_json::json!({"key": VARIANT_FLAG_KEY, "value": "brandts"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}
