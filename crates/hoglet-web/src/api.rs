//! Page and REST API endpoint handlers.
//!
//! These complement the WebSocket channel for cases where request/response
//! semantics are more appropriate (initial page load, scripted checks).

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;
use hoglet::banner::component::{Banner, BannerView};
use hoglet::flags::memory::InMemoryFlagClient;
use hoglet::flags::{FlagClient, FlagValue};
use hoglet::page::render_page;
use serde::Deserialize;
use tokio::sync::broadcast;

use crate::broadcast::{WsMessage, flags_json};

/// Shared application state passed to all handlers via axum's `State`
/// extractor.
#[derive(Clone)]
pub struct AppState {
    /// The mounted banner component.
    pub banner: Arc<Banner>,
    /// The flag client, if the page has a provider at all.
    pub client: Option<Arc<dyn FlagClient>>,
    /// Writable client backing `POST /api/flags`; `None` outside demo mode.
    pub demo: Option<Arc<InMemoryFlagClient>>,
    pub broadcast_tx: broadcast::Sender<WsMessage>,
}

impl AppState {
    pub fn new(
        banner: Arc<Banner>,
        client: Option<Arc<dyn FlagClient>>,
        broadcast_tx: broadcast::Sender<WsMessage>,
    ) -> Self {
        Self {
            banner,
            client,
            demo: None,
            broadcast_tx,
        }
    }

    /// Expose the in-memory client through `POST /api/flags`.
    pub fn with_demo(mut self, demo: Arc<InMemoryFlagClient>) -> Self {
        self.demo = Some(demo);
        self
    }
}

/// GET / — The rendered campaign page.
///
/// The banner view is resolved per request, so the style treatment always
/// reflects the current evaluation.
pub async fn get_page(State(app): State<AppState>) -> Html<String> {
    Html(render_page(&app.banner.view()))
}

/// GET /api/banner — The resolved banner view as JSON.
pub async fn get_banner(State(app): State<AppState>) -> Json<BannerView> {
    Json(app.banner.view())
}

/// GET /api/flags — Raw flag evaluations, `{}` without a provider.
pub async fn get_flags(State(app): State<AppState>) -> Json<serde_json::Value> {
    Json(flags_json(app.client.as_ref()))
}

/// Request body for POST /api/flags.
#[derive(Deserialize)]
pub struct SetFlagRequest {
    pub key: String,
    pub value: FlagValue,
}

/// POST /api/flags — Set an evaluation on the demo client.
///
/// Returns 204 on success, 404 when the server is not running in demo
/// mode (remote or provider-less pages are read-only).
pub async fn post_flag(State(app): State<AppState>, Json(body): Json<SetFlagRequest>) -> StatusCode {
    match &app.demo {
        Some(demo) => {
            demo.set_flag(body.key, body.value);
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}
