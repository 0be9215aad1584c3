//! Web front-end for the hoglet campaign page.
//!
//! `hoglet-web` serves the rendered page over HTTP, exposes the resolved
//! banner and raw flag evaluations as JSON, and pushes banner updates to
//! WebSocket clients whenever flag evaluations change.
//!
//! # Quick start
//!
//! ```ignore
//! use hoglet::prelude::*;
//! use hoglet_web::{AppState, WebConfig, WsMessage, spawn_web};
//! use std::sync::Arc;
//!
//! let client: Arc<InMemoryFlagClient> = Arc::new(InMemoryFlagClient::new());
//! let banner = Arc::new(Banner::with_client(client.clone()));
//! banner.mount();
//!
//! let (ws_tx, _) = tokio::sync::broadcast::channel(256);
//! let state = AppState::new(banner, Some(client.clone()), ws_tx)
//!     .with_demo(client);
//! let addr = spawn_web(state, WebConfig::default()).await;
//! println!("Page: http://{addr}");
//! ```
//!
//! # Architecture
//!
//! ```text
//! FlagClient ──notify──▶ BannerBroadcastHandler ──WsMessage──▶ WebSocket clients
//!     │                                                             ▲
//!     └──▶ Banner ──▶ GET /, /api/banner, /api/flags ───────────────┘
//! ```
//!
//! The [`BannerBroadcastHandler`] implements
//! [`FlagHandler`](hoglet::flags::FlagHandler) and re-renders the banner
//! view into a [`WsMessage`] on every evaluation change. Register it on
//! the flag client *after* mounting the banner so the banner's own
//! subscription updates the cohort first.

pub mod api;
pub mod broadcast;
mod server;
mod ws;

pub use api::AppState;
pub use broadcast::{BannerBroadcastHandler, WsMessage};

use std::net::SocketAddr;

/// Configuration for the web server.
pub struct WebConfig {
    /// Address to bind to. Default: `127.0.0.1:3001`.
    pub bind_addr: SocketAddr,
    /// WebSocket broadcast channel capacity. Default: 256.
    ///
    /// Clients that fall behind by this many messages receive a fresh
    /// snapshot to resynchronize.
    pub broadcast_capacity: usize,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3001)),
            broadcast_capacity: 256,
        }
    }
}

/// Spawn the web server on a Tokio task and return the bound address.
///
/// The server runs until the Tokio runtime shuts down. Bind to port 0 to
/// get a random available port (used by the integration tests).
pub async fn spawn_web(state: AppState, config: WebConfig) -> SocketAddr {
    let router = server::build_router(state);
    server::start_server(router, config.bind_addr).await
}
