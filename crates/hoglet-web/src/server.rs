//! Axum server setup and router construction.

use std::net::SocketAddr;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};

use crate::api::{self, AppState};
use crate::ws;

/// Build the full axum router.
///
/// The router serves:
/// - The rendered page at `/`
/// - JSON API at `/api/*`
/// - WebSocket at `/ws`
pub fn build_router(state: AppState) -> Router {
    // CORS layer so scripted checks and local tooling on other ports can
    // hit the JSON API.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(api::get_page))
        .route("/api/banner", get(api::get_banner))
        .route("/api/flags", get(api::get_flags).post(api::post_flag))
        .route("/ws", get(ws::ws_upgrade))
        .with_state(state)
        .layer(cors)
}

/// Start the axum server and return the bound address.
pub async fn start_server(router: Router, bind_addr: SocketAddr) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind(bind_addr).await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    addr
}
