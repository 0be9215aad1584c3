//! WebSocket upgrade handler and message dispatch.
//!
//! Each connected client receives:
//! 1. A full [`WsMessage::Snapshot`] on connect.
//! 2. Incremental [`WsMessage`] updates as flag evaluations change.
//!
//! Clients can send `{"type":"refresh"}` to request a fresh snapshot.

use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt, stream::SplitSink};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::api::AppState;
use crate::broadcast::{WsMessage, snapshot_message};

/// GET /ws — WebSocket upgrade handler.
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle a single WebSocket connection.
async fn handle_socket(socket: WebSocket, state: AppState) {
    let (mut sink, mut stream) = socket.split();

    // Send initial snapshot.
    let snapshot = snapshot_message(&state.banner, state.client.as_ref());
    if ws_send(&mut sink, &snapshot).await.is_err() {
        return;
    }

    debug!("WebSocket client connected");

    // Subscribe to broadcast channel for server→client messages.
    let mut broadcast_rx = state.broadcast_tx.subscribe();

    // Spawn a task that forwards broadcast messages to this client.
    let resync_state = state.clone();
    let forward_task = tokio::spawn(async move {
        loop {
            match broadcast_rx.recv().await {
                Ok(msg) => {
                    if ws_send(&mut sink, &msg).await.is_err() {
                        break; // Client disconnected.
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    // Client fell behind — send a fresh snapshot to
                    // resynchronize.
                    warn!("WebSocket client lagged by {n} messages, resending snapshot");
                    let msg =
                        snapshot_message(&resync_state.banner, resync_state.client.as_ref());
                    if ws_send(&mut sink, &msg).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // Handle incoming messages from this client.
    while let Some(Ok(msg)) = stream.next().await {
        match msg {
            Message::Text(text) => handle_client_message(&text, &state),
            Message::Close(_) => break,
            _ => {} // Ignore binary, ping, pong.
        }
    }

    debug!("WebSocket client disconnected");
    forward_task.abort();
}

/// Process a JSON message received from a client.
fn handle_client_message(text: &str, state: &AppState) {
    #[derive(serde::Deserialize)]
    #[serde(tag = "type", rename_all = "snake_case")]
    enum ClientMessage {
        Refresh,
    }

    let Ok(msg) = serde_json::from_str::<ClientMessage>(text) else {
        debug!("Ignoring malformed WebSocket message");
        return;
    };

    match msg {
        ClientMessage::Refresh => {
            // Delivered over the broadcast channel, so every connected
            // client resynchronizes at once.
            let _ = state
                .broadcast_tx
                .send(snapshot_message(&state.banner, state.client.as_ref()));
        }
    }
}

/// Serialize a `WsMessage` and send it over the WebSocket sink.
async fn ws_send(sink: &mut SplitSink<WebSocket, Message>, msg: &WsMessage) -> Result<(), ()> {
    let json = serde_json::to_string(msg).unwrap_or_default();
    sink.send(Message::Text(json.into())).await.map_err(|_| ())
}
