//! [`FlagHandler`] that converts flag changes into WebSocket messages.
//!
//! [`BannerBroadcastHandler`] re-renders the banner view on every flag
//! notification and broadcasts it to all connected WebSocket clients via a
//! `tokio::sync::broadcast` channel.

use std::sync::Arc;

use hoglet::banner::component::{Banner, BannerView};
use hoglet::flags::{FlagClient, FlagHandler, FlagSnapshot};
use serde::Serialize;
use tokio::sync::broadcast;

/// A message sent from the server to WebSocket clients.
///
/// Discriminated on the `type` field when serialized to JSON.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsMessage {
    /// Full state: resolved banner plus raw evaluations (sent on initial
    /// connect and after a lagged client resynchronizes).
    Snapshot {
        banner: BannerView,
        flags: serde_json::Value,
    },
    /// The banner view after an evaluation change.
    BannerUpdate { banner: BannerView },
    /// Evaluation set changed; `count` is the number of evaluated flags.
    FlagsUpdated { count: usize },
}

/// Raw flag evaluations as a JSON object, `{}` without a client.
pub fn flags_json(client: Option<&Arc<dyn FlagClient>>) -> serde_json::Value {
    let Some(client) = client else {
        return serde_json::json!({});
    };
    let snapshot = client.snapshot();
    let map: serde_json::Map<String, serde_json::Value> = snapshot
        .iter()
        .map(|(k, v)| {
            (
                k.clone(),
                serde_json::to_value(v).unwrap_or(serde_json::Value::Null),
            )
        })
        .collect();
    serde_json::Value::Object(map)
}

/// Build the full-state snapshot message for one client.
pub fn snapshot_message(banner: &Banner, client: Option<&Arc<dyn FlagClient>>) -> WsMessage {
    WsMessage::Snapshot {
        banner: banner.view(),
        flags: flags_json(client),
    }
}

/// Flag handler that broadcasts banner updates to WebSocket clients.
///
/// Register on the flag client after [`Banner::mount`] so the banner's own
/// subscription has already moved the cohort when the view is re-rendered
/// here.
pub struct BannerBroadcastHandler {
    banner: Arc<Banner>,
    sender: broadcast::Sender<WsMessage>,
}

impl BannerBroadcastHandler {
    pub fn new(banner: Arc<Banner>, sender: broadcast::Sender<WsMessage>) -> Self {
        Self { banner, sender }
    }

    /// Broadcast a message to all connected clients.
    ///
    /// Silently ignores send errors (no subscribers is fine).
    fn broadcast(&self, msg: WsMessage) {
        let _ = self.sender.send(msg);
    }
}

impl FlagHandler for BannerBroadcastHandler {
    fn on_flags_updated(&self, snapshot: &FlagSnapshot) {
        self.broadcast(WsMessage::FlagsUpdated {
            count: snapshot.len(),
        });
        self.broadcast(WsMessage::BannerUpdate {
            banner: self.banner.view(),
        });
    }
}
