//! Campaign page server — end-to-end hoglet-web demo.
//!
//! Serves the rendered page, the JSON API, and a WebSocket feed of banner
//! updates. Flag evaluations come from a remote provider, from a local
//! demo rotation, or from nowhere at all (defaults only).
//!
//! # Usage
//!
//! ```bash
//! # Defaults only, no provider
//! cargo run -p hoglet-web
//!
//! # Against a live provider
//! cargo run -p hoglet-web -- \
//!   --provider-url https://us.i.posthog.com --api-key phc_xxx \
//!   --distinct-id visitor-1 --poll-interval-secs 30
//!
//! # Local demo: rotates through the cohorts, writable via POST /api/flags
//! cargo run -p hoglet-web -- --demo
//! ```
//!
//! Then open the printed URL in a browser, or watch updates over `/ws`:
//!
//! ```json
//! {"type":"banner_update","banner":{"variant":"brandts", ...}}
//! ```

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use hoglet::prelude::*;
use hoglet_web::{AppState, BannerBroadcastHandler, WebConfig, WsMessage, spawn_web};

/// Campaign page server.
#[derive(Parser)]
#[command(about = "Feature-flag driven campaign page with a web front-end")]
struct Args {
    /// Port for the web server.
    #[arg(long, default_value_t = 3001)]
    port: u16,

    /// Flag provider base URL, e.g. https://us.i.posthog.com
    #[arg(long, requires = "api_key", conflicts_with = "demo")]
    provider_url: Option<String>,

    /// Provider project API key.
    #[arg(long)]
    api_key: Option<String>,

    /// Identity the provider buckets evaluations for.
    #[arg(long, default_value = "anonymous")]
    distinct_id: String,

    /// Seconds between provider polls.
    #[arg(long, default_value_t = 30)]
    poll_interval_secs: u64,

    /// Run without a provider, rotating through the cohorts locally.
    /// Evaluations are writable via POST /api/flags.
    #[arg(long)]
    demo: bool,

    /// Seconds between demo rotations.
    #[arg(long, default_value_t = 8)]
    demo_period_secs: u64,
}

/// Rotate the demo client through every cohort, toggling the style
/// treatment on each full pass.
fn spawn_demo_rotation(client: Arc<InMemoryFlagClient>, period: Duration) {
    tokio::spawn(async move {
        let cohorts = ["daurian", "long_eared", "brandts"];
        let mut tick = 0usize;
        loop {
            tokio::time::sleep(period).await;
            tick += 1;
            client.set_flag(VARIANT_FLAG_KEY, FlagValue::tag(cohorts[tick % cohorts.len()]));
            if tick % cohorts.len() == 0 {
                let style = if (tick / cohorts.len()) % 2 == 1 {
                    "highlighted"
                } else {
                    "control"
                };
                client.set_flag(STYLE_FLAG_KEY, FlagValue::tag(style));
            }
        }
    });
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let args = Args::parse();

    // 1. Build the flag client this invocation asked for.
    let mut demo_client: Option<Arc<InMemoryFlagClient>> = None;
    let client: Option<Arc<dyn FlagClient>> = if let (Some(url), Some(key)) =
        (args.provider_url, args.api_key)
    {
        let config = RemoteConfig::new(url, key)
            .with_distinct_id(args.distinct_id)
            .with_poll_interval(Duration::from_secs(args.poll_interval_secs));
        let remote = Arc::new(RemoteFlagClient::new(config)?);
        remote.spawn_poller();
        Some(remote)
    } else if args.demo {
        let demo = Arc::new(InMemoryFlagClient::new());
        spawn_demo_rotation(demo.clone(), Duration::from_secs(args.demo_period_secs));
        demo_client = Some(demo.clone());
        Some(demo)
    } else {
        None
    };

    // 2. Mount the banner, then register the broadcast bridge so the
    //    cohort moves before the view is re-rendered for clients.
    let banner = Arc::new(Banner::new(client.clone()));
    banner.mount();

    let (ws_tx, _) = tokio::sync::broadcast::channel::<WsMessage>(256);
    if let Some(client) = &client {
        let handler = CompositeFlagHandler::new()
            .with(LoggingFlagHandler)
            .with(BannerBroadcastHandler::new(banner.clone(), ws_tx.clone()));
        client.on_flags_updated(Arc::new(handler));
    }

    // 3. Spawn the web server.
    let mut state = AppState::new(banner.clone(), client, ws_tx);
    if let Some(demo) = demo_client {
        state = state.with_demo(demo);
    }
    let web_config = WebConfig {
        bind_addr: ([127, 0, 0, 1], args.port).into(),
        ..Default::default()
    };
    let addr = spawn_web(state, web_config).await;
    println!("Page: http://{addr}");
    println!("Banner API: http://{addr}/api/banner");

    // 4. Run until interrupted, then release the flag subscription.
    tokio::signal::ctrl_c()
        .await
        .map_err(|e| format!("failed to wait for ctrl-c: {e}"))?;
    banner.unmount();
    Ok(())
}
