//! Resolve hedgehog banner flags and render the campaign page.
//!
//! Evaluations come from literal tags, a remote provider, or nothing at
//! all — an absent provider renders the default Daurian banner.
//!
//! # Examples
//!
//! ```sh
//! # Resolve variants from literal flag values, print the view as JSON
//! hoglet resolve --variant brandts --style highlighted
//!
//! # Resolve against a live provider
//! hoglet resolve --provider-url https://us.i.posthog.com \
//!   --api-key phc_xxx --distinct-id visitor-1
//!
//! # Render the full page
//! hoglet render --variant long_eared --out page.html
//!
//! # No flags at all: defaults end to end
//! hoglet render
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tracing::warn;

use hoglet::prelude::*;

/// Resolve hedgehog banner flags and render the campaign page.
#[derive(Parser)]
#[command(name = "hoglet")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable debug logging
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve the banner view and print it as JSON
    Resolve(FlagArgs),

    /// Render the full campaign page as HTML
    Render {
        #[command(flatten)]
        flags: FlagArgs,

        /// Write the page here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Where flag evaluations come from. Literal tags and a provider are
/// mutually exclusive; with neither, the page renders defaults.
#[derive(Args)]
struct FlagArgs {
    /// Literal cohort tag (daurian, long_eared, brandts — anything else
    /// falls back to daurian)
    #[arg(long, conflicts_with = "provider_url")]
    variant: Option<String>,

    /// Literal style tag (highlighted opts in; anything else is control)
    #[arg(long, conflicts_with = "provider_url")]
    style: Option<String>,

    /// Flag provider base URL, e.g. https://us.i.posthog.com
    #[arg(long, requires = "api_key")]
    provider_url: Option<String>,

    /// Provider project API key
    #[arg(long)]
    api_key: Option<String>,

    /// Identity the provider buckets evaluations for
    #[arg(long, default_value = "anonymous")]
    distinct_id: String,
}

impl FlagArgs {
    /// Build the flag client these arguments describe, fetching remote
    /// evaluations once up front. Fetch failures are logged, not fatal.
    async fn into_client(self) -> Result<Option<Arc<dyn FlagClient>>, String> {
        if let (Some(url), Some(key)) = (self.provider_url, self.api_key) {
            let config = RemoteConfig::new(url, key).with_distinct_id(self.distinct_id);
            let client = RemoteFlagClient::new(config)?;
            if let Err(e) = client.fetch_once().await {
                warn!("Flag fetch failed, rendering defaults: {e}");
            }
            return Ok(Some(Arc::new(client)));
        }

        if self.variant.is_none() && self.style.is_none() {
            return Ok(None);
        }

        let client = InMemoryFlagClient::new();
        if let Some(tag) = self.variant {
            client.set_flag(VARIANT_FLAG_KEY, FlagValue::tag(tag));
        }
        if let Some(tag) = self.style {
            client.set_flag(STYLE_FLAG_KEY, FlagValue::tag(tag));
        }
        Ok(Some(Arc::new(client)))
    }
}

async fn resolve_view(flags: FlagArgs) -> Result<BannerView, String> {
    let banner = Banner::new(flags.into_client().await?);
    banner.mount();
    let view = banner.view();
    banner.unmount();
    Ok(view)
}

async fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Command::Resolve(flags) => {
            let view = resolve_view(flags).await?;
            let json = serde_json::to_string_pretty(&view)
                .map_err(|e| format!("failed to serialize view: {e}"))?;
            println!("{json}");
        }
        Command::Render { flags, out } => {
            let view = resolve_view(flags).await?;
            let html = render_page(&view);
            match out {
                Some(path) => std::fs::write(&path, html)
                    .map_err(|e| format!("failed to write {}: {e}", path.display()))?,
                None => println!("{html}"),
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
