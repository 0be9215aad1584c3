//! Remote flag client: polls a PostHog-style `/decide` endpoint.
//!
//! [`RemoteFlagClient`] fetches flag evaluations over HTTP, keeps the
//! latest [`FlagSnapshot`], and notifies registered handlers only when the
//! evaluations actually change. Polling runs on a dedicated tokio task
//! ([`spawn_poller`](RemoteFlagClient::spawn_poller)).
//!
//! Failure policy: transient errors (429/5xx, network) retry with
//! exponential backoff inside one poll cycle; anything that still fails is
//! logged and absorbed — the previous snapshot stays live and the next
//! cycle tries again. No error ever reaches a flag consumer.

use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, trace, warn};

use super::{FlagClient, FlagHandler, FlagSnapshot, FlagValue, HandlerId, HandlerRegistry};

/// Default interval between poll cycles.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

// ── Retry policy ───────────────────────────────────────────────────

/// Backoff policy for transient poll failures within a single cycle.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Retries after the first attempt (0 = single attempt per cycle).
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Ceiling for the computed delay.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        // The next poll cycle retries a failed fetch anyway.
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(4),
        }
    }
}

impl RetryConfig {
    /// Delay for a 0-indexed retry attempt: doubled each attempt, capped,
    /// with a deterministic sub-unity factor so simultaneous pollers drift
    /// apart without pulling in a RNG.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.initial_delay.as_secs_f64() * 2f64.powi(attempt as i32);
        let capped = base.min(self.max_delay.as_secs_f64());
        let spread = if attempt % 2 == 0 { 0.8 } else { 0.95 };
        Duration::from_secs_f64(capped * spread)
    }
}

/// Whether an error string indicates a transient (retryable) poll failure.
pub fn is_transient_error(error: &str) -> bool {
    if ["429", "500", "502", "503", "504"]
        .iter()
        .any(|s| error.contains(&format!("HTTP {s}")))
    {
        return true;
    }
    let lower = error.to_lowercase();
    ["request failed", "timed out", "timeout", "connection"]
        .iter()
        .any(|p| lower.contains(p))
}

// ── Configuration ──────────────────────────────────────────────────

/// Configuration for [`RemoteFlagClient`].
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Provider base URL, e.g. `https://us.i.posthog.com`.
    pub provider_url: String,
    /// Project API key sent with every decide request.
    pub api_key: String,
    /// Identity the provider buckets evaluations for.
    pub distinct_id: String,
    /// Interval between poll cycles.
    pub poll_interval: Duration,
    /// In-cycle retry policy.
    pub retry: RetryConfig,
}

impl RemoteConfig {
    /// Config with defaults for everything but the provider coordinates.
    pub fn new(provider_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            provider_url: provider_url.into(),
            api_key: api_key.into(),
            distinct_id: "anonymous".to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            retry: RetryConfig::default(),
        }
    }

    /// Set the distinct id evaluations are bucketed for.
    pub fn with_distinct_id(mut self, distinct_id: impl Into<String>) -> Self {
        self.distinct_id = distinct_id.into();
        self
    }

    /// Set the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

// ── Wire format ────────────────────────────────────────────────────

/// Raw decide response (internal deserialization target).
#[derive(Deserialize, Debug)]
struct DecideResponse {
    #[serde(rename = "featureFlags", default)]
    feature_flags: HashMap<String, FlagValue>,
    #[serde(rename = "errorsWhileComputingFlags", default)]
    errors_while_computing: bool,
}

// ── Client ─────────────────────────────────────────────────────────

/// A [`FlagClient`] backed by a remote provider's decide endpoint.
pub struct RemoteFlagClient {
    http: reqwest::Client,
    config: RemoteConfig,
    snapshot: Mutex<FlagSnapshot>,
    registry: HandlerRegistry,
}

impl RemoteFlagClient {
    /// Create a client. The snapshot starts empty — consumers see defaults
    /// until the first successful poll.
    pub fn new(config: RemoteConfig) -> Result<Self, String> {
        let http = reqwest::Client::builder()
            .user_agent("hoglet/0.1")
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| format!("failed to build HTTP client: {e}"))?;
        Ok(Self {
            http,
            config,
            snapshot: Mutex::new(FlagSnapshot::empty()),
            registry: HandlerRegistry::new(),
        })
    }

    /// One decide round trip.
    async fn decide(&self) -> Result<FlagSnapshot, String> {
        let url = format!("{}/decide?v=3", self.config.provider_url.trim_end_matches('/'));
        let body = serde_json::json!({
            "api_key": self.config.api_key,
            "distinct_id": self.config.distinct_id,
        });

        let start = Instant::now();
        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| format!("failed to read response: {e}"))?;
        debug!(
            "Decide response: HTTP {} in {:.0}ms ({} bytes)",
            status,
            start.elapsed().as_secs_f64() * 1000.0,
            text.len()
        );

        if !status.is_success() {
            return Err(format!("decide endpoint HTTP {status}: {text}"));
        }

        let parsed: DecideResponse =
            serde_json::from_str(&text).map_err(|e| format!("failed to parse response: {e}"))?;
        if parsed.errors_while_computing {
            // Partial evaluations are still usable; surface the condition.
            warn!("Provider reported errors while computing flags; using partial evaluations");
        }

        Ok(FlagSnapshot::new(parsed.feature_flags))
    }

    /// Store a fresh snapshot and notify handlers when evaluations changed.
    /// Returns whether a notification was fanned out.
    fn apply_snapshot(&self, fresh: FlagSnapshot) -> bool {
        let changed = {
            let mut guard = match self.snapshot.lock() {
                Ok(g) => g,
                Err(_) => return false,
            };
            let changed = !guard.same_evaluations(&fresh);
            *guard = fresh.clone();
            changed
        };
        if changed {
            debug!("Flag evaluations changed ({} flag(s)), notifying", fresh.len());
            self.registry.notify(&fresh);
        } else {
            trace!("Flag evaluations unchanged, skipping notification");
        }
        changed
    }

    /// Fetch once and apply. Returns whether handlers were notified.
    pub async fn fetch_once(&self) -> Result<bool, String> {
        let fresh = self.decide().await?;
        Ok(self.apply_snapshot(fresh))
    }

    /// One poll cycle: fetch with in-cycle retries, absorbing failure.
    async fn poll_cycle(&self) {
        let retry = &self.config.retry;
        let mut attempt = 0;
        loop {
            match self.fetch_once().await {
                Ok(_) => return,
                Err(e) if attempt < retry.max_retries && is_transient_error(&e) => {
                    let delay = retry.delay_for_attempt(attempt);
                    debug!("Transient poll failure ({e}), retrying in {delay:?}");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    // Keep the previous snapshot; the next cycle re-resolves.
                    warn!("Flag poll failed, keeping last snapshot: {e}");
                    return;
                }
            }
        }
    }

    /// Spawn the poll loop on a tokio task. Runs until the runtime shuts
    /// down; abort the handle for an early stop.
    pub fn spawn_poller(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let client = Arc::clone(self);
        tokio::spawn(async move {
            loop {
                client.poll_cycle().await;
                tokio::time::sleep(client.config.poll_interval).await;
            }
        })
    }
}

impl FlagClient for RemoteFlagClient {
    fn flag_value(&self, key: &str) -> Option<FlagValue> {
        self.snapshot.lock().ok().and_then(|s| s.get(key).cloned())
    }

    fn snapshot(&self) -> FlagSnapshot {
        self.snapshot.lock().map(|s| s.clone()).unwrap_or_default()
    }

    fn on_flags_updated(&self, handler: Arc<dyn FlagHandler>) -> HandlerId {
        self.registry.register(handler)
    }

    fn off_flags_updated(&self, id: HandlerId) {
        self.registry.deregister(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::FnFlagHandler;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_client() -> RemoteFlagClient {
        RemoteFlagClient::new(RemoteConfig::new("http://127.0.0.1:1", "phc_test")).unwrap()
    }

    fn snapshot_of(pairs: &[(&str, &str)]) -> FlagSnapshot {
        FlagSnapshot::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), FlagValue::tag(*v)))
                .collect(),
        )
    }

    #[test]
    fn decide_response_deserializes() {
        let json = r#"{
            "featureFlags": {
                "hedgehog_variant": "brandts",
                "loud-hedgehogs": "highlighted",
                "beta-rollout": true,
                "bucket": 7
            },
            "errorsWhileComputingFlags": false
        }"#;
        let parsed: DecideResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed.feature_flags.get("hedgehog_variant"),
            Some(&FlagValue::tag("brandts"))
        );
        assert_eq!(
            parsed.feature_flags.get("beta-rollout"),
            Some(&FlagValue::Bool(true))
        );
        assert!(!parsed.errors_while_computing);
    }

    #[test]
    fn decide_response_tolerates_missing_fields() {
        let parsed: DecideResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.feature_flags.is_empty());
    }

    #[test]
    fn apply_snapshot_notifies_only_on_change() {
        let client = test_client();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        client.on_flags_updated(Arc::new(FnFlagHandler::new(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        })));

        assert!(client.apply_snapshot(snapshot_of(&[("hedgehog_variant", "daurian")])));
        assert_eq!(count.load(Ordering::SeqCst), 1);

        // Identical evaluations: stored (fresh timestamp) but not notified.
        assert!(!client.apply_snapshot(snapshot_of(&[("hedgehog_variant", "daurian")])));
        assert_eq!(count.load(Ordering::SeqCst), 1);

        assert!(client.apply_snapshot(snapshot_of(&[("hedgehog_variant", "long_eared")])));
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn lookup_reflects_applied_snapshot() {
        let client = test_client();
        assert!(client.flag_value("hedgehog_variant").is_none());
        client.apply_snapshot(snapshot_of(&[("hedgehog_variant", "brandts")]));
        assert_eq!(
            client.flag_value("hedgehog_variant"),
            Some(FlagValue::tag("brandts"))
        );
    }

    #[tokio::test]
    async fn fetch_against_unreachable_provider_errors_without_panic() {
        let client = test_client();
        let err = client.fetch_once().await.unwrap_err();
        assert!(is_transient_error(&err), "unexpected error class: {err}");
        // Snapshot untouched.
        assert!(client.snapshot().is_empty());
    }

    #[test]
    fn delay_doubles_and_caps() {
        let retry = RetryConfig::default();
        assert!(retry.delay_for_attempt(1) > retry.delay_for_attempt(0));
        assert!(retry.delay_for_attempt(12) <= retry.max_delay);
    }

    #[test]
    fn transient_classification() {
        assert!(is_transient_error("decide endpoint HTTP 429: rate limited"));
        assert!(is_transient_error("decide endpoint HTTP 503: unavailable"));
        assert!(is_transient_error("request failed: connection refused"));
        assert!(!is_transient_error("decide endpoint HTTP 401: unauthorized"));
        assert!(!is_transient_error("failed to parse response: eof"));
    }
}
