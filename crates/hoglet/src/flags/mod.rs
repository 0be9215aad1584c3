//! Flag client adapter boundary: values, snapshots, and change observers.
//!
//! The page core never talks to a flag provider directly. It consumes the
//! [`FlagClient`] trait — a synchronous best-effort lookup plus a
//! subscribe/unsubscribe pair — and degrades to defaults whenever the
//! adapter is absent or uninitialized. Implementations notify registered
//! [`FlagHandler`]s at least once per evaluation change.
//!
//! # Architecture
//!
//! ```text
//! Provider ──poll/set──▶ FlagClient ──FlagSnapshot──▶ FlagHandler(s) ──▶ Banner state
//!                            ▲
//!        flag_value(key) ────┘  (synchronous read at render time)
//! ```
//!
//! # Choosing a handler
//!
//! | Handler | Use case |
//! |---------|----------|
//! | [`NoopFlagHandler`] | Tests or subscribe-only lifecycle checks |
//! | [`LoggingFlagHandler`] | Structured logging via `tracing` |
//! | [`FnFlagHandler`] | Quick closures for simple callbacks |
//! | [`CompositeFlagHandler`] | Compose multiple handlers in order |
//! | Custom `impl FlagHandler` | Full control (state bridges, broadcasts) |

pub mod memory;
pub mod remote;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tracing::debug;

// ── Values and snapshots ───────────────────────────────────────────

/// A single flag evaluation as returned by a provider.
///
/// Providers return string tags, booleans, or numbers. Only string tags are
/// meaningful to the variant resolvers — everything else falls through to
/// the default variant, by design.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    /// Boolean on/off evaluation.
    Bool(bool),
    /// Numeric evaluation (rollout percentages, bucket indexes).
    Number(f64),
    /// String variant tag — the shape the resolvers recognize.
    Tag(String),
}

impl FlagValue {
    /// Convenience constructor for a string tag.
    pub fn tag(value: impl Into<String>) -> Self {
        FlagValue::Tag(value.into())
    }

    /// The string tag, or `None` for boolean/numeric evaluations.
    pub fn as_tag(&self) -> Option<&str> {
        match self {
            FlagValue::Tag(tag) => Some(tag),
            _ => None,
        }
    }
}

/// The latest known set of flag evaluations.
///
/// Handlers receive a reference to the snapshot that triggered the
/// notification. `fetched_at` records when the evaluations were obtained,
/// for staleness logging only — equality of evaluations ignores it.
#[derive(Clone, Debug)]
pub struct FlagSnapshot {
    flags: HashMap<String, FlagValue>,
    pub fetched_at: DateTime<Utc>,
}

impl FlagSnapshot {
    /// A snapshot with the given evaluations, stamped now.
    pub fn new(flags: HashMap<String, FlagValue>) -> Self {
        Self {
            flags,
            fetched_at: Utc::now(),
        }
    }

    /// An empty snapshot (provider not yet initialized).
    pub fn empty() -> Self {
        Self::new(HashMap::new())
    }

    /// Look up a single evaluation.
    pub fn get(&self, key: &str) -> Option<&FlagValue> {
        self.flags.get(key)
    }

    /// Number of evaluated flags.
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    /// Whether no evaluations are present.
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Whether two snapshots carry identical evaluations.
    ///
    /// Ignores `fetched_at` — a re-poll that returns the same values is not
    /// a change and must not fan out notifications.
    pub fn same_evaluations(&self, other: &FlagSnapshot) -> bool {
        self.flags == other.flags
    }

    /// Iterate over `(key, value)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FlagValue)> {
        self.flags.iter()
    }
}

impl Default for FlagSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

// ── Client boundary ────────────────────────────────────────────────

/// Opaque handle for a registered [`FlagHandler`].
///
/// Owned by exactly one subscriber; pass it back to
/// [`FlagClient::off_flags_updated`] to release the registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

/// The flag service boundary consumed by the page core.
///
/// Lookups are synchronous and best-effort: `None` means the provider has
/// not initialized or does not know the key, and callers fall back to
/// defaults. Unregistering an unknown handler id is a silent no-op — the
/// teardown path must be unconditional.
pub trait FlagClient: Send + Sync {
    /// Current evaluation for `key`, if any.
    fn flag_value(&self, key: &str) -> Option<FlagValue>;

    /// The latest evaluation set (empty before first load).
    fn snapshot(&self) -> FlagSnapshot;

    /// Register a handler invoked at least once per evaluation change.
    fn on_flags_updated(&self, handler: Arc<dyn FlagHandler>) -> HandlerId;

    /// Unregister a previously registered handler. No-op for unknown ids.
    fn off_flags_updated(&self, id: HandlerId);
}

// ── Handlers ───────────────────────────────────────────────────────

/// Observer for flag evaluation changes.
///
/// Implement this trait to react to updated evaluations — re-resolving a
/// variant, broadcasting to WebSocket clients, logging. Handlers are pure
/// observers: they return nothing and must not assume any delivery ordering
/// beyond "at least once per change".
pub trait FlagHandler: Send + Sync {
    /// Called with the snapshot that triggered the notification.
    fn on_flags_updated(&self, snapshot: &FlagSnapshot);
}

/// A no-op handler for tests and subscribe-only lifecycle checks.
pub struct NoopFlagHandler;
impl FlagHandler for NoopFlagHandler {
    fn on_flags_updated(&self, _snapshot: &FlagSnapshot) {}
}

/// A handler backed by a closure.
///
/// Wraps a `Fn(&FlagSnapshot)` into a [`FlagHandler`], avoiding the
/// boilerplate of a struct + impl for simple callbacks.
pub struct FnFlagHandler<F>(F)
where
    F: Fn(&FlagSnapshot) + Send + Sync;

impl<F> FnFlagHandler<F>
where
    F: Fn(&FlagSnapshot) + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> FlagHandler for FnFlagHandler<F>
where
    F: Fn(&FlagSnapshot) + Send + Sync,
{
    fn on_flags_updated(&self, snapshot: &FlagSnapshot) {
        (self.0)(snapshot);
    }
}

/// A handler that delegates to multiple inner handlers in order.
///
/// # Example
///
/// ```ignore
/// let handler = CompositeFlagHandler::new()
///     .with(LoggingFlagHandler)
///     .with(banner_bridge);
/// ```
pub struct CompositeFlagHandler {
    handlers: Vec<Box<dyn FlagHandler>>,
}

impl CompositeFlagHandler {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Add a handler to the chain. Handlers are called in registration order.
    pub fn with(mut self, handler: impl FlagHandler + 'static) -> Self {
        self.handlers.push(Box::new(handler));
        self
    }

    /// Add a handler from an `Option`. `None` is a no-op, keeping the
    /// builder chain intact for conditional composition.
    pub fn with_opt(self, handler: Option<impl FlagHandler + 'static>) -> Self {
        match handler {
            Some(h) => self.with(h),
            None => self,
        }
    }
}

impl Default for CompositeFlagHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl FlagHandler for CompositeFlagHandler {
    fn on_flags_updated(&self, snapshot: &FlagSnapshot) {
        for handler in &self.handlers {
            handler.on_flags_updated(snapshot);
        }
    }
}

/// A handler that logs evaluation changes via `tracing`.
pub struct LoggingFlagHandler;

impl FlagHandler for LoggingFlagHandler {
    fn on_flags_updated(&self, snapshot: &FlagSnapshot) {
        let age = Utc::now()
            .signed_duration_since(snapshot.fetched_at)
            .num_milliseconds();
        debug!(
            "Flags updated: {} evaluation(s), snapshot age {age}ms",
            snapshot.len()
        );
    }
}

// ── Registry (shared by client implementations) ────────────────────

/// Handler registrations shared by [`FlagClient`] implementations.
///
/// Ids are unique per registry for its lifetime; a deregistered id is never
/// reused, so a stale unsubscribe can only ever be a no-op.
pub struct HandlerRegistry {
    next_id: AtomicU64,
    handlers: Mutex<Vec<(HandlerId, Arc<dyn FlagHandler>)>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            handlers: Mutex::new(Vec::new()),
        }
    }

    /// Register a handler and return its id.
    pub fn register(&self, handler: Arc<dyn FlagHandler>) -> HandlerId {
        let id = HandlerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        if let Ok(mut handlers) = self.handlers.lock() {
            handlers.push((id, handler));
        }
        id
    }

    /// Remove a registration. Unknown ids are ignored.
    pub fn deregister(&self, id: HandlerId) {
        if let Ok(mut handlers) = self.handlers.lock() {
            handlers.retain(|(hid, _)| *hid != id);
        }
    }

    /// Invoke every registered handler with `snapshot`.
    ///
    /// Handlers are cloned out of the lock first so a handler that
    /// re-enters the client (reading `flag_value` during its callback)
    /// cannot deadlock.
    pub fn notify(&self, snapshot: &FlagSnapshot) {
        let handlers: Vec<Arc<dyn FlagHandler>> = match self.handlers.lock() {
            Ok(guard) => guard.iter().map(|(_, h)| h.clone()).collect(),
            Err(_) => return,
        };
        for handler in handlers {
            handler.on_flags_updated(snapshot);
        }
    }

    /// Number of live registrations.
    pub fn len(&self) -> usize {
        self.handlers.lock().map(|h| h.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn snapshot_with(key: &str, value: FlagValue) -> FlagSnapshot {
        let mut flags = HashMap::new();
        flags.insert(key.to_string(), value);
        FlagSnapshot::new(flags)
    }

    #[test]
    fn flag_value_tag_accessor() {
        assert_eq!(FlagValue::tag("brandts").as_tag(), Some("brandts"));
        assert_eq!(FlagValue::Bool(true).as_tag(), None);
        assert_eq!(FlagValue::Number(3.0).as_tag(), None);
    }

    #[test]
    fn flag_value_deserializes_untagged() {
        let v: FlagValue = serde_json::from_str("\"long_eared\"").unwrap();
        assert_eq!(v, FlagValue::tag("long_eared"));
        let v: FlagValue = serde_json::from_str("true").unwrap();
        assert_eq!(v, FlagValue::Bool(true));
        let v: FlagValue = serde_json::from_str("42").unwrap();
        assert_eq!(v, FlagValue::Number(42.0));
    }

    #[test]
    fn snapshot_equality_ignores_fetch_time() {
        let a = snapshot_with("k", FlagValue::tag("v"));
        let mut b = snapshot_with("k", FlagValue::tag("v"));
        b.fetched_at = a.fetched_at + chrono::Duration::seconds(30);
        assert!(a.same_evaluations(&b));

        let c = snapshot_with("k", FlagValue::tag("other"));
        assert!(!a.same_evaluations(&c));
    }

    #[test]
    fn composite_dispatches_in_order() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let (c1, c2) = (calls.clone(), calls.clone());
        let handler = CompositeFlagHandler::new()
            .with(FnFlagHandler::new(move |_| c1.lock().unwrap().push("a")))
            .with(FnFlagHandler::new(move |_| c2.lock().unwrap().push("b")));

        handler.on_flags_updated(&FlagSnapshot::empty());
        assert_eq!(*calls.lock().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn composite_with_opt_none_is_noop() {
        let handler = CompositeFlagHandler::new()
            .with_opt(None::<NoopFlagHandler>)
            .with(NoopFlagHandler);
        // Smoke: dispatch does not panic with a mixed chain.
        handler.on_flags_updated(&FlagSnapshot::empty());
    }

    #[test]
    fn registry_register_notify_deregister() {
        let registry = HandlerRegistry::new();
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();

        let id = registry.register(Arc::new(FnFlagHandler::new(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        })));
        assert_eq!(registry.len(), 1);

        registry.notify(&FlagSnapshot::empty());
        assert_eq!(count.load(Ordering::SeqCst), 1);

        registry.deregister(id);
        assert!(registry.is_empty());

        // A post-deregistration notification must not reach the handler.
        registry.notify(&FlagSnapshot::empty());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn registry_deregister_unknown_id_is_noop() {
        let registry = HandlerRegistry::new();
        let id = registry.register(Arc::new(NoopFlagHandler));
        registry.deregister(id);
        registry.deregister(id); // Second release of the same id.
        assert!(registry.is_empty());
    }

    #[test]
    fn registry_ids_are_unique() {
        let registry = HandlerRegistry::new();
        let a = registry.register(Arc::new(NoopFlagHandler));
        let b = registry.register(Arc::new(NoopFlagHandler));
        assert_ne!(a, b);
    }
}
