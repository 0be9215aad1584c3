//! In-memory flag client for tests, demos, and offline rendering.
//!
//! [`InMemoryFlagClient`] holds an evaluation map behind a mutex and fires
//! registered handlers synchronously on every mutation. It is the fake
//! adapter the banner tests inject, and the backing store for the
//! `--demo` rotation in `hoglet-web`.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::trace;

use super::{FlagClient, FlagHandler, FlagSnapshot, FlagValue, HandlerId, HandlerRegistry};

/// A [`FlagClient`] whose evaluations are set programmatically.
///
/// Every call to [`set_flag`](Self::set_flag) or
/// [`set_flags`](Self::set_flags) replaces the snapshot and notifies all
/// registered handlers before returning — "at least once per change", with
/// synchronous delivery so tests can assert immediately.
pub struct InMemoryFlagClient {
    snapshot: Mutex<FlagSnapshot>,
    registry: HandlerRegistry,
}

impl InMemoryFlagClient {
    /// Create a client with no evaluations (uninitialized provider).
    pub fn new() -> Self {
        Self {
            snapshot: Mutex::new(FlagSnapshot::empty()),
            registry: HandlerRegistry::new(),
        }
    }

    /// Create a client pre-loaded with evaluations. No handlers exist yet,
    /// so nothing is notified.
    pub fn with_flags(flags: HashMap<String, FlagValue>) -> Self {
        Self {
            snapshot: Mutex::new(FlagSnapshot::new(flags)),
            registry: HandlerRegistry::new(),
        }
    }

    /// Set a single evaluation and notify handlers.
    pub fn set_flag(&self, key: impl Into<String>, value: FlagValue) {
        let snapshot = {
            let mut guard = match self.snapshot.lock() {
                Ok(g) => g,
                Err(_) => return,
            };
            let mut flags: HashMap<String, FlagValue> = guard.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
            flags.insert(key.into(), value);
            *guard = FlagSnapshot::new(flags);
            guard.clone()
        };
        trace!("In-memory flag set, notifying {} handler(s)", self.registry.len());
        self.registry.notify(&snapshot);
    }

    /// Replace the whole evaluation set and notify handlers.
    pub fn set_flags(&self, flags: HashMap<String, FlagValue>) {
        let snapshot = {
            let mut guard = match self.snapshot.lock() {
                Ok(g) => g,
                Err(_) => return,
            };
            *guard = FlagSnapshot::new(flags);
            guard.clone()
        };
        self.registry.notify(&snapshot);
    }

    /// Drop all evaluations (back to the uninitialized state) and notify.
    pub fn clear(&self) {
        self.set_flags(HashMap::new());
    }

    /// Number of live handler registrations. Lifecycle tests assert on
    /// this to prove subscriptions are actually released.
    pub fn handler_count(&self) -> usize {
        self.registry.len()
    }
}

impl Default for InMemoryFlagClient {
    fn default() -> Self {
        Self::new()
    }
}

impl FlagClient for InMemoryFlagClient {
    fn flag_value(&self, key: &str) -> Option<FlagValue> {
        self.snapshot
            .lock()
            .ok()
            .and_then(|s| s.get(key).cloned())
    }

    fn snapshot(&self) -> FlagSnapshot {
        self.snapshot
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    fn on_flags_updated(&self, handler: Arc<dyn FlagHandler>) -> HandlerId {
        self.registry.register(handler)
    }

    fn off_flags_updated(&self, id: HandlerId) {
        self.registry.deregister(id);
    }
}
