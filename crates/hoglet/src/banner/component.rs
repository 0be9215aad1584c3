//! The live banner component: subscription lifecycle and render views.
//!
//! [`Banner`] mirrors a mounted UI component. Mounting subscribes to the
//! flag client and immediately resolves the current evaluations; rendering
//! ([`view`](Banner::view)) produces an immutable [`BannerView`];
//! unmounting releases the subscription unconditionally, including via
//! [`Drop`].
//!
//! One asymmetry is deliberate and load-bearing: the cohort variant lives
//! in component state and moves only on flag notifications, while the
//! style treatment is read from the client at render time. A style-only
//! flag change therefore shows up on the next render without any
//! notification, and a cohort change never shows up without one. This
//! matches the production behavior this component tracks; do not "fix" it
//! by caching the style read.

use serde::Serialize;
use std::sync::{Arc, Mutex};
use tracing::{debug, trace};

use crate::flags::{FlagClient, FnFlagHandler, HandlerId};

use super::{
    BANNER_KICKER, HIGHLIGHT_BADGE, HedgehogVariant, STYLE_FLAG_KEY, StyleVariant,
    VARIANT_FLAG_KEY,
};

/// Everything a renderer needs to draw the banner once.
#[derive(Clone, Debug, Serialize)]
pub struct BannerView {
    pub variant: HedgehogVariant,
    pub style: StyleVariant,
    pub kicker: &'static str,
    pub title: &'static str,
    pub body: &'static str,
    pub image: &'static str,
    /// Badge text, present only under the highlighted treatment.
    pub badge: Option<&'static str>,
}

/// Cohort state owned by the component, updated via flag notifications.
#[derive(Debug, Default)]
struct BannerState {
    variant: HedgehogVariant,
}

/// A flag-driven banner with an explicit mount/unmount lifecycle.
///
/// The flag client is injected, never discovered ambiently; `None` models
/// a page without a provider and every operation degrades to defaults.
/// All methods take `&self` so a mounted banner can be shared behind an
/// `Arc` (web handlers, broadcast bridges) while teardown still works.
pub struct Banner {
    client: Option<Arc<dyn FlagClient>>,
    state: Arc<Mutex<BannerState>>,
    subscription: Mutex<Option<HandlerId>>,
}

impl Banner {
    /// Create an unmounted banner with an optional flag client.
    pub fn new(client: Option<Arc<dyn FlagClient>>) -> Self {
        Self {
            client,
            state: Arc::new(Mutex::new(BannerState::default())),
            subscription: Mutex::new(None),
        }
    }

    /// Banner wired to a flag client.
    pub fn with_client(client: Arc<dyn FlagClient>) -> Self {
        Self::new(Some(client))
    }

    /// Banner with no flag provider at all; renders defaults forever.
    pub fn detached() -> Self {
        Self::new(None)
    }

    /// Subscribe to flag updates and resolve the current evaluations.
    ///
    /// Idempotent: a second mount while mounted is a no-op, so at most one
    /// subscription exists. Without a client this does nothing.
    pub fn mount(&self) {
        let Some(client) = &self.client else {
            trace!("Banner mounted without a flag client; defaults apply");
            return;
        };

        {
            let mut sub = match self.subscription.lock() {
                Ok(s) => s,
                Err(_) => return,
            };
            if sub.is_some() {
                return;
            }
            let state = Arc::clone(&self.state);
            let id = client.on_flags_updated(Arc::new(FnFlagHandler::new(move |snapshot| {
                let variant = HedgehogVariant::resolve(snapshot.get(VARIANT_FLAG_KEY));
                if let Ok(mut state) = state.lock() {
                    if state.variant != variant {
                        debug!("Banner cohort changed to {variant:?}");
                    }
                    state.variant = variant;
                }
            })));
            *sub = Some(id);
        }

        // Flags may already be loaded; resolve once without waiting for a
        // notification.
        let variant = HedgehogVariant::resolve(client.flag_value(VARIANT_FLAG_KEY).as_ref());
        if let Ok(mut state) = self.state.lock() {
            state.variant = variant;
        }
        debug!("Banner mounted, initial cohort {variant:?}");
    }

    /// Release the subscription. Safe to call at any time, from any state;
    /// a stale or absent subscription is a no-op on the client side.
    pub fn unmount(&self) {
        let id = self.subscription.lock().ok().and_then(|mut s| s.take());
        if let (Some(client), Some(id)) = (&self.client, id) {
            client.off_flags_updated(id);
            debug!("Banner unmounted");
        }
    }

    /// Whether a subscription is currently held.
    pub fn is_mounted(&self) -> bool {
        self.subscription
            .lock()
            .map(|s| s.is_some())
            .unwrap_or(false)
    }

    /// Produce the current render view.
    ///
    /// The cohort comes from component state; the style treatment is
    /// re-read from the client on every call (see module docs for why).
    pub fn view(&self) -> BannerView {
        let variant = self
            .state
            .lock()
            .map(|s| s.variant)
            .unwrap_or_default();
        let style = match &self.client {
            Some(client) => StyleVariant::resolve(client.flag_value(STYLE_FLAG_KEY).as_ref()),
            None => StyleVariant::Control,
        };
        let content = variant.content();
        BannerView {
            variant,
            style,
            kicker: BANNER_KICKER,
            title: content.title,
            body: content.body,
            image: content.image,
            badge: style.badge_visible().then_some(HIGHLIGHT_BADGE),
        }
    }
}

impl Drop for Banner {
    fn drop(&mut self) {
        self.unmount();
    }
}
