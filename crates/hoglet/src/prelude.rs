//! Convenience re-exports for common `hoglet` types.
//!
//! Meant to be glob-imported when wiring a page:
//!
//! ```ignore
//! use hoglet::prelude::*;
//! ```
//!
//! This pulls in the flag client boundary, the in-memory and remote
//! clients, the banner component and resolvers, and the page renderer.
//! Wire-level details (retry policy, handler registry) are intentionally
//! excluded — import those from their modules directly when needed.

// ── Flag boundary ───────────────────────────────────────────────────
pub use crate::flags::{
    CompositeFlagHandler, FlagClient, FlagHandler, FlagSnapshot, FlagValue, FnFlagHandler,
    HandlerId, LoggingFlagHandler, NoopFlagHandler,
};

// ── Clients ─────────────────────────────────────────────────────────
pub use crate::flags::memory::InMemoryFlagClient;
pub use crate::flags::remote::{RemoteConfig, RemoteFlagClient};

// ── Banner ──────────────────────────────────────────────────────────
pub use crate::banner::component::{Banner, BannerView};
pub use crate::banner::html::render_banner;
pub use crate::banner::{
    HedgehogVariant, STYLE_FLAG_KEY, StyleVariant, VARIANT_FLAG_KEY,
};

// ── Page ────────────────────────────────────────────────────────────
pub use crate::page::render_page;
