//! Feature-flag driven campaign page toolkit.
//!
//! `hoglet` renders an outbound campaign page whose hero banner is driven
//! by two remotely evaluated feature flags: a cohort flag that picks which
//! hedgehog a visitor sees and a style flag that toggles a highlighted
//! treatment. The core design goal is total resilience — a missing
//! provider, a failed poll, or a junk evaluation never breaks the page; it
//! just falls back to the default Daurian banner.
//!
//! Architecture, from provider to pixels:
//!
//! ```text
//! RemoteFlagClient ──poll──▶ FlagSnapshot ──notify──▶ Banner (cohort state)
//! InMemoryFlagClient ─set──▶              └─flag_value─▶ Banner::view() (style)
//!                                                             │
//!                                              render_banner / render_page
//! ```
//!
//! # Getting started
//!
//! ```ignore
//! use hoglet::prelude::*;
//!
//! let client: Arc<dyn FlagClient> = Arc::new(InMemoryFlagClient::new());
//! client.on_flags_updated(Arc::new(LoggingFlagHandler));
//!
//! let banner = Banner::with_client(client.clone());
//! banner.mount();
//! println!("{}", render_page(&banner.view()));
//! banner.unmount();
//! ```
//!
//! The flag client is always injected explicitly. Pass `None` (or use
//! [`Banner::detached`](banner::component::Banner::detached)) to render a
//! provider-less page; every flag-driven decision then takes its default.

pub mod banner;
pub mod flags;
pub mod page;
pub mod prelude;
