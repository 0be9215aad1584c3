//! Hedgehog banner: variant resolution, content, and the live component.
//!
//! Two independent flags drive the banner. `hedgehog_variant` picks which
//! hedgehog cohort a visitor sees; `loud-hedgehogs` picks a visual
//! treatment. Both resolvers are total functions — any input they do not
//! recognize, including an absent flag client, lands on a safe default.
//!
//! | Flag | Recognized tags | Default |
//! |------|-----------------|---------|
//! | `hedgehog_variant` | `daurian`, `long_eared`, `brandts` | [`HedgehogVariant::Daurian`] |
//! | `loud-hedgehogs` | `highlighted` | [`StyleVariant::Control`] |

pub mod component;
pub mod html;

use serde::{Deserialize, Serialize};

use crate::flags::FlagValue;

/// Flag key selecting the hedgehog cohort.
pub const VARIANT_FLAG_KEY: &str = "hedgehog_variant";

/// Flag key selecting the visual treatment.
pub const STYLE_FLAG_KEY: &str = "loud-hedgehogs";

/// Tag that switches the style treatment on. Any other value is control.
pub const HIGHLIGHTED_TAG: &str = "highlighted";

/// Badge shown on the card when the highlighted treatment is active.
pub const HIGHLIGHT_BADGE: &str = "EXPERIMENT VARIANT: LOUD HEDGEHOG";

/// Kicker line rendered above the title on every variant.
pub const BANNER_KICKER: &str = "This is a feature flags test!!";

// ── Primary variant ────────────────────────────────────────────────

/// Which hedgehog cohort the visitor was bucketed into.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HedgehogVariant {
    /// The fallback cohort for unrecognized or absent evaluations.
    #[default]
    Daurian,
    LongEared,
    Brandts,
}

impl HedgehogVariant {
    /// Resolve a raw flag evaluation into a cohort.
    ///
    /// Total over every input: booleans, numbers, unrecognized tags, and
    /// `None` all map to [`HedgehogVariant::Daurian`]. Re-resolving an
    /// already resolved tag yields the same cohort.
    pub fn resolve(value: Option<&FlagValue>) -> Self {
        match value.and_then(FlagValue::as_tag) {
            Some("daurian") => HedgehogVariant::Daurian,
            Some("long_eared") => HedgehogVariant::LongEared,
            Some("brandts") => HedgehogVariant::Brandts,
            _ => HedgehogVariant::Daurian,
        }
    }

    /// The tag this cohort resolves from.
    pub fn tag(&self) -> &'static str {
        match self {
            HedgehogVariant::Daurian => "daurian",
            HedgehogVariant::LongEared => "long_eared",
            HedgehogVariant::Brandts => "brandts",
        }
    }

    /// Static card content for this cohort.
    pub fn content(&self) -> &'static BannerContent {
        match self {
            HedgehogVariant::Daurian => &DAURIAN,
            HedgehogVariant::LongEared => &LONG_EARED,
            HedgehogVariant::Brandts => &BRANDTS,
        }
    }
}

// ── Style variant ──────────────────────────────────────────────────

/// Visual treatment of the banner card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleVariant {
    /// Plain card, no badge.
    #[default]
    Control,
    /// Purple-accented card with the experiment badge.
    Highlighted,
}

impl StyleVariant {
    /// Resolve a raw flag evaluation into a treatment.
    ///
    /// Only the exact tag [`HIGHLIGHTED_TAG`] opts in; everything else —
    /// other tags, booleans, numbers, absence — is control.
    pub fn resolve(value: Option<&FlagValue>) -> Self {
        match value.and_then(FlagValue::as_tag) {
            Some(tag) if tag == HIGHLIGHTED_TAG => StyleVariant::Highlighted,
            _ => StyleVariant::Control,
        }
    }

    /// Whether the experiment badge is shown.
    pub fn badge_visible(&self) -> bool {
        matches!(self, StyleVariant::Highlighted)
    }
}

// ── Content ────────────────────────────────────────────────────────

/// Static copy for one hedgehog cohort.
#[derive(Debug, Serialize)]
pub struct BannerContent {
    pub title: &'static str,
    pub body: &'static str,
    /// Image asset slug, resolved by the renderer.
    pub image: &'static str,
}

static DAURIAN: BannerContent = BannerContent {
    title: "Daurian hedgehog says hi 🦔",
    body: "Feature-flag roulette picked Daurian for you. Refresh or come back \
           later if you want to hunt the Long-eared or Brandt's variants.",
    image: "hedgehog-daurian",
};

static LONG_EARED: BannerContent = BannerContent {
    title: "You rolled Long-eared 🦔",
    body: "PostHog's feature flag put you in the Long-eared cohort \
           (Hemiechinus, house favourite). Come back and you might bump into \
           Daurian or Brandt's instead.",
    image: "hedgehog-long-eared",
};

static BRANDTS: BannerContent = BannerContent {
    title: "Brandt's hedgehog, rare spawn 🦔",
    body: "This page is running a PostHog feature flag. Today you got \
           Brandt's; next visit you might see Daurian or Long-eared instead.",
    image: "hedgehog-brandts",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognized_tags_map_one_to_one() {
        for variant in [
            HedgehogVariant::Daurian,
            HedgehogVariant::LongEared,
            HedgehogVariant::Brandts,
        ] {
            let value = FlagValue::tag(variant.tag());
            assert_eq!(HedgehogVariant::resolve(Some(&value)), variant);
        }
    }

    #[test]
    fn unrecognized_inputs_default_to_daurian() {
        for value in [
            FlagValue::tag("dwarf"),
            FlagValue::tag("DAURIAN"), // case-sensitive match only
            FlagValue::tag(""),
            FlagValue::Bool(true),
            FlagValue::Number(2.0),
        ] {
            assert_eq!(
                HedgehogVariant::resolve(Some(&value)),
                HedgehogVariant::Daurian,
                "input {value:?} should fall back"
            );
        }
        assert_eq!(HedgehogVariant::resolve(None), HedgehogVariant::Daurian);
    }

    #[test]
    fn only_highlighted_tag_opts_into_style() {
        let on = FlagValue::tag("highlighted");
        assert_eq!(StyleVariant::resolve(Some(&on)), StyleVariant::Highlighted);

        for value in [
            FlagValue::tag("control"),
            FlagValue::tag("Highlighted"),
            FlagValue::Bool(true),
            FlagValue::Number(1.0),
        ] {
            assert_eq!(StyleVariant::resolve(Some(&value)), StyleVariant::Control);
        }
        assert_eq!(StyleVariant::resolve(None), StyleVariant::Control);
    }

    #[test]
    fn resolution_is_idempotent() {
        let value = FlagValue::tag("brandts");
        let first = HedgehogVariant::resolve(Some(&value));
        let second = HedgehogVariant::resolve(Some(&FlagValue::tag(first.tag())));
        assert_eq!(first, second);
    }

    #[test]
    fn each_cohort_has_distinct_content() {
        let titles = [
            HedgehogVariant::Daurian.content().title,
            HedgehogVariant::LongEared.content().title,
            HedgehogVariant::Brandts.content().title,
        ];
        assert_ne!(titles[0], titles[1]);
        assert_ne!(titles[1], titles[2]);
        assert!(
            titles
                .iter()
                .zip(["Daurian", "Long-eared", "Brandt's"])
                .all(|(title, name)| title.contains(name))
        );
    }

    #[test]
    fn badge_follows_style_variant() {
        assert!(StyleVariant::Highlighted.badge_visible());
        assert!(!StyleVariant::Control.badge_visible());
    }

    #[test]
    fn variant_serializes_snake_case() {
        let json = serde_json::to_string(&HedgehogVariant::LongEared).unwrap();
        assert_eq!(json, "\"long_eared\"");
        let back: HedgehogVariant = serde_json::from_str(&json).unwrap();
        assert_eq!(back, HedgehogVariant::LongEared);
    }
}
