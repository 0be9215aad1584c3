//! HTML rendering for [`BannerView`].
//!
//! Produces the banner card markup with the same class structure the
//! production page uses: a shared base class list plus a control or
//! highlighted treatment, and the experiment badge only when highlighted.

use super::StyleVariant;
use super::component::BannerView;

const BASE_CARD_CLASSES: &str =
    "flex items-center gap-4 max-w-xl w-full rounded-2xl border px-5 py-4 shadow-sm transition-colors";
const CONTROL_CLASSES: &str = "border-border/60 bg-card/95";
const HIGHLIGHTED_CLASSES: &str =
    "border-purple-500/80 bg-purple-50/90 dark:bg-purple-950/40 shadow-lg shadow-purple-500/30";

/// Class list for the card wrapper under the given treatment.
pub fn card_classes(style: StyleVariant) -> String {
    match style {
        StyleVariant::Control => format!("{BASE_CARD_CLASSES} {CONTROL_CLASSES}"),
        StyleVariant::Highlighted => format!("{BASE_CARD_CLASSES} {HIGHLIGHTED_CLASSES}"),
    }
}

/// Render the banner card as an HTML fragment.
///
/// All copy comes from static content tables, so no escaping pass is
/// needed here.
pub fn render_banner(view: &BannerView) -> String {
    let badge = match view.badge {
        Some(text) => format!(
            "<span class=\"banner-badge inline-flex items-center rounded-full \
             bg-purple-100 text-purple-700 px-2 py-0.5 text-[10px] font-semibold \
             tracking-wide uppercase mb-1\">{text}</span>\n          "
        ),
        None => String::new(),
    };

    format!(
        "<div class=\"mt-8 mb-4 flex justify-center\">\n\
         \x20     <div class=\"{card}\" data-variant=\"{variant}\" data-style=\"{style}\">\n\
         \x20       <img src=\"/assets/{image}.jpg\" alt=\"Hedgehog\" \
         class=\"w-20 h-20 rounded-2xl object-cover border border-border\" />\n\
         \x20       <div class=\"space-y-2\">\n\
         \x20         {badge}<p class=\"text-[11px] font-semibold tracking-[0.12em] uppercase text-primary\">{kicker}</p>\n\
         \x20         <p class=\"text-xs font-semibold text-foreground/90\">{title}</p>\n\
         \x20         <p class=\"text-[11px] leading-snug text-muted-foreground\">{body}</p>\n\
         \x20       </div>\n\
         \x20     </div>\n\
         \x20   </div>",
        card = card_classes(view.style),
        variant = view.variant.tag(),
        style = match view.style {
            StyleVariant::Control => "control",
            StyleVariant::Highlighted => "highlighted",
        },
        image = view.image,
        kicker = view.kicker,
        title = view.title,
        body = view.body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::banner::component::Banner;
    use crate::banner::{HIGHLIGHT_BADGE, STYLE_FLAG_KEY, VARIANT_FLAG_KEY};
    use crate::flags::FlagValue;
    use crate::flags::memory::InMemoryFlagClient;
    use std::sync::Arc;

    #[test]
    fn control_card_has_no_badge() {
        let banner = Banner::detached();
        banner.mount();
        let html = render_banner(&banner.view());
        assert!(html.contains(CONTROL_CLASSES));
        assert!(!html.contains("banner-badge"));
        assert!(html.contains("data-variant=\"daurian\""));
        assert!(html.contains("Daurian hedgehog says hi"));
    }

    #[test]
    fn highlighted_card_carries_badge_and_classes() {
        let client = Arc::new(InMemoryFlagClient::new());
        client.set_flag(VARIANT_FLAG_KEY, FlagValue::tag("brandts"));
        client.set_flag(STYLE_FLAG_KEY, FlagValue::tag("highlighted"));
        let banner = Banner::with_client(client);
        banner.mount();

        let html = render_banner(&banner.view());
        assert!(html.contains(HIGHLIGHTED_CLASSES));
        assert!(html.contains(HIGHLIGHT_BADGE));
        assert!(html.contains("data-style=\"highlighted\""));
        assert!(html.contains("hedgehog-brandts"));
    }

    #[test]
    fn card_classes_share_the_base_list() {
        assert!(card_classes(StyleVariant::Control).starts_with(BASE_CARD_CLASSES));
        assert!(card_classes(StyleVariant::Highlighted).starts_with(BASE_CARD_CLASSES));
    }
}
