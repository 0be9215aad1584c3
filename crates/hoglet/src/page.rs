//! Static campaign page shell.
//!
//! Everything on the page except the banner is fixed copy: the outbound
//! campaign sections, selected accounts, and the outreach sequence. The
//! banner slot is the only flag-driven region; [`render_page`] takes a
//! resolved [`BannerView`] and embeds its card in the hero section.

use crate::banner::component::BannerView;
use crate::banner::html::render_banner;

/// Page title shown in the header and the document title.
pub const PAGE_TITLE: &str = "Outbound";

/// Navigation entries: anchor id and label, in header order.
pub const NAV_LINKS: &[(&str, &str)] = &[
    ("hero", "Overview"),
    ("icp-to-segment", "Segment"),
    ("why-this", "Why"),
    ("why-not", "Other Slices"),
    ("who-to-call", "Selected Accounts"),
    ("validation", "Validation"),
];

/// Anchor ids of every section the page renders, in document order.
pub const SECTION_IDS: &[&str] = &[
    "hero",
    "icp-to-segment",
    "chosen-segment",
    "why-this",
    "why-not",
    "who-to-call",
    "example-email",
    "follow-up-plan",
    "validation",
];

/// A selected outbound account.
pub struct Account {
    pub name: &'static str,
    pub pitch: &'static str,
}

/// Accounts featured in the "Selected Accounts" section.
pub const ACCOUNTS: &[Account] = &[
    Account {
        name: "Pinecone",
        pitch: "Vector database with a strong PLG motion; engineers own the \
                analytics and rollout stack.",
    },
    Account {
        name: "Turso",
        pitch: "Edge database startup, developer-first, fragmented product \
                analytics across several vendors.",
    },
    Account {
        name: "Qdrant",
        pitch: "Open-source vector search; heavy experimentation culture and \
                usage-based spend pressure.",
    },
];

/// One step of the outreach sequence shown in the follow-up accordion.
pub struct OutreachStep {
    pub label: &'static str,
    pub day: u8,
}

pub const OUTREACH_STEPS: &[OutreachStep] = &[
    OutreachStep { label: "Email #1: intro", day: 1 },
    OutreachStep { label: "Call #1", day: 2 },
    OutreachStep { label: "LinkedIn connection request", day: 4 },
    OutreachStep { label: "Call #2", day: 7 },
    OutreachStep { label: "Email #2: one relevant example", day: 9 },
    OutreachStep { label: "Call #3", day: 10 },
    OutreachStep { label: "LinkedIn DM", day: 14 },
    OutreachStep { label: "Call #4", day: 14 },
    OutreachStep { label: "Email #3: follow-up", day: 17 },
];

fn render_nav() -> String {
    NAV_LINKS
        .iter()
        .map(|(id, label)| format!("<a href=\"#{id}\" class=\"nav-link\">{label}</a>"))
        .collect::<Vec<_>>()
        .join("\n        ")
}

fn render_accounts() -> String {
    ACCOUNTS
        .iter()
        .map(|account| {
            format!(
                "<div class=\"account-card\"><h3>{}</h3><p>{}</p></div>",
                account.name, account.pitch
            )
        })
        .collect::<Vec<_>>()
        .join("\n        ")
}

fn render_outreach() -> String {
    OUTREACH_STEPS
        .iter()
        .enumerate()
        .map(|(i, step)| {
            format!(
                "<li class=\"outreach-step\">Step {} – {} (Day {})</li>",
                i + 1,
                step.label,
                step.day
            )
        })
        .collect::<Vec<_>>()
        .join("\n          ")
}

/// Render the full page around a resolved banner view.
pub fn render_page(banner: &BannerView) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>{PAGE_TITLE}</title>
</head>
<body class="min-h-screen bg-background">
  <header class="sticky top-0 z-50 bg-background border-b border-border">
    <div class="max-w-[900px] mx-auto px-6 py-4 flex items-center justify-between">
      <h1 class="text-lg font-semibold">{PAGE_TITLE}</h1>
      <nav class="hidden md:flex gap-6 text-sm">
        {nav}
      </nav>
    </div>
  </header>
  <main class="max-w-[900px] mx-auto px-6">
    <section id="hero" class="py-24">
      <h1 class="text-5xl font-bold text-center">Proposed outbound campaign</h1>
      <div id="icp-to-segment" class="grid md:grid-cols-2 gap-6 mt-12">
        <div class="p-6 border rounded-lg">
          <h3>PostHog's ICP</h3>
          <p>High growth, product led B2B companies where engineers drive product decisions.</p>
        </div>
        <div class="p-6 border rounded-lg">
          <h3>My starting segment</h3>
          <p>VC backed devtools and AI infra companies, Seed to Series C, roughly 20 to 250
             people, with a PLG motion and a fragmented analytics and experimentation stack.</p>
        </div>
      </div>
      {banner}
    </section>
    <section id="chosen-segment" class="py-16">
      <h2>Chosen starting segment</h2>
      <p>VC backed devtools and AI infrastructure startups. Seed to Series C. Product led.
         Engineers own analytics, feature flags and rollout.</p>
    </section>
    <section id="why-this" class="py-16">
      <h2>Why this segment is the best starting point</h2>
      <p>Acute pain, real buyer interest, fast outbound cycles.</p>
    </section>
    <section id="why-not" class="py-16">
      <h2>Why I wouldn't anchor the first outbound play on other slices</h2>
    </section>
    <section id="who-to-call" class="py-16">
      <h2>Selected Accounts</h2>
      <div class="grid md:grid-cols-3 gap-6">
        {accounts}
      </div>
    </section>
    <section id="example-email" class="py-16">
      <h2>Example first email</h2>
    </section>
    <section id="follow-up-plan" class="py-16">
      <h2>How I'd continue the outreach</h2>
      <ol class="space-y-3">
          {outreach}
      </ol>
    </section>
    <section id="validation" class="py-16">
      <h2>Validation</h2>
      <p>Run the sequence against a 50-account list and measure reply rate before scaling.</p>
    </section>
  </main>
</body>
</html>"#,
        nav = render_nav(),
        banner = render_banner(banner),
        accounts = render_accounts(),
        outreach = render_outreach(),
    )
}
