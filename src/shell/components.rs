//! Presentational primitives of the page shell.
//!
//! Everything here is a pure `data → Markup` transform. Animation is left to
//! CSS and the reveal script; the only motion input is a per-element delay,
//! passed through as the `--reveal-delay` custom property.

use super::reveal::{RevealState, reveal_style};
use crate::types::{BreadcrumbTrail, KeyFact};
use chrono::NaiveDate;
use maud::{Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use serde::Deserialize;
use std::time::Duration;

/// Stagger between consecutive stat pills.
pub const STAT_PILL_STAGGER: Duration = Duration::from_millis(100);

/// Render a markdown fragment to trusted HTML.
pub fn markdown(text: &str) -> Markup {
    let parser = Parser::new(text);
    let mut out = String::new();
    md_html::push_html(&mut out, parser);
    PreEscaped(out)
}

/// Page heading block.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Hero {
    pub title: String,
    /// Trailing part of the title rendered with accent styling.
    #[serde(default)]
    pub title_accent: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
}

/// Visible breadcrumb. Every crumb but the last links to its URL.
pub fn breadcrumb_nav(trail: &BreadcrumbTrail) -> Markup {
    let last = trail.len() - 1;
    html! {
        nav.breadcrumb aria-label="Breadcrumb" {
            ol {
                @for (i, crumb) in trail.iter().enumerate() {
                    li {
                        @match (&crumb.url, i == last) {
                            (Some(url), false) => {
                                a href=(url) { (crumb.name) }
                            }
                            _ => {
                                span aria-current=[(i == last).then_some("page")] { (crumb.name) }
                            }
                        }
                    }
                }
            }
        }
    }
}

pub fn hero(hero: &Hero, trail: &BreadcrumbTrail) -> Markup {
    html! {
        header.hero {
            (breadcrumb_nav(trail))
            h1 {
                (hero.title)
                @if let Some(accent) = &hero.title_accent {
                    " "
                    span.title-accent { (accent) }
                }
            }
            @if let Some(subtitle) = &hero.subtitle {
                p.hero-subtitle { (subtitle) }
            }
        }
    }
}

fn human_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Author line with publication dates. "Updated" appears only when the page
/// changed after it was published.
pub fn byline(author: &str, initials: &str, published: NaiveDate, modified: NaiveDate) -> Markup {
    html! {
        div.byline {
            span.avatar aria-hidden="true" { (initials) }
            div {
                span.author { "By " (author) }
                span.dates {
                    "Published "
                    time datetime=(published.to_string()) { (human_date(published)) }
                    @if modified != published {
                        " · Updated "
                        time datetime=(modified.to_string()) { (human_date(modified)) }
                    }
                }
            }
        }
    }
}

/// Summary box. Its selector is a speakable target by default.
pub fn tldr_box(summary: &str) -> Markup {
    html! {
        aside.tldr-box {
            strong.tldr-label { "TL;DR" }
            (markdown(summary))
        }
    }
}

pub fn stat_pill(fact: &KeyFact, delay: Duration) -> Markup {
    html! {
        div.stat-pill style=(reveal_style(delay)) {
            span.stat-value { (fact.value) }
            span.stat-label { (fact.label) }
        }
    }
}

/// A row of stat pills, staggered [`STAT_PILL_STAGGER`] apart.
pub fn stat_pills(facts: &[KeyFact]) -> Markup {
    html! {
        div.stat-pills {
            @for (i, fact) in facts.iter().enumerate() {
                (stat_pill(fact, STAT_PILL_STAGGER * i as u32))
            }
        }
    }
}

/// In-page navigation to section anchors, in section order.
pub fn section_nav<'a>(links: impl IntoIterator<Item = (&'a str, &'a str)>) -> Markup {
    html! {
        nav.section-nav aria-label="Page sections" {
            @for (id, label) in links {
                a href={ "#" (id) } { (label) }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightVariant {
    #[default]
    Accent,
    Info,
    Warning,
}

impl HighlightVariant {
    pub fn as_str(self) -> &'static str {
        match self {
            HighlightVariant::Accent => "accent",
            HighlightVariant::Info => "info",
            HighlightVariant::Warning => "warning",
        }
    }
}

pub fn highlight_box(variant: HighlightVariant, title: Option<&str>, body: &str) -> Markup {
    html! {
        aside class={ "highlight-box highlight-" (variant.as_str()) } {
            @if let Some(title) = title {
                p.highlight-title { strong { (title) } }
            }
            (markdown(body))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Feature {
    pub title: String,
    pub desc: String,
}

pub fn feature_grid(columns: u8, items: &[Feature]) -> Markup {
    html! {
        div.feature-grid style={ "--columns: " (columns.max(1)) } {
            @for item in items {
                div.feature {
                    h3 { (item.title) }
                    p { (item.desc) }
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GlowCard {
    pub title: String,
    pub value: String,
    #[serde(default)]
    pub subtitle: Option<String>,
}

pub fn glow_cards(items: &[GlowCard]) -> Markup {
    html! {
        div.glow-cards {
            @for card in items {
                div.glow-card {
                    span.glow-title { (card.title) }
                    span.glow-value { (card.value) }
                    @if let Some(subtitle) = &card.subtitle {
                        span.glow-subtitle { (subtitle) }
                    }
                }
            }
        }
    }
}

/// A link to a related page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelatedLink {
    pub href: String,
    pub label: String,
    #[serde(default)]
    pub desc: Option<String>,
}

/// Grid of link cards. Each card reveals on its own, offset by `stagger * i`.
pub fn link_grid(heading: &str, links: &[RelatedLink], stagger: Duration) -> Markup {
    html! {
        section.link-grid {
            h2 { (heading) }
            div.link-cards {
                @for (i, link) in links.iter().enumerate() {
                    a.link-card href=(link.href) data-reveal=(RevealState::Hidden.as_str())
                        style=(reveal_style(stagger * i as u32)) {
                        span.link-label { (link.label) }
                        @if let Some(desc) = &link.desc {
                            span.link-desc { (desc) }
                        }
                    }
                }
            }
        }
    }
}

/// Closing call to action.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Cta {
    pub heading: String,
    #[serde(default)]
    pub text: Option<String>,
    pub href: String,
    pub label: String,
}

pub fn cta(cta: &Cta) -> Markup {
    html! {
        section.cta {
            h2 { (cta.heading) }
            @if let Some(text) = &cta.text {
                p { (text) }
            }
            a.cta-button href=(cta.href) { (cta.label) }
        }
    }
}

pub fn disclaimer(text: &str) -> Markup {
    html! {
        aside.disclaimer role="note" {
            (markdown(text))
        }
    }
}
