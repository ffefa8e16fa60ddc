//! Page composition.
//!
//! A page file (`content/<section>/NNN-slug.toml`) deserializes into a
//! [`PageSource`]. Once validated it is resolved against its location and the
//! site config into a [`Page`]: the immutable [`ContentFact`] plus a
//! [`Layout`] describing the visible blocks.
//!
//! Rendering reads both halves from the same [`Page`]:
//!
//! - [`schema_graph`] feeds `page.fact` to the [`SchemaGraphBuilder`].
//! - [`render_page`] embeds that graph in the head and builds the body from the
//!   shell components. The FAQ accordion and the `FAQPage` node both borrow
//!   `page.fact.faq`, and the visible breadcrumb and the `BreadcrumbList` both
//!   borrow `page.fact.breadcrumb`.
//!
//! ## Document layout
//!
//! ```text
//! <html data-reveal-margin="60">
//!   <head>  meta, canonical, robots, inline CSS, reveal bootstrap, JSON-LD
//!   <body>
//!     <main>
//!       hero (breadcrumb + h1)   byline   TL;DR   stat pills   section nav
//!       reveal sections (h2)...  how-to   related grid   FAQ   CTA   disclaimer
//!     </main>
//!     <script> shell.js
//! ```
//!
//! Hidden reveal styling is scoped under `html.js-reveal`, which the head
//! bootstrap only adds when `IntersectionObserver` exists. Without script or
//! without intersection support every section renders visible.

use crate::config::{SiteConfig, generate_reveal_css};
use crate::schema::{GraphExtras, SchemaGraphBuilder, SchemaNode, SiteIdentity, to_json_ld};
use crate::shell::components::{
    Cta, Feature, GlowCard, HighlightVariant, Hero, RelatedLink, byline, cta, disclaimer,
    feature_grid, glow_cards, hero, highlight_box, link_grid, markdown, section_nav, stat_pills,
    tldr_box,
};
use crate::shell::{DataTable, faq_accordion, key_facts_table, reveal_section};
use crate::naming::slugify;
use crate::types::{
    BreadcrumbTrail, ContentFact, Crumb, FaqList, HowTo, KeyFact, PersonProfile,
};
use chrono::NaiveDate;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;

const CSS_STATIC: &str = include_str!("../static/style.css");
const SHELL_JS: &str = include_str!("../static/shell.js");

/// Runs before first paint so hidden sections never flash in and out.
const REVEAL_BOOTSTRAP: &str =
    "if('IntersectionObserver' in window)document.documentElement.classList.add('js-reveal');";

/// Anchor of the FAQ section.
pub const FAQ_ANCHOR: &str = "faq";
/// Anchor of the how-to section.
pub const HOW_TO_ANCHOR: &str = "how-to";

// ============================================================================
// Page files
// ============================================================================

/// A page file as written.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageSource {
    pub headline: String,
    pub description: String,
    pub date_published: NaiveDate,
    pub date_modified: NaiveDate,
    /// Defaults to `{base_url}/{section}/{slug}`.
    #[serde(default)]
    pub canonical_url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    /// Defaults to `Home → <Section> → <breadcrumb_label or headline>`.
    #[serde(default)]
    pub breadcrumb: Option<BreadcrumbTrail>,
    #[serde(default)]
    pub breadcrumb_label: Option<String>,
    #[serde(default)]
    pub faq: FaqList,
    #[serde(default)]
    pub key_facts: Vec<KeyFact>,
    #[serde(default)]
    pub hero: Option<Hero>,
    #[serde(default)]
    pub tldr: Option<String>,
    #[serde(default)]
    pub stats: Vec<KeyFact>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub related: Vec<RelatedLink>,
    #[serde(default)]
    pub cta: Option<Cta>,
    #[serde(default)]
    pub person: Option<PersonProfile>,
    #[serde(default)]
    pub how_to: Option<HowTo>,
    /// Show the site disclaimer at the bottom of the page.
    #[serde(default)]
    pub disclaimer: bool,
    /// Emit a speakable `WebPage` node.
    #[serde(default = "default_true")]
    pub speakable: bool,
}

fn default_true() -> bool {
    true
}

/// A titled content section. Rendered as a reveal section with an `h2`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Section {
    pub id: String,
    /// Section-nav label. Defaults to the heading.
    #[serde(default)]
    pub label: Option<String>,
    pub heading: String,
    /// Markdown shown before the blocks.
    #[serde(default)]
    pub body: Option<String>,
    /// Offset before this section starts revealing.
    #[serde(default)]
    pub delay_ms: u32,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Section {
    pub fn nav_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.heading)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms.into())
    }
}

/// A content block within a section, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Block {
    Markdown {
        body: String,
    },
    Highlight {
        #[serde(default)]
        variant: HighlightVariant,
        #[serde(default)]
        title: Option<String>,
        body: String,
    },
    Table(DataTable),
    /// The page's `key_facts`.
    KeyFacts,
    Features {
        #[serde(default = "default_columns")]
        columns: u8,
        items: Vec<Feature>,
    },
    GlowCards {
        items: Vec<GlowCard>,
    },
}

fn default_columns() -> u8 {
    2
}

impl PageSource {
    /// Check the contract the schema builder and shell rely on.
    ///
    /// Returns every problem found, joined into one message.
    pub fn validate(&self) -> Result<(), String> {
        let mut problems = Vec::new();

        if self.headline.trim().is_empty() {
            problems.push("headline is empty".to_string());
        }
        if self.description.trim().is_empty() {
            problems.push("description is empty".to_string());
        }
        if self.date_modified < self.date_published {
            problems.push(format!(
                "date_modified {} is before date_published {}",
                self.date_modified, self.date_published
            ));
        }
        if let Some(url) = &self.canonical_url
            && url::Url::parse(url).is_err()
        {
            problems.push(format!("canonical_url '{url}' is not an absolute URL"));
        }

        let mut questions = HashSet::new();
        for item in &self.faq {
            if item.question.trim().is_empty() || item.answer.trim().is_empty() {
                problems.push("FAQ entries need a question and an answer".to_string());
            }
            if !questions.insert(item.question.as_str()) {
                problems.push(format!("duplicate FAQ question '{}'", item.question));
            }
        }

        // Every element id in the body: reserved anchors, accordion controls,
        // section ids and FAQ entry anchors share one namespace.
        let mut ids: HashSet<String> = HashSet::new();
        if !self.faq.is_empty() {
            ids.insert(FAQ_ANCHOR.to_string());
        }
        if self.how_to.is_some() {
            ids.insert(HOW_TO_ANCHOR.to_string());
        }
        for index in 0..self.faq.len() {
            ids.insert(format!("faq-{index}-button"));
            ids.insert(format!("faq-{index}-panel"));
        }
        for section in &self.sections {
            if section.id.is_empty() {
                problems.push(format!("section '{}' has no id", section.heading));
            } else if slugify(&section.id) != section.id {
                problems.push(format!(
                    "section id '{}' is not a valid anchor (try '{}')",
                    section.id,
                    slugify(&section.id)
                ));
            } else if !ids.insert(section.id.clone()) {
                problems.push(format!("duplicate section id '{}'", section.id));
            }
            for block in &section.blocks {
                match block {
                    Block::Table(table) => {
                        let width = table.headers.len();
                        if table.rows.iter().any(|row| row.len() != width) {
                            problems.push(format!(
                                "table in section '{}' has rows without {width} cells",
                                section.id
                            ));
                        }
                        if table.highlight_col.is_some_and(|col| col >= width) {
                            problems.push(format!(
                                "table in section '{}' highlights a missing column",
                                section.id
                            ));
                        }
                    }
                    Block::KeyFacts if self.key_facts.is_empty() => {
                        problems.push(format!(
                            "section '{}' shows key facts but the page has none",
                            section.id
                        ));
                    }
                    _ => {}
                }
            }
        }

        for item in &self.faq {
            let anchor = slugify(&item.question);
            if !anchor.is_empty() && !ids.insert(anchor.clone()) {
                problems.push(format!(
                    "FAQ question '{}' has anchor '{anchor}', which is already in use",
                    item.question
                ));
            }
        }

        if let Some(guide) = &self.how_to
            && guide.steps.is_empty()
        {
            problems.push("how_to has no steps".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems.join("; "))
        }
    }

    /// Resolve defaults that depend on where the file lives.
    pub fn into_page(self, location: PageLocation<'_>, config: &SiteConfig) -> Page {
        let section_slug = location.section.map(|s| s.slug);
        let path = page_path(section_slug, location.slug);
        let base_url = config.base_url();

        let canonical_url = self
            .canonical_url
            .unwrap_or_else(|| format!("{base_url}{path}"));
        let breadcrumb = match self.breadcrumb {
            Some(trail) => trail,
            None => {
                let label = self
                    .breadcrumb_label
                    .unwrap_or_else(|| self.headline.clone());
                default_trail(base_url, location.section, label)
            }
        };
        let hero = self.hero.unwrap_or_else(|| Hero {
            title: self.headline.clone(),
            title_accent: None,
            subtitle: Some(self.description.clone()),
        });

        Page {
            section: section_slug.map(str::to_string),
            slug: location.slug.to_string(),
            number: location.number,
            source_path: location.source_path.to_string(),
            fact: ContentFact {
                headline: self.headline,
                description: self.description,
                canonical_url,
                date_published: self.date_published,
                date_modified: self.date_modified,
                breadcrumb,
                faq: self.faq,
                key_facts: self.key_facts,
                image: self.image,
            },
            layout: Layout {
                hero,
                tldr: self.tldr,
                stats: self.stats,
                sections: self.sections,
                related: self.related,
                cta: self.cta,
                person: self.person,
                how_to: self.how_to,
                disclaimer: self.disclaimer,
                speakable: self.speakable,
            },
        }
    }
}

fn default_trail(base_url: &str, section: Option<SectionRef<'_>>, label: String) -> BreadcrumbTrail {
    let home = Crumb::linked("Home", base_url);
    let section_crumb =
        section.map(|s| Crumb::linked(s.title, format!("{base_url}{}", section_path(s.slug))));
    BreadcrumbTrail::with_root(home, section_crumb.into_iter().chain([Crumb::current(label)]))
}

/// The section directory a page file was found in.
#[derive(Debug, Clone, Copy)]
pub struct SectionRef<'a> {
    pub slug: &'a str,
    pub title: &'a str,
}

/// Where a page file lives within the content root.
#[derive(Debug, Clone, Copy)]
pub struct PageLocation<'a> {
    pub section: Option<SectionRef<'a>>,
    pub slug: &'a str,
    pub number: Option<u32>,
    pub source_path: &'a str,
}

/// Site path of a section index, e.g. `/learn`.
pub fn section_path(section: &str) -> String {
    format!("/{section}")
}

/// Site path of a page, e.g. `/learn/what-is-xrp`.
pub fn page_path(section: Option<&str>, slug: &str) -> String {
    match section {
        Some(section) => format!("/{section}/{slug}"),
        None => format!("/{slug}"),
    }
}

// ============================================================================
// Resolved pages
// ============================================================================

/// A resolved page: its content facts plus its visible layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub section: Option<String>,
    pub slug: String,
    /// Position on the section index; unnumbered pages are not listed.
    pub number: Option<u32>,
    /// Page file relative to the content root.
    pub source_path: String,
    pub fact: ContentFact,
    pub layout: Layout,
}

/// Everything visible that is not part of the [`ContentFact`].
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub hero: Hero,
    pub tldr: Option<String>,
    pub stats: Vec<KeyFact>,
    pub sections: Vec<Section>,
    pub related: Vec<RelatedLink>,
    pub cta: Option<Cta>,
    pub person: Option<PersonProfile>,
    pub how_to: Option<HowTo>,
    pub disclaimer: bool,
    pub speakable: bool,
}

impl Page {
    pub fn path(&self) -> String {
        page_path(self.section.as_deref(), &self.slug)
    }

    /// Output file relative to the output directory.
    pub fn output_path(&self) -> String {
        format!("{}/index.html", self.path().trim_start_matches('/'))
    }

    pub fn in_index(&self) -> bool {
        self.number.is_some()
    }

    /// Anchors for the section nav, in page order.
    pub fn nav_links(&self) -> Vec<(&str, &str)> {
        let mut links: Vec<(&str, &str)> = self
            .layout
            .sections
            .iter()
            .map(|s| (s.id.as_str(), s.nav_label()))
            .collect();
        if self.layout.how_to.is_some() {
            links.push((HOW_TO_ANCHOR, "How To"));
        }
        if !self.fact.faq.is_empty() {
            links.push((FAQ_ANCHOR, "FAQ"));
        }
        links
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// The page's JSON-LD graph.
pub fn schema_graph(page: &Page, identity: &SiteIdentity) -> Vec<SchemaNode> {
    SchemaGraphBuilder::new(identity).page_graph(
        &page.fact,
        GraphExtras {
            speakable: page.layout.speakable,
            person: page.layout.person.as_ref(),
            how_to: page.layout.how_to.as_ref(),
        },
    )
}

/// Head metadata of a rendered document.
#[derive(Debug, Clone, Default)]
pub struct DocumentHead {
    pub title: String,
    pub description: Option<String>,
    pub canonical_url: Option<String>,
    pub noindex: bool,
    pub json_ld: Option<String>,
}

/// Shared document shell for pages and indexes.
pub fn base_document(config: &SiteConfig, head: &DocumentHead, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang=(config.site.language) data-reveal-margin=(config.reveal.root_margin_px) {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (head.title) }
                @if let Some(description) = &head.description {
                    meta name="description" content=(description);
                }
                @if let Some(url) = &head.canonical_url {
                    link rel="canonical" href=(url);
                }
                @if head.noindex {
                    meta name="robots" content="noindex, follow";
                }
                style { (PreEscaped(generate_reveal_css(&config.reveal))) "\n" (PreEscaped(CSS_STATIC)) }
                script { (PreEscaped(REVEAL_BOOTSTRAP)) }
                @if let Some(json) = &head.json_ld {
                    script type="application/ld+json" { (PreEscaped(json)) }
                }
            }
            body {
                (content)
                script { (PreEscaped(SHELL_JS)) }
            }
        }
    }
}

/// Render a full page document.
pub fn render_page(page: &Page, config: &SiteConfig) -> Result<Markup, serde_json::Error> {
    let graph = schema_graph(page, &config.identity());
    let head = DocumentHead {
        title: format!("{} | {}", page.fact.headline, config.site.name),
        description: Some(page.fact.description.clone()),
        canonical_url: Some(page.fact.canonical_url.clone()),
        noindex: config.is_noindex(&page.path()),
        json_ld: Some(to_json_ld(&graph)?),
    };
    Ok(base_document(config, &head, page_body(page, config)))
}

fn page_body(page: &Page, config: &SiteConfig) -> Markup {
    let fact = &page.fact;
    let layout = &page.layout;
    let nav = page.nav_links();
    let card_stagger = Duration::from_millis(config.reveal.stagger_ms.into());

    html! {
        main.learn-page {
            (hero(&layout.hero, &fact.breadcrumb))
            (byline(&config.author.name, &config.author.initials, fact.date_published, fact.date_modified))
            @if let Some(summary) = &layout.tldr {
                (tldr_box(summary))
            }
            @if !layout.stats.is_empty() {
                (stat_pills(&layout.stats))
            }
            @if nav.len() > 1 {
                (section_nav(nav.iter().copied()))
            }
            @for section in &layout.sections {
                (render_section(section, &fact.key_facts))
            }
            @if let Some(guide) = &layout.how_to {
                (how_to_section(guide))
            }
            @if !layout.related.is_empty() {
                (link_grid("Related Guides", &layout.related, card_stagger))
            }
            @if !fact.faq.is_empty() {
                (reveal_section(Some(FAQ_ANCHOR), Duration::ZERO, html! {
                    h2 { "Frequently Asked Questions" }
                    (faq_accordion(&fact.faq))
                }))
            }
            @if let Some(call) = &layout.cta {
                (cta(call))
            }
            @if layout.disclaimer {
                (disclaimer(&config.site.disclaimer))
            }
        }
    }
}

fn render_section(section: &Section, key_facts: &[KeyFact]) -> Markup {
    reveal_section(Some(&section.id), section.delay(), html! {
        h2 { (section.heading) }
        @if let Some(body) = &section.body {
            (markdown(body))
        }
        @for block in &section.blocks {
            (render_block(block, key_facts))
        }
    })
}

fn render_block(block: &Block, key_facts: &[KeyFact]) -> Markup {
    match block {
        Block::Markdown { body } => markdown(body),
        Block::Highlight {
            variant,
            title,
            body,
        } => highlight_box(*variant, title.as_deref(), body),
        Block::Table(table) => table.render(),
        Block::KeyFacts => key_facts_table(key_facts),
        Block::Features { columns, items } => feature_grid(*columns, items),
        Block::GlowCards { items } => glow_cards(items),
    }
}

/// Visible counterpart of the `HowTo` node.
fn how_to_section(guide: &HowTo) -> Markup {
    reveal_section(Some(HOW_TO_ANCHOR), Duration::ZERO, html! {
        h2 { (guide.name) }
        p { (guide.description) }
        ol.how-to-steps {
            @for step in &guide.steps {
                li {
                    strong { (step.name) }
                    " "
                    (step.text)
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{main_of, sample_page, sample_source};
    use serde_json::Value;

    fn json_ld_of(html: &str) -> Value {
        let start = html.find(r#"<script type="application/ld+json">"#).unwrap();
        let rest = &html[start..];
        let open = rest.find('>').unwrap() + 1;
        let close = rest.find("</script>").unwrap();
        serde_json::from_str(&rest[open..close]).unwrap()
    }

    fn minimal_source() -> PageSource {
        toml::from_str(
            r#"
headline = "Escrow"
description = "How escrow works"
date_published = "2026-01-05"
date_modified = "2026-01-05"
"#,
        )
        .unwrap()
    }

    fn at<'a>(section: Option<SectionRef<'a>>, slug: &'a str) -> PageLocation<'a> {
        PageLocation {
            section,
            slug,
            number: Some(1),
            source_path: "learn/001-escrow.toml",
        }
    }

    const LEARN: SectionRef<'static> = SectionRef {
        slug: "learn",
        title: "Learn",
    };

    // =========================================================================
    // Page files
    // =========================================================================

    #[test]
    fn fixture_page_parses_and_validates() {
        let source = sample_source();
        assert_eq!(source.faq.len(), 2);
        assert_eq!(source.sections[1].delay_ms, 50);
        assert!(source.validate().is_ok());
        assert!(source.speakable);
    }

    #[test]
    fn block_kinds_deserialize() {
        let section: Section = toml::from_str(
            r#"
id = "compare"
heading = "Comparison"
[[blocks]]
kind = "table"
headers = ["Metric", "XRP"]
rows = [["Speed", "3s"]]
highlight_col = 1
[[blocks]]
kind = "highlight"
variant = "warning"
body = "Careful."
[[blocks]]
kind = "key_facts"
[[blocks]]
kind = "features"
items = [{ title = "Fast", desc = "3-5s" }]
"#,
        )
        .unwrap();
        assert_eq!(section.blocks.len(), 4);
        assert!(matches!(&section.blocks[0], Block::Table(t) if t.highlight_col == Some(1)));
        assert!(matches!(
            section.blocks[1],
            Block::Highlight {
                variant: HighlightVariant::Warning,
                ..
            }
        ));
        assert_eq!(section.blocks[2], Block::KeyFacts);
        assert!(matches!(section.blocks[3], Block::Features { columns: 2, .. }));
        assert_eq!(section.nav_label(), "Comparison");
    }

    #[test]
    fn unknown_block_kind_is_rejected() {
        let result: Result<Section, _> = toml::from_str(
            r#"
id = "x"
heading = "X"
[[blocks]]
kind = "carousel"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn unknown_page_field_is_rejected() {
        let result: Result<PageSource, _> = toml::from_str(
            r#"
headline = "H"
description = "D"
date_published = "2026-01-01"
date_modified = "2026-01-01"
subtitle = "typo"
"#,
        );
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn validate_rejects_modified_before_published() {
        let mut source = minimal_source();
        source.date_modified = "2025-12-31".parse().unwrap();
        let err = source.validate().unwrap_err();
        assert!(err.contains("before date_published"));
    }

    #[test]
    fn validate_rejects_empty_headline() {
        let mut source = minimal_source();
        source.headline = "  ".into();
        assert!(source.validate().unwrap_err().contains("headline is empty"));
    }

    #[test]
    fn validate_rejects_duplicate_questions() {
        let mut source = minimal_source();
        source.faq = FaqList::new(vec![
            crate::types::FaqItem::new("Same?", "1"),
            crate::types::FaqItem::new("Same?", "2"),
        ]);
        assert!(source.validate().unwrap_err().contains("duplicate FAQ question"));
    }

    #[test]
    fn validate_rejects_ragged_table() {
        let mut source = minimal_source();
        source.sections = vec![Section {
            id: "t".into(),
            label: None,
            heading: "T".into(),
            body: None,
            delay_ms: 0,
            blocks: vec![Block::Table(DataTable {
                headers: vec!["A".into(), "B".into()],
                rows: vec![vec!["1".into()]],
                highlight_col: Some(2),
            })],
        }];
        let err = source.validate().unwrap_err();
        assert!(err.contains("rows without 2 cells"));
        assert!(err.contains("highlights a missing column"));
    }

    #[test]
    fn validate_rejects_section_id_colliding_with_faq() {
        let mut source = sample_source();
        source.sections[0].id = FAQ_ANCHOR.into();
        assert!(source.validate().unwrap_err().contains("duplicate section id 'faq'"));
    }

    #[test]
    fn validate_rejects_questions_sharing_an_anchor() {
        let mut source = sample_source();
        source.faq = FaqList::new(vec![
            crate::types::FaqItem::new("Is XRP a security?", "1"),
            crate::types::FaqItem::new("Is XRP a security!", "2"),
        ]);
        let err = source.validate().unwrap_err();
        assert!(err.contains("'Is XRP a security!' has anchor 'is-xrp-a-security'"));
        assert!(!err.contains("'Is XRP a security?' has anchor"));
    }

    #[test]
    fn validate_rejects_questions_shadowing_page_anchors() {
        let mut source = sample_source();
        let section_id = source.sections[0].id.clone();
        source.faq = FaqList::new(vec![
            crate::types::FaqItem::new("FAQ", "1"),
            crate::types::FaqItem::new(section_id.clone(), "2"),
            crate::types::FaqItem::new("FAQ 0 button", "3"),
        ]);
        let err = source.validate().unwrap_err();
        assert!(err.contains("anchor 'faq',"));
        assert!(err.contains(&format!("anchor '{section_id}',")));
        assert!(err.contains("anchor 'faq-0-button',"));
    }

    #[test]
    fn validate_rejects_section_ids_that_are_not_anchors() {
        let mut source = sample_source();
        source.sections[0].id = "Price Outlook".into();
        let err = source.validate().unwrap_err();
        assert!(err.contains("section id 'Price Outlook' is not a valid anchor (try 'price-outlook')"));
    }

    #[test]
    fn fixture_page_anchors_are_unique() {
        let page = sample_page();
        let html = render_page(&page, &SiteConfig::default()).unwrap().into_string();
        let main = main_of(&html);
        let mut seen = HashSet::new();
        for chunk in main.split(" id=\"").skip(1) {
            let id = &chunk[..chunk.find('"').unwrap()];
            assert!(seen.insert(id.to_string()), "duplicate id {id}");
        }
        assert!(seen.contains(FAQ_ANCHOR));
    }

    #[test]
    fn validate_rejects_relative_canonical() {
        let mut source = minimal_source();
        source.canonical_url = Some("/learn/escrow".into());
        assert!(source.validate().unwrap_err().contains("not an absolute URL"));
    }

    // =========================================================================
    // Resolution defaults
    // =========================================================================

    #[test]
    fn canonical_url_defaults_to_site_path() {
        let page = minimal_source().into_page(at(Some(LEARN), "escrow"), &SiteConfig::default());
        assert_eq!(page.fact.canonical_url, "https://example.com/learn/escrow");
        assert_eq!(page.path(), "/learn/escrow");
        assert_eq!(page.output_path(), "learn/escrow/index.html");
    }

    #[test]
    fn default_breadcrumb_is_home_section_page() {
        let page = minimal_source().into_page(at(Some(LEARN), "escrow"), &SiteConfig::default());
        let names: Vec<&str> = page.fact.breadcrumb.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Home", "Learn", "Escrow"]);
        let urls: Vec<Option<&str>> = page
            .fact
            .breadcrumb
            .iter()
            .map(|c| c.url.as_deref())
            .collect();
        assert_eq!(
            urls,
            vec![
                Some("https://example.com"),
                Some("https://example.com/learn"),
                None
            ]
        );
    }

    #[test]
    fn breadcrumb_label_overrides_headline() {
        let mut source = minimal_source();
        source.breadcrumb_label = Some("XRP Escrow".into());
        let page = source.into_page(at(None, "escrow"), &SiteConfig::default());
        assert_eq!(page.fact.breadcrumb.len(), 2);
        assert_eq!(page.fact.breadcrumb.current().name, "XRP Escrow");
        assert_eq!(page.path(), "/escrow");
    }

    #[test]
    fn hero_defaults_to_headline_and_description() {
        let page = minimal_source().into_page(at(None, "escrow"), &SiteConfig::default());
        assert_eq!(page.layout.hero.title, "Escrow");
        assert_eq!(page.layout.hero.subtitle.as_deref(), Some("How escrow works"));
    }

    // =========================================================================
    // Rendered document
    // =========================================================================

    #[test]
    fn head_carries_metadata_and_json_ld() {
        let page = sample_page();
        let html = render_page(&page, &SiteConfig::default()).unwrap().into_string();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>XRP Price Prediction 2026 | Learn</title>"));
        assert!(html.contains(
            r#"<link rel="canonical" href="https://example.com/answers/xrp-price-prediction-2026">"#
        ));
        assert!(!html.contains("noindex"));

        let graph = json_ld_of(&html);
        let types: Vec<&str> = graph
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["@type"].as_str().unwrap())
            .collect();
        assert_eq!(types, vec!["Article", "BreadcrumbList", "WebPage", "FAQPage"]);
    }

    #[test]
    fn noindex_paths_get_robots_meta() {
        let page = sample_page();
        let mut config = SiteConfig::default();
        config.seo.noindex = vec!["/answers/xrp-price-prediction-2026".into()];
        let html = render_page(&page, &config).unwrap().into_string();
        assert!(html.contains(r#"<meta name="robots" content="noindex, follow">"#));
    }

    #[test]
    fn body_follows_document_order() {
        let page = sample_page();
        let html = render_page(&page, &SiteConfig::default()).unwrap().into_string();
        let main = main_of(&html);
        let order = [
            r#"class="breadcrumb""#,
            "<h1>",
            r#"class="byline""#,
            r#"class="tldr-box""#,
            r#"class="stat-pills""#,
            r#"class="section-nav""#,
            r#"id="outlook""#,
            r#"id="scenarios""#,
            r#"class="link-grid""#,
            r#"id="faq""#,
            r#"class="cta""#,
            r#"class="disclaimer""#,
        ];
        let positions: Vec<usize> = order
            .iter()
            .map(|needle| main.find(needle).unwrap_or_else(|| panic!("missing {needle}")))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{positions:?}");
    }

    #[test]
    fn faq_schema_and_accordion_share_order() {
        let page = sample_page();
        let html = render_page(&page, &SiteConfig::default()).unwrap().into_string();
        let graph = json_ld_of(&html);
        let faq_node = graph
            .as_array()
            .unwrap()
            .iter()
            .find(|n| n["@type"] == "FAQPage")
            .unwrap();
        let schema_questions: Vec<&str> = faq_node["mainEntity"]
            .as_array()
            .unwrap()
            .iter()
            .map(|q| q["name"].as_str().unwrap())
            .collect();

        let main = main_of(&html);
        assert_eq!(main.matches("data-accordion-toggle").count(), schema_questions.len());
        let positions: Vec<usize> = schema_questions
            .iter()
            .map(|q| main.find(&format!("<span>{q}</span>")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn sections_render_hidden_with_h2() {
        let page = sample_page();
        let html = render_page(&page, &SiteConfig::default()).unwrap().into_string();
        let main = main_of(&html);
        assert_eq!(main.matches("<h1>").count(), 1);
        // outlook, scenarios, faq sections plus two related cards
        assert_eq!(main.matches(r#"data-reveal="hidden""#).count(), 5);
        assert!(main.contains("<h2>Frequently Asked Questions</h2>"));
    }

    #[test]
    fn hidden_styling_requires_script_marker() {
        let page = sample_page();
        let html = render_page(&page, &SiteConfig::default()).unwrap().into_string();
        assert!(html.contains(".js-reveal [data-reveal=\"hidden\"]"));
        assert!(html.contains(REVEAL_BOOTSTRAP));
        assert!(!html.contains("<html lang=\"en\" class="));
        assert!(html.contains(r#"data-reveal-margin="60""#));
    }

    #[test]
    fn section_delay_offsets_its_reveal() {
        let mut page = sample_page();
        page.layout.sections[1].delay_ms = 150;
        let html = render_page(&page, &SiteConfig::default()).unwrap().into_string();
        let main = main_of(&html);
        let scenarios = main.find(r#"id="scenarios""#).unwrap();
        let tag_start = main[..scenarios].rfind("<section").unwrap();
        let tag = &main[tag_start..tag_start + main[tag_start..].find('>').unwrap()];
        assert!(tag.contains("--reveal-delay: 150ms"), "{tag}");
        assert!(main.contains(r#"id="outlook" data-reveal="hidden" style="--reveal-delay: 0ms""#));
    }

    #[test]
    fn section_delay_is_read_from_page_files() {
        let section: Section = toml::from_str(
            r#"
id = "later"
heading = "Later"
delay_ms = 50
"#,
        )
        .unwrap();
        assert_eq!(section.delay(), Duration::from_millis(50));
    }

    #[test]
    fn reveal_timings_come_from_config() {
        let page = sample_page();
        let mut config = SiteConfig::default();
        config.reveal.duration_ms = 450;
        let html = render_page(&page, &config).unwrap().into_string();
        assert!(html.contains("--reveal-duration: 450ms"));
    }

    #[test]
    fn speakable_can_be_disabled() {
        let mut page = sample_page();
        page.layout.speakable = false;
        let graph = schema_graph(&page, &SiteConfig::default().identity());
        assert!(graph.iter().all(|n| n.schema_type() != "WebPage"));
    }

    #[test]
    fn how_to_renders_visible_steps_and_schema() {
        let mut page = sample_page();
        page.layout.how_to = Some(HowTo {
            name: "How to buy XRP".into(),
            description: "Three steps".into(),
            steps: vec![crate::types::HowToStep {
                name: "Pick an exchange".into(),
                text: "Choose a regulated one.".into(),
            }],
        });
        let html = render_page(&page, &SiteConfig::default()).unwrap().into_string();
        let main = main_of(&html);
        assert!(main.contains(r#"id="how-to""#));
        assert!(main.contains("<strong>Pick an exchange</strong>"));
        assert!(main.contains(r##"href="#how-to""##));
        let types: Vec<String> = json_ld_of(&html)
            .as_array()
            .unwrap()
            .iter()
            .map(|n| n["@type"].as_str().unwrap().to_string())
            .collect();
        assert!(types.contains(&"HowTo".to_string()));
    }

    #[test]
    fn minimal_page_omits_optional_blocks() {
        let page = minimal_source().into_page(at(None, "escrow"), &SiteConfig::default());
        let html = render_page(&page, &SiteConfig::default()).unwrap().into_string();
        let main = main_of(&html);
        assert!(!main.contains("section-nav"));
        assert!(!main.contains(r#"id="faq""#));
        assert!(!main.contains("disclaimer"));
        let graph = json_ld_of(&html);
        assert_eq!(graph.as_array().unwrap().len(), 3);
    }
}
