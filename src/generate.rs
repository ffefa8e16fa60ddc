//! Static site generation.
//!
//! Stage 2 of the build. Takes the scanned [`Manifest`] and writes the site.
//!
//! ## Generated Files
//!
//! - **Pages** (`/{section}/{slug}/index.html`): one document per page file,
//!   schema graph in the head and page shell in the body
//! - **Section indexes** (`/{section}/index.html`): numbered pages in order
//! - **Home** (`/index.html`): numbered sections with their listed pages
//! - **`sitemap.xml`**: every indexable URL with `lastmod`
//! - **`robots.txt`**: allow-all with the sitemap location
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html
//! ├── sitemap.xml
//! ├── robots.txt
//! ├── .render-cache.json
//! ├── about/index.html
//! └── learn/
//!     ├── index.html
//!     ├── what-is-xrp/index.html
//!     └── xrp-glossary/index.html
//! ```
//!
//! ## Parallelism and caching
//!
//! Rendering and writing run on the global rayon pool (sized from
//! `build.max_threads` by the binary). Each output's bytes are hashed and
//! compared against the [`RenderCache`]; unchanged files are not rewritten.
//! The cache is updated once all workers finish.
//!
//! Stale outputs (pages whose file was removed) are dropped from the cache and
//! reported, never deleted.

use crate::cache::{self, CacheStats, RenderCache};
use crate::config::SiteConfig;
use crate::page::{DocumentHead, Page, base_document, render_page, section_path};
use crate::scan::{ContentSection, Manifest};
use crate::schema::{build_breadcrumb_schema, to_json_ld};
use crate::shell::components::{RelatedLink, breadcrumb_nav, link_grid};
use crate::types::{BreadcrumbTrail, Crumb};
use chrono::NaiveDate;
use maud::{Markup, html};
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// What kind of file an output is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Home,
    SectionIndex,
    Page,
    Sitemap,
    Robots,
}

/// One file produced by a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub kind: OutputKind,
    pub title: String,
    /// Path relative to the output directory.
    pub output_path: String,
    /// False when the cache found identical bytes already on disk.
    pub written: bool,
}

/// Result of a build.
#[derive(Debug, Default)]
pub struct GenerateReport {
    /// Outputs in generation order: home, then per section its index and
    /// pages, then sitemap and robots.
    pub files: Vec<GeneratedFile>,
    pub cache: CacheStats,
    /// Cached outputs this build no longer produces.
    pub stale: Vec<String>,
}

impl GenerateReport {
    pub fn count(&self, kind: OutputKind) -> usize {
        self.files.iter().filter(|f| f.kind == kind).count()
    }
}

struct Rendered {
    kind: OutputKind,
    title: String,
    output_path: String,
    body: String,
}

pub fn generate(
    manifest: &Manifest,
    output_dir: &Path,
    use_cache: bool,
) -> Result<GenerateReport, GenerateError> {
    fs::create_dir_all(output_dir)?;
    let mut render_cache = if use_cache {
        RenderCache::load(output_dir)
    } else {
        RenderCache::empty()
    };

    let rendered = render_all(manifest)?;

    let outcomes: Vec<(String, bool)> = rendered
        .par_iter()
        .map(|r| write_if_changed(r, output_dir, &render_cache))
        .collect::<Result<_, std::io::Error>>()?;

    let mut report = GenerateReport::default();
    let mut produced = BTreeSet::new();
    for (item, (hash, written)) in rendered.into_iter().zip(outcomes) {
        if written {
            report.cache.miss();
        } else {
            report.cache.hit();
        }
        produced.insert(item.output_path.clone());
        render_cache.insert(item.output_path.clone(), hash);
        report.files.push(GeneratedFile {
            kind: item.kind,
            title: item.title,
            output_path: item.output_path,
            written,
        });
    }

    report.stale = render_cache.retain_outputs(&produced);
    for path in &report.stale {
        warn!(path = %path, "output no longer produced by any page");
    }
    render_cache.save(output_dir)?;

    info!(
        files = report.files.len(),
        cache = %report.cache,
        output = %output_dir.display(),
        "site generated"
    );
    Ok(report)
}

/// Render every output in generation order.
fn render_all(manifest: &Manifest) -> Result<Vec<Rendered>, GenerateError> {
    let config = &manifest.config;

    let pages: Vec<Rendered> = manifest
        .pages
        .par_iter()
        .map(|page| -> Result<Rendered, GenerateError> {
            let body = render_page(page, config)?.into_string();
            debug!(path = %page.path(), bytes = body.len(), "rendered page");
            Ok(Rendered {
                kind: OutputKind::Page,
                title: page.fact.headline.clone(),
                output_path: page.output_path(),
                body,
            })
        })
        .collect::<Result<_, _>>()?;

    let mut out = Vec::with_capacity(pages.len() + manifest.sections.len() + 3);
    out.push(Rendered {
        kind: OutputKind::Home,
        title: config.site.name.clone(),
        output_path: "index.html".to_string(),
        body: render_home(manifest).into_string(),
    });

    let mut pages: Vec<Option<Rendered>> = pages.into_iter().map(Some).collect();
    let mut take_pages = |section: Option<&str>, out: &mut Vec<Rendered>| {
        for (slot, page) in pages.iter_mut().zip(&manifest.pages) {
            if page.section.as_deref() == section
                && let Some(rendered) = slot.take()
            {
                out.push(rendered);
            }
        }
    };

    take_pages(None, &mut out);
    for section in &manifest.sections {
        out.push(Rendered {
            kind: OutputKind::SectionIndex,
            title: section.title.clone(),
            output_path: format!("{}/index.html", section.slug),
            body: render_section_index(manifest, section)?.into_string(),
        });
        take_pages(Some(section.slug.as_str()), &mut out);
    }

    out.push(Rendered {
        kind: OutputKind::Sitemap,
        title: "Sitemap".to_string(),
        output_path: "sitemap.xml".to_string(),
        body: render_sitemap(manifest),
    });
    out.push(Rendered {
        kind: OutputKind::Robots,
        title: "Robots".to_string(),
        output_path: "robots.txt".to_string(),
        body: render_robots(config),
    });
    Ok(out)
}

/// Write `item` unless identical bytes are already on disk.
/// Returns the content hash and whether the file was written.
fn write_if_changed(
    item: &Rendered,
    output_dir: &Path,
    render_cache: &RenderCache,
) -> std::io::Result<(String, bool)> {
    let hash = cache::hash_bytes(item.body.as_bytes());
    if render_cache.is_fresh(&item.output_path, &hash, output_dir) {
        debug!(path = %item.output_path, "unchanged");
        return Ok((hash, false));
    }
    let target = output_dir.join(&item.output_path);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&target, &item.body)?;
    debug!(path = %item.output_path, "written");
    Ok((hash, true))
}

// ============================================================================
// Index pages
// ============================================================================

fn page_links<'a>(pages: impl Iterator<Item = &'a Page>) -> Vec<RelatedLink> {
    pages
        .map(|page| RelatedLink {
            href: format!("{}/", page.path()),
            label: page.fact.headline.clone(),
            desc: Some(page.fact.description.clone()),
        })
        .collect()
}

fn card_stagger(config: &SiteConfig) -> Duration {
    Duration::from_millis(config.reveal.stagger_ms.into())
}

fn render_home(manifest: &Manifest) -> Markup {
    let config = &manifest.config;
    let root_links = page_links(manifest.root_pages());
    let head = DocumentHead {
        title: config.site.name.clone(),
        canonical_url: Some(format!("{}/", config.base_url())),
        ..DocumentHead::default()
    };
    let content = html! {
        main.index-page {
            header.hero {
                h1 { (config.site.name) }
            }
            @for section in manifest.sections.iter().filter(|s| s.in_index()) {
                @let links = page_links(manifest.section_pages(&section.slug));
                @if !links.is_empty() {
                    (link_grid(&section.title, &links, card_stagger(config)))
                    p.section-more {
                        a href={ (section_path(&section.slug)) "/" } { "All " (section.title) " pages" }
                    }
                }
            }
            @if !root_links.is_empty() {
                (link_grid("More", &root_links, card_stagger(config)))
            }
        }
    };
    base_document(config, &head, content)
}

fn render_section_index(
    manifest: &Manifest,
    section: &ContentSection,
) -> Result<Markup, GenerateError> {
    let config = &manifest.config;
    let base_url = config.base_url();
    let url = format!("{base_url}{}", section_path(&section.slug));
    let trail = BreadcrumbTrail::with_root(
        Crumb::linked("Home", base_url),
        [Crumb::current(section.title.clone())],
    );
    let head = DocumentHead {
        title: format!("{} | {}", section.title, config.site.name),
        description: None,
        canonical_url: Some(url.clone()),
        noindex: config.is_noindex(&section_path(&section.slug)),
        json_ld: Some(to_json_ld(&[build_breadcrumb_schema(&trail)])?),
    };
    let links = page_links(manifest.section_pages(&section.slug));
    let content = html! {
        main.index-page {
            header.hero {
                (breadcrumb_nav(&trail))
                h1 { (section.title) }
            }
            (link_grid("All pages", &links, card_stagger(config)))
        }
    };
    Ok(base_document(config, &head, content))
}

// ============================================================================
// Sitemap and robots
// ============================================================================

fn xml_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

fn sitemap_entry(out: &mut String, loc: &str, lastmod: Option<NaiveDate>) {
    out.push_str("  <url>\n");
    out.push_str(&format!("    <loc>{}</loc>\n", xml_escape(loc)));
    if let Some(date) = lastmod {
        out.push_str(&format!("    <lastmod>{date}</lastmod>\n"));
    }
    out.push_str("  </url>\n");
}

fn latest_modified(pages: &[&Page]) -> Option<NaiveDate> {
    pages.iter().map(|p| p.fact.date_modified).max()
}

/// `sitemap.xml` covering the home page, section indexes and every page not
/// marked noindex.
pub fn render_sitemap(manifest: &Manifest) -> String {
    let config = &manifest.config;
    let base_url = config.base_url();
    let indexable: Vec<&Page> = manifest
        .pages
        .iter()
        .filter(|p| !config.is_noindex(&p.path()))
        .collect();

    let mut out = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n",
    );
    sitemap_entry(&mut out, &format!("{base_url}/"), latest_modified(&indexable));
    for section in &manifest.sections {
        let path = section_path(&section.slug);
        if config.is_noindex(&path) {
            continue;
        }
        let members: Vec<&Page> = indexable
            .iter()
            .copied()
            .filter(|p| p.section.as_deref() == Some(section.slug.as_str()))
            .collect();
        sitemap_entry(&mut out, &format!("{base_url}{path}"), latest_modified(&members));
    }
    for page in &indexable {
        sitemap_entry(&mut out, &page.fact.canonical_url, Some(page.fact.date_modified));
    }
    out.push_str("</urlset>\n");
    out
}

pub fn render_robots(config: &SiteConfig) -> String {
    format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}/sitemap.xml\n",
        config.base_url()
    )
}
