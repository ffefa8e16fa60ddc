//! Shared test utilities for the learn-pages test suite.
//!
//! Provides fixture setup, a parsed sample page, and lookup helpers that work
//! with scan-phase data structures (`Manifest`, `Page`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = scan(tmp.path()).unwrap();
//!
//! let page = find_page(&manifest, "what-is-xrp");
//! assert_eq!(page.section.as_deref(), Some("learn"));
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::config::SiteConfig;
use crate::page::{Page, PageLocation, PageSource, SectionRef};
use crate::scan::Manifest;
use crate::schema::SiteIdentity;
use crate::types::ContentFact;

/// The fixture page most unit tests render.
const SAMPLE_PAGE_TOML: &str =
    include_str!("../fixtures/content/020-answers/010-xrp-price-prediction-2026.toml");

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Sample content
// =========================================================================

/// The sample page file, parsed but not resolved.
pub fn sample_source() -> PageSource {
    toml::from_str(SAMPLE_PAGE_TOML).unwrap()
}

/// The sample page resolved under `answers/` with default config.
pub fn sample_page() -> Page {
    sample_source().into_page(
        PageLocation {
            section: Some(SectionRef {
                slug: "answers",
                title: "Answers",
            }),
            slug: "xrp-price-prediction-2026",
            number: Some(10),
            source_path: "020-answers/010-xrp-price-prediction-2026.toml",
        },
        &SiteConfig::default(),
    )
}

pub fn sample_fact() -> ContentFact {
    sample_page().fact
}

/// Identity from the stock config.
pub fn sample_identity() -> SiteIdentity {
    SiteConfig::default().identity()
}

/// The `<main>` element of a rendered document, excluding inline CSS and JS.
pub fn main_of(html: &str) -> &str {
    let start = html.find("<main").expect("document has no <main>");
    let end = html.find("</main>").expect("document has no </main>");
    &html[start..end]
}

// =========================================================================
// Manifest lookups: panic with a clear message on miss
// =========================================================================

/// Find a page by slug. Panics if not found.
pub fn find_page<'a>(manifest: &'a Manifest, slug: &str) -> &'a Page {
    manifest
        .pages
        .iter()
        .find(|p| p.slug == slug)
        .unwrap_or_else(|| {
            let slugs: Vec<&str> = manifest.pages.iter().map(|p| p.slug.as_str()).collect();
            panic!("page '{slug}' not found. Available: {slugs:?}")
        })
}

/// Slugs of the pages listed on a section index, in listing order.
pub fn index_slugs<'a>(manifest: &'a Manifest, section: &'a str) -> Vec<&'a str> {
    manifest
        .section_pages(section)
        .map(|p| p.slug.as_str())
        .collect()
}
