//! CLI output formatting for the build stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. Every page is shown by
//! its headline and listing position, with the content file and schema types
//! as indented context lines. The scan listing reads as a content inventory;
//! the generate listing maps each entity to the file it produced.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Sections
//! 001 Learn (2 pages)
//!     Source: 010-learn/
//!     001 What Is XRP
//!         Source: 010-learn/010-what-is-xrp.toml
//!         Schema: Article, BreadcrumbList, WebPage, FAQPage
//!     --- XRP Glossary [noindex]
//!         Source: 010-learn/xrp-glossary.toml
//!         Schema: Article, BreadcrumbList, WebPage
//!
//! Pages
//!     --- About XRP Learn
//!         Source: about.toml
//!
//! Config
//!     config.toml
//! ```
//!
//! ## Generate
//!
//! ```text
//! Home → index.html
//! Learn → learn/index.html
//!     What Is XRP → learn/what-is-xrp/index.html (unchanged)
//! sitemap.xml, robots.txt
//!
//! Generated 5 pages, 2 section indexes (9 unchanged, 1 written (10 total))
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure.

use crate::generate::{GenerateReport, OutputKind};
use crate::page::{Page, schema_graph};
use crate::scan::Manifest;
use crate::schema::SiteIdentity;
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Marker used in place of an index for unlisted entities.
const UNLISTED: &str = "---";

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}...", &text[..cut]),
    }
}

fn pages_label(count: usize) -> String {
    if count == 1 {
        "1 page".to_string()
    } else {
        format!("{count} pages")
    }
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

fn page_lines(
    lines: &mut Vec<String>,
    depth: usize,
    position: Option<usize>,
    page: &Page,
    manifest: &Manifest,
    identity: &SiteIdentity,
) {
    let pad = indent(depth);
    let marker = position.map(format_index).unwrap_or_else(|| UNLISTED.to_string());
    let noindex = if manifest.config.is_noindex(&page.path()) {
        " [noindex]"
    } else {
        ""
    };
    lines.push(format!("{pad}{marker} {}{noindex}", page.fact.headline));
    lines.push(format!("{pad}    Source: {}", page.source_path));
    let desc = truncate_desc(page.fact.description.trim(), 60);
    if !desc.is_empty() {
        lines.push(format!("{pad}    {desc}"));
    }
    let types: Vec<&str> = schema_graph(page, identity)
        .iter()
        .map(|node| node.schema_type())
        .collect();
    lines.push(format!("{pad}    Schema: {}", types.join(", ")));
}

/// Format scan stage output showing discovered sections and pages.
pub fn format_scan_output(manifest: &Manifest, source_root: &Path) -> Vec<String> {
    let identity = manifest.config.identity();
    let mut lines = Vec::new();

    if !manifest.sections.is_empty() {
        lines.push("Sections".to_string());
    }
    let mut listed_sections = 0;
    for section in &manifest.sections {
        let listed = manifest.section_pages(&section.slug).count();
        let marker = if section.in_index() {
            listed_sections += 1;
            format_index(listed_sections)
        } else {
            UNLISTED.to_string()
        };
        lines.push(format!("{marker} {} ({})", section.title, pages_label(listed)));
        lines.push(format!("    Source: {}/", section.source_dir));

        let mut position = 0;
        for page in manifest
            .pages
            .iter()
            .filter(|p| p.section.as_deref() == Some(section.slug.as_str()))
        {
            let pos = page.in_index().then(|| {
                position += 1;
                position
            });
            page_lines(&mut lines, 1, pos, page, manifest, &identity);
        }
    }

    let root: Vec<&Page> = manifest.pages.iter().filter(|p| p.section.is_none()).collect();
    if !root.is_empty() {
        lines.push(String::new());
        lines.push("Pages".to_string());
        let mut position = 0;
        for page in root {
            let pos = page.in_index().then(|| {
                position += 1;
                position
            });
            page_lines(&mut lines, 1, pos, page, manifest, &identity);
        }
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join("config.toml").exists() {
        lines.push("    config.toml".to_string());
    } else {
        lines.push("    (stock defaults)".to_string());
    }

    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &Manifest, source_root: &Path) {
    for line in format_scan_output(manifest, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Generate output
// ============================================================================

/// Format generate stage output showing written files.
///
/// Pages are nested under the section index that precedes them. Files the
/// cache left untouched are marked `(unchanged)`.
pub fn format_generate_output(report: &GenerateReport) -> Vec<String> {
    let mut lines = Vec::new();
    let mut extras = Vec::new();
    let mut in_section = false;

    for file in &report.files {
        let status = if file.written { "" } else { " (unchanged)" };
        match file.kind {
            OutputKind::Home => {
                lines.push(format!("Home \u{2192} {}{status}", file.output_path));
            }
            OutputKind::SectionIndex => {
                in_section = true;
                lines.push(format!(
                    "{} \u{2192} {}{status}",
                    file.title, file.output_path
                ));
            }
            OutputKind::Page => {
                let depth = usize::from(in_section);
                lines.push(format!(
                    "{}{} \u{2192} {}{status}",
                    indent(depth),
                    file.title,
                    file.output_path
                ));
            }
            OutputKind::Sitemap | OutputKind::Robots => extras.push(file.output_path.as_str()),
        }
    }
    if !extras.is_empty() {
        lines.push(extras.join(", "));
    }
    for path in &report.stale {
        lines.push(format!("Stale: {path} (no longer generated)"));
    }

    lines.push(String::new());
    lines.push(format!(
        "Generated {}, {} section indexes ({})",
        pages_label(report.count(OutputKind::Page)),
        report.count(OutputKind::SectionIndex),
        report.cache
    ));
    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(report: &GenerateReport) {
    for line in format_generate_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
