//! # Learn Pages
//!
//! A static generator for SEO-oriented learn pages. Each page is a single TOML
//! file; the generator turns it into a document whose head carries a
//! schema.org JSON-LD graph and whose body is a progressive-disclosure page
//! shell (hero, TL;DR, stat pills, reveal-on-scroll sections, FAQ accordion).
//!
//! # Architecture: Two-Stage Pipeline
//!
//! ```text
//! 1. Scan      content/  →  Manifest   (files → validated pages)
//! 2. Generate  Manifest  →  dist/      (HTML, sitemap.xml, robots.txt)
//! ```
//!
//! Scan does all validation, so generation cannot fail on bad content; it can
//! only fail on I/O.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: walks the content directory, parses and validates page files |
//! | [`generate`] | Stage 2: renders pages, indexes, sitemap and robots with the render cache |
//! | [`types`] | [`types::ContentFact`] and its parts, shared by schema and shell |
//! | [`schema`] | `SchemaGraphBuilder`: Article, BreadcrumbList, FAQPage, speakable WebPage, Person, HowTo |
//! | [`shell`] | Page shell: reveal state machine, FAQ accordion, tables, components |
//! | [`page`] | Page file format, resolution into [`page::Page`], full-document rendering |
//! | [`config`] | `config.toml` loading, validation, and reveal CSS variables |
//! | [`cache`] | Content-hash render cache that skips unchanged output files |
//! | [`naming`] | `NNN-name` filename convention and slug rules |
//! | [`output`] | CLI output formatting for scan and generate |
//!
//! # One Fact, Two Renderings
//!
//! The FAQ in the `FAQPage` node and the FAQ in the visible accordion are the
//! same [`types::FaqList`] value. The same holds for the breadcrumb trail.
//! Nothing in the crate copies either list, so schema and markup cannot drift
//! apart in order or content.
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/). Markup is checked at
//! compile time and every interpolation is escaped, which matters here because
//! FAQ questions and answers come straight from content files.
//!
//! ## Reveal State Lives in Rust Too
//!
//! The shipped script drives reveal-on-scroll in the browser, but the state
//! machine it implements is modeled in [`shell::reveal`] behind the
//! [`shell::VisibilityObserver`] trait, so the one-shot and fallback rules are
//! unit-tested without a browser.

pub mod cache;
pub mod config;
pub mod generate;
pub mod naming;
pub mod output;
pub mod page;
pub mod scan;
pub mod schema;
pub mod shell;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
