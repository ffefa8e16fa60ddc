//! Content scanning and manifest generation.
//!
//! Stage 1 of the build. Walks the content root, parses and validates every
//! page file, and resolves them into a [`Manifest`] that generation consumes.
//! Contract violations the pure core would only `debug_assert!` on (empty
//! headline, ragged table rows, duplicate FAQ questions) are reported here as
//! [`ScanError::Validation`] with the offending file.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                               # Content root
//! ├── config.toml                        # Site configuration (optional)
//! ├── about.toml                         # Root page → /about
//! ├── 010-learn/                         # Section (numbered = ordered on home)
//! │   ├── 010-what-is-xrp.toml           # Listed on the section index
//! │   ├── 020-xrp-escrow.toml
//! │   └── xrp-glossary.toml              # Unnumbered = built, not listed
//! └── 020-answers/
//!     └── 010-xrp-price-prediction-2026.toml
//! ```
//!
//! ## Naming Conventions
//!
//! - **Numbered files and directories** (`NNN-name`): listed on their index,
//!   sorted by number
//! - **Unnumbered**: built and reachable, left off the index
//! - Hidden entries (`.name`) and non-`.toml` files are ignored
//!
//! Only one level of sections is supported; deeper files are not visited.

use crate::config::{self, SiteConfig};
use crate::naming::parse_entry_name;
use crate::page::{Page, PageLocation, PageSource, SectionRef, section_path};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("Invalid page {}: {message}", .path.display())]
    Validation { path: PathBuf, message: String },
    #[error("Duplicate site path {site_path}: {} and {}", .first.display(), .second.display())]
    DuplicateSlug {
        site_path: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Manifest output from the scan stage.
#[derive(Debug)]
pub struct Manifest {
    /// Sections in index order.
    pub sections: Vec<ContentSection>,
    /// Pages grouped by section (root pages first), then by number, then slug.
    pub pages: Vec<Page>,
    pub config: SiteConfig,
}

/// A section directory with at least one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSection {
    pub slug: String,
    pub title: String,
    pub number: Option<u32>,
    /// Directory name relative to the content root.
    pub source_dir: String,
}

impl ContentSection {
    pub fn in_index(&self) -> bool {
        self.number.is_some()
    }
}

impl Manifest {
    /// Numbered pages of a section, in listing order.
    pub fn section_pages<'a>(&'a self, section: &'a str) -> impl Iterator<Item = &'a Page> + 'a {
        self.pages
            .iter()
            .filter(move |p| p.in_index() && p.section.as_deref() == Some(section))
    }

    /// Numbered pages that live directly in the content root.
    pub fn root_pages(&self) -> impl Iterator<Item = &Page> {
        self.pages
            .iter()
            .filter(|p| p.in_index() && p.section.is_none())
    }
}

const PAGE_EXTENSION: &str = "toml";

pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    let config = config::load_config(root)?;

    let mut sections: BTreeMap<String, ContentSection> = BTreeMap::new();
    let mut pages = Vec::new();
    let mut claimed: BTreeMap<String, PathBuf> = BTreeMap::new();

    let walker = WalkDir::new(root)
        .min_depth(1)
        .max_depth(2)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e));

    for entry in walker {
        let entry = entry.map_err(io::Error::from)?;
        if !is_page_file(&entry) {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .to_path_buf();

        let section = if entry.depth() == 2 {
            let dir_name = rel
                .parent()
                .map(|p| p.to_string_lossy().to_string())
                .unwrap_or_default();
            Some(
                sections
                    .entry(dir_name.clone())
                    .or_insert_with(|| content_section(dir_name))
                    .clone(),
            )
        } else {
            None
        };

        let page = load_page(entry.path(), &rel, section.as_ref(), &config)?;
        if let Some(first) = claimed.insert(page.path(), rel.clone()) {
            return Err(ScanError::DuplicateSlug {
                site_path: page.path(),
                first,
                second: rel,
            });
        }
        debug!(path = %rel.display(), site_path = %page.path(), "scanned page");
        pages.push(page);
    }

    let mut sections: Vec<ContentSection> = sections.into_values().collect();
    sections.sort_by(|a, b| {
        (a.number.unwrap_or(u32::MAX), &a.slug).cmp(&(b.number.unwrap_or(u32::MAX), &b.slug))
    });

    // Two directories may not share a section slug, and a root page must not
    // shadow a section index.
    let mut section_dirs: BTreeMap<&str, &str> = BTreeMap::new();
    for section in &sections {
        let index_path = section_path(&section.slug);
        if let Some(first) = section_dirs.insert(&section.slug, &section.source_dir) {
            return Err(ScanError::DuplicateSlug {
                site_path: index_path,
                first: PathBuf::from(first),
                second: PathBuf::from(&section.source_dir),
            });
        }
        if let Some(page_file) = claimed.get(&index_path) {
            return Err(ScanError::DuplicateSlug {
                site_path: index_path,
                first: PathBuf::from(&section.source_dir),
                second: page_file.clone(),
            });
        }
    }

    let section_rank = |slug: Option<&str>| {
        slug.and_then(|s| sections.iter().position(|sec| sec.slug == s))
            .map(|i| i + 1)
            .unwrap_or(0)
    };
    pages.sort_by(|a, b| {
        let key_a = (section_rank(a.section.as_deref()), a.number.unwrap_or(u32::MAX));
        let key_b = (section_rank(b.section.as_deref()), b.number.unwrap_or(u32::MAX));
        key_a.cmp(&key_b).then_with(|| a.slug.cmp(&b.slug))
    });

    info!(pages = pages.len(), sections = sections.len(), "scan complete");

    Ok(Manifest {
        sections,
        pages,
        config,
    })
}

/// Load one page file without scanning the rest of the content root.
///
/// `page_file` may be relative to `root` or prefixed with it. Only the site
/// config and the page itself are parsed and validated; cross-page checks
/// such as duplicate slugs need a full [`scan`].
pub fn scan_page(root: &Path, page_file: &Path) -> Result<(Page, SiteConfig), ScanError> {
    let config = config::load_config(root)?;
    let rel = page_file.strip_prefix(root).unwrap_or(page_file).to_path_buf();

    let section = match rel.parent().filter(|p| !p.as_os_str().is_empty()) {
        None => None,
        Some(dir) if dir.components().count() == 1 => {
            Some(content_section(dir.to_string_lossy().to_string()))
        }
        Some(_) => {
            return Err(ScanError::Validation {
                path: rel,
                message: "page files live at most one directory below the content root"
                    .to_string(),
            });
        }
    };

    let page = load_page(&root.join(&rel), &rel, section.as_ref(), &config)?;
    debug!(path = %rel.display(), site_path = %page.path(), "loaded single page");
    Ok((page, config))
}

fn content_section(dir_name: String) -> ContentSection {
    let parsed = parse_entry_name(&dir_name);
    ContentSection {
        slug: parsed.slug,
        title: parsed.display_title,
        number: parsed.number,
        source_dir: dir_name,
    }
}

fn load_page(
    path: &Path,
    rel: &Path,
    section: Option<&ContentSection>,
    config: &SiteConfig,
) -> Result<Page, ScanError> {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let parsed = parse_entry_name(&stem);
    if parsed.slug.is_empty() {
        return Err(ScanError::Validation {
            path: rel.to_path_buf(),
            message: "file name has no slug after its number".to_string(),
        });
    }

    let content = fs::read_to_string(path)?;
    let source: PageSource = toml::from_str(&content).map_err(|source| ScanError::Parse {
        path: rel.to_path_buf(),
        source,
    })?;
    source.validate().map_err(|message| ScanError::Validation {
        path: rel.to_path_buf(),
        message,
    })?;

    let source_path = rel.to_string_lossy();
    Ok(source.into_page(
        PageLocation {
            section: section.map(|s| SectionRef {
                slug: &s.slug,
                title: &s.title,
            }),
            slug: &parsed.slug,
            number: parsed.number,
            source_path: &source_path,
        },
        config,
    ))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

fn is_page_file(entry: &DirEntry) -> bool {
    if !entry.file_type().is_file() {
        return false;
    }
    if entry.depth() == 1 && entry.file_name() == "config.toml" {
        return false;
    }
    entry
        .path()
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case(PAGE_EXTENSION))
}
