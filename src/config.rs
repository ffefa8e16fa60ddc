//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by the `config.toml` in the content root; the file is sparse and
//! only needs the keys it changes.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! name = "Learn"
//! base_url = "https://example.com"
//! language = "en"
//! disclaimer = "This content is for educational purposes only ..."
//!
//! [publisher]                # Organization embedded in every Article
//! name = "Learn"
//! url = "https://example.com"
//! logo_url = "https://example.com/logo.png"
//! logo_width = 200
//! logo_height = 200
//!
//! [author]                   # Person embedded in every Article
//! name = "Editorial Team"
//! url = "https://example.com"
//! job_title = "Research"
//! initials = "ET"
//!
//! [speakable]
//! css_selectors = ["h1", ".tldr-box"]
//!
//! [reveal]
//! root_margin_px = 60        # Sections must be this far inside the viewport
//! offset_px = 28             # Initial downward offset of hidden sections
//! duration_ms = 700
//! easing = "cubic-bezier(0.16, 1, 0.3, 1)"
//! stagger_ms = 60            # Delay step between link-grid cards
//!
//! [seo]
//! noindex = []               # Paths rendered with robots noindex
//!
//! [build]
//! max_threads = 4            # Parallel render workers (omit for auto)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::schema::SiteIdentity;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site name, canonical base URL, and shared disclaimer text.
    pub site: SiteSettings,
    /// Organization that publishes every article.
    pub publisher: PublisherConfig,
    /// Person credited as author of every article.
    pub author: AuthorConfig,
    /// Selectors read aloud by voice assistants.
    pub speakable: SpeakableConfig,
    /// Reveal-on-scroll timings.
    pub reveal: RevealConfig,
    /// Indexing controls.
    pub seo: SeoConfig,
    /// Parallel rendering settings.
    pub build: BuildConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let base = url::Url::parse(&self.site.base_url).map_err(|e| {
            ConfigError::Validation(format!("site.base_url is not a valid URL: {e}"))
        })?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(
                "site.base_url must be an http(s) URL".into(),
            ));
        }
        if self.publisher.name.trim().is_empty() || self.author.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "publisher.name and author.name must not be empty".into(),
            ));
        }
        if self.publisher.logo_width == 0 || self.publisher.logo_height == 0 {
            return Err(ConfigError::Validation(
                "publisher.logo_width and logo_height must be non-zero".into(),
            ));
        }
        if self.speakable.css_selectors.is_empty() {
            return Err(ConfigError::Validation(
                "speakable.css_selectors must not be empty".into(),
            ));
        }
        if self.reveal.duration_ms == 0 {
            return Err(ConfigError::Validation(
                "reveal.duration_ms must be non-zero".into(),
            ));
        }
        if let Some(path) = self.seo.noindex.iter().find(|p| !p.starts_with('/')) {
            return Err(ConfigError::Validation(format!(
                "seo.noindex entries must be absolute paths: {path}"
            )));
        }
        Ok(())
    }

    /// Organization/author identity handed to the schema builder.
    pub fn identity(&self) -> SiteIdentity {
        SiteIdentity {
            publisher_name: self.publisher.name.clone(),
            publisher_url: self.publisher.url.clone(),
            logo_url: self.publisher.logo_url.clone(),
            logo_width: self.publisher.logo_width,
            logo_height: self.publisher.logo_height,
            author_name: self.author.name.clone(),
            author_url: self.author.url.clone(),
            author_job_title: self.author.job_title.clone(),
            speakable_selectors: self.speakable.css_selectors.clone(),
        }
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.site.base_url.trim_end_matches('/')
    }

    /// Whether a site path (e.g. `/learn/xrp-glossary`) is excluded from indexing.
    pub fn is_noindex(&self, path: &str) -> bool {
        let path = path.trim_end_matches('/');
        self.seo.noindex.iter().any(|p| p.trim_end_matches('/') == path)
    }
}

/// Site-wide settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteSettings {
    pub name: String,
    /// Absolute URL pages are canonicalized under.
    pub base_url: String,
    /// `lang` attribute of every document.
    pub language: String,
    /// Text of the warning box shown on pages that opt in with `disclaimer = true`.
    pub disclaimer: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            name: "Learn".to_string(),
            base_url: "https://example.com".to_string(),
            language: "en".to_string(),
            disclaimer: "This content is for educational purposes only and does not \
                         constitute financial advice. Always do your own research before \
                         making investment decisions."
                .to_string(),
        }
    }
}

/// Publisher organization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PublisherConfig {
    pub name: String,
    pub url: String,
    pub logo_url: String,
    pub logo_width: u32,
    pub logo_height: u32,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            name: "Learn".to_string(),
            url: "https://example.com".to_string(),
            logo_url: "https://example.com/logo.png".to_string(),
            logo_width: 200,
            logo_height: 200,
        }
    }
}

/// Article author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthorConfig {
    pub name: String,
    pub url: String,
    pub job_title: String,
    /// Shown in the byline avatar.
    pub initials: String,
}

impl Default for AuthorConfig {
    fn default() -> Self {
        Self {
            name: "Editorial Team".to_string(),
            url: "https://example.com".to_string(),
            job_title: "Research".to_string(),
            initials: "ET".to_string(),
        }
    }
}

/// Speakable selectors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpeakableConfig {
    pub css_selectors: Vec<String>,
}

impl Default for SpeakableConfig {
    fn default() -> Self {
        Self {
            css_selectors: vec!["h1".to_string(), ".tldr-box".to_string()],
        }
    }
}

/// Reveal-on-scroll timings shared by the stylesheet and the shell script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    /// Negative root margin: how far inside the viewport a section must be.
    pub root_margin_px: u32,
    /// Downward offset of a hidden section.
    pub offset_px: u32,
    pub duration_ms: u32,
    /// CSS easing function.
    pub easing: String,
    /// Delay step between consecutive cards of a link grid.
    pub stagger_ms: u32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            root_margin_px: 60,
            offset_px: 28,
            duration_ms: 700,
            easing: "cubic-bezier(0.16, 1, 0.3, 1)".to_string(),
            stagger_ms: 60,
        }
    }
}

/// Indexing controls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SeoConfig {
    /// Site paths rendered with `<meta name="robots" content="noindex, follow">`
    /// and left out of `sitemap.xml`.
    pub noindex: Vec<String>,
}

/// Parallel rendering settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Maximum number of parallel render workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_threads: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &BuildConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_threads.map(|n| n.clamp(1, cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(SiteConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# learn-pages configuration
# =========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site
# ---------------------------------------------------------------------------
[site]
name = "Learn"
# Absolute URL that canonical URLs, breadcrumbs and the sitemap are built on.
base_url = "https://example.com"
language = "en"
# Shown on pages that set `disclaimer = true`.
disclaimer = "This content is for educational purposes only and does not constitute financial advice. Always do your own research before making investment decisions."

# ---------------------------------------------------------------------------
# Identity embedded in every Article schema
# ---------------------------------------------------------------------------
[publisher]
name = "Learn"
url = "https://example.com"
logo_url = "https://example.com/logo.png"
logo_width = 200
logo_height = 200

[author]
name = "Editorial Team"
url = "https://example.com"
job_title = "Research"
# Shown in the byline avatar.
initials = "ET"

# ---------------------------------------------------------------------------
# Speakable summary content
# ---------------------------------------------------------------------------
[speakable]
css_selectors = ["h1", ".tldr-box"]

# ---------------------------------------------------------------------------
# Reveal-on-scroll
# ---------------------------------------------------------------------------
[reveal]
# Sections start revealing once they are this many pixels inside the viewport.
root_margin_px = 60
# Hidden sections sit this many pixels below their final position.
offset_px = 28
duration_ms = 700
easing = "cubic-bezier(0.16, 1, 0.3, 1)"
# Delay step between consecutive cards of a link grid.
stagger_ms = 60

# ---------------------------------------------------------------------------
# Indexing
# ---------------------------------------------------------------------------
[seo]
# Site paths rendered with robots noindex and left out of sitemap.xml.
noindex = []

# ---------------------------------------------------------------------------
# Build
# ---------------------------------------------------------------------------
[build]
# Maximum parallel render workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_threads = 4
"##
}

/// Generate CSS custom properties from reveal config.
pub fn generate_reveal_css(reveal: &RevealConfig) -> String {
    format!(
        r#":root {{
    --reveal-duration: {duration}ms;
    --reveal-offset: {offset}px;
    --reveal-easing: {easing};
}}"#,
        duration = reveal.duration_ms,
        offset = reveal.offset_px,
        easing = reveal.easing,
    )
}
