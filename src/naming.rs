//! File-name and anchor conventions.
//!
//! Page files and section directories share one pattern: an optional numeric
//! prefix (`NNN-`) followed by a slug. The prefix orders entries on their
//! section index; entries without one are built but left off the index.
//!
//! - `010-what-is-xrp.toml` → number 10, slug `what-is-xrp`
//! - `xrp-glossary.toml`    → unnumbered, slug `xrp-glossary`
//! - `020-answers/`         → number 20, section `answers`, title "Answers"
//!
//! [`slugify`] turns free text (questions, headings) into URL-safe anchors.

/// Result of parsing a numbered entry name like `010-what-is-xrp`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedName {
    /// Number prefix if present (e.g., `10` from `010-what-is-xrp`)
    pub number: Option<u32>,
    /// Slug after `NNN-`. For unnumbered entries this is the full input.
    pub slug: String,
    /// Slug with dashes turned into spaces and the first letter capitalized.
    pub display_title: String,
}

/// Parse an entry name following the `NNN-slug` convention.
///
/// - `"010-what-is-xrp"` → number=Some(10), slug="what-is-xrp", display_title="What is xrp"
/// - `"learn"` → number=None, slug="learn", display_title="Learn"
/// - `"001"` → number=Some(1), slug="", display_title=""
pub fn parse_entry_name(name: &str) -> ParsedName {
    if let Some((prefix, rest)) = name.split_once('-')
        && let Ok(num) = prefix.parse::<u32>()
    {
        return ParsedName {
            number: Some(num),
            slug: rest.to_string(),
            display_title: display_title(rest),
        };
    }
    if let Ok(num) = name.parse::<u32>() {
        return ParsedName {
            number: Some(num),
            slug: String::new(),
            display_title: String::new(),
        };
    }
    ParsedName {
        number: None,
        slug: name.to_string(),
        display_title: display_title(name),
    }
}

fn display_title(slug: &str) -> String {
    let spaced = slug.replace('-', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lowercase ASCII slug: apostrophes dropped, runs of anything else
/// non-alphanumeric collapsed to a single dash, no leading/trailing dash.
///
/// ```
/// use learn_pages::naming::slugify;
/// assert_eq!(slugify("What's XRP's max supply?"), "whats-xrps-max-supply");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_dash = false;
    for c in text.chars() {
        if c == '\'' || c == '\u{2019}' {
            continue;
        }
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_page_name() {
        let p = parse_entry_name("010-what-is-xrp");
        assert_eq!(p.number, Some(10));
        assert_eq!(p.slug, "what-is-xrp");
        assert_eq!(p.display_title, "What is xrp");
    }

    #[test]
    fn unnumbered_section_name() {
        let p = parse_entry_name("learn");
        assert_eq!(p.number, None);
        assert_eq!(p.slug, "learn");
        assert_eq!(p.display_title, "Learn");
    }

    #[test]
    fn unnumbered_with_dashes() {
        let p = parse_entry_name("xrp-glossary");
        assert_eq!(p.number, None);
        assert_eq!(p.slug, "xrp-glossary");
        assert_eq!(p.display_title, "Xrp glossary");
    }

    #[test]
    fn number_only() {
        let p = parse_entry_name("001");
        assert_eq!(p.number, Some(1));
        assert_eq!(p.slug, "");
        assert_eq!(p.display_title, "");
    }

    #[test]
    fn number_with_trailing_dash() {
        let p = parse_entry_name("001-");
        assert_eq!(p.number, Some(1));
        assert_eq!(p.slug, "");
    }

    #[test]
    fn non_numeric_prefix_is_part_of_slug() {
        let p = parse_entry_name("xrp-vs-solana");
        assert_eq!(p.number, None);
        assert_eq!(p.slug, "xrp-vs-solana");
    }

    #[test]
    fn zero_prefix() {
        let p = parse_entry_name("000-first");
        assert_eq!(p.number, Some(0));
        assert_eq!(p.display_title, "First");
    }

    #[test]
    fn slugify_question() {
        assert_eq!(slugify("Can XRP reach $10?"), "can-xrp-reach-10");
    }

    #[test]
    fn slugify_drops_apostrophes() {
        assert_eq!(slugify("Ripple’s CEO isn't XRP"), "ripples-ceo-isnt-xrp");
    }

    #[test]
    fn slugify_trims_dashes() {
        assert_eq!(slugify("  -- Bull/Bear Scenarios --  "), "bull-bear-scenarios");
    }

    #[test]
    fn slugify_empty() {
        assert_eq!(slugify("???"), "");
    }
}
