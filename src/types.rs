//! Content facts shared by the schema builder and the page shell.
//!
//! A [`ContentFact`] is created once per page from its content file and never
//! mutated. Both consumers read the same value: the schema graph in the head
//! and the visible document in the body. Two of its parts carry invariants in
//! their types:
//!
//! - [`BreadcrumbTrail`] cannot be empty. Deserializing an empty trail fails,
//!   so the schema builder never sees one.
//! - [`FaqList`] is the only FAQ carrier. The `FAQPage` node and the rendered
//!   accordion are both built from the same `FaqList`, which keeps their order
//!   identical without a second list to maintain.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Immutable per-page facts consumed by schema synthesis and the page shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentFact {
    pub headline: String,
    pub description: String,
    pub canonical_url: String,
    pub date_published: NaiveDate,
    pub date_modified: NaiveDate,
    pub breadcrumb: BreadcrumbTrail,
    #[serde(default)]
    pub faq: FaqList,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_facts: Vec<KeyFact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// One ancestor in a breadcrumb trail. The final entry is the current page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Crumb {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Crumb {
    pub fn linked(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: Some(url.into()),
        }
    }

    pub fn current(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: None,
        }
    }
}

/// Error returned when a breadcrumb trail would be empty.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("breadcrumb trail must contain at least one entry")]
pub struct EmptyTrail;

/// Root-to-leaf breadcrumb trail. Never empty.
///
/// Ordering is the caller's responsibility; nothing downstream reorders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Crumb>", into = "Vec<Crumb>")]
pub struct BreadcrumbTrail(Vec<Crumb>);

impl BreadcrumbTrail {
    pub fn new(crumbs: Vec<Crumb>) -> Result<Self, EmptyTrail> {
        if crumbs.is_empty() {
            return Err(EmptyTrail);
        }
        Ok(Self(crumbs))
    }

    /// Trail starting at `root`. Infallible since the root is always present.
    pub fn with_root(root: Crumb, rest: impl IntoIterator<Item = Crumb>) -> Self {
        let mut crumbs = vec![root];
        crumbs.extend(rest);
        Self(crumbs)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Crumb> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The final entry, i.e. the current page.
    pub fn current(&self) -> &Crumb {
        // Non-empty by construction.
        &self.0[self.0.len() - 1]
    }
}

impl TryFrom<Vec<Crumb>> for BreadcrumbTrail {
    type Error = EmptyTrail;

    fn try_from(crumbs: Vec<Crumb>) -> Result<Self, Self::Error> {
        Self::new(crumbs)
    }
}

impl From<BreadcrumbTrail> for Vec<Crumb> {
    fn from(trail: BreadcrumbTrail) -> Self {
        trail.0
    }
}

impl<'a> IntoIterator for &'a BreadcrumbTrail {
    type Item = &'a Crumb;
    type IntoIter = std::slice::Iter<'a, Crumb>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A question and its answer, rendered both as schema and as an accordion entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

impl FaqItem {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// The page's FAQ entries in visual order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaqList(Vec<FaqItem>);

impl FaqList {
    pub fn new(items: Vec<FaqItem>) -> Self {
        Self(items)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FaqItem> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&FaqItem> {
        self.0.get(index)
    }
}

impl From<Vec<FaqItem>> for FaqList {
    fn from(items: Vec<FaqItem>) -> Self {
        Self(items)
    }
}

impl<'a> IntoIterator for &'a FaqList {
    type Item = &'a FaqItem;
    type IntoIter = std::slice::Iter<'a, FaqItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A label/value pair shown in key-facts tables and stat pills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KeyFact {
    pub label: String,
    pub value: String,
}

impl KeyFact {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Profile of a person a page is about (executives, founders).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PersonProfile {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub works_for: Option<OrganizationRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub same_as: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alumni_of: Vec<String>,
}

/// A named organization with an optional homepage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrganizationRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// A step of a how-to guide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HowToStep {
    pub name: String,
    pub text: String,
}

/// A how-to guide attached to a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HowTo {
    pub name: String,
    pub description: String,
    pub steps: Vec<HowToStep>,
}
