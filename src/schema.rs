//! schema.org JSON-LD synthesis.
//!
//! Pure, synchronous builders that map a page's [`ContentFact`] (or a slice of
//! it) to [`SchemaNode`]s. Nothing here touches the filesystem or keeps state:
//! the same input always yields the same node, and the caller decides where the
//! serialized graph goes.
//!
//! ## Node envelope
//!
//! Every [`SchemaNode`] serializes with its own `@context` and `@type`, so each
//! element of a page's graph is independently valid JSON-LD. The envelope is
//! added in one place ([`SchemaNode`]'s `Serialize` impl); the node structs
//! only hold their vocabulary properties.
//!
//! ## Identity
//!
//! The author and publisher embedded in `Article` and `HowTo` nodes come from a
//! [`SiteIdentity`] handed to [`SchemaGraphBuilder::new`], normally derived
//! from `config.toml` via [`SiteConfig::identity`](crate::config::SiteConfig::identity).
//!
//! ## Ordering guarantees
//!
//! - `BreadcrumbList.itemListElement[i].position == i + 1`, in trail order.
//!   The final crumb is the current page and never carries an `item` URL.
//! - `FAQPage.mainEntity` follows the [`FaqList`] order exactly. The page shell
//!   renders its accordion from the same `FaqList`.

use crate::types::{BreadcrumbTrail, ContentFact, FaqList, HowTo, PersonProfile};
use chrono::NaiveDate;
use serde::{Serialize, Serializer};

pub const SCHEMA_CONTEXT: &str = "https://schema.org";

/// Organization and author identity embedded in article-like nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteIdentity {
    pub publisher_name: String,
    pub publisher_url: String,
    pub logo_url: String,
    pub logo_width: u32,
    pub logo_height: u32,
    pub author_name: String,
    pub author_url: String,
    pub author_job_title: String,
    /// Selectors referenced by the page's `SpeakableSpecification`.
    pub speakable_selectors: Vec<String>,
}

/// One independently valid JSON-LD object.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode {
    Article(Article),
    BreadcrumbList(BreadcrumbList),
    FaqPage(FaqPage),
    /// A `WebPage` carrying a `SpeakableSpecification`.
    Speakable(SpeakablePage),
    Person(Person),
    HowTo(HowToGuide),
}

impl SchemaNode {
    /// The top-level `@type` this node serializes with.
    pub fn schema_type(&self) -> &'static str {
        match self {
            SchemaNode::Article(_) => "Article",
            SchemaNode::BreadcrumbList(_) => "BreadcrumbList",
            SchemaNode::FaqPage(_) => "FAQPage",
            SchemaNode::Speakable(_) => "WebPage",
            SchemaNode::Person(_) => "Person",
            SchemaNode::HowTo(_) => "HowTo",
        }
    }
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    #[serde(rename = "@context")]
    context: &'static str,
    #[serde(rename = "@type")]
    kind: &'static str,
    #[serde(flatten)]
    body: &'a T,
}

impl<'a, T: Serialize> Envelope<'a, T> {
    fn new(kind: &'static str, body: &'a T) -> Self {
        Self {
            context: SCHEMA_CONTEXT,
            kind,
            body,
        }
    }
}

impl Serialize for SchemaNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let kind = self.schema_type();
        match self {
            SchemaNode::Article(node) => Envelope::new(kind, node).serialize(serializer),
            SchemaNode::BreadcrumbList(node) => Envelope::new(kind, node).serialize(serializer),
            SchemaNode::FaqPage(node) => Envelope::new(kind, node).serialize(serializer),
            SchemaNode::Speakable(node) => Envelope::new(kind, node).serialize(serializer),
            SchemaNode::Person(node) => Envelope::new(kind, node).serialize(serializer),
            SchemaNode::HowTo(node) => Envelope::new(kind, node).serialize(serializer),
        }
    }
}

// ============================================================================
// Node bodies
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub headline: String,
    pub description: String,
    pub url: String,
    pub date_published: NaiveDate,
    pub date_modified: NaiveDate,
    pub author: Author,
    pub publisher: Publisher,
    pub main_entity_of_page: WebPageRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    #[serde(rename = "@type")]
    kind: &'static str,
    pub name: String,
    pub url: String,
    pub job_title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Publisher {
    #[serde(rename = "@type")]
    kind: &'static str,
    pub name: String,
    pub url: String,
    pub logo: ImageObject,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageObject {
    #[serde(rename = "@type")]
    kind: &'static str,
    pub url: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebPageRef {
    #[serde(rename = "@type")]
    kind: &'static str,
    #[serde(rename = "@id")]
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreadcrumbList {
    pub item_list_element: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    #[serde(rename = "@type")]
    kind: &'static str,
    pub position: u32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaqPage {
    pub main_entity: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    #[serde(rename = "@type")]
    kind: &'static str,
    pub name: String,
    pub accepted_answer: Answer,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    #[serde(rename = "@type")]
    kind: &'static str,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeakablePage {
    pub url: String,
    pub speakable: SpeakableSpecification,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakableSpecification {
    #[serde(rename = "@type")]
    kind: &'static str,
    pub css_selector: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub works_for: Option<Organization>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub url: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub same_as: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alumni_of: Vec<Organization>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Organization {
    #[serde(rename = "@type")]
    kind: &'static str,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HowToGuide {
    pub name: String,
    pub description: String,
    pub url: String,
    pub author: Author,
    pub publisher: Publisher,
    pub step: Vec<HowToStepNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HowToStepNode {
    #[serde(rename = "@type")]
    kind: &'static str,
    pub position: u32,
    pub name: String,
    pub text: String,
}

// ============================================================================
// Builders
// ============================================================================

/// The slice of a [`ContentFact`] an `Article` node needs.
#[derive(Debug, Clone, Copy)]
pub struct ArticleInput<'a> {
    pub headline: &'a str,
    pub description: &'a str,
    pub url: &'a str,
    pub date_published: NaiveDate,
    pub date_modified: NaiveDate,
    pub image: Option<&'a str>,
}

impl<'a> From<&'a ContentFact> for ArticleInput<'a> {
    fn from(fact: &'a ContentFact) -> Self {
        Self {
            headline: &fact.headline,
            description: &fact.description,
            url: &fact.canonical_url,
            date_published: fact.date_published,
            date_modified: fact.date_modified,
            image: fact.image.as_deref(),
        }
    }
}

/// Optional parts of a page graph that are not in the [`ContentFact`] itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphExtras<'a> {
    pub speakable: bool,
    pub person: Option<&'a PersonProfile>,
    pub how_to: Option<&'a HowTo>,
}

/// Builds schema nodes for one site identity.
#[derive(Debug, Clone, Copy)]
pub struct SchemaGraphBuilder<'a> {
    identity: &'a SiteIdentity,
}

impl<'a> SchemaGraphBuilder<'a> {
    pub fn new(identity: &'a SiteIdentity) -> Self {
        Self { identity }
    }

    fn author(&self) -> Author {
        Author {
            kind: "Person",
            name: self.identity.author_name.clone(),
            url: self.identity.author_url.clone(),
            job_title: self.identity.author_job_title.clone(),
        }
    }

    fn publisher(&self) -> Publisher {
        Publisher {
            kind: "Organization",
            name: self.identity.publisher_name.clone(),
            url: self.identity.publisher_url.clone(),
            logo: ImageObject {
                kind: "ImageObject",
                url: self.identity.logo_url.clone(),
                width: self.identity.logo_width,
                height: self.identity.logo_height,
            },
        }
    }

    /// `Article` with the site's fixed author and publisher.
    ///
    /// Required fields are guaranteed by the caller; an empty headline is a
    /// contract violation.
    pub fn article(&self, input: ArticleInput<'_>) -> SchemaNode {
        debug_assert!(!input.headline.is_empty(), "article headline must not be empty");
        debug_assert!(
            input.date_modified >= input.date_published,
            "dateModified precedes datePublished"
        );
        SchemaNode::Article(Article {
            headline: input.headline.to_string(),
            description: input.description.to_string(),
            url: input.url.to_string(),
            date_published: input.date_published,
            date_modified: input.date_modified,
            author: self.author(),
            publisher: self.publisher(),
            main_entity_of_page: WebPageRef {
                kind: "WebPage",
                id: input.url.to_string(),
            },
            image: input.image.map(str::to_string),
        })
    }

    pub fn breadcrumb(&self, trail: &BreadcrumbTrail) -> SchemaNode {
        build_breadcrumb_schema(trail)
    }

    pub fn faq(&self, items: &FaqList) -> SchemaNode {
        build_faq_schema(items)
    }

    /// `WebPage` whose speakable content is found under the configured selectors.
    pub fn speakable(&self, url: &str) -> SchemaNode {
        SchemaNode::Speakable(SpeakablePage {
            url: url.to_string(),
            speakable: SpeakableSpecification {
                kind: "SpeakableSpecification",
                css_selector: self.identity.speakable_selectors.clone(),
            },
        })
    }

    /// Standalone `Person` for a profile page at `url`.
    pub fn person(&self, profile: &PersonProfile, url: &str) -> SchemaNode {
        SchemaNode::Person(Person {
            name: profile.name.clone(),
            job_title: profile.job_title.clone(),
            works_for: profile.works_for.as_ref().map(|org| Organization {
                kind: "Organization",
                name: org.name.clone(),
                url: org.url.clone(),
            }),
            description: profile.description.clone(),
            url: url.to_string(),
            same_as: profile.same_as.clone(),
            alumni_of: profile
                .alumni_of
                .iter()
                .map(|name| Organization {
                    kind: "EducationalOrganization",
                    name: name.clone(),
                    url: None,
                })
                .collect(),
        })
    }

    /// `HowTo` with 1-based step positions.
    pub fn how_to(&self, guide: &HowTo, url: &str) -> SchemaNode {
        SchemaNode::HowTo(HowToGuide {
            name: guide.name.clone(),
            description: guide.description.clone(),
            url: url.to_string(),
            author: self.author(),
            publisher: self.publisher(),
            step: guide
                .steps
                .iter()
                .zip(1u32..)
                .map(|(step, position)| HowToStepNode {
                    kind: "HowToStep",
                    position,
                    name: step.name.clone(),
                    text: step.text.clone(),
                })
                .collect(),
        })
    }

    /// The full graph for a page, in head order:
    /// Article, BreadcrumbList, WebPage/speakable, Person, HowTo, FAQPage.
    pub fn page_graph(&self, fact: &ContentFact, extras: GraphExtras<'_>) -> Vec<SchemaNode> {
        let url = fact.canonical_url.as_str();
        let mut graph = vec![self.article(fact.into()), self.breadcrumb(&fact.breadcrumb)];
        if extras.speakable {
            graph.push(self.speakable(url));
        }
        if let Some(profile) = extras.person {
            graph.push(self.person(profile, url));
        }
        if let Some(guide) = extras.how_to {
            graph.push(self.how_to(guide, url));
        }
        if !fact.faq.is_empty() {
            graph.push(self.faq(&fact.faq));
        }
        graph
    }
}

/// `BreadcrumbList` with `position = index + 1` in trail order.
///
/// The final crumb is the current page and is emitted without `item`.
pub fn build_breadcrumb_schema(trail: &BreadcrumbTrail) -> SchemaNode {
    let last = trail.len() - 1;
    SchemaNode::BreadcrumbList(BreadcrumbList {
        item_list_element: trail
            .iter()
            .enumerate()
            .map(|(i, crumb)| ListItem {
                kind: "ListItem",
                position: (i + 1) as u32,
                name: crumb.name.clone(),
                item: if i == last { None } else { crumb.url.clone() },
            })
            .collect(),
    })
}

/// `FAQPage` whose `mainEntity` follows `items` exactly.
pub fn build_faq_schema(items: &FaqList) -> SchemaNode {
    SchemaNode::FaqPage(FaqPage {
        main_entity: items
            .iter()
            .map(|item| Question {
                kind: "Question",
                name: item.question.clone(),
                accepted_answer: Answer {
                    kind: "Answer",
                    text: item.answer.clone(),
                },
            })
            .collect(),
    })
}

/// Serialize a graph as a JSON array safe to embed in a `<script>` element.
pub fn to_json_ld(graph: &[SchemaNode]) -> Result<String, serde_json::Error> {
    Ok(escape_script(&serde_json::to_string(graph)?))
}

/// Pretty-printed variant of [`to_json_ld`] for inspection.
pub fn to_json_ld_pretty(graph: &[SchemaNode]) -> Result<String, serde_json::Error> {
    Ok(escape_script(&serde_json::to_string_pretty(graph)?))
}

// `<\/` is the same string to a JSON parser but cannot close the script element.
fn escape_script(json: &str) -> String {
    json.replace("</", "<\\/")
}
