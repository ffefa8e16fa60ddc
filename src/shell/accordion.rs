//! FAQ accordion: independent expand/collapse entries over a [`FaqList`].
//!
//! Entries are independent. Expanding one never collapses another, and any
//! number may be open at once. Expansion state starts empty and lives only
//! for the client session; the rendered markup is always fully collapsed.
//!
//! The accordion borrows the same [`FaqList`] the `FAQPage` schema node is
//! built from, so entry order and schema order cannot drift apart.

use crate::naming::slugify;
use crate::types::{FaqItem, FaqList};
use maud::{Markup, html};
use std::collections::BTreeSet;

/// Expansion state for one rendered FAQ list.
#[derive(Debug, Clone)]
pub struct AccordionGroup<'a> {
    items: &'a FaqList,
    expanded: BTreeSet<usize>,
}

impl<'a> AccordionGroup<'a> {
    pub fn new(items: &'a FaqList) -> Self {
        Self {
            items,
            expanded: BTreeSet::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Flip one entry. Returns the new expanded state, or `None` when
    /// `index` is out of range.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        if index >= self.items.len() {
            return None;
        }
        if self.expanded.remove(&index) {
            Some(false)
        } else {
            self.expanded.insert(index);
            Some(true)
        }
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.expanded.contains(&index)
    }

    /// Expanded indices in ascending order.
    pub fn expanded(&self) -> impl Iterator<Item = usize> + '_ {
        self.expanded.iter().copied()
    }

    /// Entries paired with their current state, in list order.
    pub fn entries(&self) -> impl Iterator<Item = (&'a FaqItem, bool)> + '_ {
        self.items
            .iter()
            .enumerate()
            .map(|(i, item)| (item, self.is_expanded(i)))
    }

    /// Markup reflecting the current state.
    pub fn render(&self) -> Markup {
        html! {
            div.faq-accordion data-accordion {
                @for (i, (item, open)) in self.entries().enumerate() {
                    (faq_entry(i, item, open))
                }
            }
        }
    }
}

fn faq_entry(index: usize, item: &FaqItem, open: bool) -> Markup {
    let button_id = format!("faq-{index}-button");
    let panel_id = format!("faq-{index}-panel");
    let anchor = slugify(&item.question);
    let expanded = if open { "true" } else { "false" };
    html! {
        div.faq-item id=[(!anchor.is_empty()).then_some(anchor.as_str())] {
            h3.faq-question {
                button type="button" id=(button_id) aria-expanded=(expanded)
                    aria-controls=(panel_id) data-accordion-toggle {
                    span { (item.question) }
                    span.faq-icon aria-hidden="true" { "+" }
                }
            }
            div.faq-answer id=(panel_id) role="region" aria-labelledby=(button_id) hidden[!open] {
                p { (item.answer) }
            }
        }
    }
}

/// Collapsed accordion as shipped in the static page.
pub fn faq_accordion(items: &FaqList) -> Markup {
    AccordionGroup::new(items).render()
}
