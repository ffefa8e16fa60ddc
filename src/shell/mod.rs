//! Page shell: the visible half of a page.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`reveal`] | Reveal-on-scroll state machine and the [`VisibilityObserver`] capability |
//! | [`accordion`] | FAQ accordion over the shared [`FaqList`](crate::types::FaqList) |
//! | [`table`] | Data tables and key-facts lists |
//! | [`components`] | Hero, stat pills, section nav, highlight boxes and other blocks |
//!
//! Components render server-side to static markup. Client behaviour (reveal
//! transitions, accordion toggling) is attached by `static/shell.js` through
//! `data-reveal` and `data-accordion-toggle` attributes.

pub mod accordion;
pub mod components;
pub mod reveal;
pub mod table;

pub use accordion::{AccordionGroup, faq_accordion};
pub use reveal::{
    AlwaysVisible, RevealScheduler, RevealSection, RevealState, Unsupported, Viewport,
    VisibilityObserver, reveal_section,
};
pub use table::{DataTable, data_table, key_facts_table};
