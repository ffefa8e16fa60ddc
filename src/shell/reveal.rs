//! Reveal-on-scroll state machine.
//!
//! Each [`RevealSection`] moves through `Hidden → Revealing → Revealed` at most
//! once per page lifetime. Viewport intersection is a browser capability, so it
//! sits behind the [`VisibilityObserver`] trait; the state machine itself only
//! reacts to intersection records and the passage of time, which keeps it
//! testable without a DOM.
//!
//! ```text
//!            mount (observer unsupported)
//!   Hidden ─────────────────────────────────────────────┐
//!     │ first intersecting record (unobserve target)    │
//!     ▼                                                 ▼
//!   Revealing ── delay + duration elapsed ──────────▶ Revealed
//! ```
//!
//! - A section already inside the viewport at mount receives an intersecting
//!   record straight away and starts revealing after its own `delay` only.
//! - The observation is torn down on the first trigger. Later records for the
//!   same target are ignored, so scrolling in and out never replays the
//!   animation.
//! - Without intersection support a section is `Revealed` synchronously at
//!   mount. Content is never left hidden.
//! - `delay` staggers the *start* of sections triggered in the same frame; it
//!   never serializes them. Any number of sections may be `Revealing` at once.
//!
//! The browser half lives in `static/shell.js` and follows the same rules; the
//! markup it drives comes from [`reveal_section`].

use maud::{Markup, html};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;

/// Visibility state of one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Hidden,
    Revealing,
    Revealed,
}

impl RevealState {
    /// Value of the `data-reveal` attribute for this state.
    pub fn as_str(self) -> &'static str {
        match self {
            RevealState::Hidden => "hidden",
            RevealState::Revealing => "revealing",
            RevealState::Revealed => "revealed",
        }
    }
}

/// A change in whether an observed target intersects the (margin-shrunk) viewport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntersectionRecord {
    pub target: String,
    pub intersecting: bool,
}

/// Capability to observe viewport intersection of named targets.
///
/// Implementations deliver an initial record for a target when it is
/// observed, then one record per change, mirroring `IntersectionObserver`.
pub trait VisibilityObserver {
    /// Whether this environment can observe intersection at all.
    fn is_supported(&self) -> bool {
        true
    }

    fn observe(&mut self, target: &str);

    fn unobserve(&mut self, target: &str);

    /// Drain pending records in delivery order.
    fn take_records(&mut self) -> Vec<IntersectionRecord>;
}

/// Environment without intersection support (non-browser, degraded).
#[derive(Debug, Clone, Copy, Default)]
pub struct Unsupported;

impl VisibilityObserver for Unsupported {
    fn is_supported(&self) -> bool {
        false
    }

    fn observe(&mut self, _target: &str) {}

    fn unobserve(&mut self, _target: &str) {}

    fn take_records(&mut self) -> Vec<IntersectionRecord> {
        Vec::new()
    }
}

/// Observer that reports every target as visible the moment it is observed.
#[derive(Debug, Clone, Default)]
pub struct AlwaysVisible {
    pending: Vec<IntersectionRecord>,
}

impl VisibilityObserver for AlwaysVisible {
    fn observe(&mut self, target: &str) {
        self.pending.push(IntersectionRecord {
            target: target.to_string(),
            intersecting: true,
        });
    }

    fn unobserve(&mut self, target: &str) {
        self.pending.retain(|r| r.target != target);
    }

    fn take_records(&mut self) -> Vec<IntersectionRecord> {
        std::mem::take(&mut self.pending)
    }
}

/// Vertical extent of a target in document pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub top: i64,
    pub height: i64,
}

/// Scroll-driven observer over a laid-out document.
///
/// A target intersects when it overlaps the viewport shrunk by `root_margin`
/// on both edges, i.e. it has to be that far inside before it counts.
#[derive(Debug, Clone)]
pub struct Viewport {
    scroll_top: i64,
    height: i64,
    root_margin: i64,
    layout: BTreeMap<String, Bounds>,
    observed: BTreeMap<String, bool>,
    pending: Vec<IntersectionRecord>,
}

impl Viewport {
    pub fn new(height: i64, root_margin: i64) -> Self {
        Self {
            scroll_top: 0,
            height,
            root_margin,
            layout: BTreeMap::new(),
            observed: BTreeMap::new(),
            pending: Vec::new(),
        }
    }

    /// Position a target in the document.
    pub fn place(&mut self, target: &str, top: i64, height: i64) {
        self.layout.insert(target.to_string(), Bounds { top, height });
    }

    /// Builder form of [`place`](Self::place).
    pub fn with(mut self, target: &str, top: i64, height: i64) -> Self {
        self.place(target, top, height);
        self
    }

    /// Scroll to an absolute offset, queuing records for targets whose
    /// intersection changed.
    pub fn scroll_to(&mut self, top: i64) {
        self.scroll_top = top.max(0);
        let changes: Vec<(String, bool)> = self
            .observed
            .iter()
            .filter_map(|(target, was)| {
                let now = self.intersects(target);
                (now != *was).then(|| (target.clone(), now))
            })
            .collect();
        for (target, now) in changes {
            self.observed.insert(target.clone(), now);
            self.pending.push(IntersectionRecord {
                target,
                intersecting: now,
            });
        }
    }

    pub fn is_observing(&self, target: &str) -> bool {
        self.observed.contains_key(target)
    }

    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }

    fn intersects(&self, target: &str) -> bool {
        let Some(bounds) = self.layout.get(target) else {
            return false;
        };
        let visible_top = self.scroll_top + self.root_margin;
        let visible_bottom = self.scroll_top + self.height - self.root_margin;
        bounds.top < visible_bottom && bounds.top + bounds.height > visible_top
    }
}

impl VisibilityObserver for Viewport {
    fn observe(&mut self, target: &str) {
        let now = self.intersects(target);
        self.observed.insert(target.to_string(), now);
        self.pending.push(IntersectionRecord {
            target: target.to_string(),
            intersecting: now,
        });
    }

    fn unobserve(&mut self, target: &str) {
        self.observed.remove(target);
        self.pending.retain(|r| r.target != target);
    }

    fn take_records(&mut self) -> Vec<IntersectionRecord> {
        std::mem::take(&mut self.pending)
    }
}

/// One section's reveal lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealSection {
    id: String,
    delay: Duration,
    state: RevealState,
    animations: u32,
    ends_at: Option<Duration>,
}

impl RevealSection {
    pub fn new(id: impl Into<String>, delay: Duration) -> Self {
        Self {
            id: id.into(),
            delay,
            state: RevealState::Hidden,
            animations: 0,
            ends_at: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    /// Number of reveal animations started. Never exceeds one.
    pub fn animations(&self) -> u32 {
        self.animations
    }

    /// Register with the observer, or reveal at once when it is unsupported.
    pub fn mount(&mut self, observer: &mut dyn VisibilityObserver) {
        if observer.is_supported() {
            observer.observe(&self.id);
        } else {
            debug!(section = %self.id, "intersection unsupported, revealing at mount");
            self.state = RevealState::Revealed;
        }
    }

    /// Handle an intersection record at time `now`.
    ///
    /// Returns true when this record started the reveal.
    pub fn on_intersection(
        &mut self,
        intersecting: bool,
        now: Duration,
        duration: Duration,
        observer: &mut dyn VisibilityObserver,
    ) -> bool {
        if !intersecting || self.state != RevealState::Hidden {
            return false;
        }
        observer.unobserve(&self.id);
        self.state = RevealState::Revealing;
        self.animations += 1;
        self.ends_at = Some(now + self.delay + duration);
        debug!(section = %self.id, delay_ms = self.delay.as_millis() as u64, "reveal started");
        true
    }

    /// Complete the transition if it has run its course by `now`.
    pub fn on_tick(&mut self, now: Duration) {
        if self.state == RevealState::Revealing
            && let Some(ends_at) = self.ends_at
            && now >= ends_at
        {
            self.state = RevealState::Revealed;
        }
    }
}

/// Start of a reveal, as scheduled for one section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledReveal {
    pub id: String,
    pub starts_at: Duration,
}

/// Drives the sections of one page against one observer and a clock.
#[derive(Debug)]
pub struct RevealScheduler<O: VisibilityObserver> {
    observer: O,
    sections: Vec<RevealSection>,
    duration: Duration,
    now: Duration,
    started: Vec<ScheduledReveal>,
}

impl<O: VisibilityObserver> RevealScheduler<O> {
    pub fn new(observer: O, duration: Duration) -> Self {
        Self {
            observer,
            sections: Vec::new(),
            duration,
            now: Duration::ZERO,
            started: Vec::new(),
        }
    }

    /// Mount a section and deliver any records its observation produced.
    pub fn mount(&mut self, id: impl Into<String>, delay: Duration) {
        let mut section = RevealSection::new(id, delay);
        section.mount(&mut self.observer);
        self.sections.push(section);
        self.dispatch();
    }

    /// Mutate the observer (e.g. scroll a [`Viewport`]) and deliver the
    /// resulting records.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut O) -> R) -> R {
        let result = f(&mut self.observer);
        self.dispatch();
        result
    }

    /// Let time pass, completing transitions that have finished.
    pub fn advance(&mut self, elapsed: Duration) {
        self.now += elapsed;
        self.dispatch();
        for section in &mut self.sections {
            section.on_tick(self.now);
        }
    }

    /// Deliver pending intersection records to their sections.
    pub fn dispatch(&mut self) {
        for record in self.observer.take_records() {
            let Some(section) = self.sections.iter_mut().find(|s| s.id == record.target) else {
                continue;
            };
            if section.on_intersection(record.intersecting, self.now, self.duration, &mut self.observer)
            {
                self.started.push(ScheduledReveal {
                    id: section.id.clone(),
                    starts_at: self.now + section.delay,
                });
            }
        }
    }

    pub fn state(&self, id: &str) -> Option<RevealState> {
        self.section(id).map(RevealSection::state)
    }

    pub fn section(&self, id: &str) -> Option<&RevealSection> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn sections(&self) -> &[RevealSection] {
        &self.sections
    }

    /// Reveals started so far, in trigger order.
    pub fn started(&self) -> &[ScheduledReveal] {
        &self.started
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn now(&self) -> Duration {
        self.now
    }
}

/// Inline style carrying a reveal delay.
pub fn reveal_style(delay: Duration) -> String {
    format!("--reveal-delay: {}ms", delay.as_millis())
}

/// Markup for a reveal section in its initial `Hidden` state.
///
/// Hidden styling only applies once the page script has marked the document
/// with `js-reveal`, so the section is fully visible without script support.
pub fn reveal_section(id: Option<&str>, delay: Duration, content: Markup) -> Markup {
    html! {
        section.reveal id=[id] data-reveal=(RevealState::Hidden.as_str()) style=(reveal_style(delay)) {
            (content)
        }
    }
}
