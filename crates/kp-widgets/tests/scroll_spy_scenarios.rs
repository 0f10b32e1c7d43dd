//! End-to-end scenarios for the active-section tracker.
//!
//! Each test drives the tracker the way the page does: scroll events with a
//! host clock, `poll` on every frame, geometry from a `StaticLayout`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use kp_catalog::{Category, SectionId};
use kp_core::{Rect, ScrollSample};
use kp_runtime::Observable;
use kp_widgets::layout::{LayoutProvider, StaticLayout};
use kp_widgets::scroll_spy::{ActiveSectionTracker, Evaluation, ScrollSpyConfig, TrackerPhase, score_section};
use pretty_assertions::assert_eq;
use web_time::Duration;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn tracker_at(active: SectionId) -> ActiveSectionTracker {
    ActiveSectionTracker::new(Observable::new(active), ScrollSpyConfig::default())
}

/// Scroll to `top` at `now` and run every frame until the debounce fires.
fn scroll_and_settle(
    tracker: &mut ActiveSectionTracker,
    layout: &mut StaticLayout,
    top: f64,
    now: u64,
) -> Option<Evaluation> {
    layout.set_scroll_top(top);
    tracker.on_scroll(ms(now));
    (now..=now + 200).step_by(16).find_map(|t| tracker.poll(ms(t), &*layout))
}

// ═══════════════════════════════════════════════════════════════════════
// Hero cutoff
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn below_cutoff_forces_hero_without_scoring() {
    let mut layout = StaticLayout::stacked(1200.0, 800.0, 150.0, 800.0);
    let mut tracker = tracker_at(Category::Cm12.section());
    // Section 9 is fully in view at 199px, but the cutoff wins.
    let evaluation = scroll_and_settle(&mut tracker, &mut layout, 199.0, 0);
    assert_eq!(evaluation, Some(Evaluation::Hero { changed: true }));
    assert_eq!(tracker.active(), SectionId::Hero);
}

#[test]
fn reset_to_zero_returns_to_hero_from_anywhere() {
    let mut layout = StaticLayout::stacked(1200.0, 800.0, 800.0, 800.0);
    let mut tracker = tracker_at(SectionId::Hero);
    let top = layout.document_top_of(Category::Cm60.section()).unwrap_or_default();
    scroll_and_settle(&mut tracker, &mut layout, top, 0);
    assert_eq!(tracker.active(), Category::Cm60.section());

    scroll_and_settle(&mut tracker, &mut layout, 0.0, 1000);
    assert_eq!(tracker.active(), SectionId::Hero);
}

// ═══════════════════════════════════════════════════════════════════════
// Scoring and the 800px viewport scenario
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn section_filling_viewport_becomes_active() {
    let s12 = Category::Cm12.section();
    let mut layout = StaticLayout::new(1200.0, 800.0);
    layout.set_section(s12, 1000.0, 800.0);
    let mut tracker = tracker_at(SectionId::Hero);

    let evaluation = scroll_and_settle(&mut tracker, &mut layout, 1000.0, 0);
    assert_eq!(
        evaluation,
        Some(Evaluation::Winner {
            section: s12,
            score: 1.0,
            changed: true
        })
    );
    assert_eq!(tracker.active(), s12);
}

#[test]
fn half_visible_off_center_section_stays_below_threshold() {
    let s12 = Category::Cm12.section();
    let mut layout = StaticLayout::new(1200.0, 800.0);
    layout.set_section(s12, 1000.0, 800.0);
    layout.set_scroll_top(600.0);

    let bounds = layout.bounds_of(s12).expect("rendered");
    assert_eq!(bounds, Rect::new(0.0, 400.0, 1200.0, 800.0));
    let score = score_section(bounds, 800.0, &ScrollSpyConfig::default()).expect("scored");
    assert!((score.center - 0.5).abs() < 1e-9);
    assert!((score.visibility - 0.5).abs() < 1e-9);
    assert!((score.raw - 0.5).abs() < 1e-9);

    let mut tracker = tracker_at(SectionId::Hero);
    let evaluation = scroll_and_settle(&mut tracker, &mut layout, 600.0, 0);
    assert_eq!(evaluation, Some(Evaluation::NoWinner));
    assert_eq!(tracker.active(), SectionId::Hero);
}

#[test]
fn equal_scores_keep_the_current_section() {
    let a = Category::Cm9.section();
    let b = Category::Cm12.section();
    let mut layout = StaticLayout::new(1200.0, 800.0);
    layout.set_section(a, 1000.0, 400.0);
    layout.set_section(b, 1400.0, 400.0);
    layout.set_document_height(4000.0);
    layout.set_scroll_top(1000.0);

    let config = ScrollSpyConfig::default();
    let score_a = score_section(layout.bounds_of(a).expect("a"), 800.0, &config).expect("a");
    let score_b = score_section(layout.bounds_of(b).expect("b"), 800.0, &config).expect("b");
    assert!((score_a.raw - score_b.raw).abs() < 1e-9);

    let tracker = tracker_at(b);
    let evaluation = tracker.evaluate(&layout);
    assert!(matches!(
        evaluation,
        Evaluation::Winner { section, changed: false, .. } if section == b
    ));

    // With neither active, document order breaks the tie.
    let tracker = tracker_at(SectionId::Hero);
    tracker.evaluate(&layout);
    assert_eq!(tracker.active(), a);
}

#[test]
fn hysteresis_bonus_is_what_holds_a_tie() {
    let a = Category::Cm9.section();
    let b = Category::Cm12.section();
    let mut layout = StaticLayout::new(1200.0, 800.0);
    layout.set_section(a, 1000.0, 400.0);
    layout.set_section(b, 1400.0, 400.0);
    layout.set_document_height(4000.0);
    layout.set_scroll_top(1000.0);

    let tracker = ActiveSectionTracker::new(
        Observable::new(b),
        ScrollSpyConfig::default().with_hysteresis(0.0),
    );
    let evaluation = tracker.evaluate(&layout);
    assert!(matches!(
        evaluation,
        Evaluation::Winner { section, changed: true, .. } if section == a
    ));
    assert_eq!(tracker.active(), a);
}

#[test]
fn raised_threshold_leaves_only_the_active_section_eligible() {
    let a = Category::Cm9.section();
    let b = Category::Cm12.section();
    let mut layout = StaticLayout::new(1200.0, 800.0);
    layout.set_section(a, 1000.0, 400.0);
    layout.set_section(b, 1400.0, 400.0);
    layout.set_document_height(4000.0);
    layout.set_scroll_top(1000.0);
    // Both halves score 0.7667 raw; only the bonus clears 0.8.
    let config = ScrollSpyConfig::default().with_threshold(0.8);

    let tracker = ActiveSectionTracker::new(Observable::new(SectionId::Hero), config.clone());
    assert_eq!(tracker.evaluate(&layout), Evaluation::NoWinner);
    assert_eq!(tracker.active(), SectionId::Hero);

    let tracker = ActiveSectionTracker::new(Observable::new(b), config);
    assert!(matches!(
        tracker.evaluate(&layout),
        Evaluation::Winner { section, changed: false, .. } if section == b
    ));
}

// ═══════════════════════════════════════════════════════════════════════
// Debounce
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn burst_of_scrolls_yields_one_evaluation() {
    let mut layout = StaticLayout::stacked(1200.0, 800.0, 800.0, 800.0);
    let mut tracker = tracker_at(SectionId::Hero);
    let mut evaluations = Vec::new();
    for (i, t) in (0..140).step_by(10).enumerate() {
        layout.set_scroll_top(100.0 * i as f64);
        tracker.on_scroll(ms(t));
        if let Some(e) = tracker.poll(ms(t), &layout) {
            evaluations.push(e);
        }
    }
    for t in (140..600).step_by(5) {
        if let Some(e) = tracker.poll(ms(t), &layout) {
            evaluations.push(e);
        }
    }
    assert_eq!(evaluations.len(), 1);
    assert_eq!(tracker.evaluations(), 1);
    assert!(!tracker.is_pending());
}

#[test]
fn evaluation_fires_exactly_one_debounce_after_last_scroll() {
    let mut layout = StaticLayout::stacked(1200.0, 800.0, 800.0, 800.0);
    let mut tracker = tracker_at(SectionId::Hero);
    layout.set_scroll_top(800.0);
    tracker.on_scroll(ms(0));
    tracker.on_scroll(ms(100));
    assert_eq!(tracker.next_deadline(), Some(ms(250)));
    assert_eq!(tracker.poll(ms(249), &layout), None);
    assert!(tracker.poll(ms(250), &layout).is_some());
}

#[test]
fn subscribers_see_each_change_once() {
    let mut layout = StaticLayout::stacked(1200.0, 800.0, 800.0, 800.0);
    let active = Observable::new(SectionId::Hero);
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let _sub = active.subscribe(move |s: &SectionId| sink.borrow_mut().push(*s));
    let mut tracker = ActiveSectionTracker::new(active.clone(), ScrollSpyConfig::default());

    let s16 = layout.document_top_of(Category::Cm16.section()).unwrap_or_default();
    scroll_and_settle(&mut tracker, &mut layout, s16, 0);
    scroll_and_settle(&mut tracker, &mut layout, s16 + 10.0, 500);
    scroll_and_settle(&mut tracker, &mut layout, 0.0, 1000);

    assert_eq!(*seen.borrow(), vec![Category::Cm16.section(), SectionId::Hero]);
}

// ═══════════════════════════════════════════════════════════════════════
// Re-entrancy guard
// ═══════════════════════════════════════════════════════════════════════

/// Layout that tries to start a second evaluation while the first one is
/// reading geometry.
struct ReentrantLayout<'a> {
    tracker: &'a ActiveSectionTracker,
    inner: StaticLayout,
    nested: RefCell<Vec<Evaluation>>,
    phase_seen: Cell<Option<TrackerPhase>>,
}

impl LayoutProvider for ReentrantLayout<'_> {
    fn scroll(&self) -> ScrollSample {
        self.inner.scroll()
    }

    fn bounds_of(&self, section: SectionId) -> Option<Rect> {
        self.phase_seen.set(Some(self.tracker.phase()));
        self.nested.borrow_mut().push(self.tracker.evaluate(&self.inner));
        self.inner.bounds_of(section)
    }
}

#[test]
fn nested_evaluation_is_suppressed() {
    let tracker = tracker_at(SectionId::Hero);
    let mut inner = StaticLayout::stacked(1200.0, 800.0, 800.0, 800.0);
    inner.set_scroll_top(inner.document_top_of(Category::Cm25.section()).unwrap_or_default());
    let layout = ReentrantLayout {
        tracker: &tracker,
        inner,
        nested: RefCell::new(Vec::new()),
        phase_seen: Cell::new(None),
    };

    let outer = tracker.evaluate(&layout);
    assert!(outer.changed());
    assert_eq!(tracker.active(), Category::Cm25.section());
    assert_eq!(tracker.evaluations(), 1);
    assert_eq!(layout.phase_seen.get(), Some(TrackerPhase::Evaluating));
    assert_eq!(tracker.phase(), TrackerPhase::Idle);

    let nested = layout.nested.borrow();
    assert_eq!(nested.len(), Category::ALL.len());
    assert!(nested.iter().all(|e| *e == Evaluation::Suppressed));
}
