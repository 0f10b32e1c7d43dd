//! Property-based invariant tests for the active-section tracker.
//!
//! These tests verify the tracker against arbitrary page geometry:
//!
//! 1. Score components and the raw score stay within `[0, 1]`
//! 2. Below the hero cutoff the hero is always active
//! 3. A winner's adjusted score is strictly above the threshold
//! 4. Re-evaluating unchanged geometry never changes the active section
//! 5. The active section is the hero or a section that was rendered
//! 6. Any burst of scrolls yields exactly one evaluation

use kp_catalog::SectionId;
use kp_core::Rect;
use kp_runtime::Observable;
use kp_widgets::layout::{LayoutProvider, StaticLayout};
use kp_widgets::scroll_spy::{ActiveSectionTracker, Evaluation, ScrollSpyConfig, score_section};
use proptest::prelude::*;
use web_time::Duration;

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Page {
    viewport_height: f64,
    heights: Vec<f64>,
    /// Sections that are not rendered.
    missing: Vec<bool>,
    /// Scroll offset as a share of the scrollable range.
    scroll_frac: f64,
    prior: usize,
}

fn page_strategy() -> impl Strategy<Value = Page> {
    (
        300.0f64..1200.0,
        prop::collection::vec(50.0f64..2000.0, 10),
        prop::collection::vec(prop::bool::weighted(0.15), 10),
        0.0f64..=1.0,
        0usize..10,
    )
        .prop_map(|(viewport_height, heights, missing, scroll_frac, prior)| Page {
            viewport_height,
            heights,
            missing,
            scroll_frac,
            prior,
        })
}

fn build(page: &Page) -> StaticLayout {
    let mut layout = StaticLayout::new(1200.0, page.viewport_height);
    let mut top = 0.0;
    for (i, id) in SectionId::ALL.into_iter().enumerate() {
        if !page.missing[i] {
            layout.set_section(id, top, page.heights[i]);
        }
        top += page.heights[i];
    }
    layout.set_document_height(top.max(page.viewport_height));
    let max = layout.scroll().max_scroll();
    layout.set_scroll_top(max * page.scroll_frac);
    layout
}

fn tracker(prior: SectionId) -> ActiveSectionTracker {
    ActiveSectionTracker::new(Observable::new(prior), ScrollSpyConfig::default())
}

// ═══════════════════════════════════════════════════════════════════════
// 1. Score bounds
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn scores_stay_in_unit_range(
        top in -5000.0f64..5000.0,
        height in 1.0f64..4000.0,
        vh in 1.0f64..2000.0,
    ) {
        let score = score_section(Rect::new(0.0, top, 100.0, height), vh, &ScrollSpyConfig::default())
            .expect("non-degenerate");
        prop_assert!((0.0..=1.0).contains(&score.center));
        prop_assert!((0.0..=1.0 + 1e-9).contains(&score.visibility));
        prop_assert!(score.raw >= 0.0 && score.raw <= 1.0 + 1e-9);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 2–5. Evaluation outcomes
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn hero_below_cutoff(page in page_strategy(), scroll in 0.0f64..200.0) {
        let mut layout = build(&page);
        layout.set_scroll_top(scroll);
        let t = tracker(SectionId::ALL[page.prior]);
        let evaluation = t.evaluate(&layout);
        prop_assert!(matches!(evaluation, Evaluation::Hero { .. }), "got {evaluation:?}");
        prop_assert_eq!(t.active(), SectionId::Hero);
    }

    #[test]
    fn winner_clears_threshold(page in page_strategy()) {
        let layout = build(&page);
        let t = tracker(SectionId::ALL[page.prior]);
        if let Evaluation::Winner { score, section, .. } = t.evaluate(&layout) {
            prop_assert!(score > t.config().threshold);
            prop_assert!(layout.bounds_of(section).is_some());
            prop_assert!(!section.is_hero());
        }
    }

    #[test]
    fn reevaluation_is_stable(page in page_strategy()) {
        let layout = build(&page);
        let t = tracker(SectionId::ALL[page.prior]);
        t.evaluate(&layout);
        let settled = t.active();
        let again = t.evaluate(&layout);
        prop_assert!(!again.changed(), "second evaluation changed: {again:?}");
        prop_assert_eq!(t.active(), settled);
    }

    #[test]
    fn active_is_hero_or_rendered(page in page_strategy(), extra in prop::collection::vec(0.0f64..=1.0, 0..8)) {
        let mut layout = build(&page);
        let t = tracker(SectionId::Hero);
        let max = layout.scroll().max_scroll();
        t.evaluate(&layout);
        for frac in extra {
            layout.set_scroll_top(max * frac);
            t.evaluate(&layout);
        }
        let active = t.active();
        prop_assert!(active.is_hero() || layout.bounds_of(active).is_some());
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 6. Debounce through the tracker
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn burst_evaluates_once(page in page_strategy(), gaps in prop::collection::vec(0u64..150, 1..30)) {
        let layout = build(&page);
        let mut t = tracker(SectionId::Hero);
        let mut now = 0u64;
        let mut fired = 0usize;
        for gap in &gaps {
            now += gap;
            t.on_scroll(Duration::from_millis(now));
            if t.poll(Duration::from_millis(now), &layout).is_some() {
                fired += 1;
            }
        }
        for step in 0..40u64 {
            if t.poll(Duration::from_millis(now + step * 10), &layout).is_some() {
                fired += 1;
            }
        }
        prop_assert_eq!(fired, 1);
        prop_assert_eq!(t.evaluations(), 1);
    }
}
