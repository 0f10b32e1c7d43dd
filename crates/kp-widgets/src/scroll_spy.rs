#![forbid(unsafe_code)]

//! Active-section tracker (scroll spy).
//!
//! Decides which page section is "in focus" so the navigation can highlight
//! it. Each scroll event reschedules a single debounced evaluation; when it
//! fires, every rendered section is scored against the viewport and the best
//! one above a threshold becomes active.
//!
//! # Scoring
//!
//! For a section with viewport-relative bounds `top..bottom` (height `h`) in
//! a viewport of height `vh`:
//!
//! ```text
//! center     = max(0, 1 - |mid - vh/2| / (vh/2 + h/2))
//! visibility = max(0, min(bottom, vh) - max(top, 0)) / min(h, vh)
//! score      = 0.7 * center + 0.3 * visibility
//! ```
//!
//! The currently active section gets a `+0.1` bonus so near-ties do not
//! flicker. The first section (in document order) with the highest adjusted
//! score strictly above `0.6` wins. Below a 200px scroll offset the hero is
//! forced active without scoring.
//!
//! # State machine
//!
//! ```text
//!            debounce fires
//!   Idle ───────────────────▶ Evaluating
//!     ▲                           │
//!     └───────── always ──────────┘
//! ```
//!
//! An [`EvaluationGuard`] holds the `Evaluating` phase for the duration of an
//! evaluation; a nested call observes the guard and returns
//! [`Evaluation::Suppressed`] without touching state.

use std::cell::Cell;

use kp_catalog::SectionId;
use kp_core::{Debouncer, Rect};
use kp_runtime::Observable;
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span, trace};
use web_time::Duration;

use crate::layout::LayoutProvider;

/// Tunables of the tracker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrollSpyConfig {
    /// Settle delay after the last scroll event.
    pub debounce_ms: u64,
    /// Below this scroll offset the hero is forced active.
    pub hero_cutoff: f64,
    pub center_weight: f64,
    pub visibility_weight: f64,
    /// Bonus added to the currently active section.
    pub hysteresis: f64,
    /// Adjusted score a winner must strictly exceed.
    pub threshold: f64,
}

impl Default for ScrollSpyConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 150,
            hero_cutoff: 200.0,
            center_weight: 0.7,
            visibility_weight: 0.3,
            hysteresis: 0.1,
            threshold: 0.6,
        }
    }
}

impl ScrollSpyConfig {
    #[must_use]
    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.debounce_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn with_hysteresis(mut self, bonus: f64) -> Self {
        self.hysteresis = bonus;
        self
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use]
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Per-section score components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionScore {
    pub center: f64,
    pub visibility: f64,
    /// Weighted sum, before hysteresis.
    pub raw: f64,
}

/// Score a section's viewport-relative bounds.
///
/// Returns `None` for degenerate geometry (zero height or zero viewport),
/// which callers treat like a missing section.
#[must_use]
pub fn score_section(bounds: Rect, viewport_height: f64, config: &ScrollSpyConfig) -> Option<SectionScore> {
    let height = bounds.height;
    if !(height > 0.0 && viewport_height > 0.0) || !bounds.y.is_finite() {
        return None;
    }
    let viewport_center = viewport_height / 2.0;
    let distance = (bounds.center_y() - viewport_center).abs();
    let max_distance = viewport_center + height / 2.0;
    let center = (1.0 - distance / max_distance).max(0.0);

    let visible = bounds.vertical_overlap(0.0, viewport_height);
    let visibility = visible / height.min(viewport_height);

    let raw = config.center_weight * center + config.visibility_weight * visibility;
    Some(SectionScore {
        center,
        visibility,
        raw,
    })
}

/// Phase of the tracker's evaluation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackerPhase {
    #[default]
    Idle,
    Evaluating,
}

/// Outcome of one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Evaluation {
    /// Another evaluation was in progress; nothing happened.
    Suppressed,
    /// Scroll offset below the hero cutoff; hero forced active.
    Hero { changed: bool },
    /// A section cleared the threshold.
    Winner {
        section: SectionId,
        /// Adjusted score (hysteresis included).
        score: f64,
        changed: bool,
    },
    /// No section cleared the threshold; active section unchanged.
    NoWinner,
}

impl Evaluation {
    /// Whether the active section changed.
    #[must_use]
    pub fn changed(&self) -> bool {
        matches!(
            self,
            Evaluation::Hero { changed: true } | Evaluation::Winner { changed: true, .. }
        )
    }
}

/// RAII hold on the `Evaluating` phase.
struct EvaluationGuard<'a> {
    phase: &'a Cell<TrackerPhase>,
}

impl<'a> EvaluationGuard<'a> {
    fn acquire(phase: &'a Cell<TrackerPhase>) -> Option<Self> {
        if phase.get() == TrackerPhase::Evaluating {
            return None;
        }
        phase.set(TrackerPhase::Evaluating);
        Some(Self { phase })
    }
}

impl Drop for EvaluationGuard<'_> {
    fn drop(&mut self) {
        self.phase.set(TrackerPhase::Idle);
    }
}

/// Debounced, hysteretic active-section tracker.
///
/// Writes to a shared [`Observable<SectionId>`] owned by the page; readers
/// subscribe to or poll that cell.
#[derive(Debug)]
pub struct ActiveSectionTracker {
    config: ScrollSpyConfig,
    active: Observable<SectionId>,
    debouncer: Debouncer<()>,
    phase: Cell<TrackerPhase>,
    /// Programmatic scrolls in flight suppress tracking until this time.
    pinned_until: Option<Duration>,
    evaluations: Cell<u64>,
}

impl ActiveSectionTracker {
    /// Create a tracker writing into `active`.
    #[must_use]
    pub fn new(active: Observable<SectionId>, config: ScrollSpyConfig) -> Self {
        Self {
            debouncer: Debouncer::new(config.debounce()),
            config,
            active,
            phase: Cell::new(TrackerPhase::Idle),
            pinned_until: None,
            evaluations: Cell::new(0),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ScrollSpyConfig {
        &self.config
    }

    /// The current active section.
    #[must_use]
    pub fn active(&self) -> SectionId {
        self.active.get()
    }

    /// The shared active-section cell.
    #[must_use]
    pub fn active_cell(&self) -> &Observable<SectionId> {
        &self.active
    }

    #[must_use]
    pub fn phase(&self) -> TrackerPhase {
        self.phase.get()
    }

    /// Completed (non-suppressed) evaluations so far.
    #[must_use]
    pub fn evaluations(&self) -> u64 {
        self.evaluations.get()
    }

    /// Whether an evaluation is scheduled.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// When the tracker next needs a [`poll`](Self::poll), if ever.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.debouncer.due_at(), self.pinned_until) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    #[must_use]
    pub fn is_pinned(&self) -> bool {
        self.pinned_until.is_some()
    }

    /// A scroll happened at `now`. Cancels any pending evaluation and
    /// schedules a new one one debounce interval later.
    ///
    /// Returns `false` when ignored because a navigation jump is in flight.
    pub fn on_scroll(&mut self, now: Duration) -> bool {
        if self.pinned_until.is_some() {
            trace!("scroll ignored while pinned");
            return false;
        }
        self.debouncer.schedule(now, ());
        true
    }

    /// Run the scheduled evaluation if its timer has elapsed.
    pub fn poll(&mut self, now: Duration, layout: &dyn LayoutProvider) -> Option<Evaluation> {
        if let Some(until) = self.pinned_until {
            if now < until {
                return None;
            }
            self.pinned_until = None;
            debug!("navigation pin released");
            // Re-check where the programmatic scroll actually landed.
            self.debouncer.schedule_at(until, ());
        }
        self.debouncer.poll(now)?;
        Some(self.evaluate(layout))
    }

    /// Make `section` active right away and ignore scroll tracking for
    /// `pin`, while a programmatic scroll is travelling there.
    pub fn jump_to(&mut self, section: SectionId, now: Duration, pin: Duration) {
        self.debouncer.cancel();
        self.pinned_until = Some(now.saturating_add(pin));
        if self.active.set(section) {
            debug!(section = section.as_str(), "active section set by navigation");
        }
    }

    /// Score all sections against the current layout and update the active
    /// section. Synchronous; callers normally go through
    /// [`poll`](Self::poll).
    pub fn evaluate(&self, layout: &dyn LayoutProvider) -> Evaluation {
        let Some(_guard) = EvaluationGuard::acquire(&self.phase) else {
            trace!("evaluation suppressed: already evaluating");
            return Evaluation::Suppressed;
        };

        let sample = layout.scroll().sanitized();
        let _span = info_span!("scroll_spy.evaluate", scroll_top = sample.scroll_top).entered();
        self.evaluations.set(self.evaluations.get() + 1);

        let current = self.active.get();
        if sample.scroll_top < self.config.hero_cutoff {
            let changed = self.active.set(SectionId::Hero);
            if changed {
                debug!(from = current.as_str(), "active section reset to hero");
            }
            return Evaluation::Hero { changed };
        }

        let mut best: Option<(SectionId, f64)> = None;
        for section in SectionId::ALL {
            if section.is_hero() {
                continue;
            }
            let Some(bounds) = layout.bounds_of(section) else {
                continue;
            };
            let Some(score) = score_section(bounds, sample.viewport_height, &self.config) else {
                continue;
            };
            let adjusted = if section == current {
                score.raw + self.config.hysteresis
            } else {
                score.raw
            };
            trace!(
                section = section.as_str(),
                center = score.center,
                visibility = score.visibility,
                adjusted,
                "section scored"
            );
            let best_score = best.map_or(0.0, |(_, s)| s);
            if adjusted > self.config.threshold && adjusted > best_score {
                best = Some((section, adjusted));
            }
        }

        match best {
            Some((section, score)) => {
                let changed = self.active.set(section);
                if changed {
                    debug!(
                        from = current.as_str(),
                        to = section.as_str(),
                        score,
                        "active section changed"
                    );
                }
                Evaluation::Winner {
                    section,
                    score,
                    changed,
                }
            }
            None => Evaluation::NoWinner,
        }
    }
}
