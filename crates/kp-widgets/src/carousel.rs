#![forbid(unsafe_code)]

//! Product carousel state.
//!
//! One [`Carousel`] per category. It tracks the current slide, responsive
//! layout (slides per view, spacing, slide vs coverflow effect), autoplay,
//! pointer drags, per-image load state, and whether the carousel is mounted
//! at all: carousels far from the viewport are unmounted and start again at
//! the first slide when they come back.
//!
//! Geometry that depends on real element sizes (the track translation) is
//! left to CSS: the view writes the slide index, slides per view, spacing
//! and live drag offset as custom properties on the track.

use kp_catalog::{Category, products};
use kp_core::{Debouncer, KeyCode, Rect, Sides};
use kp_runtime::Frame;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};
use web_time::Duration;

use crate::navigation::fmt_decimal;

/// Widest the carousel container gets (the page's `max-w-7xl`).
const MAX_CONTAINER_WIDTH: f64 = 1280.0;
/// Horizontal padding of the container on each side.
const CONTAINER_GUTTER: f64 = 16.0;

/// Element ids written by [`Carousel::view`].
pub mod ids {
    use kp_catalog::Category;

    #[must_use]
    pub fn track(category: Category) -> String {
        format!("{}-track", category.section().as_str())
    }

    #[must_use]
    pub fn prev_button(category: Category) -> String {
        format!("{}-prev", category.section().as_str())
    }

    #[must_use]
    pub fn next_button(category: Category) -> String {
        format!("{}-next", category.section().as_str())
    }

    #[must_use]
    pub fn bullet(category: Category, index: usize) -> String {
        format!("{}-bullet-{index}", category.section().as_str())
    }

    #[must_use]
    pub fn slide(product_id: &str) -> String {
        format!("slide-{product_id}")
    }

    #[must_use]
    pub fn image(product_id: &str) -> String {
        format!("img-{product_id}")
    }

    #[must_use]
    pub fn skeleton(product_id: &str) -> String {
        format!("skeleton-{product_id}")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CarouselConfig {
    pub autoplay_ms: u64,
    /// Pointer travel below this is not a drag.
    pub drag_threshold: f64,
    /// Share of a slide width a drag must travel to change slides.
    pub long_swipe_ratio: f64,
    /// Drags released faster than this change slides on any travel past the
    /// threshold.
    pub short_swipe_ms: u64,
    /// Intersection ratio the section must exceed to mount the carousel.
    pub in_view_ratio: f64,
    /// Viewport inset (top and bottom) for the intersection test.
    pub in_view_margin: f64,
    /// Delay before a visibility change takes effect.
    pub in_view_delay_ms: u64,
    /// Viewport width from which the coverflow effect is used.
    pub coverflow_min_width: f64,
    pub coverflow_rotate: f64,
    pub coverflow_depth: f64,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            autoplay_ms: 4000,
            drag_threshold: 10.0,
            long_swipe_ratio: 0.5,
            short_swipe_ms: 300,
            in_view_ratio: 0.15,
            in_view_margin: 80.0,
            in_view_delay_ms: 50,
            coverflow_min_width: 768.0,
            coverflow_rotate: 15.0,
            coverflow_depth: 200.0,
        }
    }
}

impl CarouselConfig {
    #[must_use]
    pub fn with_autoplay(mut self, delay: Duration) -> Self {
        self.autoplay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self
    }

    #[must_use]
    pub fn autoplay(&self) -> Duration {
        Duration::from_millis(self.autoplay_ms)
    }
}

/// Responsive slide layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breakpoint {
    pub slides_per_view: f64,
    pub space_between: f64,
}

/// Slide layout for a viewport width.
#[must_use]
pub fn breakpoint(width: f64) -> Breakpoint {
    let (slides_per_view, space_between) = if width >= 1280.0 {
        (3.5, 35.0)
    } else if width >= 1024.0 {
        (3.0, 30.0)
    } else if width >= 768.0 {
        (2.0, 25.0)
    } else if width >= 640.0 {
        (1.3, 20.0)
    } else if width >= 480.0 {
        (1.1, 15.0)
    } else {
        (1.0, 20.0)
    };
    Breakpoint {
        slides_per_view,
        space_between,
    }
}

/// Transition effect between slides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlideEffect {
    Slide,
    Coverflow { rotate: f64, depth: f64 },
}

/// Load state of one product image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageState {
    #[default]
    Loading,
    Loaded,
    Failed,
}

/// What a pointer release amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerOutcome {
    /// Released without dragging: open the lightbox at this slide.
    Open(usize),
    /// Drag committed to a neighbouring slide.
    Moved,
    /// Drag too short; snapped back.
    SnappedBack,
    /// No drag was in progress.
    Ignored,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    start_x: f64,
    start: Duration,
    offset: f64,
    dragging: bool,
    slide: Option<usize>,
}

/// Carousel for one category.
#[derive(Debug, Clone)]
pub struct Carousel {
    config: CarouselConfig,
    category: Category,
    len: usize,
    index: usize,
    mounted: bool,
    /// Last visibility computed from layout; only changes are scheduled.
    observed_in_view: Option<bool>,
    visibility: Debouncer<bool>,
    hovered: bool,
    autoplay_due: Option<Duration>,
    drag: Option<Drag>,
    images: Vec<ImageState>,
    viewport_width: f64,
}

impl Carousel {
    #[must_use]
    pub fn new(category: Category, config: CarouselConfig, viewport_width: f64) -> Self {
        let len = products(category).len();
        Self {
            visibility: Debouncer::new(Duration::from_millis(config.in_view_delay_ms)),
            config,
            category,
            len,
            index: 0,
            mounted: false,
            observed_in_view: None,
            hovered: false,
            autoplay_due: None,
            drag: None,
            images: vec![ImageState::Loading; len],
            viewport_width,
        }
    }

    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    #[must_use]
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some_and(|d| d.dragging)
    }

    /// Whether a pointer is down on this carousel.
    #[must_use]
    pub fn has_pointer(&self) -> bool {
        self.drag.is_some()
    }

    #[must_use]
    pub fn autoplay_due(&self) -> Option<Duration> {
        self.autoplay_due
    }

    #[must_use]
    pub fn image_state(&self, index: usize) -> Option<ImageState> {
        self.images.get(index).copied()
    }

    #[must_use]
    pub fn breakpoint(&self) -> Breakpoint {
        breakpoint(self.viewport_width)
    }

    #[must_use]
    pub fn effect(&self) -> SlideEffect {
        if self.viewport_width >= self.config.coverflow_min_width {
            SlideEffect::Coverflow {
                rotate: self.config.coverflow_rotate,
                depth: self.config.coverflow_depth,
            }
        } else {
            SlideEffect::Slide
        }
    }

    /// Phones get the "tap to view" hint and the plain slide effect.
    #[must_use]
    pub fn is_mobile(&self) -> bool {
        self.viewport_width < self.config.coverflow_min_width
    }

    /// Estimated rendered width of one slide.
    #[must_use]
    pub fn slide_width(&self) -> f64 {
        let bp = self.breakpoint();
        let container = (self.viewport_width.min(MAX_CONTAINER_WIDTH) - 2.0 * CONTAINER_GUTTER).max(0.0);
        ((container - (bp.slides_per_view - 1.0) * bp.space_between) / bp.slides_per_view).max(0.0)
    }

    pub fn resize(&mut self, viewport_width: f64) {
        self.viewport_width = viewport_width;
    }

    fn restart_autoplay(&mut self, now: Duration) {
        self.autoplay_due = if self.mounted && !self.hovered {
            Some(now.saturating_add(self.config.autoplay()))
        } else {
            None
        };
    }

    /// Jump to `index` (clamped). Counts as interaction: restarts autoplay.
    pub fn go_to(&mut self, index: usize, now: Duration) -> bool {
        if self.len == 0 {
            return false;
        }
        let index = index.min(self.len - 1);
        let moved = index != self.index;
        self.index = index;
        self.restart_autoplay(now);
        if moved {
            trace!(section = self.category.section().as_str(), index, "slide changed");
        }
        moved
    }

    /// Next slide; stays on the last one.
    pub fn next(&mut self, now: Duration) -> bool {
        self.go_to(self.index.saturating_add(1), now)
    }

    /// Previous slide; stays on the first one.
    pub fn prev(&mut self, now: Duration) -> bool {
        self.go_to(self.index.saturating_sub(1), now)
    }

    /// Keyboard navigation. The caller only routes keys to the carousel whose
    /// section is in the viewport.
    pub fn handle_key(&mut self, key: KeyCode, now: Duration) -> bool {
        if !self.mounted {
            return false;
        }
        match key {
            KeyCode::ArrowLeft | KeyCode::PageUp => self.prev(now),
            KeyCode::ArrowRight | KeyCode::PageDown => self.next(now),
            _ => false,
        }
    }

    /// Pointer entered (`true`) or left the carousel. Hover pauses autoplay.
    pub fn set_hovered(&mut self, hovered: bool, now: Duration) {
        if self.hovered == hovered {
            return;
        }
        self.hovered = hovered;
        self.restart_autoplay(now);
        if !hovered {
            self.pointer_cancel();
        }
    }

    pub fn pointer_down(&mut self, x: f64, slide: Option<usize>, now: Duration) {
        if !self.mounted {
            return;
        }
        self.drag = Some(Drag {
            start_x: x,
            start: now,
            offset: 0.0,
            dragging: false,
            slide,
        });
    }

    pub fn pointer_move(&mut self, x: f64) {
        let threshold = self.config.drag_threshold;
        if let Some(drag) = &mut self.drag {
            let delta = x - drag.start_x;
            if !drag.dragging && delta.abs() > threshold {
                drag.dragging = true;
            }
            if drag.dragging {
                drag.offset = delta;
            }
        }
    }

    pub fn pointer_up(&mut self, x: f64, now: Duration) -> PointerOutcome {
        self.pointer_move(x);
        let Some(drag) = self.drag.take() else {
            return PointerOutcome::Ignored;
        };
        if !drag.dragging {
            return match drag.slide {
                Some(slide) if slide < self.len => PointerOutcome::Open(slide),
                _ => PointerOutcome::Ignored,
            };
        }
        let travel = drag.offset.abs();
        let held = now.saturating_sub(drag.start);
        let long_swipe = travel > self.slide_width() * self.config.long_swipe_ratio;
        let short_swipe = held < Duration::from_millis(self.config.short_swipe_ms);
        if long_swipe || short_swipe {
            let moved = if drag.offset < 0.0 {
                self.next(now)
            } else {
                self.prev(now)
            };
            if moved {
                return PointerOutcome::Moved;
            }
        }
        self.restart_autoplay(now);
        PointerOutcome::SnappedBack
    }

    /// Abandon a drag in progress (pointer left or was cancelled).
    pub fn pointer_cancel(&mut self) {
        self.drag = None;
    }

    /// Record the section's current viewport bounds. A change in
    /// visibility takes effect after the configured delay.
    pub fn observe(&mut self, now: Duration, bounds: Option<Rect>, viewport: Rect) {
        let in_view = bounds.is_some_and(|b| {
            let root = viewport.inner(Sides::vertical(self.config.in_view_margin));
            intersection_ratio(b, root) > self.config.in_view_ratio
        });
        if self.observed_in_view != Some(in_view) {
            self.observed_in_view = Some(in_view);
            self.visibility.schedule(now, in_view);
        }
    }

    /// Advance timers: delayed visibility changes and autoplay.
    ///
    /// Returns `true` if anything visible changed.
    pub fn tick(&mut self, now: Duration) -> bool {
        let mut changed = false;
        if let Some(in_view) = self.visibility.poll(now)
            && in_view != self.mounted
        {
            self.set_mounted(in_view, now);
            changed = true;
        }
        if let Some(due) = self.autoplay_due
            && now >= due
            && !self.is_dragging()
        {
            // Rewind after the last slide.
            let next = if self.index + 1 >= self.len { 0 } else { self.index + 1 };
            self.index = next;
            self.autoplay_due = Some(now.saturating_add(self.config.autoplay()));
            changed = true;
        }
        changed
    }

    fn set_mounted(&mut self, mounted: bool, now: Duration) {
        debug!(section = self.category.section().as_str(), mounted, "carousel visibility");
        self.mounted = mounted;
        if !mounted {
            self.index = 0;
            self.drag = None;
        }
        self.restart_autoplay(now);
    }

    pub fn image_loaded(&mut self, index: usize, ok: bool) {
        if let Some(state) = self.images.get_mut(index) {
            *state = if ok { ImageState::Loaded } else { ImageState::Failed };
        }
    }

    /// Write carousel state.
    pub fn view(&self, frame: &mut Frame) {
        let bp = self.breakpoint();
        let effect = self.effect();
        let drag_offset = self.drag.filter(|d| d.dragging).map_or(0.0, |d| d.offset);

        frame
            .node(ids::track(self.category))
            .class_if("mounted", self.mounted)
            .class_if("coverflow", matches!(effect, SlideEffect::Coverflow { .. }))
            .class_if("mobile", self.is_mobile())
            .class_if("dragging", self.is_dragging())
            .style("--slide-index", self.index.to_string())
            .style("--slides-per-view", fmt_decimal(bp.slides_per_view))
            .style("--space-between", format!("{}px", fmt_decimal(bp.space_between)))
            .style("--drag-x", format!("{}px", fmt_decimal(drag_offset)));

        frame
            .node(ids::prev_button(self.category))
            .class_if("disabled", self.index == 0);
        frame
            .node(ids::next_button(self.category))
            .class_if("disabled", self.index + 1 >= self.len);

        for (i, product) in products(self.category).iter().enumerate() {
            let offset = i as f64 - self.index as f64;
            let slide = frame
                .node(ids::slide(product.id))
                .class_if("active", i == self.index)
                .class_if("prev", i + 1 == self.index)
                .class_if("next", i == self.index + 1);
            match effect {
                SlideEffect::Coverflow { rotate, depth } => {
                    slide
                        .style(
                            "transform",
                            format!(
                                "rotateY({}deg) translateZ({}px)",
                                fmt_decimal(-offset * rotate),
                                fmt_decimal(-offset.abs() * depth)
                            ),
                        )
                        .style("z-index", format!("{}", -(offset.abs() as i64)));
                }
                SlideEffect::Slide => {
                    slide.style("transform", "none");
                }
            }

            let state = self.images[i];
            let img = frame.node(ids::image(product.id));
            match state {
                ImageState::Loading => {
                    img.style("opacity", "0");
                }
                ImageState::Loaded => {
                    img.style("opacity", "1");
                }
                ImageState::Failed => {
                    img.style("opacity", "0.5").style("filter", "grayscale(1)");
                }
            }
            frame
                .node(ids::skeleton(product.id))
                .class_if("hidden", state != ImageState::Loading);

            let distance = i.abs_diff(self.index);
            let bullet = frame
                .node(ids::bullet(self.category, i))
                .class_if("active", distance == 0)
                .class_if("hidden", distance > 2);
            if i < self.index {
                bullet
                    .class_if("active-prev", distance == 1)
                    .class_if("active-prev-prev", distance == 2);
            } else {
                bullet
                    .class_if("active-next", distance == 1)
                    .class_if("active-next-next", distance == 2);
            }
        }
    }
}

/// Share of `target`'s height that lies inside `root`'s vertical span.
fn intersection_ratio(target: Rect, root: Rect) -> f64 {
    if target.height <= 0.0 {
        return 0.0;
    }
    target.vertical_overlap(root.top(), root.bottom()) / target.height
}
