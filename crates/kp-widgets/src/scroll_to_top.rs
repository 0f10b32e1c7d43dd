#![forbid(unsafe_code)]

//! Floating "back to top" button with a circular reading-progress ring.

use std::f64::consts::PI;

use kp_core::ScrollSample;
use kp_runtime::{Frame, HostEffect};
use serde::{Deserialize, Serialize};

use crate::navigation::fmt_decimal;

/// Element ids written by [`ScrollToTop::view`].
pub mod ids {
    pub const BUTTON: &str = "scroll-top";
    pub const RING: &str = "scroll-top-ring";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrollToTopConfig {
    /// Scroll offset past which the button shows.
    pub show_after: f64,
    pub ring_radius: f64,
}

impl Default for ScrollToTopConfig {
    fn default() -> Self {
        Self {
            show_after: 300.0,
            ring_radius: 20.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScrollToTop {
    config: ScrollToTopConfig,
    visible: bool,
    progress: f64,
}

impl ScrollToTop {
    #[must_use]
    pub fn new(config: ScrollToTopConfig) -> Self {
        Self {
            config,
            visible: false,
            progress: 0.0,
        }
    }

    /// Update from a scroll sample. Returns `true` if anything changed.
    pub fn on_scroll(&mut self, sample: ScrollSample) -> bool {
        let sample = sample.sanitized();
        let visible = sample.scroll_top > self.config.show_after;
        let progress = scroll_progress(sample);
        let changed = visible != self.visible || (progress - self.progress).abs() > f64::EPSILON;
        self.visible = visible;
        self.progress = progress;
        changed
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Reading progress in percent.
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    #[must_use]
    pub fn circumference(&self) -> f64 {
        2.0 * PI * self.config.ring_radius
    }

    #[must_use]
    pub fn dash_offset(&self) -> f64 {
        self.circumference() * (1.0 - self.progress / 100.0)
    }

    /// The scroll the button asks for when clicked.
    #[must_use]
    pub fn click(&self) -> HostEffect {
        HostEffect::ScrollTo {
            top: 0.0,
            smooth: true,
        }
    }

    pub fn view(&self, frame: &mut Frame) {
        frame
            .node(ids::BUTTON)
            .class_if("visible", self.visible)
            .attr("aria-hidden", if self.visible { "false" } else { "true" });
        frame
            .node(ids::RING)
            .attr("stroke-dasharray", fmt_decimal(self.circumference()))
            .attr("stroke-dashoffset", fmt_decimal(self.dash_offset()));
    }
}

/// Percent of the scrollable distance covered, clamped to `[0, 100]`.
#[must_use]
pub fn scroll_progress(sample: ScrollSample) -> f64 {
    let max = sample.max_scroll();
    if max <= 0.0 {
        return 0.0;
    }
    (sample.scroll_top / max * 100.0).clamp(0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shows_after_threshold() {
        let mut b = ScrollToTop::new(ScrollToTopConfig::default());
        b.on_scroll(ScrollSample::new(300.0, 800.0, 4800.0));
        assert!(!b.is_visible());
        assert!(b.on_scroll(ScrollSample::new(301.0, 800.0, 4800.0)));
        assert!(b.is_visible());
    }

    #[test]
    fn progress_is_share_of_scrollable_distance() {
        assert_eq!(scroll_progress(ScrollSample::new(2000.0, 800.0, 4800.0)), 50.0);
        assert_eq!(scroll_progress(ScrollSample::new(9000.0, 800.0, 4800.0)), 100.0);
        assert_eq!(scroll_progress(ScrollSample::new(100.0, 800.0, 600.0)), 0.0);
    }

    #[test]
    fn ring_offset_tracks_progress() {
        let mut b = ScrollToTop::new(ScrollToTopConfig::default());
        let c = b.circumference();
        assert!((c - 125.663_706).abs() < 1e-5);
        assert!((b.dash_offset() - c).abs() < 1e-9);
        b.on_scroll(ScrollSample::new(4000.0, 800.0, 4800.0));
        assert!(b.dash_offset().abs() < 1e-9);

        let mut frame = Frame::new();
        b.view(&mut frame);
        assert_eq!(frame.attr(ids::RING, "stroke-dasharray"), Some("125.66"));
        assert_eq!(frame.attr(ids::RING, "stroke-dashoffset"), Some("0"));
        assert!(frame.has_class(ids::BUTTON, "visible"));
    }

    #[test]
    fn click_scrolls_to_top() {
        let b = ScrollToTop::default();
        assert_eq!(
            b.click(),
            HostEffect::ScrollTo {
                top: 0.0,
                smooth: true
            }
        );
    }
}
