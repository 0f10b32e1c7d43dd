#![forbid(unsafe_code)]

//! Time-based transitions.
//!
//! Only what the page needs: a [`Fade`] that moves an opacity value toward
//! shown or hidden over a fixed duration, and a few easing curves.

use web_time::Duration;

/// Easing curve mapping linear progress `t ∈ [0, 1]` to eased progress.
pub type EasingFn = fn(f32) -> f32;

/// Identity easing.
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Cubic ease-out: fast start, gentle settle.
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    let inv = 1.0 - t;
    1.0 - inv * inv * inv
}

/// Symmetric cubic ease-in-out.
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let f = -2.0 * t + 2.0;
        1.0 - f * f * f / 2.0
    }
}

/// Direction a [`Fade`] is heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    In,
    Out,
}

/// Opacity transition toward fully shown (`In`) or hidden (`Out`).
///
/// Reversing mid-flight continues from the current progress instead of
/// jumping, so rapid open/close never pops.
#[derive(Debug, Clone)]
pub struct Fade {
    duration: Duration,
    /// Linear progress toward "shown", in `[0, 1]`.
    progress: f32,
    direction: FadeDirection,
    easing: EasingFn,
}

impl Fade {
    /// A fade that starts hidden.
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            progress: 0.0,
            direction: FadeDirection::Out,
            easing: ease_out_cubic,
        }
    }

    /// Replace the easing curve.
    #[must_use]
    pub fn with_easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    pub fn fade_in(&mut self) {
        self.direction = FadeDirection::In;
    }

    pub fn fade_out(&mut self) {
        self.direction = FadeDirection::Out;
    }

    /// Jump to fully shown or fully hidden.
    pub fn snap(&mut self, shown: bool) {
        self.progress = if shown { 1.0 } else { 0.0 };
        self.direction = if shown {
            FadeDirection::In
        } else {
            FadeDirection::Out
        };
    }

    /// Advance by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        if self.duration.is_zero() {
            self.snap(self.direction == FadeDirection::In);
            return;
        }
        let step = (dt.as_secs_f64() / self.duration.as_secs_f64()) as f32;
        self.progress = match self.direction {
            FadeDirection::In => (self.progress + step).min(1.0),
            FadeDirection::Out => (self.progress - step).max(0.0),
        };
    }

    /// Eased opacity in `[0, 1]`.
    #[must_use]
    pub fn value(&self) -> f32 {
        (self.easing)(self.progress)
    }

    #[must_use]
    pub const fn direction(&self) -> FadeDirection {
        self.direction
    }

    /// True once the fade has reached its destination.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        match self.direction {
            FadeDirection::In => self.progress >= 1.0,
            FadeDirection::Out => self.progress <= 0.0,
        }
    }

    /// Anything visible at all.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.progress > 0.0
    }
}
