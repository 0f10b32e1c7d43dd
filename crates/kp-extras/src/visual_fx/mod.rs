#![forbid(unsafe_code)]

//! Decorative backdrop effects.
//!
//! Effects update from an [`FxContext`] once per frame and draw through a
//! [`Painter`]. Nothing here knows about the DOM.

pub mod particles;

use std::fmt;

pub use particles::{Particle, ParticleConfig, ParticleField, particle_count_for_width};

/// Colour with 8-bit channels and a fractional alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    #[must_use]
    pub const fn with_alpha(self, a: f64) -> Self {
        Self { a, ..self }
    }
}

/// CSS `rgba()` notation.
impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Fill for a circle.
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    Solid(Rgba),
    /// Radial gradient centred on the circle, from radius 0 to `radius`.
    Radial { radius: f64, stops: Vec<(f64, Rgba)> },
}

/// Drawing surface for backdrop effects.
pub trait Painter {
    fn clear(&mut self, width: f64, height: f64);
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, fill: &Fill);
    fn line(&mut self, from: (f64, f64), to: (f64, f64), color: Rgba, width: f64);
}

/// One recorded [`Painter`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear { width: f64, height: f64 },
    Circle { x: f64, y: f64, radius: f64, fill: Fill },
    Line { from: (f64, f64), to: (f64, f64), color: Rgba, width: f64 },
}

/// Painter that records calls; used by tests and headless hosts.
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub ops: Vec<DrawOp>,
}

impl DrawList {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Circle { .. }))
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Line { .. }))
    }
}

impl Painter for DrawList {
    fn clear(&mut self, width: f64, height: f64) {
        self.ops.clear();
        self.ops.push(DrawOp::Clear { width, height });
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, fill: &Fill) {
        self.ops.push(DrawOp::Circle {
            x,
            y,
            radius,
            fill: fill.clone(),
        });
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64), color: Rgba, width: f64) {
        self.ops.push(DrawOp::Line {
            from,
            to,
            color,
            width,
        });
    }
}

/// Per-frame input to an effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FxContext {
    /// Surface size in CSS pixels.
    pub width: f64,
    pub height: f64,
    /// Host time in milliseconds.
    pub time_ms: f64,
    /// Pointer in surface coordinates, if known.
    pub pointer: Option<(f64, f64)>,
}

/// A backdrop effect.
pub trait BackdropFx {
    fn name(&self) -> &'static str;

    /// Adapt to a new surface size.
    fn resize(&mut self, width: f64, height: f64);

    /// Advance one frame.
    fn update(&mut self, ctx: &FxContext);

    fn render(&self, painter: &mut dyn Painter);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rgba_formats_as_css() {
        assert_eq!(Rgba::new(255, 215, 0, 0.5).to_string(), "rgba(255, 215, 0, 0.5)");
        assert_eq!(Rgba::new(255, 140, 0, 1.0).with_alpha(0.0).to_string(), "rgba(255, 140, 0, 0)");
    }

    #[test]
    fn draw_list_clear_resets() {
        let mut list = DrawList::new();
        list.line((0.0, 0.0), (1.0, 1.0), Rgba::new(0, 0, 0, 1.0), 0.5);
        list.clear(10.0, 10.0);
        assert_eq!(list.ops, vec![DrawOp::Clear { width: 10.0, height: 10.0 }]);
        assert_eq!(list.lines().count(), 0);
    }
}
