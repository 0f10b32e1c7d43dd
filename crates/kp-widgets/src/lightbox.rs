#![forbid(unsafe_code)]

//! Full-screen product viewer.
//!
//! Opens over one category's products at a given slide. Navigation wraps
//! around, zoom is clamped to `[1, max_zoom]` and resets whenever the slide
//! changes, and a downward pull on the unzoomed image closes it.

use kp_catalog::{Category, Product, products};
use kp_core::{Fade, KeyCode};
use kp_runtime::Frame;
use serde::{Deserialize, Serialize};
use tracing::debug;
use web_time::Duration;

use crate::navigation::fmt_decimal;

/// Element ids written by [`Lightbox::view`].
pub mod ids {
    pub const ROOT: &str = "lightbox";
    pub const IMAGE: &str = "lightbox-image";
    pub const CAPTION: &str = "lightbox-caption";
    pub const CODE: &str = "lightbox-code";
    pub const COUNTER: &str = "lightbox-counter";
    pub const ZOOM_IN: &str = "lightbox-zoom-in";
    pub const ZOOM_OUT: &str = "lightbox-zoom-out";
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LightboxConfig {
    pub fade_ms: u64,
    pub max_zoom: f64,
    /// Zoom change per button press or key.
    pub zoom_step: f64,
    /// Zoom change per wheel pixel.
    pub wheel_zoom_factor: f64,
    /// Downward pull that closes the viewer.
    pub pull_close_distance: f64,
}

impl Default for LightboxConfig {
    fn default() -> Self {
        Self {
            fade_ms: 300,
            max_zoom: 5.0,
            zoom_step: 0.5,
            wheel_zoom_factor: 0.01,
            pull_close_distance: 80.0,
        }
    }
}

impl LightboxConfig {
    #[must_use]
    pub fn with_max_zoom(mut self, max_zoom: f64) -> Self {
        self.max_zoom = max_zoom.max(1.0);
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct Pull {
    start_y: f64,
    offset: f64,
}

#[derive(Debug, Clone)]
pub struct Lightbox {
    config: LightboxConfig,
    /// Category and slide being shown. Kept while fading out.
    target: Option<(Category, usize)>,
    open: bool,
    zoom: f64,
    fade: Fade,
    pull: Option<Pull>,
}

impl Lightbox {
    #[must_use]
    pub fn new(config: LightboxConfig) -> Self {
        Self {
            fade: Fade::new(Duration::from_millis(config.fade_ms)),
            config,
            target: None,
            open: false,
            zoom: 1.0,
            pull: None,
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn category(&self) -> Option<Category> {
        self.target.map(|(c, _)| c)
    }

    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.target.map(|(_, i)| i)
    }

    #[must_use]
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Product currently shown.
    #[must_use]
    pub fn product(&self) -> Option<&'static Product> {
        let (category, index) = self.target?;
        products(category).get(index)
    }

    /// Current opacity.
    #[must_use]
    pub fn opacity(&self) -> f32 {
        self.fade.value()
    }

    /// Open at `index` within `category`. Out-of-range indices are ignored.
    pub fn open(&mut self, category: Category, index: usize) -> bool {
        if index >= products(category).len() {
            return false;
        }
        debug!(section = category.section().as_str(), index, "lightbox open");
        self.target = Some((category, index));
        self.open = true;
        self.zoom = 1.0;
        self.pull = None;
        self.fade.fade_in();
        true
    }

    pub fn close(&mut self) {
        if self.open {
            debug!("lightbox close");
            self.open = false;
            self.pull = None;
            self.fade.fade_out();
        }
    }

    fn step(&mut self, forward: bool) -> bool {
        let Some((category, index)) = self.target.filter(|_| self.open) else {
            return false;
        };
        let len = products(category).len();
        if len < 2 {
            return false;
        }
        let index = if forward {
            (index + 1) % len
        } else {
            (index + len - 1) % len
        };
        self.target = Some((category, index));
        self.zoom = 1.0;
        true
    }

    /// Next product, wrapping to the first.
    pub fn next(&mut self) -> bool {
        self.step(true)
    }

    /// Previous product, wrapping to the last.
    pub fn prev(&mut self) -> bool {
        self.step(false)
    }

    fn set_zoom(&mut self, zoom: f64) -> bool {
        if !self.open || !zoom.is_finite() {
            return false;
        }
        let zoom = zoom.clamp(1.0, self.config.max_zoom);
        let changed = (zoom - self.zoom).abs() > f64::EPSILON;
        self.zoom = zoom;
        changed
    }

    pub fn zoom_in(&mut self) -> bool {
        self.set_zoom(self.zoom + self.config.zoom_step)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.set_zoom(self.zoom - self.config.zoom_step)
    }

    /// Wheel zoom: scrolling up zooms in.
    pub fn wheel(&mut self, delta_y: f64) -> bool {
        self.set_zoom(self.zoom - delta_y * self.config.wheel_zoom_factor)
    }

    /// Keyboard handling while open. Returns `true` if the key was consumed.
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        if !self.open {
            return false;
        }
        match key {
            KeyCode::Escape => {
                self.close();
                true
            }
            KeyCode::ArrowLeft => self.prev(),
            KeyCode::ArrowRight => self.next(),
            KeyCode::Plus => self.zoom_in(),
            KeyCode::Minus => self.zoom_out(),
            _ => false,
        }
    }

    /// Start a pull gesture. Only the unzoomed image can be pulled.
    pub fn pointer_down(&mut self, y: f64) {
        if self.open && self.zoom <= 1.0 {
            self.pull = Some(Pull {
                start_y: y,
                offset: 0.0,
            });
        }
    }

    pub fn pointer_move(&mut self, y: f64) {
        if let Some(pull) = &mut self.pull {
            pull.offset = (y - pull.start_y).max(0.0);
        }
    }

    /// Finish a pull gesture. Returns `true` if it closed the viewer.
    pub fn pointer_up(&mut self, y: f64) -> bool {
        self.pointer_move(y);
        let Some(pull) = self.pull.take() else {
            return false;
        };
        if pull.offset > self.config.pull_close_distance {
            self.close();
            return true;
        }
        false
    }

    /// Advance the fade. Returns `true` while the fade is still moving.
    pub fn tick(&mut self, dt: Duration) -> bool {
        if self.fade.is_complete() {
            return false;
        }
        self.fade.tick(dt);
        if !self.open && self.fade.is_complete() {
            self.target = None;
        }
        true
    }

    pub fn view(&self, frame: &mut Frame) {
        let visible = self.fade.is_visible() || self.open;
        frame
            .node(ids::ROOT)
            .class_if("open", self.open)
            .attr("aria-hidden", if self.open { "false" } else { "true" })
            .style("display", if visible { "flex" } else { "none" })
            .style("opacity", fmt_decimal(f64::from(self.fade.value())));

        let pull = self.pull.map_or(0.0, |p| p.offset);
        frame.node(ids::IMAGE).style(
            "transform",
            format!("translateY({}px) scale({})", fmt_decimal(pull), fmt_decimal(self.zoom)),
        );
        frame
            .node(ids::ZOOM_IN)
            .class_if("disabled", self.zoom >= self.config.max_zoom);
        frame.node(ids::ZOOM_OUT).class_if("disabled", self.zoom <= 1.0);

        if let (Some((category, index)), Some(product)) = (self.target, self.product()) {
            frame
                .node(ids::IMAGE)
                .attr("src", product.image)
                .attr("alt", product.name);
            frame.node(ids::CAPTION).text(product.name);
            frame.node(ids::CODE).text(product.code);
            frame
                .node(ids::COUNTER)
                .text(format!("{} / {}", index + 1, products(category).len()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opened(category: Category, index: usize) -> Lightbox {
        let mut lb = Lightbox::new(LightboxConfig::default());
        assert!(lb.open(category, index));
        lb
    }

    #[test]
    fn navigation_wraps_around() {
        let mut lb = opened(Category::X12, 3);
        assert!(lb.next());
        assert_eq!(lb.index(), Some(0));
        assert!(lb.prev());
        assert_eq!(lb.index(), Some(3));
    }

    #[test]
    fn zoom_is_clamped_and_resets_on_slide_change() {
        let mut lb = opened(Category::Cm9, 0);
        for _ in 0..20 {
            lb.zoom_in();
        }
        assert_eq!(lb.zoom(), 5.0);
        assert!(!lb.zoom_in());
        lb.next();
        assert_eq!(lb.zoom(), 1.0);
        assert!(!lb.zoom_out());
    }

    #[test]
    fn lower_zoom_ceiling_disables_zoom_in() {
        let mut lb = Lightbox::new(LightboxConfig::default().with_max_zoom(2.0));
        assert!(lb.open(Category::Cm16, 0));
        while lb.zoom_in() {}
        assert_eq!(lb.zoom(), 2.0);
        let mut frame = Frame::new();
        lb.view(&mut frame);
        assert!(frame.has_class(ids::ZOOM_IN, "disabled"));

        let mut flat = Lightbox::new(LightboxConfig::default().with_max_zoom(0.5));
        assert!(flat.open(Category::Cm16, 0));
        assert!(!flat.zoom_in());
        assert_eq!(flat.zoom(), 1.0);
    }

    #[test]
    fn wheel_up_zooms_in() {
        let mut lb = opened(Category::Cm9, 0);
        assert!(lb.wheel(-100.0));
        assert!((lb.zoom() - 2.0).abs() < 1e-9);
        assert!(lb.wheel(1000.0));
        assert_eq!(lb.zoom(), 1.0);
    }

    #[test]
    fn escape_closes_and_fade_clears_target() {
        let mut lb = opened(Category::Cm18, 1);
        assert!(lb.tick(Duration::from_millis(300)));
        assert_eq!(lb.opacity(), 1.0);
        assert!(lb.handle_key(KeyCode::Escape));
        assert!(!lb.is_open());
        assert_eq!(lb.category(), Some(Category::Cm18));
        lb.tick(Duration::from_millis(300));
        assert_eq!(lb.category(), None);
        assert!(!lb.tick(Duration::from_millis(16)));
    }

    #[test]
    fn pull_down_closes_only_past_distance() {
        let mut lb = opened(Category::Cm9, 0);
        lb.pointer_down(100.0);
        assert!(!lb.pointer_up(170.0));
        assert!(lb.is_open());
        lb.pointer_down(100.0);
        lb.pointer_move(150.0);
        assert!(lb.pointer_up(190.0));
        assert!(!lb.is_open());
    }

    #[test]
    fn zoomed_image_does_not_pull() {
        let mut lb = opened(Category::Cm9, 0);
        lb.zoom_in();
        lb.pointer_down(0.0);
        assert!(!lb.pointer_up(500.0));
        assert!(lb.is_open());
    }

    #[test]
    fn open_rejects_out_of_range() {
        let mut lb = Lightbox::new(LightboxConfig::default());
        assert!(!lb.open(Category::X12, 4));
        assert!(!lb.is_open());
    }

    #[test]
    fn view_shows_product_and_counter() {
        let lb = opened(Category::Cm12, 2);
        let mut frame = Frame::new();
        lb.view(&mut frame);
        assert!(frame.has_class(ids::ROOT, "open"));
        assert_eq!(frame.attr(ids::IMAGE, "src"), Some("/12/photo_3_2025-07-30_13-43-04.webp"));
        assert_eq!(frame.text(ids::CODE), Some("12-103"));
        assert_eq!(frame.text(ids::COUNTER), Some("3 / 6"));
        assert_eq!(frame.style(ids::IMAGE, "transform"), Some("translateY(0px) scale(1)"));
        assert!(frame.has_class(ids::ZOOM_OUT, "disabled"));
    }
}
