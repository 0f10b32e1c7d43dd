#![forbid(unsafe_code)]

//! Platform-independent runner core wrapping `StepProgram<PageModel>`.
//!
//! This module contains the logic shared between the wasm-bindgen exports
//! and the native test harness. No JS/WASM types here.

use kp_catalog::SectionId;
use kp_core::{Event, KeyCode, PointerEvent, PointerKind, ScrollSample, Size, WheelEvent};
use kp_extras::visual_fx::Painter;
use kp_runtime::{DomPatch, HostEffect, StepError, StepProgram, StepResult};
use kp_widgets::layout::LayoutProvider;
use thiserror::Error;
use web_time::Duration;

use crate::config::{ConfigError, PageConfig};
use crate::page::PageModel;

/// Errors surfaced to the host.
#[derive(Debug, Error)]
pub enum RunnerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Step(#[from] StepError),
}

/// Platform-independent page runner wrapping `StepProgram<PageModel>`.
pub struct RunnerCore<L: LayoutProvider> {
    inner: StepProgram<PageModel<L>>,
    /// Runner-level log lines, drained together with the program's.
    cached_logs: Vec<String>,
}

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
impl<L: LayoutProvider> RunnerCore<L> {
    /// Create a runner with default tunables for a `width × height` viewport.
    pub fn new(layout: L, width: f64, height: f64) -> Self {
        Self::with_config(layout, width, height, PageConfig::default())
    }

    pub fn with_config(layout: L, width: f64, height: f64, config: PageConfig) -> Self {
        let model = PageModel::new(layout, Size::new(width, height), config);
        Self {
            inner: StepProgram::new(model),
            cached_logs: Vec::new(),
        }
    }

    /// Create a runner from a JSON config override document.
    pub fn from_json(layout: L, width: f64, height: f64, json: &str) -> Result<Self, RunnerError> {
        let config = PageConfig::from_json(json)?;
        Ok(Self::with_config(layout, width, height, config))
    }

    /// Initialize the model and render the first frame. Idempotent.
    pub fn init(&mut self) {
        if self.inner.is_initialized() {
            return;
        }
        if let Err(err) = self.inner.init() {
            self.cached_logs.push(format!("runner_init_error: {err}"));
        }
    }

    /// Advance the deterministic clock by `dt_ms` milliseconds.
    pub fn advance_time_ms(&mut self, dt_ms: f64) {
        // Host input can be noisy (NaN/inf/negative spikes).
        if !dt_ms.is_finite() || dt_ms <= 0.0 {
            return;
        }
        let max_secs = Duration::MAX.as_secs_f64();
        let secs = (dt_ms / 1000.0).min(max_secs);
        let duration = Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX);
        self.inner.advance_time(duration);
    }

    /// Set the deterministic clock to absolute milliseconds. Never goes
    /// backwards.
    pub fn set_time_ms(&mut self, ts_ms: f64) {
        let millis = if !ts_ms.is_finite() || ts_ms <= 0.0 {
            0
        } else {
            ts_ms.min(u64::MAX as f64) as u64
        };
        self.inner.set_time(Duration::from_millis(millis));
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.inner.now()
    }

    pub fn push_event(&mut self, event: Event) {
        self.inner.push_event(event);
    }

    pub fn scroll(&mut self, scroll_top: f64, viewport_height: f64, document_height: f64) {
        self.push_event(Event::Scroll(ScrollSample::new(
            scroll_top,
            viewport_height,
            document_height,
        )));
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.push_event(Event::Resize(Size::new(width, height)));
    }

    pub fn pointer(&mut self, kind: PointerKind, x: f64, y: f64, action: Option<&str>) {
        let mut event = PointerEvent::new(kind, x, y);
        if let Some(action) = action {
            event = event.with_action(action);
        }
        self.push_event(Event::Pointer(event));
    }

    pub fn wheel(&mut self, delta_y: f64, action: Option<&str>) {
        self.push_event(Event::Wheel(WheelEvent {
            delta_y,
            action: action.map(str::to_owned),
        }));
    }

    /// Push a key press by its `KeyboardEvent.key` name.
    pub fn key(&mut self, name: &str) {
        self.push_event(Event::Key(KeyCode::from_dom_key(name)));
    }

    pub fn click(&mut self, action: &str) {
        self.push_event(Event::Click {
            action: action.to_owned(),
        });
    }

    pub fn image_loaded(&mut self, product: &str, ok: bool) {
        self.push_event(Event::ImageLoaded {
            product: product.to_owned(),
            ok,
        });
    }

    /// Process pending events and render if dirty.
    ///
    /// A step error switches the page to its fallback screen.
    pub fn step(&mut self) -> StepResult {
        if !self.inner.is_initialized() {
            self.init();
            if !self.inner.is_initialized() {
                return StepResult {
                    frame_idx: self.inner.frame_idx(),
                    ..StepResult::default()
                };
            }
        }
        match self.inner.step() {
            Ok(result) => result,
            Err(err) => {
                self.cached_logs.push(format!("runner_step_error: {err}"));
                self.fail(&err);
                StepResult {
                    frame_idx: self.inner.frame_idx(),
                    ..StepResult::default()
                }
            }
        }
    }

    /// Switch the page to the fallback screen on the next render.
    pub fn fail(&mut self, reason: impl std::fmt::Display) {
        self.inner.model_mut().fail(reason);
    }

    pub fn take_patches(&mut self) -> Vec<DomPatch> {
        self.inner.take_patches()
    }

    /// Patches as a JSON array.
    pub fn take_patches_json(&mut self) -> String {
        let patches = self.take_patches();
        self.to_json(&patches, "patches")
    }

    pub fn take_effects(&mut self) -> Vec<HostEffect> {
        self.inner.take_effects()
    }

    /// Host effects as a JSON array.
    pub fn take_effects_json(&mut self) -> String {
        let effects = self.take_effects();
        self.to_json(&effects, "effects")
    }

    fn to_json<T: serde::Serialize>(&mut self, value: &[T], what: &str) -> String {
        match serde_json::to_string(value) {
            Ok(json) => json,
            Err(err) => {
                self.cached_logs.push(format!("runner_json_error: {what}: {err}"));
                "[]".to_owned()
            }
        }
    }

    /// Take accumulated log lines.
    pub fn take_logs(&mut self) -> Vec<String> {
        let mut logs = std::mem::take(&mut self.cached_logs);
        logs.append(&mut self.inner.take_logs());
        logs
    }

    #[must_use]
    pub fn active_section(&self) -> SectionId {
        self.inner.model().active_section()
    }

    /// Whether the host should stop the document from scrolling and keep
    /// wheel input for the page.
    #[must_use]
    pub fn locks_scroll(&self) -> bool {
        self.inner.model().lightbox().is_open()
    }

    pub fn render_particles(&self, painter: &mut dyn Painter) {
        self.inner.model().render_particles(painter);
    }

    #[must_use]
    pub fn page(&self) -> &PageModel<L> {
        self.inner.model()
    }

    /// Mutable access to the page. Forces a re-render on the next step.
    pub fn page_mut(&mut self) -> &mut PageModel<L> {
        self.inner.model_mut()
    }

    #[must_use]
    pub fn frame_idx(&self) -> u64 {
        self.inner.frame_idx()
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.inner.is_initialized()
    }
}
