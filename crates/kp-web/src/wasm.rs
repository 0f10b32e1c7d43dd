#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for the CatalogRunner.
//!
//! This module wraps [`super::runner_core::RunnerCore`] with JS-friendly types,
//! reads layout from the live DOM and applies patches back to it.
//! Only compiled on `wasm32` targets.

use std::f64::consts::TAU;

use js_sys::{Array, Object, Reflect};
use kp_catalog::SectionId;
use kp_core::{PointerKind, Rect, ScrollSample};
use kp_extras::visual_fx::{Fill, Painter, Rgba};
use kp_runtime::{DomPatch, HostEffect};
use kp_widgets::error_boundary;
use kp_widgets::layout::LayoutProvider;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlElement, Window};

use super::markup;
use super::runner_core::RunnerCore;

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

fn set_display(document: &Document, id: &str, value: &str) {
    if let Some(el) = document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    {
        let _ = el.style().set_property("display", value);
    }
}

/// Swap the app shell for the fallback screen without going through the
/// model, which may be mid-panic.
fn reveal_fallback() {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    set_display(&document, error_boundary::ids::APP, "none");
    set_display(&document, error_boundary::ids::FALLBACK, "flex");
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            console_error(&msg);
            reveal_fallback();
        }));
    });
}

fn set_js(obj: &Object, key: &str, value: JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), &value);
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Layout read live from the browser.
pub struct DomLayout {
    window: Window,
    document: Document,
}

impl DomLayout {
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| js_error("no window"))?;
        let document = window.document().ok_or_else(|| js_error("no document"))?;
        Ok(Self { window, document })
    }

    fn element(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }
}

impl LayoutProvider for DomLayout {
    fn scroll(&self) -> ScrollSample {
        let scroll_top = self.window.scroll_y().unwrap_or(0.0);
        let viewport_height = self
            .window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let document_height = self
            .document
            .document_element()
            .map_or(0.0, |el| f64::from(el.scroll_height()));
        ScrollSample::new(scroll_top, viewport_height, document_height)
    }

    fn bounds_of(&self, section: SectionId) -> Option<Rect> {
        let rect = self.element(section.as_str())?.get_bounding_client_rect();
        Some(Rect::new(rect.left(), rect.top(), rect.width(), rect.height()))
    }
}

/// [`Painter`] over a 2D canvas context.
struct CanvasPainter<'a> {
    ctx: &'a CanvasRenderingContext2d,
}

impl Painter for CanvasPainter<'_> {
    fn clear(&mut self, width: f64, height: f64) {
        self.ctx.clear_rect(0.0, 0.0, width, height);
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64, fill: &Fill) {
        self.ctx.begin_path();
        if self.ctx.arc(x, y, radius.max(0.0), 0.0, TAU).is_err() {
            return;
        }
        match fill {
            Fill::Solid(color) => self.ctx.set_fill_style_str(&color.to_string()),
            Fill::Radial { radius, stops } => {
                let Ok(gradient) = self.ctx.create_radial_gradient(x, y, 0.0, x, y, radius.max(0.0))
                else {
                    return;
                };
                for (offset, color) in stops {
                    let _ = gradient.add_color_stop(*offset as f32, &color.to_string());
                }
                self.ctx.set_fill_style_canvas_gradient(&gradient);
            }
        }
        self.ctx.fill();
    }

    fn line(&mut self, from: (f64, f64), to: (f64, f64), color: Rgba, width: f64) {
        self.ctx.begin_path();
        self.ctx.move_to(from.0, from.1);
        self.ctx.line_to(to.0, to.1);
        self.ctx.set_stroke_style_str(&color.to_string());
        self.ctx.set_line_width(width);
        self.ctx.stroke();
    }
}

fn apply_patch(document: &Document, patch: &DomPatch) -> bool {
    let Some(el) = document.get_element_by_id(patch.id()) else {
        return false;
    };
    let result = match patch {
        DomPatch::AddClass { class, .. } => el.class_list().add_1(class),
        DomPatch::RemoveClass { class, .. } => el.class_list().remove_1(class),
        DomPatch::SetAttr { name, value, .. } => el.set_attribute(name, value),
        DomPatch::RemoveAttr { name, .. } => el.remove_attribute(name),
        DomPatch::SetStyle { name, value, .. } => match el.dyn_ref::<HtmlElement>() {
            Some(html) => html.style().set_property(name, value),
            None => el.set_attribute(name, value),
        },
        DomPatch::RemoveStyle { name, .. } => match el.dyn_ref::<HtmlElement>() {
            Some(html) => html.style().remove_property(name).map(drop),
            None => el.remove_attribute(name),
        },
        DomPatch::SetText { text, .. } => {
            el.set_text_content(Some(text));
            Ok(())
        }
    };
    result.is_ok()
}

/// Catalog page runner for the browser.
///
/// Host-driven: JavaScript owns the `requestAnimationFrame` loop, forwards
/// DOM events, advances time, steps, then applies patches and effects.
#[wasm_bindgen]
pub struct CatalogRunner {
    inner: RunnerCore<DomLayout>,
    document: Document,
    canvas: Option<HtmlCanvasElement>,
    ctx: Option<CanvasRenderingContext2d>,
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

impl CatalogRunner {
    fn from_core(inner: RunnerCore<DomLayout>) -> Result<Self, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| js_error("no document"))?;
        Ok(Self {
            inner,
            document,
            canvas: None,
            ctx: None,
        })
    }

    fn size_canvas(&self, width: f64, height: f64) {
        if let Some(canvas) = &self.canvas {
            canvas.set_width(width.max(0.0) as u32);
            canvas.set_height(height.max(0.0) as u32);
        }
    }
}

#[wasm_bindgen]
impl CatalogRunner {
    /// Create a runner for a `width × height` viewport with default tunables.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Result<CatalogRunner, JsValue> {
        install_panic_hook();
        Self::from_core(RunnerCore::new(DomLayout::new()?, width, height))
    }

    /// Create a runner with a JSON override of the page config.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(width: f64, height: f64, json: &str) -> Result<CatalogRunner, JsValue> {
        install_panic_hook();
        let core = RunnerCore::from_json(DomLayout::new()?, width, height, json).map_err(js_error)?;
        Self::from_core(core)
    }

    /// Render the page markup into the element `root_id` and bind the
    /// particle canvas.
    pub fn mount(&mut self, root_id: &str) -> Result<(), JsValue> {
        let root = self
            .document
            .get_element_by_id(root_id)
            .ok_or_else(|| js_error(format!("mount root `{root_id}` not found")))?;
        root.set_inner_html(&markup::render_page());

        let canvas = self
            .document
            .get_element_by_id(markup::ids::CANVAS)
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok());
        self.ctx = canvas
            .as_ref()
            .and_then(|c| c.get_context("2d").ok().flatten())
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok());
        self.canvas = canvas;
        let viewport = self.inner.page().viewport();
        self.size_canvas(viewport.width, viewport.height);
        Ok(())
    }

    /// Initialize the model and render the first frame.
    pub fn init(&mut self) {
        self.inner.init();
    }

    /// Advance the deterministic clock by `dt_ms` milliseconds.
    #[wasm_bindgen(js_name = advanceTime)]
    pub fn advance_time(&mut self, dt_ms: f64) {
        self.inner.advance_time_ms(dt_ms);
    }

    /// Set the deterministic clock to absolute milliseconds.
    #[wasm_bindgen(js_name = setTime)]
    pub fn set_time(&mut self, ts_ms: f64) {
        self.inner.set_time_ms(ts_ms);
    }

    pub fn scroll(&mut self, scroll_top: f64, viewport_height: f64, document_height: f64) {
        self.inner.scroll(scroll_top, viewport_height, document_height);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.size_canvas(width, height);
        self.inner.resize(width, height);
    }

    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64, action: Option<String>) {
        self.inner.pointer(PointerKind::Move, x, y, action.as_deref());
    }

    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f64, y: f64, action: Option<String>) {
        self.inner.pointer(PointerKind::Down, x, y, action.as_deref());
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self, x: f64, y: f64, action: Option<String>) {
        self.inner.pointer(PointerKind::Up, x, y, action.as_deref());
    }

    #[wasm_bindgen(js_name = pointerEnter)]
    pub fn pointer_enter(&mut self, action: &str) {
        self.inner.pointer(PointerKind::Enter, 0.0, 0.0, Some(action));
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self, action: &str) {
        self.inner.pointer(PointerKind::Leave, 0.0, 0.0, Some(action));
    }

    pub fn wheel(&mut self, delta_y: f64, action: Option<String>) {
        self.inner.wheel(delta_y, action.as_deref());
    }

    /// Push a key press by `KeyboardEvent.key`.
    pub fn key(&mut self, name: &str) {
        self.inner.key(name);
    }

    /// An element carrying `data-action` was clicked.
    pub fn click(&mut self, action: &str) {
        self.inner.click(action);
    }

    #[wasm_bindgen(js_name = imageLoaded)]
    pub fn image_loaded(&mut self, product_id: &str, ok: bool) {
        self.inner.image_loaded(product_id, ok);
    }

    /// Process pending events and render if dirty.
    /// Returns `{ events_processed, ticked, rendered, frame_idx }`.
    pub fn step(&mut self) -> JsValue {
        let result = self.inner.step();
        let obj = Object::new();
        set_js(&obj, "events_processed", result.events_processed.into());
        set_js(&obj, "ticked", result.ticked.into());
        set_js(&obj, "rendered", result.rendered.into());
        set_js(&obj, "frame_idx", JsValue::from_f64(result.frame_idx as f64));
        obj.into()
    }

    /// Apply pending DOM patches directly. Returns the number applied.
    #[wasm_bindgen(js_name = applyPatches)]
    pub fn apply_patches(&mut self) -> u32 {
        let patches = self.inner.take_patches();
        let applied = patches
            .iter()
            .filter(|patch| apply_patch(&self.document, patch))
            .count();
        u32::try_from(applied).unwrap_or(u32::MAX)
    }

    /// Drain pending DOM patches as a JSON array.
    #[wasm_bindgen(js_name = takePatches)]
    pub fn take_patches(&mut self) -> String {
        self.inner.take_patches_json()
    }

    /// Drain host effects as a JSON array:
    /// `[{"kind":"scrollTo","top":0,"smooth":true}, …]`.
    #[wasm_bindgen(js_name = takeEffects)]
    pub fn take_effects(&mut self) -> String {
        self.inner.take_effects_json()
    }

    /// Perform pending host effects directly. Returns the number performed.
    #[wasm_bindgen(js_name = applyEffects)]
    pub fn apply_effects(&mut self) -> u32 {
        let Some(window) = web_sys::window() else {
            return 0;
        };
        let mut performed = 0u32;
        for effect in self.inner.take_effects() {
            let behavior = |smooth: bool| if smooth { "smooth" } else { "auto" };
            let ok = match effect {
                HostEffect::ScrollTo { top, smooth } => {
                    let options = Object::new();
                    set_js(&options, "top", JsValue::from_f64(top));
                    set_js(&options, "behavior", JsValue::from_str(behavior(smooth)));
                    Reflect::get(&window, &"scrollTo".into())
                        .ok()
                        .and_then(|f| f.dyn_into::<js_sys::Function>().ok())
                        .is_some_and(|f| f.call1(&window, &options).is_ok())
                }
                HostEffect::ScrollIntoView { element_id, smooth } => {
                    let options = Object::new();
                    set_js(&options, "behavior", JsValue::from_str(behavior(smooth)));
                    self.document
                        .get_element_by_id(&element_id)
                        .and_then(|el| Reflect::get(&el, &"scrollIntoView".into()).ok().map(|f| (el, f)))
                        .and_then(|(el, f)| f.dyn_into::<js_sys::Function>().ok().map(|f| (el, f)))
                        .is_some_and(|(el, f)| f.call1(&el, &options).is_ok())
                }
                HostEffect::Reload => window.location().reload().is_ok(),
            };
            if ok {
                performed += 1;
            } else {
                console_error("host effect failed");
            }
        }
        performed
    }

    /// Drain accumulated log lines. Returns `Array<string>`.
    #[wasm_bindgen(js_name = takeLogs)]
    pub fn take_logs(&mut self) -> Array {
        let logs = self.inner.take_logs();
        let arr = Array::new();
        for log in logs {
            arr.push(&JsValue::from_str(&log));
        }
        arr
    }

    /// Draw the particle field onto the mounted canvas.
    #[wasm_bindgen(js_name = drawParticles)]
    pub fn draw_particles(&self) {
        if let Some(ctx) = &self.ctx {
            self.inner.render_particles(&mut CanvasPainter { ctx });
        }
    }

    /// DOM id of the active section.
    #[wasm_bindgen(js_name = activeSection)]
    pub fn active_section(&self) -> String {
        self.inner.active_section().as_str().to_owned()
    }

    /// Whether the document scroll should be locked (lightbox open).
    #[wasm_bindgen(js_name = locksScroll)]
    pub fn locks_scroll(&self) -> bool {
        self.inner.locks_scroll()
    }

    /// Current frame index (monotonic).
    #[wasm_bindgen(js_name = frameIdx)]
    pub fn frame_idx(&self) -> u64 {
        self.inner.frame_idx()
    }
}
