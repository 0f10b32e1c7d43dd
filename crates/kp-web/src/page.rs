#![forbid(unsafe_code)]

//! The catalog page model.
//!
//! [`PageModel`] owns every widget on the page and routes host events to
//! them. It never touches the DOM: geometry comes from a
//! [`LayoutProvider`], output goes into a [`Frame`] and host effects.
//!
//! # Event routing
//!
//! | Event            | Receivers                                                |
//! |------------------|----------------------------------------------------------|
//! | scroll           | tracker (debounced), scroll-to-top, carousel visibility |
//! | resize           | navigation layout, carousels, particles, tracker        |
//! | key              | lightbox when open, else the carousels in view          |
//! | pointer / wheel  | lightbox when open, else the carousel under the pointer |
//! | tick             | tracker poll, carousel timers, lightbox fade, particles |
//!
//! The active section lives in an [`Observable`] shared with the tracker.
//! The page subscribes to it and forwards every change to the host log.

use std::cell::RefCell;
use std::fmt::Display;
use std::rc::Rc;

use kp_catalog::{Category, SectionId, find_product};
use kp_core::{Event, KeyCode, PointerEvent, PointerKind, Rect, ScrollSample, Size, WheelEvent};
use kp_extras::visual_fx::{BackdropFx, FxContext, Painter, ParticleField};
use kp_runtime::{Cmd, Frame, HostEffect, Model, Observable, Subscription};
use kp_widgets::layout::LayoutProvider;
use kp_widgets::{
    ActiveSectionTracker, Carousel, ErrorBoundary, Lightbox, Navigation, PointerOutcome, ScrollToTop,
    error_boundary,
};
use thiserror::Error;
use tracing::{debug, trace, warn};
use web_time::Duration;

use crate::action::{Action, ActionParseError};
use crate::config::PageConfig;

/// Page-level failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("page markup is not mounted: no section is rendered")]
    NotMounted,
    #[error("unknown product `{0}`")]
    UnknownProduct(String),
    #[error("invalid action: {0}")]
    Action(#[from] ActionParseError),
}

/// Messages understood by [`PageModel`].
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    Scroll(ScrollSample),
    Resize(Size),
    Pointer(PointerEvent),
    Wheel(WheelEvent),
    Key(KeyCode),
    Action(Action),
    InvalidAction { raw: String, error: ActionParseError },
    ImageLoaded { product: String, ok: bool },
    Tick,
}

impl From<Event> for Msg {
    fn from(event: Event) -> Self {
        match event {
            Event::Scroll(sample) => Msg::Scroll(sample),
            Event::Resize(size) => Msg::Resize(size),
            Event::Pointer(pointer) => Msg::Pointer(pointer),
            Event::Wheel(wheel) => Msg::Wheel(wheel),
            Event::Key(key) => Msg::Key(key),
            Event::Click { action } => match action.parse() {
                Ok(action) => Msg::Action(action),
                Err(error) => Msg::InvalidAction { raw: action, error },
            },
            Event::ImageLoaded { product, ok } => Msg::ImageLoaded { product, ok },
            Event::Tick => Msg::Tick,
        }
    }
}

/// The whole catalog page.
pub struct PageModel<L> {
    config: PageConfig,
    layout: L,
    tracker: ActiveSectionTracker,
    navigation: Navigation,
    /// One per category, in [`Category::ALL`] order.
    carousels: Vec<Carousel>,
    lightbox: Lightbox,
    scroll_to_top: ScrollToTop,
    particles: ParticleField,
    boundary: ErrorBoundary,
    viewport: Size,
    /// Last known pointer position in viewport coordinates.
    pointer: Option<(f64, f64)>,
    last_tick: Duration,
    active_changes: Rc<RefCell<Vec<SectionId>>>,
    _active_subscription: Subscription,
}

impl<L: LayoutProvider> PageModel<L> {
    /// Build the page for a `viewport`-sized window.
    #[must_use]
    pub fn new(layout: L, viewport: Size, config: PageConfig) -> Self {
        let active = Observable::new(SectionId::Hero);
        let active_changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&active_changes);
        let subscription = active.subscribe(move |section: &SectionId| sink.borrow_mut().push(*section));

        let carousels = Category::ALL
            .into_iter()
            .map(|c| Carousel::new(c, config.carousel.clone(), viewport.width))
            .collect();
        Self {
            tracker: ActiveSectionTracker::new(active, config.scroll_spy.clone()),
            navigation: Navigation::new(config.navigation.clone(), viewport.width),
            carousels,
            lightbox: Lightbox::new(config.lightbox.clone()),
            scroll_to_top: ScrollToTop::new(config.scroll_to_top.clone()),
            particles: ParticleField::new(
                config.particles.clone(),
                config.particle_seed,
                viewport.width,
                viewport.height,
            ),
            boundary: ErrorBoundary::new(),
            config,
            layout,
            viewport,
            pointer: None,
            last_tick: Duration::ZERO,
            active_changes,
            _active_subscription: subscription,
        }
    }

    #[must_use]
    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    #[must_use]
    pub fn layout(&self) -> &L {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut L {
        &mut self.layout
    }

    #[must_use]
    pub fn active_section(&self) -> SectionId {
        self.tracker.active()
    }

    #[must_use]
    pub fn tracker(&self) -> &ActiveSectionTracker {
        &self.tracker
    }

    #[must_use]
    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    #[must_use]
    pub fn carousel(&self, category: Category) -> &Carousel {
        &self.carousels[category.index()]
    }

    #[must_use]
    pub fn lightbox(&self) -> &Lightbox {
        &self.lightbox
    }

    #[must_use]
    pub fn scroll_to_top(&self) -> &ScrollToTop {
        &self.scroll_to_top
    }

    #[must_use]
    pub fn particles(&self) -> &ParticleField {
        &self.particles
    }

    #[must_use]
    pub fn boundary(&self) -> &ErrorBoundary {
        &self.boundary
    }

    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    /// Switch the page to the fallback screen.
    pub fn fail(&mut self, reason: impl Display) {
        self.boundary.fail(reason);
    }

    /// Draw the particle backdrop.
    pub fn render_particles(&self, painter: &mut dyn Painter) {
        self.particles.render(painter);
    }

    fn viewport_rect(&self) -> Rect {
        Rect::from_size(self.viewport.width, self.viewport.height)
    }

    fn carousel_mut(&mut self, category: Category) -> &mut Carousel {
        &mut self.carousels[category.index()]
    }

    fn observe_carousels(&mut self, now: Duration) {
        let viewport = self.viewport_rect();
        for carousel in &mut self.carousels {
            let bounds = self.layout.bounds_of(carousel.category().section());
            carousel.observe(now, bounds, viewport);
        }
    }

    fn in_viewport(&self, section: SectionId) -> bool {
        self.layout
            .bounds_of(section)
            .is_some_and(|b| b.bottom() > 0.0 && b.top() < self.viewport.height)
    }

    fn drain_active_changes(&self) -> Vec<Cmd<Msg>> {
        self.active_changes
            .borrow_mut()
            .drain(..)
            .map(|section| Cmd::log(format!("active_section: {section}")))
            .collect()
    }

    fn on_scroll(&mut self, sample: ScrollSample, now: Duration) {
        let sample = sample.sanitized();
        self.layout.observe_scroll(sample);
        self.tracker.on_scroll(now);
        self.scroll_to_top.on_scroll(self.layout.scroll());
        self.observe_carousels(now);
    }

    fn on_resize(&mut self, size: Size, now: Duration) {
        if !(size.width.is_finite() && size.height.is_finite()) {
            return;
        }
        debug!(width = size.width, height = size.height, "viewport resized");
        self.viewport = size;
        self.layout.observe_resize(size);
        self.navigation.resize(size.width);
        for carousel in &mut self.carousels {
            carousel.resize(size.width);
        }
        self.particles.resize(size.width, size.height);
        self.tracker.on_scroll(now);
        self.scroll_to_top.on_scroll(self.layout.scroll());
        self.observe_carousels(now);
    }

    fn on_pointer(&mut self, event: PointerEvent, now: Duration) -> Cmd<Msg> {
        let action = event.action.as_deref().and_then(|a| a.parse::<Action>().ok());
        match event.kind {
            PointerKind::Move => {
                self.pointer = Some((event.x, event.y));
                self.lightbox.pointer_move(event.y);
                for carousel in self.carousels.iter_mut().filter(|c| c.has_pointer()) {
                    carousel.pointer_move(event.x);
                }
            }
            PointerKind::Down => {
                if self.lightbox.is_open() {
                    if action == Some(Action::LightboxStage) {
                        self.lightbox.pointer_down(event.y);
                    }
                    return Cmd::none();
                }
                match action {
                    Some(Action::Slide(category, index)) => {
                        self.carousel_mut(category).pointer_down(event.x, Some(index), now);
                    }
                    Some(Action::Carousel(category)) => {
                        self.carousel_mut(category).pointer_down(event.x, None, now);
                    }
                    _ => {}
                }
            }
            PointerKind::Up => {
                if self.lightbox.is_open() {
                    if self.lightbox.pointer_up(event.y) {
                        return Cmd::log("lightbox_closed: pull");
                    }
                    return Cmd::none();
                }
                let mut open = None;
                for carousel in self.carousels.iter_mut().filter(|c| c.has_pointer()) {
                    if let PointerOutcome::Open(index) = carousel.pointer_up(event.x, now) {
                        open = Some((carousel.category(), index));
                    }
                }
                if let Some((category, index)) = open
                    && self.lightbox.open(category, index)
                {
                    return Cmd::log(format!("lightbox_open: {} #{index}", category.section()));
                }
            }
            PointerKind::Enter | PointerKind::Leave => {
                if let Some(Action::Carousel(category)) = action {
                    let hovered = event.kind == PointerKind::Enter;
                    self.carousel_mut(category).set_hovered(hovered, now);
                }
            }
        }
        Cmd::none()
    }

    fn on_key(&mut self, key: KeyCode, now: Duration) {
        if self.lightbox.is_open() {
            self.lightbox.handle_key(key);
            return;
        }
        if key == KeyCode::Escape {
            self.navigation.collapse();
            return;
        }
        for category in Category::ALL {
            if self.in_viewport(category.section()) {
                self.carousel_mut(category).handle_key(key, now);
            }
        }
    }

    fn on_action(&mut self, action: Action, now: Duration) -> Cmd<Msg> {
        trace!(%action, "action");
        match action {
            Action::Navigate(section) => {
                match self
                    .navigation
                    .select(section, now, &mut self.tracker, &self.layout)
                {
                    Some(effect) => return Cmd::effect(effect),
                    None => {
                        warn!(section = section.as_str(), "navigation target is not rendered");
                        return Cmd::log(format!("nav_target_missing: {section}"));
                    }
                }
            }
            Action::ExpandNav => self.navigation.expand(),
            Action::CollapseNav => self.navigation.collapse(),
            Action::Explore => {
                return Cmd::effect(HostEffect::ScrollIntoView {
                    element_id: Category::Cm9.section().as_str().to_owned(),
                    smooth: true,
                });
            }
            Action::ScrollTop => return Cmd::effect(self.scroll_to_top.click()),
            Action::CarouselPrev(category) => {
                self.carousel_mut(category).prev(now);
            }
            Action::CarouselNext(category) => {
                self.carousel_mut(category).next(now);
            }
            Action::Bullet(category, index) => {
                self.carousel_mut(category).go_to(index, now);
            }
            // Opening goes through the pointer path so drags never open.
            Action::Carousel(_) | Action::Slide(..) | Action::LightboxStage => {}
            Action::LightboxClose => self.lightbox.close(),
            Action::LightboxPrev => {
                self.lightbox.prev();
            }
            Action::LightboxNext => {
                self.lightbox.next();
            }
            Action::LightboxZoomIn => {
                self.lightbox.zoom_in();
            }
            Action::LightboxZoomOut => {
                self.lightbox.zoom_out();
            }
            Action::Reload => return Cmd::effect(self.boundary.reload()),
        }
        Cmd::none()
    }

    fn on_image(&mut self, product: &str, ok: bool) -> Cmd<Msg> {
        let Some(found) = find_product(product) else {
            let err = PageError::UnknownProduct(product.to_owned());
            warn!(%err, "image event ignored");
            return Cmd::log(format!("page_warning: {err}"));
        };
        self.carousel_mut(found.category).image_loaded(found.index, ok);
        if ok {
            Cmd::none()
        } else {
            warn!(product, "product image failed to load");
            Cmd::log(format!("image_failed: {product}"))
        }
    }

    fn on_tick(&mut self, now: Duration) {
        let dt = now.saturating_sub(self.last_tick);
        self.last_tick = now;
        self.lightbox.tick(dt);
        if let Some(evaluation) = self.tracker.poll(now, &self.layout) {
            trace!(?evaluation, "scroll spy evaluated");
        }
        for carousel in &mut self.carousels {
            carousel.tick(now);
        }
        self.particles.update(&FxContext {
            width: self.viewport.width,
            height: self.viewport.height,
            time_ms: now.as_secs_f64() * 1000.0,
            pointer: self.pointer,
        });
    }

    fn handle(&mut self, msg: Msg, now: Duration) -> Cmd<Msg> {
        match msg {
            Msg::Scroll(sample) => self.on_scroll(sample, now),
            Msg::Resize(size) => self.on_resize(size, now),
            Msg::Pointer(event) => return self.on_pointer(event, now),
            Msg::Wheel(wheel) => {
                if self.lightbox.is_open() {
                    self.lightbox.wheel(wheel.delta_y);
                }
            }
            Msg::Key(key) => self.on_key(key, now),
            Msg::Action(action) => return self.on_action(action, now),
            Msg::InvalidAction { raw, error } => {
                let err = PageError::from(error);
                warn!(raw = raw.as_str(), %err, "ignoring action");
                return Cmd::log(format!("page_warning: {err}"));
            }
            Msg::ImageLoaded { product, ok } => return self.on_image(&product, ok),
            Msg::Tick => self.on_tick(now),
        }
        Cmd::none()
    }
}

impl<L: LayoutProvider> Model for PageModel<L> {
    type Message = Msg;

    fn init(&mut self, now: Duration) -> Cmd<Msg> {
        self.last_tick = now;
        let rendered = SectionId::ALL
            .into_iter()
            .filter(|s| self.layout.bounds_of(*s).is_some())
            .count();
        if rendered == 0 {
            let err = PageError::NotMounted;
            self.fail(&err);
            return Cmd::log(format!("page_error: {err}"));
        }
        self.scroll_to_top.on_scroll(self.layout.scroll());
        let evaluation = self.tracker.evaluate(&self.layout);
        self.observe_carousels(now);
        debug!(rendered, ?evaluation, "page ready");

        let mut cmds = vec![Cmd::log(format!("page_ready: {rendered} sections"))];
        cmds.extend(self.drain_active_changes());
        Cmd::batch(cmds)
    }

    fn update(&mut self, msg: Msg, now: Duration) -> Cmd<Msg> {
        let cmd = self.handle(msg, now);
        let changes = self.drain_active_changes();
        if changes.is_empty() {
            return cmd;
        }
        let mut cmds = vec![cmd];
        cmds.extend(changes);
        Cmd::batch(cmds)
    }

    fn view(&self, frame: &mut Frame) {
        self.boundary.view(frame);
        frame
            .node(error_boundary::ids::APP)
            .class_if("lightbox-open", self.lightbox.is_open());
        self.navigation.view(frame, self.tracker.active());
        for carousel in &self.carousels {
            carousel.view(frame);
        }
        self.lightbox.view(frame);
        self.scroll_to_top.view(frame);
    }
}
