#![forbid(unsafe_code)]

//! Elm-style model trait and commands.
//!
//! The page is a [`Model`]: page events are converted into messages,
//! `update` mutates state and returns a [`Cmd`], and `view` writes the
//! managed DOM properties into a [`Frame`]. Time is passed explicitly so
//! every transition is reproducible under a deterministic clock.
//!
//! # Example
//!
//! ```ignore
//! use kp_runtime::{Cmd, Frame, Model};
//! use kp_core::Event;
//! use web_time::Duration;
//!
//! struct Counter { clicks: u32 }
//!
//! enum Msg { Page(Event) }
//!
//! impl From<Event> for Msg {
//!     fn from(e: Event) -> Self { Msg::Page(e) }
//! }
//!
//! impl Model for Counter {
//!     type Message = Msg;
//!
//!     fn update(&mut self, msg: Msg, _now: Duration) -> Cmd<Msg> {
//!         match msg {
//!             Msg::Page(Event::Click { .. }) => { self.clicks += 1; Cmd::none() }
//!             Msg::Page(_) => Cmd::none(),
//!         }
//!     }
//!
//!     fn view(&self, frame: &mut Frame) {
//!         frame.node("clicks").text(self.clicks.to_string());
//!     }
//! }
//! ```

use kp_core::Event;
use serde::Serialize;
use web_time::Duration;

use crate::frame::Frame;

/// The Model trait defines page state and behavior.
pub trait Model: Sized {
    /// The message type for this model. Must be convertible from page events.
    type Message: From<Event> + 'static;

    /// Initialize the model with startup commands.
    ///
    /// Called once before the first frame is rendered.
    fn init(&mut self, _now: Duration) -> Cmd<Self::Message> {
        Cmd::none()
    }

    /// Update the model in response to a message at time `now`.
    fn update(&mut self, msg: Self::Message, now: Duration) -> Cmd<Self::Message>;

    /// Write the managed DOM properties of the current state.
    fn view(&self, frame: &mut Frame);
}

/// Side effects only the host can perform.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum HostEffect {
    /// `window.scrollTo({ top, behavior })`.
    ScrollTo { top: f64, smooth: bool },
    /// `getElementById(element_id).scrollIntoView({ behavior })`.
    #[serde(rename_all = "camelCase")]
    ScrollIntoView { element_id: String, smooth: bool },
    /// `window.location.reload()`.
    Reload,
}

/// Commands represent side effects to be executed by the runtime.
#[derive(Debug)]
pub enum Cmd<M> {
    /// No operation.
    None,
    /// Execute multiple commands.
    Batch(Vec<Cmd<M>>),
    /// Execute commands sequentially.
    Sequence(Vec<Cmd<M>>),
    /// Send a message to the model.
    Msg(M),
    /// Forward a log line to the host.
    Log(String),
    /// Ask the host to perform an effect.
    Effect(HostEffect),
}

impl<M> Cmd<M> {
    /// Create a no-op command.
    #[inline]
    pub fn none() -> Self {
        Self::None
    }

    /// Create a message command.
    #[inline]
    pub fn msg(m: M) -> Self {
        Self::Msg(m)
    }

    /// Create a log command.
    #[inline]
    pub fn log(msg: impl Into<String>) -> Self {
        Self::Log(msg.into())
    }

    /// Create a host effect command.
    #[inline]
    pub fn effect(effect: HostEffect) -> Self {
        Self::Effect(effect)
    }

    /// Smooth or instant scroll of the window to `top`.
    #[inline]
    pub fn scroll_to(top: f64, smooth: bool) -> Self {
        Self::Effect(HostEffect::ScrollTo { top, smooth })
    }

    /// Create a batch of commands.
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or(Self::None),
            _ => Self::Batch(cmds),
        }
    }

    /// Create a sequence of commands.
    pub fn sequence(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds.into_iter().filter(|c| !c.is_none()).collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.pop().unwrap_or(Self::None),
            _ => Self::Sequence(cmds),
        }
    }

    #[inline]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}
