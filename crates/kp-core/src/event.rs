#![forbid(unsafe_code)]

//! Canonical page event types.
//!
//! The host (a thin JavaScript shim or the wasm bindings) translates DOM
//! events into these values and pushes them into the runtime. Interactive
//! elements in the page markup carry a `data-action` attribute; the host
//! forwards that string verbatim as the event's `action`, and the page model
//! decides what it means.
//!
//! # Design Notes
//!
//! - All coordinates are CSS pixels in viewport space.
//! - Scroll and touch listeners are folded into a single [`Event::Scroll`]
//!   carrying a fresh [`ScrollSample`]; there is exactly one observation path.
//! - Key names follow `KeyboardEvent.key`.

use crate::geometry::{ScrollSample, Size};

/// Canonical page event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The document scrolled (or a touch gesture moved it).
    Scroll(ScrollSample),

    /// The viewport was resized.
    Resize(Size),

    /// A pointer (mouse, pen or touch) event.
    Pointer(PointerEvent),

    /// Wheel input over an element.
    Wheel(WheelEvent),

    /// A key was pressed.
    Key(KeyCode),

    /// An element carrying `data-action` was activated.
    Click {
        /// The element's `data-action` value.
        action: String,
    },

    /// A product image finished loading (or failed to).
    ImageLoaded {
        /// Product identifier, e.g. `"12-3"`.
        product: String,
        /// `false` when the browser reported an error.
        ok: bool,
    },

    /// Periodic frame tick from the host's animation loop.
    Tick,
}

/// Kind of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    /// Pointer entered an element that carries `data-action`.
    Enter,
    /// Pointer left an element that carries `data-action`.
    Leave,
}

/// A pointer event.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    /// Viewport x (`clientX`).
    pub x: f64,
    /// Viewport y (`clientY`).
    pub y: f64,
    /// `data-action` of the closest annotated ancestor, if any.
    pub action: Option<String>,
}

impl PointerEvent {
    /// Create a pointer event without an action target.
    #[must_use]
    pub const fn new(kind: PointerKind, x: f64, y: f64) -> Self {
        Self {
            kind,
            x,
            y,
            action: None,
        }
    }

    /// Attach the `data-action` of the element under the pointer.
    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }
}

/// Wheel input.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelEvent {
    /// Vertical delta in pixels (positive = scroll down / zoom out).
    pub delta_y: f64,
    pub action: Option<String>,
}

/// Keys the page reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Escape,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    PageUp,
    PageDown,
    Home,
    End,
    /// `+` or `=`.
    Plus,
    /// `-` or `_`.
    Minus,
    Char(char),
    Other,
}

impl KeyCode {
    /// Map a `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_dom_key(key: &str) -> Self {
        match key {
            "Escape" | "Esc" => Self::Escape,
            "ArrowLeft" | "Left" => Self::ArrowLeft,
            "ArrowRight" | "Right" => Self::ArrowRight,
            "ArrowUp" | "Up" => Self::ArrowUp,
            "ArrowDown" | "Down" => Self::ArrowDown,
            "PageUp" => Self::PageUp,
            "PageDown" => Self::PageDown,
            "Home" => Self::Home,
            "End" => Self::End,
            "+" | "=" => Self::Plus,
            "-" | "_" => Self::Minus,
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::Char(c),
                    _ => Self::Other,
                }
            }
        }
    }
}
