#![forbid(unsafe_code)]

//! Core: geometry, page events, debouncing, and animation primitives.
//!
//! # Role in the catalog page
//! `kp-core` is the input layer. It owns the normalized event types the host
//! forwards from the browser (scroll, resize, pointer, wheel, keys, clicks),
//! the pixel geometry used by layout queries, and the small timing helpers
//! that every widget relies on.
//!
//! # Primary responsibilities
//! - **Event**: canonical page events, independent of any DOM binding.
//! - **Rect / ScrollSample**: viewport-relative geometry in CSS pixels.
//! - **Debouncer**: single-slot pending timer with cancel-and-reschedule.
//! - **Fade**: time-based opacity transitions.
//!
//! # How it fits in the system
//! The runtime (`kp-runtime`) consumes `kp-core::Event` values and drives the
//! page model. Nothing here touches the DOM, so everything is testable on the
//! native target with a host-controlled clock.

pub mod animation;
pub mod debounce;
pub mod event;
pub mod geometry;

pub use animation::Fade;
pub use debounce::Debouncer;
pub use event::{Event, KeyCode, PointerEvent, PointerKind, WheelEvent};
pub use geometry::{Rect, ScrollSample, Sides, Size};
