#![forbid(unsafe_code)]

//! Feature-gated extras.
//!
//! - `visual-fx` (default): the golden particle backdrop drawn behind the
//!   page, rendered through a small [`visual_fx::Painter`] trait so the
//!   browser binding can target a 2D canvas and tests can record calls.

#[cfg(feature = "visual-fx")]
pub mod visual_fx;
