#![forbid(unsafe_code)]

//! Browser runner for the KINGPLAST Royal Katalog page.
//!
//! This crate provides [`PageModel`], the Elm-style model of the whole
//! catalog page, the static [`markup`] it drives, and (on `wasm32`) the
//! `wasm-bindgen`-exported `CatalogRunner` that wraps it in a
//! `kp_runtime::StepProgram` for host-driven execution.
//!
//! The host loop, once per animation frame:
//!
//! ```text
//! runner.scroll(..) / pointer*(..) / key(..) / click(..)   forward DOM events
//! runner.advanceTime(dt)                                    move the clock
//! runner.step()                                             update + render
//! runner.applyPatches(); runner.applyEffects()              write the DOM
//! runner.drawParticles()                                    paint the canvas
//! ```

pub mod action;
pub mod config;
pub mod markup;
pub mod page;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{CatalogRunner, DomLayout};

// Runner core is used by the wasm module and by native tests.
#[cfg(any(target_arch = "wasm32", test))]
mod runner_core;

pub use action::{Action, ActionParseError};
pub use config::{ConfigError, PageConfig};
pub use page::{Msg, PageError, PageModel};
