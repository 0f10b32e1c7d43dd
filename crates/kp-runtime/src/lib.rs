#![forbid(unsafe_code)]

//! Elm-style runtime for the catalog page.
//!
//! # Role in the catalog page
//! `kp-runtime` sits between the host (browser bindings or tests) and the
//! page model. It defines the [`Model`] contract, the [`Cmd`] side-effect
//! vocabulary, the host-driven [`StepProgram`] loop, and the DOM property
//! [`Frame`] whose diffs become [`DomPatch`] lists for the host to apply.
//!
//! # How it fits in the system
//! Input arrives as `kp_core::Event`; widgets (`kp-widgets`) hold state the
//! model composes; `kp-web` wires a concrete page model into a
//! `StepProgram` and exposes it to JavaScript.

pub mod clock;
pub mod frame;
pub mod program;
pub mod reactive;
pub mod step_program;

pub use clock::DeterministicClock;
pub use frame::{DomPatch, Frame, NodeMut, NodeProps};
pub use program::{Cmd, HostEffect, Model};
pub use reactive::{Observable, Subscription};
pub use step_program::{StepError, StepProgram, StepResult};
