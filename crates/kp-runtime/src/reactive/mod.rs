#![forbid(unsafe_code)]

//! Reactive state cells.

pub mod observable;

pub use observable::{Observable, Subscription};
