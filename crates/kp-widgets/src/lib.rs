#![forbid(unsafe_code)]

//! Stateful widgets for the catalog page.
//!
//! # Role in the catalog page
//! Each widget owns one piece of UI state and knows how to write it into a
//! [`kp_runtime::Frame`]. None of them touch the DOM or read the clock: time
//! arrives as a `Duration` argument and geometry through a
//! [`LayoutProvider`].
//!
//! # Primary responsibilities
//! - **ActiveSectionTracker**: debounced, hysteretic scroll spy.
//! - **Navigation**: desktop rail and mobile pill, section jumps.
//! - **Carousel**: one product slider per category.
//! - **Lightbox**: full-screen viewer with zoom.
//! - **ScrollToTop**: back-to-top button with progress ring.
//! - **ErrorBoundary**: fallback when the page cannot render.

pub mod carousel;
pub mod error_boundary;
pub mod layout;
pub mod lightbox;
pub mod navigation;
pub mod scroll_spy;
pub mod scroll_to_top;

pub use carousel::{Carousel, CarouselConfig, ImageState, PointerOutcome, SlideEffect};
pub use error_boundary::ErrorBoundary;
pub use layout::{LayoutProvider, StaticLayout};
pub use lightbox::{Lightbox, LightboxConfig};
pub use navigation::{NavLayout, Navigation, NavigationConfig};
pub use scroll_spy::{ActiveSectionTracker, Evaluation, ScrollSpyConfig, SectionScore, TrackerPhase};
pub use scroll_to_top::{ScrollToTop, ScrollToTopConfig};
