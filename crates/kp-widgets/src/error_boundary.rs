#![forbid(unsafe_code)]

//! Top-level failure fallback.
//!
//! Once tripped, the boundary hides the page and shows a generic message
//! with a reload action. It never resets on its own; the only way out is a
//! reload.

use std::fmt::Display;

use kp_runtime::{Frame, HostEffect};
use tracing::error;

/// Element ids written by [`ErrorBoundary::view`].
pub mod ids {
    pub const APP: &str = "app";
    pub const FALLBACK: &str = "error-fallback";
    pub const DETAIL: &str = "error-detail";
}

#[derive(Debug, Clone, Default)]
pub struct ErrorBoundary {
    failure: Option<String>,
}

impl ErrorBoundary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Trip the boundary. Only the first failure is kept.
    pub fn fail(&mut self, reason: impl Display) {
        let reason = reason.to_string();
        error!(%reason, "page failed; showing fallback");
        if self.failure.is_none() {
            self.failure = Some(reason);
        }
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    #[must_use]
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    /// Effect of the fallback's reload button.
    #[must_use]
    pub fn reload(&self) -> HostEffect {
        HostEffect::Reload
    }

    pub fn view(&self, frame: &mut Frame) {
        let failed = self.is_failed();
        frame
            .node(ids::APP)
            .style("display", if failed { "none" } else { "block" });
        frame
            .node(ids::FALLBACK)
            .style("display", if failed { "flex" } else { "none" });
        if let Some(reason) = &self.failure {
            frame.node(ids::DETAIL).text(reason.clone());
        }
    }
}
