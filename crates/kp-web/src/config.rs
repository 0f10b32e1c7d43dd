#![forbid(unsafe_code)]

//! Page configuration.
//!
//! [`PageConfig`] aggregates the tunables of every widget. All fields have
//! defaults, so the host only sends the ones it wants to override:
//!
//! ```json
//! { "scrollSpy": { "debounceMs": 200 }, "particleSeed": 7 }
//! ```

use kp_extras::visual_fx::ParticleConfig;
use kp_widgets::{CarouselConfig, LightboxConfig, NavigationConfig, ScrollSpyConfig, ScrollToTopConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading a [`PageConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageConfig {
    pub scroll_spy: ScrollSpyConfig,
    pub navigation: NavigationConfig,
    pub carousel: CarouselConfig,
    pub lightbox: LightboxConfig,
    pub scroll_to_top: ScrollToTopConfig,
    pub particles: ParticleConfig,
    /// Seed of the particle field's random generator.
    pub particle_seed: u64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            scroll_spy: ScrollSpyConfig::default(),
            navigation: NavigationConfig::default(),
            carousel: CarouselConfig::default(),
            lightbox: LightboxConfig::default(),
            scroll_to_top: ScrollToTopConfig::default(),
            particles: ParticleConfig::default(),
            particle_seed: 0x4b50_2025,
        }
    }
}

impl PageConfig {
    /// Parse and validate a JSON override document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_particle_seed(mut self, seed: u64) -> Self {
        self.particle_seed = seed;
        self
    }

    /// Reject values the widgets cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let spy = &self.scroll_spy;
        for (field, value) in [
            ("scrollSpy.heroCutoff", spy.hero_cutoff),
            ("scrollSpy.centerWeight", spy.center_weight),
            ("scrollSpy.visibilityWeight", spy.visibility_weight),
            ("scrollSpy.hysteresis", spy.hysteresis),
            ("scrollSpy.threshold", spy.threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(field, format!("{value} is not a finite non-negative number")));
            }
        }
        if spy.debounce_ms == 0 {
            return Err(ConfigError::invalid("scrollSpy.debounceMs", "must be positive"));
        }
        if self.carousel.autoplay_ms == 0 {
            return Err(ConfigError::invalid("carousel.autoplayMs", "must be positive"));
        }
        let max_zoom = self.lightbox.max_zoom;
        if !max_zoom.is_finite() || max_zoom < 1.0 {
            return Err(ConfigError::invalid("lightbox.maxZoom", format!("{max_zoom} is below 1")));
        }
        let particles = &self.particles;
        if particles.min_particles > particles.max_particles {
            return Err(ConfigError::invalid(
                "particles.minParticles",
                format!(
                    "{} exceeds maxParticles {}",
                    particles.min_particles, particles.max_particles
                ),
            ));
        }
        if !(particles.pixels_per_particle.is_finite() && particles.pixels_per_particle > 0.0) {
            return Err(ConfigError::invalid("particles.pixelsPerParticle", "must be positive"));
        }
        Ok(())
    }
}
