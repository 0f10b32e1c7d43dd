#![forbid(unsafe_code)]

//! Golden particle field.
//!
//! Particles drift downward, twinkle, age out, and respawn just above the
//! top edge. Particles near the pointer are pulled gently toward it, and
//! close pairs are joined by faint lines.

use std::f64::consts::TAU;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{BackdropFx, Fill, FxContext, Painter, Rgba};

const GOLD: Rgba = Rgba::new(255, 215, 0, 1.0);
const AMBER: Rgba = Rgba::new(255, 193, 7, 1.0);
const ORANGE: Rgba = Rgba::new(255, 165, 0, 1.0);
const DARK_ORANGE: Rgba = Rgba::new(255, 140, 0, 0.0);
const WHITE: Rgba = Rgba::new(255, 255, 255, 1.0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParticleConfig {
    pub min_particles: usize,
    pub max_particles: usize,
    /// One particle per this many pixels of width.
    pub pixels_per_particle: f64,
    /// Pointer pull radius.
    pub pull_radius: f64,
    /// Velocity kept per frame.
    pub friction: f64,
    /// Distance under which two particles are linked.
    pub link_distance: f64,
    pub link_opacity: f64,
    pub link_width: f64,
    /// How far outside the surface a particle may drift before respawning.
    pub escape_margin: f64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            min_particles: 50,
            max_particles: 150,
            pixels_per_particle: 15.0,
            pull_radius: 200.0,
            friction: 0.98,
            link_distance: 120.0,
            link_opacity: 0.15,
            link_width: 0.5,
            escape_margin: 50.0,
        }
    }
}

/// Number of particles for a surface width.
#[must_use]
pub fn particle_count_for_width(width: f64, config: &ParticleConfig) -> usize {
    let per = if config.pixels_per_particle > 0.0 {
        config.pixels_per_particle
    } else {
        1.0
    };
    let raw = if width.is_finite() && width > 0.0 {
        (width / per).floor() as usize
    } else {
        0
    };
    raw.clamp(config.min_particles, config.max_particles.max(config.min_particles))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub size: f64,
    /// Remaining life in `(0, 1]`.
    pub life: f64,
    pub decay: f64,
    pub brightness: f64,
    pub twinkle: f64,
    pub twinkle_offset: f64,
    pub pull_strength: f64,
}

impl Particle {
    /// A fresh particle just above the top edge.
    fn spawn(rng: &mut SmallRng, width: f64) -> Self {
        Self {
            x: rng.random::<f64>() * width,
            y: -10.0,
            vx: (rng.random::<f64>() - 0.5) * 0.8,
            vy: rng.random::<f64>() * 1.5 + 0.5,
            size: rng.random::<f64>() * 3.0 + 1.0,
            life: 1.0,
            decay: rng.random::<f64>() * 0.01 + 0.005,
            brightness: rng.random::<f64>() * 0.8 + 0.2,
            twinkle: rng.random::<f64>() * 0.02 + 0.01,
            twinkle_offset: rng.random::<f64>() * TAU,
            pull_strength: rng.random::<f64>() * 0.0003 + 0.0001,
        }
    }

    /// Current drawing alpha.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.life * self.brightness * 0.7
    }
}

/// The particle field.
#[derive(Debug, Clone)]
pub struct ParticleField {
    config: ParticleConfig,
    rng: SmallRng,
    particles: Vec<Particle>,
    width: f64,
    height: f64,
    pointer: Option<(f64, f64)>,
}

impl ParticleField {
    /// Create a field filling a `width × height` surface. The first
    /// generation is scattered over the whole height.
    #[must_use]
    pub fn new(config: ParticleConfig, seed: u64, width: f64, height: f64) -> Self {
        let mut field = Self {
            config,
            rng: SmallRng::seed_from_u64(seed),
            particles: Vec::new(),
            width: 0.0,
            height: 0.0,
            pointer: None,
        };
        field.resize(width, height);
        field
    }

    fn populate(&mut self) {
        let count = particle_count_for_width(self.width, &self.config);
        let (width, height) = (self.width, self.height);
        let rng = &mut self.rng;
        self.particles = (0..count)
            .map(|_| {
                let mut p = Particle::spawn(rng, width);
                p.y = rng.random::<f64>() * height;
                p
            })
            .collect();
        debug!(count, width, height, "particle field populated");
    }

    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    #[must_use]
    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// Pointer position in surface (document) coordinates.
    pub fn set_pointer(&mut self, pointer: Option<(f64, f64)>) {
        self.pointer = pointer;
    }

    fn step_particle(&mut self, i: usize, time_ms: f64) {
        let config = &self.config;
        let (width, height) = (self.width, self.height);
        let p = &mut self.particles[i];

        if let Some((px, py)) = self.pointer {
            let dx = px - p.x;
            let dy = py - p.y;
            let distance = dx.hypot(dy);
            if distance > 0.0 && distance < config.pull_radius {
                let force = (config.pull_radius - distance) / config.pull_radius;
                p.vx += dx / distance * p.pull_strength * force;
                p.vy += dy / distance * p.pull_strength * force;
            }
        }

        p.x += p.vx;
        p.y += p.vy;
        p.vx *= config.friction;
        p.vy *= config.friction;

        p.brightness += (time_ms * p.twinkle + p.twinkle_offset).sin() * 0.1;
        p.brightness = p.brightness.clamp(0.1, 1.0);

        p.life -= p.decay;

        let margin = config.escape_margin;
        if p.life <= 0.0 || p.x < -margin || p.x > width + margin || p.y > height + margin {
            *p = Particle::spawn(&mut self.rng, width);
        }
    }
}

impl BackdropFx for ParticleField {
    fn name(&self) -> &'static str {
        "golden-particles"
    }

    /// Recreates the population when the size changes.
    fn resize(&mut self, width: f64, height: f64) {
        let width = if width.is_finite() { width.max(0.0) } else { 0.0 };
        let height = if height.is_finite() { height.max(0.0) } else { 0.0 };
        if width == self.width && height == self.height && !self.particles.is_empty() {
            return;
        }
        self.width = width;
        self.height = height;
        self.populate();
    }

    fn update(&mut self, ctx: &FxContext) {
        if ctx.width != self.width || ctx.height != self.height {
            self.resize(ctx.width, ctx.height);
        }
        self.pointer = ctx.pointer;
        for i in 0..self.particles.len() {
            self.step_particle(i, ctx.time_ms);
        }
    }

    fn render(&self, painter: &mut dyn Painter) {
        painter.clear(self.width, self.height);

        for p in &self.particles {
            let alpha = p.alpha();
            let glow = Fill::Radial {
                radius: p.size * 3.0,
                stops: vec![
                    (0.0, GOLD.with_alpha(alpha)),
                    (0.4, AMBER.with_alpha(alpha * 0.8)),
                    (0.7, ORANGE.with_alpha(alpha * 0.4)),
                    (1.0, DARK_ORANGE),
                ],
            };
            painter.fill_circle(p.x, p.y, p.size * 2.0, &glow);
            painter.fill_circle(p.x, p.y, p.size * 0.6, &Fill::Solid(WHITE.with_alpha(alpha * 0.9)));
            if p.brightness > 0.7 {
                painter.fill_circle(p.x, p.y, p.size * 4.0, &Fill::Solid(GOLD.with_alpha(alpha * 0.1)));
            }
        }

        let link = self.config.link_distance;
        for (i, a) in self.particles.iter().enumerate() {
            for b in &self.particles[i + 1..] {
                let distance = (a.x - b.x).hypot(a.y - b.y);
                if distance < link {
                    let opacity = (link - distance) / link * self.config.link_opacity * a.life * b.life;
                    painter.line(
                        (a.x, a.y),
                        (b.x, b.y),
                        GOLD.with_alpha(opacity),
                        self.config.link_width,
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visual_fx::{DrawList, DrawOp};
    use pretty_assertions::assert_eq;

    fn ctx(width: f64, height: f64, time_ms: f64) -> FxContext {
        FxContext {
            width,
            height,
            time_ms,
            pointer: None,
        }
    }

    #[test]
    fn count_scales_with_width_within_bounds() {
        let config = ParticleConfig::default();
        assert_eq!(particle_count_for_width(300.0, &config), 50);
        assert_eq!(particle_count_for_width(1200.0, &config), 80);
        assert_eq!(particle_count_for_width(4000.0, &config), 150);
        assert_eq!(particle_count_for_width(f64::NAN, &config), 50);
    }

    #[test]
    fn config_overrides_from_json() {
        let config: ParticleConfig =
            serde_json::from_str(r#"{"maxParticles": 60, "linkDistance": 90.0}"#).expect("parse");
        assert_eq!(config.max_particles, 60);
        assert_eq!(config.link_distance, 90.0);
        assert_eq!(config.min_particles, 50);
        assert_eq!(particle_count_for_width(4000.0, &config), 60);
    }

    #[test]
    fn same_seed_same_field() {
        let a = ParticleField::new(ParticleConfig::default(), 7, 1200.0, 5000.0);
        let b = ParticleField::new(ParticleConfig::default(), 7, 1200.0, 5000.0);
        assert_eq!(a.particles(), b.particles());
    }

    #[test]
    fn spawned_values_are_in_range() {
        let field = ParticleField::new(ParticleConfig::default(), 1, 1200.0, 5000.0);
        for p in field.particles() {
            assert!((0.0..1200.0).contains(&p.x));
            assert!((0.0..5000.0).contains(&p.y));
            assert!((-0.4..0.4).contains(&p.vx));
            assert!((0.5..2.0).contains(&p.vy));
            assert!((1.0..4.0).contains(&p.size));
            assert_eq!(p.life, 1.0);
            assert!((0.005..0.015).contains(&p.decay));
            assert!((0.2..1.0).contains(&p.brightness));
        }
    }

    #[test]
    fn resize_recreates_population() {
        let mut field = ParticleField::new(ParticleConfig::default(), 3, 900.0, 3000.0);
        assert_eq!(field.len(), 60);
        field.resize(1800.0, 3000.0);
        assert_eq!(field.len(), 120);
        field.update(&ctx(1800.0, 3000.0, 16.0));
        assert_eq!(field.len(), 120);
    }

    #[test]
    fn dead_particles_respawn_at_top() {
        let mut field = ParticleField::new(ParticleConfig::default(), 5, 900.0, 3000.0);
        field.particles[0].life = 0.001;
        field.update(&ctx(900.0, 3000.0, 0.0));
        let p = field.particles()[0];
        assert_eq!(p.y, -10.0);
        assert_eq!(p.life, 1.0);
    }

    #[test]
    fn pointer_pulls_nearby_particles() {
        let mut field = ParticleField::new(ParticleConfig::default(), 9, 900.0, 3000.0);
        field.particles[0] = Particle {
            x: 100.0,
            y: 100.0,
            vx: 0.0,
            vy: 0.0,
            size: 2.0,
            life: 1.0,
            decay: 0.0,
            brightness: 0.5,
            twinkle: 0.0,
            twinkle_offset: 0.0,
            pull_strength: 0.0004,
        };
        field.update(&FxContext {
            pointer: Some((200.0, 100.0)),
            ..ctx(900.0, 3000.0, 0.0)
        });
        let p = field.particles()[0];
        // force 0.5 toward +x, then friction.
        assert!((p.vx - 0.0004 * 0.5 * 0.98).abs() < 1e-12);
        assert_eq!(p.vy, 0.0);
    }

    #[test]
    fn render_draws_core_glow_and_links() {
        let mut field = ParticleField::new(ParticleConfig::default(), 11, 300.0, 300.0);
        field.particles.truncate(2);
        field.particles[0] = Particle {
            x: 10.0,
            y: 10.0,
            vx: 0.0,
            vy: 0.0,
            size: 2.0,
            life: 1.0,
            decay: 0.01,
            brightness: 0.9,
            twinkle: 0.01,
            twinkle_offset: 0.0,
            pull_strength: 0.0001,
        };
        field.particles[1] = Particle {
            x: 70.0,
            brightness: 0.5,
            ..field.particles[0]
        };
        let mut list = DrawList::new();
        field.render(&mut list);
        // Glow + core for both, halo only for the bright one.
        assert_eq!(list.circles().count(), 5);
        let lines: Vec<_> = list.lines().collect();
        assert_eq!(lines.len(), 1);
        if let DrawOp::Line { color, width, .. } = lines[0] {
            assert!((color.a - 0.075).abs() < 1e-12);
            assert_eq!(*width, 0.5);
        }
    }
}
