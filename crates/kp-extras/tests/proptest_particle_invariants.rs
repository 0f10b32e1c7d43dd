//! Property-based invariant tests for the golden particle field.
//!
//! 1. Population size is `clamp(width / 15, 50, 150)` after any resize
//! 2. Every particle stays alive and inside the escape margin after a frame
//! 3. Brightness stays within `[0.1, 1]`
//! 4. Link opacity never exceeds the configured maximum
//! 5. Identical seeds and inputs give identical frames

use kp_extras::visual_fx::{
    BackdropFx, DrawList, DrawOp, FxContext, ParticleConfig, ParticleField, particle_count_for_width,
};
use proptest::prelude::*;

fn frame(width: f64, height: f64, t: f64, pointer: Option<(f64, f64)>) -> FxContext {
    FxContext {
        width,
        height,
        time_ms: t,
        pointer,
    }
}

fn pointer_strategy() -> impl Strategy<Value = Option<(f64, f64)>> {
    prop::option::of((-100.0f64..2000.0, -100.0f64..6000.0))
}

proptest! {
    #[test]
    fn population_follows_width(widths in prop::collection::vec(0.0f64..5000.0, 1..6), seed in any::<u64>()) {
        let config = ParticleConfig::default();
        let mut field = ParticleField::new(config.clone(), seed, widths[0], 2000.0);
        for w in widths {
            field.resize(w, 2000.0);
            let expected = ((w / 15.0).floor() as usize).clamp(50, 150);
            prop_assert_eq!(field.len(), expected);
            prop_assert_eq!(particle_count_for_width(w, &config), expected);
        }
    }

    #[test]
    fn particles_stay_live_and_bounded(
        seed in any::<u64>(),
        width in 320.0f64..2000.0,
        height in 800.0f64..6000.0,
        frames in 1usize..200,
        pointer in pointer_strategy(),
    ) {
        let mut field = ParticleField::new(ParticleConfig::default(), seed, width, height);
        for f in 0..frames {
            field.update(&frame(width, height, f as f64 * 16.0, pointer));
            for p in field.particles() {
                prop_assert!(p.life > 0.0 && p.life <= 1.0);
                prop_assert!(p.x >= -50.0 && p.x <= width + 50.0);
                prop_assert!(p.y <= height + 50.0);
                prop_assert!((0.1..=1.0).contains(&p.brightness));
            }
        }
    }

    #[test]
    fn link_opacity_is_bounded(seed in any::<u64>(), frames in 0usize..30) {
        let mut field = ParticleField::new(ParticleConfig::default(), seed, 600.0, 600.0);
        for f in 0..frames {
            field.update(&frame(600.0, 600.0, f as f64 * 16.0, None));
        }
        let mut list = DrawList::new();
        field.render(&mut list);
        for op in list.lines() {
            if let DrawOp::Line { color, .. } = op {
                prop_assert!(color.a > 0.0 && color.a <= 0.15);
            }
        }
    }

    #[test]
    fn deterministic_for_seed(seed in any::<u64>(), pointer in pointer_strategy()) {
        let mut a = ParticleField::new(ParticleConfig::default(), seed, 1024.0, 3000.0);
        let mut b = ParticleField::new(ParticleConfig::default(), seed, 1024.0, 3000.0);
        for f in 0..20 {
            a.update(&frame(1024.0, 3000.0, f as f64 * 16.0, pointer));
            b.update(&frame(1024.0, 3000.0, f as f64 * 16.0, pointer));
        }
        prop_assert_eq!(a.particles(), b.particles());
    }
}
