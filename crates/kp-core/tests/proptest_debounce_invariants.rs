//! Property-based invariant tests for the single-slot debouncer.
//!
//! These tests verify the timing contract of `Debouncer<T>`:
//!
//! 1. A burst of schedules closer together than the delay fires exactly once
//! 2. The payload that fires is the last one scheduled
//! 3. Nothing fires before `last_schedule + delay`
//! 4. Counters stay consistent across arbitrary operation sequences
//! 5. Bursts separated by more than the delay fire once each

use kp_core::debounce::Debouncer;
use proptest::prelude::*;
use web_time::Duration;

const DELAY_MS: u64 = 150;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

// ── Strategies ──────────────────────────────────────────────────────────

/// Gaps between consecutive events, all strictly inside the delay window.
fn burst_gaps() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0u64..DELAY_MS, 1..40)
}

#[derive(Debug, Clone)]
enum Op {
    Schedule(u32),
    Advance(u64),
    Poll,
    Cancel,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<u32>().prop_map(Op::Schedule),
        (0u64..400).prop_map(Op::Advance),
        Just(Op::Poll),
        Just(Op::Cancel),
    ]
}

/// Schedule one event per gap, polling after every event, then drain.
/// Returns (fired payloads, timestamp of the last schedule).
fn run_burst(gaps: &[u64]) -> (Vec<(u64, usize)>, u64) {
    let mut debouncer = Debouncer::new(ms(DELAY_MS));
    let mut now = 0u64;
    let mut fired = Vec::new();
    let mut last = 0u64;
    for (i, gap) in gaps.iter().enumerate() {
        now += gap;
        if let Some(v) = debouncer.poll(ms(now)) {
            fired.push((now, v));
        }
        debouncer.schedule(ms(now), i);
        last = now;
    }
    // Drain in 1ms steps well past the deadline.
    for _ in 0..(DELAY_MS * 2) {
        now += 1;
        if let Some(v) = debouncer.poll(ms(now)) {
            fired.push((now, v));
        }
    }
    (fired, last)
}

// ═══════════════════════════════════════════════════════════════════════
// 1–3. Bursts collapse to one evaluation
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn burst_within_delay_fires_exactly_once(gaps in burst_gaps()) {
        let (fired, _) = run_burst(&gaps);
        prop_assert_eq!(fired.len(), 1);
    }

    #[test]
    fn burst_delivers_latest_payload(gaps in burst_gaps()) {
        let (fired, _) = run_burst(&gaps);
        prop_assert_eq!(fired[0].1, gaps.len() - 1);
    }

    #[test]
    fn burst_fires_no_earlier_than_last_plus_delay(gaps in burst_gaps()) {
        let (fired, last) = run_burst(&gaps);
        prop_assert_eq!(fired[0].0, last + DELAY_MS);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 4. Counter consistency
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn counters_balance(ops in prop::collection::vec(op_strategy(), 0..200)) {
        let mut debouncer = Debouncer::new(ms(DELAY_MS));
        let mut now = 0u64;
        for op in ops {
            match op {
                Op::Schedule(v) => {
                    debouncer.schedule(ms(now), v);
                }
                Op::Advance(dt) => now += dt,
                Op::Poll => {
                    debouncer.poll(ms(now));
                }
                Op::Cancel => {
                    debouncer.cancel();
                }
            }
            let pending = u64::from(debouncer.is_pending());
            prop_assert_eq!(
                debouncer.fired() + debouncer.superseded() + debouncer.cancelled() + pending,
                debouncer.scheduled()
            );
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// 5. Separated bursts
// ═══════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn separated_bursts_fire_once_each(bursts in 1usize..10, spacing in (DELAY_MS + 1)..1000) {
        let mut debouncer = Debouncer::new(ms(DELAY_MS));
        let mut fired = 0usize;
        let mut now = 0u64;
        for _ in 0..bursts {
            for _ in 0..5 {
                debouncer.schedule(ms(now), ());
                now += 10;
            }
            now += spacing;
            if debouncer.poll(ms(now)).is_some() {
                fired += 1;
            }
        }
        prop_assert_eq!(fired, bursts);
    }
}
