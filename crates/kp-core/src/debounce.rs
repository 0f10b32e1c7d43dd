#![forbid(unsafe_code)]

//! Single-slot debouncing for bursty host events.
//!
//! Scroll and intersection observations arrive in bursts. Acting on each one
//! wastes work and makes the navigation flicker, so callers funnel them
//! through a [`Debouncer`] and only act once the burst settles.
//!
//! # Design
//!
//! The debouncer holds at most one pending timer. Scheduling while a timer is
//! pending cancels it and starts a new one at `now + delay` ("latest wins").
//! Nothing is queued: superseded payloads are dropped.
//!
//! Time is supplied by the caller as a monotonic [`Duration`] since an
//! arbitrary origin, so the same code runs under the browser clock and under
//! a deterministic test clock.
//!
//! # Usage
//!
//! ```
//! use kp_core::debounce::Debouncer;
//! use web_time::Duration;
//!
//! let mut debouncer = Debouncer::new(Duration::from_millis(150));
//! debouncer.schedule(Duration::from_millis(0), "first");
//! debouncer.schedule(Duration::from_millis(100), "second");
//!
//! // 150ms after the *last* schedule call, only the latest payload fires.
//! assert_eq!(debouncer.poll(Duration::from_millis(200)), None);
//! assert_eq!(debouncer.poll(Duration::from_millis(250)), Some("second"));
//! assert_eq!(debouncer.poll(Duration::from_millis(400)), None);
//! ```

use web_time::Duration;

/// A pending timer and its payload.
#[derive(Debug, Clone)]
struct Pending<T> {
    due: Duration,
    value: T,
}

/// Single-slot pending timer with cancel-and-reschedule semantics.
///
/// # Thread Safety
///
/// Not thread-safe; intended for the single UI thread.
///
/// # Invariants
///
/// 1. At most one payload is pending.
/// 2. `poll(now)` yields the payload at most once, and only when
///    `now >= due`.
/// 3. `fired() + superseded() + cancelled() + is_pending() as u64 ==
///    scheduled()`.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
    scheduled: u64,
    superseded: u64,
    cancelled: u64,
    fired: u64,
}

impl<T> Debouncer<T> {
    /// Create a debouncer with the given settle delay.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            scheduled: 0,
            superseded: 0,
            cancelled: 0,
            fired: 0,
        }
    }

    /// Settle delay.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `value` to fire at `now + delay`, replacing any pending one.
    ///
    /// Returns `true` if a pending payload was superseded.
    pub fn schedule(&mut self, now: Duration, value: T) -> bool {
        self.schedule_at(now.saturating_add(self.delay), value)
    }

    /// Schedule `value` to fire at an absolute time, replacing any pending one.
    pub fn schedule_at(&mut self, due: Duration, value: T) -> bool {
        self.scheduled = self.scheduled.saturating_add(1);
        let superseded = self.pending.replace(Pending { due, value }).is_some();
        if superseded {
            self.superseded = self.superseded.saturating_add(1);
        }
        superseded
    }

    /// Take the pending payload if its timer has elapsed.
    pub fn poll(&mut self, now: Duration) -> Option<T> {
        match &self.pending {
            Some(p) if now >= p.due => {
                self.fired = self.fired.saturating_add(1);
                self.pending.take().map(|p| p.value)
            }
            _ => None,
        }
    }

    /// Drop the pending payload without firing it.
    pub fn cancel(&mut self) -> Option<T> {
        let taken = self.pending.take().map(|p| p.value);
        if taken.is_some() {
            self.cancelled = self.cancelled.saturating_add(1);
        }
        taken
    }

    /// Whether a timer is pending.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending timer fires, if any.
    #[must_use]
    pub fn due_at(&self) -> Option<Duration> {
        self.pending.as_ref().map(|p| p.due)
    }

    /// Borrow the pending payload.
    #[must_use]
    pub fn peek(&self) -> Option<&T> {
        self.pending.as_ref().map(|p| &p.value)
    }

    /// Total `schedule` calls.
    #[must_use]
    pub const fn scheduled(&self) -> u64 {
        self.scheduled
    }

    /// Payloads replaced before they fired.
    #[must_use]
    pub const fn superseded(&self) -> u64 {
        self.superseded
    }

    /// Payloads dropped through [`Debouncer::cancel`].
    #[must_use]
    pub const fn cancelled(&self) -> u64 {
        self.cancelled
    }

    /// Payloads delivered by [`Debouncer::poll`].
    #[must_use]
    pub const fn fired(&self) -> u64 {
        self.fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: fn(u64) -> Duration = Duration::from_millis;

    #[test]
    fn new_debouncer_has_no_pending() {
        let mut d: Debouncer<()> = Debouncer::new(MS(150));
        assert!(!d.is_pending());
        assert_eq!(d.due_at(), None);
        assert_eq!(d.poll(MS(10_000)), None);
        assert_eq!(d.fired(), 0);
    }

    #[test]
    fn fires_exactly_at_due_time() {
        let mut d = Debouncer::new(MS(150));
        d.schedule(MS(1000), 7);
        assert_eq!(d.due_at(), Some(MS(1150)));
        assert_eq!(d.poll(MS(1149)), None);
        assert_eq!(d.poll(MS(1150)), Some(7));
        assert!(!d.is_pending());
    }

    #[test]
    fn reschedule_pushes_deadline_and_keeps_latest() {
        let mut d = Debouncer::new(MS(150));
        assert!(!d.schedule(MS(0), 'a'));
        assert!(d.schedule(MS(100), 'b'));
        assert!(d.schedule(MS(200), 'c'));
        assert_eq!(d.poll(MS(300)), None);
        assert_eq!(d.peek(), Some(&'c'));
        assert_eq!(d.poll(MS(350)), Some('c'));
        assert_eq!(d.superseded(), 2);
        assert_eq!(d.fired(), 1);
    }

    #[test]
    fn cancel_drops_payload() {
        let mut d = Debouncer::new(MS(50));
        d.schedule(MS(0), "x");
        assert_eq!(d.cancel(), Some("x"));
        assert_eq!(d.cancel(), None);
        assert_eq!(d.poll(MS(1000)), None);
        assert_eq!(d.cancelled(), 1);
    }

    #[test]
    fn zero_delay_fires_on_same_poll() {
        let mut d = Debouncer::new(Duration::ZERO);
        d.schedule(MS(5), ());
        assert_eq!(d.poll(MS(5)), Some(()));
    }

    #[test]
    fn schedule_saturates_near_duration_max() {
        let mut d = Debouncer::new(MS(150));
        d.schedule(Duration::MAX, 1);
        assert_eq!(d.due_at(), Some(Duration::MAX));
        assert_eq!(d.poll(Duration::MAX), Some(1));
    }
}
