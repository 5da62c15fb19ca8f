//! Timer primitives - virtual clock, one-shot timers, intervals, blink phase
//!
//! Everything runs on one thread against a virtual clock that the host
//! advances. Timers are plain values owned by the machine that armed them:
//! dropping the machine drops its timers, so a stale timer can never fire
//! into a state that has already been replaced.
//!
//! Firing is always reported at the timer's *due* time, and follow-up timers
//! are armed relative to that due time. Advancing the clock by 3s in one call
//! therefore produces exactly the same transitions as thirty 100ms calls.
//!
//! # Example
//!
//! ```ignore
//! use scrolly_engine::state::timer::{Clock, Blink};
//! use std::time::Duration;
//!
//! let clock = Clock::new();
//! let mut blink = Blink::new(clock.now(), Duration::from_millis(400)).unwrap();
//!
//! clock.advance(Duration::from_millis(400));
//! while let Some(due) = blink.next_deadline().filter(|d| *d <= clock.now()) {
//!     blink.fire(due);
//! }
//! assert!(!blink.visible());
//! ```

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

// =============================================================================
// CLOCK
// =============================================================================

/// Shared virtual clock. Clones observe the same time.
#[derive(Debug, Clone, Default)]
pub struct Clock {
    now: Rc<Cell<Duration>>,
}

impl Clock {
    /// Create a clock at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time since the clock was created.
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    /// Move time forward by `delta` and return the new time.
    pub fn advance(&self, delta: Duration) -> Duration {
        let next = self.now.get().saturating_add(delta);
        self.now.set(next);
        next
    }
}

/// Earlier of two optional deadlines.
pub fn earliest(a: Option<Duration>, b: Option<Duration>) -> Option<Duration> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

// =============================================================================
// ONE-SHOT
// =============================================================================

/// Single-shot timer due at a fixed instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OneShot {
    due: Duration,
}

impl OneShot {
    /// Timer due `delay` after `now`, saturating at `Duration::MAX`.
    pub fn after(now: Duration, delay: Duration) -> Self {
        Self {
            due: now.saturating_add(delay),
        }
    }

    /// Timer due `delay` after `now`, or `None` if that instant is unrepresentable.
    pub fn checked_after(now: Duration, delay: Duration) -> Option<Self> {
        now.checked_add(delay).map(|due| Self { due })
    }

    pub fn due(&self) -> Duration {
        self.due
    }

    pub fn is_due(&self, now: Duration) -> bool {
        self.due <= now
    }
}

// =============================================================================
// INTERVAL
// =============================================================================

/// Repeating timer with a fixed period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    period: Duration,
    /// `None` once the next tick would overflow.
    next_due: Option<Duration>,
}

impl Interval {
    /// Start an interval at `now`. A zero period would fire forever at one
    /// instant, so it yields `None`, as does a first tick past `Duration::MAX`.
    pub fn every(now: Duration, period: Duration) -> Option<Self> {
        if period.is_zero() {
            return None;
        }
        let next_due = now.checked_add(period)?;
        Some(Self {
            period,
            next_due: Some(next_due),
        })
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn next_due(&self) -> Option<Duration> {
        self.next_due
    }

    /// Consume one tick if it is due at `at`. Returns true when it fired.
    pub fn fire(&mut self, at: Duration) -> bool {
        let Some(due) = self.next_due.filter(|due| *due <= at) else {
            return false;
        };
        self.next_due = due.checked_add(self.period);
        true
    }
}

// =============================================================================
// BLINK
// =============================================================================

/// Visibility phase toggled on a fixed interval. Starts visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blink {
    interval: Interval,
    visible: bool,
}

impl Blink {
    pub fn new(now: Duration, period: Duration) -> Option<Self> {
        Interval::every(now, period).map(|interval| Self {
            interval,
            visible: true,
        })
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.interval.next_due()
    }

    pub fn fire(&mut self, at: Duration) -> bool {
        if self.interval.fire(at) {
            self.visible = !self.visible;
            return true;
        }
        false
    }
}

// =============================================================================
// TESTS
// =============================================================================
