#![forbid(unsafe_code)]

//! Owned timer handles.
//!
//! Every deferred or periodic concern on the controller is an explicit
//! handle with its own `start`/`stop`/`is_active` — nothing is captured
//! in closures, so teardown stays auditable. Timers never schedule
//! anything themselves: the owner polls them with its current `now`,
//! which makes them deterministic under test and immune to callback
//! leaks.
//!
//! # Contract
//!
//! - Starting a live timer replaces it; the previous schedule cannot
//!   leak or double-fire.
//! - Stopping is idempotent and safe on a never-started handle.
//! - [`IntervalTimer::poll`] reports how many periods elapsed, so parity
//!   consumers (cursor blink) stay correct across a stalled loop.

use std::time::{Duration, Instant};

/// A periodic timer polled by its owner.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    period: Duration,
    next_due: Option<Instant>,
}

impl IntervalTimer {
    /// Create a stopped interval timer.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            period: if period.is_zero() {
                Duration::from_nanos(1)
            } else {
                period
            },
            next_due: None,
        }
    }

    /// Start (or restart) the timer; the first fire is one period from `now`.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.period);
    }

    /// Stop the timer. Idempotent.
    pub fn stop(&mut self) {
        self.next_due = None;
    }

    /// Whether the timer is running.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    /// Number of periods that elapsed since the last poll.
    ///
    /// Advances the schedule past `now`; returns 0 while stopped or not
    /// yet due.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some(due) = self.next_due else {
            return 0;
        };
        if now < due {
            return 0;
        }
        let behind = now.duration_since(due);
        let periods = (behind.as_nanos() / self.period.as_nanos()) as u32 + 1;
        self.next_due = Some(due + self.period * periods);
        periods
    }
}

/// A one-shot timer polled by its owner.
#[derive(Debug, Clone, Default)]
pub struct DeadlineTimer {
    due: Option<Instant>,
}

impl DeadlineTimer {
    /// Create an unarmed deadline timer.
    #[must_use]
    pub const fn new() -> Self {
        Self { due: None }
    }

    /// Arm (or re-arm) the timer to fire `delay` from `now`. Re-arming
    /// replaces any pending deadline — debounce, not throttle.
    pub fn arm(&mut self, now: Instant, delay: Duration) {
        self.due = Some(now + delay);
    }

    /// Cancel a pending deadline. Idempotent.
    pub fn cancel(&mut self) {
        self.due = None;
    }

    /// Whether a deadline is pending.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.due.is_some()
    }

    /// Fire if the deadline passed. Fires at most once per arm.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.due {
            Some(due) if now >= due => {
                self.due = None;
                true
            }
            _ => false,
        }
    }
}
