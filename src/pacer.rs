//! Deadline scheduler for the push-to-talk sample loop.
//!
//! The next deadline is advanced by exactly one period after every tick,
//! never recomputed from "now". A late tick is followed by shorter waits
//! until the schedule is caught up, so the error stays bounded instead of
//! accumulating.
//!
//! ```text
//! due:   t0      t0+P    t0+2P   t0+3P
//!        |       |       |       |
//! tick:  |--w--S |--w--S |-----------S|S      (late tick, then catch-up)
//! ```

use crate::hal::Clock;

/// Absolute-time sample scheduler.
#[derive(Debug, Clone)]
pub struct Pacer {
    period_us: u64,
    due_us: u64,
    ticks: u64,
    late_ticks: u32,
}

impl Pacer {
    /// Create a pacer with the given period (µs). Not started.
    pub fn new(period_us: u64) -> Self {
        Self {
            period_us: period_us.max(1),
            due_us: 0,
            ticks: 0,
            late_ticks: 0,
        }
    }

    /// Pacer for `sample_rate` Hz (period = 1 000 000 / rate, truncated).
    pub fn from_rate(sample_rate: u32) -> Self {
        Self::new(1_000_000 / sample_rate.max(1) as u64)
    }

    /// Restart the schedule: the first tick is due at `now_us`.
    pub fn start(&mut self, now_us: u64) {
        self.due_us = now_us;
        self.ticks = 0;
        self.late_ticks = 0;
    }

    /// Spin until the current deadline, then schedule the next one.
    ///
    /// Returns the deadline that was waited for.
    #[inline]
    pub fn await_next_tick<C: Clock + ?Sized>(&mut self, clock: &mut C) -> u64 {
        let due = self.due_us;
        let mut now = clock.now_us();
        if now >= due.saturating_add(self.period_us) {
            // Arrived a full period or more after the deadline
            self.late_ticks = self.late_ticks.saturating_add(1);
        }
        while now < due {
            core::hint::spin_loop();
            now = clock.now_us();
        }
        self.due_us = due + self.period_us;
        self.ticks += 1;
        due
    }

    /// Deadline of the next tick.
    #[inline]
    pub fn due_us(&self) -> u64 {
        self.due_us
    }

    #[inline]
    pub fn period_us(&self) -> u64 {
        self.period_us
    }

    /// Ticks completed since [`Pacer::start`].
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Ticks that began at least one full period late since [`Pacer::start`].
    #[inline]
    pub fn late_ticks(&self) -> u32 {
        self.late_ticks
    }
}
