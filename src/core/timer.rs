//! Timers driven by the event loop.
//! The loop measures elapsed time with [`Clock`] and feeds it to the timers,
//! which decide on their own when to fire.

use std::time::{Duration, Instant};

/// Tracks delta time between loop iterations
#[derive(Debug)]
pub struct Clock {
    last_tick: Instant,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
        }
    }

    /// Get time elapsed since the last tick and advance the clock
    pub fn tick(&mut self) -> Duration {
        let now = Instant::now();
        let delta = now.duration_since(self.last_tick);
        self.last_tick = now;
        delta
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixed cadence timer - fires once per interval
#[derive(Debug, Clone, Copy)]
pub struct FixedHz {
    interval: Duration,
    accumulator: Duration,
}

impl FixedHz {
    /// Create timer that fires every `interval`
    pub fn every(interval: Duration) -> Self {
        Self {
            interval,
            accumulator: Duration::ZERO,
        }
    }

    /// Create timer that fires at given frequency
    pub fn new(hz: f32) -> Self {
        Self::every(Duration::from_secs_f32(1.0 / hz))
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Update with delta, returns true if should fire.
    /// A long stall fires once, not once per missed interval.
    pub fn tick(&mut self, delta: Duration) -> bool {
        self.accumulator += delta;

        if self.accumulator >= self.interval {
            self.accumulator = if self.accumulator >= self.interval * 2 {
                Duration::ZERO
            } else {
                self.accumulator - self.interval
            };
            true
        } else {
            false
        }
    }

    /// Time left until the next fire
    pub fn remaining(&self) -> Duration {
        self.interval.saturating_sub(self.accumulator)
    }
}
