//! Tick timers
//!
//! Turn elapsed frame time into discrete simulation ticks.

use std::time::Duration;

/// Fires once per fixed interval of accumulated time
#[derive(Debug, Clone)]
pub struct TickTimer {
    /// Interval between ticks
    interval: Duration,
    /// Time since last tick
    since_last_tick: Duration,
    running: bool,
}

impl TickTimer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            since_last_tick: Duration::ZERO,
            running: true,
        }
    }

    /// Advance time and return how many ticks elapsed
    pub fn update(&mut self, delta: Duration) -> u32 {
        if !self.running || self.interval.is_zero() {
            return 0;
        }

        self.since_last_tick += delta;
        let mut ticks = 0;
        while self.since_last_tick >= self.interval {
            self.since_last_tick -= self.interval;
            ticks += 1;
        }
        ticks
    }

    /// Stop firing; pending time is discarded
    pub fn stop(&mut self) {
        self.running = false;
        self.since_last_tick = Duration::ZERO;
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Reset the timer
    pub fn reset(&mut self) {
        self.since_last_tick = Duration::ZERO;
    }
}
