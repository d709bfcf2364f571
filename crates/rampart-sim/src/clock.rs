//! Simulation clock: turns raw host frame deltas into bounded, speed-scaled
//! simulation steps.

use rampart_core::constants::{MAX_SPEED_MULTIPLIER, MAX_TICK_DELTA_SECS};
use rampart_core::types::SimTime;

#[derive(Debug, Clone, Copy)]
pub struct SimClock {
    time: SimTime,
    speed: u8,
}

impl Default for SimClock {
    fn default() -> Self {
        Self {
            time: SimTime::default(),
            speed: 1,
        }
    }
}

impl SimClock {
    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn speed(&self) -> u8 {
        self.speed
    }

    /// Select the speed multiplier; returns the value actually applied.
    pub fn set_speed(&mut self, multiplier: u8) -> u8 {
        self.speed = multiplier.clamp(1, MAX_SPEED_MULTIPLIER);
        self.speed
    }

    /// Simulation seconds a raw frame delta is worth. Non-finite or negative
    /// deltas count as zero.
    pub fn scaled_delta(&self, raw_secs: f64) -> f64 {
        if !raw_secs.is_finite() {
            return 0.0;
        }
        raw_secs.clamp(0.0, MAX_TICK_DELTA_SECS) * self.speed as f64
    }

    /// Advance by one frame and return the simulation delta applied.
    pub fn advance(&mut self, raw_secs: f64) -> f64 {
        let dt = self.scaled_delta(raw_secs);
        self.time.advance(dt);
        dt
    }
}
