//! Deterministic simulation time and the day/night cycle.
//!
//! The spawn admission check weights its species draw by day/night, so time
//! advancement is tick-based and replayable.

use boxcraft_core::SimTick;
use serde::{Deserialize, Serialize};

/// Ticks per in-game day (20 minutes real time at 20 TPS).
pub const TICKS_PER_DAY: u64 = 24_000;

/// Simulation time state tracking day/night cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current simulation tick.
    pub tick: SimTick,
    /// Ticks per in-game day.
    pub ticks_per_day: u64,
}

impl SimTime {
    /// Create a new SimTime starting at tick 0 (dawn).
    pub fn new(ticks_per_day: u64) -> Self {
        Self {
            tick: SimTick::ZERO,
            ticks_per_day: ticks_per_day.max(2),
        }
    }

    /// Advance time by one tick.
    pub fn advance(&mut self) {
        self.tick = self.tick.advance(1);
    }

    /// Time of day as a fraction: 0.0 = dawn, 0.5 = dusk, wrapping at 1.0.
    pub fn time_of_day(&self) -> f64 {
        let tick_in_day = self.tick.0 % self.ticks_per_day;
        tick_in_day as f64 / self.ticks_per_day as f64
    }

    /// Whether it is currently night (second half of the day cycle).
    pub fn is_night(&self) -> bool {
        self.time_of_day() >= 0.5
    }
}

impl Default for SimTime {
    fn default() -> Self {
        Self::new(TICKS_PER_DAY)
    }
}
