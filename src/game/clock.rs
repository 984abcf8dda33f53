//! Simulation clock
//!
//! Time only advances through [`Clock::advance`], so every throttle and
//! cooldown in the simulation is driven by the elapsed time handed to
//! `tick` rather than by the wall clock.

use serde::Serialize;

/// Tick counter and elapsed simulation time
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Clock {
    /// Completed ticks since the session started
    pub tick: u64,
    /// Elapsed simulation time in milliseconds
    pub now_ms: f64,
    /// Time at which the session reached a terminal state
    pub stopped_at_ms: Option<f64>,
}

impl Clock {
    pub fn new() -> Self {
        Self {
            tick: 0,
            now_ms: 0.0,
            stopped_at_ms: None,
        }
    }

    /// Freeze the session. Time keeps advancing so delayed effects can
    /// still fire, but the survival time is fixed here.
    pub fn stop(&mut self) {
        if self.stopped_at_ms.is_none() {
            self.stopped_at_ms = Some(self.now_ms);
        }
    }

    /// Simulated time the session was live
    pub fn survival_ms(&self) -> f64 {
        self.stopped_at_ms.unwrap_or(self.now_ms)
    }

    /// Advance by one tick of `dt_ms` milliseconds. Negative or non-finite
    /// deltas count as zero.
    pub fn advance(&mut self, dt_ms: f64) {
        let dt = if dt_ms.is_finite() { dt_ms.max(0.0) } else { 0.0 };
        self.tick += 1;
        self.now_ms += dt;
    }
}
