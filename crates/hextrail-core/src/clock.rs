//! Simulation clock and pacing.
//!
//! The clock owns the tick counter and the simulation time of the last
//! tick. Time itself comes from outside: the runner passes wall-clock
//! seconds since start, tests pass whatever sequence they need. The clock
//! also remembers when ticks and spawn attempts last ran so the state can
//! honor the configured step and spawn delays.
//!
//! Time never moves backwards. A `now` earlier than the current time is
//! treated as the current time.

use crate::config::TimingConfig;

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// Invalid pacing configuration.
    #[error("invalid clock configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// Tick counter plus simulation time and pacing state.
#[derive(Debug, Clone, PartialEq)]
pub struct SimClock {
    /// Number of ticks executed so far.
    tick: u64,
    /// Simulation time of the most recent tick, in seconds.
    time: f64,
    /// When the most recent tick ran.
    last_tick_at: Option<f64>,
    /// When the most recent spawn attempt ran.
    last_spawn_at: Option<f64>,
    /// Minimum seconds between ticks.
    step_delay: f64,
    /// Minimum seconds between spawn attempts.
    spawn_delay: f64,
}

impl SimClock {
    /// Create a clock at tick 0, time 0.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if a delay is negative or not finite.
    pub fn new(step_delay: f64, spawn_delay: f64) -> Result<Self, ClockError> {
        for (name, value) in [("step_delay", step_delay), ("spawn_delay", spawn_delay)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ClockError::InvalidConfig {
                    reason: format!("{name} must be a non-negative number, got {value}"),
                });
            }
        }
        Ok(Self {
            tick: 0,
            time: 0.0,
            last_tick_at: None,
            last_spawn_at: None,
            step_delay,
            spawn_delay,
        })
    }

    /// Create a clock from the timing section of the configuration.
    pub fn from_config(config: &TimingConfig) -> Result<Self, ClockError> {
        Self::new(config.step_delay_secs(), config.spawn_delay_secs())
    }

    /// Number of ticks executed so far.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Simulation time of the most recent tick.
    pub const fn time(&self) -> f64 {
        self.time
    }

    /// Whether `step_delay` has elapsed since the last tick.
    pub fn tick_due(&self, now: f64) -> bool {
        self.last_tick_at.is_none_or(|at| now - at >= self.step_delay)
    }

    /// Whether `spawn_delay` has elapsed since the last spawn attempt.
    pub fn spawn_due(&self, now: f64) -> bool {
        self.last_spawn_at.is_none_or(|at| now - at >= self.spawn_delay)
    }

    /// Record a spawn attempt at `now`.
    pub const fn mark_spawn_attempt(&mut self, now: f64) {
        self.last_spawn_at = Some(now);
    }

    /// Advance to the next tick at time `now`, returning the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the counter is at `u64::MAX`.
    pub fn advance(&mut self, now: f64) -> Result<u64, ClockError> {
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        self.time = self.time.max(now);
        self.last_tick_at = Some(self.time);
        Ok(self.tick)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_clock_starts_at_zero() {
        let clock = SimClock::new(0.05, 0.5).unwrap();
        assert_eq!(clock.tick(), 0);
        assert!(clock.time().abs() < f64::EPSILON);
        assert!(clock.tick_due(0.0));
        assert!(clock.spawn_due(0.0));
    }

    #[test]
    fn negative_delay_is_rejected() {
        assert!(matches!(
            SimClock::new(-1.0, 0.5),
            Err(ClockError::InvalidConfig { .. })
        ));
        assert!(matches!(
            SimClock::new(0.0, f64::NAN),
            Err(ClockError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn advance_increments_and_gates_next_tick() {
        let mut clock = SimClock::new(0.05, 0.5).unwrap();
        assert_eq!(clock.advance(1.0).unwrap(), 1);
        assert!(!clock.tick_due(1.01));
        assert!(clock.tick_due(1.05));
        assert_eq!(clock.advance(1.05).unwrap(), 2);
        assert!((clock.time() - 1.05).abs() < 1e-12);
    }

    #[test]
    fn time_does_not_run_backwards() {
        let mut clock = SimClock::new(0.0, 0.0).unwrap();
        clock.advance(5.0).unwrap();
        clock.advance(3.0).unwrap();
        assert!((clock.time() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn spawn_gate_tracks_last_attempt() {
        let mut clock = SimClock::new(0.0, 0.5).unwrap();
        clock.mark_spawn_attempt(2.0);
        assert!(!clock.spawn_due(2.4));
        assert!(clock.spawn_due(2.5));
    }

    #[test]
    fn advance_overflow() {
        let mut clock = SimClock::new(0.0, 0.0).unwrap();
        clock.tick = u64::MAX;
        assert!(matches!(clock.advance(0.0), Err(ClockError::TickOverflow)));
    }
}
