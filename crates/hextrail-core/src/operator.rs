//! Run control shared between the tick loop and whoever drives it.
//!
//! All mutable fields are atomics so a signal handler or another task can
//! pause, resume, or stop the loop without taking a lock on the hot path.
//! The control also owns the run's start instant. The `now` handed to every
//! tick is the time elapsed since start minus the time spent paused, so a
//! pause freezes agent ages and trace fades.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::Notify;
use tokio::time::Instant;

use crate::config::SimulationBoundsConfig;

/// Reason why the simulation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationEndReason {
    /// Reached the configured `max_ticks` limit.
    MaxTicksReached,
    /// Reached the configured `max_real_time_seconds` limit.
    MaxRealTimeReached,
    /// A stop was requested.
    OperatorStop,
}

/// Shared run control.
#[derive(Debug)]
pub struct RunControl {
    /// Whether the loop is paused.
    paused: AtomicBool,

    /// Wakes the loop when resumed.
    resume_notify: Notify,

    /// Whether a stop has been requested.
    stop_requested: AtomicBool,

    /// When the run started.
    started_at: Instant,

    /// Nanoseconds spent in completed pauses.
    paused_nanos: AtomicU64,

    /// Offset from `started_at`, in nanoseconds, where the current pause began.
    paused_at_nanos: AtomicU64,

    /// Maximum number of ticks (0 = unlimited).
    max_ticks: u64,

    /// Maximum wall-clock seconds (0 = unlimited).
    max_real_time_seconds: u64,
}

impl RunControl {
    /// Create run control from the configured bounds, starting the clock now.
    pub fn new(bounds: &SimulationBoundsConfig) -> Self {
        Self {
            paused: AtomicBool::new(false),
            resume_notify: Notify::new(),
            stop_requested: AtomicBool::new(false),
            started_at: Instant::now(),
            paused_nanos: AtomicU64::new(0),
            paused_at_nanos: AtomicU64::new(0),
            max_ticks: bounds.max_ticks,
            max_real_time_seconds: bounds.max_real_time_seconds,
        }
    }

    /// Check whether the loop is paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Pause the loop. It sleeps until resumed.
    pub fn pause(&self) {
        if !self.paused.swap(true, Ordering::AcqRel) {
            self.paused_at_nanos.store(self.wall_nanos(), Ordering::Release);
        }
    }

    /// Resume the loop and wake it.
    pub fn resume(&self) {
        if self.paused.swap(false, Ordering::AcqRel) {
            let paused_for = self
                .wall_nanos()
                .saturating_sub(self.paused_at_nanos.load(Ordering::Acquire));
            self.paused_nanos.fetch_add(paused_for, Ordering::AcqRel);
        }
        self.resume_notify.notify_one();
    }

    /// Wait until the loop is no longer paused.
    pub async fn wait_if_paused(&self) {
        while self.paused.load(Ordering::Acquire) {
            self.resume_notify.notified().await;
        }
    }

    /// Request a clean stop before the next tick.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        // A paused loop must wake up to see the stop.
        self.resume();
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Seconds the run has spent unpaused since it started.
    pub fn elapsed_secs(&self) -> f64 {
        let wall = self.wall_nanos();
        let mut paused = self.paused_nanos.load(Ordering::Acquire);
        if self.is_paused() {
            let current = wall.saturating_sub(self.paused_at_nanos.load(Ordering::Acquire));
            paused = paused.saturating_add(current);
        }
        Duration::from_nanos(wall.saturating_sub(paused)).as_secs_f64()
    }

    /// Wall-clock nanoseconds since the run started.
    fn wall_nanos(&self) -> u64 {
        u64::try_from(self.started_at.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }

    /// Returns `true` if `max_ticks > 0` and `current_tick >= max_ticks`.
    pub const fn tick_limit_reached(&self, current_tick: u64) -> bool {
        self.max_ticks > 0 && current_tick >= self.max_ticks
    }

    /// Returns `true` if `max_real_time_seconds > 0` and that many
    /// wall-clock seconds have elapsed, paused time included.
    pub fn time_limit_reached(&self) -> bool {
        self.max_real_time_seconds > 0
            && self.started_at.elapsed().as_secs() >= self.max_real_time_seconds
    }

    /// Configured max ticks.
    pub const fn max_ticks(&self) -> u64 {
        self.max_ticks
    }

    /// Configured max real-time seconds.
    pub const fn max_real_time_seconds(&self) -> u64 {
        self.max_real_time_seconds
    }
}
