//! Simulation loop runner.
//!
//! [`run_simulation`] is the top-level async function that drives the tick
//! loop with support for:
//!
//! - **Bounded runs**: stop after `max_ticks` or `max_real_time_seconds`
//! - **Pause/resume**: a paused loop sleeps until resumed
//! - **Clean shutdown**: a stop request ends the loop before the next tick
//!
//! Ticks are paced by sleeping `step_delay_ms` between them; the `now` of
//! each tick is the time the run has spent unpaused, so a pause never ages
//! agents or fades traces.

use std::sync::Arc;

use tracing::{info, warn};

use crate::operator::{RunControl, SimulationEndReason};
use crate::tick::{self, SimulationState, TickError, TickSummary};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// Result of the simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Total number of ticks executed.
    pub total_ticks: u64,
}

/// Callback invoked after each tick completes.
pub trait TickCallback: Send {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, summary: &TickSummary, state: &SimulationState);
}

/// A no-op tick callback.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _state: &SimulationState) {}
}

/// Run the simulation loop until a termination condition is met.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick execution fails unrecoverably.
pub async fn run_simulation(
    state: &mut SimulationState,
    control: &Arc<RunControl>,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    let mut last_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;
    let step_delay_ms = state.config.timing.step_delay_ms;

    info!(
        max_ticks = control.max_ticks(),
        max_real_time_seconds = control.max_real_time_seconds(),
        step_delay_ms,
        agents = state.population.len(),
        "Simulation starting"
    );

    loop {
        // --- Check pause ---
        if control.is_paused() {
            info!("Simulation paused, waiting for resume...");
            control.wait_if_paused().await;
            info!("Simulation resumed");
        }

        // --- Check stop request (before tick) ---
        if control.is_stop_requested() {
            info!("Stop requested");
            return Ok(SimulationResult {
                end_reason: SimulationEndReason::OperatorStop,
                final_summary: last_summary,
                total_ticks,
            });
        }

        // --- Check time limit (before tick) ---
        if control.time_limit_reached() {
            info!(
                max_seconds = control.max_real_time_seconds(),
                elapsed = control.elapsed_secs(),
                "Real-time limit reached"
            );
            return Ok(SimulationResult {
                end_reason: SimulationEndReason::MaxRealTimeReached,
                final_summary: last_summary,
                total_ticks,
            });
        }

        // --- Execute tick ---
        let summary = tick::run_tick(state, control.elapsed_secs())?;
        total_ticks = total_ticks.saturating_add(1);

        // --- Notify callback ---
        callback.on_tick(&summary, state);

        // --- Check tick limit (after tick) ---
        if control.tick_limit_reached(summary.tick) {
            info!(
                tick = summary.tick,
                max_ticks = control.max_ticks(),
                "Tick limit reached"
            );
            return Ok(SimulationResult {
                end_reason: SimulationEndReason::MaxTicksReached,
                final_summary: Some(summary),
                total_ticks,
            });
        }

        last_summary = Some(summary);

        // --- Sleep for step delay ---
        if step_delay_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(step_delay_ms)).await;
        } else {
            tokio::task::yield_now().await;
        }
    }
}

/// Log the end of a run and the final fitness table.
pub fn log_simulation_end(result: &SimulationResult, state: &SimulationState) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        agents_alive = state.population.len(),
        total_spawned = state.population.total_spawned(),
        traces = state.traces.owner_count(),
        "Simulation ended"
    );

    if result.final_summary.is_none() {
        warn!("Simulation ended with no ticks executed");
    }

    for row in state.fitness.report() {
        info!(
            strategy = %row.strategy,
            count = row.count,
            avg_lifetime = row.avg_lifetime,
            avg_distance = row.avg_distance,
            avg_cells = row.avg_cells,
            weight = row.weight,
            "Strategy fitness"
        );
    }
}
