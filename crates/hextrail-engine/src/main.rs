//! Engine binary for the HexTrail simulation.
//!
//! Loads configuration, builds the simulation, and runs the paced tick
//! loop until a bound is reached or the process receives Ctrl-C.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `hextrail-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Build the simulation state and spawn the initial agents
//! 4. Create run control from the simulation bounds
//! 5. Run the simulation loop, writing render snapshots
//! 6. Log the result and the fitness table

mod error;
mod snapshot_callback;

use std::path::Path;
use std::sync::Arc;

use hextrail_core::{RunControl, SimulationConfig, SimulationState, runner};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::snapshot_callback::SnapshotCallback;

/// Configuration file looked up in the working directory.
const CONFIG_PATH: &str = "hextrail-config.yaml";

/// File the render snapshot is written to.
const SNAPSHOT_PATH: &str = "hextrail-snapshot.json";

/// Ticks between render snapshots.
const SNAPSHOT_EVERY_TICKS: u64 = 10;

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if configuration, construction, or the run fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration; logging needs its level.
    let loaded = load_config();

    // 2. Initialize structured logging.
    let default_level = loaded
        .as_ref()
        .map_or_else(|_| "info".to_owned(), |c| c.logging.level.clone());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(true)
        .init();

    info!("hextrail-engine starting");
    let config = loaded?;
    info!(
        world_name = %config.world.name,
        seed = config.world.seed,
        columns = config.world.columns,
        rows = config.world.rows,
        max_agents = config.population.max_agents,
        step_delay_ms = config.timing.step_delay_ms,
        "Configuration loaded"
    );

    // 3. Build the simulation.
    let mut state = SimulationState::new(&config).map_err(EngineError::from)?;

    // 4. Run control, stopped by Ctrl-C.
    let control = Arc::new(RunControl::new(&config.simulation));
    {
        let control = Arc::clone(&control);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Ctrl-C received, stopping after the current tick");
                    control.request_stop();
                }
                Err(e) => warn!(error = %e, "failed to listen for Ctrl-C"),
            }
        });
    }

    // 5. Run the simulation.
    let mut callback = SnapshotCallback::new(SNAPSHOT_PATH, SNAPSHOT_EVERY_TICKS);
    let result = runner::run_simulation(&mut state, &control, &mut callback)
        .await
        .map_err(EngineError::from)?;

    // 6. Log results.
    runner::log_simulation_end(&result, &state);
    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "hextrail-engine shutdown complete"
    );

    Ok(())
}

/// Load the simulation configuration from `hextrail-config.yaml`.
///
/// Looks for the config file relative to the current working directory and
/// falls back to defaults when it is absent.
fn load_config() -> Result<SimulationConfig, EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok(SimulationConfig::from_file(config_path)?)
    } else {
        let mut config = SimulationConfig::default();
        config.world.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }
}
