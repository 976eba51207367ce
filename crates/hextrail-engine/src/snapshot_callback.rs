//! Tick callback that hands render snapshots to an external renderer.
//!
//! Every `every_ticks` ticks the callback serializes a [`RenderSnapshot`]
//! to JSON and replaces the file at its path. A renderer polls that file;
//! the engine itself never draws.
//!
//! [`RenderSnapshot`]: hextrail_types::RenderSnapshot

use std::path::PathBuf;

use hextrail_core::{SimulationState, TickCallback, TickSummary, render};
use tracing::{debug, warn};

use crate::error::EngineError;

/// Callback that periodically writes the render snapshot to disk.
pub struct SnapshotCallback {
    path: PathBuf,
    every_ticks: u64,
}

impl SnapshotCallback {
    /// Create a callback writing to `path` every `every_ticks` ticks.
    pub fn new(path: impl Into<PathBuf>, every_ticks: u64) -> Self {
        Self {
            path: path.into(),
            every_ticks: every_ticks.max(1),
        }
    }

    fn write(&self, state: &SimulationState) -> Result<usize, EngineError> {
        let snapshot = render::snapshot(state);
        let json = serde_json::to_vec(&snapshot).map_err(|e| EngineError::Snapshot {
            message: format!("failed to serialize snapshot: {e}"),
        })?;
        std::fs::write(&self.path, &json).map_err(|e| EngineError::Snapshot {
            message: format!("failed to write {}: {e}", self.path.display()),
        })?;
        Ok(json.len())
    }
}

impl TickCallback for SnapshotCallback {
    fn on_tick(&mut self, summary: &TickSummary, state: &SimulationState) {
        if summary.tick.checked_rem(self.every_ticks) != Some(0) {
            return;
        }
        match self.write(state) {
            Ok(bytes) => debug!(tick = summary.tick, bytes, "Render snapshot written"),
            Err(e) => warn!(tick = summary.tick, error = %e, "Render snapshot skipped"),
        }
    }
}
