//! Trace segment records and the read-only render snapshot.
//!
//! The simulation core never draws. Once per frame it hands the renderer a
//! [`RenderSnapshot`]: every stored segment plus a brightness state for
//! each owning agent.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::Strategy;
use crate::geometry::Point;
use crate::ids::AgentId;

/// One committed straight stroke of an agent's path.
///
/// A segment whose endpoints coincide is a "death dot" left when an agent
/// retires in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TraceSegment {
    /// Start point of the stroke.
    pub from: Point,
    /// End point of the stroke.
    pub to: Point,
    /// Agent that drew this segment.
    pub owner: AgentId,
    /// Fixed hue (degrees) inherited from the owner.
    pub hue_seed: f64,
    /// Simulation time at which the owner was born.
    pub birth_time: f64,
    /// Simulation time at which the segment was committed.
    pub created_at: f64,
    /// Position of this segment within its owner's trace.
    pub sequence_index: u64,
}

impl TraceSegment {
    /// Whether this is a zero-length death dot.
    pub fn is_dot(&self) -> bool {
        self.from.key() == self.to.key()
    }
}

/// Lifecycle state of an owner's trace as seen by the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum TraceState {
    /// Owner is alive; full brightness.
    Alive,
    /// Owner has retired; brightness in `[0, 1]` depends on time since death.
    Dead {
        /// Brightness multiplier.
        brightness: f64,
    },
    /// Owner's trace was removed since the previous snapshot.
    Evicted,
}

impl TraceState {
    /// Brightness multiplier to apply to the owner's segments.
    pub const fn brightness(self) -> f64 {
        match self {
            Self::Alive => 1.0,
            Self::Dead { brightness } => brightness,
            Self::Evicted => 0.0,
        }
    }
}

/// Trace state for a single owner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct OwnerTrace {
    /// The owning agent.
    pub owner: AgentId,
    /// Current lifecycle state.
    pub state: TraceState,
}

/// Aggregated fitness figures for one strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct StrategyFitnessRow {
    /// The strategy described by this row.
    pub strategy: Strategy,
    /// Number of retired agents recorded.
    pub count: u64,
    /// Mean lifetime in seconds.
    pub avg_lifetime: f64,
    /// Mean distance traveled.
    pub avg_distance: f64,
    /// Mean cells visited.
    pub avg_cells: f64,
    /// Current weight used for the next spawn draw.
    pub weight: f64,
}

/// Read-only copy of everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RenderSnapshot {
    /// Tick number at which the snapshot was taken.
    pub tick: u64,
    /// Simulation time of the snapshot, in seconds.
    pub time: f64,
    /// Stroke width, passed through from configuration.
    pub line_width: f64,
    /// Every stored segment in commit order.
    pub segments: Vec<TraceSegment>,
    /// Brightness state per owner.
    pub owners: Vec<OwnerTrace>,
    /// Per-strategy fitness table.
    pub fitness: Vec<StrategyFitnessRow>,
}
