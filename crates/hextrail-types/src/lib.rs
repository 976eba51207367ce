//! Shared type definitions for the HexTrail simulation.
//!
//! Types defined here are used by every crate in the workspace. Types the
//! renderer consumes flow to `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- Sequential agent identifiers
//! - [`geometry`] -- Points, canonical cell keys, and the six directions
//! - [`enums`] -- Movement strategies and turn preference
//! - [`trace`] -- Trace segments and the per-frame render snapshot

pub mod enums;
pub mod geometry;
pub mod ids;
pub mod trace;

// Re-export all public types at crate root for convenience.
pub use enums::{Strategy, TurnPreference};
pub use geometry::{CellKey, DIRECTION_COUNT, Direction, Point};
pub use ids::{AgentId, IdSequence};
pub use trace::{OwnerTrace, RenderSnapshot, StrategyFitnessRow, TraceSegment, TraceState};
