//! Simulation core for HexTrail.
//!
//! This crate ties the lattice and agent layers into a running simulation:
//! configuration, the clock, the per-tick phase cycle, the render snapshot
//! handed to an external renderer, and the async loop that paces ticks.
//!
//! # Modules
//!
//! - [`config`] -- YAML configuration with defaults and validation
//! - [`clock`] -- Tick counter, simulation time, step and spawn pacing
//! - [`tick`] -- [`SimulationState`] and the phase cycle ([`run_tick`])
//! - [`render`] -- [`RenderSnapshot`] assembly and per-frame segment color
//! - [`operator`] -- Pause, resume, stop, and run bounds
//! - [`runner`] -- The async tick loop ([`run_simulation`])
//!
//! [`RenderSnapshot`]: hextrail_types::RenderSnapshot

pub mod clock;
pub mod config;
pub mod operator;
pub mod render;
pub mod runner;
pub mod tick;

pub use clock::{ClockError, SimClock};
pub use config::{ConfigError, SimulationConfig};
pub use operator::{RunControl, SimulationEndReason};
pub use render::{SegmentColor, segment_color, snapshot};
pub use runner::{
    NoOpCallback, RunnerError, SimulationResult, TickCallback, log_simulation_end, run_simulation,
};
pub use tick::{
    BuildError, RetireReason, Retirement, SimulationState, SpawnOutcome, TickError, TickSummary,
    run_tick,
};
