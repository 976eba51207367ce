//! Agents, movement strategies, and evolutionary selection for the HexTrail simulation.
//!
//! This crate contains the logic layer for agents -- everything that
//! decides what an agent wants to do, whether it may, and who wins when
//! several want the same cell. It never mutates the shared board; the tick
//! cycle in `hextrail-core` commits the outcomes.
//!
//! # Modules
//!
//! - [`agent`] -- [`Agent`] state and move bookkeeping
//! - [`conflict`] -- First-claimant-wins arbitration of simultaneous moves
//! - [`error`] -- Error types ([`AgentError`])
//! - [`fitness`] -- Per-strategy aggregates and roulette selection
//! - [`legality`] -- Four-stage move legality pipeline
//! - [`population`] -- Spawn planning, ceiling, retirement
//! - [`strategy`] -- Direction orderings for each [`Strategy`]
//!
//! [`Strategy`]: hextrail_types::Strategy

pub mod agent;
pub mod conflict;
pub mod error;
pub mod fitness;
pub mod legality;
pub mod population;
pub mod strategy;

// Re-export primary types at crate root for convenience.
pub use agent::{Agent, AgentSpec};
pub use conflict::{HeadOnPair, IntentOutcome, MoveIntent, MoveResolution, resolve_moves};
pub use error::AgentError;
pub use fitness::{FitnessTracker, StrategyFitness};
pub use legality::{BoardView, MoveRejection};
pub use population::{PopulationManager, SpawnContext, find_free_cell};
pub use strategy::propose_directions;
