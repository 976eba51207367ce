//! Error types for the hextrail-agents crate.
//!
//! Spawn failures are ordinary outcomes the tick cycle recovers from; they
//! are typed errors here so callers can match on the exact reason.

use hextrail_types::AgentId;

/// Errors that can occur during agent and population operations.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// No live agent with this id exists.
    #[error("unknown agent: {0}")]
    UnknownAgent(AgentId),

    /// The live population is already at its ceiling.
    #[error("population is at its ceiling of {max_agents} agents")]
    PopulationFull {
        /// Configured ceiling.
        max_agents: usize,
    },

    /// Neither random sampling nor the exhaustive scan found a free cell.
    #[error("no free cell after {attempts} random attempts and a full scan")]
    PositionExhausted {
        /// Number of random attempts made before scanning.
        attempts: u32,
    },

    /// A lattice or occupancy operation failed.
    #[error("grid error: {source}")]
    Grid {
        /// The underlying grid error.
        #[from]
        source: hextrail_grid::GridError,
    },
}
