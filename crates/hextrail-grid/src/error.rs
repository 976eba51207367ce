//! Error types for the `hextrail-grid` crate.

use hextrail_types::{AgentId, CellKey};

/// Errors that can occur during lattice and occupancy operations.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// The lattice cannot be built from the given dimensions.
    #[error("invalid grid dimensions: {reason}")]
    InvalidDimensions {
        /// Explanation of what is wrong.
        reason: String,
    },

    /// A commit tried to claim a cell that already has an owner.
    #[error("cell {key} is already owned by agent {owner}")]
    CellOccupied {
        /// The contested cell.
        key: CellKey,
        /// The agent currently holding it.
        owner: AgentId,
    },
}
