//! Cell-occupancy table.
//!
//! A cell key maps to at most one owning agent. Records are created when a
//! move commits (or an agent spawns) and removed only when the owner's
//! trace is pruned or evicted.

use std::collections::BTreeMap;

use hextrail_types::{AgentId, CellKey};

use crate::error::GridError;

/// Occupancy record for a single cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellRecord {
    /// Agent whose trace covers this cell.
    pub owner: AgentId,
    /// Simulation time at which the cell was claimed.
    pub occupied_at: f64,
}

/// Map from canonical cell key to its occupant.
#[derive(Debug, Clone, Default)]
pub struct OccupancyMap {
    cells: BTreeMap<CellKey, CellRecord>,
}

impl OccupancyMap {
    /// Create an empty table.
    pub const fn new() -> Self {
        Self {
            cells: BTreeMap::new(),
        }
    }

    /// Whether any agent holds `key`.
    pub fn is_occupied(&self, key: CellKey) -> bool {
        self.cells.contains_key(&key)
    }

    /// The record for `key`, if occupied.
    pub fn get(&self, key: CellKey) -> Option<&CellRecord> {
        self.cells.get(&key)
    }

    /// Claim `key` for `owner`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::CellOccupied`] and leaves the table untouched if
    /// the cell already has an owner.
    pub fn occupy(&mut self, key: CellKey, owner: AgentId, at: f64) -> Result<(), GridError> {
        if let Some(existing) = self.cells.get(&key) {
            return Err(GridError::CellOccupied {
                key,
                owner: existing.owner,
            });
        }
        self.cells.insert(
            key,
            CellRecord {
                owner,
                occupied_at: at,
            },
        );
        Ok(())
    }

    /// Release every listed cell that is still held by `owner`.
    ///
    /// Returns the number of cells released.
    pub fn release_owned(&mut self, owner: AgentId, keys: &[CellKey]) -> usize {
        let mut released: usize = 0;
        for key in keys {
            if self.cells.get(key).is_some_and(|r| r.owner == owner) {
                self.cells.remove(key);
                released = released.saturating_add(1);
            }
        }
        released
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether no cell is occupied.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
