//! Lattice geometry, cell occupancy, and trace storage for the HexTrail simulation.
//!
//! This crate models the shared board agents move on: the offset-row hex
//! lattice, the table of occupied cells, and the store of drawn segments
//! with their fade/evict lifecycle.
//!
//! # Modules
//!
//! - [`error`] -- Error types for lattice and occupancy operations.
//! - [`intersect`] -- Parametric segment crossing tests.
//! - [`lattice`] -- [`HexGrid`]: neighbor stepping, canonical keys, snapping.
//! - [`occupancy`] -- [`OccupancyMap`]: one owner per cell key.
//! - [`trace_store`] -- [`TraceStore`]: segments per owner, fading, eviction.

pub mod error;
pub mod intersect;
pub mod lattice;
pub mod occupancy;
pub mod trace_store;

// Re-export primary types at crate root.
pub use error::GridError;
pub use intersect::{crosses_any, segments_cross};
pub use lattice::{HexGrid, LatticeCoord};
pub use occupancy::{CellRecord, OccupancyMap};
pub use trace_store::{FadePolicy, OwnerRecord, TraceStore, fade_brightness};
