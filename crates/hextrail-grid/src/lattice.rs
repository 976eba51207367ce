//! Offset-row hexagonal lattice geometry.
//!
//! Lattice points sit one edge length apart along each row. Rows are
//! `edge * sqrt(3) / 2` apart and odd rows are shifted right by half an
//! edge, so every point has six neighbors at 0, 60, ..., 300 degrees.
//!
//! All identity tests go through [`HexGrid::canonical_key`]. Positions
//! reached by stepping are re-snapped with [`HexGrid::snap_to_grid`] so
//! that floating error never splits one visual point into two keys.

use hextrail_types::{CellKey, Direction, Point};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// Smallest edge length for which rounded keys stay distinct.
pub const MIN_HEX_SIZE: f64 = 2.0;

/// Integer lattice coordinate: column within a row, and row index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LatticeCoord {
    /// Column within the row.
    pub col: i64,
    /// Row index, growing downward.
    pub row: i64,
}

impl LatticeCoord {
    /// Create a coordinate.
    pub const fn new(col: i64, row: i64) -> Self {
        Self { col, row }
    }

    const fn is_odd_row(self) -> bool {
        self.row.rem_euclid(2) == 1
    }
}

/// Geometry of a bounded offset-row hex lattice.
#[derive(Debug, Clone, PartialEq)]
pub struct HexGrid {
    columns: u32,
    rows: u32,
    hex_size: f64,
    row_height: f64,
}

impl HexGrid {
    /// Create a lattice of `columns` x `rows` points with the given edge length.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidDimensions`] for an empty lattice or an
    /// edge length below [`MIN_HEX_SIZE`].
    pub fn new(columns: u32, rows: u32, hex_size: f64) -> Result<Self, GridError> {
        if columns == 0 || rows == 0 {
            return Err(GridError::InvalidDimensions {
                reason: format!("lattice must have at least one cell, got {columns}x{rows}"),
            });
        }
        if !hex_size.is_finite() || hex_size < MIN_HEX_SIZE {
            return Err(GridError::InvalidDimensions {
                reason: format!("hex_size must be finite and >= {MIN_HEX_SIZE}, got {hex_size}"),
            });
        }
        Ok(Self {
            columns,
            rows,
            hex_size,
            row_height: hex_size * 3.0_f64.sqrt() / 2.0,
        })
    }

    /// Edge length between neighboring lattice points.
    pub const fn hex_size(&self) -> f64 {
        self.hex_size
    }

    /// Vertical distance between rows.
    pub const fn row_height(&self) -> f64 {
        self.row_height
    }

    /// Number of columns.
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows.
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Total number of lattice points.
    pub fn cell_count(&self) -> usize {
        let total = u64::from(self.columns).saturating_mul(u64::from(self.rows));
        usize::try_from(total).unwrap_or(usize::MAX)
    }

    /// Exact position of a lattice coordinate.
    pub fn point_at(&self, coord: LatticeCoord) -> Point {
        let offset = if coord.is_odd_row() { self.hex_size / 2.0 } else { 0.0 };
        Point::new(
            lattice_f64(coord.col).mul_add(self.hex_size, offset),
            lattice_f64(coord.row) * self.row_height,
        )
    }

    /// Position reached by stepping one edge length from `point` toward `direction`.
    ///
    /// The result is raw; callers snap it before using it as a cell.
    pub fn neighbor_of(&self, point: Point, direction: Direction) -> Point {
        let angle = direction.radians();
        Point::new(
            angle.cos().mul_add(self.hex_size, point.x),
            angle.sin().mul_add(self.hex_size, point.y),
        )
    }

    /// Canonical identity of the cell at `point`.
    pub fn canonical_key(&self, point: Point) -> CellKey {
        CellKey::from_point(point)
    }

    /// Nearest lattice coordinate: row first from `y`, then column given
    /// that row's offset.
    #[allow(clippy::cast_possible_truncation)]
    pub fn coord_of(&self, point: Point) -> LatticeCoord {
        let row = (point.y / self.row_height).round() as i64;
        let offset = if row.rem_euclid(2) == 1 { self.hex_size / 2.0 } else { 0.0 };
        let col = ((point.x - offset) / self.hex_size).round() as i64;
        LatticeCoord::new(col, row)
    }

    /// Exact lattice point nearest to an arbitrary point.
    pub fn snap_to_grid(&self, point: Point) -> Point {
        self.point_at(self.coord_of(point))
    }

    /// Snap `point`, but only if the lattice point is within `tolerance`.
    pub fn nearest_within(&self, point: Point, tolerance: f64) -> Option<Point> {
        let snapped = self.snap_to_grid(point);
        (snapped.distance(point) <= tolerance).then_some(snapped)
    }

    /// Whether a coordinate lies inside the lattice bounds.
    pub fn contains_coord(&self, coord: LatticeCoord) -> bool {
        (0..i64::from(self.columns)).contains(&coord.col)
            && (0..i64::from(self.rows)).contains(&coord.row)
    }

    /// Whether the lattice point nearest to `point` lies inside the bounds.
    pub fn contains(&self, point: Point) -> bool {
        self.contains_coord(self.coord_of(point))
    }

    /// Every lattice point in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (0..i64::from(self.rows)).flat_map(move |row| {
            (0..i64::from(self.columns)).map(move |col| self.point_at(LatticeCoord::new(col, row)))
        })
    }

    /// A uniformly random lattice point.
    pub fn random_point(&self, rng: &mut impl Rng) -> Point {
        let col = rng.random_range(0..self.columns);
        let row = rng.random_range(0..self.rows);
        self.point_at(LatticeCoord::new(i64::from(col), i64::from(row)))
    }
}

/// Lattice indices are bounded by `u32` dimensions, so the conversion is exact.
#[allow(clippy::cast_precision_loss)]
const fn lattice_f64(value: i64) -> f64 {
    value as f64
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn grid() -> HexGrid {
        HexGrid::new(10, 10, 20.0).unwrap()
    }

    #[test]
    fn rejects_degenerate_dimensions() {
        assert!(HexGrid::new(0, 5, 20.0).is_err());
        assert!(HexGrid::new(5, 5, 1.0).is_err());
        assert!(HexGrid::new(5, 5, f64::NAN).is_err());
    }

    #[test]
    fn every_neighbor_snaps_back_onto_the_lattice() {
        let g = grid();
        for coord in [LatticeCoord::new(3, 4), LatticeCoord::new(3, 5)] {
            let origin = g.point_at(coord);
            for dir in Direction::ALL {
                let raw = g.neighbor_of(origin, dir);
                let snapped = g.snap_to_grid(raw);
                assert!(raw.distance(snapped) < 1e-9, "{dir:?} from {coord:?}");
                assert!((origin.distance(snapped) - g.hex_size()).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn stepping_around_a_hexagon_returns_home() {
        let g = grid();
        let start = g.point_at(LatticeCoord::new(4, 4));
        let mut p = start;
        for dir in Direction::ALL {
            p = g.snap_to_grid(g.neighbor_of(p, dir.rotated(2)));
        }
        assert_eq!(g.canonical_key(p), g.canonical_key(start));
    }

    #[test]
    fn odd_rows_are_offset_by_half_an_edge() {
        let g = grid();
        let even = g.point_at(LatticeCoord::new(2, 2));
        let odd = g.point_at(LatticeCoord::new(2, 3));
        assert!((odd.x - even.x - 10.0).abs() < 1e-12);
    }

    #[test]
    fn drifted_point_snaps_to_same_key() {
        let g = grid();
        let exact = g.point_at(LatticeCoord::new(5, 7));
        let drifted = Point::new(exact.x + 0.3, exact.y - 0.4);
        assert_eq!(
            g.canonical_key(g.snap_to_grid(drifted)),
            g.canonical_key(exact)
        );
    }

    #[test]
    fn bounds_follow_lattice_coordinates() {
        let g = grid();
        assert!(g.contains(g.point_at(LatticeCoord::new(0, 0))));
        assert!(g.contains(g.point_at(LatticeCoord::new(9, 9))));
        assert!(!g.contains(g.point_at(LatticeCoord::new(10, 0))));
        assert!(!g.contains(g.point_at(LatticeCoord::new(0, -1))));
    }

    #[test]
    fn nearest_within_respects_tolerance() {
        let g = grid();
        let p = g.point_at(LatticeCoord::new(1, 1));
        assert!(g.nearest_within(Point::new(p.x + 5.0, p.y), 12.0).is_some());
        assert!(g.nearest_within(Point::new(p.x + 9.0, p.y), 5.0).is_none());
    }

    #[test]
    fn points_visits_every_cell_once() {
        let g = grid();
        let keys: std::collections::BTreeSet<_> = g.points().map(|p| g.canonical_key(p)).collect();
        assert_eq!(keys.len(), g.cell_count());
    }
}
