//! Move legality pipeline.
//!
//! A candidate direction from the agent's current point is checked in four
//! stages, in order:
//! 1. Bounds -- the destination is inside the lattice.
//! 2. Occupancy -- the destination cell is free.
//! 3. Path -- no interior sample of the stroke snaps to an occupied cell
//!    other than the agent's own.
//! 4. Crossing -- the stroke does not cross a recent trace segment.
//!
//! Each stage returns `Ok(())` on success or a [`MoveRejection`] on failure.
//! Checks read a [`BoardView`] snapshot taken before any agent's intent is
//! computed, so no agent observes another's uncommitted move.

use hextrail_grid::{HexGrid, OccupancyMap, crosses_any};
use hextrail_types::{Direction, Point, TraceSegment};

/// Interior fractions of a stroke sampled by the path stage.
pub const PATH_SAMPLES: [f64; 2] = [1.0 / 3.0, 2.0 / 3.0];

/// Snap tolerance for path samples, as a fraction of the edge length.
pub const PATH_SNAP_TOLERANCE: f64 = 0.6;

/// Endpoint-sharing tolerance for the crossing stage, as a fraction of the
/// edge length.
pub const ENDPOINT_TOLERANCE: f64 = 0.1;

/// Why a candidate direction was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRejection {
    /// Destination falls outside the lattice.
    OutOfBounds,
    /// Destination cell already has an owner.
    Occupied,
    /// The stroke would skip over an occupied cell.
    PathBlocked,
    /// The stroke would cross an existing trace segment.
    CrossesTrace,
}

/// Read-only view of the board used to judge moves.
#[derive(Debug, Clone, Copy)]
pub struct BoardView<'a> {
    /// Lattice geometry.
    pub grid: &'a HexGrid,
    /// Cell occupancy at the start of the tick.
    pub occupancy: &'a OccupancyMap,
    /// Bounded window of the most recent trace segments.
    pub recent_segments: &'a [TraceSegment],
}

impl BoardView<'_> {
    /// Run all four stages for a move from `from` toward `direction`.
    ///
    /// Returns the snapped destination when every stage passes.
    pub fn check_move(&self, from: Point, direction: Direction) -> Result<Point, MoveRejection> {
        let to = self.grid.snap_to_grid(self.grid.neighbor_of(from, direction));
        self.check_bounds(to)?;
        self.check_occupancy(to)?;
        self.check_path(from, to)?;
        self.check_crossing(from, to)?;
        Ok(to)
    }

    /// First direction in `order` that passes every stage, with its destination.
    pub fn first_legal(&self, from: Point, order: &[Direction]) -> Option<(Direction, Point)> {
        order
            .iter()
            .find_map(|&dir| self.check_move(from, dir).ok().map(|to| (dir, to)))
    }

    fn check_bounds(&self, to: Point) -> Result<(), MoveRejection> {
        if self.grid.contains(to) {
            Ok(())
        } else {
            Err(MoveRejection::OutOfBounds)
        }
    }

    fn check_occupancy(&self, to: Point) -> Result<(), MoveRejection> {
        if self.occupancy.is_occupied(self.grid.canonical_key(to)) {
            Err(MoveRejection::Occupied)
        } else {
            Ok(())
        }
    }

    fn check_path(&self, from: Point, to: Point) -> Result<(), MoveRejection> {
        let own = self.grid.canonical_key(from);
        let tolerance = self.grid.hex_size() * PATH_SNAP_TOLERANCE;
        let blocked = PATH_SAMPLES.iter().any(|&t| {
            self.grid
                .nearest_within(from.lerp(to, t), tolerance)
                .map(|cell| self.grid.canonical_key(cell))
                .is_some_and(|key| key != own && self.occupancy.is_occupied(key))
        });
        if blocked {
            Err(MoveRejection::PathBlocked)
        } else {
            Ok(())
        }
    }

    fn check_crossing(&self, from: Point, to: Point) -> Result<(), MoveRejection> {
        let tolerance = self.grid.hex_size() * ENDPOINT_TOLERANCE;
        if crosses_any(from, to, self.recent_segments, tolerance) {
            Err(MoveRejection::CrossesTrace)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use hextrail_grid::intersect::shares_endpoint;
    use hextrail_grid::{LatticeCoord, segments_cross};
    use hextrail_types::AgentId;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    fn grid() -> HexGrid {
        HexGrid::new(6, 6, 20.0).unwrap()
    }

    fn segment(from: Point, to: Point) -> TraceSegment {
        TraceSegment {
            from,
            to,
            owner: AgentId::new(9),
            hue_seed: 0.0,
            birth_time: 0.0,
            created_at: 0.0,
            sequence_index: 0,
        }
    }

    #[test]
    fn edge_of_board_is_out_of_bounds() {
        let g = grid();
        let occ = OccupancyMap::new();
        let view = BoardView {
            grid: &g,
            occupancy: &occ,
            recent_segments: &[],
        };
        let corner = g.point_at(LatticeCoord::new(0, 0));
        assert_eq!(
            view.check_move(corner, Direction::West),
            Err(MoveRejection::OutOfBounds)
        );
        assert_eq!(
            view.check_move(corner, Direction::NorthEast),
            Err(MoveRejection::OutOfBounds)
        );
        assert!(view.check_move(corner, Direction::East).is_ok());
    }

    #[test]
    fn occupied_destination_is_rejected() {
        let g = grid();
        let mut occ = OccupancyMap::new();
        let from = g.point_at(LatticeCoord::new(2, 2));
        let east = g.point_at(LatticeCoord::new(3, 2));
        occ.occupy(g.canonical_key(east), AgentId::new(1), 0.0).unwrap();
        let view = BoardView {
            grid: &g,
            occupancy: &occ,
            recent_segments: &[],
        };
        assert_eq!(
            view.check_move(from, Direction::East),
            Err(MoveRejection::Occupied)
        );
        let pick = view.first_legal(from, &[Direction::East, Direction::SouthEast]);
        assert_eq!(pick.map(|(d, _)| d), Some(Direction::SouthEast));
    }

    #[test]
    fn crossing_a_foreign_segment_is_rejected() {
        let g = grid();
        let occ = OccupancyMap::new();
        let from = g.point_at(LatticeCoord::new(2, 2));
        let to = g.point_at(LatticeCoord::new(3, 2));
        // A stroke that cuts the east edge in its middle without touching
        // either endpoint.
        let mid = from.lerp(to, 0.5);
        let cut = [segment(
            Point::new(mid.x, mid.y - 8.0),
            Point::new(mid.x, mid.y + 8.0),
        )];
        let view = BoardView {
            grid: &g,
            occupancy: &occ,
            recent_segments: &cut,
        };
        assert_eq!(
            view.check_move(from, Direction::East),
            Err(MoveRejection::CrossesTrace)
        );
        assert!(view.check_move(from, Direction::West).is_ok());
    }

    #[test]
    fn stroke_over_an_occupied_cell_is_blocked() {
        let g = grid();
        let mut occ = OccupancyMap::new();
        // An origin between lattice points, heading south-east to (2, 3).
        // The first sample lands nearest (1, 3), a cell the stroke skips.
        let base = g.point_at(LatticeCoord::new(2, 2));
        let from = Point::new(
            base.x - 0.4 * g.hex_size(),
            0.35f64.mul_add(g.row_height(), base.y),
        );
        let skipped = g.point_at(LatticeCoord::new(1, 3));
        let view = BoardView {
            grid: &g,
            occupancy: &occ,
            recent_segments: &[],
        };
        assert_eq!(
            view.check_move(from, Direction::SouthEast),
            Ok(g.point_at(LatticeCoord::new(2, 3)))
        );

        occ.occupy(g.canonical_key(skipped), AgentId::new(1), 0.0).unwrap();
        let view = BoardView {
            grid: &g,
            occupancy: &occ,
            recent_segments: &[],
        };
        assert_eq!(
            view.check_move(from, Direction::SouthEast),
            Err(MoveRejection::PathBlocked)
        );
    }

    fn random_segments(g: &HexGrid, rng: &mut StdRng) -> Vec<TraceSegment> {
        let columns = i64::from(g.columns());
        let rows = i64::from(g.rows());
        let mut segments = Vec::new();
        for _ in 0..12 {
            let origin = g.random_point(rng);
            let end = if rng.random_bool(0.5) {
                // Lattice edge: shares endpoints with neighboring strokes.
                let dir = Direction::from_index(rng.random_range(0..6u8));
                g.snap_to_grid(g.neighbor_of(origin, dir))
            } else {
                let coord = g.coord_of(origin);
                let col = coord
                    .col
                    .saturating_add(rng.random_range(-2..=2))
                    .clamp(0, columns.saturating_sub(1));
                let row = coord
                    .row
                    .saturating_add(rng.random_range(-2..=2))
                    .clamp(0, rows.saturating_sub(1));
                g.point_at(LatticeCoord::new(col, row))
            };
            segments.push(segment(origin, end));
        }
        segments
    }

    fn path_is_blocked(g: &HexGrid, occ: &OccupancyMap, from: Point, to: Point) -> bool {
        let own = g.canonical_key(from);
        PATH_SAMPLES.iter().any(|&t| {
            g.nearest_within(from.lerp(to, t), g.hex_size() * PATH_SNAP_TOLERANCE)
                .map(|cell| g.canonical_key(cell))
                .is_some_and(|key| key != own && occ.is_occupied(key))
        })
    }

    fn crosses_unshared(g: &HexGrid, segments: &[TraceSegment], from: Point, to: Point) -> bool {
        let tolerance = g.hex_size() * ENDPOINT_TOLERANCE;
        segments.iter().any(|seg| {
            !shares_endpoint(from, to, seg, tolerance) && segments_cross(from, to, seg.from, seg.to)
        })
    }

    /// Random boards: every accepted move satisfies all four conditions and
    /// every rejection names a condition that really fails.
    #[test]
    fn accepted_moves_satisfy_every_condition() {
        let g = grid();
        let mut rng = StdRng::seed_from_u64(11);
        let mut accepted = 0usize;
        let mut crossings = 0usize;
        let mut path_blocks = 0usize;
        for _ in 0..40 {
            let mut occ = OccupancyMap::new();
            for p in g.points() {
                if rng.random_bool(0.35) {
                    occ.occupy(g.canonical_key(p), AgentId::new(1), 0.0).unwrap();
                }
            }
            let segments = random_segments(&g, &mut rng);
            let view = BoardView {
                grid: &g,
                occupancy: &occ,
                recent_segments: &segments,
            };
            for from in g.points() {
                for dir in Direction::ALL {
                    let raw = g.snap_to_grid(g.neighbor_of(from, dir));
                    let in_bounds = g.contains(raw);
                    let free = !occ.is_occupied(g.canonical_key(raw));
                    match view.check_move(from, dir) {
                        Ok(to) => {
                            accepted = accepted.saturating_add(1);
                            assert!(in_bounds && free);
                            assert_eq!(g.canonical_key(to), g.canonical_key(raw));
                            assert!(!path_is_blocked(&g, &occ, from, to));
                            assert!(!crosses_unshared(&g, &segments, from, to));
                        }
                        Err(MoveRejection::OutOfBounds) => assert!(!in_bounds),
                        Err(MoveRejection::Occupied) => assert!(in_bounds && !free),
                        Err(MoveRejection::PathBlocked) => {
                            path_blocks = path_blocks.saturating_add(1);
                            assert!(path_is_blocked(&g, &occ, from, raw));
                        }
                        Err(MoveRejection::CrossesTrace) => {
                            crossings = crossings.saturating_add(1);
                            assert!(in_bounds && free);
                            assert!(!path_is_blocked(&g, &occ, from, raw));
                            assert!(crosses_unshared(&g, &segments, from, raw));
                        }
                    }
                }
            }
        }
        assert!(accepted > 0);
        assert!(crossings > 0);
        // Strokes between adjacent lattice points sample only cells nearest
        // their own endpoints, so the path stage never fires for them.
        assert_eq!(path_blocks, 0);
    }
}
