//! Planar geometry primitives shared by the lattice, agents, and renderer.
//!
//! Positions are expressed in pixel-like length units with the y axis
//! pointing down, so a positive rotation is clockwise on screen.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Number of directions on the hexagonal lattice.
pub const DIRECTION_COUNT: usize = 6;

/// A point in continuous lattice space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate (grows downward).
    pub y: f64,
}

impl Point {
    /// Create a point from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Linear interpolation from `self` toward `other` at fraction `t`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            x: (other.x - self.x).mul_add(t, self.x),
            y: (other.y - self.y).mul_add(t, self.y),
        }
    }

    /// The canonical cell key for this point.
    pub fn key(self) -> CellKey {
        CellKey::from_point(self)
    }
}

/// Canonical identity of a lattice cell.
///
/// Both coordinates are rounded to the nearest integer. Two points denote
/// the same cell iff their keys are equal; raw float comparison must never
/// be used for that purpose because accumulated motion drifts.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub struct CellKey {
    /// Rounded horizontal coordinate.
    pub x: i64,
    /// Rounded vertical coordinate.
    pub y: i64,
}

impl CellKey {
    /// Round a point to its canonical key.
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_point(point: Point) -> Self {
        // Lattice coordinates are bounded by the configured grid, far inside i64.
        Self {
            x: point.x.round() as i64,
            y: point.y.round() as i64,
        }
    }
}

impl core::fmt::Display for CellKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

/// One of the six lattice directions, at multiples of 60 degrees.
///
/// Angles are measured clockwise on screen starting from east.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub enum Direction {
    /// 0 degrees.
    East,
    /// 60 degrees.
    SouthEast,
    /// 120 degrees.
    SouthWest,
    /// 180 degrees.
    West,
    /// 240 degrees.
    NorthWest,
    /// 300 degrees.
    NorthEast,
}

impl Direction {
    /// All directions in angle order.
    pub const ALL: [Self; DIRECTION_COUNT] = [
        Self::East,
        Self::SouthEast,
        Self::SouthWest,
        Self::West,
        Self::NorthWest,
        Self::NorthEast,
    ];

    /// Position of this direction in [`Direction::ALL`].
    pub const fn index(self) -> u8 {
        match self {
            Self::East => 0,
            Self::SouthEast => 1,
            Self::SouthWest => 2,
            Self::West => 3,
            Self::NorthWest => 4,
            Self::NorthEast => 5,
        }
    }

    /// Direction for an index, taken modulo six.
    pub const fn from_index(index: u8) -> Self {
        match index.checked_rem(6) {
            Some(0) => Self::East,
            Some(1) => Self::SouthEast,
            Some(2) => Self::SouthWest,
            Some(3) => Self::West,
            Some(4) => Self::NorthWest,
            _ => Self::NorthEast,
        }
    }

    /// Rotate by `steps` sixths of a turn; positive is clockwise on screen.
    pub fn rotated(self, steps: i32) -> Self {
        let idx = i32::from(self.index()).wrapping_add(steps).rem_euclid(6);
        Self::from_index(u8::try_from(idx).unwrap_or(0))
    }

    /// The direction pointing the other way.
    pub fn opposite(self) -> Self {
        self.rotated(3)
    }

    /// Angle of this direction in radians.
    pub fn radians(self) -> f64 {
        f64::from(self.index()) * core::f64::consts::FRAC_PI_3
    }

    /// Signed turn from `heading` to `self`, in sixths, normalized to `-2..=3`.
    pub fn turn_from(self, heading: Self) -> i32 {
        let diff = i32::from(self.index())
            .wrapping_sub(i32::from(heading.index()))
            .rem_euclid(6);
        if diff > 3 { diff.wrapping_sub(6) } else { diff }
    }
}
