//! Enumeration types for agent behavior.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A fixed movement policy an agent is born with.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Strategy {
    /// Hugs its own trail: sharp turn toward preference first.
    WallFollower,
    /// Mostly straight, with coin-flip turns.
    Wanderer,
    /// Freshly shuffled direction order every tick.
    Explorer,
    /// Sharp then double turn toward preference, producing coils.
    Spiral,
}

impl Strategy {
    /// All strategies, in the order used for weighted selection.
    pub const ALL: [Self; 4] = [
        Self::WallFollower,
        Self::Wanderer,
        Self::Explorer,
        Self::Spiral,
    ];

    /// Whether this strategy's ordering depends on the agent's turn preference.
    pub const fn uses_turn_preference(self) -> bool {
        matches!(self, Self::WallFollower | Self::Spiral)
    }
}

impl core::fmt::Display for Strategy {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::WallFollower => write!(f, "wall_follower"),
            Self::Wanderer => write!(f, "wanderer"),
            Self::Explorer => write!(f, "explorer"),
            Self::Spiral => write!(f, "spiral"),
        }
    }
}

/// Which way an agent prefers to turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum TurnPreference {
    /// Counter-clockwise on screen.
    Left,
    /// Clockwise on screen.
    Right,
}

impl TurnPreference {
    /// Rotation sign in sixths of a turn: `+1` for right, `-1` for left.
    pub const fn sign(self) -> i32 {
        match self {
            Self::Left => -1,
            Self::Right => 1,
        }
    }

    /// The other preference.
    pub const fn flipped(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}
