//! Agent state.
//!
//! An [`Agent`] is owned by the population manager from spawn until
//! retirement. After retirement only its trace segments persist; the agent
//! value itself is handed back to the caller and may be discarded.

use hextrail_types::{AgentId, Direction, Point, Strategy, TurnPreference};
use serde::{Deserialize, Serialize};

/// A live (or just-retired) agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    /// Unique id, issued in spawn order.
    pub id: AgentId,
    /// Current lattice point.
    pub position: Point,
    /// Direction of the last move (or the spawn heading).
    pub heading: Direction,
    /// Movement policy, fixed for life.
    pub strategy: Strategy,
    /// Preferred turning sense; may flip when forced against it.
    pub turn_preference: TurnPreference,
    /// Hue in degrees used for every segment of this agent's trace.
    pub hue_seed: f64,
    /// Simulation time of spawn, in seconds.
    pub birth_time: f64,
    /// Total length of committed moves.
    pub distance_traveled: f64,
    /// Cells claimed, including the spawn cell.
    pub cells_visited: u64,
    /// Cleared on retirement.
    pub alive: bool,
}

/// Everything needed to place a new agent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentSpec {
    /// Spawn lattice point.
    pub position: Point,
    /// Initial heading.
    pub heading: Direction,
    /// Movement policy.
    pub strategy: Strategy,
    /// Initial turn preference.
    pub turn_preference: TurnPreference,
    /// Trace hue in degrees.
    pub hue_seed: f64,
}

impl Agent {
    /// Create a live agent born at `now`.
    pub const fn new(id: AgentId, spec: AgentSpec, now: f64) -> Self {
        Self {
            id,
            position: spec.position,
            heading: spec.heading,
            strategy: spec.strategy,
            turn_preference: spec.turn_preference,
            hue_seed: spec.hue_seed,
            birth_time: now,
            distance_traveled: 0.0,
            cells_visited: 1,
            alive: true,
        }
    }

    /// Seconds alive as of `now`.
    pub fn lifetime(&self, now: f64) -> f64 {
        (now - self.birth_time).max(0.0)
    }

    /// Commit a move to `to` in `direction`.
    ///
    /// Returns `true` if the agent's turn preference flipped because the
    /// move turned against it.
    pub fn apply_move(&mut self, to: Point, direction: Direction) -> bool {
        let turn = direction.turn_from(self.heading);
        let against = turn != 0 && turn != 3 && turn.signum() != self.turn_preference.sign();
        let flipped = against && self.strategy.uses_turn_preference();
        if flipped {
            self.turn_preference = self.turn_preference.flipped();
        }
        self.distance_traveled += self.position.distance(to);
        self.cells_visited = self.cells_visited.saturating_add(1);
        self.position = to;
        self.heading = direction;
        flipped
    }

    /// Mark the agent as retired.
    pub const fn retire(&mut self) {
        self.alive = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(strategy: Strategy) -> Agent {
        Agent::new(
            AgentId::new(0),
            AgentSpec {
                position: Point::new(0.0, 0.0),
                heading: Direction::East,
                strategy,
                turn_preference: TurnPreference::Right,
                hue_seed: 0.0,
            },
            1.0,
        )
    }

    #[test]
    fn move_updates_statistics() {
        let mut a = agent(Strategy::WallFollower);
        let flipped = a.apply_move(Point::new(20.0, 0.0), Direction::East);
        assert!(!flipped);
        assert_eq!(a.cells_visited, 2);
        assert!((a.distance_traveled - 20.0).abs() < 1e-12);
        assert_eq!(a.heading, Direction::East);
        assert!((a.lifetime(3.5) - 2.5).abs() < 1e-12);
    }

    #[test]
    fn turning_against_preference_flips_it() {
        let mut a = agent(Strategy::WallFollower);
        assert!(!a.apply_move(Point::new(10.0, 17.3), Direction::SouthEast));
        assert_eq!(a.turn_preference, TurnPreference::Right);
        // Heading is now south-east; east is a left turn.
        assert!(a.apply_move(Point::new(30.0, 17.3), Direction::East));
        assert_eq!(a.turn_preference, TurnPreference::Left);
    }

    #[test]
    fn reversing_or_ignoring_preference_does_not_flip() {
        let mut a = agent(Strategy::WallFollower);
        assert!(!a.apply_move(Point::new(-20.0, 0.0), Direction::West));
        let mut w = agent(Strategy::Wanderer);
        assert!(!w.apply_move(Point::new(10.0, -17.3), Direction::NorthEast));
        assert_eq!(w.turn_preference, TurnPreference::Right);
    }
}
