//! Conflict resolution for simultaneous moves.
//!
//! Every live agent's intended move for a tick is collected before any of
//! them is applied. Intents are grouped by destination cell:
//!
//! 1. **Sole claimant**: the move is granted.
//! 2. **Contested cell**: the claimant that appears first in evaluation
//!    order wins; the others lose with [`IntentOutcome::Lost`], stay where
//!    they are, and try again next tick against fresh occupancy.
//!
//! Head-on pairs (two agents moving straight at each other into the same
//! cell) are detected and reported, but resolved by the same first-wins
//! rule. Removing both agents was found to over-prune the population.

use std::collections::BTreeMap;

use hextrail_types::{AgentId, CellKey, Direction, Point};

/// One agent's intended move for this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveIntent {
    /// The moving agent.
    pub agent_id: AgentId,
    /// Current lattice point.
    pub from: Point,
    /// Snapped destination lattice point.
    pub to: Point,
    /// Direction of the move.
    pub direction: Direction,
    /// The agent's heading before the move.
    pub heading: Direction,
}

impl MoveIntent {
    /// Canonical key of the destination cell.
    pub fn destination(&self) -> CellKey {
        self.to.key()
    }

    /// Whether the agent keeps its heading.
    pub fn is_straight(&self) -> bool {
        self.direction == self.heading
    }
}

/// The outcome of conflict resolution for a single agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentOutcome {
    /// The move may be committed.
    Granted,
    /// Another agent earlier in evaluation order claimed the same cell.
    Lost {
        /// The agent that won the cell.
        winner: AgentId,
    },
}

/// Two agents driving straight into the same cell from opposite sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadOnPair {
    /// The claimant earlier in evaluation order (the winner).
    pub first: AgentId,
    /// The other claimant.
    pub second: AgentId,
    /// The contested cell.
    pub cell: CellKey,
}

/// Result of resolving one tick's intents.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoveResolution {
    /// Per-agent outcome.
    pub outcomes: BTreeMap<AgentId, IntentOutcome>,
    /// Granted intents, in evaluation order.
    pub granted: Vec<MoveIntent>,
    /// Head-on pairs detected among contested cells.
    pub head_on: Vec<HeadOnPair>,
}

impl MoveResolution {
    /// Number of intents that lost their cell.
    pub fn lost_count(&self) -> usize {
        self.outcomes
            .values()
            .filter(|o| matches!(o, IntentOutcome::Lost { .. }))
            .count()
    }
}

/// Resolve conflicts among `intents`, given in evaluation order.
pub fn resolve_moves(intents: &[MoveIntent]) -> MoveResolution {
    let mut claims: BTreeMap<CellKey, Vec<&MoveIntent>> = BTreeMap::new();
    for intent in intents {
        claims.entry(intent.destination()).or_default().push(intent);
    }

    let mut resolution = MoveResolution::default();

    for intent in intents {
        let Some(claimants) = claims.get(&intent.destination()) else {
            continue;
        };
        let Some(winner) = claimants.first() else {
            continue;
        };
        if winner.agent_id == intent.agent_id {
            resolution
                .outcomes
                .insert(intent.agent_id, IntentOutcome::Granted);
            resolution.granted.push(*intent);
        } else {
            resolution.outcomes.insert(
                intent.agent_id,
                IntentOutcome::Lost {
                    winner: winner.agent_id,
                },
            );
        }
    }

    for (cell, claimants) in &claims {
        if let [a, b] = claimants.as_slice() {
            if is_head_on(a, b) {
                resolution.head_on.push(HeadOnPair {
                    first: a.agent_id,
                    second: b.agent_id,
                    cell: *cell,
                });
            }
        }
    }

    resolution
}

fn is_head_on(a: &MoveIntent, b: &MoveIntent) -> bool {
    a.is_straight() && b.is_straight() && a.direction.opposite() == b.direction
}
