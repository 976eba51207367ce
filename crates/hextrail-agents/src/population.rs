//! Population management: spawning, the population ceiling, and retirement.
//!
//! The manager exclusively owns live agents. It plans spawns (free cell,
//! strategy draw, heading, preference, hue) but never writes the shared
//! occupancy table or trace store; the tick cycle commits admitted agents.

use hextrail_grid::{HexGrid, OccupancyMap};
use hextrail_types::{AgentId, Direction, IdSequence, Point, TurnPreference};
use rand::Rng;
use tracing::debug;

use crate::agent::{Agent, AgentSpec};
use crate::error::AgentError;
use crate::fitness::FitnessTracker;

/// Default number of uniform random probes before the exhaustive scan.
pub const DEFAULT_SPAWN_ATTEMPTS: u32 = 100;

/// Find a free lattice point: up to `attempts` uniform random probes, then a
/// row-major scan for the first free cell.
pub fn find_free_cell(
    grid: &HexGrid,
    occupancy: &OccupancyMap,
    attempts: u32,
    rng: &mut impl Rng,
) -> Option<Point> {
    for _ in 0..attempts {
        let p = grid.random_point(rng);
        if !occupancy.is_occupied(grid.canonical_key(p)) {
            return Some(p);
        }
    }
    grid.points()
        .find(|p| !occupancy.is_occupied(grid.canonical_key(*p)))
}

/// Inputs to a spawn plan.
#[derive(Debug, Clone, Copy)]
pub struct SpawnContext<'a> {
    /// Lattice geometry.
    pub grid: &'a HexGrid,
    /// Current occupancy.
    pub occupancy: &'a OccupancyMap,
    /// Fitness aggregates driving the strategy draw.
    pub fitness: &'a FitnessTracker,
    /// Probability of a uniform strategy draw.
    pub mutation_rate: f64,
    /// Random probes before the exhaustive scan.
    pub attempts: u32,
}

/// Owner of the live agent set.
#[derive(Debug, Clone)]
pub struct PopulationManager {
    agents: Vec<Agent>,
    ids: IdSequence,
    max_agents: usize,
    total_spawned: u64,
}

impl PopulationManager {
    /// Create an empty population with the given ceiling.
    pub const fn new(max_agents: usize) -> Self {
        Self {
            agents: Vec::new(),
            ids: IdSequence::new(),
            max_agents,
            total_spawned: 0,
        }
    }

    /// Live agents in evaluation (spawn) order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Look up a live agent.
    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    /// Look up a live agent mutably.
    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|a| a.id == id)
    }

    /// Number of live agents.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether no agent is alive.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Whether the population ceiling has been reached.
    pub fn is_full(&self) -> bool {
        self.agents.len() >= self.max_agents
    }

    /// Configured ceiling.
    pub const fn max_agents(&self) -> usize {
        self.max_agents
    }

    /// Agents admitted since the run started.
    pub const fn total_spawned(&self) -> u64 {
        self.total_spawned
    }

    /// Plan a new agent: find a free cell and draw its strategy and traits.
    ///
    /// The agent is not admitted until [`PopulationManager::admit`] is called.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::PopulationFull`] at the ceiling, or
    /// [`AgentError::PositionExhausted`] when no free cell exists.
    pub fn plan_spawn(
        &mut self,
        ctx: &SpawnContext<'_>,
        now: f64,
        rng: &mut impl Rng,
    ) -> Result<Agent, AgentError> {
        if self.is_full() {
            return Err(AgentError::PopulationFull {
                max_agents: self.max_agents,
            });
        }
        let position = find_free_cell(ctx.grid, ctx.occupancy, ctx.attempts, rng).ok_or(
            AgentError::PositionExhausted {
                attempts: ctx.attempts,
            },
        )?;
        let strategy = ctx.fitness.select(ctx.mutation_rate, rng);
        let heading = Direction::from_index(rng.random_range(0..6));
        let turn_preference = if rng.random_bool(0.5) {
            TurnPreference::Right
        } else {
            TurnPreference::Left
        };
        let hue_seed = rng.random_range(0.0..360.0);
        Ok(self.plan_at(
            AgentSpec {
                position,
                heading,
                strategy,
                turn_preference,
                hue_seed,
            },
            now,
        ))
    }

    /// Plan an agent with fully specified traits.
    pub const fn plan_at(&mut self, spec: AgentSpec, now: f64) -> Agent {
        Agent::new(self.ids.next_agent(), spec, now)
    }

    /// Add a planned agent to the live set.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::PopulationFull`] at the ceiling.
    pub fn admit(&mut self, agent: Agent) -> Result<AgentId, AgentError> {
        if self.is_full() {
            return Err(AgentError::PopulationFull {
                max_agents: self.max_agents,
            });
        }
        let id = agent.id;
        debug!(
            agent_id = %id,
            strategy = %agent.strategy,
            x = agent.position.x,
            y = agent.position.y,
            "Agent spawned"
        );
        self.agents.push(agent);
        self.total_spawned = self.total_spawned.saturating_add(1);
        Ok(id)
    }

    /// Remove an agent from the live set and mark it retired.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::UnknownAgent`] if the id is not live.
    pub fn retire(&mut self, id: AgentId) -> Result<Agent, AgentError> {
        let idx = self
            .agents
            .iter()
            .position(|a| a.id == id)
            .ok_or(AgentError::UnknownAgent(id))?;
        let mut agent = self.agents.remove(idx);
        agent.retire();
        Ok(agent)
    }
}
