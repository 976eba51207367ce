//! Tick cycle: the phase loop that drives the HexTrail simulation.
//!
//! Each tick runs through these phases:
//!
//! 1. **Clock** -- advance the tick counter and simulation time.
//!
//! 2. **Intent** -- every live agent, in spawn order, asks its strategy for
//!    a direction ordering and takes the first legal direction. All checks
//!    read the board as it stood before the tick; no agent sees another's
//!    intent.
//!
//! 3. **Retirement** -- agents with no legal direction retire in place,
//!    leaving a death dot, and their statistics go to the fitness tracker.
//!
//! 4. **Resolution** -- intents are arbitrated; the first claimant of each
//!    destination wins.
//!
//! 5. **Commit** -- granted moves claim their destination cell and append a
//!    trace segment. A destination found occupied here is a commit race:
//!    the agent retires as if it had no legal move.
//!
//! 6. **Spawn** -- one spawn attempt when the spawn delay has elapsed and
//!    the population is below its ceiling. In infinite mode a failed
//!    attempt evicts the oldest dead trace and retries once.
//!
//! 7. **Prune** -- in fading mode, every `prune_interval_ticks` ticks, the
//!    traces of owners whose fade has completed are removed and their cells
//!    released.
//!
//! The cycle is deterministic given the same configuration, seed, and
//! sequence of `now` values.

use hextrail_agents::{
    Agent, AgentError, AgentSpec, BoardView, FitnessTracker, HeadOnPair, MoveIntent, PopulationManager,
    SpawnContext, propose_directions, resolve_moves,
};
use hextrail_grid::{FadePolicy, HexGrid, OccupancyMap, TraceStore};
use hextrail_types::{AgentId, Strategy};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, warn};

use crate::clock::{ClockError, SimClock};
use crate::config::{ConfigError, SimulationConfig};

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}

/// Errors that can occur while building a [`SimulationState`].
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The configuration failed validation.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: ConfigError,
    },

    /// The pacing values were rejected by the clock.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// The lattice could not be built.
    #[error("grid error: {source}")]
    Grid {
        /// The underlying grid error.
        #[from]
        source: hextrail_grid::GridError,
    },
}

/// Why an agent retired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetireReason {
    /// None of the six directions was legal.
    NoLegalMove,
    /// The granted destination was already occupied at commit time.
    CommitRace,
}

/// Statistics recorded when an agent retired.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Retirement {
    /// The retired agent.
    pub agent_id: AgentId,
    /// Its strategy.
    pub strategy: Strategy,
    /// Seconds alive.
    pub lifetime: f64,
    /// Distance traveled.
    pub distance: f64,
    /// Cells visited, including the spawn cell.
    pub cells: u64,
    /// Why it retired.
    pub reason: RetireReason,
}

/// Result of the spawn phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnOutcome {
    /// The spawn delay has not elapsed since the last attempt.
    NotDue,
    /// The population is at its ceiling.
    PopulationFull,
    /// No free cell was found.
    PositionExhausted,
    /// The planned agent could not claim its cell at commit time.
    CommitRejected,
    /// A new agent was admitted.
    Spawned(AgentId),
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Simulation time of the tick.
    pub time: f64,
    /// Moves that claimed their destination.
    pub moves_committed: usize,
    /// Intents discarded because an earlier claimant took the cell.
    pub conflicts_lost: usize,
    /// Head-on pairs detected during resolution.
    pub head_on: Vec<HeadOnPair>,
    /// Agents retired this tick, in retirement order.
    pub retirements: Vec<Retirement>,
    /// Granted moves whose destination was already occupied.
    pub commit_races: usize,
    /// Result of the spawn phase.
    pub spawn: SpawnOutcome,
    /// Owners evicted to make room for a spawn.
    pub evicted: Vec<AgentId>,
    /// Owners whose faded traces were pruned.
    pub pruned: Vec<AgentId>,
    /// Live agents at the end of the tick.
    pub agents_alive: usize,
}

/// The mutable simulation state passed through the tick cycle.
///
/// Every shared table lives here; there is no global state, so any number
/// of simulations can run side by side.
#[derive(Debug)]
pub struct SimulationState {
    /// Validated configuration the state was built from.
    pub config: SimulationConfig,
    /// Lattice geometry.
    pub grid: HexGrid,
    /// Cell ownership.
    pub occupancy: OccupancyMap,
    /// Trace segments and per-owner lifecycle.
    pub traces: TraceStore,
    /// Live agents.
    pub population: PopulationManager,
    /// Per-strategy fitness aggregates.
    pub fitness: FitnessTracker,
    /// Tick counter and pacing.
    pub clock: SimClock,
    /// The single random source for every draw in the simulation.
    pub rng: StdRng,
    /// Fading parameters for dead traces.
    pub fade: FadePolicy,
}

impl SimulationState {
    /// Build a simulation from a configuration and spawn the initial agents.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if the configuration is invalid.
    pub fn new(config: &SimulationConfig) -> Result<Self, BuildError> {
        config.validate()?;
        let grid = HexGrid::new(config.world.columns, config.world.rows, config.world.hex_size)?;
        let clock = SimClock::from_config(&config.timing)?;
        let max_agents = usize::try_from(config.population.max_agents).unwrap_or(usize::MAX);

        let mut state = Self {
            config: config.clone(),
            grid,
            occupancy: OccupancyMap::new(),
            traces: TraceStore::new(),
            population: PopulationManager::new(max_agents),
            fitness: FitnessTracker::new(),
            clock,
            rng: StdRng::seed_from_u64(config.world.seed),
            fade: FadePolicy {
                lifetime: config.traces.trace_lifetime_secs,
                fade: config.traces.fade_duration_secs,
                infinite: config.traces.infinite_lifetime,
            },
        };

        for _ in 0..config.population.initial_agents {
            if !matches!(state.spawn(0.0), SpawnOutcome::Spawned(_)) {
                break;
            }
        }

        info!(
            name = %config.world.name,
            seed = config.world.seed,
            columns = config.world.columns,
            rows = config.world.rows,
            agents = state.population.len(),
            infinite_lifetime = config.traces.infinite_lifetime,
            "Simulation state initialized"
        );
        Ok(state)
    }

    /// Run a tick if the step delay has elapsed since the previous one.
    ///
    /// # Errors
    ///
    /// Returns [`TickError`] if the clock overflows.
    pub fn advance(&mut self, now: f64) -> Result<Option<TickSummary>, TickError> {
        if !self.clock.tick_due(now) {
            return Ok(None);
        }
        run_tick(self, now).map(Some)
    }

    /// Place an agent with fully specified traits at its snapped position.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::PopulationFull`] at the ceiling,
    /// [`AgentError::PositionExhausted`] if the point is outside the lattice,
    /// or [`AgentError::Grid`] if the cell is occupied.
    pub fn spawn_at(&mut self, mut spec: AgentSpec, now: f64) -> Result<AgentId, AgentError> {
        if self.population.is_full() {
            return Err(AgentError::PopulationFull {
                max_agents: self.population.max_agents(),
            });
        }
        spec.position = self.grid.snap_to_grid(spec.position);
        if !self.grid.contains(spec.position) {
            return Err(AgentError::PositionExhausted { attempts: 0 });
        }
        let agent = self.population.plan_at(spec, now);
        self.commit_spawn(agent, now)
    }

    /// Evict the trace of the dead owner that died first.
    pub fn evict_oldest_dead(&mut self) -> Option<AgentId> {
        let owner = self.traces.oldest_dead()?;
        self.reclaim(owner).then_some(owner)
    }

    /// Remove every trace whose fade has completed at `now`.
    pub fn prune_faded(&mut self, now: f64) -> Vec<AgentId> {
        let mut pruned = Vec::new();
        for owner in self.traces.fully_faded(&self.fade, now) {
            if self.reclaim(owner) {
                pruned.push(owner);
            }
        }
        pruned
    }

    /// Plan and admit one agent at a random free cell.
    fn spawn(&mut self, now: f64) -> SpawnOutcome {
        let ctx = SpawnContext {
            grid: &self.grid,
            occupancy: &self.occupancy,
            fitness: &self.fitness,
            mutation_rate: self.config.population.mutation_rate,
            attempts: self.config.traces.spawn_attempts,
        };
        let planned = self.population.plan_spawn(&ctx, now, &mut self.rng);
        spawn_outcome(planned.and_then(|agent| self.commit_spawn(agent, now)))
    }

    /// Claim the agent's cell, admit it, and open its trace.
    fn commit_spawn(&mut self, agent: Agent, now: f64) -> Result<AgentId, AgentError> {
        let key = self.grid.canonical_key(agent.position);
        let owner = agent.id;
        let hue_seed = agent.hue_seed;
        self.occupancy.occupy(key, owner, now)?;
        match self.population.admit(agent) {
            Ok(id) => {
                self.traces.register_owner(id, hue_seed, now, key);
                Ok(id)
            }
            Err(err) => {
                self.occupancy.release_owned(owner, &[key]);
                Err(err)
            }
        }
    }

    /// Remove an owner's trace and release its cells.
    fn reclaim(&mut self, owner: AgentId) -> bool {
        let Some(record) = self.traces.remove_owner(owner) else {
            return false;
        };
        self.occupancy.release_owned(owner, &record.cells);
        true
    }

    /// Retire a live agent in place: death dot, trace death time, fitness.
    fn retire(&mut self, id: AgentId, now: f64, reason: RetireReason) -> Option<Retirement> {
        let agent = self.population.retire(id).ok()?;
        if self.traces.append(id, agent.position, agent.position, now).is_none() {
            warn!(agent_id = %id, "Retired agent has no trace, death dot dropped");
        }
        self.traces.mark_dead(id, now);

        let retirement = Retirement {
            agent_id: id,
            strategy: agent.strategy,
            lifetime: agent.lifetime(now),
            distance: agent.distance_traveled,
            cells: agent.cells_visited,
            reason,
        };
        self.fitness.record(
            retirement.strategy,
            retirement.lifetime,
            retirement.distance,
            retirement.cells,
        );
        debug!(
            agent_id = %id,
            strategy = %retirement.strategy,
            lifetime = retirement.lifetime,
            cells = retirement.cells,
            ?reason,
            "Agent retired"
        );
        Some(retirement)
    }
}

/// Execute a single tick at simulation time `now`.
///
/// # Errors
///
/// Returns [`TickError`] if the clock overflows.
pub fn run_tick(state: &mut SimulationState, now: f64) -> Result<TickSummary, TickError> {
    // --- Phase 1: Clock ---
    let tick = state.clock.advance(now)?;
    let now = state.clock.time();
    state.traces.begin_tick();

    // --- Phase 2: Intent ---
    let (intents, stuck) = collect_intents(state);

    // --- Phase 3: Retirement ---
    let mut retirements: Vec<Retirement> = stuck
        .into_iter()
        .filter_map(|id| state.retire(id, now, RetireReason::NoLegalMove))
        .collect();

    // --- Phase 4: Resolution ---
    let resolution = resolve_moves(&intents);
    for pair in &resolution.head_on {
        debug!(
            tick,
            first = %pair.first,
            second = %pair.second,
            cell = %pair.cell,
            "Head-on approach resolved by claim order"
        );
    }

    // --- Phase 5: Commit ---
    let mut moves_committed: usize = 0;
    let mut commit_races: usize = 0;
    for intent in &resolution.granted {
        if commit_move(state, intent, now) {
            moves_committed = moves_committed.saturating_add(1);
            continue;
        }
        warn!(
            tick,
            agent_id = %intent.agent_id,
            cell = %intent.destination(),
            "Commit race detected, retiring agent"
        );
        commit_races = commit_races.saturating_add(1);
        if let Some(r) = state.retire(intent.agent_id, now, RetireReason::CommitRace) {
            retirements.push(r);
        }
    }

    // --- Phase 6: Spawn ---
    let mut evicted = Vec::new();
    let spawn = spawn_phase(state, now, &mut evicted);

    // --- Phase 7: Prune ---
    let pruned = if !state.fade.infinite
        && tick.checked_rem(state.config.traces.prune_interval_ticks) == Some(0)
    {
        state.prune_faded(now)
    } else {
        Vec::new()
    };
    if !pruned.is_empty() {
        info!(tick, count = pruned.len(), "Faded traces pruned");
    }

    let summary = TickSummary {
        tick,
        time: now,
        moves_committed,
        conflicts_lost: resolution.lost_count(),
        head_on: resolution.head_on,
        retirements,
        commit_races,
        spawn,
        evicted,
        pruned,
        agents_alive: state.population.len(),
    };
    debug!(
        tick,
        moves = summary.moves_committed,
        lost = summary.conflicts_lost,
        retired = summary.retirements.len(),
        spawn = ?summary.spawn,
        alive = summary.agents_alive,
        "Tick completed"
    );
    Ok(summary)
}

/// Ask every live agent for its move against the pre-tick board.
///
/// Returns the intents in evaluation order and the ids of agents with no
/// legal direction.
fn collect_intents(state: &mut SimulationState) -> (Vec<MoveIntent>, Vec<AgentId>) {
    let board = BoardView {
        grid: &state.grid,
        occupancy: &state.occupancy,
        recent_segments: state.traces.recent(state.config.traces.crossing_window),
    };
    let mut intents = Vec::with_capacity(state.population.len());
    let mut stuck = Vec::new();
    for agent in state.population.agents() {
        let order = propose_directions(
            agent.strategy,
            agent.heading,
            agent.turn_preference,
            &mut state.rng,
        );
        match board.first_legal(agent.position, &order) {
            Some((direction, to)) => intents.push(MoveIntent {
                agent_id: agent.id,
                from: agent.position,
                to,
                direction,
                heading: agent.heading,
            }),
            None => stuck.push(agent.id),
        }
    }
    (intents, stuck)
}

/// Claim the destination and record the move. Returns `false` on a race.
fn commit_move(state: &mut SimulationState, intent: &MoveIntent, now: f64) -> bool {
    let key = state.grid.canonical_key(intent.to);
    if state.occupancy.occupy(key, intent.agent_id, now).is_err() {
        return false;
    }
    if state.traces.append(intent.agent_id, intent.from, intent.to, now).is_none() {
        warn!(
            agent_id = %intent.agent_id,
            cell = %key,
            "Committed move has no trace, segment dropped"
        );
    }
    if let Some(agent) = state.population.get_mut(intent.agent_id) {
        if agent.apply_move(intent.to, intent.direction) {
            debug!(
                agent_id = %intent.agent_id,
                preference = ?agent.turn_preference,
                "Turn preference flipped"
            );
        }
    }
    true
}

/// Classify a spawn attempt. Only an exhausted board counts as
/// [`SpawnOutcome::PositionExhausted`], the one outcome that triggers eviction.
fn spawn_outcome(result: Result<AgentId, AgentError>) -> SpawnOutcome {
    match result {
        Ok(id) => SpawnOutcome::Spawned(id),
        Err(AgentError::PopulationFull { .. }) => SpawnOutcome::PopulationFull,
        Err(AgentError::PositionExhausted { .. }) => SpawnOutcome::PositionExhausted,
        Err(err) => {
            warn!(%err, "Spawn commit rejected");
            SpawnOutcome::CommitRejected
        }
    }
}

fn spawn_phase(state: &mut SimulationState, now: f64, evicted: &mut Vec<AgentId>) -> SpawnOutcome {
    if state.population.is_full() {
        return SpawnOutcome::PopulationFull;
    }
    if !state.clock.spawn_due(now) {
        return SpawnOutcome::NotDue;
    }
    state.clock.mark_spawn_attempt(now);

    let outcome = state.spawn(now);
    if outcome != SpawnOutcome::PositionExhausted || !state.fade.infinite {
        return outcome;
    }
    // Infinite mode: reclaim the oldest dead trace and retry once.
    match state.evict_oldest_dead() {
        Some(owner) => {
            info!(owner = %owner, "Evicted oldest dead trace to make room");
            evicted.push(owner);
            state.spawn(now)
        }
        None => outcome,
    }
}
