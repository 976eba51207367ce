//! End-to-end scenarios for the tick cycle.
//!
//! Each scenario builds a small board, places agents with fixed traits,
//! and checks the exact outcome of the first few ticks.

#![allow(clippy::unwrap_used)]

use hextrail_agents::AgentSpec;
use hextrail_core::{SimulationConfig, SimulationState, SpawnOutcome, run_tick};
use hextrail_grid::LatticeCoord;
use hextrail_types::{AgentId, Direction, Strategy, TurnPreference};

fn config(columns: u32, rows: u32, max_agents: u32) -> SimulationConfig {
    let mut config = SimulationConfig::default();
    config.world.columns = columns;
    config.world.rows = rows;
    config.population.max_agents = max_agents;
    config.population.initial_agents = 0;
    config.timing.step_delay_ms = 0;
    config.timing.spawn_delay_ms = 0;
    config
}

fn place(
    state: &mut SimulationState,
    col: i64,
    row: i64,
    heading: Direction,
    strategy: Strategy,
    turn_preference: TurnPreference,
) -> AgentId {
    let spec = AgentSpec {
        position: state.grid.point_at(LatticeCoord::new(col, row)),
        heading,
        strategy,
        turn_preference,
        hue_seed: 180.0,
    };
    state.spawn_at(spec, 0.0).unwrap()
}

const fn spawned(outcome: SpawnOutcome) -> Option<AgentId> {
    match outcome {
        SpawnOutcome::Spawned(id) => Some(id),
        _ => None,
    }
}

/// Occupy every lattice cell except `free` with owners that have no trace.
fn fill_except(state: &mut SimulationState, free: LatticeCoord) {
    let free_key = state.grid.canonical_key(state.grid.point_at(free));
    let keys: Vec<_> = state
        .grid
        .points()
        .map(|p| state.grid.canonical_key(p))
        .filter(|k| *k != free_key)
        .collect();
    for (i, key) in (1_000_u64..).zip(keys) {
        state.occupancy.occupy(key, AgentId::new(i), 0.0).unwrap();
    }
}

#[test]
fn wall_follower_spirals_around_its_start() {
    let mut state = SimulationState::new(&config(5, 5, 1)).unwrap();
    let id = place(
        &mut state,
        2,
        2,
        Direction::East,
        Strategy::WallFollower,
        TurnPreference::Right,
    );

    let expected = [
        (Direction::SouthEast, LatticeCoord::new(2, 3)),
        (Direction::SouthWest, LatticeCoord::new(2, 4)),
        (Direction::West, LatticeCoord::new(1, 4)),
        (Direction::NorthWest, LatticeCoord::new(0, 3)),
        (Direction::NorthEast, LatticeCoord::new(1, 2)),
        (Direction::NorthEast, LatticeCoord::new(1, 1)),
    ];
    for (step, (heading, coord)) in (1_u32..).zip(expected) {
        let now = f64::from(step) * 0.1;
        let summary = run_tick(&mut state, now).unwrap();
        assert_eq!(summary.moves_committed, 1, "tick {step}");
        assert_eq!(summary.conflicts_lost, 0);
        assert!(summary.retirements.is_empty());
        assert_eq!(summary.commit_races, 0);

        let agent = state.population.get(id).unwrap();
        assert_eq!(agent.heading, heading, "tick {step}");
        assert_eq!(state.grid.coord_of(agent.position), coord, "tick {step}");
        // Every move so far has turned toward the preference.
        assert_eq!(agent.turn_preference, TurnPreference::Right);
    }

    let agent = state.population.get(id).unwrap();
    assert_eq!(agent.cells_visited, 7);
    assert_eq!(state.occupancy.len(), 7);
    assert_eq!(state.traces.segments().len(), 6);
}

#[test]
fn contested_cell_goes_to_first_claimant() {
    let mut state = SimulationState::new(&config(5, 5, 2)).unwrap();
    let first = place(
        &mut state,
        1,
        2,
        Direction::East,
        Strategy::Wanderer,
        TurnPreference::Left,
    );
    let second = place(
        &mut state,
        3,
        2,
        Direction::West,
        Strategy::Wanderer,
        TurnPreference::Right,
    );
    let target = state.grid.point_at(LatticeCoord::new(2, 2));
    let second_start = state.population.get(second).unwrap().position;

    let summary = run_tick(&mut state, 0.1).unwrap();

    assert_eq!(summary.moves_committed, 1);
    assert_eq!(summary.conflicts_lost, 1);
    assert_eq!(summary.head_on.len(), 1);
    assert!(summary.retirements.is_empty());

    let winner = state.population.get(first).unwrap();
    assert_eq!(
        state.grid.canonical_key(winner.position),
        state.grid.canonical_key(target)
    );
    let loser = state.population.get(second).unwrap();
    assert!(loser.alive);
    assert_eq!(loser.position, second_start);
    assert_eq!(loser.cells_visited, 1);
    assert_eq!(
        state.occupancy.get(state.grid.canonical_key(target)).map(|c| c.owner),
        Some(first)
    );
}

#[test]
fn last_free_cell_is_reused_only_after_pruning() {
    let mut cfg = config(3, 3, 1);
    cfg.traces.trace_lifetime_secs = 1.0;
    cfg.traces.fade_duration_secs = 1.0;
    cfg.traces.prune_interval_ticks = 1;
    let mut state = SimulationState::new(&cfg).unwrap();
    fill_except(&mut state, LatticeCoord::new(1, 1));

    // t=0: the single free cell takes the spawn.
    let tick = run_tick(&mut state, 0.0).unwrap();
    let first = spawned(tick.spawn).unwrap();

    // t=1: boxed in, the agent retires; its death dot still holds the cell.
    let tick = run_tick(&mut state, 1.0).unwrap();
    assert_eq!(tick.retirements.first().map(|r| r.agent_id), Some(first));
    assert_eq!(tick.spawn, SpawnOutcome::PositionExhausted);

    // t=2: still inside the fade interval.
    let tick = run_tick(&mut state, 2.0).unwrap();
    assert_eq!(tick.spawn, SpawnOutcome::PositionExhausted);
    assert!(tick.pruned.is_empty());

    // t=3: the fade completes; the spawn runs before the prune.
    let tick = run_tick(&mut state, 3.0).unwrap();
    assert_eq!(tick.spawn, SpawnOutcome::PositionExhausted);
    assert_eq!(tick.pruned, vec![first]);

    // t=4: the cell is free again.
    let tick = run_tick(&mut state, 4.0).unwrap();
    assert!(matches!(tick.spawn, SpawnOutcome::Spawned(id) if id != first));
}

#[test]
fn last_free_cell_is_reclaimed_by_eviction_in_infinite_mode() {
    let mut cfg = config(3, 3, 1);
    cfg.traces.infinite_lifetime = true;
    let mut state = SimulationState::new(&cfg).unwrap();
    fill_except(&mut state, LatticeCoord::new(1, 1));

    let tick = run_tick(&mut state, 0.0).unwrap();
    let first = spawned(tick.spawn).unwrap();

    // The retirement frees nothing, so the spawn evicts the dead trace and
    // retries within the same tick.
    let tick = run_tick(&mut state, 1.0).unwrap();
    assert_eq!(tick.retirements.len(), 1);
    assert_eq!(tick.evicted, vec![first]);
    assert!(matches!(tick.spawn, SpawnOutcome::Spawned(id) if id != first));
    assert!(state.traces.owner(first).is_none());
}
