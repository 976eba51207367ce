//! Render snapshot and per-frame color functions.
//!
//! The core never draws. A renderer calls [`snapshot`] once per frame and
//! [`segment_color`] once per segment; both are recomputed every frame so
//! the colors keep drifting even when nothing moves.

use std::f64::consts::TAU;

use hextrail_types::RenderSnapshot;
use serde::Serialize;

use crate::tick::SimulationState;

/// Period of the global hue drift, in seconds.
const GLOBAL_DRIFT_PERIOD: f64 = 60.0;
/// Amplitude of the global hue drift, in degrees.
const GLOBAL_DRIFT_DEGREES: f64 = 30.0;
/// Period of the per-agent age oscillation, in seconds.
const AGE_PERIOD: f64 = 8.0;
/// Amplitude of the per-agent age oscillation, in degrees.
const AGE_DEGREES: f64 = 15.0;
/// Segments per wavelength of the flowing phase.
const FLOW_WAVELENGTH: f64 = 24.0;
/// Seconds for the flowing phase to travel one wavelength.
const FLOW_PERIOD: f64 = 3.0;
/// Amplitude of the flowing phase, in degrees.
const FLOW_DEGREES: f64 = 20.0;

/// HSLA color for one segment on one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentColor {
    /// Hue in degrees, `[0, 360)`.
    pub hue: f64,
    /// Saturation in percent.
    pub saturation: f64,
    /// Lightness in percent.
    pub lightness: f64,
    /// Opacity, equal to the owner's brightness.
    pub alpha: f64,
}

/// Color of a segment with hue `seed`, for an owner aged `agent_age`
/// seconds, at sequence position `sequence_index`, seen at time `now`.
///
/// Pure: the same inputs always give the same color.
pub fn segment_color(
    seed: f64,
    now: f64,
    agent_age: f64,
    sequence_index: u64,
    brightness: f64,
) -> SegmentColor {
    let brightness = brightness.clamp(0.0, 1.0);
    let global = GLOBAL_DRIFT_DEGREES * (TAU * now / GLOBAL_DRIFT_PERIOD).sin();
    let age = AGE_DEGREES * (TAU * agent_age / AGE_PERIOD).sin();
    let phase = TAU * (index_f64(sequence_index) / FLOW_WAVELENGTH - now / FLOW_PERIOD);
    let flow = FLOW_DEGREES * phase.sin();

    SegmentColor {
        hue: (seed + global + age + flow).rem_euclid(360.0),
        saturation: 10.0f64.mul_add(phase.cos(), 70.0),
        lightness: 25.0f64.mul_add(brightness, 30.0),
        alpha: brightness,
    }
}

/// Take the per-frame snapshot.
///
/// Owners whose traces were removed during the latest tick are reported as
/// evicted.
pub fn snapshot(state: &SimulationState) -> RenderSnapshot {
    let now = state.clock.time();
    RenderSnapshot {
        tick: state.clock.tick(),
        time: now,
        line_width: state.config.render.line_width,
        segments: state.traces.segments().to_vec(),
        owners: state.traces.owner_states(&state.fade, now),
        fitness: state.fitness.report(),
    }
}

/// Sequence indices stay far below 2^52.
#[allow(clippy::cast_precision_loss)]
const fn index_f64(index: u64) -> f64 {
    index as f64
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use hextrail_agents::AgentSpec;
    use hextrail_grid::LatticeCoord;
    use hextrail_types::{Direction, Strategy, TraceState, TurnPreference};

    use super::*;
    use crate::config::SimulationConfig;
    use crate::tick::run_tick;

    #[test]
    fn color_is_pure_and_in_range() {
        let a = segment_color(200.0, 12.5, 3.0, 17, 0.4);
        let b = segment_color(200.0, 12.5, 3.0, 17, 0.4);
        assert_eq!(a, b);
        assert!((0.0..360.0).contains(&a.hue));
        assert!((a.alpha - 0.4).abs() < 1e-12);
        assert!((60.0..=80.0).contains(&a.saturation));
    }

    #[test]
    fn color_drifts_with_time_and_sequence() {
        let base = segment_color(90.0, 1.0, 1.0, 0, 1.0);
        let later = segment_color(90.0, 1.7, 1.0, 0, 1.0);
        let further = segment_color(90.0, 1.0, 1.0, 5, 1.0);
        assert!((base.hue - later.hue).abs() > 1e-6);
        assert!((base.hue - further.hue).abs() > 1e-6);
    }

    #[test]
    fn brightness_is_clamped() {
        assert!((segment_color(0.0, 0.0, 0.0, 0, 3.0).alpha - 1.0).abs() < 1e-12);
        assert!(segment_color(0.0, 0.0, 0.0, 0, -1.0).alpha.abs() < 1e-12);
    }

    #[test]
    fn snapshot_reports_segments_and_owner_states() {
        let mut config = SimulationConfig::default();
        config.world.columns = 8;
        config.world.rows = 8;
        config.population.initial_agents = 0;
        config.population.max_agents = 1;
        config.render.line_width = 3.0;
        let mut state = SimulationState::new(&config).unwrap();
        let id = state
            .spawn_at(
                AgentSpec {
                    position: state.grid.point_at(LatticeCoord::new(3, 3)),
                    heading: Direction::East,
                    strategy: Strategy::Spiral,
                    turn_preference: TurnPreference::Left,
                    hue_seed: 45.0,
                },
                0.0,
            )
            .unwrap();
        run_tick(&mut state, 0.1).unwrap();

        let snap = snapshot(&state);
        assert_eq!(snap.tick, 1);
        assert!((snap.line_width - 3.0).abs() < 1e-12);
        assert_eq!(snap.segments.len(), 1);
        assert_eq!(snap.fitness.len(), 4);
        assert_eq!(snap.owners.len(), 1);
        let owner = snap.owners.first().copied().unwrap();
        assert_eq!(owner.owner, id);
        assert_eq!(owner.state, TraceState::Alive);

        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"line_width\":3.0"));
    }
}
