//! Trace storage and lifecycle.
//!
//! Every committed move appends a [`TraceSegment`]. Segments are grouped by
//! owning agent; each owner also remembers the cells its trace covers so the
//! whole trace can be reclaimed at once when it fades out (fading mode) or
//! is evicted to make room (infinite mode).
//!
//! Brightness is never stored. It is computed from the time elapsed since
//! the owner's death each time a snapshot is taken.

use std::collections::BTreeMap;

use hextrail_types::{AgentId, CellKey, OwnerTrace, Point, TraceSegment, TraceState};
use tracing::debug;

/// Brightness of a dead owner's trace `elapsed` seconds after death.
///
/// Full brightness for `elapsed <= lifetime`, then a linear ramp down to
/// zero over `fade`, clamped to `[0, 1]`.
pub fn fade_brightness(elapsed: f64, lifetime: f64, fade: f64) -> f64 {
    if elapsed <= lifetime {
        return 1.0;
    }
    if fade <= 0.0 {
        return 0.0;
    }
    (1.0 - (elapsed - lifetime) / fade).clamp(0.0, 1.0)
}

/// Per-owner bookkeeping for a trace.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnerRecord {
    /// Hue inherited by every segment of this trace.
    pub hue_seed: f64,
    /// Simulation time the owner was born.
    pub birth_time: f64,
    /// Simulation time the owner retired, if it has.
    pub died_at: Option<f64>,
    /// Cells covered by this trace, in the order they were claimed.
    pub cells: Vec<CellKey>,
    /// Number of segments appended so far (also the next sequence index).
    pub segment_count: u64,
}

/// Fading parameters for dead traces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadePolicy {
    /// Seconds a dead trace stays at full brightness.
    pub lifetime: f64,
    /// Seconds a dead trace takes to fade out after `lifetime`.
    pub fade: f64,
    /// Whether dead traces persist until evicted.
    pub infinite: bool,
}

impl FadePolicy {
    /// Brightness of a trace whose owner died at `died_at`.
    pub fn brightness(&self, died_at: f64, now: f64) -> f64 {
        if self.infinite {
            1.0
        } else {
            fade_brightness(now - died_at, self.lifetime, self.fade)
        }
    }

    /// Whether the whole fade interval has elapsed.
    pub fn has_faded(&self, died_at: f64, now: f64) -> bool {
        !self.infinite && now - died_at >= self.lifetime + self.fade
    }
}

/// Append-only (until pruned) store of trace segments.
#[derive(Debug, Clone, Default)]
pub struct TraceStore {
    segments: Vec<TraceSegment>,
    owners: BTreeMap<AgentId, OwnerRecord>,
    removed_this_tick: Vec<AgentId>,
}

impl TraceStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            segments: Vec::new(),
            owners: BTreeMap::new(),
            removed_this_tick: Vec::new(),
        }
    }

    /// Forget the owners removed during the previous tick.
    pub fn begin_tick(&mut self) {
        self.removed_this_tick.clear();
    }

    /// Owners removed since the last [`begin_tick`](Self::begin_tick).
    pub fn removed_this_tick(&self) -> &[AgentId] {
        &self.removed_this_tick
    }

    /// Start a trace for a newly spawned owner standing on `spawn_cell`.
    pub fn register_owner(
        &mut self,
        owner: AgentId,
        hue_seed: f64,
        birth_time: f64,
        spawn_cell: CellKey,
    ) {
        self.owners.insert(
            owner,
            OwnerRecord {
                hue_seed,
                birth_time,
                died_at: None,
                cells: vec![spawn_cell],
                segment_count: 0,
            },
        );
    }

    /// Append a segment for `owner` from `from` to `to`.
    ///
    /// Returns `None` if the owner is unknown. A zero-length segment is a
    /// death dot and claims no new cell.
    pub fn append(
        &mut self,
        owner: AgentId,
        from: Point,
        to: Point,
        created_at: f64,
    ) -> Option<TraceSegment> {
        let record = self.owners.get_mut(&owner)?;
        let segment = TraceSegment {
            from,
            to,
            owner,
            hue_seed: record.hue_seed,
            birth_time: record.birth_time,
            created_at,
            sequence_index: record.segment_count,
        };
        record.segment_count = record.segment_count.saturating_add(1);
        if !segment.is_dot() {
            record.cells.push(to.key());
        }
        self.segments.push(segment);
        Some(segment)
    }

    /// Record the retirement time of `owner`.
    pub fn mark_dead(&mut self, owner: AgentId, at: f64) {
        if let Some(record) = self.owners.get_mut(&owner) {
            record.died_at = Some(at);
        }
    }

    /// All stored segments in commit order.
    pub fn segments(&self) -> &[TraceSegment] {
        &self.segments
    }

    /// The most recent `window` segments.
    pub fn recent(&self, window: usize) -> &[TraceSegment] {
        let start = self.segments.len().saturating_sub(window);
        self.segments.get(start..).unwrap_or_default()
    }

    /// Bookkeeping for `owner`, if its trace is still stored.
    pub fn owner(&self, owner: AgentId) -> Option<&OwnerRecord> {
        self.owners.get(&owner)
    }

    /// Number of owners with a stored trace.
    pub fn owner_count(&self) -> usize {
        self.owners.len()
    }

    /// Dead owners whose entire fade interval has elapsed at `now`.
    pub fn fully_faded(&self, policy: &FadePolicy, now: f64) -> Vec<AgentId> {
        self.owners
            .iter()
            .filter_map(|(id, rec)| {
                rec.died_at
                    .filter(|&died| policy.has_faded(died, now))
                    .map(|_| *id)
            })
            .collect()
    }

    /// The dead owner with the earliest death time (ties go to the lower id).
    pub fn oldest_dead(&self) -> Option<AgentId> {
        self.owners
            .iter()
            .filter_map(|(id, rec)| rec.died_at.map(|died| (died, *id)))
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
            .map(|(_, id)| id)
    }

    /// Remove an owner's whole trace, returning its record.
    ///
    /// The caller is responsible for releasing the returned cells from the
    /// occupancy table.
    pub fn remove_owner(&mut self, owner: AgentId) -> Option<OwnerRecord> {
        let record = self.owners.remove(&owner)?;
        self.segments.retain(|s| s.owner != owner);
        self.removed_this_tick.push(owner);
        debug!(
            %owner,
            cells = record.cells.len(),
            segments = record.segment_count,
            "Trace removed"
        );
        Some(record)
    }

    /// Trace state of every stored owner plus those removed this tick.
    pub fn owner_states(&self, policy: &FadePolicy, now: f64) -> Vec<OwnerTrace> {
        let mut states: Vec<OwnerTrace> = self
            .owners
            .iter()
            .map(|(id, rec)| OwnerTrace {
                owner: *id,
                state: rec.died_at.map_or(TraceState::Alive, |died| TraceState::Dead {
                    brightness: policy.brightness(died, now),
                }),
            })
            .collect();
        states.extend(self.removed_this_tick.iter().map(|&owner| OwnerTrace {
            owner,
            state: TraceState::Evicted,
        }));
        states
    }
}
