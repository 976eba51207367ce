//! Per-strategy fitness aggregates and weighted strategy selection.
//!
//! Each retirement adds the agent's lifetime, distance, and cells visited
//! to its strategy's running totals. Totals are never reset during a run.
//!
//! A new spawn draws its strategy as follows:
//!
//! 1. With probability `mutation_rate`, uniformly among all strategies.
//! 2. Otherwise by roulette over per-strategy weights, where a strategy with
//!    observations weighs `combined^2` with
//!    `combined = 2 * avg_cells + avg_lifetime + avg_distance / 100`, and a
//!    strategy with no observations weighs `1.0`.

use std::collections::BTreeMap;

use hextrail_types::{Strategy, StrategyFitnessRow};
use rand::Rng;

/// Weight given to a strategy that has no retirements yet.
pub const NEUTRAL_WEIGHT: f64 = 1.0;

/// Divisor applied to average distance in the combined score.
const DISTANCE_SCALE: f64 = 100.0;

/// Multiplier applied to average cells visited in the combined score.
const CELLS_WEIGHT: f64 = 2.0;

/// Running totals for one strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StrategyFitness {
    /// Sum of lifetimes, in seconds.
    pub total_lifetime: f64,
    /// Sum of distances traveled.
    pub total_distance: f64,
    /// Sum of cells visited.
    pub total_cells: u64,
    /// Number of retirements recorded.
    pub count: u64,
}

impl StrategyFitness {
    /// Mean lifetime, or zero with no observations.
    pub fn avg_lifetime(&self) -> f64 {
        mean(self.total_lifetime, self.count)
    }

    /// Mean distance, or zero with no observations.
    pub fn avg_distance(&self) -> f64 {
        mean(self.total_distance, self.count)
    }

    /// Mean cells visited, or zero with no observations.
    pub fn avg_cells(&self) -> f64 {
        mean(count_f64(self.total_cells), self.count)
    }

    /// Combined score, or `None` with no observations.
    pub fn combined(&self) -> Option<f64> {
        (self.count > 0).then(|| {
            CELLS_WEIGHT.mul_add(
                self.avg_cells(),
                self.avg_lifetime() + self.avg_distance() / DISTANCE_SCALE,
            )
        })
    }

    /// Selection weight.
    pub fn weight(&self) -> f64 {
        self.combined().map_or(NEUTRAL_WEIGHT, |c| c * c)
    }
}

/// Fitness aggregates for every strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct FitnessTracker {
    aggregates: BTreeMap<Strategy, StrategyFitness>,
}

impl Default for FitnessTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl FitnessTracker {
    /// Create a tracker with empty totals for every strategy.
    pub fn new() -> Self {
        Self {
            aggregates: Strategy::ALL
                .into_iter()
                .map(|s| (s, StrategyFitness::default()))
                .collect(),
        }
    }

    /// Record one retirement.
    pub fn record(&mut self, strategy: Strategy, lifetime: f64, distance: f64, cells: u64) {
        let entry = self.aggregates.entry(strategy).or_default();
        entry.total_lifetime += lifetime.max(0.0);
        entry.total_distance += distance.max(0.0);
        entry.total_cells = entry.total_cells.saturating_add(cells);
        entry.count = entry.count.saturating_add(1);
    }

    /// Totals for one strategy.
    pub fn get(&self, strategy: Strategy) -> StrategyFitness {
        self.aggregates.get(&strategy).copied().unwrap_or_default()
    }

    /// Current selection weight of every strategy, in [`Strategy::ALL`] order.
    pub fn weights(&self) -> [(Strategy, f64); 4] {
        Strategy::ALL.map(|s| (s, self.get(s).weight()))
    }

    /// Draw the strategy for the next spawn.
    pub fn select(&self, mutation_rate: f64, rng: &mut impl Rng) -> Strategy {
        if rng.random::<f64>() < mutation_rate {
            return uniform(rng);
        }
        let weights = self.weights();
        let total: f64 = weights.iter().map(|(_, w)| w).sum();
        if !total.is_finite() || total <= 0.0 {
            return uniform(rng);
        }
        let roll = rng.random::<f64>() * total;
        let mut cumulative = 0.0;
        for (strategy, weight) in weights {
            cumulative += weight;
            if roll < cumulative {
                return strategy;
            }
        }
        // Rounding can leave `roll` a hair above the final cumulative sum.
        Strategy::Spiral
    }

    /// Averages and weights for every strategy.
    pub fn report(&self) -> Vec<StrategyFitnessRow> {
        Strategy::ALL
            .into_iter()
            .map(|strategy| {
                let f = self.get(strategy);
                StrategyFitnessRow {
                    strategy,
                    count: f.count,
                    avg_lifetime: f.avg_lifetime(),
                    avg_distance: f.avg_distance(),
                    avg_cells: f.avg_cells(),
                    weight: f.weight(),
                }
            })
            .collect()
    }
}

fn uniform(rng: &mut impl Rng) -> Strategy {
    let idx = rng.random_range(0..Strategy::ALL.len());
    Strategy::ALL.get(idx).copied().unwrap_or(Strategy::Explorer)
}

/// Counts in a run stay far below 2^52, so the conversion is exact.
#[allow(clippy::cast_precision_loss)]
const fn count_f64(count: u64) -> f64 {
    count as f64
}

fn mean(total: f64, count: u64) -> f64 {
    if count == 0 { 0.0 } else { total / count_f64(count) }
}
