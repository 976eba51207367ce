//! Movement strategies.
//!
//! Each [`Strategy`] turns an agent's heading and turn preference into an
//! ordered list of all six directions. The tick cycle takes the first one
//! that passes the legality checks in [`crate::legality`].
//!
//! Offsets below are in sixths of a turn relative to the heading, with `s`
//! the preference sign (`+1` right, `-1` left):
//!
//! | strategy       | order                                   |
//! |----------------|-----------------------------------------|
//! | wall follower  | `+s, 0, +2s, 3, -2s, -s`                |
//! | wanderer       | `0, ±1, ±2, 3, +1, -1` (fresh coin flips) |
//! | spiral         | `+s, +2s, 0, 3, -s, -2s`                |
//! | explorer       | Fisher-Yates shuffle of all six         |

use hextrail_types::{DIRECTION_COUNT, Direction, Strategy, TurnPreference};
use rand::Rng;
use rand::seq::SliceRandom;

/// Fallback fill order for directions a strategy did not name.
const FILL_OFFSETS: [i32; DIRECTION_COUNT] = [0, 1, -1, 2, -2, 3];

/// Ordered direction preferences for one agent on one tick.
///
/// The result is always a permutation of all six directions.
pub fn propose_directions(
    strategy: Strategy,
    heading: Direction,
    preference: TurnPreference,
    rng: &mut impl Rng,
) -> Vec<Direction> {
    match strategy {
        Strategy::WallFollower => wall_follower(heading, preference),
        Strategy::Wanderer => wanderer(heading, rng),
        Strategy::Explorer => explorer(rng),
        Strategy::Spiral => spiral(heading, preference),
    }
}

fn wall_follower(heading: Direction, preference: TurnPreference) -> Vec<Direction> {
    let s = preference.sign();
    from_offsets(heading, [s, 0, s.wrapping_mul(2), 3, s.wrapping_mul(-2), s.wrapping_neg()])
}

fn wanderer(heading: Direction, rng: &mut impl Rng) -> Vec<Direction> {
    let first_turn = if rng.random_bool(0.5) { 1 } else { -1 };
    let second_turn = if rng.random_bool(0.5) { 2 } else { -2 };
    from_offsets(heading, [0, first_turn, second_turn, 3, 1, -1])
}

fn spiral(heading: Direction, preference: TurnPreference) -> Vec<Direction> {
    let s = preference.sign();
    from_offsets(heading, [s, s.wrapping_mul(2), 0, 3, s.wrapping_neg(), s.wrapping_mul(-2)])
}

fn explorer(rng: &mut impl Rng) -> Vec<Direction> {
    let mut all = Direction::ALL;
    all.shuffle(rng);
    all.to_vec()
}

/// Rotate `heading` by each offset, dropping repeats and appending any
/// direction the offsets missed.
fn from_offsets(heading: Direction, offsets: [i32; DIRECTION_COUNT]) -> Vec<Direction> {
    let mut order: Vec<Direction> = Vec::with_capacity(DIRECTION_COUNT);
    for offset in offsets.into_iter().chain(FILL_OFFSETS) {
        let dir = heading.rotated(offset);
        if !order.contains(&dir) {
            order.push(dir);
        }
    }
    order
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn is_permutation(order: &[Direction]) -> bool {
        order.len() == DIRECTION_COUNT && order.iter().collect::<BTreeSet<_>>().len() == DIRECTION_COUNT
    }

    #[test]
    fn wall_follower_right_from_east() {
        let mut rng = StdRng::seed_from_u64(1);
        let order = propose_directions(
            Strategy::WallFollower,
            Direction::East,
            TurnPreference::Right,
            &mut rng,
        );
        assert_eq!(
            order,
            vec![
                Direction::SouthEast,
                Direction::East,
                Direction::SouthWest,
                Direction::West,
                Direction::NorthWest,
                Direction::NorthEast,
            ]
        );
    }

    #[test]
    fn spiral_left_from_west() {
        let mut rng = StdRng::seed_from_u64(1);
        let order =
            propose_directions(Strategy::Spiral, Direction::West, TurnPreference::Left, &mut rng);
        assert_eq!(
            order,
            vec![
                Direction::SouthWest,
                Direction::SouthEast,
                Direction::West,
                Direction::East,
                Direction::NorthWest,
                Direction::NorthEast,
            ]
        );
    }

    #[test]
    fn wanderer_goes_straight_first_and_reverses_fourth() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let order = propose_directions(
                Strategy::Wanderer,
                Direction::NorthEast,
                TurnPreference::Right,
                &mut rng,
            );
            assert_eq!(order.first(), Some(&Direction::NorthEast));
            assert_eq!(order.get(3), Some(&Direction::SouthWest));
            assert!(is_permutation(&order));
        }
    }

    #[test]
    fn every_strategy_yields_a_permutation() {
        let mut rng = StdRng::seed_from_u64(42);
        for strategy in Strategy::ALL {
            for heading in Direction::ALL {
                for pref in [TurnPreference::Left, TurnPreference::Right] {
                    let order = propose_directions(strategy, heading, pref, &mut rng);
                    assert!(is_permutation(&order), "{strategy} {heading:?} {pref:?}");
                }
            }
        }
    }

    #[test]
    fn explorer_order_varies_between_ticks() {
        let mut rng = StdRng::seed_from_u64(3);
        let orders: BTreeSet<Vec<Direction>> = (0..20)
            .map(|_| {
                propose_directions(
                    Strategy::Explorer,
                    Direction::East,
                    TurnPreference::Right,
                    &mut rng,
                )
            })
            .collect();
        assert!(orders.len() > 1);
    }
}
