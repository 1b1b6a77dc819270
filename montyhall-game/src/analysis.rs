//! Closed-form win probabilities for the built-in strategies.
//!
//! The contestant's first pick is uniform and independent of the prize, so
//! none of these values depend on the individual door probabilities; only
//! the door count and the reveal rule matter.

use crate::constants::MIN_DOORS;
use crate::numbers::usize_to_f64;
use crate::strategy::StrategyId;
use crate::trial::RevealRule;

/// Exact win probability of `strategy`, or `None` below three doors.
#[must_use]
pub fn expected_win_probability(
    door_count: usize,
    strategy: StrategyId,
    rule: RevealRule,
) -> Option<f64> {
    if door_count < MIN_DOORS {
        return None;
    }
    let n = usize_to_f64(door_count);
    let p = match (strategy, rule) {
        (StrategyId::NeverSwap, _) => 1.0 / n,
        (StrategyId::AlwaysSwap, RevealRule::Single) => (n - 1.0) / (n * (n - 2.0)),
        (StrategyId::AlwaysSwap, RevealRule::Progressive) => progressive_swap(door_count),
    };
    Some(p)
}

// Probability the held door hides the prize, tracked while doors close.
// Holding the prize means the swap loses it; otherwise the swap finds it
// among the k-2 other closed doors.
fn progressive_swap(door_count: usize) -> f64 {
    let mut holding_prize = 1.0 / usize_to_f64(door_count);
    for closed in (3..=door_count).rev() {
        holding_prize = (1.0 - holding_prize) / usize_to_f64(closed - 2);
    }
    holding_prize
}

/// Binomial standard error of an observed rate.
#[must_use]
pub fn standard_error(rate: f64, trials: usize) -> f64 {
    if trials == 0 {
        return 0.0;
    }
    (rate * (1.0 - rate) / usize_to_f64(trials)).max(0.0).sqrt()
}

/// Whether `observed` lies within `tolerance` of `expected`.
#[must_use]
pub fn within_tolerance(observed: f64, expected: f64, tolerance: f64) -> bool {
    (observed - expected).abs() <= tolerance
}
