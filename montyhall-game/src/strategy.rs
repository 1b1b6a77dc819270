//! Contestant strategies applied after the host opens a door.

use std::fmt;
use std::str::FromStr;

use rand::seq::IteratorRandom;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What the contestant sees once the host has opened a door.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealedRound<'a> {
    /// Door the contestant currently holds.
    pub initial: usize,
    /// Door the host just opened.
    pub revealed: usize,
    /// Doors still closed, the held door included.
    pub remaining: &'a [usize],
}

/// Decision rule mapping a revealed round to the contestant's next pick.
pub trait Strategy {
    /// Name used for logging and reports.
    fn name(&self) -> &'static str;

    /// Pick the door to hold from `round.remaining`.
    fn choose(&self, round: &RevealedRound<'_>, rng: &mut dyn RngCore) -> usize;
}

/// Switch to a closed door other than the one held.
///
/// With three doors there is exactly one such door. With more, one is picked
/// uniformly at random. If no alternative exists the held door is kept.
pub fn always_swap<R: Rng + ?Sized>(
    initial: usize,
    revealed: usize,
    remaining: &[usize],
    rng: &mut R,
) -> usize {
    remaining
        .iter()
        .copied()
        .filter(|&door| door != initial && door != revealed)
        .choose(rng)
        .unwrap_or(initial)
}

/// Keep the door held.
#[must_use]
pub const fn never_swap(initial: usize, _revealed: usize, _remaining: &[usize]) -> usize {
    initial
}

/// Built-in strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyId {
    AlwaysSwap,
    NeverSwap,
}

impl StrategyId {
    pub const ALL: [Self; 2] = [Self::AlwaysSwap, Self::NeverSwap];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AlwaysSwap => "Always Swap",
            Self::NeverSwap => "Never Swap",
        }
    }

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::AlwaysSwap => "always-swap",
            Self::NeverSwap => "never-swap",
        }
    }
}

impl Strategy for StrategyId {
    fn name(&self) -> &'static str {
        self.label()
    }

    fn choose(&self, round: &RevealedRound<'_>, rng: &mut dyn RngCore) -> usize {
        match self {
            Self::AlwaysSwap => always_swap(round.initial, round.revealed, round.remaining, rng),
            Self::NeverSwap => never_swap(round.initial, round.revealed, round.remaining),
        }
    }
}

impl fmt::Display for StrategyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown strategy '{0}' (expected always-swap or never-swap)")]
pub struct ParseStrategyError(pub String);

impl FromStr for StrategyId {
    type Err = ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "always-swap" | "swap" => Ok(Self::AlwaysSwap),
            "never-swap" | "stick" => Ok(Self::NeverSwap),
            _ => Err(ParseStrategyError(s.to_string())),
        }
    }
}

/// Adapter turning a closure into a [`Strategy`].
pub struct StrategyFn<F> {
    name: &'static str,
    decide: F,
}

impl<F> StrategyFn<F>
where
    F: Fn(&RevealedRound<'_>, &mut dyn RngCore) -> usize,
{
    pub const fn new(name: &'static str, decide: F) -> Self {
        Self { name, decide }
    }
}

impl<F> Strategy for StrategyFn<F>
where
    F: Fn(&RevealedRound<'_>, &mut dyn RngCore) -> usize,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn choose(&self, round: &RevealedRound<'_>, rng: &mut dyn RngCore) -> usize {
        (self.decide)(round, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn always_swap_takes_unique_alternative() {
        let mut rng = SmallRng::seed_from_u64(7);
        assert_eq!(always_swap(0, 1, &[0, 2], &mut rng), 2);
        assert_eq!(always_swap(2, 0, &[1, 2], &mut rng), 1);
    }

    #[test]
    fn always_swap_never_returns_held_or_revealed_door() {
        let mut rng = SmallRng::seed_from_u64(11);
        let remaining = [0, 2, 3, 4];
        for _ in 0..200 {
            let pick = always_swap(0, 1, &remaining, &mut rng);
            assert!(remaining.contains(&pick));
            assert_ne!(pick, 0);
            assert_ne!(pick, 1);
        }
    }

    #[test]
    fn always_swap_keeps_door_without_alternative() {
        let mut rng = SmallRng::seed_from_u64(3);
        assert_eq!(always_swap(4, 1, &[4], &mut rng), 4);
    }

    #[test]
    fn never_swap_keeps_initial() {
        assert_eq!(never_swap(1, 0, &[1, 2]), 1);
    }

    #[test]
    fn strategy_ids_parse_and_label() {
        assert_eq!("always-swap".parse::<StrategyId>(), Ok(StrategyId::AlwaysSwap));
        assert_eq!("Never_Swap".parse::<StrategyId>(), Ok(StrategyId::NeverSwap));
        assert!("sometimes".parse::<StrategyId>().is_err());
        assert_eq!(StrategyId::AlwaysSwap.to_string(), "Always Swap");
        assert_eq!(
            serde_json::to_string(&StrategyId::NeverSwap).unwrap(),
            "\"never-swap\""
        );
    }

    #[test]
    fn closures_act_as_strategies() {
        let lowest = StrategyFn::new("Lowest", |round: &RevealedRound<'_>, _: &mut dyn RngCore| {
            round.remaining.iter().copied().min().unwrap_or(round.initial)
        });
        let mut rng = SmallRng::seed_from_u64(1);
        let round = RevealedRound {
            initial: 2,
            revealed: 1,
            remaining: &[0, 2],
        };
        assert_eq!(lowest.name(), "Lowest");
        assert_eq!(lowest.choose(&round, &mut rng), 0);
        assert_eq!(StrategyId::AlwaysSwap.choose(&round, &mut rng), 0);
        assert_eq!(StrategyId::NeverSwap.choose(&round, &mut rng), 2);
    }
}
