//! Single trial procedure: prize, first pick, host reveal(s), final pick.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::IteratorRandom;
use serde::{Deserialize, Serialize};
use smallvec::{SmallVec, smallvec};
use thiserror::Error;

use crate::strategy::{RevealedRound, Strategy};

/// How many doors the host opens during a trial.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RevealRule {
    /// One door is opened, then the contestant makes a final pick.
    #[default]
    Single,
    /// Doors are opened one at a time until two remain closed; the
    /// contestant picks again after every reveal.
    Progressive,
}

impl RevealRule {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Single => "single",
            Self::Progressive => "progressive",
        }
    }

    const fn reveal_count(self, door_count: usize) -> usize {
        match self {
            Self::Single => 1,
            Self::Progressive => door_count.saturating_sub(2),
        }
    }
}

impl fmt::Display for RevealRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown reveal rule '{0}' (expected single or progressive)")]
pub struct ParseRevealRuleError(pub String);

impl FromStr for RevealRule {
    type Err = ParseRevealRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Self::Single),
            "progressive" => Ok(Self::Progressive),
            _ => Err(ParseRevealRuleError(s.to_string())),
        }
    }
}

pub type DoorHistory = SmallVec<[usize; 4]>;

/// Full history of one trial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub prize: usize,
    /// Every door held, starting with the initial pick.
    pub selections: DoorHistory,
    /// Doors opened by the host, in order.
    pub revealed: DoorHistory,
    pub won: bool,
}

impl TrialRecord {
    #[must_use]
    pub fn initial_choice(&self) -> usize {
        self.selections.first().copied().unwrap_or(self.prize)
    }

    #[must_use]
    pub fn final_choice(&self) -> usize {
        self.selections.last().copied().unwrap_or(self.prize)
    }

    #[must_use]
    pub fn swapped(&self) -> bool {
        self.initial_choice() != self.final_choice()
    }
}

pub(crate) fn play<S, R>(
    prize_sampler: &WeightedIndex<f64>,
    door_count: usize,
    strategy: &S,
    rule: RevealRule,
    rng: &mut R,
) -> TrialRecord
where
    S: Strategy + ?Sized,
    R: Rng,
{
    let prize = prize_sampler.sample(rng);
    let initial = rng.gen_range(0..door_count);
    log::trace!("prize behind door {prize}, contestant holds door {initial}");

    let mut closed: SmallVec<[usize; 8]> = (0..door_count).collect();
    let mut selections: DoorHistory = smallvec![initial];
    let mut revealed = DoorHistory::new();
    let mut current = initial;

    for _ in 0..rule.reveal_count(door_count) {
        let Some(opened) = closed
            .iter()
            .copied()
            .filter(|&door| door != prize && door != current)
            .choose(rng)
        else {
            break;
        };
        closed.retain(|door| *door != opened);
        revealed.push(opened);

        let round = RevealedRound {
            initial: current,
            revealed: opened,
            remaining: &closed,
        };
        let pick = strategy.choose(&round, rng);
        current = accept_pick(pick, current, &closed, strategy.name());
        selections.push(current);
        log::trace!("host opened door {opened}, contestant holds door {current}");
    }

    TrialRecord {
        prize,
        selections,
        revealed,
        won: current == prize,
    }
}

fn accept_pick(pick: usize, current: usize, closed: &[usize], strategy: &str) -> usize {
    if closed.contains(&pick) {
        pick
    } else {
        log::warn!("strategy {strategy} picked door {pick}, which is not closed; keeping door {current}");
        current
    }
}
