//! Experiment configuration and the single-trial / batch entry points.

use once_cell::sync::Lazy;
use rand::Rng;
use rand::distributions::WeightedIndex;

use crate::constants::{DEFAULT_TRIALS, MIN_DOORS, PROBABILITY_SUM_TOLERANCE};
use crate::door::Door;
use crate::error::{ArgumentError, ConfigurationError, Result};
use crate::numbers::{ratio, usize_to_f64};
use crate::strategy::Strategy;
use crate::trial::{RevealRule, TrialRecord, play};

/// The classical game: three doors, each equally likely to hide the prize.
pub static CLASSICAL_MONTY_HALL: Lazy<MontyHallExperiment> = Lazy::new(|| {
    MontyHallExperiment::with_door_count(MIN_DOORS).expect("three uniform doors are valid")
});

/// A fixed set of doors reused for many independent trials.
///
/// Validation happens once at construction; afterwards every trial draws
/// fresh randomness and the doors are never mutated.
#[derive(Debug, Clone)]
pub struct MontyHallExperiment {
    doors: Vec<Door>,
    prize_sampler: WeightedIndex<f64>,
}

impl MontyHallExperiment {
    /// Build an experiment from explicit doors.
    ///
    /// Doors created with [`Door::unspecified`] share the probability mass
    /// the other doors leave over equally.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` when fewer than three doors are given,
    /// the specified probabilities already exceed one, or the final
    /// probabilities do not sum to one.
    pub fn new<I>(doors: I) -> Result<Self>
    where
        I: IntoIterator<Item = Door>,
    {
        let doors: Vec<Door> = doors.into_iter().collect();
        if doors.len() < MIN_DOORS {
            return Err(ConfigurationError::TooFewDoors {
                count: doors.len(),
                min: MIN_DOORS,
            }
            .into());
        }
        let doors = assign_leftover(doors)?;
        let sum: f64 = doors.iter().map(Door::probability).sum();
        if (sum - 1.0).abs() > PROBABILITY_SUM_TOLERANCE {
            return Err(ConfigurationError::ProbabilitySum { sum }.into());
        }
        Self::from_validated(doors)
    }

    /// Build `number_of_doors` doors that share the prize probability equally.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` when `number_of_doors` is below three.
    pub fn with_door_count(number_of_doors: usize) -> Result<Self> {
        if number_of_doors < MIN_DOORS {
            return Err(ConfigurationError::TooFewDoors {
                count: number_of_doors,
                min: MIN_DOORS,
            }
            .into());
        }
        Self::from_validated(vec![Door::uniform_share(number_of_doors); number_of_doors])
    }

    /// Build an experiment from raw probabilities.
    ///
    /// # Errors
    ///
    /// Returns `InvalidProbability` for a value outside `[0, 1]`, otherwise
    /// the same errors as [`MontyHallExperiment::new`].
    pub fn from_probabilities(probabilities: &[f64]) -> Result<Self> {
        let doors = probabilities
            .iter()
            .map(|&p| Door::new(p))
            .collect::<Result<Vec<_>>>()?;
        Self::new(doors)
    }

    fn from_validated(doors: Vec<Door>) -> Result<Self> {
        let prize_sampler = WeightedIndex::new(doors.iter().map(Door::probability))
            .map_err(|err| ConfigurationError::Sampler(err.to_string()))?;
        Ok(Self {
            doors,
            prize_sampler,
        })
    }

    #[must_use]
    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    #[must_use]
    pub fn number_of_doors(&self) -> usize {
        self.doors.len()
    }

    #[must_use]
    pub fn probabilities(&self) -> Vec<f64> {
        self.doors.iter().map(Door::probability).collect()
    }

    /// Play one trial with a single reveal using the thread-local generator.
    pub fn run_single_trial<S>(&self, strategy: &S) -> bool
    where
        S: Strategy + ?Sized,
    {
        self.run_single_trial_with(strategy, &mut rand::thread_rng())
    }

    /// Play one trial with a single reveal using `rng`.
    pub fn run_single_trial_with<S, R>(&self, strategy: &S, rng: &mut R) -> bool
    where
        S: Strategy + ?Sized,
        R: Rng,
    {
        self.play_trial(strategy, RevealRule::Single, rng).won
    }

    /// Play one trial under `rule` and keep its full history.
    pub fn play_trial<S, R>(&self, strategy: &S, rule: RevealRule, rng: &mut R) -> TrialRecord
    where
        S: Strategy + ?Sized,
        R: Rng,
    {
        play(
            &self.prize_sampler,
            self.doors.len(),
            strategy,
            rule,
            rng,
        )
    }

    /// Empirical win probability over `number_of_trials` trials.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when `number_of_trials` is zero.
    pub fn run_simulations<S>(&self, strategy: &S, number_of_trials: usize) -> Result<f64>
    where
        S: Strategy + ?Sized,
    {
        self.run_simulations_with(strategy, number_of_trials, &mut rand::thread_rng())
    }

    /// [`MontyHallExperiment::run_simulations`] with [`DEFAULT_TRIALS`] trials.
    ///
    /// # Errors
    ///
    /// Never fails for the default trial count; the `Result` mirrors
    /// [`MontyHallExperiment::run_simulations`].
    pub fn run_default_simulations<S>(&self, strategy: &S) -> Result<f64>
    where
        S: Strategy + ?Sized,
    {
        self.run_simulations(strategy, DEFAULT_TRIALS)
    }

    /// Empirical win probability drawing every trial from `rng`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when `number_of_trials` is zero.
    pub fn run_simulations_with<S, R>(
        &self,
        strategy: &S,
        number_of_trials: usize,
        rng: &mut R,
    ) -> Result<f64>
    where
        S: Strategy + ?Sized,
        R: Rng,
    {
        if number_of_trials == 0 {
            return Err(ArgumentError::ZeroTrials.into());
        }
        let wins = self.count_wins(strategy, RevealRule::Single, number_of_trials, rng);
        Ok(ratio(wins, number_of_trials))
    }

    pub(crate) fn count_wins<S, R>(
        &self,
        strategy: &S,
        rule: RevealRule,
        trials: usize,
        rng: &mut R,
    ) -> usize
    where
        S: Strategy + ?Sized,
        R: Rng,
    {
        (0..trials)
            .filter(|_| self.play_trial(strategy, rule, rng).won)
            .count()
    }
}

// Unspecified doors split `1 - specified` evenly.
fn assign_leftover(doors: Vec<Door>) -> Result<Vec<Door>> {
    let unspecified = doors.iter().filter(|door| !door.is_specified()).count();
    if unspecified == 0 {
        return Ok(doors);
    }
    let specified: f64 = doors.iter().map(Door::probability).sum();
    if specified > 1.0 + PROBABILITY_SUM_TOLERANCE {
        return Err(ConfigurationError::ProbabilitySum { sum: specified }.into());
    }
    let share = (1.0 - specified).max(0.0) / usize_to_f64(unspecified);
    log::debug!("assigning {share:.6} to each of {unspecified} unspecified doors");
    doors
        .into_iter()
        .map(|door| {
            if door.is_specified() {
                Ok(door)
            } else {
                door.assigned(share)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MontyHallError;
    use crate::strategy::StrategyId;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn door_count_builds_uniform_doors() {
        let experiment = MontyHallExperiment::with_door_count(4).unwrap();
        assert_eq!(experiment.number_of_doors(), 4);
        assert!(
            experiment
                .probabilities()
                .iter()
                .all(|p| (p - 0.25).abs() < f64::EPSILON)
        );
    }

    #[test]
    fn rejects_too_few_doors() {
        assert_eq!(
            MontyHallExperiment::with_door_count(2).unwrap_err(),
            MontyHallError::InvalidConfiguration(ConfigurationError::TooFewDoors {
                count: 2,
                min: 3
            })
        );
        let doors = [Door::new(0.5).unwrap(), Door::new(0.5).unwrap()];
        assert!(matches!(
            MontyHallExperiment::new(doors),
            Err(MontyHallError::InvalidConfiguration(
                ConfigurationError::TooFewDoors { .. }
            ))
        ));
    }

    #[test]
    fn rejects_probabilities_not_summing_to_one() {
        let err = MontyHallExperiment::from_probabilities(&[0.5, 0.3, 0.1]).unwrap_err();
        assert!(matches!(
            err,
            MontyHallError::InvalidConfiguration(ConfigurationError::ProbabilitySum { .. })
        ));
        assert!(MontyHallExperiment::from_probabilities(&[0.5, 0.3, 0.2]).is_ok());
        assert!(MontyHallExperiment::from_probabilities(&[0.6, 0.3, 0.2]).is_err());
    }

    #[test]
    fn invalid_probability_surfaces_before_sum_check() {
        assert_eq!(
            MontyHallExperiment::from_probabilities(&[1.5, -0.25, -0.25]).unwrap_err(),
            MontyHallError::InvalidProbability { probability: 1.5 }
        );
    }

    #[test]
    fn zero_trials_is_an_invalid_argument() {
        let err = CLASSICAL_MONTY_HALL
            .run_simulations(&StrategyId::AlwaysSwap, 0)
            .unwrap_err();
        assert_eq!(err, MontyHallError::InvalidArgument(ArgumentError::ZeroTrials));
    }

    #[test]
    fn seeded_batches_replay_exactly() {
        let experiment = MontyHallExperiment::with_door_count(5).unwrap();
        let mut first = SmallRng::seed_from_u64(99);
        let mut second = SmallRng::seed_from_u64(99);
        let a = experiment
            .run_simulations_with(&StrategyId::AlwaysSwap, 500, &mut first)
            .unwrap();
        let b = experiment
            .run_simulations_with(&StrategyId::AlwaysSwap, 500, &mut second)
            .unwrap();
        assert!((a - b).abs() < f64::EPSILON);
        assert!((0.0..=1.0).contains(&a));
    }

    #[test]
    fn batches_leave_doors_untouched() {
        let experiment = MontyHallExperiment::from_probabilities(&[0.5, 0.3, 0.2]).unwrap();
        let before = experiment.probabilities();
        let _ = experiment.run_simulations(&StrategyId::NeverSwap, 200).unwrap();
        let _ = experiment.run_default_simulations(&StrategyId::AlwaysSwap).unwrap();
        assert_eq!(experiment.probabilities(), before);
    }

    #[test]
    fn unspecified_doors_share_leftover_mass() {
        let experiment = MontyHallExperiment::new([
            Door::new(0.5).unwrap().with_label("A"),
            Door::unspecified().with_label("B"),
            Door::unspecified(),
        ])
        .unwrap();
        let probabilities = experiment.probabilities();
        assert!((probabilities[0] - 0.5).abs() < 1e-12);
        assert!((probabilities[1] - 0.25).abs() < 1e-12);
        assert!((probabilities[2] - 0.25).abs() < 1e-12);
        assert!(experiment.doors().iter().all(Door::is_specified));
        assert_eq!(experiment.doors()[1].label(), Some("B"));
    }

    #[test]
    fn all_unspecified_doors_become_uniform() {
        let experiment = MontyHallExperiment::new(vec![Door::unspecified(); 4]).unwrap();
        assert!(
            experiment
                .probabilities()
                .iter()
                .all(|p| (p - 0.25).abs() < 1e-12)
        );
    }

    #[test]
    fn specified_mass_above_one_is_rejected_before_assignment() {
        let err = MontyHallExperiment::new([
            Door::new(0.7).unwrap(),
            Door::new(0.6).unwrap(),
            Door::unspecified(),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            MontyHallError::InvalidConfiguration(ConfigurationError::ProbabilitySum { .. })
        ));
    }

    #[test]
    fn fully_specified_doors_leave_nothing_for_the_rest() {
        let experiment = MontyHallExperiment::new([
            Door::new(0.6).unwrap(),
            Door::new(0.4).unwrap(),
            Door::unspecified(),
        ])
        .unwrap();
        assert!(experiment.probabilities()[2].abs() < f64::EPSILON);
    }

    #[test]
    fn classical_experiment_has_three_equal_doors() {
        assert_eq!(CLASSICAL_MONTY_HALL.number_of_doors(), 3);
        let sum: f64 = CLASSICAL_MONTY_HALL.probabilities().iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }
}
