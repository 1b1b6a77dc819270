//! Config-driven batch runs, optionally split across worker threads.

use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::analysis::standard_error;
use crate::constants::{DEFAULT_TRIALS, DEFAULT_WORKERS};
use crate::error::{ArgumentError, MontyHallError, Result};
use crate::experiment::MontyHallExperiment;
use crate::numbers::{ratio, split_evenly};
use crate::rng::{entropy_seed, worker_rng};
use crate::strategy::Strategy;
use crate::trial::RevealRule;

/// Batch parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default = "SimulationConfig::default_trials")]
    pub trials: usize,
    /// Base seed; `None` draws one from entropy and records it in the report.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "SimulationConfig::default_workers")]
    pub workers: usize,
    #[serde(default)]
    pub reveal: RevealRule,
}

impl SimulationConfig {
    const fn default_trials() -> usize {
        DEFAULT_TRIALS
    }

    const fn default_workers() -> usize {
        DEFAULT_WORKERS
    }

    #[must_use]
    pub const fn new(trials: usize) -> Self {
        Self {
            trials,
            seed: None,
            workers: DEFAULT_WORKERS,
            reveal: RevealRule::Single,
        }
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub const fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    #[must_use]
    pub const fn with_reveal(mut self, reveal: RevealRule) -> Self {
        self.reveal = reveal;
        self
    }

    /// Check the parameters before any trial runs.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for zero trials or zero workers.
    pub const fn validate(&self) -> Result<(), ArgumentError> {
        if self.trials == 0 {
            return Err(ArgumentError::ZeroTrials);
        }
        if self.workers == 0 {
            return Err(ArgumentError::ZeroWorkers);
        }
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TRIALS)
    }
}

/// Aggregate outcome of one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub strategy: String,
    pub door_count: usize,
    pub reveal: RevealRule,
    pub seed: u64,
    pub workers: usize,
    pub trials: usize,
    pub wins: usize,
    pub win_rate: f64,
    pub standard_error: f64,
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
}

impl SimulationReport {
    #[must_use]
    pub const fn losses(&self) -> usize {
        self.trials - self.wins
    }
}

impl MontyHallExperiment {
    /// Run a batch described by `config`.
    ///
    /// With more than one worker the trials are split into contiguous
    /// chunks, each drawn from its own stream derived from the seed, so a
    /// given `(seed, workers)` pair always reproduces the same report.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an invalid config, `WorkerSpawn` when
    /// the OS refuses a worker thread, and `WorkerPanicked` if a worker
    /// thread dies.
    pub fn simulate<S>(&self, strategy: &S, config: &SimulationConfig) -> Result<SimulationReport>
    where
        S: Strategy + Sync + ?Sized,
    {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(entropy_seed);
        let workers = config.workers.min(config.trials);
        let start = Instant::now();

        let wins = if workers == 1 {
            let mut rng = worker_rng(seed, 0);
            self.count_wins(strategy, config.reveal, config.trials, &mut rng)
        } else {
            self.count_wins_parallel(strategy, config.reveal, config.trials, seed, workers)?
        };

        let elapsed = start.elapsed();
        let win_rate = ratio(wins, config.trials);
        log::info!(
            "ran {} {} trials on {} doors in {elapsed:?} ({} workers, seed {seed}): win rate {win_rate:.4}",
            config.trials,
            strategy.name(),
            self.number_of_doors(),
            workers,
        );

        Ok(SimulationReport {
            strategy: strategy.name().to_string(),
            door_count: self.number_of_doors(),
            reveal: config.reveal,
            seed,
            workers,
            trials: config.trials,
            wins,
            win_rate,
            standard_error: standard_error(win_rate, config.trials),
            elapsed,
        })
    }

    fn count_wins_parallel<S>(
        &self,
        strategy: &S,
        reveal: RevealRule,
        trials: usize,
        seed: u64,
        workers: usize,
    ) -> Result<usize>
    where
        S: Strategy + Sync + ?Sized,
    {
        thread::scope(|scope| -> Result<usize> {
            let handles = split_evenly(trials, workers)
                .into_iter()
                .enumerate()
                .map(|(worker, chunk)| {
                    thread::Builder::new()
                        .name(format!("montyhall-worker-{worker}"))
                        .spawn_scoped(scope, move || {
                            let mut rng = worker_rng(seed, worker);
                            self.count_wins(strategy, reveal, chunk, &mut rng)
                        })
                        .map(|handle| (worker, handle))
                        .map_err(|err| MontyHallError::WorkerSpawn {
                            worker,
                            reason: err.to_string(),
                        })
                })
                .collect::<Result<Vec<_>>>()?;

            handles
                .into_iter()
                .try_fold(0usize, |total, (worker, handle)| -> Result<usize> {
                    let wins = handle
                        .join()
                        .map_err(|_| MontyHallError::WorkerPanicked { worker })?;
                    log::debug!("worker {worker} finished with {wins} wins");
                    Ok(total + wins)
                })
        })
    }
}

mod duration_millis {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        u64::try_from(duration.as_millis())
            .unwrap_or(u64::MAX)
            .serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
