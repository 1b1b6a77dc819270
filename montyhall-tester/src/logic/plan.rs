use anyhow::{Context, Result, bail};
use montyhall_game::{MIN_DOORS, MontyHallExperiment, RevealRule, SimulationConfig, StrategyId};
use serde::Deserialize;
use std::path::Path;

use super::seeds::{SeedInfo, resolve_seed_inputs};

/// Minimum trial count per run when acceptance checks are requested.
pub const ACCEPTANCE_TRIALS: usize = 100_000;

/// Optional JSON file providing defaults for a tester run.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TesterConfig {
    pub doors: Option<usize>,
    pub probabilities: Option<Vec<f64>>,
    pub strategies: Option<Vec<StrategyId>>,
    pub seeds: Option<Vec<u64>>,
    pub tolerance: Option<f64>,
    pub simulation: SimulationConfig,
}

impl TesterConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
    }
}

/// Values given explicitly on the command line; each one overrides the file.
#[derive(Debug, Clone, Default)]
pub struct PlanOverrides {
    pub doors: Option<usize>,
    pub probabilities: Option<Vec<f64>>,
    pub strategies: Option<Vec<StrategyId>>,
    pub seeds: Option<Vec<String>>,
    pub trials: Option<usize>,
    pub workers: Option<usize>,
    pub reveal: Option<RevealRule>,
    pub tolerance: Option<f64>,
    pub acceptance: bool,
}

/// Everything needed to execute and judge a tester run.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub experiment: MontyHallExperiment,
    pub strategies: Vec<StrategyId>,
    pub seeds: Vec<SeedInfo>,
    pub simulation: SimulationConfig,
    pub tolerance: f64,
    pub acceptance: bool,
}

pub const DEFAULT_TOLERANCE: f64 = 0.02;

impl RunPlan {
    pub fn resolve(file: TesterConfig, cli: PlanOverrides) -> Result<Self> {
        let experiment = match (cli.probabilities, cli.doors) {
            (Some(probabilities), _) => MontyHallExperiment::from_probabilities(&probabilities),
            (None, Some(doors)) => MontyHallExperiment::with_door_count(doors),
            (None, None) => match (file.probabilities, file.doors) {
                (Some(probabilities), _) => MontyHallExperiment::from_probabilities(&probabilities),
                (None, doors) => MontyHallExperiment::with_door_count(doors.unwrap_or(MIN_DOORS)),
            },
        }
        .context("invalid door setup")?;

        let strategies = cli
            .strategies
            .or(file.strategies)
            .filter(|list| !list.is_empty())
            .unwrap_or_else(|| StrategyId::ALL.to_vec());

        let seed_tokens = match (cli.seeds, file.seeds) {
            (Some(tokens), _) => tokens,
            (None, Some(seeds)) => seeds.iter().map(ToString::to_string).collect(),
            (None, None) => file
                .simulation
                .seed
                .map(|seed| vec![seed.to_string()])
                .unwrap_or_default(),
        };
        let seeds = resolve_seed_inputs(&seed_tokens)?;

        let mut simulation = file.simulation;
        if let Some(trials) = cli.trials {
            simulation.trials = trials;
        }
        if let Some(workers) = cli.workers {
            simulation.workers = workers;
        }
        if let Some(reveal) = cli.reveal {
            simulation.reveal = reveal;
        }
        if cli.acceptance && simulation.trials < ACCEPTANCE_TRIALS {
            log::info!(
                "acceptance mode: raising trials from {} to {ACCEPTANCE_TRIALS}",
                simulation.trials
            );
            simulation.trials = ACCEPTANCE_TRIALS;
        }
        simulation.validate().context("invalid simulation settings")?;

        let tolerance = cli.tolerance.or(file.tolerance).unwrap_or(DEFAULT_TOLERANCE);
        if !tolerance.is_finite() || tolerance < 0.0 {
            bail!("tolerance must be a finite, non-negative number (got {tolerance})");
        }

        Ok(Self {
            experiment,
            strategies,
            seeds,
            simulation,
            tolerance,
            acceptance: cli.acceptance,
        })
    }

    #[must_use]
    pub fn run_count(&self) -> usize {
        self.strategies.len() * self.seeds.len()
    }
}
