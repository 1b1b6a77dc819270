use anyhow::{Context, Result};
use colored::Colorize;
use montyhall_game::{SimulationReport, StrategyId, expected_win_probability};
use serde::Serialize;
use std::collections::BTreeMap;

use super::plan::RunPlan;
use super::seeds::SeedInfo;

/// One batch: a strategy played under one seed.
#[derive(Debug, Clone, Serialize)]
pub struct RunRecord {
    pub strategy: StrategyId,
    pub seed: SeedInfo,
    pub expected: Option<f64>,
    pub report: SimulationReport,
}

impl RunRecord {
    #[must_use]
    pub fn deviation(&self) -> Option<f64> {
        self.expected.map(|expected| self.report.win_rate - expected)
    }
}

/// Per-strategy statistics across every seed of a run.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyAggregate {
    pub strategy: StrategyId,
    pub runs: usize,
    pub trials: usize,
    pub wins: usize,
    pub pooled_win_rate: f64,
    pub mean_win_rate: f64,
    pub std_win_rate: f64,
    pub expected: Option<f64>,
}

pub struct LogicTester {
    verbose: bool,
}

impl LogicTester {
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    pub fn run_plan(&self, plan: &RunPlan) -> Result<Vec<RunRecord>> {
        let doors = plan.experiment.number_of_doors();
        let mut records = Vec::with_capacity(plan.run_count());

        for &strategy in &plan.strategies {
            let expected = expected_win_probability(doors, strategy, plan.simulation.reveal);
            for seed in &plan.seeds {
                if self.verbose {
                    eprintln!(
                        "🧪 Simulating {} (doors: {doors} seed: {})",
                        strategy.label().bright_white(),
                        seed.label()
                    );
                }

                let config = plan.simulation.with_seed(seed.seed);
                let report = plan
                    .experiment
                    .simulate(&strategy, &config)
                    .with_context(|| format!("{strategy} run with seed {} failed", seed.label()))?;

                if self.verbose {
                    eprintln!(
                        "  ✅ {}/{} wins ({:.4}) in {:?}",
                        report.wins, report.trials, report.win_rate, report.elapsed
                    );
                }

                records.push(RunRecord {
                    strategy,
                    seed: seed.clone(),
                    expected,
                    report,
                });
            }
        }

        Ok(records)
    }
}

pub fn aggregate_runs(records: &[RunRecord]) -> Vec<StrategyAggregate> {
    let mut builders: BTreeMap<StrategyId, AggregateBuilder> = BTreeMap::new();
    for record in records {
        builders
            .entry(record.strategy)
            .or_insert_with(|| AggregateBuilder::new(record))
            .ingest(record);
    }
    builders.into_values().map(AggregateBuilder::finish).collect()
}

struct AggregateBuilder {
    strategy: StrategyId,
    expected: Option<f64>,
    runs: usize,
    trials: usize,
    wins: usize,
    rates: RunningStats,
}

impl AggregateBuilder {
    fn new(record: &RunRecord) -> Self {
        Self {
            strategy: record.strategy,
            expected: record.expected,
            runs: 0,
            trials: 0,
            wins: 0,
            rates: RunningStats::default(),
        }
    }

    fn ingest(&mut self, record: &RunRecord) {
        self.runs += 1;
        self.trials += record.report.trials;
        self.wins += record.report.wins;
        self.rates.add(record.report.win_rate);
    }

    fn finish(self) -> StrategyAggregate {
        StrategyAggregate {
            strategy: self.strategy,
            runs: self.runs,
            trials: self.trials,
            wins: self.wins,
            pooled_win_rate: montyhall_game::numbers::ratio(self.wins, self.trials),
            mean_win_rate: self.rates.mean(),
            std_win_rate: self.rates.std_dev(),
            expected: self.expected,
        }
    }
}

#[derive(Debug, Default, Clone)]
struct RunningStats {
    count: u32,
    mean: f64,
    m2: f64,
}

impl RunningStats {
    fn add(&mut self, value: f64) {
        self.count += 1;
        let count = f64::from(self.count);
        let delta = value - self.mean;
        self.mean += delta / count;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    const fn mean(&self) -> f64 {
        if self.count == 0 { 0.0 } else { self.mean }
    }

    fn variance(&self) -> f64 {
        if self.count > 1 {
            self.m2 / f64::from(self.count - 1)
        } else {
            0.0
        }
    }

    fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }
}
