use anyhow::{Result, bail};
use montyhall_game::within_tolerance;
use serde::Serialize;

use super::tester::RunRecord;

/// Comparison of every run against its closed-form win probability.
#[derive(Debug, Clone, Serialize)]
pub struct AcceptanceOutcome {
    pub tolerance: f64,
    pub checked: usize,
    pub failures: Vec<String>,
}

impl AcceptanceOutcome {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

pub fn evaluate_acceptance(records: &[RunRecord], tolerance: f64) -> AcceptanceOutcome {
    let mut checked = 0;
    let mut failures = Vec::new();

    for record in records {
        let Some(expected) = record.expected else {
            log::warn!(
                "no closed-form expectation for {} on {} doors",
                record.strategy,
                record.report.door_count
            );
            continue;
        };
        checked += 1;
        if !within_tolerance(record.report.win_rate, expected, tolerance) {
            failures.push(format!(
                "{} seed {}: observed {:.4}, expected {:.4} (off by {:.4})",
                record.strategy.label(),
                record.seed.label(),
                record.report.win_rate,
                expected,
                (record.report.win_rate - expected).abs()
            ));
        }
    }

    AcceptanceOutcome {
        tolerance,
        checked,
        failures,
    }
}

pub fn validate_acceptance(outcome: &AcceptanceOutcome) -> Result<()> {
    if !outcome.passed() {
        bail!(
            "{} of {} runs drifted beyond tolerance {:.4}:\n{}",
            outcome.failures.len(),
            outcome.checked,
            outcome.tolerance,
            outcome.failures.join("\n")
        );
    }
    Ok(())
}
