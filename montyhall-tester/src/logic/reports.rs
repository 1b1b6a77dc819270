use anyhow::Result;
use chrono::Utc;
use colored::Colorize;
use serde::Serialize;
use std::io::Write;
use std::time::Duration;

use super::acceptance::AcceptanceOutcome;
use super::plan::RunPlan;
use super::tester::{RunRecord, StrategyAggregate};

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    doors: usize,
    probabilities: Vec<f64>,
    runs: &'a [RunRecord],
    aggregates: &'a [StrategyAggregate],
    acceptance: Option<&'a AcceptanceOutcome>,
}

fn fmt_expected(expected: Option<f64>) -> String {
    expected.map_or_else(|| "-".to_string(), |value| format!("{value:.4}"))
}

fn fmt_probabilities(plan: &RunPlan) -> String {
    plan.experiment
        .probabilities()
        .iter()
        .map(|p| format!("{p:.3}"))
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn generate_console_report(
    out: &mut dyn Write,
    plan: &RunPlan,
    records: &[RunRecord],
    aggregates: &[StrategyAggregate],
    acceptance: Option<&AcceptanceOutcome>,
    total_duration: Duration,
) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "📊 Simulation Results Summary".bright_cyan().bold())?;
    writeln!(out, "{}", "=============================".cyan())?;
    writeln!(
        out,
        "Doors: {} [{}]",
        plan.experiment.number_of_doors(),
        fmt_probabilities(plan)
    )?;
    writeln!(out, "Reveal rule: {}", plan.simulation.reveal)?;
    writeln!(out, "Trials per run: {}", plan.simulation.trials)?;
    writeln!(out, "Runs: {}", records.len())?;
    writeln!(out, "Total time: {total_duration:?}")?;
    writeln!(out)?;

    for record in records {
        writeln!(
            out,
            "{} seed {}",
            record.strategy.label().bold(),
            record.seed.label()
        )?;
        writeln!(
            out,
            "   Wins: {}/{} ({:.4} ± {:.4})",
            record.report.wins,
            record.report.trials,
            record.report.win_rate,
            record.report.standard_error
        )?;
        writeln!(out, "   Expected: {}", fmt_expected(record.expected))?;
        writeln!(out, "   Time: {:?}", record.report.elapsed)?;
        writeln!(out)?;
    }

    if !aggregates.is_empty() {
        writeln!(out, "{}", "🎯 Strategy Summary".bright_yellow().bold())?;
        writeln!(out, "{}", "===================".yellow())?;
        for aggregate in aggregates {
            writeln!(
                out,
                "{:<12} pooled {:.4} | mean {:.4} ± {:.4} over {} runs | expected {}",
                aggregate.strategy.label(),
                aggregate.pooled_win_rate,
                aggregate.mean_win_rate,
                aggregate.std_win_rate,
                aggregate.runs,
                fmt_expected(aggregate.expected)
            )?;
        }
    }

    if let Some(outcome) = acceptance {
        writeln!(out)?;
        let status = if outcome.passed() {
            "✅ Acceptance passed".green()
        } else {
            "❌ Acceptance failed".red()
        };
        writeln!(out, "{status} (tolerance {:.4})", outcome.tolerance)?;
        for failure in &outcome.failures {
            writeln!(out, "     • {}", failure.red())?;
        }
    }

    Ok(())
}

pub fn generate_json_report(
    out: &mut dyn Write,
    plan: &RunPlan,
    records: &[RunRecord],
    aggregates: &[StrategyAggregate],
    acceptance: Option<&AcceptanceOutcome>,
) -> Result<()> {
    let report = JsonReport {
        generated_at: Utc::now().to_rfc3339(),
        doors: plan.experiment.number_of_doors(),
        probabilities: plan.experiment.probabilities(),
        runs: records,
        aggregates,
        acceptance,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

pub fn generate_markdown_report(
    out: &mut dyn Write,
    plan: &RunPlan,
    records: &[RunRecord],
    aggregates: &[StrategyAggregate],
) -> Result<()> {
    writeln!(out, "# Monty Hall Simulation Results\n")?;
    writeln!(out, "## Setup\n")?;
    writeln!(
        out,
        "- **Doors**: {} ({})",
        plan.experiment.number_of_doors(),
        fmt_probabilities(plan)
    )?;
    writeln!(out, "- **Reveal rule**: {}", plan.simulation.reveal)?;
    writeln!(out, "- **Trials per run**: {}\n", plan.simulation.trials)?;

    writeln!(out, "## Runs\n")?;
    writeln!(
        out,
        "| Strategy | Seed | Wins | Trials | Win rate | Expected |"
    )?;
    writeln!(out, "|---|---|---|---|---|---|")?;
    for record in records {
        writeln!(
            out,
            "| {} | {} | {} | {} | {:.4} | {} |",
            record.strategy.label(),
            record.seed.label(),
            record.report.wins,
            record.report.trials,
            record.report.win_rate,
            fmt_expected(record.expected)
        )?;
    }

    if !aggregates.is_empty() {
        writeln!(out, "\n## Strategies\n")?;
        for aggregate in aggregates {
            writeln!(
                out,
                "- **{}**: pooled {:.4}, mean {:.4} ± {:.4}, expected {}",
                aggregate.strategy.label(),
                aggregate.pooled_win_rate,
                aggregate.mean_win_rate,
                aggregate.std_win_rate,
                fmt_expected(aggregate.expected)
            )?;
        }
    }
    Ok(())
}

pub fn generate_csv_report(out: &mut dyn Write, records: &[RunRecord]) -> Result<()> {
    writeln!(
        out,
        "strategy,doors,reveal,seed,workers,trials,wins,win_rate,standard_error,expected,deviation,elapsed_ms"
    )?;
    for record in records {
        let report = &record.report;
        writeln!(
            out,
            "{},{},{},{},{},{},{},{:.6},{:.6},{},{},{}",
            record.strategy.key(),
            report.door_count,
            report.reveal,
            report.seed,
            report.workers,
            report.trials,
            report.wins,
            report.win_rate,
            report.standard_error,
            record
                .expected
                .map_or_else(String::new, |value| format!("{value:.6}")),
            record
                .deviation()
                .map_or_else(String::new, |value| format!("{value:.6}")),
            report.elapsed.as_millis()
        )?;
    }
    Ok(())
}
