mod logic;
mod util;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use montyhall_game::{RevealRule, StrategyId};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use logic::{
    AcceptanceOutcome, LogicTester, PlanOverrides, RunPlan, RunRecord, StrategyAggregate,
    TesterConfig, aggregate_runs, evaluate_acceptance, validate_acceptance,
};
use util::split_csv;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RevealMode {
    /// Host opens a single door, then the contestant decides once
    Single,
    /// Host keeps opening doors until two remain, asking after each reveal
    Progressive,
}

impl From<RevealMode> for RevealRule {
    fn from(mode: RevealMode) -> Self {
        match mode {
            RevealMode::Single => Self::Single,
            RevealMode::Progressive => Self::Progressive,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "montyhall-tester", version)]
#[command(about = "Monte Carlo runs of the Monty Hall game with convergence checks")]
struct Args {
    /// Number of equally likely doors
    #[arg(long, conflicts_with = "probabilities")]
    doors: Option<usize>,

    /// Prize probability per door (comma-separated, must sum to 1)
    #[arg(long)]
    probabilities: Option<String>,

    /// Strategies to run (always-swap,never-swap or all)
    #[arg(long, default_value = "all")]
    strategies: String,

    /// Trials per strategy and seed
    #[arg(long)]
    trials: Option<usize>,

    /// Seeds to run (comma-separated, decimal or 0x hex)
    #[arg(long)]
    seeds: Option<String>,

    /// Worker threads per batch
    #[arg(long)]
    workers: Option<usize>,

    /// How the host opens doors
    #[arg(long, value_enum)]
    reveal: Option<RevealMode>,

    /// JSON file with default settings; flags override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console", "csv"])]
    report: String,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Run acceptance sweeps (forces ≥100000 trials and checks expected win rates)
    #[arg(long)]
    acceptance: bool,

    /// Allowed absolute deviation from the expected win rate
    #[arg(long)]
    tolerance: Option<f64>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    announce_banner();

    let start_time = Instant::now();
    let file_config = match &args.config {
        Some(path) => TesterConfig::load(path)?,
        None => TesterConfig::default(),
    };
    let overrides = build_overrides(&args)?;
    let plan = RunPlan::resolve(file_config, overrides)?;

    if plan.acceptance {
        eprintln!(
            "🔁 Acceptance mode enabled: using {} trials per run",
            plan.simulation.trials
        );
    }

    let records = LogicTester::new(args.verbose).run_plan(&plan)?;
    let aggregates = aggregate_runs(&records);
    let acceptance = plan
        .acceptance
        .then(|| evaluate_acceptance(&records, plan.tolerance));

    write_reports(
        &args,
        &plan,
        &records,
        &aggregates,
        acceptance.as_ref(),
        start_time,
    )?;

    if let Some(outcome) = acceptance.as_ref() {
        validate_acceptance(outcome)?;
    }

    Ok(())
}

fn announce_banner() {
    eprintln!("{}", "🎲 Monty Hall Tester".bright_cyan().bold());
    eprintln!("{}", "====================".cyan());
}

/// Parse `--strategies`; `None` means "all", which is also the flag's
/// default, so the selection falls through to the config file.
fn parse_strategies(arg: &str) -> Result<Option<Vec<StrategyId>>> {
    let tokens = split_csv(arg);
    if tokens.is_empty() || tokens.iter().any(|t| t.eq_ignore_ascii_case("all")) {
        return Ok(None);
    }
    let mut strategies = Vec::with_capacity(tokens.len());
    for token in &tokens {
        let id: StrategyId = token.parse()?;
        if !strategies.contains(&id) {
            strategies.push(id);
        }
    }
    Ok(Some(strategies))
}

fn parse_probabilities(arg: &str) -> Result<Vec<f64>> {
    let tokens = split_csv(arg);
    if tokens.is_empty() {
        bail!("--probabilities needs at least one value");
    }
    tokens
        .iter()
        .map(|token| {
            token
                .parse::<f64>()
                .with_context(|| format!("invalid probability '{token}'"))
        })
        .collect()
}

fn build_overrides(args: &Args) -> Result<PlanOverrides> {
    let probabilities = args
        .probabilities
        .as_deref()
        .map(parse_probabilities)
        .transpose()?;
    let strategies = parse_strategies(&args.strategies)?;

    Ok(PlanOverrides {
        doors: args.doors,
        probabilities,
        strategies,
        seeds: args.seeds.as_deref().map(split_csv),
        trials: args.trials,
        workers: args.workers,
        reveal: args.reveal.map(RevealRule::from),
        tolerance: args.tolerance,
        acceptance: args.acceptance,
    })
}

fn write_reports(
    args: &Args,
    plan: &RunPlan,
    records: &[RunRecord],
    aggregates: &[StrategyAggregate],
    acceptance: Option<&AcceptanceOutcome>,
    start_time: Instant,
) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => {
            logic::reports::generate_json_report(
                &mut output_target,
                plan,
                records,
                aggregates,
                acceptance,
            )?;
        }
        "markdown" => {
            logic::reports::generate_markdown_report(
                &mut output_target,
                plan,
                records,
                aggregates,
            )?;
        }
        "csv" => {
            logic::reports::generate_csv_report(&mut output_target, records)?;
        }
        _ => {
            logic::reports::generate_console_report(
                &mut output_target,
                plan,
                records,
                aggregates,
                acceptance,
                start_time.elapsed(),
            )?;
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
