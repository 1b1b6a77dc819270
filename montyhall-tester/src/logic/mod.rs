pub mod acceptance;
pub mod plan;
pub mod reports;
pub mod seeds;
pub mod tester;

pub use acceptance::{AcceptanceOutcome, evaluate_acceptance, validate_acceptance};
pub use plan::{PlanOverrides, RunPlan, TesterConfig};
pub use tester::{LogicTester, RunRecord, StrategyAggregate, aggregate_runs};
