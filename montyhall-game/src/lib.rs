//! Monty Hall Simulation Engine
//!
//! Platform-agnostic core for simulating the Monty Hall puzzle and its
//! variants: any number of doors, non-uniform prize probabilities, and a
//! host who opens either one door or keeps opening doors until two remain.
//! The crate provides the door model, contestant strategies, the single
//! trial procedure and batch runners without any I/O.
//!
//! ```
//! use montyhall_game::{CLASSICAL_MONTY_HALL, StrategyId};
//!
//! let rate = CLASSICAL_MONTY_HALL
//!     .run_simulations(&StrategyId::AlwaysSwap, 1_000)
//!     .unwrap();
//! assert!((0.0..=1.0).contains(&rate));
//! ```

pub mod analysis;
pub mod constants;
pub mod door;
pub mod error;
pub mod experiment;
pub mod numbers;
pub mod rng;
pub mod simulation;
pub mod strategy;
pub mod trial;

// Re-export commonly used types
pub use analysis::{expected_win_probability, standard_error, within_tolerance};
pub use constants::{DEFAULT_SEED, DEFAULT_TRIALS, MIN_DOORS, PROBABILITY_SUM_TOLERANCE};
pub use door::Door;
pub use error::{ArgumentError, ConfigurationError, MontyHallError};
pub use experiment::{CLASSICAL_MONTY_HALL, MontyHallExperiment};
pub use simulation::{SimulationConfig, SimulationReport};
pub use strategy::{
    ParseStrategyError, RevealedRound, Strategy, StrategyFn, StrategyId, always_swap, never_swap,
};
pub use trial::{ParseRevealRuleError, RevealRule, TrialRecord};
