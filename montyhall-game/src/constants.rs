//! Centralized tuning constants for the Monty Hall engine.
//!
//! Validation tolerances and batch defaults live here so the simulation
//! can only be adjusted through reviewed code changes.

/// Smallest experiment that leaves the host a door to reveal.
pub const MIN_DOORS: usize = 3;

/// Allowed drift of the summed door probabilities away from 1.0.
pub const PROBABILITY_SUM_TOLERANCE: f64 = 1e-6;

/// Trial count used when the caller does not name one.
pub const DEFAULT_TRIALS: usize = 1000;

/// Seed used by configs that do not carry one.
pub const DEFAULT_SEED: u64 = 1337;

/// Worker count used by configs that do not carry one.
pub const DEFAULT_WORKERS: usize = 1;

// RNG stream domains --------------------------------------------------------
pub(crate) const STREAM_WORKER_PREFIX: &str = "worker-";
