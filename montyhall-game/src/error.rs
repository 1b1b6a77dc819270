//! Error types raised by experiment construction and batch runs.

use thiserror::Error;

/// Top-level error for the Monty Hall engine.
#[derive(Debug, Error, PartialEq)]
pub enum MontyHallError {
    #[error("door probability must lie within [0, 1] (got {probability})")]
    InvalidProbability { probability: f64 },
    #[error("invalid experiment configuration: {0}")]
    InvalidConfiguration(#[from] ConfigurationError),
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] ArgumentError),
    #[error("simulation worker {worker} could not be started: {reason}")]
    WorkerSpawn { worker: usize, reason: String },
    #[error("simulation worker {worker} panicked")]
    WorkerPanicked { worker: usize },
}

/// Reasons an experiment cannot be built from the supplied doors.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("at least {min} doors are required (got {count})")]
    TooFewDoors { count: usize, min: usize },
    #[error("door probabilities must sum to 1 (got {sum:.6})")]
    ProbabilitySum { sum: f64 },
    #[error("prize sampler rejected the door weights: {0}")]
    Sampler(String),
}

/// Reasons a batch request is rejected before any trial runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("number of trials must be positive")]
    ZeroTrials,
    #[error("number of workers must be positive")]
    ZeroWorkers,
}

pub type Result<T, E = MontyHallError> = std::result::Result<T, E>;
