//! Configuration for parameter sweeps
//!
//! This module provides the sweep configurations for Poisson and queue mode,
//! plus the execution settings (concurrency, pool size, seeding) they share.

use crate::core::errors::{ensure_rate, SimError};
use crate::core::simulation_engine::Termination;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Enumeration of supported concurrency modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrencyMode {
    /// Sequential execution mode - tasks run one after another on the calling thread
    Sequential,
    /// Parallel execution mode using Rayon - tasks run on a bounded worker pool
    Rayon,
}

impl Default for ConcurrencyMode {
    fn default() -> Self {
        ConcurrencyMode::Rayon
    }
}

/// Configuration for task execution
///
/// Controls how sweep tasks are dispatched and how their random streams are seeded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// The concurrency mode to use for execution
    pub concurrency_mode: ConcurrencyMode,
    /// The size of the worker pool; `None` uses all available parallelism.
    /// Only relevant when concurrency_mode is Rayon
    pub workers: Option<usize>,
    /// Base seed; each task derives its own stream from it
    pub seed: Option<u64>,
}

impl ExecutionConfig {
    /// Create a new execution configuration with default values
    pub fn new() -> Self {
        Self {
            concurrency_mode: ConcurrencyMode::default(),
            workers: None,
            seed: None,
        }
    }

    /// Set the concurrency mode
    pub fn with_concurrency(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency_mode = mode;
        self
    }

    /// Set the worker pool size for parallel execution
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Set the base seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if self.workers == Some(0) {
            return Err(SimError::invalid("workers must be at least 1"));
        }
        Ok(())
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Sweep over Poisson arrival streams, histogrammed into fixed-width bins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoissonSweepConfig {
    /// Arrival rates (lambda) to simulate
    pub rates: Vec<f64>,
    /// Event counts N to simulate per rate
    pub num_events: Vec<usize>,
    /// Fixed time horizon; derived from the data when absent
    pub tmax: Option<f64>,
    /// Histogram bin width
    pub delta: f64,
    /// Merge one stream per rate into a single process per N
    pub superimpose: bool,
    /// Read from the top level: `concurrency_mode`, `workers`, `seed`
    #[serde(flatten)]
    pub execution: ExecutionConfig,
}

impl PoissonSweepConfig {
    pub fn new(rates: Vec<f64>, num_events: Vec<usize>) -> Self {
        Self {
            rates,
            num_events,
            ..Self::default()
        }
    }

    pub fn with_tmax(mut self, tmax: f64) -> Self {
        self.tmax = Some(tmax);
        self
    }

    pub fn with_delta(mut self, delta: f64) -> Self {
        self.delta = delta;
        self
    }

    pub fn with_superimpose(mut self, superimpose: bool) -> Self {
        self.superimpose = superimpose;
        self
    }

    pub fn with_execution(mut self, execution: ExecutionConfig) -> Self {
        self.execution = execution;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        parse_validated(json, Self::validate)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        ensure_axis("rates", &self.rates)?;
        for &rate in &self.rates {
            ensure_rate("rate", rate)?;
        }
        if self.num_events.is_empty() {
            return Err(SimError::invalid("num_events must not be empty"));
        }
        let mut sorted = self.num_events.clone();
        sorted.sort_unstable();
        if sorted.windows(2).any(|w| w[0] == w[1]) {
            return Err(SimError::invalid("num_events contains duplicate values"));
        }
        if !(self.delta.is_finite() && self.delta > 0.0) {
            return Err(SimError::invalid(format!(
                "delta must be a positive bin width, got {}",
                self.delta
            )));
        }
        if let Some(tmax) = self.tmax {
            if !(tmax.is_finite() && tmax > 0.0) {
                return Err(SimError::invalid(format!(
                    "tmax must be a positive finite time, got {}",
                    tmax
                )));
            }
        }
        self.execution.validate()
    }
}

impl Default for PoissonSweepConfig {
    fn default() -> Self {
        Self {
            rates: Vec::new(),
            num_events: Vec::new(),
            tmax: None,
            delta: 1.0,
            superimpose: false,
            execution: ExecutionConfig::default(),
        }
    }
}

/// Sweep over M/M/1 queues for every (lambda, mu) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueSweepConfig {
    pub lambda_values: Vec<f64>,
    pub mu_values: Vec<f64>,
    pub termination: Termination,
    /// Attach closed-form M/M/1 values to each result
    pub compare_theory: bool,
    #[serde(flatten)]
    pub execution: ExecutionConfig,
}

impl QueueSweepConfig {
    pub fn new(lambda_values: Vec<f64>, mu_values: Vec<f64>, termination: Termination) -> Self {
        Self {
            lambda_values,
            mu_values,
            termination,
            ..Self::default()
        }
    }

    pub fn with_compare_theory(mut self, compare_theory: bool) -> Self {
        self.compare_theory = compare_theory;
        self
    }

    pub fn with_execution(mut self, execution: ExecutionConfig) -> Self {
        self.execution = execution;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        parse_validated(json, Self::validate)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    pub fn validate(&self) -> Result<(), SimError> {
        ensure_axis("lambda_values", &self.lambda_values)?;
        ensure_axis("mu_values", &self.mu_values)?;
        for &lambda in &self.lambda_values {
            ensure_rate("lambda", lambda)?;
        }
        for &mu in &self.mu_values {
            ensure_rate("mu", mu)?;
        }
        self.termination.validate()?;
        self.execution.validate()
    }
}

impl Default for QueueSweepConfig {
    fn default() -> Self {
        Self {
            lambda_values: Vec::new(),
            mu_values: Vec::new(),
            termination: Termination::MaxEvents(10_000),
            compare_theory: true,
            execution: ExecutionConfig::default(),
        }
    }
}

fn parse_validated<T: DeserializeOwned>(
    json: &str,
    validate: impl Fn(&T) -> Result<(), SimError>,
) -> Result<T, SimError> {
    let config: T = serde_json::from_str(json)?;
    validate(&config)?;
    Ok(config)
}

/// Axes must be non-empty and free of duplicates so results key unambiguously
fn ensure_axis(name: &str, values: &[f64]) -> Result<(), SimError> {
    if values.is_empty() {
        return Err(SimError::invalid(format!("{} must not be empty", name)));
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    if sorted.windows(2).any(|w| w[0] == w[1]) {
        return Err(SimError::invalid(format!("{} contains duplicate values", name)));
    }
    Ok(())
}
