use super::errors::SimError;
use super::metrics::QueueMetrics;
use super::theory::{CountDistribution, Mm1Theory};
use super::types::{PoissonTask, QueueTask};
use serde::Serialize;

/// Outcome of one Poisson-mode grid point (or one superposition)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoissonResult {
    /// Rate of the process (sum of rates when superimposed)
    pub rate: f64,
    /// Events requested per stream
    pub requested_events: usize,
    /// Events binned; below `requested_events` when streams were truncated
    pub num_events: usize,
    /// Time horizon the histogram covers
    pub horizon: f64,
    /// Seed of the random stream, or of the first stream when superimposed
    pub seed: u64,
    pub counts: Vec<u64>,
    pub edges: Vec<f64>,
}

impl PoissonResult {
    /// Key of the grid point this result belongs to
    pub fn task(&self) -> PoissonTask {
        PoissonTask::new(self.rate, self.requested_events)
    }

    /// Events-per-interval distribution against the Poisson law, for bins of width `delta`
    pub fn count_distribution(&self, delta: f64) -> Result<CountDistribution, SimError> {
        CountDistribution::compare(&self.counts, self.rate, delta)
    }
}

/// Outcome of one queue-mode grid point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueResult {
    pub lambda: f64,
    pub mu: f64,
    pub seed: u64,
    pub empirical: QueueMetrics,
    pub theory: Option<Mm1Theory>,
}

impl QueueResult {
    pub fn task(&self) -> QueueTask {
        QueueTask::new(self.lambda, self.mu)
    }
}
