use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Identifies one Poisson-mode grid point: a rate and a number of events
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PoissonTask {
    pub rate: f64,
    pub num_events: usize,
}

impl PoissonTask {
    /// Create a new task key
    pub fn new(rate: f64, num_events: usize) -> Self {
        Self { rate, num_events }
    }
}

impl PartialEq for PoissonTask {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PoissonTask {}

impl PartialOrd for PoissonTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PoissonTask {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rate
            .total_cmp(&other.rate)
            .then_with(|| self.num_events.cmp(&other.num_events))
    }
}

impl std::fmt::Display for PoissonTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(rate={}, N={})", self.rate, self.num_events)
    }
}

/// Identifies one queue-mode grid point: arrival rate and service rate
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QueueTask {
    pub lambda: f64,
    pub mu: f64,
}

impl QueueTask {
    /// Create a new task key
    pub fn new(lambda: f64, mu: f64) -> Self {
        Self { lambda, mu }
    }
}

impl PartialEq for QueueTask {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueTask {}

impl PartialOrd for QueueTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueTask {
    fn cmp(&self, other: &Self) -> Ordering {
        self.lambda
            .total_cmp(&other.lambda)
            .then_with(|| self.mu.total_cmp(&other.mu))
    }
}

impl std::fmt::Display for QueueTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(lambda={}, mu={})", self.lambda, self.mu)
    }
}
