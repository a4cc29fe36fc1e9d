//! Closed-form reference values for comparing against simulated results

use super::errors::{ensure_rate, SimError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Steady-state M/M/1 quantities.
///
/// For an unstable system (`lambda >= mu`) the queue grows without bound and
/// the number in system and both time quantities are `f64::INFINITY`, which
/// JSON output renders as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Mm1Theory {
    /// Offered load, `lambda / mu`
    pub rho: f64,
    /// Mean number in system, L
    pub avg_in_system: f64,
    /// Mean time in system, W
    pub avg_system_time: f64,
    /// Mean time in queue, Wq
    pub avg_wait_time: f64,
    /// Server utilization, equal to `rho`
    pub utilization: f64,
}

impl Mm1Theory {
    pub fn new(lambda: f64, mu: f64) -> Result<Self, SimError> {
        ensure_rate("arrival rate (lambda)", lambda)?;
        ensure_rate("service rate (mu)", mu)?;

        let rho = lambda / mu;
        let (avg_in_system, avg_system_time, avg_wait_time) = if lambda < mu {
            let w = 1.0 / (mu - lambda);
            (rho / (1.0 - rho), w, w - 1.0 / mu)
        } else {
            (f64::INFINITY, f64::INFINITY, f64::INFINITY)
        };

        Ok(Self {
            rho,
            avg_in_system,
            avg_system_time,
            avg_wait_time,
            utilization: rho,
        })
    }

    pub fn is_stable(&self) -> bool {
        self.rho < 1.0
    }
}

/// Poisson probability mass `P(K = k)` for mean `mean`, evaluated in log space
pub fn poisson_pmf(k: u64, mean: f64) -> f64 {
    if mean <= 0.0 {
        return if k == 0 { 1.0 } else { 0.0 };
    }
    let ln_factorial: f64 = (2..=k).map(|i| (i as f64).ln()).sum();
    (k as f64 * mean.ln() - mean - ln_factorial).exp()
}

/// One row of a count-distribution comparison
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CountFrequency {
    /// Events per interval
    pub k: u64,
    /// Intervals observed with exactly `k` events
    pub observed: u64,
    /// Intervals expected with exactly `k` events
    pub expected: f64,
}

/// Distribution of events-per-interval in a histogram against the Poisson law.
///
/// For a Poisson process of rate `lambda`, the count in an interval of width
/// `delta` is Poisson with mean `lambda * delta`, so over `n` intervals about
/// `n * pmf(k)` of them should hold exactly `k` events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountDistribution {
    pub mean_per_interval: f64,
    pub num_intervals: usize,
    pub rows: Vec<CountFrequency>,
}

impl CountDistribution {
    /// Compare per-bin `counts` with a Poisson process of `rate` binned at `delta`
    pub fn compare(counts: &[u64], rate: f64, delta: f64) -> Result<Self, SimError> {
        ensure_rate("rate", rate)?;
        if !(delta.is_finite() && delta > 0.0) {
            return Err(SimError::invalid(format!(
                "bin width must be positive, got {}",
                delta
            )));
        }

        let mut observed: BTreeMap<u64, u64> = BTreeMap::new();
        for &count in counts {
            *observed.entry(count).or_insert(0) += 1;
        }

        let mean = rate * delta;
        let num_intervals = counts.len();
        let rows = observed
            .into_iter()
            .map(|(k, seen)| CountFrequency {
                k,
                observed: seen,
                expected: num_intervals as f64 * poisson_pmf(k, mean),
            })
            .collect();

        Ok(Self {
            mean_per_interval: mean,
            num_intervals,
            rows,
        })
    }
}
