//! Poisson arrival-time generation
//!
//! Inter-arrival gaps are drawn with the inverse-CDF transform of the
//! exponential distribution, `gap = -ln(1 - u) / rate` with `u ~ Uniform[0, 1)`,
//! and cumulatively summed into arrival timestamps.

use crate::core::errors::{ensure_rate, SimError};
use log::debug;
use rand::Rng;
use serde::Serialize;

/// How far a generator keeps drawing arrivals
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum ArrivalBound {
    /// Exactly this many arrivals
    Count(usize),
    /// Every arrival with a timestamp not beyond this time
    Horizon(f64),
}

/// An ordered, immutable sequence of arrival timestamps
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArrivalSequence {
    times: Vec<f64>,
}

impl ArrivalSequence {
    pub(crate) fn from_sorted(times: Vec<f64>) -> Self {
        Self { times }
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Timestamp of the final arrival, if any
    pub fn last(&self) -> Option<f64> {
        self.times.last().copied()
    }

    /// Prefix of the sequence with timestamps `<= horizon`
    pub fn up_to(&self, horizon: f64) -> &[f64] {
        let end = self.times.partition_point(|&t| t <= horizon);
        &self.times[..end]
    }
}

/// Generator for a single Poisson arrival stream
#[derive(Debug, Clone)]
pub struct ArrivalGenerator {
    rate: f64,
    bound: ArrivalBound,
    gaps: Option<Vec<f64>>,
    arrivals: Option<ArrivalSequence>,
}

impl ArrivalGenerator {
    /// Generator producing exactly `count` arrivals at `rate`
    pub fn new(rate: f64, count: usize) -> Result<Self, SimError> {
        ensure_rate("arrival rate", rate)?;
        Ok(Self {
            rate,
            bound: ArrivalBound::Count(count),
            gaps: None,
            arrivals: None,
        })
    }

    /// Generator producing every arrival up to `horizon`
    pub fn until(rate: f64, horizon: f64) -> Result<Self, SimError> {
        ensure_rate("arrival rate", rate)?;
        if !(horizon.is_finite() && horizon > 0.0) {
            return Err(SimError::invalid(format!(
                "arrival horizon must be a positive finite time, got {}",
                horizon
            )));
        }
        Ok(Self {
            rate,
            bound: ArrivalBound::Horizon(horizon),
            gaps: None,
            arrivals: None,
        })
    }

    /// Draw the stream from `rng`, replacing any previous output
    pub fn generate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let (gaps, times) = match self.bound {
            ArrivalBound::Count(count) => {
                let gaps: Vec<f64> = (0..count).map(|_| self.draw_gap(rng)).collect();
                let mut clock = 0.0;
                let times = gaps
                    .iter()
                    .map(|gap| {
                        clock += gap;
                        clock
                    })
                    .collect();
                (gaps, times)
            }
            ArrivalBound::Horizon(horizon) => {
                let mut gaps = Vec::new();
                let mut times = Vec::new();
                let mut clock = 0.0;
                loop {
                    let gap = self.draw_gap(rng);
                    if clock + gap > horizon {
                        break;
                    }
                    clock += gap;
                    gaps.push(gap);
                    times.push(clock);
                }
                (gaps, times)
            }
        };

        debug!(
            "Generated {} arrivals at rate {} (bound {:?})",
            times.len(),
            self.rate,
            self.bound
        );
        self.gaps = Some(gaps);
        self.arrivals = Some(ArrivalSequence::from_sorted(times));
    }

    fn draw_gap<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let u: f64 = rng.gen();
        -(1.0 - u).ln() / self.rate
    }

    /// Inter-arrival gaps of the last generated stream
    pub fn inter_arrivals(&self) -> Result<&[f64], SimError> {
        self.gaps
            .as_deref()
            .ok_or(SimError::PrematureAccess("inter-arrival gaps read before generate()"))
    }

    /// Cumulative arrival timestamps of the last generated stream
    pub fn arrival_times(&self) -> Result<&[f64], SimError> {
        self.arrivals
            .as_ref()
            .map(ArrivalSequence::times)
            .ok_or(SimError::PrematureAccess("arrival times read before generate()"))
    }

    /// Hand over the generated sequence
    pub fn into_sequence(self) -> Result<ArrivalSequence, SimError> {
        self.arrivals
            .ok_or(SimError::PrematureAccess("arrival sequence taken before generate()"))
    }
}
