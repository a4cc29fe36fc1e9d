//! Merging of independent arrival streams into one combined process

use super::arrivals::ArrivalSequence;

/// Union of several streams, cut at the horizon every stream still covers
#[derive(Debug, Clone, PartialEq)]
pub struct Superposition {
    /// `min(last arrival of each non-empty stream, tmax)`, or 0 with no arrivals
    pub horizon: f64,
    /// Sorted union of all timestamps `<= horizon`
    pub times: Vec<f64>,
}

impl Superposition {
    /// Merge `streams`, never extending beyond the shortest stream's coverage
    pub fn merge(streams: &[ArrivalSequence], tmax: Option<f64>) -> Self {
        let coverage = streams
            .iter()
            .filter_map(ArrivalSequence::last)
            .reduce(f64::min)
            .unwrap_or(0.0);
        let horizon = match tmax {
            Some(limit) => coverage.min(limit),
            None => coverage,
        };

        let mut times: Vec<f64> = streams
            .iter()
            .flat_map(|stream| stream.up_to(horizon).iter().copied())
            .collect();
        times.sort_by(f64::total_cmp);

        Self { horizon, times }
    }

    /// Histogram edges `0, delta, 2*delta, ...` closed by the horizon itself
    pub fn edges(&self, delta: f64) -> Vec<f64> {
        if self.horizon <= 0.0 {
            return vec![0.0];
        }
        let full_bins = (self.horizon / delta).floor() as usize;
        let mut edges: Vec<f64> = (0..=full_bins).map(|i| i as f64 * delta).collect();
        if edges.last().map_or(true, |&last| last < self.horizon) {
            edges.push(self.horizon);
        }
        edges
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}
