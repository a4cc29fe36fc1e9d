//! Binning of continuous values into counts
//!
//! Boundary policy: bins are half-open `[e_i, e_{i+1})` except the last one,
//! which also includes the top edge. Values outside `[e_0, e_last]` (and NaN)
//! are dropped without error.

use crate::core::errors::SimError;
use log::debug;
use serde::{Deserialize, Serialize};

/// How the bins of a histogram are laid out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HistogramSpec {
    /// `count` equal-width bins over `range`, or over `[min, max]` of the data
    Bins {
        count: usize,
        range: Option<(f64, f64)>,
    },
    /// Explicit, strictly increasing bin edges
    Edges(Vec<f64>),
}

impl HistogramSpec {
    /// Equal-width bins over an explicit range
    pub fn bins(count: usize, low: f64, high: f64) -> Self {
        HistogramSpec::Bins {
            count,
            range: Some((low, high)),
        }
    }

    /// Equal-width bins over the range of the data
    pub fn auto_bins(count: usize) -> Self {
        HistogramSpec::Bins { count, range: None }
    }

    /// Explicit edges, validated
    pub fn edges(edges: Vec<f64>) -> Result<Self, SimError> {
        validate_edges(&edges)?;
        Ok(HistogramSpec::Edges(edges))
    }

    /// Edges `0, delta, 2*delta, ...` up to `bins * delta`
    pub fn uniform_from_zero(delta: f64, bins: usize) -> Self {
        HistogramSpec::Edges((0..=bins).map(|i| i as f64 * delta).collect())
    }
}

/// Counts per bin together with the edges they were binned against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramResult {
    pub counts: Vec<u64>,
    pub edges: Vec<f64>,
}

impl HistogramResult {
    /// A histogram with no bins anchored at `origin`
    pub fn empty(origin: f64) -> Self {
        Self {
            counts: Vec::new(),
            edges: vec![origin],
        }
    }

    pub fn num_bins(&self) -> usize {
        self.counts.len()
    }

    /// Number of values that landed in some bin
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

pub struct Histogram;

impl Histogram {
    /// Bin `data` according to `spec`
    pub fn compute(data: &[f64], spec: &HistogramSpec) -> Result<HistogramResult, SimError> {
        let edges = match spec {
            HistogramSpec::Bins { count, range } => equal_width_edges(data, *count, *range)?,
            HistogramSpec::Edges(edges) => {
                validate_edges(edges)?;
                edges.clone()
            }
        };

        let nbins = edges.len() - 1;
        let first = edges[0];
        let last = edges[nbins];
        let mut counts = vec![0u64; nbins];
        let mut dropped = 0usize;

        for &x in data {
            // NaN fails both comparisons, so test for membership positively
            if !(x >= first && x <= last) {
                dropped += 1;
                continue;
            }
            let idx = if x == last {
                nbins - 1
            } else {
                edges.partition_point(|&edge| edge <= x) - 1
            };
            counts[idx] += 1;
        }

        if dropped > 0 {
            debug!(
                "Histogram dropped {} of {} values outside [{}, {}]",
                dropped,
                data.len(),
                first,
                last
            );
        }

        Ok(HistogramResult { counts, edges })
    }
}

fn equal_width_edges(
    data: &[f64],
    count: usize,
    range: Option<(f64, f64)>,
) -> Result<Vec<f64>, SimError> {
    if count == 0 {
        return Err(SimError::invalid("histogram bin count must be positive"));
    }

    let (low, high) = match range {
        Some(range) => range,
        None => {
            if data.is_empty() {
                return Err(SimError::invalid(
                    "cannot derive a histogram range from empty data",
                ));
            }
            data.iter()
                .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &x| {
                    (lo.min(x), hi.max(x))
                })
        }
    };

    if !(low.is_finite() && high.is_finite()) || high < low {
        return Err(SimError::invalid(format!(
            "histogram range [{}, {}] is not a finite, ordered interval",
            low, high
        )));
    }

    let width = (high - low) / count as f64;
    let mut edges: Vec<f64> = (0..=count).map(|i| low + i as f64 * width).collect();
    edges[count] = high;
    Ok(edges)
}

fn validate_edges(edges: &[f64]) -> Result<(), SimError> {
    if edges.len() < 2 {
        return Err(SimError::invalid(format!(
            "histogram needs at least two edges, got {}",
            edges.len()
        )));
    }
    if edges.iter().any(|e| !e.is_finite()) {
        return Err(SimError::invalid("histogram edges must be finite"));
    }
    if !edges.windows(2).all(|w| w[0] < w[1]) {
        return Err(SimError::invalid("histogram edges must be strictly increasing"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges(values: &[f64]) -> HistogramSpec {
        HistogramSpec::edges(values.to_vec()).unwrap()
    }

    #[test]
    fn test_basic_binning() {
        let data = [0.1, 0.5, 1.2, 2.9, 2.0];
        let result = Histogram::compute(&data, &edges(&[0.0, 1.0, 2.0, 3.0])).unwrap();
        assert_eq!(result.counts, vec![2, 1, 2]);
        assert_eq!(result.edges, vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_last_edge_lands_in_last_bin() {
        let result = Histogram::compute(&[3.0], &edges(&[0.0, 1.0, 2.0, 3.0])).unwrap();
        assert_eq!(result.counts, vec![0, 0, 1]);
    }

    #[test]
    fn test_interior_edge_lands_right() {
        let result = Histogram::compute(&[1.0, 2.0], &edges(&[0.0, 1.0, 2.0, 3.0])).unwrap();
        assert_eq!(result.counts, vec![0, 1, 1]);
    }

    #[test]
    fn test_first_edge_is_inclusive() {
        let result = Histogram::compute(&[0.0], &edges(&[0.0, 1.0])).unwrap();
        assert_eq!(result.counts, vec![1]);
    }

    #[test]
    fn test_out_of_range_values_dropped() {
        let data = [-0.5, 0.5, 3.5, f64::NAN, 10.0];
        let result = Histogram::compute(&data, &edges(&[0.0, 1.0, 2.0, 3.0])).unwrap();
        assert_eq!(result.counts, vec![1, 0, 0]);
        assert_eq!(result.total(), 1);
    }

    #[test]
    fn test_total_matches_in_range_count() {
        let data: Vec<f64> = (0..500).map(|i| (i as f64 * 0.37) % 13.0 - 2.0).collect();
        let spec = edges(&[0.0, 0.5, 2.0, 4.5, 7.0, 10.0]);
        let result = Histogram::compute(&data, &spec).unwrap();
        let in_range = data.iter().filter(|&&x| (0.0..=10.0).contains(&x)).count() as u64;
        assert_eq!(result.total(), in_range);
        assert_eq!(result.counts.len(), result.edges.len() - 1);
    }

    #[test]
    fn test_bins_with_range() {
        let result = Histogram::compute(&[0.0, 2.5, 5.0, 9.9, 10.0], &HistogramSpec::bins(4, 0.0, 10.0))
            .unwrap();
        assert_eq!(result.edges, vec![0.0, 2.5, 5.0, 7.5, 10.0]);
        assert_eq!(result.counts, vec![1, 1, 1, 2]);
    }

    #[test]
    fn test_bins_derive_range_from_data() {
        let data = [1.0, 2.0, 3.0, 4.0, 5.0];
        let result = Histogram::compute(&data, &HistogramSpec::auto_bins(2)).unwrap();
        assert_eq!(result.edges, vec![1.0, 3.0, 5.0]);
        assert_eq!(result.counts, vec![2, 3]);
    }

    #[test]
    fn test_derived_range_keeps_maximum() {
        let data = [0.1, 0.2, 0.7];
        let result = Histogram::compute(&data, &HistogramSpec::auto_bins(3)).unwrap();
        assert_eq!(*result.edges.last().unwrap(), 0.7);
        assert_eq!(result.total(), 3);
    }

    #[test]
    fn test_constant_data_goes_to_last_bin() {
        let result = Histogram::compute(&[4.0, 4.0], &HistogramSpec::auto_bins(3)).unwrap();
        assert_eq!(result.counts, vec![0, 0, 2]);
    }

    #[test]
    fn test_empty_data_without_range_fails() {
        assert!(matches!(
            Histogram::compute(&[], &HistogramSpec::auto_bins(3)),
            Err(SimError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_empty_data_with_edges_is_all_zero() {
        let result = Histogram::compute(&[], &edges(&[0.0, 1.0, 2.0])).unwrap();
        assert_eq!(result.counts, vec![0, 0]);
    }

    #[test]
    fn test_invalid_specs_rejected() {
        assert!(HistogramSpec::edges(vec![1.0]).is_err());
        assert!(HistogramSpec::edges(vec![0.0, 1.0, 1.0]).is_err());
        assert!(HistogramSpec::edges(vec![0.0, 2.0, 1.0]).is_err());
        assert!(Histogram::compute(&[1.0], &HistogramSpec::bins(0, 0.0, 1.0)).is_err());
        assert!(Histogram::compute(&[1.0], &HistogramSpec::bins(2, 1.0, 0.0)).is_err());
        // Unvalidated edges are still checked at compute time
        assert!(Histogram::compute(&[1.0], &HistogramSpec::Edges(vec![2.0, 1.0])).is_err());
    }

    #[test]
    fn test_compute_is_idempotent() {
        let data: Vec<f64> = (0..100).map(|i| (i as f64).sqrt()).collect();
        let spec = HistogramSpec::uniform_from_zero(0.75, 14);
        let first = Histogram::compute(&data, &spec).unwrap();
        let second = Histogram::compute(&data, &spec).unwrap();
        assert_eq!(first, second);
        let first_bits: Vec<u64> = first.edges.iter().map(|e| e.to_bits()).collect();
        let second_bits: Vec<u64> = second.edges.iter().map(|e| e.to_bits()).collect();
        assert_eq!(first_bits, second_bits);
    }
}
