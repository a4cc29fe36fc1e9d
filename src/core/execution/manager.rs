//! Parameter-sweep orchestration
//!
//! The manager expands a configuration into its cartesian task grid, runs one
//! independent simulation per grid point and joins the outputs back to their
//! parameters in a `BTreeMap`.

use super::config::{ExecutionConfig, PoissonSweepConfig, QueueSweepConfig};
use super::executor::TaskExecutor;
use crate::core::arrivals::{ArrivalGenerator, ArrivalSequence};
use crate::core::errors::SimError;
use crate::core::histogram::{Histogram, HistogramResult, HistogramSpec};
use crate::core::result::{PoissonResult, QueueResult};
use crate::core::simulation_engine::{QueueSimulator, Termination};
use crate::core::superposition::Superposition;
use crate::core::theory::Mm1Theory;
use crate::core::types::{PoissonTask, QueueTask};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeMap;

/// Results of a sweep, keyed by the parameters that produced them
pub type SweepResults<K, V> = BTreeMap<K, V>;

pub struct SimulationManager {
    executor: TaskExecutor,
}

impl SimulationManager {
    pub fn new(config: &ExecutionConfig) -> Result<Self, SimError> {
        Ok(Self {
            executor: TaskExecutor::new(config)?,
        })
    }

    pub fn executor(&self) -> &TaskExecutor {
        &self.executor
    }

    /// Run every (rate, N) grid point, or one superposition per N when `superimpose` is set
    pub fn run_poisson(
        &self,
        config: &PoissonSweepConfig,
    ) -> Result<SweepResults<PoissonTask, PoissonResult>, SimError> {
        config.validate()?;
        if config.superimpose {
            return self.run_superposition(config);
        }

        let tasks = poisson_grid(&config.rates, &config.num_events);
        info!(
            "Running {} Poisson tasks on {} worker(s)",
            tasks.len(),
            self.executor.worker_count()
        );

        let results = self.executor.execute(&tasks, |_, seed, task| {
            run_poisson_task(*task, seed, config.tmax, config.delta)
        })?;

        info!("Completed {} Poisson tasks", results.len());
        Ok(tasks.into_iter().zip(results).collect())
    }

    /// Merge one stream per rate into a single process for every N
    pub fn run_superposition(
        &self,
        config: &PoissonSweepConfig,
    ) -> Result<SweepResults<PoissonTask, PoissonResult>, SimError> {
        config.validate()?;

        let tasks = poisson_grid(&config.rates, &config.num_events);
        info!(
            "Generating {} streams for {} superpositions on {} worker(s)",
            tasks.len(),
            config.num_events.len(),
            self.executor.worker_count()
        );

        let streams = self.executor.execute(&tasks, |_, seed, task| {
            let mut generator = ArrivalGenerator::new(task.rate, task.num_events)?;
            generator.generate(&mut StdRng::seed_from_u64(seed));
            generator.into_sequence()
        })?;

        // Streams are laid out rate-major: (rate i, N j) sits at i * |N| + j
        let width = config.num_events.len();
        let mut groups: Vec<Vec<ArrivalSequence>> =
            vec![Vec::with_capacity(config.rates.len()); width];
        for (index, stream) in streams.into_iter().enumerate() {
            groups[index % width].push(stream);
        }

        let total_rate: f64 = config.rates.iter().sum();
        let mut results = SweepResults::new();

        for (j, (&num_events, group)) in config.num_events.iter().zip(&groups).enumerate() {
            let merged = Superposition::merge(group, config.tmax);
            let edges = merged.edges(config.delta);
            let histogram = if edges.len() < 2 {
                HistogramResult::empty(0.0)
            } else {
                Histogram::compute(&merged.times, &HistogramSpec::Edges(edges))?
            };

            debug!(
                "Superposition N={} horizon={:.3} merged {} events",
                num_events,
                merged.horizon,
                merged.len()
            );

            let result = PoissonResult {
                rate: total_rate,
                requested_events: num_events,
                num_events: merged.len(),
                horizon: merged.horizon,
                seed: self.executor.seed_for(j),
                counts: histogram.counts,
                edges: histogram.edges,
            };
            results.insert(result.task(), result);
        }

        Ok(results)
    }

    /// Run one M/M/1 simulation for every (lambda, mu) grid point
    pub fn run_queue(
        &self,
        config: &QueueSweepConfig,
    ) -> Result<SweepResults<QueueTask, QueueResult>, SimError> {
        config.validate()?;

        let tasks: Vec<QueueTask> = config
            .lambda_values
            .iter()
            .flat_map(|&lambda| config.mu_values.iter().map(move |&mu| QueueTask::new(lambda, mu)))
            .collect();
        info!(
            "Running {} M/M/1 tasks ({:?}) on {} worker(s)",
            tasks.len(),
            config.termination,
            self.executor.worker_count()
        );

        let results = self.executor.execute(&tasks, |_, seed, task| {
            run_queue_task(*task, seed, config.termination, config.compare_theory)
        })?;

        info!("Completed {} M/M/1 tasks", results.len());
        Ok(tasks.into_iter().zip(results).collect())
    }
}

fn poisson_grid(rates: &[f64], num_events: &[usize]) -> Vec<PoissonTask> {
    rates
        .iter()
        .flat_map(|&rate| num_events.iter().map(move |&n| PoissonTask::new(rate, n)))
        .collect()
}

/// Horizon rounded up to a whole number of bins, and the bin count
fn binned_horizon(raw: f64, delta: f64) -> (f64, usize) {
    let mut bins = (raw / delta).ceil().max(0.0) as usize;
    // The quotient can round down by an ulp; the last edge must still cover `raw`
    while (bins as f64) * delta < raw {
        bins += 1;
    }
    (bins as f64 * delta, bins)
}

fn run_poisson_task(
    task: PoissonTask,
    seed: u64,
    tmax: Option<f64>,
    delta: f64,
) -> Result<PoissonResult, SimError> {
    let mut generator = ArrivalGenerator::new(task.rate, task.num_events)?;
    generator.generate(&mut StdRng::seed_from_u64(seed));
    let times = generator.arrival_times()?;

    let raw = tmax.or_else(|| times.last().copied()).unwrap_or(0.0);
    let (horizon, bins) = binned_horizon(raw, delta);
    let histogram = if bins == 0 {
        HistogramResult::empty(0.0)
    } else {
        Histogram::compute(times, &HistogramSpec::uniform_from_zero(delta, bins))?
    };

    debug!(
        "Task {} seed={} horizon={} bins={}",
        task,
        seed,
        horizon,
        histogram.num_bins()
    );

    Ok(PoissonResult {
        rate: task.rate,
        requested_events: task.num_events,
        num_events: times.len(),
        horizon,
        seed,
        counts: histogram.counts,
        edges: histogram.edges,
    })
}

fn run_queue_task(
    task: QueueTask,
    seed: u64,
    termination: Termination,
    compare_theory: bool,
) -> Result<QueueResult, SimError> {
    let mut simulator = QueueSimulator::seeded(task.lambda, task.mu, termination, seed)?;
    let empirical = simulator.run()?;
    let theory = if compare_theory {
        Some(Mm1Theory::new(task.lambda, task.mu)?)
    } else {
        None
    };

    debug!("Task {} seed={} done", task, seed);

    Ok(QueueResult {
        lambda: task.lambda,
        mu: task.mu,
        seed,
        empirical,
        theory,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poisson_grid_is_cartesian() {
        let grid = poisson_grid(&[1.0, 2.0], &[10, 20, 30]);
        assert_eq!(grid.len(), 6);
        assert_eq!(grid[0], PoissonTask::new(1.0, 10));
        assert_eq!(grid[5], PoissonTask::new(2.0, 30));
    }

    #[test]
    fn test_binned_horizon_rounds_up() {
        assert_eq!(binned_horizon(4.2, 1.0), (5.0, 5));
        assert_eq!(binned_horizon(4.0, 1.0), (4.0, 4));
        assert_eq!(binned_horizon(0.0, 1.0), (0.0, 0));
        let (horizon, bins) = binned_horizon(1.1, 0.5);
        assert_eq!(bins, 3);
        assert!((horizon - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_binned_horizon_covers_value_just_above_edge() {
        let raw = 0.9000000000000001;
        let (horizon, bins) = binned_horizon(raw, 0.1);
        assert!(horizon >= raw, "horizon {} below {}", horizon, raw);
        assert_eq!(bins, 10);

        let times = [0.05, raw];
        let histogram =
            Histogram::compute(&times, &HistogramSpec::uniform_from_zero(0.1, bins)).unwrap();
        assert_eq!(histogram.total(), 2);
    }

    #[test]
    fn test_poisson_task_with_zero_events() {
        let result = run_poisson_task(PoissonTask::new(1.0, 0), 1, None, 1.0).unwrap();
        assert_eq!(result.num_events, 0);
        assert!(result.counts.is_empty());
        assert_eq!(result.edges, vec![0.0]);
    }

    #[test]
    fn test_poisson_task_with_fixed_tmax() {
        let result = run_poisson_task(PoissonTask::new(2.0, 1000), 5, Some(10.0), 0.5).unwrap();
        assert_eq!(result.horizon, 10.0);
        assert_eq!(result.counts.len(), 20);
        // Roughly rate * horizon events fall inside [0, 10]
        let total: u64 = result.counts.iter().sum();
        assert!(total > 10 && total < 40, "got {}", total);
    }

    #[test]
    fn test_poisson_task_dynamic_horizon_keeps_all_events() {
        let result = run_poisson_task(PoissonTask::new(3.0, 500), 9, None, 1.0).unwrap();
        assert_eq!(result.counts.iter().sum::<u64>(), 500);
        assert_eq!(result.edges.len(), result.counts.len() + 1);
    }
}
