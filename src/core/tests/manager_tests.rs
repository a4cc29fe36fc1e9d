// Tests for SimulationManager sweeps
#[cfg(test)]
mod tests {
    use crate::core::{
        errors::SimError,
        execution::config::{ConcurrencyMode, ExecutionConfig, PoissonSweepConfig, QueueSweepConfig},
        execution::manager::SimulationManager,
        simulation_engine::Termination,
        types::{PoissonTask, QueueTask},
    };

    fn execution(mode: ConcurrencyMode, workers: usize) -> ExecutionConfig {
        ExecutionConfig::new()
            .with_concurrency(mode)
            .with_workers(workers)
            .with_seed(12345)
    }

    #[test]
    fn test_grid_produces_one_result_per_pair() {
        let config = PoissonSweepConfig::new(vec![0.5, 1.0, 2.0], vec![100, 400]);
        let manager = SimulationManager::new(&execution(ConcurrencyMode::Rayon, 6)).unwrap();
        let results = manager.run_poisson(&config).unwrap();

        assert_eq!(results.len(), 6);
        for &rate in &config.rates {
            for &n in &config.num_events {
                let result = &results[&PoissonTask::new(rate, n)];
                assert_eq!(result.rate, rate);
                assert_eq!(result.requested_events, n);
                assert_eq!(result.num_events, n);
                assert_eq!(result.counts.len() + 1, result.edges.len());
                // Dynamic horizon covers every event
                assert_eq!(result.counts.iter().sum::<u64>(), n as u64);
            }
        }
    }

    #[test]
    fn test_worker_count_does_not_change_results() {
        let config = PoissonSweepConfig::new(vec![0.5, 1.0, 2.0], vec![100, 400]).with_delta(0.5);

        let sequential = SimulationManager::new(&execution(ConcurrencyMode::Sequential, 1))
            .unwrap()
            .run_poisson(&config)
            .unwrap();
        let one_worker = SimulationManager::new(&execution(ConcurrencyMode::Rayon, 1))
            .unwrap()
            .run_poisson(&config)
            .unwrap();
        let six_workers = SimulationManager::new(&execution(ConcurrencyMode::Rayon, 6))
            .unwrap()
            .run_poisson(&config)
            .unwrap();

        assert_eq!(sequential, one_worker);
        assert_eq!(one_worker, six_workers);
    }

    #[test]
    fn test_fixed_tmax_sets_horizon() {
        let config = PoissonSweepConfig::new(vec![1.0], vec![1000]).with_tmax(25.0);
        let manager = SimulationManager::new(&execution(ConcurrencyMode::Sequential, 1)).unwrap();
        let results = manager.run_poisson(&config).unwrap();
        let result = &results[&PoissonTask::new(1.0, 1000)];

        assert_eq!(result.horizon, 25.0);
        assert_eq!(result.counts.len(), 25);
        assert_eq!(*result.edges.last().unwrap(), 25.0);
    }

    #[test]
    fn test_superposition_respects_shortest_stream() {
        let config = PoissonSweepConfig::new(vec![1.0, 1.5], vec![100]).with_superimpose(true);
        let manager = SimulationManager::new(&execution(ConcurrencyMode::Rayon, 2)).unwrap();
        let results = manager.run_poisson(&config).unwrap();

        assert_eq!(results.len(), 1);
        let result = results.values().next().unwrap();
        assert_eq!(result.requested_events, 100);
        assert_eq!(result.rate, 2.5);
        // One stream is exhausted at the horizon, the other is cut there
        assert!(result.num_events >= 100 && result.num_events < 200);
        assert_eq!(*result.edges.last().unwrap(), result.horizon);
        assert_eq!(result.counts.iter().sum::<u64>(), result.num_events as u64);
    }

    #[test]
    fn test_superposition_with_tmax() {
        let config = PoissonSweepConfig::new(vec![2.0, 3.0], vec![500, 1000])
            .with_tmax(10.0)
            .with_superimpose(true);
        let manager = SimulationManager::new(&execution(ConcurrencyMode::Rayon, 4)).unwrap();
        let results = manager.run_poisson(&config).unwrap();

        assert_eq!(results.len(), 2);
        for n in [500, 1000] {
            let result = &results[&PoissonTask::new(5.0, n)];
            assert_eq!(result.horizon, 10.0);
            assert_eq!(result.edges.len(), 11);
            // About 5 events per unit time over 10 units
            assert!(result.num_events > 25 && result.num_events < 80);
        }
    }

    #[test]
    fn test_queue_sweep() {
        let config = QueueSweepConfig::new(
            vec![0.5, 1.0, 5.0],
            vec![2.0, 4.0],
            Termination::MaxEvents(20_000),
        )
        .with_execution(execution(ConcurrencyMode::Rayon, 3));
        let manager = SimulationManager::new(&config.execution).unwrap();
        let results = manager.run_queue(&config).unwrap();

        assert_eq!(results.len(), 6);
        let stable = &results[&QueueTask::new(1.0, 2.0)];
        let theory = stable.theory.unwrap();
        assert!((stable.empirical.utilization - theory.utilization).abs() < 0.05);

        let unstable = &results[&QueueTask::new(5.0, 2.0)];
        let theory = unstable.theory.unwrap();
        assert!(theory.avg_in_system.is_infinite());
        assert!(theory.avg_system_time.is_infinite());
        assert!(theory.avg_wait_time.is_infinite());
        assert!(unstable.empirical.avg_in_system.is_finite());
    }

    #[test]
    fn test_queue_sweep_without_theory() {
        let config = QueueSweepConfig::new(vec![1.0], vec![2.0], Termination::Horizon(100.0))
            .with_compare_theory(false);
        let manager = SimulationManager::new(&execution(ConcurrencyMode::Sequential, 1)).unwrap();
        let results = manager.run_queue(&config).unwrap();
        let result = &results[&QueueTask::new(1.0, 2.0)];
        assert!(result.theory.is_none());
        assert_eq!(result.empirical.elapsed, 100.0);
        assert_eq!(result.seed, 12345);
    }

    #[test]
    fn test_invalid_config_stops_before_running() {
        let config = PoissonSweepConfig::new(vec![1.0, -1.0], vec![10]);
        let manager = SimulationManager::new(&ExecutionConfig::default()).unwrap();
        assert!(matches!(
            manager.run_poisson(&config),
            Err(SimError::InvalidParameter(_))
        ));
    }
}
