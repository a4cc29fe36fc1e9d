use super::config::{ConcurrencyMode, ExecutionConfig};
use crate::core::errors::SimError;
use log::debug;
use rayon::prelude::*;
use std::fmt::Display;

/// Runs independent tasks either sequentially or on a bounded rayon pool.
///
/// Every task receives its grid index and a seed derived from the base seed
/// and that index, so results do not depend on how many workers run them.
#[derive(Debug, Clone)]
pub struct TaskExecutor {
    mode: ConcurrencyMode,
    workers: Option<usize>,
    base_seed: u64,
}

impl TaskExecutor {
    /// Create an executor; draws a base seed from OS entropy when none is configured
    pub fn new(config: &ExecutionConfig) -> Result<Self, SimError> {
        config.validate()?;
        let base_seed = match config.seed {
            Some(seed) => seed,
            None => {
                let seed = rand::random::<u64>();
                debug!("No seed configured, drew base seed {}", seed);
                seed
            }
        };
        Ok(Self {
            mode: config.concurrency_mode,
            workers: config.workers,
            base_seed,
        })
    }

    pub fn base_seed(&self) -> u64 {
        self.base_seed
    }

    /// Seed of the random stream for the task at `index`
    pub fn seed_for(&self, index: usize) -> u64 {
        self.base_seed.wrapping_add(index as u64)
    }

    /// Worker threads that will be used
    pub fn worker_count(&self) -> usize {
        match self.mode {
            ConcurrencyMode::Sequential => 1,
            ConcurrencyMode::Rayon => self
                .workers
                .unwrap_or_else(rayon::current_num_threads),
        }
    }

    /// Run `run(index, seed, task)` for every task and wait for all of them.
    ///
    /// Outputs come back in task order. If any task fails, the failure of the
    /// earliest task (in task order) is returned wrapped in
    /// [`SimError::TaskFailed`] and every other output is discarded.
    pub fn execute<T, R, F>(&self, tasks: &[T], run: F) -> Result<Vec<R>, SimError>
    where
        T: Sync + Display,
        R: Send,
        F: Fn(usize, u64, &T) -> Result<R, SimError> + Sync,
    {
        let outcomes: Vec<Result<R, SimError>> = match self.mode {
            ConcurrencyMode::Sequential => tasks
                .iter()
                .enumerate()
                .map(|(index, task)| run(index, self.seed_for(index), task))
                .collect(),
            ConcurrencyMode::Rayon => {
                let mut builder = rayon::ThreadPoolBuilder::new();
                if let Some(workers) = self.workers {
                    builder = builder.num_threads(workers);
                }
                let pool = builder.build()?;
                pool.install(|| {
                    tasks
                        .par_iter()
                        .enumerate()
                        .map(|(index, task)| run(index, self.seed_for(index), task))
                        .collect()
                })
            }
        };

        outcomes
            .into_iter()
            .zip(tasks)
            .map(|(outcome, task)| {
                outcome.map_err(|source| SimError::TaskFailed {
                    task: task.to_string(),
                    source: Box::new(source),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn executor(mode: ConcurrencyMode, workers: usize) -> TaskExecutor {
        let config = ExecutionConfig::new()
            .with_concurrency(mode)
            .with_workers(workers)
            .with_seed(100);
        TaskExecutor::new(&config).unwrap()
    }

    #[test]
    fn test_outputs_in_task_order() {
        let tasks: Vec<u32> = (0..20).collect();
        let out = executor(ConcurrencyMode::Rayon, 4)
            .execute(&tasks, |_, _, task| Ok(task * 2))
            .unwrap();
        assert_eq!(out, (0..20).map(|t| t * 2).collect::<Vec<_>>());
    }

    #[test]
    fn test_seeds_independent_of_mode() {
        let tasks: Vec<u32> = (0..8).collect();
        let sequential = executor(ConcurrencyMode::Sequential, 1)
            .execute(&tasks, |_, seed, _| Ok(seed))
            .unwrap();
        let parallel = executor(ConcurrencyMode::Rayon, 8)
            .execute(&tasks, |_, seed, _| Ok(seed))
            .unwrap();
        assert_eq!(sequential, parallel);
        assert_eq!(sequential[0], 100);
        assert_eq!(sequential[7], 107);
    }

    #[test]
    fn test_first_failure_in_task_order_reported() {
        let tasks: Vec<u32> = (0..10).collect();
        let result = executor(ConcurrencyMode::Rayon, 4).execute(&tasks, |_, _, &task| {
            if task == 3 || task == 7 {
                Err(SimError::invalid(format!("task {} broke", task)))
            } else {
                Ok(task)
            }
        });
        match result {
            Err(SimError::TaskFailed { task, source }) => {
                assert_eq!(task, "3");
                assert!(source.to_string().contains("task 3 broke"));
            }
            other => panic!("expected TaskFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_worker_count() {
        assert_eq!(executor(ConcurrencyMode::Sequential, 6).worker_count(), 1);
        assert_eq!(executor(ConcurrencyMode::Rayon, 6).worker_count(), 6);
    }
}
