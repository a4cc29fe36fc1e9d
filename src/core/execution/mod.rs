pub mod config;
pub mod executor;
pub mod manager;

// Re-export commonly used types
pub use config::{ConcurrencyMode, ExecutionConfig, PoissonSweepConfig, QueueSweepConfig};
pub use executor::TaskExecutor;
pub use manager::{SimulationManager, SweepResults};
