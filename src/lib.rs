pub mod core;

// Re-export commonly used types
pub use crate::core::arrivals::{ArrivalGenerator, ArrivalSequence};
pub use crate::core::errors::SimError;
pub use crate::core::execution::{
    ConcurrencyMode, ExecutionConfig, PoissonSweepConfig, QueueSweepConfig, SimulationManager,
    SweepResults,
};
pub use crate::core::histogram::{Histogram, HistogramResult, HistogramSpec};
pub use crate::core::metrics::QueueMetrics;
pub use crate::core::result::{PoissonResult, QueueResult};
pub use crate::core::simulation_engine::{QueueSimulator, SimulationObserver, Termination};
pub use crate::core::superposition::Superposition;
pub use crate::core::theory::{CountDistribution, Mm1Theory};
pub use crate::core::types::{PoissonTask, QueueTask};
