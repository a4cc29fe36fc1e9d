//! Error types for simulation, binning and sweep orchestration

use thiserror::Error;

/// Top-level error type for every fallible operation in the crate
#[derive(Debug, Error)]
pub enum SimError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Output requested before it was produced: {0}")]
    PrematureAccess(&'static str),

    #[error("Task {task} failed: {source}")]
    TaskFailed {
        task: String,
        #[source]
        source: Box<SimError>,
    },

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Invalid configuration file: {0}")]
    Config(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SimError::InvalidParameter(msg.into())
    }
}

/// Check that a rate parameter is usable as an exponential rate
pub(crate) fn ensure_rate(name: &str, value: f64) -> Result<(), SimError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::invalid(format!(
            "{} must be a positive finite number, got {}",
            name, value
        )))
    }
}
