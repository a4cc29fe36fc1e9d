pub mod arrivals;
pub mod errors;
pub mod event;
pub mod event_scheduler;
pub mod execution;
pub mod histogram;
pub mod metrics;
pub mod result;
pub mod simulation_engine;
pub mod state;
pub mod superposition;
pub mod theory;
pub mod types;

#[cfg(test)]
mod tests;
