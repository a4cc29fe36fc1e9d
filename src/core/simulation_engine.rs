//! Discrete-event simulation of an M/M/1 queue
//!
//! One event loop drives both termination policies. Events are popped from a
//! min-heap in non-decreasing time order; before each event the area under
//! the occupancy curve is extended up to the event time.

use super::errors::{ensure_rate, SimError};
use super::event::QueueEvent;
use super::event_scheduler::EventScheduler;
use super::metrics::{MetricsAccumulator, QueueMetrics};
use super::state::QueueState;
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Exp};
use serde::{Deserialize, Serialize};

/// When a simulation run stops
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Stop right after this many departures
    MaxEvents(u64),
    /// Stop once the clock would pass this time
    #[serde(rename = "sim_time")]
    Horizon(f64),
}

impl Termination {
    pub fn validate(&self) -> Result<(), SimError> {
        match *self {
            Termination::MaxEvents(0) => {
                Err(SimError::invalid("max_events must be at least 1"))
            }
            Termination::MaxEvents(_) => Ok(()),
            Termination::Horizon(t) if t.is_finite() && t > 0.0 => Ok(()),
            Termination::Horizon(t) => Err(SimError::invalid(format!(
                "sim_time must be a positive finite time, got {}",
                t
            ))),
        }
    }
}

/// Observer trait for simulation events
pub trait SimulationObserver: Send {
    /// Called after an event has been applied to the queue state
    fn on_event(&mut self, event: &QueueEvent, state: &QueueState);

    /// Called once when the run terminates
    fn on_finish(&mut self, _metrics: &QueueMetrics) {}
}

/// Single-server FIFO queue with exponential inter-arrival and service times
pub struct QueueSimulator<R: Rng> {
    lambda: f64,
    mu: f64,
    termination: Termination,
    rng: R,
    arrival_dist: Exp<f64>,
    service_dist: Exp<f64>,
    scheduler: EventScheduler,
    state: QueueState,
    accumulator: MetricsAccumulator,
    observers: Vec<Box<dyn SimulationObserver>>,
    metrics: Option<QueueMetrics>,
}

impl QueueSimulator<StdRng> {
    /// Simulator drawing from a `StdRng` seeded with `seed`
    pub fn seeded(
        lambda: f64,
        mu: f64,
        termination: Termination,
        seed: u64,
    ) -> Result<Self, SimError> {
        Self::new(lambda, mu, termination, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> QueueSimulator<R> {
    /// Create a simulator that owns `rng` as its only source of randomness
    pub fn new(lambda: f64, mu: f64, termination: Termination, rng: R) -> Result<Self, SimError> {
        ensure_rate("arrival rate (lambda)", lambda)?;
        ensure_rate("service rate (mu)", mu)?;
        termination.validate()?;

        let arrival_dist = Exp::new(lambda).map_err(|e| SimError::invalid(e.to_string()))?;
        let service_dist = Exp::new(mu).map_err(|e| SimError::invalid(e.to_string()))?;

        Ok(Self {
            lambda,
            mu,
            termination,
            rng,
            arrival_dist,
            service_dist,
            scheduler: EventScheduler::new(),
            state: QueueState::new(),
            accumulator: MetricsAccumulator::new(),
            observers: Vec::new(),
            metrics: None,
        })
    }

    /// Add an observer to the simulation
    pub fn add_observer(&mut self, observer: Box<dyn SimulationObserver>) {
        self.observers.push(observer);
    }

    pub fn lambda(&self) -> f64 {
        self.lambda
    }

    pub fn mu(&self) -> f64 {
        self.mu
    }

    pub fn termination(&self) -> Termination {
        self.termination
    }

    /// Metrics of the completed run
    pub fn metrics(&self) -> Result<&QueueMetrics, SimError> {
        self.metrics
            .as_ref()
            .ok_or(SimError::PrematureAccess("queue metrics read before run()"))
    }

    /// Run the simulation to termination. A second call returns the first run's metrics.
    pub fn run(&mut self) -> Result<QueueMetrics, SimError> {
        if let Some(metrics) = self.metrics {
            return Ok(metrics);
        }

        let first_arrival = self.arrival_dist.sample(&mut self.rng);
        self.scheduler.schedule(QueueEvent::Arrival(first_arrival));

        let elapsed = loop {
            // An arrival is always pending, so the heap never drains
            let Some(event) = self.scheduler.pop_next() else {
                break self.accumulator.last_event_time();
            };
            let now = event.time();

            if let Termination::Horizon(limit) = self.termination {
                if now > limit {
                    self.close_at(limit);
                    break limit;
                }
            }

            self.accumulator.advance_to(now, self.state.occupancy());
            match event {
                QueueEvent::Arrival(t) => self.handle_arrival(t),
                QueueEvent::Departure(t) => self.handle_departure(t),
            }

            trace!(
                "t={:.6} {:?} occupancy={}",
                now,
                event,
                self.state.occupancy()
            );
            for observer in &mut self.observers {
                observer.on_event(&event, &self.state);
            }

            if let Termination::MaxEvents(max) = self.termination {
                if self.accumulator.completed() >= max {
                    break now;
                }
            }
        };

        let metrics = self.accumulator.finish(elapsed);
        debug!(
            "M/M/1 lambda={} mu={} finished at t={:.3}: {} departures, utilization {:.4}",
            self.lambda, self.mu, elapsed, metrics.completed, metrics.utilization
        );
        for observer in &mut self.observers {
            observer.on_finish(&metrics);
        }

        self.metrics = Some(metrics);
        Ok(metrics)
    }

    fn handle_arrival(&mut self, now: f64) {
        self.accumulator.record_arrival();
        let gap = self.arrival_dist.sample(&mut self.rng);
        self.scheduler.schedule(QueueEvent::Arrival(now + gap));

        if self.state.server_busy() {
            self.state.enqueue(now);
        } else {
            self.begin_service(now, now);
        }
    }

    fn handle_departure(&mut self, now: f64) {
        if let Some(done) = self.state.finish_service() {
            self.accumulator
                .record_departure(now - done.arrival_time, now - done.service_start);
        }

        if let Some(arrival_time) = self.state.dequeue() {
            self.accumulator.record_wait(now - arrival_time);
            self.begin_service(arrival_time, now);
        }
    }

    fn begin_service(&mut self, arrival_time: f64, now: f64) {
        self.state.start_service(arrival_time, now);
        let duration = self.service_dist.sample(&mut self.rng);
        self.scheduler.schedule(QueueEvent::Departure(now + duration));
    }

    /// Close the accounting window at the horizon
    fn close_at(&mut self, limit: f64) {
        self.accumulator.advance_to(limit, self.state.occupancy());
        if let Some(current) = self.state.in_service() {
            self.accumulator
                .record_partial_service(limit - current.service_start);
        }
    }
}
