use serde::{Deserialize, Serialize};

/// Summary metrics of one queue simulation run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueueMetrics {
    /// Time-averaged number of customers in the system
    pub avg_in_system: f64,
    /// Mean time from arrival to departure per completed customer
    pub avg_system_time: f64,
    /// Mean time spent waiting in the queue per completed customer
    pub avg_wait_time: f64,
    /// Fraction of elapsed time the server was busy
    pub utilization: f64,
    /// Customers that departed
    pub completed: u64,
    /// Customers that arrived
    pub arrivals: u64,
    /// Simulated time covered by the averages
    pub elapsed: f64,
}

/// Running totals updated by the event loop
#[derive(Debug, Clone, Default)]
pub struct MetricsAccumulator {
    /// Integral of occupancy over time
    area_in_system: f64,
    total_system_time: f64,
    total_wait_time: f64,
    busy_time: f64,
    completed: u64,
    arrivals: u64,
    /// Time of the last occupancy change
    last_event_time: f64,
}

impl MetricsAccumulator {
    /// Create a new empty accumulator starting at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Close the occupancy interval ending at `now`
    pub fn advance_to(&mut self, now: f64, occupancy: usize) {
        self.area_in_system += occupancy as f64 * (now - self.last_event_time);
        self.last_event_time = now;
    }

    pub fn record_arrival(&mut self) {
        self.arrivals += 1;
    }

    /// Record a departure with its sojourn time and service duration
    pub fn record_departure(&mut self, system_time: f64, service_time: f64) {
        self.completed += 1;
        self.total_system_time += system_time;
        self.busy_time += service_time;
    }

    /// Queueing delay of a customer taken from the waiting line into service
    pub fn record_wait(&mut self, wait_time: f64) {
        self.total_wait_time += wait_time;
    }

    /// Busy time of a service still running when the run is cut off
    pub fn record_partial_service(&mut self, elapsed: f64) {
        self.busy_time += elapsed;
    }

    pub fn completed(&self) -> u64 {
        self.completed
    }

    pub fn last_event_time(&self) -> f64 {
        self.last_event_time
    }

    /// Turn totals into averages over `elapsed` simulated time
    pub fn finish(&self, elapsed: f64) -> QueueMetrics {
        let per_customer = |total: f64| {
            if self.completed > 0 {
                total / self.completed as f64
            } else {
                0.0
            }
        };
        let per_time = |total: f64| if elapsed > 0.0 { total / elapsed } else { 0.0 };

        QueueMetrics {
            avg_in_system: per_time(self.area_in_system),
            avg_system_time: per_customer(self.total_system_time),
            avg_wait_time: per_customer(self.total_wait_time),
            utilization: per_time(self.busy_time),
            completed: self.completed,
            arrivals: self.arrivals,
            elapsed,
        }
    }
}
