use std::collections::VecDeque;

/// The customer currently occupying the server
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InService {
    pub arrival_time: f64,
    pub service_start: f64,
}

/// Mutable state of one single-server FIFO queue.
///
/// Owned by exactly one simulation run; the server is idle iff `in_service`
/// is `None`.
#[derive(Debug, Clone, Default)]
pub struct QueueState {
    waiting: VecDeque<f64>,
    in_service: Option<InService>,
}

impl QueueState {
    /// Create an empty, idle queue
    pub fn new() -> Self {
        Self {
            waiting: VecDeque::new(),
            in_service: None,
        }
    }

    pub fn server_busy(&self) -> bool {
        self.in_service.is_some()
    }

    pub fn in_service(&self) -> Option<&InService> {
        self.in_service.as_ref()
    }

    /// Customers waiting in the FIFO, excluding the one in service
    pub fn queue_len(&self) -> usize {
        self.waiting.len()
    }

    /// Customers in the system, including the one in service
    pub fn occupancy(&self) -> usize {
        self.waiting.len() + usize::from(self.server_busy())
    }

    /// Put a customer that arrived at `arrival_time` into service at `now`
    pub fn start_service(&mut self, arrival_time: f64, now: f64) {
        debug_assert!(self.in_service.is_none(), "server already busy");
        self.in_service = Some(InService {
            arrival_time,
            service_start: now,
        });
    }

    /// Append an arrival to the wait queue
    pub fn enqueue(&mut self, arrival_time: f64) {
        self.waiting.push_back(arrival_time);
    }

    /// Release the server, returning the customer that was in service
    pub fn finish_service(&mut self) -> Option<InService> {
        self.in_service.take()
    }

    /// Pop the earliest waiting arrival
    pub fn dequeue(&mut self) -> Option<f64> {
        self.waiting.pop_front()
    }
}
