/// A point event in the single-server queue
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QueueEvent {
    Arrival(f64),
    Departure(f64),
}

impl QueueEvent {
    /// Simulated time at which the event fires
    pub fn time(&self) -> f64 {
        match self {
            QueueEvent::Arrival(t) | QueueEvent::Departure(t) => *t,
        }
    }

    /// Tie-break rank for events at the same instant: arrivals first
    pub(crate) fn rank(&self) -> u8 {
        match self {
            QueueEvent::Arrival(_) => 0,
            QueueEvent::Departure(_) => 1,
        }
    }

    pub fn is_arrival(&self) -> bool {
        matches!(self, QueueEvent::Arrival(_))
    }
}
