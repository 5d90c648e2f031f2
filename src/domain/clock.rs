//! Monotonic simulated clock.

use super::error::SimtraderError;
use super::event::Timestamp;

/// Logical-time register advanced only by dispatched events. Time never
/// moves backwards; the only mutation path is [`SimClock::advance_to`].
#[derive(Debug, Clone)]
pub struct SimClock {
    current_time: Timestamp,
}

impl SimClock {
    pub fn new(start: Timestamp) -> Self {
        SimClock {
            current_time: start,
        }
    }

    pub fn now(&self) -> Timestamp {
        self.current_time
    }

    /// Move the clock forward to `t`. Rejects any rewind attempt.
    pub fn advance_to(&mut self, t: Timestamp) -> Result<(), SimtraderError> {
        if t < self.current_time {
            return Err(SimtraderError::ClockRewind {
                current: self.current_time,
                requested: t,
            });
        }
        self.current_time = t;
        Ok(())
    }
}
