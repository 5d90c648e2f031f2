//! Event processor port trait.

use crate::domain::event::Event;
use crate::domain::sequencer::Scheduler;

/// Consumer of dispatched events.
pub trait EventProcessor {
    /// Consume one event. May schedule or cancel ad-hoc future events
    /// through `scheduler` during the call; must not block.
    fn process(&mut self, event: &Event, scheduler: &mut dyn Scheduler);
}
