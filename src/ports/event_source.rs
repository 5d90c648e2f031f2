//! Event source port trait.

use crate::domain::event::Event;

/// External generator of a single time-ordered event stream.
///
/// Timestamps must be non-decreasing within one source's own output; global
/// ordering across sources is the sequencer's job, not the source's.
pub trait EventSource {
    fn name(&self) -> &str;

    /// The next event without consuming it.
    fn peek(&self) -> Option<&Event>;

    /// The next event, advancing the source. `None` once exhausted.
    fn pop(&mut self) -> Option<Event>;
}
