//! Event sequencer: a k-way merge of time-ordered event streams plus
//! ad-hoc scheduling.
//!
//! Each source lazily proposes its next event into a min-priority merge
//! queue keyed by `(timestamp, admission sequence number)`. The admission
//! number is strictly increasing across all insertions, so two items that
//! share a timestamp dispatch in admission order and payloads from
//! unrelated sources are never compared. Ad-hoc events scheduled by the
//! processor enter the same queue. Cancellation is lazy: a canceled
//! item stays in the heap and is discarded when it surfaces, with the
//! schedule registry as the single source of truth for liveness.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use log::debug;

use super::clock::SimClock;
use super::error::SimtraderError;
use super::event::{Event, Timestamp};
use crate::ports::event_processor::EventProcessor;
use crate::ports::event_source::EventSource;

/// Handle returned by `schedule`, used later for `cancel`. Minted once,
/// never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduleId(u64);

/// Provenance of an admitted item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    /// Index into the sequencer's source list, for replenishment.
    Source(usize),
    Scheduled(ScheduleId),
}

/// Wrapper actually stored in the merge heap. Ordering compares only
/// `(timestamp, seq)`, never the event payload.
#[derive(Debug)]
struct Admitted {
    timestamp: Timestamp,
    seq: u64,
    event: Event,
    origin: Origin,
}

impl PartialEq for Admitted {
    fn eq(&self, other: &Self) -> bool {
        self.timestamp == other.timestamp && self.seq == other.seq
    }
}

impl Eq for Admitted {}

impl PartialOrd for Admitted {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Admitted {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap behaviour: earliest timestamp first,
        // admission order breaking ties.
        match other.timestamp.cmp(&self.timestamp) {
            Ordering::Equal => other.seq.cmp(&self.seq),
            ord => ord,
        }
    }
}

/// Min-priority structure over admitted items.
#[derive(Debug, Default)]
struct MergeQueue {
    heap: BinaryHeap<Admitted>,
    next_seq: u64,
}

impl MergeQueue {
    fn insert(&mut self, event: Event, origin: Origin) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Admitted {
            timestamp: event.timestamp,
            seq,
            event,
            origin,
        });
    }

    fn pop_min(&mut self) -> Option<Admitted> {
        self.heap.pop()
    }

    #[cfg(test)]
    fn peek_min(&self) -> Option<&Admitted> {
        self.heap.peek()
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}

/// Registry of not-yet-fired, not-yet-canceled schedule ids. The heap may
/// hold tombstoned entries; membership here decides whether they are live.
#[derive(Debug, Default)]
struct ScheduleBook {
    next_id: u64,
    active: HashSet<ScheduleId>,
}

impl ScheduleBook {
    fn mint(&mut self) -> ScheduleId {
        let id = ScheduleId(self.next_id);
        self.next_id += 1;
        self.active.insert(id);
        id
    }

    /// Removes `id` from the active set. False when it already fired, was
    /// already canceled, or was never minted.
    fn retire(&mut self, id: ScheduleId) -> bool {
        self.active.remove(&id)
    }
}

/// Scheduling surface available to the processor while it handles a
/// dispatched event, and to callers between runs.
pub trait Scheduler {
    /// Admit an ad-hoc future event and return its handle. Permissive:
    /// timestamps at or before the current clock are accepted here and
    /// dropped as stale when reached; dispatch is the single
    /// enforcement point.
    fn schedule(&mut self, event: Event) -> ScheduleId;

    /// Cancel a not-yet-fired scheduled event. Returns false when the id
    /// already fired or is unknown; neither case is an error.
    fn cancel(&mut self, id: ScheduleId) -> bool;
}

struct SchedulerHandle<'a> {
    queue: &'a mut MergeQueue,
    book: &'a mut ScheduleBook,
}

impl Scheduler for SchedulerHandle<'_> {
    fn schedule(&mut self, event: Event) -> ScheduleId {
        let id = self.book.mint();
        self.queue.insert(event, Origin::Scheduled(id));
        id
    }

    fn cancel(&mut self, id: ScheduleId) -> bool {
        self.book.retire(id)
    }
}

/// Lifecycle of a sequencer. Construction either yields a `Ready`
/// sequencer or fails, so an uninitialized one is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    Ready,
    Running,
    Drained,
}

/// Orchestrates N event sources plus the internal scheduler, drives the
/// clock, and dispatches each event to the processor in global
/// `(timestamp, admission)` order.
pub struct EventSequencer<P> {
    clock: SimClock,
    sources: Vec<Box<dyn EventSource>>,
    processor: P,
    queue: MergeQueue,
    book: ScheduleBook,
    state: SequencerState,
}

impl<P: EventProcessor> EventSequencer<P> {
    /// Builds a sequencer and pulls the first event from every source.
    /// Fails with [`SimtraderError::EmptySource`] if any registered
    /// stream contributes nothing at all.
    pub fn new(
        clock: SimClock,
        sources: Vec<Box<dyn EventSource>>,
        processor: P,
    ) -> Result<Self, SimtraderError> {
        let mut sequencer = EventSequencer {
            clock,
            sources,
            processor,
            queue: MergeQueue::default(),
            book: ScheduleBook::default(),
            state: SequencerState::Ready,
        };
        for index in 0..sequencer.sources.len() {
            if !sequencer.replenish(index) {
                return Err(SimtraderError::EmptySource {
                    name: sequencer.sources[index].name().to_string(),
                });
            }
        }
        Ok(sequencer)
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// Items currently admitted to the merge queue, tombstones included.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn processor(&self) -> &P {
        &self.processor
    }

    pub fn into_processor(self) -> P {
        self.processor
    }

    /// Admit an ad-hoc event from outside a dispatch.
    pub fn schedule(&mut self, event: Event) -> ScheduleId {
        let mut handle = SchedulerHandle {
            queue: &mut self.queue,
            book: &mut self.book,
        };
        handle.schedule(event)
    }

    /// See [`Scheduler::cancel`].
    pub fn cancel(&mut self, id: ScheduleId) -> bool {
        self.book.retire(id)
    }

    /// Drains the merge queue, dispatching events in global order until no
    /// source or scheduled item remains. Running an already drained
    /// sequencer is a no-op. The error path is the defensive clock-rewind
    /// guard, unreachable while the stale-drop rule holds.
    pub fn run(&mut self) -> Result<(), SimtraderError> {
        self.state = SequencerState::Running;
        while self.step()? {}
        self.state = SequencerState::Drained;
        Ok(())
    }

    fn step(&mut self) -> Result<bool, SimtraderError> {
        let Some(item) = self.queue.pop_min() else {
            return Ok(false);
        };
        match item.origin {
            Origin::Scheduled(id) => {
                // Lazy cancellation: a popped item whose id is no longer
                // active is a tombstone. A live id is retired here; once
                // popped it can never fire again.
                if !self.book.retire(id) {
                    debug!("discarding canceled schedule at {}", item.timestamp);
                    return Ok(true);
                }
                self.dispatch(item.event)?;
            }
            Origin::Source(index) => {
                self.dispatch(item.event)?;
                self.replenish(index);
            }
        }
        Ok(true)
    }

    fn dispatch(&mut self, event: Event) -> Result<(), SimtraderError> {
        // Stale items are dropped before the clock is consulted, so the
        // strict rewind guard in advance_to stays unreachable here.
        if event.timestamp < self.clock.now() {
            debug!(
                "dropping stale event at {} (clock at {})",
                event.timestamp,
                self.clock.now()
            );
            return Ok(());
        }
        self.clock.advance_to(event.timestamp)?;
        let mut handle = SchedulerHandle {
            queue: &mut self.queue,
            book: &mut self.book,
        };
        self.processor.process(&event, &mut handle);
        Ok(())
    }

    /// Pull the next event from source `index` into the merge queue.
    /// Returns false when the source is exhausted; it then simply stops
    /// participating.
    fn replenish(&mut self, index: usize) -> bool {
        match self.sources[index].pop() {
            Some(event) => {
                self.queue.insert(event, Origin::Source(index));
                true
            }
            None => {
                debug!("source {} exhausted", self.sources[index].name());
                false
            }
        }
    }
}
