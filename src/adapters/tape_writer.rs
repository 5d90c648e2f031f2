//! CSV tape of dispatched events.

use log::warn;
use std::io::Write;

use crate::domain::config::TIMESTAMP_FORMAT;
use crate::domain::error::SimtraderError;
use crate::domain::event::{Event, EventKind};
use crate::domain::sequencer::Scheduler;
use crate::ports::event_processor::EventProcessor;

/// Event processor that appends every dispatched event to a CSV tape:
/// `timestamp,kind,code,detail`. The reporting processor for CLI runs.
pub struct TapeWriter<W: Write> {
    writer: csv::Writer<W>,
    dispatched: u64,
}

impl<W: Write> TapeWriter<W> {
    pub fn new(inner: W) -> Self {
        TapeWriter {
            writer: csv::Writer::from_writer(inner),
            dispatched: 0,
        }
    }

    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    /// Flush the tape and hand back the underlying writer.
    pub fn finish(self) -> Result<W, SimtraderError> {
        self.writer.into_inner().map_err(|e| SimtraderError::Data {
            reason: format!("failed to flush tape: {e}"),
        })
    }

    fn row(event: &Event) -> [String; 4] {
        let timestamp = event.timestamp.format(TIMESTAMP_FORMAT).to_string();
        match &event.kind {
            EventKind::MarketData(tick) => [
                timestamp,
                "market_data".to_string(),
                tick.code.clone(),
                format!("{}", tick.price),
            ],
            EventKind::Signal(signal) => [
                timestamp,
                "signal".to_string(),
                signal.code.clone(),
                format!("{:?} {}", signal.direction, signal.strength),
            ],
            EventKind::Order(order) => [
                timestamp,
                "order".to_string(),
                order.code.clone(),
                format!("{:?} {}", order.side, order.quantity),
            ],
            EventKind::Fill(fill) => [
                timestamp,
                "fill".to_string(),
                fill.code.clone(),
                format!("{:?} {} @ {}", fill.side, fill.quantity, fill.price),
            ],
            EventKind::Scheduling { label } => [
                timestamp,
                "scheduling".to_string(),
                String::new(),
                label.clone(),
            ],
        }
    }
}

impl<W: Write> EventProcessor for TapeWriter<W> {
    fn process(&mut self, event: &Event, _scheduler: &mut dyn Scheduler) {
        self.dispatched += 1;
        // The processor port cannot fail; a broken tape should not stop
        // the run.
        if let Err(e) = self.writer.write_record(Self::row(event)) {
            warn!("tape write failed: {e}");
        }
    }
}
