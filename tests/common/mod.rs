#![allow(dead_code)]

use chrono::NaiveDate;
use simtrader::domain::event::{Event, EventKind, Timestamp};
use simtrader::domain::sequencer::Scheduler;
use simtrader::ports::event_processor::EventProcessor;
use simtrader::ports::event_source::EventSource;
use std::collections::VecDeque;

/// Base instant for test timelines: 2025-12-24 09:30:00 plus `secs`.
pub fn ts(secs: i64) -> Timestamp {
    NaiveDate::from_ymd_opt(2025, 12, 24)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
        + chrono::Duration::seconds(secs)
}

pub fn tick(secs: i64, code: &str, price: f64) -> Event {
    Event::market_data(ts(secs), code, price)
}

pub fn note(secs: i64, label: &str) -> Event {
    Event::scheduling(ts(secs), label)
}

/// Short tag for asserting dispatch order.
pub fn label(event: &Event) -> String {
    match &event.kind {
        EventKind::MarketData(t) => t.code.clone(),
        EventKind::Scheduling { label } => label.clone(),
        other => format!("{other:?}"),
    }
}

pub struct VecSource {
    name: String,
    events: VecDeque<Event>,
    pops_after_exhaustion: usize,
}

impl VecSource {
    pub fn new(name: &str, events: Vec<Event>) -> Self {
        VecSource {
            name: name.to_string(),
            events: events.into(),
            pops_after_exhaustion: 0,
        }
    }
}

impl EventSource for VecSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn peek(&self) -> Option<&Event> {
        self.events.front()
    }

    fn pop(&mut self) -> Option<Event> {
        let event = self.events.pop_front();
        if event.is_none() {
            self.pops_after_exhaustion += 1;
        }
        event
    }
}

/// Records every dispatched event.
#[derive(Default)]
pub struct RecordingProcessor {
    pub seen: Vec<Event>,
}

impl RecordingProcessor {
    pub fn labels(&self) -> Vec<String> {
        self.seen.iter().map(label).collect()
    }
}

impl EventProcessor for RecordingProcessor {
    fn process(&mut self, event: &Event, _scheduler: &mut dyn Scheduler) {
        self.seen.push(event.clone());
    }
}

/// Processor driven by a closure, for tests that schedule or cancel
/// during dispatch.
pub struct FnProcessor<F>(pub F);

impl<F> EventProcessor for FnProcessor<F>
where
    F: FnMut(&Event, &mut dyn Scheduler),
{
    fn process(&mut self, event: &Event, scheduler: &mut dyn Scheduler) {
        (self.0)(event, scheduler);
    }
}
