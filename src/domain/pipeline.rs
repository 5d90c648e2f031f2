//! Strategy, portfolio and execution collaborator traits, plus the
//! processor that chains them.
//!
//! These are deliberately thin capability interfaces: the engine neither
//! knows nor cares how signals are computed or orders are filled.

use super::event::{Event, EventKind, Fill, Order, Signal};
use super::sequencer::Scheduler;
use crate::ports::event_processor::EventProcessor;

/// Turns external events into trading signals the portfolio can action.
pub trait Strategy {
    fn on_event(&mut self, event: &Event) -> Option<Signal>;
}

pub trait Portfolio {
    fn on_signal(&mut self, signal: &Signal) -> Option<Order>;
    fn on_fill(&mut self, fill: &Fill) -> Option<Order>;
}

pub trait Execution {
    fn receive(&mut self, order: &Order);
}

/// Event processor composing strategy → portfolio → execution.
pub struct PipelineProcessor<S, P, X> {
    strategy: S,
    portfolio: P,
    execution: X,
}

impl<S, P, X> PipelineProcessor<S, P, X> {
    pub fn new(strategy: S, portfolio: P, execution: X) -> Self {
        PipelineProcessor {
            strategy,
            portfolio,
            execution,
        }
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn portfolio(&self) -> &P {
        &self.portfolio
    }

    pub fn execution(&self) -> &X {
        &self.execution
    }
}

impl<S, P, X> EventProcessor for PipelineProcessor<S, P, X>
where
    S: Strategy,
    P: Portfolio,
    X: Execution,
{
    fn process(&mut self, event: &Event, _scheduler: &mut dyn Scheduler) {
        // Fills bypass the strategy and settle against the portfolio.
        if let EventKind::Fill(fill) = &event.kind {
            if let Some(order) = self.portfolio.on_fill(fill) {
                self.execution.receive(&order);
            }
            return;
        }

        let Some(signal) = self.strategy.on_event(event) else {
            return;
        };
        let Some(order) = self.portfolio.on_signal(&signal) else {
            return;
        };
        self.execution.receive(&order);
    }
}
