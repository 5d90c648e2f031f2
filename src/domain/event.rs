//! Event and payload value types flowing through the simulation.

use chrono::NaiveDateTime;

/// Logical instant; the sole ordering key for dispatch.
pub type Timestamp = NaiveDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Long,
    Short,
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

/// Single market-data observation.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub code: String,
    pub price: f64,
}

/// Trading signal emitted by a strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub code: String,
    pub direction: Direction,
    pub strength: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub code: String,
    pub side: Side,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub code: String,
    pub side: Side,
    pub quantity: i64,
    pub price: f64,
}

/// Closed payload variant set. The sequencer never branches on the kind;
/// only collaborators on the far side of the processor port do.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    MarketData(Tick),
    Signal(Signal),
    Order(Order),
    Fill(Fill),
    Scheduling { label: String },
}

/// Immutable timestamped unit of information. Created by a source or by
/// the scheduler, dropped after dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub timestamp: Timestamp,
    pub kind: EventKind,
}

impl Event {
    pub fn market_data(timestamp: Timestamp, code: &str, price: f64) -> Self {
        Event {
            timestamp,
            kind: EventKind::MarketData(Tick {
                code: code.to_string(),
                price,
            }),
        }
    }

    pub fn scheduling(timestamp: Timestamp, label: &str) -> Self {
        Event {
            timestamp,
            kind: EventKind::Scheduling {
                label: label.to_string(),
            },
        }
    }

    pub fn fill(timestamp: Timestamp, code: &str, side: Side, quantity: i64, price: f64) -> Self {
        Event {
            timestamp,
            kind: EventKind::Fill(Fill {
                code: code.to_string(),
                side,
                quantity,
                price,
            }),
        }
    }
}
