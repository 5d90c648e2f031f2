//! GBM market-data event source.

use chrono::Duration;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::event::{Event, Timestamp};
use crate::domain::gbm::GbmParameters;
use crate::ports::event_source::EventSource;

/// Lazily generates a bounded stream of market-data ticks along a
/// geometric-Brownian-motion price path. Deterministic for a given seed.
///
/// `mu` and `sigma` are per-step parameters (dt = 1 in return space);
/// each emitted tick advances simulated time by `dt_secs`.
pub struct GbmPriceSource {
    name: String,
    code: String,
    params: GbmParameters,
    price: f64,
    cursor: Timestamp,
    step: Duration,
    remaining: usize,
    rng: StdRng,
    // One-event lookahead so peek is non-destructive.
    next: Option<Event>,
}

impl GbmPriceSource {
    pub fn new(
        code: &str,
        params: GbmParameters,
        initial_price: f64,
        start: Timestamp,
        dt_secs: i64,
        steps: usize,
        seed: u64,
    ) -> Self {
        let mut source = GbmPriceSource {
            name: format!("gbm:{code}"),
            code: code.to_string(),
            params,
            price: initial_price,
            cursor: start,
            step: Duration::seconds(dt_secs),
            remaining: steps,
            rng: StdRng::seed_from_u64(seed),
            next: None,
        };
        source.next = source.generate();
        source
    }

    fn generate(&mut self) -> Option<Event> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let event = Event::market_data(self.cursor, &self.code, self.price);

        // Prepare the following tick.
        let r = self.params.sample_log_return(1.0, &mut self.rng);
        self.price *= r.exp();
        self.cursor += self.step;

        Some(event)
    }
}

impl EventSource for GbmPriceSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn peek(&self) -> Option<&Event> {
        self.next.as_ref()
    }

    fn pop(&mut self) -> Option<Event> {
        let event = self.next.take()?;
        self.next = self.generate();
        Some(event)
    }
}
