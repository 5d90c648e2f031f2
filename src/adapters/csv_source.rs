//! CSV replay event source.
//!
//! Replays recorded ticks from a `timestamp,code,price` file (header row
//! expected) as market-data events. Rows are sorted by timestamp on load,
//! so the source honors the non-decreasing contract even when the file
//! does not.

use chrono::NaiveDateTime;
use std::fs;
use std::path::Path;

use crate::domain::config::TIMESTAMP_FORMAT;
use crate::domain::error::SimtraderError;
use crate::domain::event::Event;
use crate::ports::event_source::EventSource;

#[derive(Debug)]
pub struct CsvReplaySource {
    name: String,
    events: Vec<Event>,
    cursor: usize,
}

impl CsvReplaySource {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SimtraderError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| SimtraderError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;
        let name = format!(
            "csv:{}",
            path.file_stem().unwrap_or_default().to_string_lossy()
        );
        Self::from_csv(&name, &content)
    }

    pub fn from_csv(name: &str, content: &str) -> Result<Self, SimtraderError> {
        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut events = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| SimtraderError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            let raw_ts = record.get(0).ok_or_else(|| SimtraderError::Data {
                reason: "missing timestamp column".to_string(),
            })?;
            let timestamp =
                NaiveDateTime::parse_from_str(raw_ts, TIMESTAMP_FORMAT).map_err(|e| {
                    SimtraderError::Data {
                        reason: format!("invalid timestamp {raw_ts:?}: {e}"),
                    }
                })?;

            let code = record.get(1).ok_or_else(|| SimtraderError::Data {
                reason: "missing code column".to_string(),
            })?;

            let price: f64 = record
                .get(2)
                .ok_or_else(|| SimtraderError::Data {
                    reason: "missing price column".to_string(),
                })?
                .parse()
                .map_err(|e| SimtraderError::Data {
                    reason: format!("invalid price value: {e}"),
                })?;

            events.push(Event::market_data(timestamp, code, price));
        }

        // Stable sort keeps file order for equal timestamps.
        events.sort_by_key(|e| e.timestamp);

        Ok(CsvReplaySource {
            name: name.to_string(),
            events,
            cursor: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSource for CsvReplaySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn peek(&self) -> Option<&Event> {
        self.events.get(self.cursor)
    }

    fn pop(&mut self) -> Option<Event> {
        let event = self.events.get(self.cursor).cloned()?;
        self.cursor += 1;
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::EventKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "timestamp,code,price\n\
        2025-12-24 09:32:00,BHP,45.3\n\
        2025-12-24 09:30:00,BHP,45.0\n\
        2025-12-24 09:31:00,BHP,45.1\n";

    fn price(event: &Event) -> f64 {
        match &event.kind {
            EventKind::MarketData(tick) => tick.price,
            other => panic!("unexpected kind: {other:?}"),
        }
    }

    #[test]
    fn replays_sorted_by_timestamp() {
        let mut source = CsvReplaySource::from_csv("csv:BHP", SAMPLE).unwrap();
        assert_eq!(source.len(), 3);

        let prices: Vec<f64> = std::iter::from_fn(|| source.pop()).map(|e| price(&e)).collect();
        assert_eq!(prices, [45.0, 45.1, 45.3]);
    }

    #[test]
    fn peek_then_pop_agree() {
        let mut source = CsvReplaySource::from_csv("csv:BHP", SAMPLE).unwrap();
        let peeked = source.peek().cloned().unwrap();
        assert_eq!(source.pop().unwrap(), peeked);
    }

    #[test]
    fn exhausts_after_all_rows() {
        let mut source = CsvReplaySource::from_csv("csv:BHP", SAMPLE).unwrap();
        for _ in 0..3 {
            assert!(source.pop().is_some());
        }
        assert!(source.pop().is_none());
        assert!(source.peek().is_none());
    }

    #[test]
    fn empty_file_yields_empty_source() {
        let source = CsvReplaySource::from_csv("csv:BHP", "timestamp,code,price\n").unwrap();
        assert!(source.is_empty());
    }

    #[test]
    fn bad_timestamp_is_a_data_error() {
        let content = "timestamp,code,price\nyesterday,BHP,45.0\n";
        let err = CsvReplaySource::from_csv("csv:BHP", content).unwrap_err();
        assert!(matches!(err, SimtraderError::Data { .. }));
    }

    #[test]
    fn bad_price_is_a_data_error() {
        let content = "timestamp,code,price\n2025-12-24 09:30:00,BHP,cheap\n";
        let err = CsvReplaySource::from_csv("csv:BHP", content).unwrap_err();
        assert!(matches!(err, SimtraderError::Data { .. }));
    }

    #[test]
    fn from_path_reads_file_and_names_source() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{SAMPLE}").unwrap();

        let source = CsvReplaySource::from_path(file.path()).unwrap();
        assert!(source.name().starts_with("csv:"));
        assert_eq!(source.len(), 3);
    }

    #[test]
    fn missing_file_is_a_data_error() {
        let err = CsvReplaySource::from_path("/nonexistent/BHP.csv").unwrap_err();
        assert!(matches!(err, SimtraderError::Data { .. }));
    }
}
