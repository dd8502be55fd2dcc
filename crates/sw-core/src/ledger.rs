//! Ordered, keyed storage of the events recorded by one stopwatch.
//!
//! The ledger keeps two views of the same events:
//! - `order`: every label in insertion order, duplicates included
//! - `records`: the most recent record for each label
//!
//! Re-using a lap label appends a second position to `order` but overwrites
//! the stored record, so every position for that label resolves to the latest
//! timestamp and comment.
//!
//! The ledger never reads a clock. Callers pass the instant for each event,
//! which keeps every operation a pure state transition.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::label::Label;

/// Lifecycle and lookup errors raised by the ledger.
///
/// None of these are transient: each one means the caller used the stopwatch
/// out of order or asked about an event that was never recorded.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("stopwatch {name} has already been started")]
    AlreadyStarted { name: String },

    #[error("stopwatch {name} has already been stopped")]
    AlreadyStopped { name: String },

    #[error("stopwatch {name} has not been started")]
    NotStarted { name: String },

    #[error("stopwatch {name} has not been stopped")]
    NotStopped { name: String },

    /// A duration referenced a label with no stored record.
    #[error("stopwatch {name} does not have key {label}")]
    UnknownKey { name: String, label: Label },
}

/// A single recorded event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Nanoseconds since the Unix epoch.
    pub timestamp: i64,
    pub comment: String,
}

impl EventRecord {
    /// The record's timestamp as a UTC date-time.
    pub fn at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.timestamp)
    }
}

/// Timing events for one named stopwatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventLedger {
    name: String,
    order: Vec<Label>,
    records: HashMap<Label, EventRecord>,
}

impl EventLedger {
    /// Creates an empty ledger for the named stopwatch.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            order: Vec::new(),
            records: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Labels in the order they were recorded.
    pub fn order(&self) -> &[Label] {
        &self.order
    }

    /// The latest record stored for `label`, if any.
    pub fn record(&self, label: &Label) -> Option<&EventRecord> {
        self.records.get(label)
    }

    /// True once `start` has been recorded.
    pub fn is_started(&self) -> bool {
        self.order.first() == Some(&Label::Start)
    }

    /// True once `stop` has been recorded.
    pub fn is_stopped(&self) -> bool {
        self.order.last() == Some(&Label::Stop)
    }

    /// Records the start event at `timestamp`.
    pub fn record_start(&mut self, timestamp: i64) -> Result<&EventRecord, LedgerError> {
        if self.is_stopped() {
            return Err(self.already_stopped());
        }
        if self.is_started() {
            return Err(LedgerError::AlreadyStarted {
                name: self.name.clone(),
            });
        }
        Ok(self.append(Label::Start, timestamp, String::new()))
    }

    /// Records a lap named `name` at `timestamp`.
    ///
    /// A repeated name gets a new position in the order but replaces the
    /// stored record for that name.
    pub fn record_lap(
        &mut self,
        name: &str,
        comment: &str,
        timestamp: i64,
    ) -> Result<&EventRecord, LedgerError> {
        self.ensure_running()?;
        Ok(self.append(Label::lap(name), timestamp, comment.to_string()))
    }

    /// Records the stop event at `timestamp`.
    pub fn record_stop(&mut self, timestamp: i64) -> Result<&EventRecord, LedgerError> {
        self.ensure_running()?;
        Ok(self.append(Label::Stop, timestamp, String::new()))
    }

    /// Absolute time between the stored records for `from` and `to`.
    ///
    /// The result does not depend on argument order.
    pub fn duration(&self, from: &Label, to: &Label) -> Result<Duration, LedgerError> {
        let from = self.lookup(from)?;
        let to = self.lookup(to)?;
        Ok(Duration::from_nanos(from.timestamp.abs_diff(to.timestamp)))
    }

    fn lookup(&self, label: &Label) -> Result<&EventRecord, LedgerError> {
        self.records
            .get(label)
            .ok_or_else(|| LedgerError::UnknownKey {
                name: self.name.clone(),
                label: label.clone(),
            })
    }

    fn ensure_running(&self) -> Result<(), LedgerError> {
        if self.is_stopped() {
            return Err(self.already_stopped());
        }
        if !self.is_started() {
            return Err(LedgerError::NotStarted {
                name: self.name.clone(),
            });
        }
        Ok(())
    }

    fn already_stopped(&self) -> LedgerError {
        LedgerError::AlreadyStopped {
            name: self.name.clone(),
        }
    }

    fn append(&mut self, label: Label, timestamp: i64, comment: String) -> &EventRecord {
        self.order.push(label.clone());
        self.records
            .entry(label)
            .insert_entry(EventRecord { timestamp, comment })
            .into_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: i64 = 1_000_000;

    fn stopped_ledger(laps: &[(&str, i64)]) -> EventLedger {
        let mut ledger = EventLedger::new("test");
        ledger.record_start(0).unwrap();
        for (name, at) in laps {
            ledger.record_lap(name, "", *at).unwrap();
        }
        let end = laps.last().map_or(MS, |(_, at)| at + MS);
        ledger.record_stop(end).unwrap();
        ledger
    }

    #[test]
    fn new_ledger_is_idle() {
        let ledger = EventLedger::new("test");
        assert_eq!(ledger.name(), "test");
        assert!(ledger.order().is_empty());
        assert!(!ledger.is_started());
        assert!(!ledger.is_stopped());
    }

    #[test]
    fn start_records_empty_comment() {
        let mut ledger = EventLedger::new("test");
        let record = ledger.record_start(42).unwrap().clone();

        assert_eq!(record, EventRecord { timestamp: 42, comment: String::new() });
        assert_eq!(ledger.order(), &[Label::Start]);
        assert!(ledger.is_started());
        assert!(!ledger.is_stopped());
    }

    #[test]
    fn full_lifecycle_brackets_laps_with_boundaries() {
        for laps in [0_i64, 1, 5] {
            let names: Vec<String> = (0..laps).map(|i| format!("lap-{i}")).collect();
            let stamped: Vec<(&str, i64)> = names
                .iter()
                .zip(1..)
                .map(|(name, i)| (name.as_str(), i * MS))
                .collect();
            let ledger = stopped_ledger(&stamped);

            let order = ledger.order();
            assert_eq!(order.len(), stamped.len() + 2);
            assert_eq!(order.first(), Some(&Label::Start));
            assert_eq!(order.last(), Some(&Label::Stop));
        }
    }

    #[test]
    fn start_twice_fails_without_mutation() {
        let mut ledger = EventLedger::new("test");
        ledger.record_start(10).unwrap();
        let before = ledger.clone();

        let err = ledger.record_start(20).unwrap_err();
        assert_eq!(err, LedgerError::AlreadyStarted { name: "test".into() });
        assert_eq!(ledger, before);
    }

    #[test]
    fn start_after_stop_reports_already_stopped() {
        let mut ledger = stopped_ledger(&[]);
        let err = ledger.record_start(99).unwrap_err();
        assert_eq!(err, LedgerError::AlreadyStopped { name: "test".into() });
    }

    #[test]
    fn lap_and_stop_require_start() {
        let mut ledger = EventLedger::new("test");
        let not_started = LedgerError::NotStarted { name: "test".into() };

        assert_eq!(ledger.record_lap("a", "x", 1).unwrap_err(), not_started);
        assert_eq!(ledger.record_stop(1).unwrap_err(), not_started);
        assert_eq!(ledger, EventLedger::new("test"));
    }

    #[test]
    fn nothing_recorded_after_stop() {
        let mut ledger = stopped_ledger(&[("a", MS)]);
        let before = ledger.clone();
        let stopped = LedgerError::AlreadyStopped { name: "test".into() };

        assert_eq!(ledger.record_lap("b", "", 5 * MS).unwrap_err(), stopped);
        assert_eq!(ledger.record_stop(5 * MS).unwrap_err(), stopped);
        assert_eq!(ledger, before);
    }

    #[test]
    fn repeated_lap_appends_order_and_overwrites_record() {
        let mut ledger = EventLedger::new("test");
        ledger.record_start(0).unwrap();
        ledger.record_lap("io", "first", MS).unwrap();
        ledger.record_lap("io", "second", 3 * MS).unwrap();

        assert_eq!(ledger.order(), &[Label::Start, Label::lap("io"), Label::lap("io")]);
        let record = ledger.record(&Label::lap("io")).unwrap();
        assert_eq!(record.timestamp, 3 * MS);
        assert_eq!(record.comment, "second");
    }

    #[test]
    fn duration_is_symmetric() {
        let ledger = stopped_ledger(&[("a", 100 * MS), ("b", 3_100 * MS)]);
        let labels = [Label::Start, Label::lap("a"), Label::lap("b"), Label::Stop];

        for from in &labels {
            for to in &labels {
                assert_eq!(
                    ledger.duration(from, to).unwrap(),
                    ledger.duration(to, from).unwrap(),
                    "{from} <-> {to}"
                );
            }
        }
        assert_eq!(
            ledger.duration(&Label::lap("b"), &Label::lap("a")).unwrap(),
            Duration::from_secs(3)
        );
        assert_eq!(
            ledger.duration(&Label::Start, &Label::Stop).unwrap(),
            Duration::from_millis(3_101)
        );
    }

    #[test]
    fn duration_handles_clock_going_backwards() {
        let mut ledger = EventLedger::new("test");
        ledger.record_start(10 * MS).unwrap();
        ledger.record_stop(4 * MS).unwrap();

        assert_eq!(
            ledger.duration(&Label::Start, &Label::Stop).unwrap(),
            Duration::from_millis(6)
        );
    }

    #[test]
    fn duration_names_the_missing_label() {
        let ledger = stopped_ledger(&[("a", MS)]);

        let err = ledger.duration(&Label::Start, &Label::lap("c")).unwrap_err();
        assert_eq!(
            err,
            LedgerError::UnknownKey { name: "test".into(), label: Label::lap("c") }
        );

        let err = ledger.duration(&Label::lap("x"), &Label::lap("y")).unwrap_err();
        assert_eq!(err.to_string(), "stopwatch test does not have key x");
    }

    #[test]
    fn record_timestamp_converts_to_datetime() {
        let record = EventRecord {
            timestamp: 1_700_000_000_000_000_000,
            comment: String::new(),
        };
        assert_eq!(record.at().to_rfc3339(), "2023-11-14T22:13:20+00:00");
    }

    #[test]
    fn error_messages_name_the_stopwatch() {
        let name = String::from("checkout");
        let messages = [
            LedgerError::AlreadyStarted { name: name.clone() },
            LedgerError::AlreadyStopped { name: name.clone() },
            LedgerError::NotStarted { name: name.clone() },
            LedgerError::NotStopped { name },
        ]
        .map(|err| err.to_string());

        insta::assert_snapshot!(messages.join("\n"), @r"
        stopwatch checkout has already been started
        stopwatch checkout has already been stopped
        stopwatch checkout has not been started
        stopwatch checkout has not been stopped
        ");
    }
}
