//! Core timing logic for the stopwatch.
//!
//! This crate contains the clock-free parts of a stopwatch:
//! - Ledger: the ordered record of `start`, lap and `stop` events
//! - Report: total duration and per-interval splits of a finished run
//! - Labels: reserved lifecycle boundaries and user-chosen lap names

mod label;
mod ledger;
mod report;

pub use label::Label;
pub use ledger::{EventLedger, EventRecord, LedgerError};
pub use report::{Report, Split, build_report};
