//! Total duration and per-interval splits for a stopped ledger.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::label::Label;
use crate::ledger::{EventLedger, LedgerError};

/// Timing summary of a completed stopwatch run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Time between `start` and `stop`.
    #[serde(rename = "duration_ns", with = "nanos")]
    pub duration: Duration,
    /// One entry per pair of adjacent recorded events.
    pub splits: Vec<Split>,
}

/// The interval opened by one recorded event and closed by the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Split {
    /// Label of the opening event.
    pub name: String,
    /// Comment of the opening event.
    pub comment: String,
    #[serde(rename = "duration_ns", with = "nanos")]
    pub duration: Duration,
}

/// Builds a report from a stopped ledger.
///
/// Splits follow the recorded order, so a ledger with `n` events yields
/// `n - 1` splits. A lap name that was recorded more than once resolves to
/// its latest record at every position, including the earlier ones.
pub fn build_report(ledger: &EventLedger) -> Result<Report, LedgerError> {
    if !ledger.is_started() {
        return Err(LedgerError::NotStarted {
            name: ledger.name().to_string(),
        });
    }
    if !ledger.is_stopped() {
        return Err(LedgerError::NotStopped {
            name: ledger.name().to_string(),
        });
    }

    let duration = ledger.duration(&Label::Start, &Label::Stop)?;
    let splits = ledger
        .order()
        .windows(2)
        .map(|pair| split(ledger, &pair[0], &pair[1]))
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(
        stopwatch = ledger.name(),
        splits = splits.len(),
        total = ?duration,
        "built stopwatch report"
    );

    Ok(Report { duration, splits })
}

fn split(ledger: &EventLedger, begin: &Label, end: &Label) -> Result<Split, LedgerError> {
    let comment = ledger
        .record(begin)
        .map(|record| record.comment.clone())
        .unwrap_or_default();
    Ok(Split {
        name: begin.to_string(),
        comment,
        duration: ledger.duration(begin, end)?,
    })
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "total: {:?}", self.duration)?;
        for split in &self.splits {
            write!(f, "\n  {split}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.comment.is_empty() {
            write!(f, "{}: {:?}", self.name, self.duration)
        } else {
            write!(f, "{} ({}): {:?}", self.name, self.comment, self.duration)
        }
    }
}

/// Serializes a `Duration` as whole nanoseconds.
mod nanos {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        serializer.serialize_u64(nanos)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_nanos)
    }
}
