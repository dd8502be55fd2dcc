//! Event labels: the reserved lifecycle boundaries and user-chosen laps.

use std::fmt;

/// Identifies one recorded event in a ledger.
///
/// `Start` and `Stop` are the reserved lifecycle boundaries. Every other
/// event is a lap with a caller-chosen name. Because the boundaries are
/// their own variants, a lap named `"start"` is never confused with the
/// real start event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Label {
    Start,
    Stop,
    Lap(String),
}

impl Label {
    /// Creates a lap label.
    pub fn lap(name: impl Into<String>) -> Self {
        Self::Lap(name.into())
    }

    /// Returns the label as a string slice.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Lap(name) => name,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
