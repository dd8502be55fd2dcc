//! Named stopwatches with laps and split reports.
//!
//! A [`Stopwatch`] records a `start`, any number of labelled laps and a
//! `stop`, then reports the total duration and the split between each pair
//! of adjacent events. Every recorded event is passed to a [`Logger`].
//!
//! Stopwatches can be handed down a call chain through a [`Scope`]; see the
//! [`scope`] module.
//!
//! ```
//! use sw_timer::Stopwatch;
//!
//! let stopwatch = Stopwatch::new("request");
//! stopwatch.start()?;
//! stopwatch.lap("parse", "headers")?;
//! stopwatch.stop()?;
//!
//! let report = stopwatch.report()?;
//! assert_eq!(report.splits.len(), 2);
//! # Ok::<(), sw_timer::StopwatchError>(())
//! ```

mod clock;
mod config;
mod error;
mod logger;
pub mod scope;
mod stopwatch;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, dirs_config_path};
pub use error::{ErrorKind, StopwatchError};
pub use logger::{Logger, NopLogger, TracingLogger};
pub use scope::Scope;
pub use stopwatch::{State, Stopwatch};
pub use sw_core::{EventLedger, EventRecord, Label, LedgerError, Report, Split};
