//! The stopwatch facade: `start`, laps, `stop` and the final report.
//!
//! # Thread Safety
//!
//! A [`Stopwatch`] is `Send + Sync` and is usually shared as
//! `Arc<Stopwatch>`. The whole ledger sits behind one mutex, so concurrent
//! laps are serialized rather than racing. The running flag has its own
//! mutex, which lets [`Stopwatch::running`] answer from any thread without
//! waiting on the ledger.
//!
//! Lock poisoning is ignored: every ledger operation either fully applies or
//! leaves the ledger untouched, so a panic elsewhere cannot leave it half
//! written.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use sw_core::{EventLedger, EventRecord, Label, LedgerError, Report, build_report};

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::StopwatchError;
use crate::logger::{Logger, NopLogger, TracingLogger};

/// Where a stopwatch is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Created but not started.
    Idle,
    /// Started and accepting laps.
    Running,
    /// Stopped. There is no way back.
    Stopped,
}

/// A named stopwatch that records laps and reports splits.
pub struct Stopwatch {
    name: String,
    logger: Arc<dyn Logger>,
    clock: Arc<dyn Clock>,
    ledger: Mutex<EventLedger>,
    running: Mutex<bool>,
}

impl fmt::Debug for Stopwatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stopwatch")
            .field("name", &self.name)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl Stopwatch {
    /// Creates an idle stopwatch that logs nowhere and reads the system clock.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            ledger: Mutex::new(EventLedger::new(name.clone())),
            name,
            logger: Arc::new(NopLogger),
            clock: Arc::new(SystemClock),
            running: Mutex::new(false),
        }
    }

    /// Creates an idle stopwatch from configuration.
    ///
    /// Events go to [`TracingLogger`] when `trace_events` is set.
    pub fn from_config(config: &Config) -> Self {
        let stopwatch = Self::new(config.default_name.clone());
        if config.trace_events {
            stopwatch.with_logger(Arc::new(TracingLogger))
        } else {
            stopwatch
        }
    }

    /// Replaces the event logger.
    #[must_use]
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the stopwatch is between a successful `start` and `stop`.
    ///
    /// Only takes the running-flag lock, never the ledger lock.
    pub fn running(&self) -> bool {
        *self.running.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> State {
        let ledger = self.lock_ledger();
        if ledger.is_stopped() {
            State::Stopped
        } else if ledger.is_started() {
            State::Running
        } else {
            State::Idle
        }
    }

    /// Marks the start instant.
    pub fn start(&self) -> Result<(), StopwatchError> {
        self.record(Some(true), EventLedger::record_start)
    }

    /// Records a lap. Re-using `name` replaces that lap's stored record.
    pub fn lap(&self, name: &str, comment: &str) -> Result<(), StopwatchError> {
        self.record(None, |ledger, now| ledger.record_lap(name, comment, now))
    }

    /// Marks the stop instant.
    pub fn stop(&self) -> Result<(), StopwatchError> {
        self.record(Some(false), EventLedger::record_stop)
    }

    /// Total duration and splits. Only valid once stopped.
    pub fn report(&self) -> Result<Report, StopwatchError> {
        let ledger = self.lock_ledger();
        build_report(&ledger).map_err(|err| self.rejected(err))
    }

    /// Absolute time between two recorded events.
    pub fn duration(&self, from: &Label, to: &Label) -> Result<Duration, StopwatchError> {
        let ledger = self.lock_ledger();
        ledger.duration(from, to).map_err(|err| self.rejected(err))
    }

    /// A copy of the events recorded so far.
    pub fn snapshot(&self) -> EventLedger {
        self.lock_ledger().clone()
    }

    /// Applies one ledger transition, then updates the running flag and
    /// notifies the logger. A rejected transition changes nothing.
    fn record<F>(&self, running: Option<bool>, op: F) -> Result<(), StopwatchError>
    where
        F: FnOnce(&mut EventLedger, i64) -> Result<&EventRecord, LedgerError>,
    {
        let mut ledger = self.lock_ledger();
        let now = self.clock.now();
        let record = match op(&mut ledger, now) {
            Ok(record) => record.clone(),
            Err(err) => return Err(self.rejected(err)),
        };
        let label = ledger.order().last().map(Label::to_string).unwrap_or_default();
        if let Some(running) = running {
            *self.running.lock().unwrap_or_else(PoisonError::into_inner) = running;
        }
        drop(ledger);

        tracing::debug!(
            stopwatch = %self.name,
            %label,
            timestamp = record.timestamp,
            "recorded stopwatch event"
        );
        self.logger.log(record.timestamp, &label, &record.comment);
        Ok(())
    }

    fn rejected(&self, err: LedgerError) -> StopwatchError {
        tracing::debug!(stopwatch = %self.name, error = %err, "rejected stopwatch operation");
        err.into()
    }

    fn lock_ledger(&self) -> MutexGuard<'_, EventLedger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
