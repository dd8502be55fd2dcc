//! Sinks notified of every recorded stopwatch event.

/// Receives each successful `start`, lap and `stop`.
///
/// Called synchronously after the event is stored. Implementations handle
/// their own failures; nothing they do can undo or fail the event.
pub trait Logger: Send + Sync {
    /// `timestamp` is in nanoseconds since the Unix epoch.
    fn log(&self, timestamp: i64, label: &str, comment: &str);
}

/// Discards every event. Used when no logger is supplied.
#[derive(Debug, Default, Clone, Copy)]
pub struct NopLogger;

impl Logger for NopLogger {
    fn log(&self, _timestamp: i64, _label: &str, _comment: &str) {}
}

/// Forwards events to `tracing` at INFO under the `sw_timer::events` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, timestamp: i64, label: &str, comment: &str) {
        tracing::info!(target: "sw_timer::events", timestamp, label, comment, "stopwatch event");
    }
}
