//! Scopes carry a stopwatch down a call chain without globals.
//!
//! A [`Scope`] is an immutable chain of key/value entries. Adding an entry
//! returns a new scope and leaves the original untouched, so a callee can
//! attach its own stopwatch without affecting its caller. Lookups walk from
//! the newest entry back to the root, which means at most one stopwatch is
//! visible per scope: the one attached most recently.
//!
//! The free functions ([`start`], [`lap`], [`stop`], [`report`]) look up the
//! scope's stopwatch and forward to it.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::Arc;

use sw_core::Report;

use crate::error::StopwatchError;
use crate::logger::Logger;
use crate::stopwatch::Stopwatch;

/// Key under which [`attach`] stores the stopwatch.
pub const STOPWATCH_KEY: &str = "stopwatch";

/// An immutable key/value chain passed explicitly through call chains.
#[derive(Clone, Default)]
pub struct Scope {
    head: Option<Arc<Entry>>,
}

struct Entry {
    key: &'static str,
    type_name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
    parent: Option<Arc<Entry>>,
}

impl Scope {
    /// An empty root scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a child scope with `value` stored under `key`.
    #[must_use]
    pub fn with_value<T: Any + Send + Sync>(&self, key: &'static str, value: T) -> Self {
        Self {
            head: Some(Arc::new(Entry {
                key,
                type_name: type_name::<T>(),
                value: Arc::new(value),
                parent: self.head.clone(),
            })),
        }
    }

    fn entry(&self, key: &str) -> Option<&Entry> {
        let mut entry = self.head.as_deref();
        while let Some(current) = entry {
            if current.key == key {
                return Some(current);
            }
            entry = current.parent.as_deref();
        }
        None
    }

    fn keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        let mut entry = self.head.as_deref();
        while let Some(current) = entry {
            keys.push(current.key);
            entry = current.parent.as_deref();
        }
        keys
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scope").field("keys", &self.keys()).finish()
    }
}

/// Returns a child of `scope` carrying `stopwatch`.
pub fn attach(scope: &Scope, stopwatch: Arc<Stopwatch>) -> Scope {
    scope.with_value(STOPWATCH_KEY, stopwatch)
}

/// Creates a stopwatch named `name` and attaches it to a child of `scope`.
///
/// A missing logger means events are not logged.
pub fn create(scope: &Scope, name: impl Into<String>, logger: Option<Arc<dyn Logger>>) -> Scope {
    let stopwatch = Stopwatch::new(name);
    let stopwatch = match logger {
        Some(logger) => stopwatch.with_logger(logger),
        None => stopwatch,
    };
    attach(scope, Arc::new(stopwatch))
}

/// The stopwatch attached to `scope`.
pub fn lookup(scope: &Scope) -> Result<Arc<Stopwatch>, StopwatchError> {
    let entry = scope
        .entry(STOPWATCH_KEY)
        .ok_or(StopwatchError::ScopeNotFound)?;
    entry
        .value
        .downcast_ref::<Arc<Stopwatch>>()
        .cloned()
        .ok_or(StopwatchError::BadValue {
            type_name: entry.type_name,
        })
}

pub fn start(scope: &Scope) -> Result<(), StopwatchError> {
    lookup(scope)?.start()
}

pub fn lap(scope: &Scope, name: &str, comment: &str) -> Result<(), StopwatchError> {
    lookup(scope)?.lap(name, comment)
}

pub fn stop(scope: &Scope) -> Result<(), StopwatchError> {
    lookup(scope)?.stop()
}

pub fn report(scope: &Scope) -> Result<Report, StopwatchError> {
    lookup(scope)?.report()
}
