//! Errors surfaced by stopwatch and scope operations.

use sw_core::LedgerError;
use thiserror::Error;

/// Stopwatch errors.
///
/// Every variant is a usage error. Retrying the same call will fail the same
/// way.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StopwatchError {
    /// A lifecycle or lookup error from the underlying ledger.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// No stopwatch is attached to the scope.
    #[error("no stopwatch found in scope")]
    ScopeNotFound,

    /// The scope's stopwatch slot holds some other type.
    #[error("found unexpected type in scope: {type_name}")]
    BadValue { type_name: &'static str },
}

/// The kind of a [`StopwatchError`], without its context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    AlreadyStarted,
    AlreadyStopped,
    NotStarted,
    NotStopped,
    UnknownKey,
    ScopeNotFound,
    BadValue,
}

impl StopwatchError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Ledger(err) => match err {
                LedgerError::AlreadyStarted { .. } => ErrorKind::AlreadyStarted,
                LedgerError::AlreadyStopped { .. } => ErrorKind::AlreadyStopped,
                LedgerError::NotStarted { .. } => ErrorKind::NotStarted,
                LedgerError::NotStopped { .. } => ErrorKind::NotStopped,
                LedgerError::UnknownKey { .. } => ErrorKind::UnknownKey,
            },
            Self::ScopeNotFound => ErrorKind::ScopeNotFound,
            Self::BadValue { .. } => ErrorKind::BadValue,
        }
    }
}
