//! Error types for core date and convention handling.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by dates, tenors and conventions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Invalid or out-of-range calendar date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// A tenor string that could not be parsed.
    #[error("Invalid tenor '{tenor}': {reason}")]
    InvalidTenor {
        /// The offending tenor text.
        tenor: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Unknown convention name.
    #[error("Unknown {kind} convention: {name}")]
    UnknownConvention {
        /// Convention family (e.g. "day count").
        kind: &'static str,
        /// The unrecognised name.
        name: String,
    },
}

impl CoreError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid tenor error.
    #[must_use]
    pub fn invalid_tenor(tenor: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTenor {
            tenor: tenor.into(),
            reason: reason.into(),
        }
    }
}
