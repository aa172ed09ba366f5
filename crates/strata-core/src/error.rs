//! Error types for the core crate.

use thiserror::Error;

/// A specialized Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while building dates, tenors, codes and calendars.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Invalid or out-of-range date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// A tenor/period string could not be parsed.
    #[error("Invalid period '{input}': {reason}")]
    InvalidPeriod {
        /// The offending input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A futures expiry code could not be parsed.
    #[error("Invalid futures code '{code}': {reason}")]
    InvalidFuturesCode {
        /// The offending code.
        code: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Not a three-letter ISO currency (or six-letter pair).
    #[error("Invalid currency code '{code}'")]
    InvalidCurrency {
        /// The offending code.
        code: String,
    },

    /// Unknown day count name.
    #[error("Unknown day count convention '{name}'")]
    UnknownDayCount {
        /// The unrecognised name.
        name: String,
    },

    /// Unknown business day convention name.
    #[error("Unknown business day convention '{name}'")]
    UnknownBusinessDayConvention {
        /// The unrecognised name.
        name: String,
    },

    /// Calendar or schedule error.
    #[error("Calendar error: {reason}")]
    Calendar {
        /// Description of the error.
        reason: String,
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

    /// Creates an invalid period error.
    #[must_use]
    pub fn invalid_period(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPeriod {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid futures code error.
    #[must_use]
    pub fn invalid_futures_code(code: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidFuturesCode {
            code: code.into(),
            reason: reason.into(),
        }
    }

    /// Creates a calendar error.
    #[must_use]
    pub fn calendar(reason: impl Into<String>) -> Self {
        Self::Calendar {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::invalid_period("3Q", "unknown unit 'Q'");
        assert_eq!(err.to_string(), "Invalid period '3Q': unknown unit 'Q'");

        let err = CoreError::invalid_futures_code("A9", "unknown month letter");
        assert!(err.to_string().contains("A9"));
    }
}
