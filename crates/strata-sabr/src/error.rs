//! Error types for SABR calibration.

use strata_core::CoreError;
use strata_math::MathError;
use thiserror::Error;

/// A specialized Result type for SABR operations.
pub type SabrResult<T> = Result<T, SabrError>;

/// Errors raised by calibration, grid parsing and the calibration store.
#[derive(Error, Debug, Clone)]
pub enum SabrError {
    /// No engine table is stored under a handle.
    #[error("No calibrated engines under handle '{handle}'")]
    HandleNotFound {
        /// The handle queried.
        handle: String,
    },

    /// No calibration settings are stored under a handle.
    #[error("No calibration settings under handle '{handle}'")]
    SettingsNotFound {
        /// The settings handle queried.
        handle: String,
    },

    /// A handle has no engine for an expiry/tenor pair.
    #[error("Handle '{handle}' has no engine for expiry {expiry}, tenor {tenor}")]
    ExpiryTenorNotFound {
        /// The handle queried.
        handle: String,
        /// Normalised expiry label.
        expiry: String,
        /// Normalised tenor label.
        tenor: String,
    },

    /// An engine exists but its alpha solve failed.
    #[error("Engine for expiry {expiry}, tenor {tenor} is not calibrated")]
    NotCalibrated {
        /// Normalised expiry label.
        expiry: String,
        /// Normalised tenor label.
        tenor: String,
    },

    /// A model parameter or market input is outside its domain.
    #[error("Invalid SABR parameter {name} = {value}: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Value supplied.
        value: f64,
        /// Constraint violated.
        reason: String,
    },

    /// A volatility or asset grid could not be read.
    #[error("Invalid grid: {reason}")]
    InvalidGrid {
        /// Description of the problem.
        reason: String,
    },

    /// An expiry or tenor label could not be parsed.
    #[error("Invalid expiry/tenor label '{label}'")]
    InvalidLabel {
        /// The label as supplied.
        label: String,
    },

    /// A smile has no interior strike close to the forward.
    #[error("No interior ATM strike in smile for expiry {expiry}, tenor {tenor}")]
    AtmStrikeMissing {
        /// Normalised expiry label.
        expiry: String,
        /// Normalised tenor label.
        tenor: String,
    },

    /// Currency or other core parsing error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Numerical error.
    #[error(transparent)]
    Math(#[from] MathError),
}

impl SabrError {
    /// Creates a handle not found error.
    #[must_use]
    pub fn handle_not_found(handle: impl Into<String>) -> Self {
        Self::HandleNotFound {
            handle: handle.into(),
        }
    }

    /// Creates a settings not found error.
    #[must_use]
    pub fn settings_not_found(handle: impl Into<String>) -> Self {
        Self::SettingsNotFound {
            handle: handle.into(),
        }
    }

    /// Creates an expiry/tenor not found error.
    #[must_use]
    pub fn expiry_tenor_not_found(
        handle: impl Into<String>,
        expiry: impl ToString,
        tenor: impl ToString,
    ) -> Self {
        Self::ExpiryTenorNotFound {
            handle: handle.into(),
            expiry: expiry.to_string(),
            tenor: tenor.to_string(),
        }
    }

    /// Creates an invalid parameter error.
    #[must_use]
    pub fn invalid_parameter(name: impl Into<String>, value: f64, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            value,
            reason: reason.into(),
        }
    }

    /// Creates an invalid grid error.
    #[must_use]
    pub fn invalid_grid(reason: impl Into<String>) -> Self {
        Self::InvalidGrid {
            reason: reason.into(),
        }
    }

    /// Creates an invalid label error.
    #[must_use]
    pub fn invalid_label(label: impl Into<String>) -> Self {
        Self::InvalidLabel {
            label: label.into(),
        }
    }
}
