//! Error types for asset valuation and curve construction.

use strata_core::CoreError;
use strata_math::MathError;
use thiserror::Error;

/// A specialized Result type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Error types for curve operations.
#[derive(Error, Debug, Clone)]
pub enum CurveError {
    /// An asset identifier does not follow its family grammar.
    #[error("Malformed asset identifier '{identifier}': {reason}")]
    MalformedIdentifier {
        /// The identifier as supplied.
        identifier: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A metric is not produced by an asset family.
    #[error("Metric {metric} is not supported for {family}")]
    UnsupportedMetric {
        /// Requested metric name.
        metric: String,
        /// Asset family name.
        family: String,
    },

    /// A named pricing structure or quote is absent.
    #[error("Missing market data: {name}")]
    MissingMarketData {
        /// Name of the missing item.
        name: String,
    },

    /// A node could not be solved to tolerance.
    #[error(
        "Bootstrap did not converge for {instrument} after {iterations} iterations (residual: {residual:.2e})"
    )]
    BootstrapNonConvergence {
        /// Identifier of the instrument whose node failed.
        instrument: String,
        /// Iterations attempted.
        iterations: u32,
        /// Final quote-space residual.
        residual: f64,
    },

    /// Query outside the node range of a non-extrapolating structure.
    #[error("Time {t:.6} out of range [{min:.6}, {max:.6}]")]
    OutOfRange {
        /// Requested time in years.
        t: f64,
        /// First node time.
        min: f64,
        /// Last node time.
        max: f64,
    },

    /// Two calibrating instruments share a node date.
    #[error("Duplicate node at {date}: {first} and {second}")]
    DuplicateNode {
        /// The shared node date.
        date: String,
        /// First instrument.
        first: String,
        /// Second instrument.
        second: String,
    },

    /// Structure construction failed validation.
    #[error("Invalid curve: {reason}")]
    InvalidCurve {
        /// Description of the problem.
        reason: String,
    },

    /// A structure of a different kind was found under a name.
    #[error("Structure '{name}' is a {actual}, expected a {expected}")]
    IncompatibleStructure {
        /// Structure name.
        name: String,
        /// Expected kind.
        expected: String,
        /// Kind found.
        actual: String,
    },

    /// A quotation is missing, non-finite or of the wrong unit.
    #[error("Invalid quote: {reason}")]
    InvalidQuote {
        /// Description of the problem.
        reason: String,
    },

    /// Date, calendar or convention error.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Numerical error.
    #[error(transparent)]
    Math(#[from] MathError),
}

impl CurveError {
    /// Creates a malformed identifier error.
    #[must_use]
    pub fn malformed(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedIdentifier {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }

    /// Creates an unsupported metric error.
    #[must_use]
    pub fn unsupported_metric(metric: impl Into<String>, family: impl Into<String>) -> Self {
        Self::UnsupportedMetric {
            metric: metric.into(),
            family: family.into(),
        }
    }

    /// Creates a missing market data error.
    #[must_use]
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingMarketData { name: name.into() }
    }

    /// Creates an out of range error.
    #[must_use]
    pub fn out_of_range(t: f64, min: f64, max: f64) -> Self {
        Self::OutOfRange { t, min, max }
    }

    /// Creates an invalid curve error.
    #[must_use]
    pub fn invalid_curve(reason: impl Into<String>) -> Self {
        Self::InvalidCurve {
            reason: reason.into(),
        }
    }

    /// Creates an invalid quote error.
    #[must_use]
    pub fn invalid_quote(reason: impl Into<String>) -> Self {
        Self::InvalidQuote {
            reason: reason.into(),
        }
    }

    /// Creates an incompatible structure error.
    #[must_use]
    pub fn incompatible(
        name: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::IncompatibleStructure {
            name: name.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}
