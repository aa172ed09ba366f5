//! Errors from solvers, interpolators and optimizers.

use thiserror::Error;

/// Result alias for numerical routines.
pub type MathResult<T> = Result<T, MathError>;

/// Numerical failure.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Iteration budget exhausted before the tolerance was met.
    #[error("No convergence in {iterations} iterations, residual {residual:.3e}")]
    ConvergenceFailed {
        /// Iterations used.
        iterations: u32,
        /// Residual at the last iterate.
        residual: f64,
    },

    /// The end points do not straddle a root.
    #[error("[{a}, {b}] does not bracket a root: f(a) = {fa:.3e}, f(b) = {fb:.3e}")]
    InvalidBracket {
        /// Left end point.
        a: f64,
        /// Right end point.
        b: f64,
        /// Function value at `a`.
        fa: f64,
        /// Function value at `b`.
        fb: f64,
    },

    /// A derivative or denominator vanished.
    #[error("Vanishing denominator {value:.3e}")]
    DivisionByZero {
        /// Offending value.
        value: f64,
    },

    /// Query outside the node range of an interpolator built without extrapolation.
    #[error("{x} lies outside [{min}, {max}]")]
    ExtrapolationNotAllowed {
        /// Query.
        x: f64,
        /// First node.
        min: f64,
        /// Last node.
        max: f64,
    },

    /// Too few points.
    #[error("Need {required} points, got {actual}")]
    InsufficientData {
        /// Minimum.
        required: usize,
        /// Supplied.
        actual: usize,
    },

    /// Anything else wrong with the arguments.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description.
        reason: String,
    },
}

impl MathError {
    /// Budget exhausted.
    #[must_use]
    pub fn convergence_failed(iterations: u32, residual: f64) -> Self {
        Self::ConvergenceFailed { iterations, residual }
    }

    /// Bad arguments.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Too few points.
    #[must_use]
    pub fn insufficient_data(required: usize, actual: usize) -> Self {
        Self::InsufficientData { required, actual }
    }

    /// True for failures a wider bracket or another starting point may fix.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConvergenceFailed { .. } | Self::InvalidBracket { .. } | Self::DivisionByZero { .. }
        )
    }
}
