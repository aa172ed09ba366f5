//! One-dimensional root finders.
//!
//! Curve bootstrapping repricing oracles have no analytic derivative, so node
//! solves go through [`hybrid_numerical`]. SABR alpha solves run [`brent`] on
//! a bracket from [`expand_bracket`]. [`bisection`] is the slow fallback for
//! callers that already hold a bracket.
//!
//! ```rust
//! use strata_math::solvers::{hybrid_numerical, SolverConfig};
//!
//! // 6m discount factor for a 5% simple rate
//! let f = |df: f64| (1.0 / df - 1.0) / 0.5 - 0.05;
//! let result = hybrid_numerical(f, 0.99, Some((0.5, 1.0)), &SolverConfig::default()).unwrap();
//! assert!((result.root - 1.0 / 1.025).abs() < 1e-10);
//! ```

mod bisection;
mod bracket;
mod brent;
mod hybrid;

pub use bisection::bisection;
pub use bracket::{expand_bracket, BracketDirection};
pub use brent::brent;
pub use hybrid::{hybrid, hybrid_numerical};

/// Stopping rule shared by all root finders.
///
/// `tolerance` bounds both the residual and the last step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Residual and step tolerance.
    pub tolerance: f64,
    /// Iteration budget.
    pub max_iterations: u32,
}

impl SolverConfig {
    /// `1e-10`.
    pub const DEFAULT_TOLERANCE: f64 = 1e-10;
    /// `100`.
    pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

    /// Config from both limits.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TOLERANCE, Self::DEFAULT_MAX_ITERATIONS)
    }
}

/// A converged root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverResult {
    /// Abscissa.
    pub root: f64,
    /// Function evaluations counted as iterations.
    pub iterations: u32,
    /// `f(root)`.
    pub residual: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Dirty price of an annual-coupon bond at a flat yield.
    fn price(y: f64, coupon: f64, years: i32) -> f64 {
        (1..=years).map(|t| coupon / (1.0 + y).powi(t)).sum::<f64>() + 100.0 / (1.0 + y).powi(years)
    }

    #[test]
    fn test_solvers_agree() {
        let f = |y: f64| price(y, 6.0, 7) - 98.0;
        let config = SolverConfig::default();

        let b = bisection(f, 0.0, 0.2, &config).unwrap();
        let r = brent(f, 0.0, 0.2, &config).unwrap();
        let h = hybrid_numerical(f, 0.06, None, &config).unwrap();

        assert_relative_eq!(b.root, r.root, epsilon = 1e-8);
        assert_relative_eq!(h.root, r.root, epsilon = 1e-8);
        assert!(r.root > 0.06);
    }

    #[test]
    fn test_par_yield() {
        let f = |y: f64| price(y, 5.0, 10) - 100.0;
        let result = hybrid_numerical(f, 0.04, Some((0.0, 0.2)), &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, 0.05, epsilon = 1e-10);
    }

    #[test]
    fn test_default() {
        let config = SolverConfig::default();
        assert_eq!(config.max_iterations, 100);
        assert_relative_eq!(config.tolerance, 1e-10);
    }
}
