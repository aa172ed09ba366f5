//! Interval halving.

use crate::error::{MathError, MathResult};
use crate::solvers::{SolverConfig, SolverResult};

/// Halves `[a, b]` until the residual or half-width drops below tolerance.
///
/// The end points may be given in either order but must straddle a root.
///
/// ```rust
/// use strata_math::solvers::{bisection, SolverConfig};
///
/// let result = bisection(|x: f64| x * x - 2.0, 2.0, 1.0, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
pub fn bisection<F>(f: F, a: f64, b: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let (mut lo, mut hi) = if a <= b { (a, b) } else { (b, a) };
    let (f_lo, f_hi) = (f(lo), f(hi));
    if !(f_lo * f_hi <= 0.0) {
        return Err(MathError::InvalidBracket {
            a: lo,
            b: hi,
            fa: f_lo,
            fb: f_hi,
        });
    }

    let done = |x: f64, fx: f64, iterations: u32| SolverResult {
        root: x,
        iterations,
        residual: fx,
    };
    for (x, fx) in [(lo, f_lo), (hi, f_hi)] {
        if fx.abs() < config.tolerance {
            return Ok(done(x, fx, 0));
        }
    }

    let lo_positive = f_lo > 0.0;
    for iteration in 1..=config.max_iterations {
        let mid = lo + 0.5 * (hi - lo);
        let f_mid = f(mid);
        if f_mid.abs() < config.tolerance || hi - mid < config.tolerance {
            return Ok(done(mid, f_mid, iteration));
        }
        if (f_mid > 0.0) == lo_positive {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    let mid = lo + 0.5 * (hi - lo);
    Err(MathError::convergence_failed(config.max_iterations, f(mid).abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_cube_root() {
        let result = bisection(|x: f64| x.powi(3) - 5.0, 0.0, 3.0, &SolverConfig::default()).unwrap();
        assert_relative_eq!(result.root, 5.0_f64.cbrt(), epsilon = 1e-9);
        assert!(result.iterations > 0);
    }

    #[test]
    fn test_root_on_end_point() {
        let result = bisection(|x: f64| x - 1.0, 1.0, 4.0, &SolverConfig::default()).unwrap();
        assert_eq!(result.root, 1.0);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_same_sign_rejected() {
        assert!(matches!(
            bisection(|x: f64| x.exp(), -1.0, 1.0, &SolverConfig::default()),
            Err(MathError::InvalidBracket { .. })
        ));
        assert!(bisection(|_| f64::NAN, -1.0, 1.0, &SolverConfig::default()).is_err());
    }

    #[test]
    fn test_iteration_limit() {
        let config = SolverConfig::new(1e-15, 5);
        assert!(matches!(
            bisection(|x: f64| x - 0.3, 0.0, 1.0, &config),
            Err(MathError::ConvergenceFailed { iterations: 5, .. })
        ));
    }
}
