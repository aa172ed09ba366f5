//! Brent's root-finding algorithm.

use crate::error::{MathError, MathResult};
use crate::solvers::{SolverConfig, SolverResult};

/// Brent-Dekker root finding on `[a, b]`.
///
/// Inverse quadratic interpolation and secant steps, falling back to
/// bisection whenever the interpolated step leaves the bracket or shrinks
/// too slowly. Requires `f(a) * f(b) <= 0`.
///
/// Stops when `|f(b)| < tolerance` or the bracket half-width falls below
/// `tolerance / 2` (plus machine precision relative to `b`).
///
/// # Example
///
/// ```rust
/// use strata_math::solvers::{brent, SolverConfig};
///
/// let f = |x: f64| x * x * x - x - 2.0;
/// let result = brent(f, 1.0, 2.0, &SolverConfig::default()).unwrap();
/// assert!(f(result.root).abs() < 1e-10);
/// ```
pub fn brent<F>(f: F, a: f64, b: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let mut a = a;
    let mut b = b;
    let mut fa = f(a);
    let mut fb = f(b);

    if fa * fb > 0.0 || fa.is_nan() || fb.is_nan() {
        return Err(MathError::InvalidBracket { a, b, fa, fb });
    }
    if fa == 0.0 {
        return Ok(SolverResult {
            root: a,
            iterations: 0,
            residual: 0.0,
        });
    }

    let mut c = b;
    let mut fc = fb;
    let mut d = 0.0_f64;
    let mut e = 0.0_f64;

    for iteration in 0..config.max_iterations {
        if fb * fc > 0.0 {
            // root lies in [a, b]; reset the contrapoint
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol1 = 2.0 * f64::EPSILON * b.abs() + 0.5 * config.tolerance;
        let xm = 0.5 * (c - b);

        if fb.abs() < config.tolerance || xm.abs() <= tol1 {
            return Ok(SolverResult {
                root: b,
                iterations: iteration,
                residual: fb,
            });
        }

        if e.abs() >= tol1 && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                // secant
                (2.0 * xm * s, 1.0 - s)
            } else {
                // inverse quadratic
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * xm * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();

            let min1 = 3.0 * xm * q - (tol1 * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol1 { d } else { tol1.copysign(xm) };
        fb = f(b);
    }

    Err(MathError::convergence_failed(config.max_iterations, fb.abs()))
}
