//! Bracket expansion for positive-valued unknowns.

use crate::error::{MathError, MathResult};

/// Which end of a bracket to move while searching for a sign change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketDirection {
    /// Multiply the upper bound by the factor.
    Upper,
    /// Divide the lower bound by the factor.
    Lower,
    /// Move both ends.
    Both,
}

/// Expands `[lo, hi]` geometrically until `f` changes sign across it.
///
/// Intended for strictly positive unknowns (discount factors, index levels,
/// SABR alpha): the lower bound is divided rather than shifted so it never
/// crosses zero. Returns the first bracket found, or
/// [`MathError::InvalidBracket`] with the last interval tried.
///
/// # Example
///
/// ```rust
/// use strata_math::solvers::{expand_bracket, BracketDirection};
///
/// let f = |x: f64| x - 10.0;
/// let (lo, hi) = expand_bracket(f, 0.5, 1.0, BracketDirection::Upper, 1.6, 50).unwrap();
/// assert!(lo <= 10.0 && hi >= 10.0);
/// ```
pub fn expand_bracket<F>(
    f: F,
    lo: f64,
    hi: f64,
    direction: BracketDirection,
    factor: f64,
    max_expansions: u32,
) -> MathResult<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    if !(factor > 1.0) {
        return Err(MathError::invalid_input(format!(
            "bracket expansion factor must exceed 1, got {factor}"
        )));
    }
    if lo >= hi {
        return Err(MathError::invalid_input(format!(
            "bracket lower bound {lo} must be below upper bound {hi}"
        )));
    }

    let mut lo = lo;
    let mut hi = hi;
    let mut f_lo = f(lo);
    let mut f_hi = f(hi);

    for _ in 0..=max_expansions {
        if f_lo * f_hi <= 0.0 && !f_lo.is_nan() && !f_hi.is_nan() {
            return Ok((lo, hi));
        }
        match direction {
            BracketDirection::Upper => {
                hi *= factor;
                f_hi = f(hi);
            }
            BracketDirection::Lower => {
                lo /= factor;
                f_lo = f(lo);
            }
            BracketDirection::Both => {
                lo /= factor;
                hi *= factor;
                f_lo = f(lo);
                f_hi = f(hi);
            }
        }
    }

    Err(MathError::InvalidBracket {
        a: lo,
        b: hi,
        fa: f_lo,
        fb: f_hi,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_already_bracketed() {
        let f = |x: f64| x - 1.5;
        assert_eq!(
            expand_bracket(f, 1.0, 2.0, BracketDirection::Both, 2.0, 10).unwrap(),
            (1.0, 2.0)
        );
    }

    #[test]
    fn test_expand_lower() {
        let f = |x: f64| x - 0.01;
        let (lo, hi) = expand_bracket(f, 0.5, 1.0, BracketDirection::Lower, 2.0, 20).unwrap();
        assert!(lo < 0.01);
        assert!((hi - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_gives_up() {
        let f = |x: f64| x * x + 1.0;
        assert!(matches!(
            expand_bracket(f, 0.5, 1.0, BracketDirection::Both, 1.6, 5),
            Err(MathError::InvalidBracket { .. })
        ));
    }

    #[test]
    fn test_rejects_bad_factor() {
        let f = |x: f64| x;
        assert!(expand_bracket(f, 0.5, 1.0, BracketDirection::Upper, 1.0, 5).is_err());
    }
}
