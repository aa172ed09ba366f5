//! Newton first, Brent when Newton gives up.

use crate::error::{MathError, MathResult};
use crate::solvers::{brent, expand_bracket, BracketDirection, SolverConfig, SolverResult};

const MAX_DIVERGENT_STEPS: u32 = 3;
const NEWTON_ITERATION_CAP: u32 = 20;
const BRACKET_EXPANSION_FACTOR: f64 = 2.0;
const MAX_BRACKET_EXPANSIONS: u32 = 40;

/// Newton-Raphson from `initial_guess`, then Brent if Newton fails.
///
/// Brent runs on `bounds` widened geometrically until they straddle a root,
/// or without bounds on an interval found by stepping out from the guess.
/// Newton gets at most 20 iterations.
///
/// ```rust
/// use strata_math::solvers::{hybrid, SolverConfig};
///
/// let f = |x: f64| x * x * x - x - 2.0;
/// let df = |x: f64| 3.0 * x * x - 1.0;
/// let result = hybrid(f, df, 1.5, Some((1.0, 2.0)), &SolverConfig::default()).unwrap();
/// assert!(f(result.root).abs() < 1e-10);
/// ```
pub fn hybrid<F, DF>(
    f: F,
    df: DF,
    initial_guess: f64,
    bounds: Option<(f64, f64)>,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    match newton(&f, &df, initial_guess, bounds, config) {
        Ok(result) => return Ok(result),
        Err(e) => log::debug!("newton from {initial_guess} gave up: {e}"),
    }

    let (a, b) = match bounds {
        Some((a, b)) => expand_bracket(
            &f,
            a.min(b),
            a.max(b),
            BracketDirection::Both,
            BRACKET_EXPANSION_FACTOR,
            MAX_BRACKET_EXPANSIONS,
        )?,
        None => find_bracket(&f, initial_guess)
            .ok_or_else(|| MathError::invalid_input(format!("no sign change found around {initial_guess}")))?,
    };

    let mut result = brent(&f, a, b, config)?;
    result.iterations += NEWTON_ITERATION_CAP.min(config.max_iterations);
    Ok(result)
}

/// Newton iterate that gives up early so the caller can bracket instead.
///
/// Fails on a non-finite value, a flat derivative, three successive
/// residual doublings, or a step landing more than one bound-width outside
/// `bounds`.
fn newton<F, DF>(
    f: &F,
    df: &DF,
    initial_guess: f64,
    bounds: Option<(f64, f64)>,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    let domain = bounds.map(|(a, b)| {
        let width = (b - a).abs();
        (a.min(b) - width, a.max(b) + width)
    });
    let budget = config.max_iterations.min(NEWTON_ITERATION_CAP);

    let mut x = initial_guess;
    let mut fx = f(x);
    let mut growth = 0;

    for iteration in 0..budget {
        if !fx.is_finite() {
            return Err(MathError::invalid_input(format!("non-finite residual at {x}")));
        }
        if fx.abs() < config.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration,
                residual: fx,
            });
        }

        let slope = df(x);
        if !slope.is_finite() || slope.abs() < 1e-15 {
            return Err(MathError::DivisionByZero { value: slope });
        }
        let step = fx / slope;
        let next = x - step;
        if let Some((lo, hi)) = domain {
            if !(lo..=hi).contains(&next) {
                return Err(MathError::invalid_input(format!("Newton step to {next} left [{lo}, {hi}]")));
            }
        }

        let f_next = f(next);
        growth = if f_next.abs() > 2.0 * fx.abs() { growth + 1 } else { 0 };
        if growth >= MAX_DIVERGENT_STEPS {
            return Err(MathError::invalid_input("Newton iterates diverging"));
        }
        if f_next.abs() < config.tolerance || (step.abs() < config.tolerance && f_next.abs() <= fx.abs()) {
            return Ok(SolverResult {
                root: next,
                iterations: iteration + 1,
                residual: f_next,
            });
        }
        x = next;
        fx = f_next;
    }

    Err(MathError::convergence_failed(budget, fx.abs()))
}

/// Walks outward from `guess` in doubling steps until the sign changes.
fn find_bracket<F>(f: &F, guess: f64) -> Option<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    let f_guess = f(guess);
    let mut delta = (0.1 * guess.abs()).max(0.1);
    while delta <= 1e6 {
        let (left, right) = (guess - delta, guess + delta);
        let (f_left, f_right) = (f(left), f(right));
        if f_left * f_guess < 0.0 {
            return Some((left, guess));
        }
        if f_right * f_guess < 0.0 {
            return Some((guess, right));
        }
        if f_left * f_right < 0.0 {
            return Some((left, right));
        }
        delta *= 2.0;
    }
    None
}

/// Hybrid solver with a central-difference derivative.
pub fn hybrid_numerical<F>(
    f: F,
    initial_guess: f64,
    bounds: Option<(f64, f64)>,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let df = |x: f64| {
        let h = 1e-7 * x.abs().max(1e-2);
        (f(x + h) - f(x - h)) / (2.0 * h)
    };

    hybrid(&f, df, initial_guess, bounds, config)
}
