//! Hagan lognormal volatility and the ATM alpha solve.
//!
//! With `λ = (F K)^((1-β)/2)` and `m = ln(F/K)`:
//!
//! ```text
//! z     = ν/α · λ · m
//! x(z)  = ln((√(1 - 2ρz + z²) + z - ρ) / (1 - ρ))
//! σ(K)  = α / (λ · (1 + (1-β)² m²/24 + (1-β)⁴ m⁴/1920)) · z/x(z)
//!         · (1 + ((1-β)² α²/(24 λ²) + ρβνα/(4λ) + ν²(2 - 3ρ²)/24) · T)
//! ```
//!
//! At the money `σ(F)` is a cubic in alpha, solved by Brent on an upward
//! expanding bracket.

use strata_config::SabrConfig;
use strata_math::solvers::{brent, expand_bracket, BracketDirection, SolverConfig};

use crate::error::SabrResult;
use crate::parameters::{validate_beta, validate_market};

const ALPHA_MAX_ITERATIONS: u32 = 200;

/// Hagan et al. lognormal implied volatility.
///
/// No domain checks; callers validate forward, strike and parameters.
#[must_use]
pub fn hagan_volatility(
    alpha: f64,
    beta: f64,
    nu: f64,
    rho: f64,
    forward: f64,
    strike: f64,
    expiry: f64,
) -> f64 {
    let omb = 1.0 - beta;
    let lambda = (forward * strike).powf(omb / 2.0);
    let log_moneyness = (forward / strike).ln();

    let z = nu / alpha * lambda * log_moneyness;
    let x = ((z - rho + (1.0 - 2.0 * rho * z + z * z).sqrt()) / (1.0 - rho)).ln();
    let multiplier = if x.abs() > f64::MIN_POSITIVE * f64::EPSILON {
        z / x
    } else {
        1.0
    };

    let m2 = log_moneyness * log_moneyness;
    let omb2 = omb * omb;
    let denominator = (1.0 + omb2 * m2 / 24.0 + omb2 * omb2 * m2 * m2 / 1920.0) * lambda;
    let leading = alpha / denominator * multiplier;

    let c = omb2 * alpha * alpha / (24.0 * lambda * lambda);
    let d = rho * beta * nu * alpha / (4.0 * lambda);
    let e = nu * nu * (2.0 - 3.0 * rho * rho) / 24.0;
    leading * (1.0 + (c + d + e) * expiry)
}

/// Solves alpha so that the ATM volatility equals `atm_vol`.
///
/// Brackets from `[min(1e-5, α₀/2), 2α₀]` with `α₀ = σ_ATM F^(1-β)`, widening
/// the upper bound by `alpha_bracket_factor` up to `alpha_bracket_expansions`
/// times.
pub fn atm_alpha(
    atm_vol: f64,
    forward: f64,
    expiry: f64,
    beta: f64,
    nu: f64,
    rho: f64,
    config: &SabrConfig,
) -> SabrResult<f64> {
    validate_market(forward, forward, expiry)?;
    validate_beta(beta)?;

    let omb = 1.0 - beta;
    let f_omb = forward.powf(omb);
    let cubic = omb * omb * expiry / (24.0 * forward.powf(2.0 - 2.0 * beta));
    let quadratic = rho * beta * nu * expiry / (4.0 * f_omb);
    let linear = 1.0 + nu * nu / 24.0 * (2.0 - 3.0 * rho * rho) * expiry;
    let target = atm_vol * f_omb;

    let f = |a: f64| cubic * a * a * a + quadratic * a * a + linear * a - target;

    let guess = atm_vol * f_omb;
    let lo = 1e-5_f64.min(guess / 2.0);
    let hi = 2.0 * guess;
    let (lo, hi) = expand_bracket(
        f,
        lo,
        hi,
        BracketDirection::Upper,
        config.alpha_bracket_factor,
        config.alpha_bracket_expansions,
    )?;
    let solved = brent(
        f,
        lo,
        hi,
        &SolverConfig::new(config.alpha_tolerance, ALPHA_MAX_ITERATIONS),
    )?;
    Ok(solved.root)
}
