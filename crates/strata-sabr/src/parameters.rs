//! SABR model parameters.

use serde::{Deserialize, Serialize};

use crate::error::{SabrError, SabrResult};
use crate::volatility::hagan_volatility;

/// Parameters of the SABR model `dF = α F^β dW₁`, `dα = ν α dW₂`,
/// `d⟨W₁, W₂⟩ = ρ dt`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SabrParameters {
    alpha: f64,
    beta: f64,
    nu: f64,
    rho: f64,
}

impl SabrParameters {
    /// Creates a validated parameter set.
    ///
    /// Requires `alpha > 0`, `0 <= beta <= 1`, `nu >= 0` and `|rho| < 1`.
    pub fn new(alpha: f64, beta: f64, nu: f64, rho: f64) -> SabrResult<Self> {
        if !(alpha > 0.0 && alpha.is_finite()) {
            return Err(SabrError::invalid_parameter("alpha", alpha, "must be positive"));
        }
        validate_beta(beta)?;
        if !(nu >= 0.0 && nu.is_finite()) {
            return Err(SabrError::invalid_parameter("nu", nu, "must be non-negative"));
        }
        if !(rho > -1.0 && rho < 1.0) {
            return Err(SabrError::invalid_parameter("rho", rho, "must lie in (-1, 1)"));
        }
        Ok(Self {
            alpha,
            beta,
            nu,
            rho,
        })
    }

    /// Initial volatility level.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// CEV exponent.
    #[must_use]
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Volatility of volatility.
    #[must_use]
    pub fn nu(&self) -> f64 {
        self.nu
    }

    /// Forward/volatility correlation.
    #[must_use]
    pub fn rho(&self) -> f64 {
        self.rho
    }

    /// Lognormal implied volatility at `strike` for a forward and expiry in years.
    pub fn implied_volatility(&self, forward: f64, strike: f64, expiry: f64) -> SabrResult<f64> {
        validate_market(forward, strike, expiry)?;
        Ok(hagan_volatility(
            self.alpha, self.beta, self.nu, self.rho, forward, strike, expiry,
        ))
    }
}

pub(crate) fn validate_beta(beta: f64) -> SabrResult<()> {
    if (0.0..=1.0).contains(&beta) {
        Ok(())
    } else {
        Err(SabrError::invalid_parameter("beta", beta, "must lie in [0, 1]"))
    }
}

pub(crate) fn validate_market(forward: f64, strike: f64, expiry: f64) -> SabrResult<()> {
    if !(forward > 0.0 && forward.is_finite()) {
        return Err(SabrError::invalid_parameter("forward", forward, "must be positive"));
    }
    if !(strike > 0.0 && strike.is_finite()) {
        return Err(SabrError::invalid_parameter("strike", strike, "must be positive"));
    }
    if !(expiry >= 0.0 && expiry.is_finite()) {
        return Err(SabrError::invalid_parameter("expiry", expiry, "must be non-negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid() {
        let p = SabrParameters::new(0.2, 1.0, 0.5, -0.3).unwrap();
        assert_eq!(p.alpha(), 0.2);
        assert_eq!(p.rho(), -0.3);
    }

    #[test]
    fn test_domain() {
        assert!(SabrParameters::new(0.0, 1.0, 0.5, 0.0).is_err());
        assert!(SabrParameters::new(0.2, 1.1, 0.5, 0.0).is_err());
        assert!(SabrParameters::new(0.2, 0.5, -0.1, 0.0).is_err());
        assert!(SabrParameters::new(0.2, 0.5, 0.1, 1.0).is_err());
        assert!(SabrParameters::new(0.2, 0.5, 0.1, f64::NAN).is_err());
    }

    #[test]
    fn test_market_inputs() {
        let p = SabrParameters::new(0.2, 1.0, 0.5, -0.3).unwrap();
        assert!(p.implied_volatility(0.03, -0.01, 1.0).is_err());
        assert!(p.implied_volatility(0.0, 0.03, 1.0).is_err());
        assert!(p.implied_volatility(0.03, 0.03, 1.0).is_ok());
    }
}
