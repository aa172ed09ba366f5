//! Calibrated SABR engine for one (expiry, tenor) pair.
//!
//! Three calibration modes produce a [`SabrEngine`]:
//!
//! - **ATM**: nu and rho are given, alpha is solved from the ATM vol.
//! - **Full**: alpha, nu and rho are fitted to a smile. The fit runs
//!   Nelder-Mead over `(θ, μ)` with `ρ = cos θ` and `ν = μ²`, re-solving
//!   alpha from the ATM vol at every step. A non-converged fit is retried
//!   from the best points of a Halton search over `(ν, ρ) ∈ [0, 1] × [-1, 1]`.
//! - **Interpolated**: nu and rho are read off a [`ParameterSurface`] of
//!   existing engines, alpha is solved from the ATM vol.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use strata_config::SabrConfig;
use strata_math::optimization::{nelder_mead, NelderMeadConfig, OptimizationResult};
use strata_math::sequences::Halton;

use crate::error::{SabrError, SabrResult};
use crate::label::TermLabel;
use crate::parameters::{validate_beta, validate_market, SabrParameters};
use crate::surface::ParameterSurface;
use crate::volatility::{atm_alpha, hagan_volatility};

/// How an engine's parameters were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalibrationMode {
    /// Alpha from the ATM vol, nu and rho supplied.
    Atm,
    /// Alpha, nu and rho fitted to a smile.
    Full,
    /// Nu and rho interpolated from other engines, alpha from the ATM vol.
    Interpolated,
}

/// ATM inputs for one (expiry, tenor) pair, in decimal units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtmQuote {
    /// Option expiry.
    pub expiry: TermLabel,
    /// Underlying swap tenor.
    pub tenor: TermLabel,
    /// Volatility of volatility.
    pub nu: f64,
    /// Correlation.
    pub rho: f64,
    /// ATM lognormal volatility.
    pub atm_vol: f64,
    /// Forward level of the underlying.
    pub forward: f64,
}

/// A quoted smile for one (expiry, tenor) pair, in decimal units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmileQuote {
    /// Option expiry.
    pub expiry: TermLabel,
    /// Underlying swap tenor.
    pub tenor: TermLabel,
    /// Forward level of the underlying.
    pub forward: f64,
    /// Absolute strikes.
    pub strikes: Vec<f64>,
    /// Lognormal volatilities, one per strike.
    pub vols: Vec<f64>,
}

/// SABR parameters calibrated for one (expiry, tenor) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SabrEngine {
    expiry: TermLabel,
    tenor: TermLabel,
    mode: CalibrationMode,
    forward: f64,
    parameters: SabrParameters,
    calibrated: bool,
    calibration_error: f64,
}

impl SabrEngine {
    /// Solves alpha from the ATM vol with nu and rho held fixed.
    ///
    /// If no alpha bracket is found the engine is kept with
    /// `alpha = σ_ATM F^(1-β)` and marked as not calibrated.
    pub fn calibrate_atm(quote: &AtmQuote, beta: f64, config: &SabrConfig) -> SabrResult<Self> {
        let expiry = quote.expiry.year_fraction();
        validate_market(quote.forward, quote.forward, expiry)?;
        if !(quote.atm_vol > 0.0) {
            return Err(SabrError::invalid_parameter(
                "atm_vol",
                quote.atm_vol,
                "must be positive",
            ));
        }

        let (alpha, calibrated) = match atm_alpha(
            quote.atm_vol,
            quote.forward,
            expiry,
            beta,
            quote.nu,
            quote.rho,
            config,
        ) {
            Ok(alpha) => (alpha, true),
            Err(SabrError::Math(e)) if e.is_retryable() => {
                warn!(
                    "ATM alpha solve failed for {}x{}: {e}",
                    quote.expiry, quote.tenor
                );
                (quote.atm_vol * quote.forward.powf(1.0 - beta), false)
            }
            Err(e) => return Err(e),
        };
        let parameters = SabrParameters::new(alpha, beta, quote.nu, quote.rho)?;

        Ok(Self {
            expiry: quote.expiry,
            tenor: quote.tenor,
            mode: CalibrationMode::Atm,
            forward: quote.forward,
            parameters,
            calibrated,
            calibration_error: 0.0,
        })
    }

    /// Fits alpha, nu and rho to a quoted smile.
    pub fn calibrate_smile(smile: &SmileQuote, beta: f64, config: &SabrConfig) -> SabrResult<Self> {
        validate_beta(beta)?;
        let fit = SmileFit::new(smile, beta, config)?;

        debug!(
            "fitting {}x{} smile with {} strikes, forward {:.6}",
            smile.expiry,
            smile.tenor,
            smile.strikes.len(),
            smile.forward
        );
        let mut best = fit.optimize(&fit.seed())?;
        if !best.converged {
            warn!(
                "{}x{} fit did not converge after {} iterations, running Halton search",
                smile.expiry, smile.tenor, best.iterations
            );
            let enhanced = fit.enhanced_search()?;
            if enhanced.converged || enhanced.objective_value < best.objective_value {
                best = enhanced;
            }
        }

        let (alpha, rho, nu) = fit.parameters(&best.parameters);
        let (alpha, calibrated) = match alpha {
            Some(alpha) => (alpha, true),
            None => (fit.atm_vol * smile.forward.powf(1.0 - beta), false),
        };
        let parameters = SabrParameters::new(alpha, beta, nu, rho)?;
        debug!(
            "{}x{} calibrated: alpha {alpha:.6}, rho {rho:.6}, nu {nu:.6}, error {:.3e}",
            smile.expiry, smile.tenor, best.objective_value
        );

        Ok(Self {
            expiry: smile.expiry,
            tenor: smile.tenor,
            mode: CalibrationMode::Full,
            forward: smile.forward,
            parameters,
            calibrated,
            calibration_error: best.objective_value,
        })
    }

    /// Takes nu and rho from a surface of calibrated engines and solves
    /// alpha from the ATM vol.
    pub fn calibrate_interpolated(
        surface: &ParameterSurface,
        expiry: TermLabel,
        tenor: TermLabel,
        atm_vol: f64,
        forward: f64,
        config: &SabrConfig,
    ) -> SabrResult<Self> {
        let (nu, rho) = surface.nu_rho(expiry.year_fraction(), tenor.year_fraction())?;
        let quote = AtmQuote {
            expiry,
            tenor,
            nu,
            rho,
            atm_vol,
            forward,
        };
        let mut engine = Self::calibrate_atm(&quote, surface.beta(), config)?;
        engine.mode = CalibrationMode::Interpolated;
        Ok(engine)
    }

    /// Implied volatility at `strike` using the calibration forward.
    pub fn implied_volatility(&self, strike: f64) -> SabrResult<f64> {
        self.implied_volatility_at(self.forward, strike)
    }

    /// Implied volatility at `strike` for a different forward level.
    pub fn implied_volatility_at(&self, forward: f64, strike: f64) -> SabrResult<f64> {
        if !self.calibrated {
            return Err(SabrError::NotCalibrated {
                expiry: self.expiry.to_string(),
                tenor: self.tenor.to_string(),
            });
        }
        self.parameters
            .implied_volatility(forward, strike, self.expiry_years())
    }

    /// Implied volatilities for a batch of strikes.
    pub fn implied_volatilities(&self, forward: f64, strikes: &[f64]) -> SabrResult<Vec<f64>> {
        strikes
            .iter()
            .map(|&k| self.implied_volatility_at(forward, k))
            .collect()
    }

    /// Option expiry.
    #[must_use]
    pub fn expiry(&self) -> TermLabel {
        self.expiry
    }

    /// Swap tenor.
    #[must_use]
    pub fn tenor(&self) -> TermLabel {
        self.tenor
    }

    /// Expiry in years.
    #[must_use]
    pub fn expiry_years(&self) -> f64 {
        self.expiry.year_fraction()
    }

    /// Calibration mode.
    #[must_use]
    pub fn mode(&self) -> CalibrationMode {
        self.mode
    }

    /// Forward level used at calibration.
    #[must_use]
    pub fn forward(&self) -> f64 {
        self.forward
    }

    /// Calibrated parameters.
    #[must_use]
    pub fn parameters(&self) -> &SabrParameters {
        &self.parameters
    }

    /// Alpha.
    #[must_use]
    pub fn alpha(&self) -> f64 {
        self.parameters.alpha()
    }

    /// Beta.
    #[must_use]
    pub fn beta(&self) -> f64 {
        self.parameters.beta()
    }

    /// Nu.
    #[must_use]
    pub fn nu(&self) -> f64 {
        self.parameters.nu()
    }

    /// Rho.
    #[must_use]
    pub fn rho(&self) -> f64 {
        self.parameters.rho()
    }

    /// Whether alpha was solved.
    #[must_use]
    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    /// Sum of squared vol errors of a smile fit; zero for ATM calibrations.
    #[must_use]
    pub fn calibration_error(&self) -> f64 {
        self.calibration_error
    }
}

/// Objective and parameter mapping of one smile fit.
struct SmileFit<'a> {
    smile: &'a SmileQuote,
    beta: f64,
    expiry: f64,
    atm_vol: f64,
    slope: f64,
    config: &'a SabrConfig,
}

impl<'a> SmileFit<'a> {
    fn new(smile: &'a SmileQuote, beta: f64, config: &'a SabrConfig) -> SabrResult<Self> {
        let n = smile.strikes.len();
        if n != smile.vols.len() {
            return Err(SabrError::invalid_grid(format!(
                "{} strikes but {} vols for {}x{}",
                n,
                smile.vols.len(),
                smile.expiry,
                smile.tenor
            )));
        }
        let expiry = smile.expiry.year_fraction();
        for &k in &smile.strikes {
            validate_market(smile.forward, k, expiry)?;
        }
        if let Some(&v) = smile.vols.iter().find(|v| !(**v > 0.0)) {
            return Err(SabrError::invalid_parameter("vol", v, "must be positive"));
        }

        let log_moneyness: Vec<f64> = smile
            .strikes
            .iter()
            .map(|k| (k / smile.forward).ln())
            .collect();
        let atm = log_moneyness
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.abs().total_cmp(&b.abs()))
            .map_or(0, |(i, _)| i);
        if atm == 0 || atm + 1 >= n {
            return Err(SabrError::AtmStrikeMissing {
                expiry: smile.expiry.to_string(),
                tenor: smile.tenor.to_string(),
            });
        }
        let slope = (smile.vols[atm + 1] - smile.vols[atm - 1])
            / (log_moneyness[atm + 1] - log_moneyness[atm - 1]);

        Ok(Self {
            smile,
            beta,
            expiry,
            atm_vol: smile.vols[atm],
            slope,
            config,
        })
    }

    /// Starting point in `(θ, μ)` from the ATM skew.
    fn seed(&self) -> [f64; 2] {
        let rho = if self.slope > 0.0 {
            0.5
        } else if self.slope < 0.0 {
            -0.5
        } else {
            0.0
        };
        let nu = 4.0 * (self.slope.abs() + rho * (1.0 - self.beta) * self.atm_vol).abs();
        [rho.acos(), nu.sqrt()]
    }

    /// Maps `(θ, μ)` to `(alpha, rho, nu)`; alpha is `None` when unsolvable.
    fn parameters(&self, point: &[f64]) -> (Option<f64>, f64, f64) {
        let mut rho = point[0].cos();
        if rho.abs() == 1.0 {
            rho -= self.config.rho_boundary_offset.copysign(rho);
        }
        let nu = point[1] * point[1];
        let alpha = atm_alpha(
            self.atm_vol,
            self.smile.forward,
            self.expiry,
            self.beta,
            nu,
            rho,
            self.config,
        )
        .ok();
        (alpha, rho, nu)
    }

    fn objective(&self, point: &[f64]) -> f64 {
        let (alpha, rho, nu) = self.parameters(point);
        let Some(alpha) = alpha else {
            return self.config.failed_objective;
        };
        let error: f64 = self
            .smile
            .strikes
            .iter()
            .zip(&self.smile.vols)
            .map(|(&k, &v)| {
                let model = hagan_volatility(
                    alpha,
                    self.beta,
                    nu,
                    rho,
                    self.smile.forward,
                    k,
                    self.expiry,
                );
                (model - v) * (model - v)
            })
            .sum();
        if error.is_finite() {
            error
        } else {
            self.config.failed_objective
        }
    }

    fn optimize(&self, start: &[f64]) -> SabrResult<OptimizationResult> {
        let nm = NelderMeadConfig::default()
            .with_max_iterations(self.config.max_iterations)
            .with_initial_step(self.config.initial_step)
            .with_tolerances(
                self.config.function_tolerance,
                self.config.parameter_tolerance,
            );
        Ok(nelder_mead(|p| self.objective(p), start, &nm)?)
    }

    /// Scores Halton points and re-optimises the best candidates in order.
    ///
    /// Returns the first candidate that converges, otherwise the lowest
    /// objective seen.
    fn enhanced_search(&self) -> SabrResult<OptimizationResult> {
        let mut scored: Vec<([f64; 2], f64)> = Halton::points(2, self.config.halton_points)?
            .into_iter()
            .map(|p| {
                let nu = p[0];
                let rho = 2.0 * p[1] - 1.0;
                let point = [rho.acos(), nu.sqrt()];
                (point, self.objective(&point))
            })
            .collect();
        scored.sort_by(|a, b| a.1.total_cmp(&b.1));

        let mut best: Option<OptimizationResult> = None;
        for (start, _) in scored.iter().take(self.config.best_candidates) {
            let result = self.optimize(start)?;
            if result.converged {
                debug!(
                    "{}x{} Halton candidate converged after {} iterations",
                    self.smile.expiry, self.smile.tenor, result.iterations
                );
                return Ok(result);
            }
            if best
                .as_ref()
                .map_or(true, |b| result.objective_value < b.objective_value)
            {
                best = Some(result);
            }
        }
        best.ok_or_else(|| {
            SabrError::invalid_parameter(
                "best_candidates",
                self.config.best_candidates as f64,
                "Halton search evaluated no candidates",
            )
        })
    }
}
