//! Round-trip check of bootstrapped curves.
//!
//! Each calibrating asset is revalued on the finished structure and its
//! implied quote compared with the quote it was built from.

use std::fmt;
use std::time::Duration;

use crate::assets::{AssetFamily, PriceableAsset};
use crate::environment::MarketEnvironment;
use crate::error::{CurveError, CurveResult};

/// Largest accepted |implied - market| in quote units, for every family.
pub const REPRICING_TOLERANCE: f64 = 1e-10;

/// One asset revalued on the curve.
#[derive(Debug, Clone, PartialEq)]
pub struct RepricingCheck {
    /// Asset identifier, e.g. `AUD-IRSwap-5Y`.
    pub instrument_id: String,
    /// Asset family.
    pub family: AssetFamily,
    /// Input quote.
    pub market_quote: f64,
    /// Quote implied by the curve.
    pub implied_quote: f64,
    /// Accepted absolute error.
    pub tolerance: f64,
}

impl RepricingCheck {
    /// Revalues `asset` on `env` at [`REPRICING_TOLERANCE`].
    pub fn from_asset(asset: &dyn PriceableAsset, env: &MarketEnvironment) -> CurveResult<Self> {
        let id = asset.identifier();
        Ok(Self {
            instrument_id: id.to_string(),
            family: id.family(),
            market_quote: asset.market_quote()?,
            implied_quote: asset.implied_quote(env)?,
            tolerance: REPRICING_TOLERANCE,
        })
    }

    /// |implied - market|.
    #[must_use]
    pub fn error(&self) -> f64 {
        (self.implied_quote - self.market_quote).abs()
    }

    /// Error within tolerance. NaN quotes fail.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.error() <= self.tolerance
    }
}

impl fmt::Display for RepricingCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<4} {} market {:.8} implied {:.8} error {:.2e}",
            if self.passed() { "ok" } else { "FAIL" },
            self.instrument_id,
            self.market_quote,
            self.implied_quote,
            self.error()
        )
    }
}

/// Checks for every asset of a curve.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RepricingReport {
    checks: Vec<RepricingCheck>,
}

impl RepricingReport {
    /// Report over `checks`.
    #[must_use]
    pub fn new(checks: Vec<RepricingCheck>) -> Self {
        Self { checks }
    }

    /// Revalues every asset on `env`.
    pub fn from_assets(assets: &[Box<dyn PriceableAsset>], env: &MarketEnvironment) -> CurveResult<Self> {
        assets
            .iter()
            .map(|asset| RepricingCheck::from_asset(asset.as_ref(), env))
            .collect::<CurveResult<Vec<_>>>()
            .map(Self::new)
    }

    /// All checks passed. An empty report is valid.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.checks.iter().all(RepricingCheck::passed)
    }

    /// Checks in asset order.
    #[must_use]
    pub fn checks(&self) -> &[RepricingCheck] {
        &self.checks
    }

    /// Number of assets checked.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.checks.len()
    }

    /// Worst error, 0 when empty.
    #[must_use]
    pub fn max_error(&self) -> f64 {
        self.checks.iter().map(RepricingCheck::error).fold(0.0, f64::max)
    }

    /// Root mean square error, 0 when empty.
    #[must_use]
    pub fn rms_error(&self) -> f64 {
        if self.checks.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.checks.iter().map(|c| c.error().powi(2)).sum();
        (sum / self.checks.len() as f64).sqrt()
    }

    /// Identifiers of failing assets.
    #[must_use]
    pub fn failed_instruments(&self) -> Vec<&str> {
        self.checks
            .iter()
            .filter(|c| !c.passed())
            .map(|c| c.instrument_id.as_str())
            .collect()
    }
}

impl fmt::Display for RepricingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let failed = self.failed_instruments().len();
        writeln!(
            f,
            "{}/{} repriced, max error {:.2e}, rms {:.2e}",
            self.checks.len() - failed,
            self.checks.len(),
            self.max_error(),
            self.rms_error()
        )?;
        for check in &self.checks {
            writeln!(f, "  {check}")?;
        }
        Ok(())
    }
}

/// A bootstrapped structure with its repricing report.
#[derive(Debug, Clone)]
pub struct BootstrapResult<C> {
    /// The structure.
    pub curve: C,
    /// Round-trip check of its inputs.
    pub repricing_report: RepricingReport,
    /// Wall time of the build including repricing.
    pub build_duration: Duration,
}

impl<C> BootstrapResult<C> {
    /// Bundles a structure with its report.
    #[must_use]
    pub fn new(curve: C, repricing_report: RepricingReport, build_duration: Duration) -> Self {
        Self {
            curve,
            repricing_report,
            build_duration,
        }
    }

    /// Every input reprices.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.repricing_report.is_valid()
    }

    /// The structure, or `InvalidCurve` naming the assets that miss.
    pub fn into_curve(self) -> CurveResult<C> {
        if self.is_valid() {
            return Ok(self.curve);
        }
        Err(CurveError::invalid_curve(format!(
            "{} do not reprice (max error {:.2e})",
            self.repricing_report.failed_instruments().join(", "),
            self.repricing_report.max_error()
        )))
    }
}
