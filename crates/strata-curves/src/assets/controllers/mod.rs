//! Priceable asset controllers.
//!
//! A controller wraps one parsed instrument together with its quotes and
//! currency conventions and values it against a [`MarketEnvironment`].
//! Every controller answers [`PriceableAsset::implied_quote`] and
//! [`PriceableAsset::npv_at`]; the remaining metrics have defaults that
//! controllers override where the family supports them.
//!
//! # Conventions
//!
//! - NPV is the value to the receiver of the quoted rate, or to the holder of
//!   the long position at the quoted price or level. It is zero when the
//!   quote equals the implied quote.
//! - `DeltaR` is the NPV change for a one basis point rise in the quote.

mod basis;
mod bond;
mod caplet;
mod deposit;
mod fra;
mod future;
mod index;
mod legs;
mod ois;
mod swap;
mod xccy;

pub use basis::BasisSwapController;
pub use bond::BondController;
pub use caplet::{black_forward_premium, CapletController};
pub use deposit::DepositController;
pub use fra::{FraController, SpreadFraController};
pub use future::FutureController;
pub use index::IndexLevelController;
pub use ois::OisController;
pub use swap::SwapController;
pub use xccy::XccyController;

use std::fmt;

use strata_config::CurrencyConventions;
use strata_core::calendars::{Calendar, HolidayCalendar};
use strata_core::types::{Date, Tenor};

use super::identifier::{AssetFamily, AssetIdentifier};
use super::metrics::{AssetMetric, BasicAssetValuation};
use super::properties::AssetProperties;
use super::quotes::QuoteSet;
use crate::curves::{IndexCurve, IndexKind, RateCurve};
use crate::environment::MarketEnvironment;
use crate::error::{CurveError, CurveResult};

/// One basis point.
pub const ONE_BASIS_POINT: f64 = 1e-4;

/// Which of an asset's curves a bootstrap solves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveRole {
    /// Single-curve rate instruments: discounting and projection on one curve.
    DiscountAndForecast,
    /// The discount curve only (cross-currency basis curves).
    Discount,
    /// The forecast curve only (tenor basis curves).
    Forecast,
    /// An index level curve.
    Index(IndexKind),
}

/// The curve role a family calibrates, `None` for families that never
/// calibrate a curve (optionlets).
#[must_use]
pub fn calibration_role(family: AssetFamily) -> Option<CurveRole> {
    use AssetFamily as F;
    match family {
        F::Deposit | F::Xibor | F::OIS | F::IRFuture | F::IRSwap | F::Fra | F::BillFra | F::Bond => {
            Some(CurveRole::DiscountAndForecast)
        }
        F::BasisSwap | F::SpreadFra => Some(CurveRole::Forecast),
        F::XccySwap | F::XccyBasisSwap => Some(CurveRole::Discount),
        F::FxSpot | F::FxForward => Some(CurveRole::Index(IndexKind::Fx)),
        F::CommoditySpot | F::CommodityForward | F::CommodityFuture => {
            Some(CurveRole::Index(IndexKind::Commodity))
        }
        F::CPIndex => Some(CurveRole::Index(IndexKind::Inflation)),
        F::Caplet | F::Floorlet | F::BillCaplet | F::BillFloorlet => None,
    }
}

/// State shared by every controller.
#[derive(Debug, Clone)]
pub struct AssetContext {
    properties: AssetProperties,
    quotes: QuoteSet,
    conventions: CurrencyConventions,
    calendar: HolidayCalendar,
}

impl AssetContext {
    /// Bundles properties, quotes and conventions.
    pub fn new(properties: AssetProperties, quotes: QuoteSet, conventions: CurrencyConventions) -> Self {
        let calendar = conventions.calendar();
        Self {
            properties,
            quotes,
            conventions,
            calendar,
        }
    }

    /// Asset properties.
    #[must_use]
    pub fn properties(&self) -> &AssetProperties {
        &self.properties
    }

    /// Attached quotes.
    #[must_use]
    pub fn quotes(&self) -> &QuoteSet {
        &self.quotes
    }

    /// Currency conventions.
    #[must_use]
    pub fn conventions(&self) -> &CurrencyConventions {
        &self.conventions
    }

    /// Holiday calendar of the currency.
    #[must_use]
    pub fn calendar(&self) -> &HolidayCalendar {
        &self.calendar
    }

    /// Valuation date.
    #[must_use]
    pub fn base_date(&self) -> Date {
        self.properties.base_date
    }

    /// Notional.
    #[must_use]
    pub fn notional(&self) -> f64 {
        self.properties.notional
    }

    /// Spot date for money market instruments.
    #[must_use]
    pub fn spot_date(&self) -> Date {
        self.calendar
            .add_business_days(self.base_date(), self.conventions.spot_lag as i32)
    }

    /// Adjusts a date with the currency's business day convention.
    pub fn adjust(&self, date: Date) -> CurveResult<Date> {
        Ok(self.calendar.adjust(date, self.conventions.business_day_convention)?)
    }

    /// Accrual start and end of a deposit-style tenor.
    pub fn tenor_dates(&self, tenor: Tenor, spot_lag: u32) -> CurveResult<(Date, Date)> {
        Ok(tenor.accrual_dates(
            self.base_date(),
            spot_lag,
            &self.calendar,
            self.conventions.business_day_convention,
        )?)
    }

    /// Curve time on ACT/365F from the base date.
    #[must_use]
    pub fn curve_time(&self, date: Date) -> f64 {
        self.conventions
            .curve_day_count
            .year_fraction(self.base_date(), date)
    }

    /// Normalised market quote.
    pub fn market_quote(&self) -> CurveResult<f64> {
        Ok(self.quotes.market_quote()?.normalised())
    }

    /// The discount curve from the environment.
    pub fn discount_curve<'a>(&self, env: &'a MarketEnvironment) -> CurveResult<&'a RateCurve> {
        env.rate_curve(&self.properties.discount_curve)
    }

    /// The forecast curve from the environment.
    pub fn forecast_curve<'a>(&self, env: &'a MarketEnvironment) -> CurveResult<&'a RateCurve> {
        env.rate_curve(&self.properties.forecast_curve)
    }

    /// The index curve from the environment.
    pub fn index_curve<'a>(&self, env: &'a MarketEnvironment) -> CurveResult<&'a IndexCurve> {
        env.index_curve(self.properties.require_index_curve()?)
    }

    fn unsupported(&self, metric: AssetMetric) -> CurveError {
        CurveError::unsupported_metric(metric.name(), self.properties.family().name())
    }
}

/// An instrument that can be valued against a market environment.
pub trait PriceableAsset: Send + Sync + fmt::Debug {
    /// Shared controller state.
    fn context(&self) -> &AssetContext;

    /// Mutable shared state.
    fn context_mut(&mut self) -> &mut AssetContext;

    /// Final cash flow or fixing date.
    fn maturity(&self) -> Date;

    /// Date of the curve node this asset calibrates.
    fn node_date(&self) -> Date {
        self.maturity()
    }

    /// Quote that sets NPV to zero against `env`.
    fn implied_quote(&self, env: &MarketEnvironment) -> CurveResult<f64>;

    /// NPV when the asset is struck at `quote`.
    fn npv_at(&self, env: &MarketEnvironment, quote: f64) -> CurveResult<f64>;

    /// Parsed identifier.
    fn identifier(&self) -> &AssetIdentifier {
        &self.context().properties.identifier
    }

    /// Asset properties.
    fn properties(&self) -> &AssetProperties {
        self.context().properties()
    }

    /// Attached quotes.
    fn quotes(&self) -> &QuoteSet {
        self.context().quotes()
    }

    /// Replaces the market quote value.
    fn set_market_quote(&mut self, value: f64) -> CurveResult<()> {
        self.context_mut().quotes.set_market_quote(value)
    }

    /// Market quote in the unit `implied_quote` returns.
    fn market_quote(&self) -> CurveResult<f64> {
        self.context().market_quote()
    }

    /// Curve role this asset can calibrate.
    fn calibration_role(&self) -> Option<CurveRole> {
        calibration_role(self.identifier().family())
    }

    /// Closed-form guess of the node value (a discount factor or a level)
    /// that reprices the asset, given the curve built so far.
    fn node_estimate(&self, _env: &MarketEnvironment) -> CurveResult<f64> {
        match self.calibration_role() {
            Some(CurveRole::Index(_)) => self.market_quote(),
            Some(_) => {
                let t = self.context().curve_time(self.node_date());
                Ok((-self.market_quote()? * t).exp())
            }
            None => Err(CurveError::invalid_curve(format!(
                "{} does not calibrate a curve",
                self.identifier()
            ))),
        }
    }

    /// NPV at the market quote.
    fn npv(&self, env: &MarketEnvironment) -> CurveResult<f64> {
        self.npv_at(env, self.market_quote()?)
    }

    /// NPV change for a one basis point rise in the quote.
    fn delta_r(&self, env: &MarketEnvironment) -> CurveResult<f64> {
        let quote = self.market_quote()?;
        Ok(self.npv_at(env, quote + ONE_BASIS_POINT)? - self.npv_at(env, quote)?)
    }

    /// Discount factor at maturity on the discount curve.
    fn discount_factor_at_maturity(&self, env: &MarketEnvironment) -> CurveResult<f64> {
        self.context().discount_curve(env)?.discount_factor(self.maturity())
    }

    /// Year fraction of the main accrual period.
    fn accrual_factor(&self) -> CurveResult<f64> {
        Err(self.context().unsupported(AssetMetric::AccrualFactor))
    }

    /// Black volatility used at expiry.
    fn volatility_at_expiry(&self, _env: &MarketEnvironment) -> CurveResult<f64> {
        Err(self.context().unsupported(AssetMetric::VolatilityAtExpiry))
    }

    /// Forward rate or level at maturity.
    fn forward_at_maturity(&self, _env: &MarketEnvironment) -> CurveResult<f64> {
        Err(self.context().unsupported(AssetMetric::ForwardAtMaturity))
    }

    /// Index level at maturity.
    fn index_at_maturity(&self, _env: &MarketEnvironment) -> CurveResult<f64> {
        Err(self.context().unsupported(AssetMetric::IndexAtMaturity))
    }

    /// Computes a single metric.
    fn evaluate(&self, env: &MarketEnvironment, metric: AssetMetric) -> CurveResult<f64> {
        match metric {
            AssetMetric::NPV => self.npv(env),
            AssetMetric::ImpliedQuote => self.implied_quote(env),
            AssetMetric::DiscountFactorAtMaturity => self.discount_factor_at_maturity(env),
            AssetMetric::AccrualFactor => self.accrual_factor(),
            AssetMetric::DeltaR => self.delta_r(env),
            AssetMetric::VolatilityAtExpiry => self.volatility_at_expiry(env),
            AssetMetric::ForwardAtMaturity => self.forward_at_maturity(env),
            AssetMetric::IndexAtMaturity => self.index_at_maturity(env),
        }
    }

    /// Computes the requested metrics in order.
    fn calculate(&self, env: &MarketEnvironment, metrics: &[AssetMetric]) -> CurveResult<BasicAssetValuation> {
        let mut valuation = BasicAssetValuation::new(self.identifier().to_string());
        for &metric in metrics {
            valuation.push(metric, self.evaluate(env, metric)?);
        }
        Ok(valuation)
    }
}

impl dyn PriceableAsset {
    /// Computes metrics given by name.
    pub fn calculate_named<S: AsRef<str>>(
        &self,
        env: &MarketEnvironment,
        metric_names: &[S],
    ) -> CurveResult<BasicAssetValuation> {
        let family = self.identifier().family();
        let metrics = metric_names
            .iter()
            .map(|name| {
                name.as_ref()
                    .parse::<AssetMetric>()
                    .map_err(|_| CurveError::unsupported_metric(name.as_ref(), family.name()))
            })
            .collect::<CurveResult<Vec<_>>>()?;
        self.calculate(env, &metrics)
    }
}

/// Simple forward over `[start, end]` with accrual `tau`.
pub(crate) fn simple_forward(curve: &RateCurve, start: Date, end: Date, tau: f64) -> CurveResult<f64> {
    if tau <= 0.0 {
        return Err(CurveError::invalid_curve(format!(
            "accrual from {start} to {end} is not positive"
        )));
    }
    let ratio = curve.discount_factor(start)? / curve.discount_factor(end)?;
    Ok((ratio - 1.0) / tau)
}
