//! Fixed coupon bullet bonds quoted on yield.

use strata_config::CurrencyConventions;
use strata_core::types::{Date, Frequency};
use strata_math::solvers::{hybrid_numerical, SolverConfig};

use super::legs::Leg;
use super::{AssetContext, PriceableAsset};
use crate::assets::identifier::AssetDescriptor;
use crate::assets::properties::AssetProperties;
use crate::assets::quotes::{QuoteSet, QuoteUnit};
use crate::environment::MarketEnvironment;
use crate::error::{CurveError, CurveResult};

const COUPON_FREQUENCY: Frequency = Frequency::SemiAnnual;
const YIELD_TOLERANCE: f64 = 1e-12;
const YIELD_MAX_ITERATIONS: u32 = 100;

/// Bullet bond settling at spot.
///
/// The market quote is a yield to maturity compounded at the coupon
/// frequency, or a dirty price per 100 (`DirtyPrice` or `Price` unit) which
/// is converted to its yield. `ImpliedQuote` is the yield that reproduces
/// the dirty price implied by the discount curve.
#[derive(Debug, Clone)]
pub struct BondController {
    ctx: AssetContext,
    coupon: f64,
    settlement: Date,
    coupons: Leg,
    /// Cash flow times from settlement on the bond day count.
    times: Vec<f64>,
}

impl BondController {
    /// Builds the controller from a `Bond` identifier.
    pub fn create(
        quotes: QuoteSet,
        properties: AssetProperties,
        conventions: CurrencyConventions,
    ) -> CurveResult<Self> {
        let ctx = AssetContext::new(properties, quotes, conventions);
        let AssetDescriptor::Bond { coupon, maturity, .. } = ctx.properties().identifier.descriptor() else {
            return Err(CurveError::malformed(
                ctx.properties().identifier.to_string(),
                "bond requires issuer, coupon and maturity",
            ));
        };
        let coupon = coupon / 100.0;
        let settlement = ctx.spot_date();
        let end = maturity.add_to(ctx.base_date())?;
        let day_count = ctx.conventions().bond_day_count;
        let coupons = Leg::generate(&ctx, settlement, end, COUPON_FREQUENCY, day_count)?;
        let times = coupons
            .periods()
            .iter()
            .map(|p| day_count.year_fraction(settlement, p.end))
            .collect();
        Ok(Self {
            ctx,
            coupon,
            settlement,
            coupons,
            times,
        })
    }

    /// Decimal annual coupon.
    #[must_use]
    pub fn coupon(&self) -> f64 {
        self.coupon
    }

    /// Dirty price per 100 at a yield.
    #[must_use]
    pub fn price_from_yield(&self, y: f64) -> f64 {
        let f = f64::from(COUPON_FREQUENCY.periods_per_year());
        let periods = self.coupons.periods();
        let mut price = 0.0;
        for (p, &t) in periods.iter().zip(&self.times) {
            price += self.coupon * p.accrual * (1.0 + y / f).powf(-f * t);
        }
        if let Some(&t_last) = self.times.last() {
            price += (1.0 + y / f).powf(-f * t_last);
        }
        100.0 * price
    }

    /// Yield that reproduces a dirty price per 100.
    pub fn yield_from_price(&self, price: f64) -> CurveResult<f64> {
        let config = SolverConfig::new(YIELD_TOLERANCE, YIELD_MAX_ITERATIONS);
        let guess = self.coupon.max(0.01);
        let result = hybrid_numerical(|y| (self.price_from_yield(y) - price) / 100.0, guess, None, &config)?;
        Ok(result.root)
    }

    /// Dirty price per 100 implied by the discount curve.
    pub fn curve_price(&self, env: &MarketEnvironment) -> CurveResult<f64> {
        let curve = self.ctx.discount_curve(env)?;
        let mut pv = 0.0;
        for p in self.coupons.periods() {
            pv += self.coupon * p.accrual * curve.discount_factor(p.end)?;
        }
        pv += curve.discount_factor(self.coupons.end())?;
        Ok(100.0 * pv / curve.discount_factor(self.settlement)?)
    }
}

impl PriceableAsset for BondController {
    fn context(&self) -> &AssetContext {
        &self.ctx
    }

    fn context_mut(&mut self) -> &mut AssetContext {
        &mut self.ctx
    }

    fn maturity(&self) -> Date {
        self.coupons.end()
    }

    fn market_quote(&self) -> CurveResult<f64> {
        let quote = self.ctx.quotes().market_quote()?;
        match quote.unit {
            QuoteUnit::DirtyPrice | QuoteUnit::Price => self.yield_from_price(quote.value),
            _ => Ok(quote.normalised()),
        }
    }

    fn implied_quote(&self, env: &MarketEnvironment) -> CurveResult<f64> {
        self.yield_from_price(self.curve_price(env)?)
    }

    fn npv_at(&self, env: &MarketEnvironment, quote: f64) -> CurveResult<f64> {
        let df_settle = self.ctx.discount_curve(env)?.discount_factor(self.settlement)?;
        let gain = self.curve_price(env)? - self.price_from_yield(quote);
        Ok(self.ctx.notional() * gain / 100.0 * df_settle)
    }
}
