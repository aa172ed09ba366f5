//! Overnight index swaps.

use strata_config::CurrencyConventions;
use strata_core::types::{Date, Frequency, Tenor};

use super::legs::Leg;
use super::{AssetContext, PriceableAsset};
use crate::assets::identifier::AssetDescriptor;
use crate::assets::properties::AssetProperties;
use crate::assets::quotes::QuoteSet;
use crate::environment::MarketEnvironment;
use crate::error::{CurveError, CurveResult};

/// Compounded overnight rate against a fixed rate.
///
/// Terms up to one year pay once at maturity; longer terms pay on the
/// currency's OIS frequency. Both legs accrue on the money market basis.
#[derive(Debug, Clone)]
pub struct OisController {
    ctx: AssetContext,
    leg: Leg,
}

impl OisController {
    /// Builds the controller from a `Term` identifier.
    pub fn create(
        quotes: QuoteSet,
        properties: AssetProperties,
        conventions: CurrencyConventions,
    ) -> CurveResult<Self> {
        let ctx = AssetContext::new(properties, quotes, conventions);
        let AssetDescriptor::Term { tenor } = ctx.properties().identifier.descriptor() else {
            return Err(CurveError::malformed(
                ctx.properties().identifier.to_string(),
                "OIS requires a tenor",
            ));
        };
        let (start, end) = ctx.tenor_dates(*tenor, ctx.conventions().spot_lag)?;
        let frequency = match tenor {
            Tenor::Period(p) if p.approximate_years() > 1.0 => ctx.conventions().ois_frequency,
            _ => Frequency::Once,
        };
        let leg = Leg::generate(
            &ctx,
            start,
            end,
            frequency,
            ctx.conventions().money_market_day_count,
        )?;
        Ok(Self { ctx, leg })
    }

    /// Number of fixed payments.
    #[must_use]
    pub fn payment_count(&self) -> usize {
        self.leg.periods().len()
    }
}

impl PriceableAsset for OisController {
    fn context(&self) -> &AssetContext {
        &self.ctx
    }

    fn context_mut(&mut self) -> &mut AssetContext {
        &mut self.ctx
    }

    fn maturity(&self) -> Date {
        self.leg.end()
    }

    fn implied_quote(&self, env: &MarketEnvironment) -> CurveResult<f64> {
        let discount = self.ctx.discount_curve(env)?;
        let floating = self.leg.floating_pv(discount, self.ctx.forecast_curve(env)?)?;
        Ok(floating / self.leg.annuity(discount)?)
    }

    fn npv_at(&self, env: &MarketEnvironment, quote: f64) -> CurveResult<f64> {
        let discount = self.ctx.discount_curve(env)?;
        let floating = self.leg.floating_pv(discount, self.ctx.forecast_curve(env)?)?;
        Ok(self.ctx.notional() * (quote * self.leg.annuity(discount)? - floating))
    }

    fn node_estimate(&self, env: &MarketEnvironment) -> CurveResult<f64> {
        let curve = self.ctx.discount_curve(env)?;
        let q = self.market_quote()?;
        let known = self.leg.annuity_before_last(curve)?;
        Ok((curve.discount_factor(self.leg.start())? - q * known) / (1.0 + q * self.leg.last().accrual))
    }

    fn accrual_factor(&self) -> CurveResult<f64> {
        Ok(self.leg.periods().iter().map(|p| p.accrual).sum())
    }
}
