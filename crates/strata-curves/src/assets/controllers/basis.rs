//! Single-currency tenor basis swaps.

use strata_config::CurrencyConventions;
use strata_core::types::{Date, Frequency};

use super::legs::Leg;
use super::{AssetContext, PriceableAsset};
use crate::assets::identifier::AssetDescriptor;
use crate::assets::properties::AssetProperties;
use crate::assets::quotes::QuoteSet;
use crate::environment::MarketEnvironment;
use crate::error::{CurveError, CurveResult};

/// Floating-for-floating swap with the quoted spread on the index-tenor leg.
///
/// The index leg projects off the forecast curve, the base leg off the
/// discount curve at the currency's floating frequency. Both discount on the
/// discount curve.
#[derive(Debug, Clone)]
pub struct BasisSwapController {
    ctx: AssetContext,
    index_leg: Leg,
    base_leg: Leg,
}

impl BasisSwapController {
    /// Builds the controller from a `Swap` identifier.
    pub fn create(
        quotes: QuoteSet,
        properties: AssetProperties,
        conventions: CurrencyConventions,
    ) -> CurveResult<Self> {
        let ctx = AssetContext::new(properties, quotes, conventions);
        let AssetDescriptor::Swap { term, index_tenor } = ctx.properties().identifier.descriptor() else {
            return Err(CurveError::malformed(
                ctx.properties().identifier.to_string(),
                "basis swap requires a term",
            ));
        };
        let conv = ctx.conventions();
        let start = ctx.spot_date();
        let end = term.add_to(start)?;
        let index_frequency = (*index_tenor)
            .and_then(Frequency::from_period)
            .unwrap_or(conv.floating_frequency);
        let day_count = conv.money_market_day_count;
        let index_leg = Leg::generate(&ctx, start, end, index_frequency, day_count)?;
        let base_leg = Leg::generate(&ctx, start, end, conv.floating_frequency, day_count)?;
        Ok(Self {
            ctx,
            index_leg,
            base_leg,
        })
    }

    /// (index leg PV, index leg annuity, base leg PV)
    fn legs(&self, env: &MarketEnvironment) -> CurveResult<(f64, f64, f64)> {
        let discount = self.ctx.discount_curve(env)?;
        let forecast = self.ctx.forecast_curve(env)?;
        Ok((
            self.index_leg.floating_pv(discount, forecast)?,
            self.index_leg.annuity(discount)?,
            self.base_leg.floating_pv(discount, discount)?,
        ))
    }
}

impl PriceableAsset for BasisSwapController {
    fn context(&self) -> &AssetContext {
        &self.ctx
    }

    fn context_mut(&mut self) -> &mut AssetContext {
        &mut self.ctx
    }

    fn maturity(&self) -> Date {
        self.index_leg.end().max(self.base_leg.end())
    }

    fn implied_quote(&self, env: &MarketEnvironment) -> CurveResult<f64> {
        let (index_pv, annuity, base_pv) = self.legs(env)?;
        Ok((base_pv - index_pv) / annuity)
    }

    fn npv_at(&self, env: &MarketEnvironment, quote: f64) -> CurveResult<f64> {
        let (index_pv, annuity, base_pv) = self.legs(env)?;
        Ok(self.ctx.notional() * (index_pv + quote * annuity - base_pv))
    }

    fn node_estimate(&self, env: &MarketEnvironment) -> CurveResult<f64> {
        let end = self.maturity();
        let base_df = self.ctx.discount_curve(env)?.discount_factor(end)?;
        Ok(base_df * (-self.market_quote()? * self.ctx.curve_time(end)).exp())
    }

    fn accrual_factor(&self) -> CurveResult<f64> {
        Ok(self.index_leg.periods().iter().map(|p| p.accrual).sum())
    }
}
