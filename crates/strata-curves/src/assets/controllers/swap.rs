//! Fixed-for-floating interest rate swaps.

use strata_config::CurrencyConventions;
use strata_core::types::{Date, Frequency};

use super::legs::Leg;
use super::{AssetContext, PriceableAsset};
use crate::assets::identifier::AssetDescriptor;
use crate::assets::properties::AssetProperties;
use crate::assets::quotes::QuoteSet;
use crate::environment::MarketEnvironment;
use crate::error::{CurveError, CurveResult};

/// Spot-start vanilla swap.
///
/// ```text
/// fixed PV    = q Σ τᵢ DF(tᵢ)              (discount curve)
/// floating PV = Σ (P(sⱼ)/P(eⱼ) - 1) DF(eⱼ)  (forecast curve P)
/// ```
#[derive(Debug, Clone)]
pub struct SwapController {
    ctx: AssetContext,
    fixed: Leg,
    floating: Leg,
}

impl SwapController {
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
                "swap requires a term",
            ));
        };
        let conv = ctx.conventions();
        let start = ctx.spot_date();
        let end = term.add_to(start)?;
        let floating_frequency = (*index_tenor)
            .and_then(Frequency::from_period)
            .unwrap_or(conv.floating_frequency);
        let fixed = Leg::generate(&ctx, start, end, conv.fixed_frequency, conv.fixed_leg_day_count)?;
        let floating = Leg::generate(&ctx, start, end, floating_frequency, conv.money_market_day_count)?;
        Ok(Self { ctx, fixed, floating })
    }

    fn legs_pv(&self, env: &MarketEnvironment) -> CurveResult<(f64, f64)> {
        let discount = self.ctx.discount_curve(env)?;
        let annuity = self.fixed.annuity(discount)?;
        let floating = self.floating.floating_pv(discount, self.ctx.forecast_curve(env)?)?;
        Ok((annuity, floating))
    }
}

impl PriceableAsset for SwapController {
    fn context(&self) -> &AssetContext {
        &self.ctx
    }

    fn context_mut(&mut self) -> &mut AssetContext {
        &mut self.ctx
    }

    fn maturity(&self) -> Date {
        self.fixed.end().max(self.floating.end())
    }

    fn implied_quote(&self, env: &MarketEnvironment) -> CurveResult<f64> {
        let (annuity, floating) = self.legs_pv(env)?;
        Ok(floating / annuity)
    }

    fn npv_at(&self, env: &MarketEnvironment, quote: f64) -> CurveResult<f64> {
        let (annuity, floating) = self.legs_pv(env)?;
        Ok(self.ctx.notional() * (quote * annuity - floating))
    }

    fn node_estimate(&self, env: &MarketEnvironment) -> CurveResult<f64> {
        let curve = self.ctx.discount_curve(env)?;
        let q = self.market_quote()?;
        let known = self.fixed.annuity_before_last(curve)?;
        Ok((curve.discount_factor(self.fixed.start())? - q * known) / (1.0 + q * self.fixed.last().accrual))
    }

    fn accrual_factor(&self) -> CurveResult<f64> {
        Ok(self.fixed.periods().iter().map(|p| p.accrual).sum())
    }
}
