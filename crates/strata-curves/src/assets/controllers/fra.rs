//! Forward rate agreements.

use strata_config::CurrencyConventions;
use strata_core::types::Date;

use super::{simple_forward, AssetContext, PriceableAsset};
use crate::assets::identifier::{AssetDescriptor, AssetFamily};
use crate::assets::properties::AssetProperties;
use crate::assets::quotes::QuoteSet;
use crate::environment::MarketEnvironment;
use crate::error::{CurveError, CurveResult};

#[derive(Debug, Clone, Copy)]
struct ForwardPeriod {
    start: Date,
    end: Date,
    accrual: f64,
}

fn forward_period(ctx: &AssetContext, bill: bool) -> CurveResult<ForwardPeriod> {
    let AssetDescriptor::Forward { start, index_tenor } = ctx.properties().identifier.descriptor() else {
        return Err(CurveError::malformed(
            ctx.properties().identifier.to_string(),
            "FRA requires a start and an index tenor",
        ));
    };
    let unadjusted_start = start.add_to(ctx.spot_date())?;
    let period_start = ctx.adjust(unadjusted_start)?;
    let period_end = ctx.adjust(index_tenor.add_to(unadjusted_start)?)?;
    let day_count = if bill {
        ctx.conventions().bill_day_count
    } else {
        ctx.conventions().money_market_day_count
    };
    Ok(ForwardPeriod {
        start: period_start,
        end: period_end,
        accrual: day_count.year_fraction(period_start, period_end),
    })
}

/// FRA and bank bill FRA.
///
/// A `Fra` settles the rate difference at period end. A `BillFra` accrues on
/// the bill day count and settles at the period start as the difference of
/// bill prices, `1/(1+Fτ) - 1/(1+qτ)`.
#[derive(Debug, Clone)]
pub struct FraController {
    ctx: AssetContext,
    period: ForwardPeriod,
    bill: bool,
}

impl FraController {
    /// Builds the controller from a `Forward` identifier.
    pub fn create(
        quotes: QuoteSet,
        properties: AssetProperties,
        conventions: CurrencyConventions,
    ) -> CurveResult<Self> {
        let bill = properties.family() == AssetFamily::BillFra;
        let ctx = AssetContext::new(properties, quotes, conventions);
        let period = forward_period(&ctx, bill)?;
        Ok(Self { ctx, period, bill })
    }

    /// Start of the forward period.
    #[must_use]
    pub fn start(&self) -> Date {
        self.period.start
    }
}

impl PriceableAsset for FraController {
    fn context(&self) -> &AssetContext {
        &self.ctx
    }

    fn context_mut(&mut self) -> &mut AssetContext {
        &mut self.ctx
    }

    fn maturity(&self) -> Date {
        self.period.end
    }

    fn implied_quote(&self, env: &MarketEnvironment) -> CurveResult<f64> {
        let p = self.period;
        simple_forward(self.ctx.forecast_curve(env)?, p.start, p.end, p.accrual)
    }

    fn npv_at(&self, env: &MarketEnvironment, quote: f64) -> CurveResult<f64> {
        let p = self.period;
        let forward = self.implied_quote(env)?;
        let discount = self.ctx.discount_curve(env)?;
        let value = if self.bill {
            (1.0 / (1.0 + forward * p.accrual) - 1.0 / (1.0 + quote * p.accrual)) * discount.discount_factor(p.start)?
        } else {
            p.accrual * (quote - forward) * discount.discount_factor(p.end)?
        };
        Ok(self.ctx.notional() * value)
    }

    fn node_estimate(&self, env: &MarketEnvironment) -> CurveResult<f64> {
        let df_start = self.ctx.forecast_curve(env)?.discount_factor(self.period.start)?;
        Ok(df_start / (1.0 + self.market_quote()? * self.period.accrual))
    }

    fn accrual_factor(&self) -> CurveResult<f64> {
        Ok(self.period.accrual)
    }

    fn forward_at_maturity(&self, env: &MarketEnvironment) -> CurveResult<f64> {
        self.implied_quote(env)
    }
}

/// Spread of the forecast-curve forward over the base-curve forward.
///
/// The base curve is the asset's discount curve.
#[derive(Debug, Clone)]
pub struct SpreadFraController {
    ctx: AssetContext,
    period: ForwardPeriod,
}

impl SpreadFraController {
    /// Builds the controller from a `Forward` identifier.
    pub fn create(
        quotes: QuoteSet,
        properties: AssetProperties,
        conventions: CurrencyConventions,
    ) -> CurveResult<Self> {
        let ctx = AssetContext::new(properties, quotes, conventions);
        let period = forward_period(&ctx, false)?;
        Ok(Self { ctx, period })
    }

    fn base_forward(&self, env: &MarketEnvironment) -> CurveResult<f64> {
        let p = self.period;
        simple_forward(self.ctx.discount_curve(env)?, p.start, p.end, p.accrual)
    }
}

impl PriceableAsset for SpreadFraController {
    fn context(&self) -> &AssetContext {
        &self.ctx
    }

    fn context_mut(&mut self) -> &mut AssetContext {
        &mut self.ctx
    }

    fn maturity(&self) -> Date {
        self.period.end
    }

    fn implied_quote(&self, env: &MarketEnvironment) -> CurveResult<f64> {
        let p = self.period;
        let forecast = simple_forward(self.ctx.forecast_curve(env)?, p.start, p.end, p.accrual)?;
        Ok(forecast - self.base_forward(env)?)
    }

    fn npv_at(&self, env: &MarketEnvironment, quote: f64) -> CurveResult<f64> {
        let p = self.period;
        let implied = self.implied_quote(env)?;
        let df_end = self.ctx.discount_curve(env)?.discount_factor(p.end)?;
        Ok(self.ctx.notional() * p.accrual * (quote - implied) * df_end)
    }

    fn node_estimate(&self, env: &MarketEnvironment) -> CurveResult<f64> {
        let p = self.period;
        let df_start = self.ctx.forecast_curve(env)?.discount_factor(p.start)?;
        let rate = self.base_forward(env)? + self.market_quote()?;
        Ok(df_start / (1.0 + rate * p.accrual))
    }

    fn accrual_factor(&self) -> CurveResult<f64> {
        Ok(self.period.accrual)
    }

    fn forward_at_maturity(&self, env: &MarketEnvironment) -> CurveResult<f64> {
        let p = self.period;
        simple_forward(self.ctx.forecast_curve(env)?, p.start, p.end, p.accrual)
    }
}
