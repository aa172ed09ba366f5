//! Deposits and IBOR fixings.

use strata_config::CurrencyConventions;
use strata_core::types::Date;

use super::{simple_forward, AssetContext, PriceableAsset};
use crate::assets::identifier::AssetDescriptor;
use crate::assets::properties::AssetProperties;
use crate::assets::quotes::QuoteSet;
use crate::environment::MarketEnvironment;
use crate::error::{CurveError, CurveResult};

/// Spot-start simple interest deposit: `DF(e) = DF(s) / (1 + rτ)`.
#[derive(Debug, Clone)]
pub struct DepositController {
    ctx: AssetContext,
    start: Date,
    end: Date,
    accrual: f64,
}

impl DepositController {
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
                "deposit requires a tenor",
            ));
        };
        let (start, end) = ctx.tenor_dates(*tenor, ctx.conventions().spot_lag)?;
        let accrual = ctx.conventions().money_market_day_count.year_fraction(start, end);
        Ok(Self {
            ctx,
            start,
            end,
            accrual,
        })
    }

    /// Accrual start.
    #[must_use]
    pub fn start(&self) -> Date {
        self.start
    }
}

impl PriceableAsset for DepositController {
    fn context(&self) -> &AssetContext {
        &self.ctx
    }

    fn context_mut(&mut self) -> &mut AssetContext {
        &mut self.ctx
    }

    fn maturity(&self) -> Date {
        self.end
    }

    fn implied_quote(&self, env: &MarketEnvironment) -> CurveResult<f64> {
        simple_forward(self.ctx.forecast_curve(env)?, self.start, self.end, self.accrual)
    }

    fn npv_at(&self, env: &MarketEnvironment, quote: f64) -> CurveResult<f64> {
        let implied = self.implied_quote(env)?;
        let df_end = self.ctx.discount_curve(env)?.discount_factor(self.end)?;
        Ok(self.ctx.notional() * self.accrual * (quote - implied) * df_end)
    }

    fn node_estimate(&self, env: &MarketEnvironment) -> CurveResult<f64> {
        let df_start = self.ctx.forecast_curve(env)?.discount_factor(self.start)?;
        Ok(df_start / (1.0 + self.market_quote()? * self.accrual))
    }

    fn accrual_factor(&self) -> CurveResult<f64> {
        Ok(self.accrual)
    }

    fn forward_at_maturity(&self, env: &MarketEnvironment) -> CurveResult<f64> {
        self.implied_quote(env)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{base_date, environment};
    use super::*;
    use crate::assets::metrics::AssetMetric;
    use crate::assets::properties::build_properties;
    use approx::assert_relative_eq;

    fn deposit(id: &str, rate: f64) -> DepositController {
        let props = build_properties("test", id, base_date(), None).unwrap();
        DepositController::create(
            QuoteSet::from_market_quote(rate).unwrap(),
            props,
            CurrencyConventions::aud(),
        )
        .unwrap()
    }

    #[test]
    fn test_implied_quote_and_zero_npv() {
        let env = environment();
        let d = deposit("AUD-Deposit-3M", 0.04);
        let implied = d.implied_quote(&env).unwrap();
        // flat 4% continuous on ACT/365F is a little above 4% simple
        assert!(implied > 0.04 && implied < 0.0405);
        assert_relative_eq!(d.npv_at(&env, implied).unwrap(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_aud_settles_same_day() {
        let d = deposit("AUD-Deposit-3M", 0.04);
        assert_eq!(d.start(), base_date());
        assert_eq!(d.maturity(), Date::from_ymd(2025, 4, 15).unwrap());
        assert_relative_eq!(d.accrual_factor().unwrap(), 90.0 / 365.0);
    }

    #[test]
    fn test_node_estimate_reprices_single_curve() {
        let env = environment();
        let d = deposit("AUD-Deposit-6M", 0.05);
        let df = d.node_estimate(&env).unwrap();
        assert_relative_eq!(df, 1.0 / (1.0 + 0.05 * d.accrual_factor().unwrap()), epsilon = 1e-14);
    }

    #[test]
    fn test_delta_r_is_positive_for_receiver() {
        let env = environment();
        let d = deposit("AUD-Xibor-3M", 0.045);
        let valuation = d
            .calculate(&env, &[AssetMetric::NPV, AssetMetric::DeltaR, AssetMetric::AccrualFactor])
            .unwrap();
        let delta = valuation.get(AssetMetric::DeltaR).unwrap();
        let df = d.discount_factor_at_maturity(&env).unwrap();
        assert_relative_eq!(delta, 1e6 * d.accrual_factor().unwrap() * 1e-4 * df, epsilon = 1e-8);
        assert!(valuation.get(AssetMetric::NPV).unwrap() > 0.0);
    }

    #[test]
    fn test_unsupported_metric() {
        let env = environment();
        let d = deposit("AUD-Deposit-3M", 0.04);
        assert!(matches!(
            d.evaluate(&env, AssetMetric::VolatilityAtExpiry),
            Err(CurveError::UnsupportedMetric { .. })
        ));
    }
}
