//! Short-term interest rate futures.

use strata_config::CurrencyConventions;
use strata_core::types::{Date, Period};

use super::{simple_forward, AssetContext, PriceableAsset};
use crate::assets::identifier::AssetDescriptor;
use crate::assets::properties::AssetProperties;
use crate::assets::quotes::{futures_price_to_rate, MeasureType, QuoteSet, QuoteUnit};
use crate::environment::MarketEnvironment;
use crate::error::{CurveError, CurveResult};

/// Length of the underlying deposit.
const CONTRACT_PERIOD: Period = Period::months(3);

/// Margined rate future on a three month deposit starting at expiry.
///
/// Quotes may be prices (`Price` unit) or rates; all quote-space values this
/// controller returns are rates. An attached `Volatility` quote `σ` adds the
/// convexity adjustment `½σ²t₁t₂` to the forward.
#[derive(Debug, Clone)]
pub struct FutureController {
    ctx: AssetContext,
    start: Date,
    end: Date,
    accrual: f64,
}

impl FutureController {
    /// Builds the controller from a `Future` identifier.
    pub fn create(
        quotes: QuoteSet,
        properties: AssetProperties,
        conventions: CurrencyConventions,
    ) -> CurveResult<Self> {
        let ctx = AssetContext::new(properties, quotes, conventions);
        let AssetDescriptor::Future { expiry, .. } = ctx.properties().identifier.descriptor() else {
            return Err(CurveError::malformed(
                ctx.properties().identifier.to_string(),
                "future requires an expiry code",
            ));
        };
        let expiry_date = expiry.expiry_date(ctx.base_date(), ctx.conventions().futures_expiry_rule)?;
        let start = ctx.adjust(expiry_date)?;
        let end = ctx.adjust(CONTRACT_PERIOD.add_to(start)?)?;
        let accrual = ctx.conventions().money_market_day_count.year_fraction(start, end);
        Ok(Self {
            ctx,
            start,
            end,
            accrual,
        })
    }

    /// First day of the underlying deposit.
    #[must_use]
    pub fn start(&self) -> Date {
        self.start
    }

    /// Convexity adjustment in rate terms, zero without a volatility quote.
    #[must_use]
    pub fn convexity_adjustment(&self) -> f64 {
        match self.ctx.quotes().normalised(MeasureType::Volatility) {
            Some(sigma) => {
                let t1 = self.ctx.curve_time(self.start);
                let t2 = self.ctx.curve_time(self.end);
                0.5 * sigma * sigma * t1 * t2
            }
            None => 0.0,
        }
    }
}

impl PriceableAsset for FutureController {
    fn context(&self) -> &AssetContext {
        &self.ctx
    }

    fn context_mut(&mut self) -> &mut AssetContext {
        &mut self.ctx
    }

    fn maturity(&self) -> Date {
        self.end
    }

    fn market_quote(&self) -> CurveResult<f64> {
        let quote = self.ctx.quotes().market_quote()?;
        Ok(match quote.unit {
            QuoteUnit::Price => futures_price_to_rate(quote.value),
            _ => quote.normalised(),
        })
    }

    fn implied_quote(&self, env: &MarketEnvironment) -> CurveResult<f64> {
        Ok(self.forward_at_maturity(env)? + self.convexity_adjustment())
    }

    fn npv_at(&self, env: &MarketEnvironment, quote: f64) -> CurveResult<f64> {
        // long at price 1 - q gains as the implied rate falls below q
        Ok(self.ctx.notional() * self.accrual * (quote - self.implied_quote(env)?))
    }

    fn node_estimate(&self, env: &MarketEnvironment) -> CurveResult<f64> {
        let df_start = self.ctx.forecast_curve(env)?.discount_factor(self.start)?;
        let forward = self.market_quote()? - self.convexity_adjustment();
        Ok(df_start / (1.0 + forward * self.accrual))
    }

    fn accrual_factor(&self) -> CurveResult<f64> {
        Ok(self.accrual)
    }

    fn forward_at_maturity(&self, env: &MarketEnvironment) -> CurveResult<f64> {
        simple_forward(self.ctx.forecast_curve(env)?, self.start, self.end, self.accrual)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{base_date, environment};
    use super::*;
    use crate::assets::properties::build_properties;
    use crate::assets::quotes::BasicQuotation;
    use approx::assert_relative_eq;

    fn future(id: &str, quotes: QuoteSet, conventions: CurrencyConventions) -> FutureController {
        let props = build_properties("test", id, base_date(), None).unwrap();
        FutureController::create(quotes, props, conventions).unwrap()
    }

    #[test]
    fn test_imm_and_bank_bill_expiries() {
        let quotes = QuoteSet::from_market_quote(0.04).unwrap();
        let imm = future("USD-IRFuture-ED-H5", quotes.clone(), CurrencyConventions::usd());
        assert_eq!(imm.start(), Date::from_ymd(2025, 3, 19).unwrap());
        let bill = future("AUD-IRFuture-IR-H5", quotes, CurrencyConventions::aud());
        assert_eq!(bill.start(), Date::from_ymd(2025, 3, 14).unwrap());
    }

    #[test]
    fn test_price_quote_is_converted() {
        let quotes = QuoteSet::new([BasicQuotation::new(MeasureType::MarketQuote, QuoteUnit::Price, 95.75)]).unwrap();
        let f = future("AUD-IRFuture-IR-M5", quotes, CurrencyConventions::aud());
        assert_relative_eq!(f.market_quote().unwrap(), 0.0425, epsilon = 1e-14);
    }

    #[test]
    fn test_convexity_adjustment() {
        let env = environment();
        let quotes = QuoteSet::new([
            BasicQuotation::market_quote(0.04),
            BasicQuotation::volatility(0.01),
        ])
        .unwrap();
        let f = future("AUD-IRFuture-IR-Z6", quotes, CurrencyConventions::aud());
        let adj = f.convexity_adjustment();
        assert!(adj > 0.0);
        let forward = f.forward_at_maturity(&env).unwrap();
        assert_relative_eq!(f.implied_quote(&env).unwrap(), forward + adj, epsilon = 1e-15);
        assert_relative_eq!(f.npv_at(&env, forward + adj).unwrap(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_npv_is_not_discounted() {
        let env = environment();
        let f = future("AUD-IRFuture-IR-Z9", QuoteSet::from_market_quote(0.05).unwrap(), CurrencyConventions::aud());
        let implied = f.implied_quote(&env).unwrap();
        let expected = 1e6 * f.accrual_factor().unwrap() * (0.05 - implied);
        assert_relative_eq!(f.npv(&env).unwrap(), expected, epsilon = 1e-8);
    }
}
