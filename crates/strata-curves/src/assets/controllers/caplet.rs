//! Caplets and floorlets under the Black model.

use statrs::distribution::{ContinuousCDF, Normal};
use strata_config::CurrencyConventions;
use strata_core::types::Date;

use super::{simple_forward, AssetContext, PriceableAsset, ONE_BASIS_POINT};
use crate::assets::identifier::{AssetDescriptor, AssetFamily};
use crate::assets::properties::AssetProperties;
use crate::assets::quotes::{MeasureType, QuoteSet};
use crate::environment::MarketEnvironment;
use crate::error::{CurveError, CurveResult};

/// Undiscounted Black value of a call (`is_call`) or put on a forward.
///
/// Expired options and zero volatility return intrinsic value.
pub fn black_forward_premium(
    forward: f64,
    strike: f64,
    volatility: f64,
    expiry: f64,
    is_call: bool,
) -> CurveResult<f64> {
    let intrinsic = if is_call {
        (forward - strike).max(0.0)
    } else {
        (strike - forward).max(0.0)
    };
    let std_dev = volatility * expiry.max(0.0).sqrt();
    if std_dev <= 0.0 || forward <= 0.0 || strike <= 0.0 {
        return Ok(intrinsic);
    }
    let normal = Normal::new(0.0, 1.0).map_err(|e| CurveError::invalid_quote(e.to_string()))?;
    let d1 = ((forward / strike).ln() + 0.5 * std_dev * std_dev) / std_dev;
    let d2 = d1 - std_dev;
    Ok(if is_call {
        forward * normal.cdf(d1) - strike * normal.cdf(d2)
    } else {
        strike * normal.cdf(-d2) - forward * normal.cdf(-d1)
    })
}

/// Caplet, floorlet and their bank bill variants.
///
/// The option expires at the start of its forward period. Volatility comes
/// from the environment's volatility curve when it holds one under the
/// asset's index curve name, otherwise from the attached `Volatility` quote.
/// Bill variants accrue on the bill day count and settle at period start
/// discounted at the forward.
///
/// These assets never calibrate a curve; quote-space metrics are in forward
/// rate terms and `DeltaR` bumps the forward.
#[derive(Debug, Clone)]
pub struct CapletController {
    ctx: AssetContext,
    start: Date,
    end: Date,
    accrual: f64,
    strike: f64,
    is_call: bool,
    bill: bool,
}

impl CapletController {
    /// Builds the controller from an `Optionlet` identifier.
    pub fn create(
        quotes: QuoteSet,
        properties: AssetProperties,
        conventions: CurrencyConventions,
    ) -> CurveResult<Self> {
        let family = properties.family();
        let is_call = matches!(family, AssetFamily::Caplet | AssetFamily::BillCaplet);
        let bill = matches!(family, AssetFamily::BillCaplet | AssetFamily::BillFloorlet);
        let ctx = AssetContext::new(properties, quotes, conventions);
        let AssetDescriptor::Optionlet {
            start,
            index_tenor,
            strike,
            ..
        } = ctx.properties().identifier.descriptor()
        else {
            return Err(CurveError::malformed(
                ctx.properties().identifier.to_string(),
                "optionlet requires start, index tenor and strike",
            ));
        };
        let strike = *strike;
        let unadjusted = start.add_to(ctx.spot_date())?;
        let period_start = ctx.adjust(unadjusted)?;
        let period_end = ctx.adjust(index_tenor.add_to(unadjusted)?)?;
        let day_count = if bill {
            ctx.conventions().bill_day_count
        } else {
            ctx.conventions().money_market_day_count
        };
        let accrual = day_count.year_fraction(period_start, period_end);
        Ok(Self {
            ctx,
            start: period_start,
            end: period_end,
            accrual,
            strike,
            is_call,
            bill,
        })
    }

    /// Option expiry (period start).
    #[must_use]
    pub fn expiry(&self) -> Date {
        self.start
    }

    /// Decimal strike.
    #[must_use]
    pub fn strike(&self) -> f64 {
        self.strike
    }

    fn volatility(&self, env: &MarketEnvironment) -> CurveResult<f64> {
        if let Some(name) = self.ctx.properties().index_curve.as_deref() {
            if env.contains(name) {
                return env.volatility_curve(name)?.volatility(self.start);
            }
        }
        self.ctx
            .quotes()
            .normalised(MeasureType::Volatility)
            .ok_or_else(|| {
                let name = self
                    .ctx
                    .properties()
                    .index_curve
                    .clone()
                    .unwrap_or_else(|| "volatility quote".to_string());
                CurveError::missing(name)
            })
    }
}

impl PriceableAsset for CapletController {
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
        self.forward_at_maturity(env)
    }

    /// Premium with the forward set to `quote`.
    fn npv_at(&self, env: &MarketEnvironment, quote: f64) -> CurveResult<f64> {
        let sigma = self.volatility(env)?;
        let expiry = self.ctx.curve_time(self.start);
        let premium = black_forward_premium(quote, self.strike, sigma, expiry, self.is_call)?;
        let discount = self.ctx.discount_curve(env)?;
        let df = if self.bill {
            discount.discount_factor(self.start)? / (1.0 + quote * self.accrual)
        } else {
            discount.discount_factor(self.end)?
        };
        Ok(self.ctx.notional() * self.accrual * premium * df)
    }

    fn npv(&self, env: &MarketEnvironment) -> CurveResult<f64> {
        self.npv_at(env, self.forward_at_maturity(env)?)
    }

    fn delta_r(&self, env: &MarketEnvironment) -> CurveResult<f64> {
        let forward = self.forward_at_maturity(env)?;
        Ok(self.npv_at(env, forward + ONE_BASIS_POINT)? - self.npv_at(env, forward)?)
    }

    fn accrual_factor(&self) -> CurveResult<f64> {
        Ok(self.accrual)
    }

    fn volatility_at_expiry(&self, env: &MarketEnvironment) -> CurveResult<f64> {
        self.volatility(env)
    }

    fn forward_at_maturity(&self, env: &MarketEnvironment) -> CurveResult<f64> {
        simple_forward(self.ctx.forecast_curve(env)?, self.start, self.end, self.accrual)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{base_date, environment};
    use super::*;
    use crate::assets::metrics::AssetMetric;
    use crate::assets::properties::build_properties;
    use crate::assets::quotes::BasicQuotation;
    use approx::assert_relative_eq;

    fn caplet(id: &str, quotes: QuoteSet) -> CapletController {
        let props = build_properties("test", id, base_date(), None).unwrap();
        CapletController::create(quotes, props, CurrencyConventions::aud()).unwrap()
    }

    #[test]
    fn test_black_put_call_parity() {
        let call = black_forward_premium(0.05, 0.045, 0.2, 1.5, true).unwrap();
        let put = black_forward_premium(0.05, 0.045, 0.2, 1.5, false).unwrap();
        assert_relative_eq!(call - put, 0.005, epsilon = 1e-15);
        assert_relative_eq!(black_forward_premium(0.05, 0.045, 0.0, 1.5, true).unwrap(), 0.005);
    }

    #[test]
    fn test_volatility_from_environment() {
        let env = environment();
        let c = caplet("AUD-Caplet-6M-3M-0.04", QuoteSet::default());
        let sigma = c.volatility_at_expiry(&env).unwrap();
        let expected = env
            .volatility_curve("VolatilityCurve.AUD-3M")
            .unwrap()
            .volatility(c.expiry())
            .unwrap();
        assert_relative_eq!(sigma, expected);
        assert!(c.npv(&env).unwrap() > 0.0);
    }

    #[test]
    fn test_volatility_quote_fallback() {
        let mut env = environment();
        env.remove("VolatilityCurve.AUD-3M");
        let quotes = QuoteSet::new([BasicQuotation::volatility(0.3)]).unwrap();
        let c = caplet("AUD-Floorlet-1Y-3M-0.045", quotes);
        assert_relative_eq!(c.volatility_at_expiry(&env).unwrap(), 0.3);

        let bare = caplet("AUD-Floorlet-1Y-3M-0.045", QuoteSet::default());
        assert!(matches!(
            bare.volatility_at_expiry(&env),
            Err(CurveError::MissingMarketData { .. })
        ));
    }

    #[test]
    fn test_caplet_floorlet_parity() {
        let env = environment();
        let cap = caplet("AUD-Caplet-1Y-3M-0.04", QuoteSet::default());
        let floor = caplet("AUD-Floorlet-1Y-3M-0.04", QuoteSet::default());
        let forward = cap.implied_quote(&env).unwrap();
        let df = cap.discount_factor_at_maturity(&env).unwrap();
        let tau = cap.accrual_factor().unwrap();
        let parity = 1e6 * tau * (forward - 0.04) * df;
        assert_relative_eq!(
            cap.npv(&env).unwrap() - floor.npv(&env).unwrap(),
            parity,
            epsilon = 1e-8
        );
    }

    #[test]
    fn test_delta_signs() {
        let env = environment();
        let cap = caplet("AUD-BillCaplet-6M-3M-0.04", QuoteSet::default());
        let floor = caplet("AUD-BillFloorlet-6M-3M-0.04", QuoteSet::default());
        assert!(cap.evaluate(&env, AssetMetric::DeltaR).unwrap() > 0.0);
        assert!(floor.evaluate(&env, AssetMetric::DeltaR).unwrap() < 0.0);
    }
}
