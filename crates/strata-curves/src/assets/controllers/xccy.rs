//! Cross-currency swaps on the local-currency leg.

use strata_config::CurrencyConventions;
use strata_core::types::{Date, Frequency};

use super::legs::Leg;
use super::{AssetContext, PriceableAsset};
use crate::assets::identifier::{AssetDescriptor, AssetFamily};
use crate::assets::properties::AssetProperties;
use crate::assets::quotes::QuoteSet;
use crate::environment::MarketEnvironment;
use crate::error::{CurveError, CurveResult};

/// Local-currency leg of a cross-currency swap with principal exchanges.
///
/// The other currency's leg is worth par, so the local leg including the
/// initial and final exchanges must also be worth par when discounted on the
/// cross-currency basis curve:
///
/// ```text
/// -DF(s) + Σ τᵢ (Lᵢ + q) DF(tᵢ) + DF(e) = 0
/// ```
///
/// `Lᵢ` is zero for `XccySwap` (fixed rate `q`) and the forecast-curve
/// forward for `XccyBasisSwap` (spread `q`).
#[derive(Debug, Clone)]
pub struct XccyController {
    ctx: AssetContext,
    leg: Leg,
    floating: bool,
}

impl XccyController {
    /// Builds the controller from a `Swap` identifier.
    pub fn create(
        quotes: QuoteSet,
        properties: AssetProperties,
        conventions: CurrencyConventions,
    ) -> CurveResult<Self> {
        let floating = properties.family() == AssetFamily::XccyBasisSwap;
        let ctx = AssetContext::new(properties, quotes, conventions);
        let AssetDescriptor::Swap { term, index_tenor } = ctx.properties().identifier.descriptor() else {
            return Err(CurveError::malformed(
                ctx.properties().identifier.to_string(),
                "cross-currency swap requires a term",
            ));
        };
        let conv = ctx.conventions();
        let start = ctx.spot_date();
        let end = term.add_to(start)?;
        let (frequency, day_count) = if floating {
            let frequency = (*index_tenor)
                .and_then(Frequency::from_period)
                .unwrap_or(conv.floating_frequency);
            (frequency, conv.money_market_day_count)
        } else {
            (conv.fixed_frequency, conv.fixed_leg_day_count)
        };
        let leg = Leg::generate(&ctx, start, end, frequency, day_count)?;
        Ok(Self { ctx, leg, floating })
    }

    /// (principal exchanges PV, annuity, projected coupons PV)
    fn components(&self, env: &MarketEnvironment) -> CurveResult<(f64, f64, f64)> {
        let discount = self.ctx.discount_curve(env)?;
        let principal = discount.discount_factor(self.leg.end())? - discount.discount_factor(self.leg.start())?;
        let annuity = self.leg.annuity(discount)?;
        let projected = if self.floating {
            self.leg.floating_pv(discount, self.ctx.forecast_curve(env)?)?
        } else {
            0.0
        };
        Ok((principal, annuity, projected))
    }
}

impl PriceableAsset for XccyController {
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
        let (principal, annuity, projected) = self.components(env)?;
        Ok(-(principal + projected) / annuity)
    }

    fn npv_at(&self, env: &MarketEnvironment, quote: f64) -> CurveResult<f64> {
        let (principal, annuity, projected) = self.components(env)?;
        Ok(self.ctx.notional() * (principal + projected + quote * annuity))
    }

    fn node_estimate(&self, env: &MarketEnvironment) -> CurveResult<f64> {
        let end = self.maturity();
        let t = self.ctx.curve_time(end);
        let q = self.market_quote()?;
        if self.floating {
            let projected = self.ctx.forecast_curve(env)?.discount_factor(end)?;
            Ok(projected * (-q * t).exp())
        } else {
            Ok((-q * t).exp())
        }
    }

    fn accrual_factor(&self) -> CurveResult<f64> {
        Ok(self.leg.periods().iter().map(|p| p.accrual).sum())
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{base_date, environment};
    use super::*;
    use crate::assets::properties::build_properties;
    use approx::assert_relative_eq;

    fn xccy(id: &str, quote: f64) -> XccyController {
        let props = build_properties("test", id, base_date(), None).unwrap();
        XccyController::create(QuoteSet::from_market_quote(quote).unwrap(), props, CurrencyConventions::aud())
            .unwrap()
    }

    #[test]
    fn test_fixed_rate_is_par_on_basis_curve() {
        let env = environment();
        let swap = xccy("AUD-XccySwap-5Y", 0.04);
        let rate = swap.implied_quote(&env).unwrap();
        assert!(rate > 0.038 && rate < 0.041, "{rate}");
        assert_relative_eq!(swap.npv_at(&env, rate).unwrap(), 0.0, epsilon = 1e-7);
    }

    #[test]
    fn test_basis_spread_sign() {
        let env = environment();
        let basis = xccy("AUD-XccyBasisSwap-5Y-3M", 0.0);
        // basis curve discounts below the forecast curve: local leg needs a negative spread
        let spread = basis.implied_quote(&env).unwrap();
        assert!(spread < 0.0 && spread > -0.002, "{spread}");
        assert_relative_eq!(basis.npv_at(&env, spread).unwrap(), 0.0, epsilon = 1e-7);
    }
}
