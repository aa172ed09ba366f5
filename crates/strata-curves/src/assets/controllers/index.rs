//! FX, commodity and CPI level assets.

use strata_config::CurrencyConventions;
use strata_core::types::{Date, ExpiryRule, Tenor};

use super::{AssetContext, PriceableAsset};
use crate::assets::identifier::{AssetDescriptor, AssetFamily};
use crate::assets::properties::AssetProperties;
use crate::assets::quotes::QuoteSet;
use crate::curves::IndexKind;
use crate::environment::MarketEnvironment;
use crate::error::{CurveError, CurveResult};

/// An asset quoted as an index level at a single value date.
///
/// The level comes from the asset's index curve. NPV is `N (L - q)`,
/// discounted on the discount curve when the environment holds it.
#[derive(Debug, Clone)]
pub struct IndexLevelController {
    ctx: AssetContext,
    kind: IndexKind,
    value_date: Date,
}

impl IndexLevelController {
    /// Builds the controller for any FX, commodity or CPI identifier.
    pub fn create(
        quotes: QuoteSet,
        properties: AssetProperties,
        conventions: CurrencyConventions,
    ) -> CurveResult<Self> {
        let family = properties.family();
        let ctx = AssetContext::new(properties, quotes, conventions);
        let conv = ctx.conventions();
        let id = &ctx.properties().identifier;
        let (kind, value_date) = match (family, id.descriptor()) {
            (AssetFamily::FxSpot | AssetFamily::FxForward, AssetDescriptor::Term { tenor }) => {
                (IndexKind::Fx, ctx.tenor_dates(*tenor, conv.fx_spot_lag)?.1)
            }
            (AssetFamily::CommoditySpot | AssetFamily::CommodityForward, AssetDescriptor::Commodity { tenor, .. }) => {
                let tenor = tenor.unwrap_or(Tenor::Spot);
                (IndexKind::Commodity, ctx.tenor_dates(tenor, conv.spot_lag)?.1)
            }
            (AssetFamily::CommodityFuture, AssetDescriptor::Future { expiry, .. }) => {
                let expiry = expiry.expiry_date(ctx.base_date(), ExpiryRule::ImmThirdWednesday)?;
                (IndexKind::Commodity, ctx.adjust(expiry)?)
            }
            (AssetFamily::CPIndex, AssetDescriptor::Term { tenor }) => {
                (IndexKind::Inflation, ctx.adjust(tenor.add_to(ctx.base_date())?)?)
            }
            _ => {
                return Err(CurveError::malformed(
                    id.to_string(),
                    format!("{family} is not an index level asset"),
                ))
            }
        };
        Ok(Self {
            ctx,
            kind,
            value_date,
        })
    }

    /// What the level represents.
    #[must_use]
    pub fn kind(&self) -> IndexKind {
        self.kind
    }

    fn level(&self, env: &MarketEnvironment) -> CurveResult<f64> {
        self.ctx.index_curve(env)?.level(self.value_date)
    }
}

impl PriceableAsset for IndexLevelController {
    fn context(&self) -> &AssetContext {
        &self.ctx
    }

    fn context_mut(&mut self) -> &mut AssetContext {
        &mut self.ctx
    }

    fn maturity(&self) -> Date {
        self.value_date
    }

    fn implied_quote(&self, env: &MarketEnvironment) -> CurveResult<f64> {
        self.level(env)
    }

    fn npv_at(&self, env: &MarketEnvironment, quote: f64) -> CurveResult<f64> {
        let name = &self.ctx.properties().discount_curve;
        let df = if env.contains(name) {
            env.rate_curve(name)?.discount_factor(self.value_date)?
        } else {
            1.0
        };
        Ok(self.ctx.notional() * (self.level(env)? - quote) * df)
    }

    fn forward_at_maturity(&self, env: &MarketEnvironment) -> CurveResult<f64> {
        self.level(env)
    }

    fn index_at_maturity(&self, env: &MarketEnvironment) -> CurveResult<f64> {
        self.level(env)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{base_date, environment};
    use super::*;
    use crate::assets::metrics::AssetMetric;
    use crate::assets::properties::build_properties;
    use approx::assert_relative_eq;

    fn level(id: &str, quote: f64, conventions: CurrencyConventions) -> IndexLevelController {
        let props = build_properties("test", id, base_date(), None).unwrap();
        IndexLevelController::create(QuoteSet::from_market_quote(quote).unwrap(), props, conventions).unwrap()
    }

    #[test]
    fn test_fx_value_dates() {
        let spot = level("AUDUSD-FxSpot-SP", 0.65, CurrencyConventions::usd());
        assert_eq!(spot.maturity(), Date::from_ymd(2025, 1, 17).unwrap());
        let forward = level("AUDUSD-FxForward-1M", 0.65, CurrencyConventions::usd());
        assert_eq!(forward.maturity(), Date::from_ymd(2025, 2, 17).unwrap());
        assert_eq!(forward.kind(), IndexKind::Fx);
    }

    #[test]
    fn test_fx_npv_discounted_on_quote_currency() {
        let env = environment();
        let fwd = level("AUDUSD-FxForward-6M", 0.64, CurrencyConventions::usd());
        let outright = fwd.implied_quote(&env).unwrap();
        let df = env.rate_curve("RateCurve.USD").unwrap().discount_factor(fwd.maturity()).unwrap();
        assert_relative_eq!(fwd.npv(&env).unwrap(), 1e6 * (outright - 0.64) * df, epsilon = 1e-8);
        assert_relative_eq!(fwd.evaluate(&env, AssetMetric::DeltaR).unwrap(), -1e6 * 1e-4 * df, epsilon = 1e-8);
    }

    #[test]
    fn test_undiscounted_without_rate_curve() {
        let mut env = environment();
        env.remove("RateCurve.USD");
        let fut = level("USD-CommodityFuture-CL-Z5", 70.0, CurrencyConventions::usd());
        assert_eq!(fut.maturity(), Date::from_ymd(2025, 12, 17).unwrap());
        let l = fut.index_at_maturity(&env).unwrap();
        assert_relative_eq!(fut.npv(&env).unwrap(), 1e6 * (l - 70.0), epsilon = 1e-6);
    }

    #[test]
    fn test_cpi_level() {
        let env = environment();
        let cpi = level("AUD-CPIndex-1Y", 133.0, CurrencyConventions::aud());
        assert_eq!(cpi.maturity(), Date::from_ymd(2026, 1, 15).unwrap());
        assert_relative_eq!(cpi.implied_quote(&env).unwrap(), 133.25, epsilon = 1e-9);
        assert_relative_eq!(cpi.node_estimate(&env).unwrap(), 133.0);
    }
}
