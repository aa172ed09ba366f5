//! Batch valuation of independent assets.

use rayon::prelude::*;

use crate::assets::{AssetMetric, BasicAssetValuation, PriceableAsset};
use crate::environment::MarketEnvironment;
use crate::error::CurveResult;

/// Values every asset in parallel, one result per asset in input order.
///
/// The environment is shared read-only; a failure on one asset does not
/// affect the others.
pub fn value_assets(
    assets: &[Box<dyn PriceableAsset>],
    env: &MarketEnvironment,
    metrics: &[AssetMetric],
) -> Vec<CurveResult<BasicAssetValuation>> {
    assets
        .par_iter()
        .map(|asset| asset.calculate(env, metrics))
        .collect()
}

/// Sequential counterpart of [`value_assets`].
pub fn value_assets_sequential(
    assets: &[Box<dyn PriceableAsset>],
    env: &MarketEnvironment,
    metrics: &[AssetMetric],
) -> Vec<CurveResult<BasicAssetValuation>> {
    assets.iter().map(|asset| asset.calculate(env, metrics)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AssetFactory, QuoteSet};
    use crate::curves::RateCurve;
    use strata_config::InterpolationMethod;
    use strata_core::types::Date;

    #[test]
    fn test_parallel_matches_sequential_in_order() {
        let base = Date::from_ymd(2025, 1, 15).unwrap();
        let mut env = MarketEnvironment::new("test");
        env.add_pricing_structure(
            "RateCurve.AUD",
            RateCurve::new(base, vec![(1.0, 0.96), (10.0, 0.67)], InterpolationMethod::LogLinear, true).unwrap(),
        );
        let factory = AssetFactory::with_defaults();
        let ids = ["AUD-Deposit-3M", "AUD-IRSwap-2Y", "AUD-Fra-3M-3M", "AUD-IRSwap-7Y", "AUD-OIS-1Y"];
        let assets: Vec<Box<dyn PriceableAsset>> = ids
            .iter()
            .map(|id| {
                factory
                    .create_from_id("test", id, QuoteSet::from_market_quote(0.04).unwrap(), base, None)
                    .unwrap()
            })
            .collect();

        let metrics = [AssetMetric::ImpliedQuote, AssetMetric::NPV];
        let parallel = value_assets(&assets, &env, &metrics);
        let sequential = value_assets_sequential(&assets, &env, &metrics);
        for ((p, s), id) in parallel.iter().zip(&sequential).zip(ids) {
            let p = p.as_ref().unwrap();
            assert_eq!(p.identifier, id);
            assert_eq!(p, s.as_ref().unwrap());
        }
    }

    #[test]
    fn test_failures_are_per_asset() {
        let base = Date::from_ymd(2025, 1, 15).unwrap();
        let env = MarketEnvironment::new("empty");
        let factory = AssetFactory::with_defaults();
        let assets = vec![factory
            .create_from_id("test", "AUD-Deposit-3M", QuoteSet::from_market_quote(0.04).unwrap(), base, None)
            .unwrap()];
        let results = value_assets(&assets, &env, &[AssetMetric::NPV]);
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }
}
