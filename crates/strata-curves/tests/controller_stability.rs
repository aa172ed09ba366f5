//! Integration test: controller metrics are repeatable and respond to quote
//! changes on a bootstrapped AUD discount curve.

use strata_core::types::Date;
use strata_curves::assets::{AssetMetric, PriceableAsset};
use strata_curves::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn base_date() -> Date {
    Date::from_ymd(2025, 1, 15).unwrap()
}

const BUMP: f64 = 0.001;

const METRICS: [AssetMetric; 3] = [
    AssetMetric::NPV,
    AssetMetric::ImpliedQuote,
    AssetMetric::DiscountFactorAtMaturity,
];

const INSTRUMENTS: [(&str, f64); 6] = [
    ("AUD-Deposit-3M", 0.0412),
    ("AUD-Fra-3M-3M", 0.0405),
    ("AUD-IRFuture-IR-M5", 0.0398),
    ("AUD-IRSwap-2Y", 0.0390),
    ("AUD-IRSwap-5Y-3M", 0.0401),
    ("AUD-OIS-1Y", 0.0385),
];

fn market() -> MarketEnvironment {
    let ois = [
        ("AUD-OIS-1M", 0.0410),
        ("AUD-OIS-3M", 0.0405),
        ("AUD-OIS-6M", 0.0398),
        ("AUD-OIS-1Y", 0.0385),
        ("AUD-OIS-2Y", 0.0372),
        ("AUD-OIS-5Y", 0.0381),
        ("AUD-OIS-10Y", 0.0410),
    ];
    let mut bootstrapper = CurveBootstrapper::new(CurveProperties::rate("RateCurve.AUD", base_date()));
    for (id, quote) in ois {
        bootstrapper = bootstrapper.add_instrument(id, QuoteSet::from_market_quote(quote).unwrap());
    }
    let curve = bootstrapper.bootstrap().unwrap();
    let mut env = MarketEnvironment::new("AUD EOD");
    env.add_pricing_structure("RateCurve.AUD", curve);
    env
}

fn create(id: &str, quote: f64) -> Box<dyn PriceableAsset> {
    AssetFactory::with_defaults()
        .create_from_id(
            "desk",
            id,
            QuoteSet::from_market_quote(quote).unwrap(),
            base_date(),
            None,
        )
        .unwrap()
}

/// Metric changes for a quote bump, in `METRICS` order.
fn bump_deltas(env: &MarketEnvironment, id: &str, quote: f64) -> Vec<f64> {
    let mut asset = create(id, quote);
    let base = asset.calculate(env, &METRICS).unwrap();
    asset.set_market_quote(quote + BUMP).unwrap();
    let bumped = asset.calculate(env, &METRICS).unwrap();
    METRICS
        .iter()
        .map(|&m| bumped.get(m).unwrap() - base.get(m).unwrap())
        .collect()
}

#[test]
fn test_repeated_calculation_is_identical() {
    init_tracing();
    let env = market();
    for (id, quote) in INSTRUMENTS {
        let asset = create(id, quote);
        let first = asset.calculate(&env, &METRICS).unwrap();
        let second = asset.calculate(&env, &METRICS).unwrap();
        assert_eq!(first, second, "{id}");
        assert_eq!(first.identifier, id);
    }
}

#[test]
fn test_quote_bump_deltas_are_finite_and_repeatable() {
    init_tracing();
    let env = market();
    for (id, quote) in INSTRUMENTS {
        let deltas = bump_deltas(&env, id, quote);
        assert!(deltas.iter().all(|d| d.is_finite()), "{id}: {deltas:?}");
        assert_eq!(deltas, bump_deltas(&env, id, quote), "{id}");

        // only NPV depends on the quote
        assert!(deltas[0] != 0.0, "{id}");
        assert_eq!(deltas[1], 0.0, "{id}");
        assert_eq!(deltas[2], 0.0, "{id}");
    }
}

#[test]
fn test_set_market_quote_round_trips() {
    init_tracing();
    let env = market();
    for (id, quote) in INSTRUMENTS {
        let mut asset = create(id, quote);
        let npv = asset.npv(&env).unwrap();
        asset.set_market_quote(quote + BUMP).unwrap();
        assert!((asset.market_quote().unwrap() - (quote + BUMP)).abs() < 1e-15, "{id}");
        asset.set_market_quote(quote).unwrap();
        assert_eq!(asset.npv(&env).unwrap(), npv, "{id}");
    }
}
