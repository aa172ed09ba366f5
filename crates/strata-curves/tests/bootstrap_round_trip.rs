//! Integration test: build a small AUD market and reprice every input.
//!
//! | Curve | Instruments |
//! |-------|-------------|
//! | `RateCurve.AUD` | OIS 1M to 10Y |
//! | `RateCurve.AUD-3M` | 3M fixing, FRAs, futures, 3M swaps |
//! | `InflationCurve.AUD-CPI` | CPI levels 1Y to 10Y |
//! | `CommodityCurve.USD-ICE_B` | Brent spot and forwards |

use approx::assert_relative_eq;
use strata_config::InterpolationMethod;
use strata_core::types::Date;
use strata_curves::assets::{AssetMetric, PriceableAsset};
use strata_curves::prelude::*;
use strata_curves::valuation::value_assets;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn base_date() -> Date {
    Date::from_ymd(2025, 1, 15).unwrap()
}

fn quotes(instruments: &[(&'static str, f64)]) -> Vec<(&'static str, QuoteSet)> {
    instruments
        .iter()
        .map(|&(id, q)| (id, QuoteSet::from_market_quote(q).unwrap()))
        .collect()
}

const OIS: [(&str, f64); 7] = [
    ("AUD-OIS-1M", 0.0410),
    ("AUD-OIS-3M", 0.0405),
    ("AUD-OIS-6M", 0.0398),
    ("AUD-OIS-1Y", 0.0385),
    ("AUD-OIS-2Y", 0.0372),
    ("AUD-OIS-5Y", 0.0381),
    ("AUD-OIS-10Y", 0.0410),
];

const FORECAST_3M: [(&str, f64); 7] = [
    ("AUD-Xibor-3M", 0.0428),
    ("AUD-Fra-3M-3M", 0.0421),
    ("AUD-Fra-6M-3M", 0.0412),
    ("AUD-IRSwap-2Y-3M", 0.0398),
    ("AUD-IRSwap-3Y-3M", 0.0399),
    ("AUD-IRSwap-5Y-3M", 0.0410),
    ("AUD-IRSwap-10Y-3M", 0.0438),
];

fn discount_curve() -> PricingStructure {
    let result = CurveBootstrapper::new(CurveProperties::rate("RateCurve.AUD", base_date()))
        .add_instruments(quotes(&OIS))
        .bootstrap_validated()
        .unwrap();
    assert!(result.is_valid(), "{}", result.repricing_report);
    result.curve
}

fn market() -> MarketEnvironment {
    let mut env = MarketEnvironment::new("AUD EOD");
    env.add_pricing_structure("RateCurve.AUD", discount_curve());

    let forecast = CurveBootstrapper::new(
        CurveProperties::rate("RateCurve.AUD-3M", base_date()).with_discount_curve("RateCurve.AUD"),
    )
    .with_environment(env.clone())
    .add_instruments(quotes(&FORECAST_3M))
    .bootstrap_validated()
    .unwrap();
    assert!(forecast.is_valid(), "{}", forecast.repricing_report);
    env.add_pricing_structure("RateCurve.AUD-3M", forecast.curve);
    env
}

#[test]
fn test_discount_curve_reprices_ois() {
    init_tracing();
    let curve = discount_curve();
    let rate_curve = curve.as_rate_curve().unwrap();
    assert_relative_eq!(rate_curve.discount_factor(base_date()).unwrap(), 1.0);
    assert_eq!(rate_curve.nodes().len(), OIS.len() + 1);
}

#[test]
fn test_forecast_curve_prices_inputs_to_zero_npv() {
    init_tracing();
    let env = market();
    let factory = AssetFactory::with_defaults();
    let assets: Vec<Box<dyn PriceableAsset>> = FORECAST_3M
        .iter()
        .map(|&(id, q)| {
            let props = strata_curves::assets::build_properties("desk", id, base_date(), None)
                .unwrap()
                .with_discount_curve("RateCurve.AUD")
                .with_forecast_curve("RateCurve.AUD-3M");
            let conventions = factory.conventions_for(&props);
            factory
                .create(QuoteSet::from_market_quote(q).unwrap(), props, conventions)
                .unwrap()
        })
        .collect();

    let results = value_assets(&assets, &env, &[AssetMetric::NPV, AssetMetric::ImpliedQuote]);
    for ((id, quote), result) in FORECAST_3M.iter().zip(results) {
        let valuation = result.unwrap();
        assert_eq!(valuation.identifier, *id);
        assert!(valuation.get(AssetMetric::NPV).unwrap().abs() < 1e-3, "{id}");
        assert_relative_eq!(valuation.get(AssetMetric::ImpliedQuote).unwrap(), *quote, epsilon = 1e-10);
    }
}

#[test]
fn test_higher_swap_quote_lowers_long_discount_factor() {
    init_tracing();
    let mut bumped = OIS;
    bumped[6].1 += 0.0010;
    let date = base_date().add_years(10).unwrap();

    let base = discount_curve();
    let bumped = CurveBootstrapper::new(CurveProperties::rate("RateCurve.AUD", base_date()))
        .add_instruments(quotes(&bumped))
        .bootstrap()
        .unwrap();
    let df = base.as_rate_curve().unwrap().discount_factor(date).unwrap();
    let df_bumped = bumped.as_rate_curve().unwrap().discount_factor(date).unwrap();
    assert!(df_bumped < df);
}

#[test]
fn test_futures_strip() {
    init_tracing();
    let instruments = [
        ("AUD-Deposit-1M", 0.0412),
        ("AUD-IRFuture-IR-H5", 0.0405),
        ("AUD-IRFuture-IR-M5", 0.0398),
        ("AUD-IRFuture-IR-U5", 0.0391),
        ("AUD-IRFuture-IR-Z5", 0.0386),
        ("AUD-IRSwap-2Y", 0.0390),
        ("AUD-IRSwap-3Y", 0.0395),
    ];
    let result = CurveBootstrapper::new(CurveProperties::rate("RateCurve.AUD", base_date()))
        .with_interpolation(InterpolationMethod::LogLinear)
        .add_instruments(quotes(&instruments))
        .bootstrap_validated()
        .unwrap();
    assert!(result.is_valid(), "{}", result.repricing_report);
}

#[test]
fn test_inflation_curve() {
    init_tracing();
    let result = CurveBootstrapper::new(CurveProperties::index(
        "InflationCurve.AUD-CPI",
        base_date(),
        IndexKind::Inflation,
    ))
    .with_interpolation(InterpolationMethod::LogLinear)
    .with_environment(market())
    .add_instrument("AUD-CPIndex-1Y", QuoteSet::from_market_quote(133.2).unwrap())
    .add_instrument("AUD-CPIndex-2Y", QuoteSet::from_market_quote(136.5).unwrap())
    .add_instrument("AUD-CPIndex-5Y", QuoteSet::from_market_quote(146.1).unwrap())
    .add_instrument("AUD-CPIndex-10Y", QuoteSet::from_market_quote(164.0).unwrap())
    .bootstrap_validated()
    .unwrap();
    assert!(result.is_valid(), "{}", result.repricing_report);
    let curve = result.curve.as_index_curve().unwrap();
    assert_eq!(curve.interpolation(), LevelInterpolation::LogLinear);
}

#[test]
fn test_commodity_curve() {
    init_tracing();
    let result = CurveBootstrapper::new(
        CurveProperties::from_name("CommodityCurve.USD-ICE_B", base_date()).unwrap(),
    )
    .add_instrument("USD-CommoditySpot-ICE_B", QuoteSet::from_market_quote(78.40).unwrap())
    .add_instrument("USD-CommodityForward-ICE_B-3M", QuoteSet::from_market_quote(77.90).unwrap())
    .add_instrument("USD-CommodityForward-ICE_B-6M", QuoteSet::from_market_quote(77.10).unwrap())
    .add_instrument("USD-CommodityForward-ICE_B-1Y", QuoteSet::from_market_quote(75.80).unwrap())
    .bootstrap_validated()
    .unwrap();
    assert!(result.is_valid(), "{}", result.repricing_report);
}

#[test]
fn test_structures_survive_json() {
    init_tracing();
    let env = market();
    let forecast = env.get("RateCurve.AUD-3M").unwrap();
    let json = serde_json::to_string(forecast).unwrap();
    let back: PricingStructure = serde_json::from_str(&json).unwrap();
    assert_eq!(&back, forecast);
}
