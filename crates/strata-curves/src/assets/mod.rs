//! Priceable assets: identifiers, quotes, properties, controllers and the
//! factory that ties them together.

pub mod controllers;
mod factory;
mod identifier;
mod metrics;
mod properties;
mod quotes;

pub use controllers::{calibration_role, AssetContext, CurveRole, PriceableAsset, ONE_BASIS_POINT};
pub use factory::{AssetConstructor, AssetFactory};
pub use identifier::{AssetDescriptor, AssetFamily, AssetIdentifier};
pub use metrics::{AssetMetric, BasicAssetValuation, MetricValue};
pub use properties::{build_properties, AssetProperties, DEFAULT_NOTIONAL};
pub use quotes::{
    futures_price_to_rate, rate_to_futures_price, BasicQuotation, MeasureType, QuoteSet, QuoteUnit,
};
