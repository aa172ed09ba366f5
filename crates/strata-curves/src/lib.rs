//! # Strata Curves
//!
//! Asset valuation and curve construction for the Strata analytics library.
//!
//! This crate provides:
//!
//! - **Assets**: identifier grammar for 22 instrument families, quotes,
//!   typed properties and the [`AssetFactory`](assets::AssetFactory)
//! - **Controllers**: priceable assets producing NPV, implied quote,
//!   discount factor, accrual, delta and volatility metrics
//! - **Pricing structures**: rate, index and volatility curves
//! - **Market environment**: named structures shared between valuations
//! - **Bootstrap**: node-by-node construction of rate and index curves
//! - **Repricing**: validation reports for bootstrapped curves
//!
//! ## Quick Start
//!
//! ```rust
//! use strata_core::types::Date;
//! use strata_curves::prelude::*;
//!
//! let base = Date::from_ymd(2025, 1, 15).unwrap();
//! let result = CurveBootstrapper::new(CurveProperties::rate("RateCurve.AUD", base))
//!     .add_instrument("AUD-Deposit-3M", QuoteSet::from_market_quote(0.0410).unwrap())
//!     .add_instrument("AUD-IRSwap-2Y", QuoteSet::from_market_quote(0.0433).unwrap())
//!     .add_instrument("AUD-IRSwap-5Y", QuoteSet::from_market_quote(0.0452).unwrap())
//!     .bootstrap_validated()
//!     .unwrap();
//! assert!(result.is_valid());
//!
//! let mut env = MarketEnvironment::new("EOD");
//! env.add_pricing_structure("RateCurve.AUD", result.curve);
//!
//! let swap = AssetFactory::with_defaults()
//!     .create_from_id("desk", "AUD-IRSwap-3Y", QuoteSet::from_market_quote(0.045).unwrap(), base, None)
//!     .unwrap();
//! let par = swap.implied_quote(&env).unwrap();
//! assert!(par > 0.04 && par < 0.05);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::many_single_char_names)]

pub mod assets;
pub mod bootstrap;
pub mod curves;
pub mod environment;
pub mod error;
pub mod repricing;
pub mod valuation;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::assets::{
        AssetFactory, AssetFamily, AssetIdentifier, AssetMetric, AssetProperties, BasicAssetValuation,
        BasicQuotation, MeasureType, PriceableAsset, QuoteSet, QuoteUnit,
    };
    pub use crate::bootstrap::{bootstrap, CurveBootstrapper, CurveKind, CurveProperties};
    pub use crate::curves::{
        IndexCurve, IndexKind, LevelInterpolation, PricingStructure, RateCurve, VolatilityCurve,
    };
    pub use crate::environment::MarketEnvironment;
    pub use crate::error::{CurveError, CurveResult};
    pub use crate::repricing::{BootstrapResult, RepricingCheck, RepricingReport, REPRICING_TOLERANCE};
    pub use crate::valuation::value_assets;
}

pub use environment::MarketEnvironment;
pub use error::{CurveError, CurveResult};
