//! Strata Configuration Layer
//!
//! Serde-backed settings for the Strata curve and volatility engines:
//!
//! - **Bootstrap**: repricing tolerance, iteration limit, default interpolation
//! - **SABR**: simplex tolerances, Halton search size, ATM alpha bracketing
//! - **Conventions**: per-currency day counts, lags, frequencies and holidays
//!
//! Every section implements [`Validate`], returning all problems at once.
//!
//! # Example
//!
//! ```rust
//! use strata_config::{EngineConfig, InterpolationMethod, Validate};
//! use strata_core::types::Currency;
//!
//! let config = EngineConfig::from_toml_str(
//!     r#"
//!     [bootstrap]
//!     interpolation = "FlatForward"
//!     "#,
//! )
//! .unwrap();
//! assert!(config.is_valid());
//! assert_eq!(config.bootstrap.interpolation, InterpolationMethod::FlatForward);
//!
//! let aud = config.convention_table().lookup(Currency::AUD).unwrap().clone();
//! assert_eq!(aud.spot_lag, 0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod conventions;
pub mod curve;
pub mod engine;
pub mod error;
pub mod sabr;

pub use conventions::{ConventionTable, CurrencyConventions};
pub use curve::{BootstrapConfig, InterpolationMethod};
pub use engine::EngineConfig;
pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
pub use sabr::SabrConfig;
