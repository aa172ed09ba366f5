//! # Strata SABR
//!
//! SABR smile calibration for swaption volatility grids.
//!
//! This crate provides:
//!
//! - **Model**: validated [`SabrParameters`] and the Hagan lognormal
//!   volatility approximation
//! - **Engines**: ATM, full-smile and interpolated calibration per
//!   (expiry, tenor) pair
//! - **Grids**: parsing of percent-quoted volatility and forward grids
//! - **Store**: a concurrent [`CalibrationStore`] of engine tables by handle
//! - **Helper**: a percent-unit front end with free-text expiries and tenors
//!
//! ## Quick Start
//!
//! ```rust
//! use strata_sabr::prelude::*;
//!
//! let helper = SabrHelper::default();
//! helper.add_sabr_calibration_settings("AUD swaptions", "Swaption", "AUD", 1.0).unwrap();
//!
//! let row = AtmRow {
//!     expiry: "3m".into(),
//!     tenor: "0.25y".into(),
//!     nu: 0.7561,
//!     rho: -0.3702,
//!     atm_vol: 20.0,
//!     asset: 3.44,
//! };
//! let handle = helper.calibrate_atm("3m ATM", "AUD swaptions", &row).unwrap();
//!
//! let vol = helper.implied_volatility(&handle, "3M", "0.25Y", 2.0).unwrap();
//! assert!((vol - 0.31687).abs() < 1e-5);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::similar_names)]

pub mod engine;
pub mod error;
pub mod grid;
pub mod helper;
pub mod label;
pub mod parameters;
pub mod store;
pub mod surface;
pub mod volatility;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::engine::{AtmQuote, CalibrationMode, SabrEngine, SmileQuote};
    pub use crate::error::{SabrError, SabrResult};
    pub use crate::grid::{AssetGrid, GridCell, StrikeColumn, VolatilityGrid};
    pub use crate::helper::{AtmRow, SabrHelper};
    pub use crate::label::{TermLabel, TermUnit};
    pub use crate::parameters::SabrParameters;
    pub use crate::store::{CalibrationSettings, CalibrationStore, EngineTable};
    pub use crate::surface::ParameterSurface;
    pub use crate::volatility::{atm_alpha, hagan_volatility};
}

pub use error::{SabrError, SabrResult};
pub use helper::SabrHelper;
pub use parameters::SabrParameters;
pub use store::CalibrationStore;
