//! Percent-unit front end over a [`CalibrationStore`].
//!
//! Spreadsheet callers quote vols, forwards and single strikes in percent
//! and expiries/tenors as free text. [`SabrHelper`] converts to decimal
//! units and [`TermLabel`]s before delegating. The batched strike query
//! takes decimal strikes.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use strata_config::SabrConfig;

use crate::engine::{AtmQuote, SabrEngine};
use crate::error::SabrResult;
use crate::grid::{AssetGrid, GridCell, VolatilityGrid};
use crate::label::TermLabel;
use crate::store::CalibrationStore;

/// One ATM calibration row in percent units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtmRow {
    /// Option expiry, e.g. `3m`.
    pub expiry: String,
    /// Swap tenor, e.g. `0.25y`.
    pub tenor: String,
    /// Volatility of volatility.
    pub nu: f64,
    /// Correlation.
    pub rho: f64,
    /// ATM vol in percent.
    pub atm_vol: f64,
    /// Forward level in percent.
    pub asset: f64,
}

impl AtmRow {
    fn to_quote(&self) -> SabrResult<AtmQuote> {
        Ok(AtmQuote {
            expiry: TermLabel::parse(&self.expiry)?,
            tenor: TermLabel::parse(&self.tenor)?,
            nu: self.nu,
            rho: self.rho,
            atm_vol: self.atm_vol / 100.0,
            forward: self.asset / 100.0,
        })
    }
}

/// Percent-unit SABR calibration and query API.
#[derive(Debug, Clone)]
pub struct SabrHelper {
    store: Arc<CalibrationStore>,
}

impl Default for SabrHelper {
    fn default() -> Self {
        Self::new(SabrConfig::default())
    }
}

impl SabrHelper {
    /// Creates a helper over a new store.
    #[must_use]
    pub fn new(config: SabrConfig) -> Self {
        Self::with_store(Arc::new(CalibrationStore::new(config)))
    }

    /// Creates a helper over a shared store.
    #[must_use]
    pub fn with_store(store: Arc<CalibrationStore>) -> Self {
        Self { store }
    }

    /// Underlying store.
    #[must_use]
    pub fn store(&self) -> &Arc<CalibrationStore> {
        &self.store
    }

    /// Registers calibration settings; returns the handle.
    pub fn add_sabr_calibration_settings(
        &self,
        handle: &str,
        instrument: &str,
        currency: &str,
        beta: f64,
    ) -> SabrResult<String> {
        self.store
            .add_calibration_settings(handle, instrument, currency, Some(beta))
    }

    /// ATM calibration for one expiry and tenor; returns the engine handle.
    pub fn calibrate_atm(&self, engine_handle: &str, settings_handle: &str, row: &AtmRow) -> SabrResult<String> {
        self.store
            .calibrate_atm(engine_handle, settings_handle, &row.to_quote()?)
    }

    /// ATM calibration for many rows in one table replacement.
    pub fn calibrate_atm_rows(
        &self,
        engine_handle: &str,
        settings_handle: &str,
        rows: &[AtmRow],
    ) -> SabrResult<String> {
        let quotes = rows
            .iter()
            .map(AtmRow::to_quote)
            .collect::<SabrResult<Vec<_>>>()?;
        self.store
            .calibrate_atm_batch(engine_handle, settings_handle, &quotes)
    }

    /// Full calibration of one expiry from raw vol and asset grids.
    pub fn calibrate_model(
        &self,
        engine_handle: &str,
        settings_handle: &str,
        vols: &[Vec<GridCell>],
        assets: &[Vec<GridCell>],
        expiry: &str,
    ) -> SabrResult<String> {
        let vols = VolatilityGrid::parse(vols)?;
        let assets = AssetGrid::parse(assets)?;
        self.store.calibrate_surface(
            engine_handle,
            settings_handle,
            &vols,
            assets,
            TermLabel::parse(expiry)?,
        )
    }

    /// Interpolated calibration from the engines under `source_handle`.
    pub fn calibrate_interpolated(
        &self,
        engine_handle: &str,
        source_handle: &str,
        expiry: &str,
        tenor: &str,
        atm_vol: f64,
        asset: f64,
    ) -> SabrResult<String> {
        self.store.calibrate_interpolated(
            engine_handle,
            source_handle,
            TermLabel::parse(expiry)?,
            TermLabel::parse(tenor)?,
            atm_vol / 100.0,
            asset / 100.0,
        )
    }

    /// Implied volatility (decimal) at a strike in percent.
    pub fn implied_volatility(&self, handle: &str, expiry: &str, tenor: &str, strike: f64) -> SabrResult<f64> {
        self.store.implied_volatility(
            handle,
            TermLabel::parse(expiry)?,
            TermLabel::parse(tenor)?,
            strike / 100.0,
        )
    }

    /// Implied volatilities (decimal) at decimal strikes.
    pub fn interpolate_volatilities(
        &self,
        handle: &str,
        expiry: &str,
        tenor: &str,
        strikes: &[f64],
    ) -> SabrResult<Vec<f64>> {
        self.store.implied_volatilities(
            handle,
            TermLabel::parse(expiry)?,
            TermLabel::parse(tenor)?,
            strikes,
        )
    }

    /// Engine stored for an expiry and tenor.
    pub fn engine(&self, handle: &str, expiry: &str, tenor: &str) -> SabrResult<SabrEngine> {
        self.store
            .engine(handle, TermLabel::parse(expiry)?, TermLabel::parse(tenor)?)
    }

    /// Calibrated alpha.
    pub fn alpha(&self, handle: &str, expiry: &str, tenor: &str) -> SabrResult<f64> {
        self.engine(handle, expiry, tenor).map(|e| e.alpha())
    }

    /// Beta of the engine.
    pub fn beta(&self, handle: &str, expiry: &str, tenor: &str) -> SabrResult<f64> {
        self.engine(handle, expiry, tenor).map(|e| e.beta())
    }

    /// Calibrated nu.
    pub fn nu(&self, handle: &str, expiry: &str, tenor: &str) -> SabrResult<f64> {
        self.engine(handle, expiry, tenor).map(|e| e.nu())
    }

    /// Calibrated rho.
    pub fn rho(&self, handle: &str, expiry: &str, tenor: &str) -> SabrResult<f64> {
        self.engine(handle, expiry, tenor).map(|e| e.rho())
    }

    /// Whether the engine's alpha solve succeeded.
    pub fn is_calibrated(&self, handle: &str, expiry: &str, tenor: &str) -> SabrResult<bool> {
        self.engine(handle, expiry, tenor).map(|e| e.is_calibrated())
    }

    /// Sum of squared vol errors of the engine's fit.
    pub fn calibration_error(&self, handle: &str, expiry: &str, tenor: &str) -> SabrResult<f64> {
        self.engine(handle, expiry, tenor)
            .map(|e| e.calibration_error())
    }
}
