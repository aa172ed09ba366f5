//! Calibration store: settings and engine tables by handle.
//!
//! Each handle owns an immutable [`EngineTable`] behind an `Arc`. A
//! calibration builds a new table and swaps it in, so readers always see
//! either the previous table or the complete new one. Calibrations under the
//! same handle are serialised by a per-handle mutex; other handles and all
//! queries proceed without blocking.

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

use strata_config::SabrConfig;
use strata_core::types::Currency;

use crate::engine::{AtmQuote, SabrEngine, SmileQuote};
use crate::error::{SabrError, SabrResult};
use crate::grid::{AssetGrid, VolatilityGrid};
use crate::label::TermLabel;
use crate::parameters::validate_beta;
use crate::surface::ParameterSurface;

/// Scope a calibration applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSettings {
    /// Settings handle.
    pub handle: String,
    /// Instrument type, e.g. `Swaption`.
    pub instrument: String,
    /// Currency of the underlying.
    pub currency: Currency,
    /// Fixed beta for every engine calibrated under these settings.
    pub beta: f64,
}

/// Engines calibrated under one handle, keyed by (expiry, tenor).
#[derive(Debug, Clone)]
pub struct EngineTable {
    settings: String,
    engines: HashMap<(TermLabel, TermLabel), SabrEngine>,
    assets: Option<AssetGrid>,
}

impl EngineTable {
    fn new(settings: &str) -> Self {
        Self {
            settings: settings.to_string(),
            engines: HashMap::new(),
            assets: None,
        }
    }

    fn insert(&mut self, engine: SabrEngine) {
        self.engines.insert((engine.expiry(), engine.tenor()), engine);
    }

    /// Handle of the settings the engines were calibrated with.
    #[must_use]
    pub fn settings(&self) -> &str {
        &self.settings
    }

    /// Engine for an expiry and tenor.
    ///
    /// Falls back to an engine whose labels span the same year fractions,
    /// so `12M` finds an engine stored under `1Y`.
    #[must_use]
    pub fn get(&self, expiry: TermLabel, tenor: TermLabel) -> Option<&SabrEngine> {
        self.engines.get(&(expiry, tenor)).or_else(|| {
            let (e, t) = (expiry.year_fraction(), tenor.year_fraction());
            self.engines.values().find(|engine| {
                (engine.expiry_years() - e).abs() < 1e-12
                    && (engine.tenor().year_fraction() - t).abs() < 1e-12
            })
        })
    }

    /// All engines.
    pub fn engines(&self) -> impl Iterator<Item = &SabrEngine> {
        self.engines.values()
    }

    /// Number of engines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.engines.len()
    }

    /// True when no engine is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }

    /// Asset grid stored with a surface calibration.
    #[must_use]
    pub fn asset_grid(&self) -> Option<&AssetGrid> {
        self.assets.as_ref()
    }

    /// Forward for a query: from the asset grid when present, otherwise the
    /// engine's calibration forward.
    pub fn forward(&self, engine: &SabrEngine) -> SabrResult<f64> {
        match &self.assets {
            Some(grid) => grid.forward(engine.expiry(), engine.tenor()),
            None => Ok(engine.forward()),
        }
    }
}

/// Concurrent store of calibration settings and engine tables.
#[derive(Debug, Default)]
pub struct CalibrationStore {
    config: SabrConfig,
    settings: DashMap<String, CalibrationSettings>,
    tables: DashMap<String, Arc<EngineTable>>,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl CalibrationStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new(config: SabrConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Numerical settings used by every calibration.
    #[must_use]
    pub fn config(&self) -> &SabrConfig {
        &self.config
    }

    /// Registers calibration settings and echoes the handle.
    ///
    /// Beta defaults to the configured default beta.
    pub fn add_calibration_settings(
        &self,
        handle: &str,
        instrument: &str,
        currency: &str,
        beta: Option<f64>,
    ) -> SabrResult<String> {
        let beta = beta.unwrap_or(self.config.default_beta);
        validate_beta(beta)?;
        let settings = CalibrationSettings {
            handle: handle.to_string(),
            instrument: instrument.to_string(),
            currency: Currency::parse(currency)?,
            beta,
        };
        debug!("calibration settings '{handle}': {instrument} {currency}, beta {beta}");
        self.settings.insert(handle.to_string(), settings);
        Ok(handle.to_string())
    }

    /// Settings stored under a handle.
    pub fn settings(&self, handle: &str) -> SabrResult<CalibrationSettings> {
        self.settings
            .get(handle)
            .map(|s| s.value().clone())
            .ok_or_else(|| SabrError::settings_not_found(handle))
    }

    /// Calibrates one ATM engine and adds it to the handle's table.
    pub fn calibrate_atm(
        &self,
        engine_handle: &str,
        settings_handle: &str,
        quote: &AtmQuote,
    ) -> SabrResult<String> {
        self.calibrate_atm_batch(engine_handle, settings_handle, std::slice::from_ref(quote))
    }

    /// Calibrates many ATM engines and adds them to the handle's table in
    /// one replacement. Nothing is stored if any quote fails.
    pub fn calibrate_atm_batch(
        &self,
        engine_handle: &str,
        settings_handle: &str,
        quotes: &[AtmQuote],
    ) -> SabrResult<String> {
        let beta = self.settings(settings_handle)?.beta;
        let lock = self.lock(engine_handle);
        let _guard = lock.lock();

        let engines = quotes
            .iter()
            .map(|q| SabrEngine::calibrate_atm(q, beta, &self.config))
            .collect::<SabrResult<Vec<_>>>()?;

        let mut table = self.table_for_update(engine_handle, settings_handle);
        for engine in engines {
            table.insert(engine);
        }
        self.publish(engine_handle, table);
        Ok(engine_handle.to_string())
    }

    /// Calibrates every usable smile of a volatility grid for one expiry.
    ///
    /// Forwards come from the asset grid at (expiry, row tenor). The handle's
    /// table is replaced by the new engines and the asset grid.
    pub fn calibrate_surface(
        &self,
        engine_handle: &str,
        settings_handle: &str,
        vols: &VolatilityGrid,
        assets: AssetGrid,
        expiry: TermLabel,
    ) -> SabrResult<String> {
        let beta = self.settings(settings_handle)?.beta;
        let lock = self.lock(engine_handle);
        let _guard = lock.lock();

        info!(
            "calibrating '{engine_handle}' at expiry {expiry}: {} smiles",
            vols.rows().len()
        );
        let mut table = EngineTable::new(settings_handle);
        for row in vols.rows() {
            let forward = assets.forward(expiry, row.tenor)?;
            let smile = SmileQuote {
                expiry,
                tenor: row.tenor,
                forward,
                strikes: vols.strikes(forward),
                vols: row.vols.clone(),
            };
            table.insert(SabrEngine::calibrate_smile(&smile, beta, &self.config)?);
        }
        table.assets = Some(assets);
        self.publish(engine_handle, table);
        Ok(engine_handle.to_string())
    }

    /// Calibrates an engine whose nu and rho are interpolated from the
    /// engines under `source_handle`, and adds it to `engine_handle`.
    ///
    /// Only source engines with the source settings' beta are used.
    pub fn calibrate_interpolated(
        &self,
        engine_handle: &str,
        source_handle: &str,
        expiry: TermLabel,
        tenor: TermLabel,
        atm_vol: f64,
        forward: f64,
    ) -> SabrResult<String> {
        let source = self.table(source_handle)?;
        let beta = self.settings(source.settings())?.beta;
        let surface = ParameterSurface::from_engines(source.engines(), beta)?;

        let lock = self.lock(engine_handle);
        let _guard = lock.lock();
        let engine = SabrEngine::calibrate_interpolated(
            &surface,
            expiry,
            tenor,
            atm_vol,
            forward,
            &self.config,
        )?;
        let mut table = self.table_for_update(engine_handle, source.settings());
        table.insert(engine);
        self.publish(engine_handle, table);
        Ok(engine_handle.to_string())
    }

    /// Current table under a handle.
    pub fn table(&self, handle: &str) -> SabrResult<Arc<EngineTable>> {
        self.tables
            .get(handle)
            .map(|t| Arc::clone(t.value()))
            .ok_or_else(|| SabrError::handle_not_found(handle))
    }

    /// Engine for (expiry, tenor) under a handle.
    pub fn engine(&self, handle: &str, expiry: TermLabel, tenor: TermLabel) -> SabrResult<SabrEngine> {
        let table = self.table(handle)?;
        table
            .get(expiry, tenor)
            .cloned()
            .ok_or_else(|| SabrError::expiry_tenor_not_found(handle, expiry, tenor))
    }

    /// Implied volatility at a decimal strike.
    pub fn implied_volatility(
        &self,
        handle: &str,
        expiry: TermLabel,
        tenor: TermLabel,
        strike: f64,
    ) -> SabrResult<f64> {
        self.implied_volatilities(handle, expiry, tenor, &[strike])
            .map(|v| v[0])
    }

    /// Implied volatilities at decimal strikes.
    pub fn implied_volatilities(
        &self,
        handle: &str,
        expiry: TermLabel,
        tenor: TermLabel,
        strikes: &[f64],
    ) -> SabrResult<Vec<f64>> {
        let table = self.table(handle)?;
        let engine = table
            .get(expiry, tenor)
            .ok_or_else(|| SabrError::expiry_tenor_not_found(handle, expiry, tenor))?;
        let forward = table.forward(engine)?;
        engine.implied_volatilities(forward, strikes)
    }

    /// Handles with a stored table.
    #[must_use]
    pub fn handles(&self) -> Vec<String> {
        let mut handles: Vec<String> = self.tables.iter().map(|e| e.key().clone()).collect();
        handles.sort();
        handles
    }

    /// Removes a handle's table; returns whether one was stored.
    pub fn remove(&self, handle: &str) -> bool {
        let lock = self.lock(handle);
        let _guard = lock.lock();
        self.tables.remove(handle).is_some()
    }

    fn lock(&self, handle: &str) -> Arc<Mutex<()>> {
        Arc::clone(self.locks.entry(handle.to_string()).or_default().value())
    }

    /// Copy of the current table, or a fresh one bound to `settings`.
    fn table_for_update(&self, handle: &str, settings: &str) -> EngineTable {
        match self.tables.get(handle) {
            Some(table) if table.settings == settings => EngineTable::clone(table.value()),
            _ => EngineTable::new(settings),
        }
    }

    fn publish(&self, handle: &str, table: EngineTable) {
        debug!("publishing '{handle}' with {} engines", table.len());
        self.tables.insert(handle.to_string(), Arc::new(table));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn label(s: &str) -> TermLabel {
        TermLabel::parse(s).unwrap()
    }

    fn quote(expiry: &str, tenor: &str, nu: f64, rho: f64) -> AtmQuote {
        AtmQuote {
            expiry: label(expiry),
            tenor: label(tenor),
            nu,
            rho,
            atm_vol: 0.20,
            forward: 0.0344,
        }
    }

    fn store() -> CalibrationStore {
        let store = CalibrationStore::default();
        store
            .add_calibration_settings("AUD swaptions", "Swaption", "AUD", Some(1.0))
            .unwrap();
        store
    }

    #[test]
    fn test_settings_echo_handle() {
        let store = CalibrationStore::default();
        let handle = store
            .add_calibration_settings("settings", "Swaption", "AUD", None)
            .unwrap();
        assert_eq!(handle, "settings");
        let settings = store.settings("settings").unwrap();
        assert_eq!(settings.currency, Currency::AUD);
        assert_relative_eq!(settings.beta, 1.0);

        assert!(store.add_calibration_settings("bad", "Swaption", "AUD", Some(2.0)).is_err());
        assert!(store.add_calibration_settings("bad", "Swaption", "aud", None).is_err());
        assert!(matches!(store.settings("bad"), Err(SabrError::SettingsNotFound { .. })));
    }

    #[test]
    fn test_atm_calibration_and_query() {
        let store = store();
        let handle = store
            .calibrate_atm("grid", "AUD swaptions", &quote("3m", "0.25y", 0.7561, -0.3702))
            .unwrap();
        assert_eq!(handle, "grid");
        let vol = store
            .implied_volatility("grid", label("3M"), label("0.25Y"), 0.02)
            .unwrap();
        assert_relative_eq!(vol, 0.31687, epsilon = 1e-5);

        let batch = store
            .implied_volatilities("grid", label("3m"), label("0.25y"), &[0.02, 0.03])
            .unwrap();
        assert_eq!(batch[0], vol);
    }

    #[test]
    fn test_unknown_handles() {
        let store = store();
        assert!(matches!(
            store.implied_volatility("nope", label("1y"), label("1y"), 0.03),
            Err(SabrError::HandleNotFound { .. })
        ));
        assert!(matches!(
            store.calibrate_atm("grid", "nope", &quote("1y", "1y", 0.3, 0.0)),
            Err(SabrError::SettingsNotFound { .. })
        ));
        store
            .calibrate_atm("grid", "AUD swaptions", &quote("1y", "1y", 0.3, 0.0))
            .unwrap();
        assert!(matches!(
            store.implied_volatility("grid", label("2y"), label("1y"), 0.03),
            Err(SabrError::ExpiryTenorNotFound { .. })
        ));
    }

    #[test]
    fn test_year_fraction_fallback() {
        let store = store();
        store
            .calibrate_atm("grid", "AUD swaptions", &quote("1y", "1y", 0.3, 0.0))
            .unwrap();
        assert!(store.engine("grid", label("12m"), label("1y")).is_ok());
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let store = store();
        let quotes = [quote("1y", "1y", 0.3, 0.0), quote("2y", "1y", 0.3, 1.5)];
        assert!(store.calibrate_atm_batch("grid", "AUD swaptions", &quotes).is_err());
        assert!(store.table("grid").is_err());

        let quotes = [quote("1y", "1y", 0.3, 0.0), quote("2y", "1y", 0.4, -0.1)];
        store.calibrate_atm_batch("grid", "AUD swaptions", &quotes).unwrap();
        assert_eq!(store.table("grid").unwrap().len(), 2);
    }

    #[test]
    fn test_readers_keep_old_table() {
        let store = store();
        store
            .calibrate_atm("grid", "AUD swaptions", &quote("1y", "1y", 0.3, 0.0))
            .unwrap();
        let before = store.table("grid").unwrap();
        store
            .calibrate_atm("grid", "AUD swaptions", &quote("2y", "1y", 0.3, 0.0))
            .unwrap();
        assert_eq!(before.len(), 1);
        assert_eq!(store.table("grid").unwrap().len(), 2);
    }

    #[test]
    fn test_interpolated_engine() {
        let store = store();
        let quotes = [
            quote("1y", "1y", 0.4, -0.2),
            quote("1y", "5y", 0.6, -0.4),
            quote("5y", "1y", 0.3, -0.1),
            quote("5y", "5y", 0.5, -0.3),
        ];
        store.calibrate_atm_batch("grid", "AUD swaptions", &quotes).unwrap();
        store
            .calibrate_interpolated("interp", "grid", label("3y"), label("3y"), 0.22, 0.04)
            .unwrap();

        let engine = store.engine("interp", label("3y"), label("3y")).unwrap();
        assert_eq!(engine.mode(), crate::engine::CalibrationMode::Interpolated);
        assert_relative_eq!(engine.nu(), 0.45, epsilon = 1e-12);
        assert_relative_eq!(engine.rho(), -0.25, epsilon = 1e-12);
        let atm = store
            .implied_volatility("interp", label("3y"), label("3y"), 0.04)
            .unwrap();
        assert_relative_eq!(atm, 0.22, epsilon = 1e-12);
    }

    #[test]
    fn test_concurrent_calibration() {
        let store = Arc::new(store());
        std::thread::scope(|s| {
            for i in 0..8_u32 {
                let store = Arc::clone(&store);
                s.spawn(move || {
                    let q = quote(&format!("{}y", i + 1), "1y", 0.3, -0.1);
                    store.calibrate_atm("shared", "AUD swaptions", &q).unwrap();
                    store.calibrate_atm(&format!("own-{i}"), "AUD swaptions", &q).unwrap();
                });
            }
        });
        assert_eq!(store.table("shared").unwrap().len(), 8);
        assert_eq!(store.handles().len(), 9);
        assert!(store.remove("shared"));
        assert!(!store.remove("shared"));
    }
}
