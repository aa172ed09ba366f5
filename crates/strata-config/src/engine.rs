//! Top-level engine configuration.
//!
//! Loaded from TOML (or JSON) and validated as a whole:
//!
//! ```toml
//! [bootstrap]
//! tolerance = 1e-12
//! interpolation = "LogLinear"
//!
//! [sabr]
//! default_beta = 0.5
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::conventions::{ConventionTable, CurrencyConventions};
use crate::curve::BootstrapConfig;
use crate::error::{ConfigError, ConfigResult, Validate, ValidationError};
use crate::sabr::SabrConfig;

/// Combined configuration for curve building and SABR calibration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Bootstrapper settings.
    pub bootstrap: BootstrapConfig,
    /// SABR calibration settings.
    pub sabr: SabrConfig,
    /// Convention overrides applied on top of the standard table.
    pub conventions: Vec<CurrencyConventions>,
}

impl EngineConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Reads and parses a TOML file, then validates it.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml_str(&source)?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// Serializes to TOML.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Parses a JSON document.
    pub fn from_json(source: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Serializes to pretty JSON.
    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Standard conventions with this configuration's overrides applied.
    #[must_use]
    pub fn convention_table(&self) -> ConventionTable {
        ConventionTable::standard_with(self.conventions.iter().cloned())
    }

    /// Replaces the bootstrap settings.
    #[must_use]
    pub fn with_bootstrap(mut self, bootstrap: BootstrapConfig) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    /// Replaces the SABR settings.
    #[must_use]
    pub fn with_sabr(mut self, sabr: SabrConfig) -> Self {
        self.sabr = sabr;
        self
    }

    /// Adds a convention override.
    #[must_use]
    pub fn with_conventions(mut self, conventions: CurrencyConventions) -> Self {
        self.conventions.push(conventions);
        self
    }
}

impl Validate for EngineConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors: Vec<ValidationError> = self
            .bootstrap
            .validate()
            .into_iter()
            .map(|e| e.nested("bootstrap"))
            .collect();
        errors.extend(self.sabr.validate().into_iter().map(|e| e.nested("sabr")));
        for c in &self.conventions {
            let prefix = format!("conventions[{}]", c.currency);
            errors.extend(c.validate().into_iter().map(|e| e.nested(&prefix)));
        }
        errors
    }
}
