//! Named collections of pricing structures.
//!
//! Controllers look curves up by the names in their
//! [`AssetProperties`](crate::assets::AssetProperties):
//!
//! ```rust
//! use strata_config::InterpolationMethod;
//! use strata_core::types::Date;
//! use strata_curves::curves::RateCurve;
//! use strata_curves::environment::MarketEnvironment;
//!
//! let base = Date::from_ymd(2025, 1, 15).unwrap();
//! let curve = RateCurve::new(base, vec![(1.0, 0.96)], InterpolationMethod::LogLinear, true).unwrap();
//!
//! let mut env = MarketEnvironment::new("EOD");
//! env.add_pricing_structure("RateCurve.AUD", curve);
//! assert!(env.rate_curve("RateCurve.AUD").is_ok());
//! assert!(env.index_curve("RateCurve.AUD").is_err());
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crate::curves::{IndexCurve, PricingStructure, RateCurve, VolatilityCurve};
use crate::error::{CurveError, CurveResult};

/// A named set of pricing structures.
///
/// Cloning is cheap: structures are shared through `Arc`. An environment is
/// not mutated while a calculation pass reads it.
#[derive(Debug, Clone, Default)]
pub struct MarketEnvironment {
    name: String,
    structures: HashMap<String, Arc<PricingStructure>>,
}

impl MarketEnvironment {
    /// Creates an empty environment.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            structures: HashMap::new(),
        }
    }

    /// Environment name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a structure, replacing any existing one under `name`.
    pub fn add_pricing_structure(
        &mut self,
        name: impl Into<String>,
        structure: impl Into<PricingStructure>,
    ) {
        self.structures.insert(name.into(), Arc::new(structure.into()));
    }

    /// Adds an already shared structure.
    pub fn add_shared(&mut self, name: impl Into<String>, structure: Arc<PricingStructure>) {
        self.structures.insert(name.into(), structure);
    }

    /// Builder form of [`add_pricing_structure`](Self::add_pricing_structure).
    #[must_use]
    pub fn with_pricing_structure(
        mut self,
        name: impl Into<String>,
        structure: impl Into<PricingStructure>,
    ) -> Self {
        self.add_pricing_structure(name, structure);
        self
    }

    /// Removes and returns a structure.
    pub fn remove(&mut self, name: &str) -> Option<Arc<PricingStructure>> {
        self.structures.remove(name)
    }

    /// The structure under `name`.
    pub fn get(&self, name: &str) -> CurveResult<&PricingStructure> {
        self.structures
            .get(name)
            .map(AsRef::as_ref)
            .ok_or_else(|| CurveError::missing(name))
    }

    /// Shared handle to the structure under `name`.
    pub fn get_shared(&self, name: &str) -> CurveResult<Arc<PricingStructure>> {
        self.structures
            .get(name)
            .cloned()
            .ok_or_else(|| CurveError::missing(name))
    }

    /// The rate curve under `name`.
    pub fn rate_curve(&self, name: &str) -> CurveResult<&RateCurve> {
        let s = self.get(name)?;
        s.as_rate_curve()
            .ok_or_else(|| CurveError::incompatible(name, "RateCurve", s.kind_name()))
    }

    /// The index curve under `name`.
    pub fn index_curve(&self, name: &str) -> CurveResult<&IndexCurve> {
        let s = self.get(name)?;
        s.as_index_curve()
            .ok_or_else(|| CurveError::incompatible(name, "IndexCurve", s.kind_name()))
    }

    /// The volatility curve under `name`.
    pub fn volatility_curve(&self, name: &str) -> CurveResult<&VolatilityCurve> {
        let s = self.get(name)?;
        s.as_volatility_curve()
            .ok_or_else(|| CurveError::incompatible(name, "VolatilityCurve", s.kind_name()))
    }

    /// Whether a structure exists under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.structures.contains_key(name)
    }

    /// Structure names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.structures.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of structures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.structures.len()
    }

    /// True when no structures are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::{IndexKind, LevelInterpolation};
    use strata_config::InterpolationMethod;
    use strata_core::types::Date;

    fn base() -> Date {
        Date::from_ymd(2025, 1, 15).unwrap()
    }

    fn env() -> MarketEnvironment {
        MarketEnvironment::new("test")
            .with_pricing_structure(
                "RateCurve.AUD",
                RateCurve::new(base(), vec![(1.0, 0.96)], InterpolationMethod::LogLinear, true).unwrap(),
            )
            .with_pricing_structure(
                "FxCurve.AUDUSD",
                IndexCurve::new(base(), IndexKind::Fx, vec![(0.01, 0.65)], LevelInterpolation::Linear, true)
                    .unwrap(),
            )
    }

    #[test]
    fn test_typed_lookup() {
        let env = env();
        assert!(env.rate_curve("RateCurve.AUD").is_ok());
        assert!(env.index_curve("FxCurve.AUDUSD").is_ok());
        assert!(matches!(
            env.rate_curve("FxCurve.AUDUSD"),
            Err(CurveError::IncompatibleStructure { .. })
        ));
        assert!(matches!(
            env.volatility_curve("VolatilityCurve.AUD-3M"),
            Err(CurveError::MissingMarketData { .. })
        ));
    }

    #[test]
    fn test_names_and_replace() {
        let mut env = env();
        assert_eq!(env.names(), vec!["FxCurve.AUDUSD", "RateCurve.AUD"]);
        env.add_pricing_structure(
            "RateCurve.AUD",
            RateCurve::new(base(), vec![(1.0, 0.95)], InterpolationMethod::LogLinear, true).unwrap(),
        );
        assert_eq!(env.len(), 2);
        let df = env.rate_curve("RateCurve.AUD").unwrap().discount_factor_at(1.0).unwrap();
        assert!((df - 0.95).abs() < 1e-15);
    }

    #[test]
    fn test_clone_shares_structures() {
        let env = env();
        let copy = env.clone();
        let a = env.get_shared("RateCurve.AUD").unwrap();
        let b = copy.get_shared("RateCurve.AUD").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
