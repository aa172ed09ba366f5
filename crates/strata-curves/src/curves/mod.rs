//! Pricing structures.
//!
//! - [`RateCurve`]: discount factors, four interpolation methods
//! - [`IndexCurve`]: FX, commodity and CPI levels
//! - [`VolatilityCurve`]: Black volatilities by expiry
//!
//! [`PricingStructure`] wraps the three kinds for storage in a
//! [`MarketEnvironment`](crate::environment::MarketEnvironment).

mod index;
mod nodes;
mod rate;
mod volatility;

pub use index::{IndexCurve, IndexKind, LevelInterpolation};
pub use nodes::CurveNodes;
pub use rate::RateCurve;
pub use volatility::VolatilityCurve;

use serde::{Deserialize, Serialize};
use strata_core::types::Date;

/// Any pricing structure held by a market environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PricingStructure {
    /// Discount curve.
    Rate(RateCurve),
    /// Index level curve.
    Index(IndexCurve),
    /// Volatility term structure.
    Volatility(VolatilityCurve),
}

impl PricingStructure {
    /// Short name of the structure kind.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Rate(_) => "RateCurve",
            Self::Index(_) => "IndexCurve",
            Self::Volatility(_) => "VolatilityCurve",
        }
    }

    /// Base date.
    #[must_use]
    pub fn base_date(&self) -> Date {
        match self {
            Self::Rate(c) => c.base_date(),
            Self::Index(c) => c.base_date(),
            Self::Volatility(c) => c.base_date(),
        }
    }

    /// The structure's nodes.
    #[must_use]
    pub fn nodes(&self) -> &CurveNodes {
        match self {
            Self::Rate(c) => c.nodes(),
            Self::Index(c) => c.nodes(),
            Self::Volatility(c) => c.nodes(),
        }
    }

    /// The rate curve, if this is one.
    #[must_use]
    pub fn as_rate_curve(&self) -> Option<&RateCurve> {
        match self {
            Self::Rate(c) => Some(c),
            _ => None,
        }
    }

    /// The index curve, if this is one.
    #[must_use]
    pub fn as_index_curve(&self) -> Option<&IndexCurve> {
        match self {
            Self::Index(c) => Some(c),
            _ => None,
        }
    }

    /// The volatility curve, if this is one.
    #[must_use]
    pub fn as_volatility_curve(&self) -> Option<&VolatilityCurve> {
        match self {
            Self::Volatility(c) => Some(c),
            _ => None,
        }
    }
}

impl From<RateCurve> for PricingStructure {
    fn from(curve: RateCurve) -> Self {
        Self::Rate(curve)
    }
}

impl From<IndexCurve> for PricingStructure {
    fn from(curve: IndexCurve) -> Self {
        Self::Index(curve)
    }
}

impl From<VolatilityCurve> for PricingStructure {
    fn from(curve: VolatilityCurve) -> Self {
        Self::Volatility(curve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_config::InterpolationMethod;

    #[test]
    fn test_tagged_json_round_trip() {
        let base = Date::from_ymd(2025, 1, 15).unwrap();
        let structures: Vec<PricingStructure> = vec![
            RateCurve::new(base, vec![(1.0, 0.96)], InterpolationMethod::LinearZero, true)
                .unwrap()
                .into(),
            IndexCurve::new(base, IndexKind::Fx, vec![(0.01, 0.65)], LevelInterpolation::Linear, true)
                .unwrap()
                .into(),
            VolatilityCurve::new(base, vec![(0.5, 0.2)]).unwrap().into(),
        ];
        for s in structures {
            let json = serde_json::to_string(&s).unwrap();
            assert!(json.contains("\"type\""));
            let back: PricingStructure = serde_json::from_str(&json).unwrap();
            assert_eq!(back, s);
            assert_eq!(back.base_date(), base);
        }
    }
}
