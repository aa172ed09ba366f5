//! Typed asset properties and default curve naming.

use serde::{Deserialize, Serialize};
use strata_core::types::Date;

use super::identifier::{AssetDescriptor, AssetFamily, AssetIdentifier};
use crate::error::{CurveError, CurveResult};

/// Notional used when none is supplied.
pub const DEFAULT_NOTIONAL: f64 = 1_000_000.0;

/// Everything a controller needs besides quotes and conventions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetProperties {
    /// Client namespace.
    pub namespace: String,
    /// Parsed identifier.
    pub identifier: AssetIdentifier,
    /// Valuation date.
    pub base_date: Date,
    /// Notional amount.
    pub notional: f64,
    /// Curve used to discount cash flows.
    pub discount_curve: String,
    /// Curve used to project floating rates.
    pub forecast_curve: String,
    /// FX, commodity, inflation or volatility curve, where the family uses one.
    pub index_curve: Option<String>,
}

impl AssetProperties {
    /// Asset family.
    #[must_use]
    pub fn family(&self) -> AssetFamily {
        self.identifier.family()
    }

    /// Sets the discount curve name.
    #[must_use]
    pub fn with_discount_curve(mut self, name: impl Into<String>) -> Self {
        self.discount_curve = name.into();
        self
    }

    /// Sets the forecast curve name.
    #[must_use]
    pub fn with_forecast_curve(mut self, name: impl Into<String>) -> Self {
        self.forecast_curve = name.into();
        self
    }

    /// Sets the index curve name.
    #[must_use]
    pub fn with_index_curve(mut self, name: impl Into<String>) -> Self {
        self.index_curve = Some(name.into());
        self
    }

    /// Sets the notional.
    #[must_use]
    pub fn with_notional(mut self, notional: f64) -> Self {
        self.notional = notional;
        self
    }

    /// The index curve name, required.
    pub fn require_index_curve(&self) -> CurveResult<&str> {
        self.index_curve
            .as_deref()
            .ok_or_else(|| CurveError::missing(format!("index curve for {}", self.identifier)))
    }
}

/// Builds properties for an identifier with default curve names.
///
/// | Family | Discount | Forecast | Index |
/// |--------|----------|----------|-------|
/// | rates, bonds | `RateCurve.CCY` | `RateCurve.CCY` | - |
/// | BasisSwap, SpreadFra | `RateCurve.CCY` | `RateCurve.CCY-<index>` | - |
/// | Xccy swaps | `RateCurve.CCY-XccyBasis` | `RateCurve.CCY` | - |
/// | caplets | `RateCurve.CCY` | `RateCurve.CCY` | `VolatilityCurve.CCY-<index>` |
/// | FX | `RateCurve.<quote>` | `RateCurve.<quote>` | `FxCurve.PAIR` |
/// | commodities | `RateCurve.CCY` | `RateCurve.CCY` | `CommodityCurve.CCY-<code>` |
/// | CPIndex | `RateCurve.CCY` | `RateCurve.CCY` | `InflationCurve.CCY-CPI` |
pub fn build_properties(
    namespace: &str,
    id: &str,
    base_date: Date,
    notional: Option<f64>,
) -> CurveResult<AssetProperties> {
    let identifier = AssetIdentifier::parse(id)?;
    let notional = notional.unwrap_or(DEFAULT_NOTIONAL);
    if !notional.is_finite() {
        return Err(CurveError::invalid_quote(format!("notional {notional} is not finite")));
    }

    let ccy = identifier.currency();
    let rate_curve = format!("RateCurve.{ccy}");
    let tenor_curve = identifier
        .index_tenor()
        .map_or_else(|| rate_curve.clone(), |t| format!("RateCurve.{ccy}-{t}"));

    use AssetFamily as F;
    let (discount, forecast, index) = match identifier.family() {
        F::BasisSwap | F::SpreadFra => (rate_curve.clone(), tenor_curve, None),
        F::XccySwap | F::XccyBasisSwap => {
            (format!("RateCurve.{ccy}-XccyBasis"), rate_curve.clone(), None)
        }
        F::Caplet | F::Floorlet | F::BillCaplet | F::BillFloorlet => {
            let index = identifier
                .index_tenor()
                .map(|t| format!("VolatilityCurve.{ccy}-{t}"));
            (rate_curve.clone(), rate_curve.clone(), index)
        }
        F::FxSpot | F::FxForward => {
            let index = identifier
                .pair()
                .map(|p| format!("FxCurve.{}{}", p.base, p.quote));
            (rate_curve.clone(), rate_curve.clone(), index)
        }
        F::CommoditySpot | F::CommodityForward | F::CommodityFuture => {
            let code = match identifier.descriptor() {
                AssetDescriptor::Commodity { code, .. } | AssetDescriptor::Future { contract: code, .. } => {
                    code.clone()
                }
                _ => String::new(),
            };
            (rate_curve.clone(), rate_curve.clone(), Some(format!("CommodityCurve.{ccy}-{code}")))
        }
        F::CPIndex => (rate_curve.clone(), rate_curve.clone(), Some(format!("InflationCurve.{ccy}-CPI"))),
        F::Deposit | F::Xibor | F::OIS | F::IRFuture | F::IRSwap | F::Fra | F::BillFra | F::Bond => {
            (rate_curve.clone(), rate_curve.clone(), None)
        }
    };

    Ok(AssetProperties {
        namespace: namespace.to_string(),
        identifier,
        base_date,
        notional,
        discount_curve: discount,
        forecast_curve: forecast,
        index_curve: index,
    })
}
