//! What a bootstrap builds.

use serde::{Deserialize, Serialize};
use std::fmt;

use strata_core::types::Date;

use crate::curves::IndexKind;
use crate::error::{CurveError, CurveResult};

/// Kind of structure a bootstrap solves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CurveKind {
    /// Discount factors.
    Rate,
    /// Index levels.
    Index(IndexKind),
}

impl fmt::Display for CurveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rate => write!(f, "rate"),
            Self::Index(kind) => write!(f, "{kind} index"),
        }
    }
}

/// Name, base date and kind of the structure being bootstrapped.
///
/// The name is the key the structure is published under in the market
/// environment, e.g. `RateCurve.AUD` or `FxCurve.AUDUSD`. Assets are wired
/// so that the curve role they calibrate points at this name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveProperties {
    /// Structure name.
    pub name: String,
    /// Client namespace passed to the assets.
    pub namespace: String,
    /// Valuation date.
    pub base_date: Date,
    /// Kind of structure.
    pub kind: CurveKind,
    /// External discount curve; when set, single-curve rate assets use it
    /// for discounting and calibrate the target as a forecast curve.
    pub discount_curve: Option<String>,
}

impl CurveProperties {
    /// Properties for a rate curve.
    #[must_use]
    pub fn rate(name: impl Into<String>, base_date: Date) -> Self {
        Self::new(name, base_date, CurveKind::Rate)
    }

    /// Properties for an index curve.
    #[must_use]
    pub fn index(name: impl Into<String>, base_date: Date, kind: IndexKind) -> Self {
        Self::new(name, base_date, CurveKind::Index(kind))
    }

    fn new(name: impl Into<String>, base_date: Date, kind: CurveKind) -> Self {
        Self {
            name: name.into(),
            namespace: String::new(),
            base_date,
            kind,
            discount_curve: None,
        }
    }

    /// Infers the kind from the name prefix: `RateCurve`, `FxCurve`,
    /// `CommodityCurve` or `InflationCurve`.
    pub fn from_name(name: &str, base_date: Date) -> CurveResult<Self> {
        let prefix = name.split('.').next().unwrap_or_default();
        let kind = match prefix {
            "RateCurve" => CurveKind::Rate,
            "FxCurve" => CurveKind::Index(IndexKind::Fx),
            "CommodityCurve" => CurveKind::Index(IndexKind::Commodity),
            "InflationCurve" => CurveKind::Index(IndexKind::Inflation),
            _ => {
                return Err(CurveError::invalid_curve(format!(
                    "cannot bootstrap a structure named '{name}'"
                )))
            }
        };
        Ok(Self::new(name, base_date, kind))
    }

    /// Sets the namespace.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Sets an external discount curve.
    #[must_use]
    pub fn with_discount_curve(mut self, name: impl Into<String>) -> Self {
        self.discount_curve = Some(name.into());
        self
    }
}
