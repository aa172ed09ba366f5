//! Metrics computed by priceable assets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CurveError, CurveResult};

/// A metric an asset controller can compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetMetric {
    /// Present value to the receiver of the quoted rate (or long the quoted level).
    NPV,
    /// The quote that sets NPV to zero against the environment.
    ImpliedQuote,
    /// Discount factor at the asset's maturity.
    DiscountFactorAtMaturity,
    /// Year fraction of the main accrual period.
    AccrualFactor,
    /// NPV change for a one basis point rise in the market quote.
    DeltaR,
    /// Black volatility at option expiry.
    VolatilityAtExpiry,
    /// Forward rate or level at maturity.
    ForwardAtMaturity,
    /// Index level at maturity.
    IndexAtMaturity,
}

impl AssetMetric {
    /// All metrics.
    pub const ALL: [AssetMetric; 8] = [
        AssetMetric::NPV,
        AssetMetric::ImpliedQuote,
        AssetMetric::DiscountFactorAtMaturity,
        AssetMetric::AccrualFactor,
        AssetMetric::DeltaR,
        AssetMetric::VolatilityAtExpiry,
        AssetMetric::ForwardAtMaturity,
        AssetMetric::IndexAtMaturity,
    ];

    /// Canonical name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::NPV => "NPV",
            Self::ImpliedQuote => "ImpliedQuote",
            Self::DiscountFactorAtMaturity => "DiscountFactorAtMaturity",
            Self::AccrualFactor => "AccrualFactor",
            Self::DeltaR => "DeltaR",
            Self::VolatilityAtExpiry => "VolatilityAtExpiry",
            Self::ForwardAtMaturity => "ForwardAtMaturity",
            Self::IndexAtMaturity => "IndexAtMaturity",
        }
    }

    /// Parses a list of metric names.
    pub fn parse_list<S: AsRef<str>>(names: &[S]) -> CurveResult<Vec<Self>> {
        names.iter().map(|n| n.as_ref().parse()).collect()
    }
}

impl fmt::Display for AssetMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AssetMetric {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|m| m.name().eq_ignore_ascii_case(key))
            .ok_or_else(|| CurveError::unsupported_metric(s, "any asset"))
    }
}

/// One computed metric value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricValue {
    /// The metric.
    pub metric: AssetMetric,
    /// Its value.
    pub value: f64,
}

/// Metric results for one asset, in request order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicAssetValuation {
    /// Identifier of the valued asset.
    pub identifier: String,
    /// One entry per requested metric.
    pub quotes: Vec<MetricValue>,
}

impl BasicAssetValuation {
    /// Creates an empty valuation for an asset.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            quotes: Vec::new(),
        }
    }

    /// Appends a metric value.
    pub fn push(&mut self, metric: AssetMetric, value: f64) {
        self.quotes.push(MetricValue { metric, value });
    }

    /// Value of a metric, if computed.
    #[must_use]
    pub fn get(&self, metric: AssetMetric) -> Option<f64> {
        self.quotes.iter().find(|q| q.metric == metric).map(|q| q.value)
    }
}
