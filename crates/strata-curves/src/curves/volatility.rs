//! Black volatility term structures.

use serde::{Deserialize, Serialize};
use strata_core::daycounts::DayCountConvention;
use strata_core::types::Date;
use strata_math::interpolation::{Interpolator, LinearInterpolator};

use super::nodes::CurveNodes;
use crate::error::{CurveError, CurveResult};

/// Black volatilities by expiry time.
///
/// Interpolates linearly in total variance `σ²t` between nodes and holds the
/// boundary volatility flat outside them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "VolatilityCurveData", into = "VolatilityCurveData")]
pub struct VolatilityCurve {
    data: VolatilityCurveData,
    variance: Option<LinearInterpolator>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct VolatilityCurveData {
    base_date: Date,
    day_count: DayCountConvention,
    nodes: CurveNodes,
}

impl TryFrom<VolatilityCurveData> for VolatilityCurve {
    type Error = CurveError;

    fn try_from(data: VolatilityCurveData) -> CurveResult<Self> {
        if data.nodes.first_time() <= 0.0 {
            return Err(CurveError::invalid_curve("volatility expiries must be after the base date"));
        }
        if let Some(v) = data.nodes.values().iter().find(|v| **v <= 0.0) {
            return Err(CurveError::invalid_curve(format!("volatility {v} is not positive")));
        }
        let variance = if data.nodes.len() > 1 {
            let total: Vec<f64> = data.nodes.iter().map(|(t, v)| v * v * t).collect();
            if total.windows(2).any(|w| w[1] < w[0]) {
                tracing::warn!("total variance decreases between expiries; calendar arbitrage in vol curve");
            }
            Some(LinearInterpolator::new(data.nodes.times().to_vec(), total)?)
        } else {
            None
        };
        Ok(Self { data, variance })
    }
}

impl From<VolatilityCurve> for VolatilityCurveData {
    fn from(curve: VolatilityCurve) -> Self {
        curve.data
    }
}

impl PartialEq for VolatilityCurve {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl VolatilityCurve {
    /// Creates a curve from `(expiry time, volatility)` nodes on ACT/365F time.
    pub fn new(base_date: Date, nodes: impl IntoIterator<Item = (f64, f64)>) -> CurveResult<Self> {
        Self::try_from(VolatilityCurveData {
            base_date,
            day_count: DayCountConvention::Act365Fixed,
            nodes: CurveNodes::from_pairs(nodes)?,
        })
    }

    /// Creates a curve from dated volatilities.
    pub fn from_dates(
        base_date: Date,
        day_count: DayCountConvention,
        nodes: &[(Date, f64)],
    ) -> CurveResult<Self> {
        let pairs = nodes
            .iter()
            .map(|&(d, v)| (day_count.year_fraction(base_date, d), v));
        Self::try_from(VolatilityCurveData {
            base_date,
            day_count,
            nodes: CurveNodes::from_pairs(pairs)?,
        })
    }

    /// Base date.
    #[must_use]
    pub fn base_date(&self) -> Date {
        self.data.base_date
    }

    /// The expiry nodes.
    #[must_use]
    pub fn nodes(&self) -> &CurveNodes {
        &self.data.nodes
    }

    /// Year fraction from the base date on the curve's day count.
    #[must_use]
    pub fn time_from_base(&self, date: Date) -> f64 {
        self.data.day_count.year_fraction(self.data.base_date, date)
    }

    /// Volatility for an expiry `t` years out.
    pub fn volatility_at(&self, t: f64) -> CurveResult<f64> {
        let nodes = &self.data.nodes;
        let values = nodes.values();
        if t <= nodes.first_time() {
            return Ok(values[0]);
        }
        if t >= nodes.last_time() {
            return Ok(values[values.len() - 1]);
        }
        match &self.variance {
            Some(variance) => Ok((variance.interpolate(t)? / t).sqrt()),
            None => Ok(values[0]),
        }
    }

    /// Volatility for an expiry date.
    pub fn volatility(&self, expiry: Date) -> CurveResult<f64> {
        self.volatility_at(self.time_from_base(expiry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn base() -> Date {
        Date::from_ymd(2025, 1, 15).unwrap()
    }

    #[test]
    fn test_total_variance_interpolation() {
        let c = VolatilityCurve::new(base(), vec![(1.0, 0.20), (2.0, 0.25)]).unwrap();
        let expected = ((0.04 + 0.125) / 2.0 / 1.5_f64).sqrt();
        assert_relative_eq!(c.volatility_at(1.5).unwrap(), expected, epsilon = 1e-14);
        assert_relative_eq!(c.volatility_at(1.0).unwrap(), 0.20);
    }

    #[test]
    fn test_flat_extrapolation() {
        let c = VolatilityCurve::new(base(), vec![(0.5, 0.30), (1.0, 0.25)]).unwrap();
        assert_relative_eq!(c.volatility_at(0.1).unwrap(), 0.30);
        assert_relative_eq!(c.volatility_at(10.0).unwrap(), 0.25);
    }

    #[test]
    fn test_rejects_expiry_at_base() {
        assert!(VolatilityCurve::new(base(), vec![(0.0, 0.2), (1.0, 0.2)]).is_err());
        assert!(VolatilityCurve::new(base(), vec![(1.0, -0.2)]).is_err());
    }
}
