//! Discount factor curves.

use serde::{Deserialize, Serialize};
use strata_config::InterpolationMethod;
use strata_core::daycounts::DayCountConvention;
use strata_core::types::{Compounding, Date};
use strata_math::interpolation::find_segment;

use super::nodes::CurveNodes;
use crate::error::{CurveError, CurveResult};

/// A discount curve: discount factors by time from the base date.
///
/// Always carries an explicit `(0, 1)` node so `DF(base) == 1`. Beyond the
/// last node the curve extends at the boundary instantaneous forward rate
/// when extrapolation is on.
///
/// # Example
///
/// ```rust
/// use strata_config::InterpolationMethod;
/// use strata_core::types::Date;
/// use strata_curves::curves::RateCurve;
///
/// let base = Date::from_ymd(2025, 1, 15).unwrap();
/// let curve = RateCurve::new(
///     base,
///     vec![(1.0, 0.96), (2.0, 0.92)],
///     InterpolationMethod::LogLinear,
///     true,
/// )
/// .unwrap();
/// assert!((curve.discount_factor_at(0.0).unwrap() - 1.0).abs() < 1e-15);
/// assert!((curve.discount_factor_at(1.0).unwrap() - 0.96).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRateCurve")]
pub struct RateCurve {
    base_date: Date,
    day_count: DayCountConvention,
    interpolation: InterpolationMethod,
    extrapolation: bool,
    nodes: CurveNodes,
}

#[derive(Deserialize)]
struct RawRateCurve {
    base_date: Date,
    day_count: DayCountConvention,
    interpolation: InterpolationMethod,
    extrapolation: bool,
    nodes: CurveNodes,
}

impl TryFrom<RawRateCurve> for RateCurve {
    type Error = CurveError;

    fn try_from(raw: RawRateCurve) -> CurveResult<Self> {
        Self::with_day_count(
            raw.base_date,
            raw.day_count,
            raw.nodes.iter(),
            raw.interpolation,
            raw.extrapolation,
        )
    }
}

impl RateCurve {
    /// Creates a curve on ACT/365F time from `(time, discount factor)` nodes.
    pub fn new(
        base_date: Date,
        nodes: impl IntoIterator<Item = (f64, f64)>,
        interpolation: InterpolationMethod,
        extrapolation: bool,
    ) -> CurveResult<Self> {
        Self::with_day_count(
            base_date,
            DayCountConvention::Act365Fixed,
            nodes,
            interpolation,
            extrapolation,
        )
    }

    /// Creates a curve whose time axis uses `day_count`.
    ///
    /// A `(0, 1)` node is added when absent; a node at time zero with any
    /// other value is rejected, as are non-positive discount factors.
    pub fn with_day_count(
        base_date: Date,
        day_count: DayCountConvention,
        nodes: impl IntoIterator<Item = (f64, f64)>,
        interpolation: InterpolationMethod,
        extrapolation: bool,
    ) -> CurveResult<Self> {
        let mut pairs: Vec<(f64, f64)> = nodes.into_iter().collect();
        match pairs.first() {
            Some(&(t, df)) if t == 0.0 => {
                if (df - 1.0).abs() > 1e-14 {
                    return Err(CurveError::invalid_curve(format!(
                        "discount factor at the base date must be 1, got {df}"
                    )));
                }
            }
            Some(&(t, _)) if t < 0.0 => {
                return Err(CurveError::invalid_curve(format!("negative node time {t}")));
            }
            _ => pairs.insert(0, (0.0, 1.0)),
        }
        if pairs.len() < 2 {
            return Err(CurveError::invalid_curve(
                "a rate curve needs at least one node after the base date",
            ));
        }
        if let Some(&(t, df)) = pairs.iter().find(|(_, df)| *df <= 0.0) {
            return Err(CurveError::invalid_curve(format!(
                "discount factor {df} at t={t} is not positive"
            )));
        }

        Ok(Self {
            base_date,
            day_count,
            interpolation,
            extrapolation,
            nodes: CurveNodes::from_pairs(pairs)?,
        })
    }

    /// Creates a curve from dated discount factors.
    pub fn from_dates(
        base_date: Date,
        day_count: DayCountConvention,
        nodes: &[(Date, f64)],
        interpolation: InterpolationMethod,
        extrapolation: bool,
    ) -> CurveResult<Self> {
        let pairs = nodes
            .iter()
            .map(|&(d, df)| (day_count.year_fraction(base_date, d), df));
        Self::with_day_count(base_date, day_count, pairs, interpolation, extrapolation)
    }

    /// Base (valuation) date.
    #[must_use]
    pub fn base_date(&self) -> Date {
        self.base_date
    }

    /// Day count of the time axis.
    #[must_use]
    pub fn day_count(&self) -> DayCountConvention {
        self.day_count
    }

    /// Interpolation method.
    #[must_use]
    pub fn interpolation(&self) -> InterpolationMethod {
        self.interpolation
    }

    /// Whether queries beyond the last node are answered.
    #[must_use]
    pub fn allows_extrapolation(&self) -> bool {
        self.extrapolation
    }

    /// The curve nodes, base node included.
    #[must_use]
    pub fn nodes(&self) -> &CurveNodes {
        &self.nodes
    }

    /// Year fraction from the base date on the curve's day count.
    #[must_use]
    pub fn time_from_base(&self, date: Date) -> f64 {
        self.day_count.year_fraction(self.base_date, date)
    }

    /// Discount factor at `t` years.
    ///
    /// Extrapolation only extends the curve past its last node. Times before
    /// the base date are `OutOfRange` whether or not it is enabled.
    pub fn discount_factor_at(&self, t: f64) -> CurveResult<f64> {
        let last = self.nodes.last_time();
        if t < 0.0 || !t.is_finite() {
            return Err(CurveError::out_of_range(t, 0.0, last));
        }
        if t <= last {
            return Ok(self.interpolate(t));
        }
        if !self.extrapolation {
            return Err(CurveError::out_of_range(t, 0.0, last));
        }
        let last_df = self.nodes.values()[self.nodes.len() - 1];
        Ok(last_df * (-self.boundary_forward() * (t - last)).exp())
    }

    /// Discount factor at a date.
    pub fn discount_factor(&self, date: Date) -> CurveResult<f64> {
        self.discount_factor_at(self.time_from_base(date))
    }

    /// Simple forward rate between two times, accruing over `t2 - t1`.
    pub fn forward_rate_at(&self, t1: f64, t2: f64) -> CurveResult<f64> {
        if t2 <= t1 {
            return Err(CurveError::invalid_curve(format!(
                "forward period [{t1}, {t2}] is empty"
            )));
        }
        let df1 = self.discount_factor_at(t1)?;
        let df2 = self.discount_factor_at(t2)?;
        Ok((df1 / df2 - 1.0) / (t2 - t1))
    }

    /// Simple forward rate between two dates on the curve's day count.
    pub fn forward_rate(&self, start: Date, end: Date) -> CurveResult<f64> {
        self.forward_rate_at(self.time_from_base(start), self.time_from_base(end))
    }

    /// Zero rate to `t` under `compounding`. At `t = 0` the first node's rate is used.
    pub fn zero_rate_at(&self, t: f64, compounding: Compounding) -> CurveResult<f64> {
        let t = if t <= 0.0 { self.nodes.times()[1] } else { t };
        let df = self.discount_factor_at(t)?;
        Ok(compounding.rate(df, t))
    }

    /// Zero rate to a date under `compounding`.
    pub fn zero_rate(&self, date: Date, compounding: Compounding) -> CurveResult<f64> {
        self.zero_rate_at(self.time_from_base(date), compounding)
    }

    fn interpolate(&self, t: f64) -> f64 {
        let times = self.nodes.times();
        let dfs = self.nodes.values();
        let i = find_segment(times, t);
        let (t0, t1) = (times[i], times[i + 1]);
        let (d0, d1) = (dfs[i], dfs[i + 1]);
        let w = (t - t0) / (t1 - t0);

        match self.interpolation {
            InterpolationMethod::Linear => d0 + w * (d1 - d0),
            InterpolationMethod::LogLinear => (d0.ln() + w * (d1.ln() - d0.ln())).exp(),
            InterpolationMethod::FlatForward => {
                let f = (d0 / d1 - 1.0) / (t1 - t0);
                d0 / (1.0 + f * (t - t0))
            }
            InterpolationMethod::LinearZero => {
                if t <= 0.0 {
                    return 1.0;
                }
                let z1 = self.node_zero(i + 1);
                let z0 = if t0 > 0.0 { self.node_zero(i) } else { z1 };
                (-(z0 + w * (z1 - z0)) * t).exp()
            }
        }
    }

    fn node_zero(&self, i: usize) -> f64 {
        -self.nodes.values()[i].ln() / self.nodes.times()[i]
    }

    /// Instantaneous forward rate at the last node, seen from inside the last segment.
    fn boundary_forward(&self) -> f64 {
        let n = self.nodes.len() - 1;
        let times = self.nodes.times();
        let dfs = self.nodes.values();
        let dt = times[n] - times[n - 1];
        let (d0, d1) = (dfs[n - 1], dfs[n]);

        match self.interpolation {
            InterpolationMethod::Linear => -(d1 - d0) / dt / d1,
            InterpolationMethod::LogLinear => (d0 / d1).ln() / dt,
            InterpolationMethod::FlatForward => (d0 / d1 - 1.0) / dt * d1 / d0,
            InterpolationMethod::LinearZero => {
                let z1 = self.node_zero(n);
                let z0 = if times[n - 1] > 0.0 { self.node_zero(n - 1) } else { z1 };
                z1 + times[n] * (z1 - z0) / dt
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn base() -> Date {
        Date::from_ymd(2025, 1, 15).unwrap()
    }

    fn curve(method: InterpolationMethod) -> RateCurve {
        RateCurve::new(
            base(),
            vec![(0.5, 0.98), (1.0, 0.96), (2.0, 0.915), (5.0, 0.80)],
            method,
            true,
        )
        .unwrap()
    }

    #[test]
    fn test_base_and_node_reproduction() {
        for method in InterpolationMethod::ALL {
            let c = curve(method);
            assert_relative_eq!(c.discount_factor_at(0.0).unwrap(), 1.0);
            assert_relative_eq!(c.discount_factor(base()).unwrap(), 1.0);
            for (t, df) in c.nodes().iter() {
                assert_relative_eq!(c.discount_factor_at(t).unwrap(), df, epsilon = 1e-14);
            }
        }
    }

    #[test]
    fn test_log_linear_constant_forward() {
        let c = curve(InterpolationMethod::LogLinear);
        let f = (0.96_f64 / 0.915).ln();
        let df = c.discount_factor_at(1.5).unwrap();
        assert_relative_eq!(df, 0.96 * (-0.5 * f).exp(), epsilon = 1e-14);
    }

    #[test]
    fn test_linear_zero_flat_before_first_node() {
        let c = curve(InterpolationMethod::LinearZero);
        let z = -(0.98_f64).ln() / 0.5;
        assert_relative_eq!(c.zero_rate_at(0.25, Compounding::Continuous).unwrap(), z, epsilon = 1e-13);
    }

    #[test]
    fn test_flat_forward_simple_rate() {
        let c = curve(InterpolationMethod::FlatForward);
        let f = (0.98 / 0.96 - 1.0) / 0.5;
        assert_relative_eq!(c.forward_rate_at(0.5, 0.75).unwrap(), f, epsilon = 1e-12);
    }

    #[test]
    fn test_extrapolation_continues_forward() {
        for method in InterpolationMethod::ALL {
            let c = curve(method);
            let inside = c.discount_factor_at(5.0 - 1e-7).unwrap();
            let at = c.discount_factor_at(5.0).unwrap();
            let beyond = c.discount_factor_at(5.0 + 1e-7).unwrap();
            // one-sided forwards agree at the boundary
            let f_in = (inside / at).ln() / 1e-7;
            let f_out = (at / beyond).ln() / 1e-7;
            assert_relative_eq!(f_in, f_out, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_no_extrapolation() {
        let c = RateCurve::new(base(), vec![(1.0, 0.96)], InterpolationMethod::LogLinear, false).unwrap();
        assert!(matches!(c.discount_factor_at(1.5), Err(CurveError::OutOfRange { .. })));
        assert!(matches!(c.discount_factor_at(-0.1), Err(CurveError::OutOfRange { .. })));
    }

    #[test]
    fn test_before_base_date_out_of_range_with_extrapolation() {
        let c = curve(InterpolationMethod::LogLinear);
        assert!(c.discount_factor_at(10.0).is_ok());
        assert!(matches!(c.discount_factor_at(-1e-9), Err(CurveError::OutOfRange { .. })));
        let before = base().add_days(-1);
        assert!(matches!(c.discount_factor(before), Err(CurveError::OutOfRange { .. })));
        assert!(matches!(c.discount_factor_at(f64::NAN), Err(CurveError::OutOfRange { .. })));
    }

    #[test]
    fn test_rejects_bad_nodes() {
        let method = InterpolationMethod::LogLinear;
        assert!(RateCurve::new(base(), vec![(0.0, 0.99), (1.0, 0.96)], method, true).is_err());
        assert!(RateCurve::new(base(), vec![(1.0, -0.5)], method, true).is_err());
        assert!(RateCurve::new(base(), vec![(1.0, 0.96), (1.0, 0.95)], method, true).is_err());
        assert!(RateCurve::new(base(), Vec::new(), method, true).is_err());
    }

    #[test]
    fn test_dated_construction() {
        let one_year = Date::from_ymd(2026, 1, 15).unwrap();
        let c = RateCurve::from_dates(
            base(),
            DayCountConvention::Act365Fixed,
            &[(one_year, 0.95)],
            InterpolationMethod::LogLinear,
            true,
        )
        .unwrap();
        assert_relative_eq!(c.discount_factor(one_year).unwrap(), 0.95, epsilon = 1e-14);
        let z = c.zero_rate(one_year, Compounding::Simple).unwrap();
        assert_relative_eq!(z, (1.0 / 0.95 - 1.0), epsilon = 1e-12);
    }

    #[test]
    fn test_serde_round_trip() {
        let c = curve(InterpolationMethod::FlatForward);
        let json = serde_json::to_string(&c).unwrap();
        let back: RateCurve = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
