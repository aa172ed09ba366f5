//! Index level curves: FX forwards, commodity forwards and CPI levels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use strata_core::daycounts::DayCountConvention;
use strata_core::types::Date;
use strata_math::interpolation::{
    Extrapolation, Interpolator, LinearInterpolator, LogLinearInterpolator,
};

use super::nodes::CurveNodes;
use crate::error::{CurveError, CurveResult};

/// What an index curve's levels represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndexKind {
    /// FX forward outright levels.
    Fx,
    /// Commodity forward prices.
    Commodity,
    /// Consumer price index levels.
    Inflation,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fx => write!(f, "FX"),
            Self::Commodity => write!(f, "Commodity"),
            Self::Inflation => write!(f, "Inflation"),
        }
    }
}

/// Interpolation of index levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LevelInterpolation {
    /// Linear in level.
    #[default]
    Linear,
    /// Linear in log level.
    LogLinear,
}

/// Index levels by time from the base date, flat beyond the node range.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "IndexCurveData", into = "IndexCurveData")]
pub struct IndexCurve {
    data: IndexCurveData,
    interpolator: Option<Arc<dyn Interpolator>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct IndexCurveData {
    base_date: Date,
    kind: IndexKind,
    day_count: DayCountConvention,
    interpolation: LevelInterpolation,
    extrapolation: bool,
    nodes: CurveNodes,
}

impl TryFrom<IndexCurveData> for IndexCurve {
    type Error = CurveError;

    fn try_from(data: IndexCurveData) -> CurveResult<Self> {
        if let Some(v) = data.nodes.values().iter().find(|v| **v <= 0.0) {
            return Err(CurveError::invalid_curve(format!("index level {v} is not positive")));
        }
        let interpolator = build_interpolator(&data)?;
        Ok(Self { data, interpolator })
    }
}

impl From<IndexCurve> for IndexCurveData {
    fn from(curve: IndexCurve) -> Self {
        curve.data
    }
}

fn build_interpolator(data: &IndexCurveData) -> CurveResult<Option<Arc<dyn Interpolator>>> {
    if data.nodes.len() < 2 {
        return Ok(None);
    }
    let xs = data.nodes.times().to_vec();
    let ys = data.nodes.values().to_vec();
    let extrapolation = if data.extrapolation {
        Extrapolation::Flat
    } else {
        Extrapolation::None
    };
    let interpolator: Arc<dyn Interpolator> = match data.interpolation {
        LevelInterpolation::Linear => {
            Arc::new(LinearInterpolator::new(xs, ys)?.with_extrapolation(extrapolation))
        }
        LevelInterpolation::LogLinear => {
            Arc::new(LogLinearInterpolator::new(xs, ys)?.with_extrapolation(extrapolation))
        }
    };
    Ok(Some(interpolator))
}

impl fmt::Debug for IndexCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexCurve")
            .field("base_date", &self.data.base_date)
            .field("kind", &self.data.kind)
            .field("interpolation", &self.data.interpolation)
            .field("nodes", &self.data.nodes)
            .finish()
    }
}

impl PartialEq for IndexCurve {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl IndexCurve {
    /// Creates an index curve from `(time, level)` nodes on ACT/365F time.
    pub fn new(
        base_date: Date,
        kind: IndexKind,
        nodes: impl IntoIterator<Item = (f64, f64)>,
        interpolation: LevelInterpolation,
        extrapolation: bool,
    ) -> CurveResult<Self> {
        Self::try_from(IndexCurveData {
            base_date,
            kind,
            day_count: DayCountConvention::Act365Fixed,
            interpolation,
            extrapolation,
            nodes: CurveNodes::from_pairs(nodes)?,
        })
    }

    /// Creates an index curve from dated levels.
    pub fn from_dates(
        base_date: Date,
        kind: IndexKind,
        day_count: DayCountConvention,
        nodes: &[(Date, f64)],
        interpolation: LevelInterpolation,
        extrapolation: bool,
    ) -> CurveResult<Self> {
        let pairs = nodes
            .iter()
            .map(|&(d, v)| (day_count.year_fraction(base_date, d), v));
        Self::try_from(IndexCurveData {
            base_date,
            kind,
            day_count,
            interpolation,
            extrapolation,
            nodes: CurveNodes::from_pairs(pairs)?,
        })
    }

    /// Base date.
    #[must_use]
    pub fn base_date(&self) -> Date {
        self.data.base_date
    }

    /// What the levels represent.
    #[must_use]
    pub fn kind(&self) -> IndexKind {
        self.data.kind
    }

    /// Day count of the time axis.
    #[must_use]
    pub fn day_count(&self) -> DayCountConvention {
        self.data.day_count
    }

    /// Level interpolation.
    #[must_use]
    pub fn interpolation(&self) -> LevelInterpolation {
        self.data.interpolation
    }

    /// Whether out-of-range queries are answered.
    #[must_use]
    pub fn allows_extrapolation(&self) -> bool {
        self.data.extrapolation
    }

    /// The curve nodes.
    #[must_use]
    pub fn nodes(&self) -> &CurveNodes {
        &self.data.nodes
    }

    /// Year fraction from the base date on the curve's day count.
    #[must_use]
    pub fn time_from_base(&self, date: Date) -> f64 {
        self.data.day_count.year_fraction(self.data.base_date, date)
    }

    /// Level at `t` years.
    pub fn level_at(&self, t: f64) -> CurveResult<f64> {
        let nodes = &self.data.nodes;
        match &self.interpolator {
            Some(interpolator) => interpolator
                .interpolate(t)
                .map_err(|_| CurveError::out_of_range(t, nodes.first_time(), nodes.last_time())),
            None => {
                if self.data.extrapolation || t == nodes.first_time() {
                    Ok(nodes.values()[0])
                } else {
                    Err(CurveError::out_of_range(t, nodes.first_time(), nodes.last_time()))
                }
            }
        }
    }

    /// Level at a date.
    pub fn level(&self, date: Date) -> CurveResult<f64> {
        self.level_at(self.time_from_base(date))
    }
}
