//! Validated node storage shared by all pricing structures.

use serde::{Deserialize, Serialize};

use crate::error::{CurveError, CurveResult};

/// Ordered `(time, value)` nodes with strictly increasing, finite times.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNodes")]
pub struct CurveNodes {
    times: Vec<f64>,
    values: Vec<f64>,
}

#[derive(Deserialize)]
struct RawNodes {
    times: Vec<f64>,
    values: Vec<f64>,
}

impl TryFrom<RawNodes> for CurveNodes {
    type Error = CurveError;

    fn try_from(raw: RawNodes) -> CurveResult<Self> {
        Self::new(raw.times, raw.values)
    }
}

impl CurveNodes {
    /// Creates a node set, rejecting empty, unordered, duplicate or non-finite nodes.
    pub fn new(times: Vec<f64>, values: Vec<f64>) -> CurveResult<Self> {
        if times.is_empty() {
            return Err(CurveError::invalid_curve("a pricing structure needs at least one node"));
        }
        if times.len() != values.len() {
            return Err(CurveError::invalid_curve(format!(
                "{} node times but {} node values",
                times.len(),
                values.len()
            )));
        }
        if times.iter().chain(values.iter()).any(|v| !v.is_finite()) {
            return Err(CurveError::invalid_curve("node times and values must be finite"));
        }
        if let Some(i) = times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(CurveError::invalid_curve(format!(
                "node times must be strictly increasing: {} then {}",
                times[i],
                times[i + 1]
            )));
        }
        Ok(Self { times, values })
    }

    /// Creates a node set from pairs.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (f64, f64)>) -> CurveResult<Self> {
        let (times, values) = pairs.into_iter().unzip();
        Self::new(times, values)
    }

    /// Node times in years from the base date.
    #[must_use]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Node values.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Always false; a node set is never empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// First node time.
    #[must_use]
    pub fn first_time(&self) -> f64 {
        self.times[0]
    }

    /// Last node time.
    #[must_use]
    pub fn last_time(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    /// Iterator over `(time, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times.iter().copied().zip(self.values.iter().copied())
    }
}
