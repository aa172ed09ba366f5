//! Day count conventions.
//!
//! Year fractions are returned as `f64`: they feed discounting and curve time
//! directly, where binary floating point is the working precision.
//!
//! - [`Act360`]: money-market convention for USD/EUR
//! - [`Act365Fixed`]: AUD/NZD/GBP money market, and curve time
//! - [`ActActIsda`]: year-split actual/actual
//! - [`Thirty360US`], [`Thirty360E`]: bond and swap fixed legs

mod actual;
mod thirty360;

pub use actual::{Act360, Act365Fixed, ActActIsda};
pub use thirty360::{Thirty360E, Thirty360US};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::types::Date;

/// A day count convention.
pub trait DayCount: Send + Sync {
    /// Market name of the convention, e.g. `ACT/365.FIXED`.
    fn name(&self) -> &'static str;

    /// Fraction of a year between two dates (negative if `end < start`).
    fn year_fraction(&self, start: Date, end: Date) -> f64;

    /// Number of days between two dates under the convention.
    fn day_count(&self, start: Date, end: Date) -> i64;
}

/// Runtime-selectable day count convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayCountConvention {
    /// Actual/360.
    #[serde(alias = "ACT/360")]
    Act360,
    /// Actual/365 Fixed.
    #[serde(alias = "ACT/365.FIXED", alias = "ACT/365F")]
    Act365Fixed,
    /// Actual/Actual ISDA.
    #[serde(alias = "ACT/ACT.ISDA", alias = "ACT/ACT")]
    ActActIsda,
    /// 30/360 US bond basis.
    #[serde(alias = "30/360")]
    Thirty360US,
    /// 30E/360 Eurobond basis.
    #[serde(alias = "30E/360")]
    Thirty360E,
}

impl DayCountConvention {
    /// Boxed implementation of the convention.
    #[must_use]
    pub fn to_day_count(&self) -> Box<dyn DayCount> {
        match self {
            DayCountConvention::Act360 => Box::new(Act360),
            DayCountConvention::Act365Fixed => Box::new(Act365Fixed),
            DayCountConvention::ActActIsda => Box::new(ActActIsda),
            DayCountConvention::Thirty360US => Box::new(Thirty360US),
            DayCountConvention::Thirty360E => Box::new(Thirty360E),
        }
    }

    /// Year fraction without boxing.
    #[must_use]
    pub fn year_fraction(&self, start: Date, end: Date) -> f64 {
        match self {
            DayCountConvention::Act360 => Act360.year_fraction(start, end),
            DayCountConvention::Act365Fixed => Act365Fixed.year_fraction(start, end),
            DayCountConvention::ActActIsda => ActActIsda.year_fraction(start, end),
            DayCountConvention::Thirty360US => Thirty360US.year_fraction(start, end),
            DayCountConvention::Thirty360E => Thirty360E.year_fraction(start, end),
        }
    }

    /// Market name of the convention.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Act360 => Act360.name(),
            DayCountConvention::Act365Fixed => Act365Fixed.name(),
            DayCountConvention::ActActIsda => ActActIsda.name(),
            DayCountConvention::Thirty360US => Thirty360US.name(),
            DayCountConvention::Thirty360E => Thirty360E.name(),
        }
    }
}

impl fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DayCountConvention {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase();
        match normalized.as_str() {
            "ACT/360" | "ACTUAL/360" | "ACT360" => Ok(DayCountConvention::Act360),
            "ACT/365.FIXED" | "ACT/365F" | "ACT/365FIXED" | "ACT/365" | "ACTUAL/365" => {
                Ok(DayCountConvention::Act365Fixed)
            }
            "ACT/ACT" | "ACT/ACT.ISDA" | "ACT/ACTISDA" | "ACTUAL/ACTUAL" => {
                Ok(DayCountConvention::ActActIsda)
            }
            "30/360" | "30/360US" | "BONDBASIS" => Ok(DayCountConvention::Thirty360US),
            "30E/360" | "EUROBONDBASIS" => Ok(DayCountConvention::Thirty360E),
            _ => Err(CoreError::UnknownDayCount {
                name: s.to_string(),
            }),
        }
    }
}
