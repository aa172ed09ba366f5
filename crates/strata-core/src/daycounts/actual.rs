//! Actual-day conventions.

use chrono::Datelike;

use super::DayCount;
use crate::types::Date;

/// Actual/360: actual days over a 360-day year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Act360;

impl DayCount for Act360 {
    fn name(&self) -> &'static str {
        "ACT/360"
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        start.days_between(&end) as f64 / 360.0
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

/// Actual/365 Fixed: actual days over 365 regardless of leap years.
///
/// Also the time axis of every pricing structure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Act365Fixed;

impl DayCount for Act365Fixed {
    fn name(&self) -> &'static str {
        "ACT/365.FIXED"
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        start.days_between(&end) as f64 / 365.0
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}

/// Actual/Actual ISDA: days in each calendar year over that year's length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActActIsda;

impl ActActIsda {
    fn basis(year: i32) -> f64 {
        if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 {
            366.0
        } else {
            365.0
        }
    }

    fn forward_fraction(start: Date, end: Date) -> f64 {
        let (y1, y2) = (start.year(), end.year());
        if y1 == y2 {
            return start.days_between(&end) as f64 / Self::basis(y1);
        }
        // day-of-year offsets avoid constructing January 1 dates
        let days_left_in_start = Self::basis(y1) - f64::from(start.as_naive_date().ordinal0());
        let days_into_end = f64::from(end.as_naive_date().ordinal0());
        days_left_in_start / Self::basis(y1)
            + f64::from(y2 - y1 - 1)
            + days_into_end / Self::basis(y2)
    }
}

impl DayCount for ActActIsda {
    fn name(&self) -> &'static str {
        "ACT/ACT.ISDA"
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        if start <= end {
            Self::forward_fraction(start, end)
        } else {
            -Self::forward_fraction(end, start)
        }
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        start.days_between(&end)
    }
}
