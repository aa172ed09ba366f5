//! Calendar dates.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// A calendar date, serialized as `YYYY-MM-DD`.
///
/// Month steps clamp to the last day of the target month, so
/// 31 Jan + 1M is the last day of February.
///
/// ```rust
/// use strata_core::types::Date;
///
/// let date = Date::from_ymd(2025, 1, 31).unwrap();
/// assert_eq!(date.add_months(1).unwrap(), Date::from_ymd(2025, 2, 28).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Date(NaiveDate);

impl Date {
    /// Date from its components; fails on impossible dates.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> CoreResult<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| CoreError::invalid_date(format!("{year}-{month:02}-{day:02}")))
    }

    /// Parses `YYYY-MM-DD`, ignoring surrounding whitespace.
    pub fn parse(s: &str) -> CoreResult<Self> {
        s.trim()
            .parse::<NaiveDate>()
            .map(Self)
            .map_err(|e| CoreError::invalid_date(format!("'{s}': {e}")))
    }

    /// `n`th `weekday` of a month, counting from 1 (third Wednesday for IMM).
    pub fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u8) -> CoreResult<Self> {
        NaiveDate::from_weekday_of_month_opt(year, month, weekday, n)
            .map(Self)
            .ok_or_else(|| CoreError::invalid_date(format!("{year}-{month:02} has no {weekday} #{n}")))
    }

    /// Calendar year.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// 1 to 12.
    #[must_use]
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Day of month.
    #[must_use]
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Saturday or Sunday.
    #[must_use]
    pub fn is_weekend(&self) -> bool {
        matches!(self.0.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Last day of this month.
    #[must_use]
    pub fn end_of_month(&self) -> Self {
        let last = month_length(self.year(), self.month());
        Self(self.0.with_day(last).unwrap_or(self.0))
    }

    /// True on the last day of the month.
    #[must_use]
    pub fn is_end_of_month(&self) -> bool {
        self.day() == month_length(self.year(), self.month())
    }

    /// Shifts by calendar days.
    #[must_use]
    pub fn add_days(&self, days: i64) -> Self {
        Self(self.0 + Duration::days(days))
    }

    /// Shifts by months with end-of-month clamping.
    pub fn add_months(&self, months: i32) -> CoreResult<Self> {
        let index = self.year() * 12 + self.month() as i32 - 1 + months;
        let (year, month) = (index.div_euclid(12), index.rem_euclid(12) as u32 + 1);
        Self::from_ymd(year, month, self.day().min(month_length(year, month)))
    }

    /// Shifts by whole years; 29 Feb lands on 28 Feb outside leap years.
    pub fn add_years(&self, years: i32) -> CoreResult<Self> {
        self.add_months(12 * years)
    }

    /// Days from `self` to `other`, negative when `other` is earlier.
    #[must_use]
    pub fn days_between(&self, other: &Date) -> i64 {
        other.0.signed_duration_since(self.0).num_days()
    }

    /// Underlying chrono date.
    #[must_use]
    pub fn as_naive_date(&self) -> NaiveDate {
        self.0
    }
}

fn month_length(year: i32, month: u32) -> u32 {
    let leap = NaiveDate::from_ymd_opt(year, 2, 29).is_some();
    match month {
        2 if leap => 29,
        2 => 28,
        4 | 6 | 9 | 11 => 30,
        _ => 31,
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for Date {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> Date {
        Date::from_ymd(y, m, day).unwrap()
    }

    #[test]
    fn test_construction() {
        let date = d(2025, 6, 15);
        assert_eq!((date.year(), date.month(), date.day()), (2025, 6, 15));
        assert!(Date::from_ymd(2025, 2, 29).is_err());
        assert!(Date::from_ymd(2025, 0, 1).is_err());
    }

    #[test]
    fn test_parse_round_trip() {
        let date: Date = " 2024-02-29 ".parse().unwrap();
        assert_eq!(date.to_string(), "2024-02-29");
        assert!(Date::parse("29/02/2024").is_err());
        assert_eq!(serde_json::to_string(&date).unwrap(), "\"2024-02-29\"");
    }

    #[test]
    fn test_month_clamping() {
        let jan31 = d(2024, 1, 31);
        assert_eq!(jan31.add_months(1).unwrap(), d(2024, 2, 29));
        assert_eq!(jan31.add_months(-2).unwrap(), d(2023, 11, 30));
        assert_eq!(jan31.add_months(13).unwrap(), d(2025, 2, 28));
        assert_eq!(d(2024, 2, 29).add_years(1).unwrap(), d(2025, 2, 28));
        assert_eq!(d(2024, 2, 29).add_years(4).unwrap(), d(2028, 2, 29));
    }

    #[test]
    fn test_days() {
        let start = d(2025, 1, 1);
        let end = start.add_days(90);
        assert_eq!(end, d(2025, 4, 1));
        assert_eq!(start.days_between(&end), 90);
        assert_eq!(end.days_between(&start), -90);
        assert!(d(2025, 1, 4).is_weekend());
        assert!(!d(2025, 1, 6).is_weekend());
    }

    #[test]
    fn test_imm_dates() {
        assert_eq!(Date::nth_weekday(2025, 3, Weekday::Wed, 3).unwrap(), d(2025, 3, 19));
        assert!(Date::nth_weekday(2025, 2, Weekday::Fri, 5).is_err());
    }

    #[test]
    fn test_end_of_month() {
        let date = d(2100, 2, 10);
        assert_eq!(date.end_of_month(), d(2100, 2, 28));
        assert!(date.end_of_month().is_end_of_month());
        assert!(!date.is_end_of_month());
    }
}
