//! Periods and market tenors.
//!
//! A [`Period`] is a signed multiple of a calendar unit (`3M`, `10Y`, `2W`).
//! A [`Tenor`] adds the money-market tokens that are not plain periods:
//! overnight (`ON`), tom-next (`TN`), spot-next (`SN`) and spot (`SP`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::calendars::{BusinessDayConvention, Calendar};
use crate::error::{CoreError, CoreResult};
use crate::types::Date;

/// Calendar unit of a [`Period`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeUnit {
    /// Calendar days.
    Day,
    /// Weeks of seven days.
    Week,
    /// Calendar months.
    Month,
    /// Calendar years.
    Year,
}

impl TimeUnit {
    /// Single-letter code used in tenor strings.
    #[must_use]
    pub fn code(&self) -> char {
        match self {
            TimeUnit::Day => 'D',
            TimeUnit::Week => 'W',
            TimeUnit::Month => 'M',
            TimeUnit::Year => 'Y',
        }
    }

    fn from_code(code: char) -> Option<Self> {
        match code.to_ascii_uppercase() {
            'D' => Some(TimeUnit::Day),
            'W' => Some(TimeUnit::Week),
            'M' => Some(TimeUnit::Month),
            'Y' => Some(TimeUnit::Year),
            _ => None,
        }
    }
}

/// A multiple of a calendar unit, e.g. `3M` or `10Y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    multiplier: i32,
    unit: TimeUnit,
}

impl Period {
    /// Creates a period.
    #[must_use]
    pub const fn new(multiplier: i32, unit: TimeUnit) -> Self {
        Self { multiplier, unit }
    }

    /// `n` days.
    #[must_use]
    pub const fn days(n: i32) -> Self {
        Self::new(n, TimeUnit::Day)
    }

    /// `n` weeks.
    #[must_use]
    pub const fn weeks(n: i32) -> Self {
        Self::new(n, TimeUnit::Week)
    }

    /// `n` months.
    #[must_use]
    pub const fn months(n: i32) -> Self {
        Self::new(n, TimeUnit::Month)
    }

    /// `n` years.
    #[must_use]
    pub const fn years(n: i32) -> Self {
        Self::new(n, TimeUnit::Year)
    }

    /// The signed multiplier.
    #[must_use]
    pub fn multiplier(&self) -> i32 {
        self.multiplier
    }

    /// The unit.
    #[must_use]
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Parses `<integer><D|W|M|Y>` (case-insensitive).
    pub fn parse(s: &str) -> CoreResult<Self> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        let unit_char = chars
            .next_back()
            .ok_or_else(|| CoreError::invalid_period(s, "empty period"))?;
        let unit = TimeUnit::from_code(unit_char)
            .ok_or_else(|| CoreError::invalid_period(s, format!("unknown unit '{unit_char}'")))?;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(CoreError::invalid_period(s, "multiplier must be a whole number"));
        }
        let multiplier = digits
            .parse::<i32>()
            .map_err(|e| CoreError::invalid_period(s, e.to_string()))?;
        Ok(Self::new(multiplier, unit))
    }

    /// Adds the period to a date (month and year steps clamp to month end).
    pub fn add_to(&self, date: Date) -> CoreResult<Date> {
        match self.unit {
            TimeUnit::Day => Ok(date.add_days(i64::from(self.multiplier))),
            TimeUnit::Week => Ok(date.add_days(7 * i64::from(self.multiplier))),
            TimeUnit::Month => date.add_months(self.multiplier),
            TimeUnit::Year => date.add_years(self.multiplier),
        }
    }

    /// Subtracts the period from a date.
    pub fn subtract_from(&self, date: Date) -> CoreResult<Date> {
        Self::new(-self.multiplier, self.unit).add_to(date)
    }

    /// Length in months for month and year periods.
    #[must_use]
    pub fn total_months(&self) -> Option<i32> {
        match self.unit {
            TimeUnit::Month => Some(self.multiplier),
            TimeUnit::Year => Some(self.multiplier * 12),
            _ => None,
        }
    }

    /// Approximate length in years (D/365, W/52, M/12, Y).
    #[must_use]
    pub fn approximate_years(&self) -> f64 {
        let n = f64::from(self.multiplier);
        match self.unit {
            TimeUnit::Day => n / 365.0,
            TimeUnit::Week => n / 52.0,
            TimeUnit::Month => n / 12.0,
            TimeUnit::Year => n,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.multiplier, self.unit.code())
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A market tenor as it appears in instrument codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tenor {
    /// Today to the next business day.
    Overnight,
    /// Next business day to the one after.
    TomNext,
    /// Spot date to the next business day.
    SpotNext,
    /// The spot date itself.
    Spot,
    /// A regular period from spot.
    Period(Period),
}

impl Tenor {
    /// Parses `ON`, `TN`, `SN`, `SP` or a regular period.
    pub fn parse(s: &str) -> CoreResult<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ON" | "O/N" => Ok(Tenor::Overnight),
            "TN" | "T/N" => Ok(Tenor::TomNext),
            "SN" | "S/N" => Ok(Tenor::SpotNext),
            "SP" | "SPOT" => Ok(Tenor::Spot),
            _ => Period::parse(s).map(Tenor::Period),
        }
    }

    /// The regular period, if this tenor is one.
    #[must_use]
    pub fn period(&self) -> Option<Period> {
        match self {
            Tenor::Period(p) => Some(*p),
            _ => None,
        }
    }

    /// Adds the tenor to a date as a plain calendar offset (special tokens count days).
    pub fn add_to(&self, date: Date) -> CoreResult<Date> {
        match self {
            Tenor::Overnight | Tenor::SpotNext => Ok(date.add_days(1)),
            Tenor::TomNext => Ok(date.add_days(2)),
            Tenor::Spot => Ok(date),
            Tenor::Period(p) => p.add_to(date),
        }
    }

    /// Start and end of a deposit-style accrual period for a trade done on `trade_date`.
    ///
    /// Regular periods run from the spot date (`spot_days` business days after
    /// trade) to spot plus the period, adjusted with `convention`.
    pub fn accrual_dates<C: Calendar + ?Sized>(
        &self,
        trade_date: Date,
        spot_days: u32,
        calendar: &C,
        convention: BusinessDayConvention,
    ) -> CoreResult<(Date, Date)> {
        let spot = calendar.add_business_days(trade_date, spot_days as i32);
        match self {
            Tenor::Overnight => {
                let start = calendar.adjust(trade_date, BusinessDayConvention::Following)?;
                Ok((start, calendar.add_business_days(start, 1)))
            }
            Tenor::TomNext => {
                let start = calendar.add_business_days(trade_date, 1);
                Ok((start, calendar.add_business_days(start, 1)))
            }
            Tenor::SpotNext => Ok((spot, calendar.add_business_days(spot, 1))),
            Tenor::Spot => Ok((trade_date, spot)),
            Tenor::Period(p) => {
                let end = calendar.adjust(p.add_to(spot)?, convention)?;
                Ok((spot, end))
            }
        }
    }

    /// Approximate length in years; special tokens count as one or two days.
    #[must_use]
    pub fn approximate_years(&self) -> f64 {
        match self {
            Tenor::Overnight | Tenor::SpotNext => 1.0 / 365.0,
            Tenor::TomNext => 2.0 / 365.0,
            Tenor::Spot => 0.0,
            Tenor::Period(p) => p.approximate_years(),
        }
    }
}

impl fmt::Display for Tenor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tenor::Overnight => write!(f, "ON"),
            Tenor::TomNext => write!(f, "TN"),
            Tenor::SpotNext => write!(f, "SN"),
            Tenor::Spot => write!(f, "SP"),
            Tenor::Period(p) => write!(f, "{p}"),
        }
    }
}

impl FromStr for Tenor {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Period> for Tenor {
    fn from(period: Period) -> Self {
        Tenor::Period(period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendars::WeekendCalendar;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_parse_period() {
        assert_eq!(Period::parse("3M").unwrap(), Period::months(3));
        assert_eq!(Period::parse("10y").unwrap(), Period::years(10));
        assert_eq!(Period::parse("2W").unwrap(), Period::weeks(2));
        assert!(Period::parse("").is_err());
        assert!(Period::parse("M").is_err());
        assert!(Period::parse("3Q").is_err());
        assert!(Period::parse("1.5Y").is_err());
    }

    #[test]
    fn test_tenor_tokens() {
        assert_eq!(Tenor::parse("ON").unwrap(), Tenor::Overnight);
        assert_eq!(Tenor::parse("tn").unwrap(), Tenor::TomNext);
        assert_eq!(Tenor::parse("SP").unwrap().to_string(), "SP");
        assert_eq!(Tenor::parse("6M").unwrap().to_string(), "6M");
    }

    #[test]
    fn test_accrual_dates_spot_start() {
        let cal = WeekendCalendar;
        // Thursday trade, T+2 spot is Monday
        let trade = Date::from_ymd(2025, 1, 2).unwrap();
        let (start, end) = Tenor::parse("1M")
            .unwrap()
            .accrual_dates(trade, 2, &cal, BusinessDayConvention::ModifiedFollowing)
            .unwrap();
        assert_eq!(start, Date::from_ymd(2025, 1, 6).unwrap());
        assert_eq!(end, Date::from_ymd(2025, 2, 6).unwrap());
    }

    #[test]
    fn test_overnight_over_weekend() {
        let cal = WeekendCalendar;
        let friday = Date::from_ymd(2025, 1, 3).unwrap();
        let (start, end) = Tenor::Overnight
            .accrual_dates(friday, 0, &cal, BusinessDayConvention::Following)
            .unwrap();
        assert_eq!(start, friday);
        assert_eq!(end, Date::from_ymd(2025, 1, 6).unwrap());
    }

    #[test]
    fn test_approximate_years() {
        assert_relative_eq!(Period::months(6).approximate_years(), 0.5);
        assert_relative_eq!(Period::weeks(26).approximate_years(), 0.5);
        assert_relative_eq!(Period::days(73).approximate_years(), 0.2);
    }

    proptest! {
        #[test]
        fn prop_period_display_round_trip(n in 0i32..1000, unit in 0usize..4) {
            let unit = [TimeUnit::Day, TimeUnit::Week, TimeUnit::Month, TimeUnit::Year][unit];
            let period = Period::new(n, unit);
            prop_assert_eq!(Period::parse(&period.to_string()).unwrap(), period);
        }
    }
}
