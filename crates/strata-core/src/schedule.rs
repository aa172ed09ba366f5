//! Regular payment schedules.
//!
//! Dates are rolled backward from the end date in whole multiples of the
//! frequency period (`end - k * period`, never compounding month clamping),
//! so any stub falls at the front. A front stub shorter than
//! [`ScheduleConfig::min_stub_days`] is merged into the first regular period.
//!
//! # Example
//!
//! ```rust
//! use strata_core::calendars::WeekendCalendar;
//! use strata_core::schedule::{Schedule, ScheduleConfig};
//! use strata_core::types::{Date, Frequency};
//!
//! let config = ScheduleConfig::new(
//!     Date::from_ymd(2025, 1, 15).unwrap(),
//!     Date::from_ymd(2027, 1, 15).unwrap(),
//!     Frequency::SemiAnnual,
//! );
//! let schedule = Schedule::generate(&config, &WeekendCalendar).unwrap();
//! assert_eq!(schedule.num_periods(), 4);
//! ```

use serde::{Deserialize, Serialize};

use crate::calendars::{BusinessDayConvention, Calendar};
use crate::error::{CoreError, CoreResult};
use crate::types::{Date, Frequency};

/// Configuration for schedule generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Accrual start date.
    pub start_date: Date,
    /// Final payment date (unadjusted).
    pub end_date: Date,
    /// Payment frequency.
    pub frequency: Frequency,
    /// Business day adjustment applied to every date.
    pub business_day_convention: BusinessDayConvention,
    /// Roll to month end when the end date is a month end.
    pub end_of_month: bool,
    /// Front stubs shorter than this many days are merged.
    pub min_stub_days: i64,
}

impl ScheduleConfig {
    /// Creates a configuration with Modified Following and no end-of-month rule.
    #[must_use]
    pub fn new(start_date: Date, end_date: Date, frequency: Frequency) -> Self {
        Self {
            start_date,
            end_date,
            frequency,
            business_day_convention: BusinessDayConvention::ModifiedFollowing,
            end_of_month: false,
            min_stub_days: 7,
        }
    }

    /// Sets the business day convention.
    #[must_use]
    pub fn with_business_day_convention(mut self, convention: BusinessDayConvention) -> Self {
        self.business_day_convention = convention;
        self
    }

    /// Sets the end-of-month rule.
    #[must_use]
    pub fn with_end_of_month(mut self, eom: bool) -> Self {
        self.end_of_month = eom;
        self
    }
}

/// A date schedule: unadjusted roll dates and their business-day adjusted
/// counterparts, first element is the start date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    unadjusted_dates: Vec<Date>,
    adjusted_dates: Vec<Date>,
}

impl Schedule {
    /// Generates a schedule from the configuration and calendar.
    pub fn generate<C: Calendar + ?Sized>(config: &ScheduleConfig, calendar: &C) -> CoreResult<Self> {
        if config.end_date <= config.start_date {
            return Err(CoreError::calendar(format!(
                "schedule end {} is not after start {}",
                config.end_date, config.start_date
            )));
        }

        let unadjusted = match config.frequency.period().and_then(|p| p.total_months()) {
            None => vec![config.start_date, config.end_date],
            Some(months) => Self::roll_backward(config, months)?,
        };

        let adjusted = unadjusted
            .iter()
            .map(|&d| calendar.adjust(d, config.business_day_convention))
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(Self {
            unadjusted_dates: unadjusted,
            adjusted_dates: adjusted,
        })
    }

    fn roll_backward(config: &ScheduleConfig, months_per_period: i32) -> CoreResult<Vec<Date>> {
        let eom = config.end_of_month && config.end_date.is_end_of_month();
        let mut dates = vec![config.end_date];
        let mut k = 1;
        loop {
            let mut current = config.end_date.add_months(-k * months_per_period)?;
            if eom {
                current = current.end_of_month();
            }
            if current <= config.start_date {
                break;
            }
            dates.push(current);
            k += 1;
        }

        // merge a short front stub into the first regular period
        if dates.len() > 1 {
            if let Some(&first_roll) = dates.last() {
                if config.start_date.days_between(&first_roll) < config.min_stub_days {
                    log::debug!(
                        "merging {}-day front stub into first period",
                        config.start_date.days_between(&first_roll)
                    );
                    dates.pop();
                }
            }
        }

        dates.push(config.start_date);
        dates.reverse();
        Ok(dates)
    }

    /// Returns the unadjusted schedule dates.
    #[must_use]
    pub fn unadjusted_dates(&self) -> &[Date] {
        &self.unadjusted_dates
    }

    /// Returns the adjusted schedule dates.
    #[must_use]
    pub fn dates(&self) -> &[Date] {
        &self.adjusted_dates
    }

    /// Iterator over adjusted accrual periods `(start, end)`.
    pub fn periods(&self) -> impl Iterator<Item = (Date, Date)> + '_ {
        self.adjusted_dates.windows(2).map(|w| (w[0], w[1]))
    }

    /// Number of accrual periods.
    #[must_use]
    pub fn num_periods(&self) -> usize {
        self.adjusted_dates.len().saturating_sub(1)
    }

    /// Adjusted final date.
    #[must_use]
    pub fn maturity(&self) -> Option<Date> {
        self.adjusted_dates.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendars::WeekendCalendar;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_semiannual_regular() {
        let config = ScheduleConfig::new(date(2020, 1, 15), date(2025, 1, 15), Frequency::SemiAnnual);
        let schedule = Schedule::generate(&config, &WeekendCalendar).unwrap();

        // 5 years, semi-annual = 10 periods + 1 for start = 11 dates
        assert_eq!(schedule.dates().len(), 11);
        assert_eq!(schedule.num_periods(), 10);
        assert_eq!(schedule.unadjusted_dates()[1], date(2020, 7, 15));
    }

    #[test]
    fn test_single_payment() {
        let config = ScheduleConfig::new(date(2025, 1, 15), date(2026, 1, 15), Frequency::Once);
        let schedule = Schedule::generate(&config, &WeekendCalendar).unwrap();
        assert_eq!(schedule.num_periods(), 1);
    }

    #[test]
    fn test_front_stub() {
        // 14 months quarterly: 2M front stub then 4 regular quarters
        let config = ScheduleConfig::new(date(2025, 1, 15), date(2026, 3, 16), Frequency::Quarterly);
        let schedule = Schedule::generate(&config, &WeekendCalendar).unwrap();
        assert_eq!(schedule.num_periods(), 5);
        assert_eq!(schedule.unadjusted_dates()[1], date(2025, 3, 16));
    }

    #[test]
    fn test_short_stub_merged() {
        let config = ScheduleConfig::new(date(2025, 1, 13), date(2026, 1, 15), Frequency::SemiAnnual);
        let schedule = Schedule::generate(&config, &WeekendCalendar).unwrap();
        assert_eq!(schedule.num_periods(), 2);
        assert_eq!(schedule.unadjusted_dates()[1], date(2025, 7, 15));
    }

    #[test]
    fn test_adjusted_dates() {
        // 2025-11-15 is a Saturday, 2025-05-15 is a Thursday
        let config = ScheduleConfig::new(date(2025, 5, 15), date(2025, 11, 15), Frequency::SemiAnnual);
        let schedule = Schedule::generate(&config, &WeekendCalendar).unwrap();
        assert_eq!(schedule.maturity(), Some(date(2025, 11, 17)));
        assert_eq!(schedule.unadjusted_dates()[1], date(2025, 11, 15));
    }

    #[test]
    fn test_rejects_inverted_dates() {
        let config = ScheduleConfig::new(date(2025, 5, 15), date(2025, 1, 15), Frequency::Annual);
        assert!(Schedule::generate(&config, &WeekendCalendar).is_err());
    }

    #[test]
    fn test_end_of_month_rule() {
        let config = ScheduleConfig::new(date(2024, 8, 31), date(2025, 2, 28), Frequency::Quarterly)
            .with_end_of_month(true)
            .with_business_day_convention(BusinessDayConvention::Unadjusted);
        let schedule = Schedule::generate(&config, &WeekendCalendar).unwrap();
        assert_eq!(schedule.unadjusted_dates()[1], date(2024, 11, 30));
    }
}
