//! 30/360 conventions.

use super::DayCount;
use crate::types::Date;

fn thirty360_days(y1: i32, m1: u32, d1: u32, y2: i32, m2: u32, d2: u32) -> i64 {
    360 * i64::from(y2 - y1) + 30 * (i64::from(m2) - i64::from(m1)) + i64::from(d2) - i64::from(d1)
}

fn is_last_of_february(date: Date) -> bool {
    date.month() == 2 && date.is_end_of_month()
}

/// 30/360 US (bond basis), with the February end-of-month rules.
///
/// - D1 last of February → 30
/// - D1 = 31 → 30
/// - D2 last of February and D1 was last of February → 30
/// - D2 = 31 and D1 ≥ 30 → 30
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thirty360US;

impl DayCount for Thirty360US {
    fn name(&self) -> &'static str {
        "30/360"
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        self.day_count(start, end) as f64 / 360.0
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        let start_feb_eom = is_last_of_february(start);
        let mut d1 = start.day();
        let mut d2 = end.day();

        if start_feb_eom {
            d1 = 30;
        }
        if d1 == 31 {
            d1 = 30;
        }
        if start_feb_eom && is_last_of_february(end) {
            d2 = 30;
        }
        if d2 == 31 && d1 >= 30 {
            d2 = 30;
        }

        thirty360_days(start.year(), start.month(), d1, end.year(), end.month(), d2)
    }
}

/// 30E/360 (Eurobond basis): both 31sts become 30.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Thirty360E;

impl DayCount for Thirty360E {
    fn name(&self) -> &'static str {
        "30E/360"
    }

    fn year_fraction(&self, start: Date, end: Date) -> f64 {
        self.day_count(start, end) as f64 / 360.0
    }

    fn day_count(&self, start: Date, end: Date) -> i64 {
        let d1 = start.day().min(30);
        let d2 = end.day().min(30);
        thirty360_days(start.year(), start.month(), d1, end.year(), end.month(), d2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_us_half_year() {
        assert_eq!(Thirty360US.day_count(date(2025, 1, 15), date(2025, 7, 15)), 180);
        assert_relative_eq!(
            Thirty360US.year_fraction(date(2025, 1, 15), date(2025, 7, 15)),
            0.5
        );
    }

    #[test]
    fn test_us_month_end_rules() {
        // D1 = 31 and D2 = 31
        assert_eq!(Thirty360US.day_count(date(2025, 1, 31), date(2025, 3, 31)), 60);
        // D1 < 30 leaves D2 = 31 alone
        assert_eq!(Thirty360US.day_count(date(2025, 1, 29), date(2025, 3, 31)), 62);
        // February end of month on both sides
        assert_eq!(Thirty360US.day_count(date(2024, 2, 29), date(2025, 2, 28)), 360);
    }

    #[test]
    fn test_european() {
        assert_eq!(Thirty360E.day_count(date(2025, 1, 29), date(2025, 3, 31)), 61);
        assert_eq!(Thirty360E.day_count(date(2024, 2, 29), date(2024, 8, 31)), 181);
    }
}
