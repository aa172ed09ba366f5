//! Business day calendars and roll conventions.
//!
//! Holiday data is supplied by configuration. The crate ships the
//! [`Calendar`] seam, a weekends-only calendar and a [`HolidayCalendar`]
//! built from an explicit date list.

mod conventions;
mod holiday;

pub use conventions::{adjust, BusinessDayConvention};
pub use holiday::HolidayCalendar;

use crate::error::CoreResult;
use crate::types::Date;

/// Decides which dates are good business days for a market.
pub trait Calendar: Send + Sync {
    /// Calendar code, e.g. `SYD`.
    fn name(&self) -> &str;

    /// True for good business days.
    fn is_business_day(&self, date: Date) -> bool;

    /// Rolls `date` with `convention`.
    fn adjust(&self, date: Date, convention: BusinessDayConvention) -> CoreResult<Date> {
        conventions::adjust(date, convention, self)
    }

    /// Moves `days` business days from `date`; negative counts go back.
    ///
    /// `date` itself need not be a business day. Zero returns it unchanged.
    fn add_business_days(&self, date: Date, days: i32) -> Date {
        let direction = i64::from(days.signum());
        (0..days.unsigned_abs()).fold(date, |d, _| {
            conventions::step(d.add_days(direction), direction, self)
        })
    }
}

/// Saturdays and Sundays only.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendCalendar;

impl Calendar for WeekendCalendar {
    fn name(&self) -> &str {
        "WEEKEND"
    }

    fn is_business_day(&self, date: Date) -> bool {
        !date.is_weekend()
    }
}
