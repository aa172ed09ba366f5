//! Weekend calendar with an explicit holiday list.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::Calendar;
use crate::types::Date;

/// Weekends plus a fixed set of holiday dates.
///
/// Holiday lists come from configuration; there is no rule engine here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayCalendar {
    name: String,
    holidays: BTreeSet<Date>,
}

impl HolidayCalendar {
    /// Creates a calendar from a name and holiday dates.
    pub fn new(name: impl Into<String>, holidays: impl IntoIterator<Item = Date>) -> Self {
        Self {
            name: name.into(),
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Adds a holiday.
    #[must_use]
    pub fn with_holiday(mut self, date: Date) -> Self {
        self.holidays.insert(date);
        self
    }

    /// Holidays in ascending order.
    pub fn holidays(&self) -> impl Iterator<Item = &Date> {
        self.holidays.iter()
    }
}

impl Calendar for HolidayCalendar {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_business_day(&self, date: Date) -> bool {
        !date.is_weekend() && !self.holidays.contains(&date)
    }
}
