//! Business day roll rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Calendar;
use crate::error::{CoreError, CoreResult};
use crate::types::Date;

/// How a date falling on a non-business day is rolled.
///
/// Money market legs roll `ModifiedFollowing`; bills and some futures use
/// `Following`. Parsed from the abbreviations found in convention files
/// (`MODFOLLOWING`, `MF`, `FOLLOWING`, `PRECEDING`, `NONE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BusinessDayConvention {
    /// Keep the date.
    Unadjusted,
    /// Next business day.
    #[default]
    Following,
    /// Next business day unless that changes the month, else previous.
    ModifiedFollowing,
    /// Previous business day.
    Preceding,
    /// Previous business day unless that changes the month, else next.
    ModifiedPreceding,
}

impl BusinessDayConvention {
    /// Market abbreviation.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Unadjusted => "NONE",
            Self::Following => "FOLLOWING",
            Self::ModifiedFollowing => "MODFOLLOWING",
            Self::Preceding => "PRECEDING",
            Self::ModifiedPreceding => "MODPRECEDING",
        }
    }
}

impl fmt::Display for BusinessDayConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for BusinessDayConvention {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_uppercase())
            .collect();
        Ok(match key.as_str() {
            "NONE" | "UNADJUSTED" => Self::Unadjusted,
            "FOLLOWING" | "F" | "FOLL" => Self::Following,
            "MODFOLLOWING" | "MODIFIEDFOLLOWING" | "MF" => Self::ModifiedFollowing,
            "PRECEDING" | "P" | "PREC" => Self::Preceding,
            "MODPRECEDING" | "MODIFIEDPRECEDING" | "MP" => Self::ModifiedPreceding,
            _ => {
                return Err(CoreError::UnknownBusinessDayConvention {
                    name: s.to_string(),
                })
            }
        })
    }
}

/// Rolls `date` onto a business day of `calendar`.
pub fn adjust<C: Calendar + ?Sized>(
    date: Date,
    convention: BusinessDayConvention,
    calendar: &C,
) -> CoreResult<Date> {
    use BusinessDayConvention as B;

    if convention == B::Unadjusted || calendar.is_business_day(date) {
        return Ok(date);
    }
    let rolled = match convention {
        B::Unadjusted => date,
        B::Following => step(date, 1, calendar),
        B::Preceding => step(date, -1, calendar),
        B::ModifiedFollowing => {
            let next = step(date, 1, calendar);
            if next.month() == date.month() {
                next
            } else {
                step(date, -1, calendar)
            }
        }
        B::ModifiedPreceding => {
            let prev = step(date, -1, calendar);
            if prev.month() == date.month() {
                prev
            } else {
                step(date, 1, calendar)
            }
        }
    };
    Ok(rolled)
}

/// First business day reached from `date` (inclusive) moving by `direction` days.
pub(crate) fn step<C: Calendar + ?Sized>(mut date: Date, direction: i64, calendar: &C) -> Date {
    while !calendar.is_business_day(date) {
        date = date.add_days(direction);
    }
    date
}
