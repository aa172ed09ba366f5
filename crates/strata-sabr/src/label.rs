//! Expiry and tenor labels.
//!
//! Grids and queries spell the same term several ways (`6m`, `6M`, `1yr`,
//! `1Y`, `0.25y`). A [`TermLabel`] keeps the amount as a [`Decimal`] so the
//! canonical form is exact: `1.0y` and `1yr` both display as `1Y`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{SabrError, SabrResult};

/// Unit of a term label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TermUnit {
    /// Calendar days.
    Day,
    /// Weeks.
    Week,
    /// Months.
    Month,
    /// Years.
    Year,
}

impl TermUnit {
    /// Single-letter code used in the canonical form.
    #[must_use]
    pub fn code(self) -> char {
        match self {
            Self::Day => 'D',
            Self::Week => 'W',
            Self::Month => 'M',
            Self::Year => 'Y',
        }
    }

    /// Units per year.
    #[must_use]
    pub fn per_year(self) -> f64 {
        match self {
            Self::Day => 365.0,
            Self::Week => 52.0,
            Self::Month => 12.0,
            Self::Year => 1.0,
        }
    }

    fn parse(unit: &str) -> Option<Self> {
        match unit {
            "d" | "day" | "days" => Some(Self::Day),
            "w" | "wk" | "wks" | "week" | "weeks" => Some(Self::Week),
            "m" | "mo" | "mth" | "mths" | "month" | "months" => Some(Self::Month),
            "y" | "yr" | "yrs" | "year" | "years" => Some(Self::Year),
            _ => None,
        }
    }
}

/// A normalised expiry or tenor, e.g. `3M` or `0.25Y`.
///
/// Two labels are equal when their canonical forms are equal; `12M` and
/// `1Y` are distinct labels with the same [`year_fraction`](Self::year_fraction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TermLabel {
    amount: Decimal,
    unit: TermUnit,
}

impl TermLabel {
    /// Creates a label from an amount and unit.
    pub fn new(amount: Decimal, unit: TermUnit) -> SabrResult<Self> {
        if amount.is_sign_negative() {
            return Err(SabrError::invalid_label(format!("{amount}{}", unit.code())));
        }
        Ok(Self {
            amount: amount.normalize(),
            unit,
        })
    }

    /// A whole number of years.
    #[must_use]
    pub fn years(years: u32) -> Self {
        Self {
            amount: Decimal::from(years),
            unit: TermUnit::Year,
        }
    }

    /// A whole number of months.
    #[must_use]
    pub fn months(months: u32) -> Self {
        Self {
            amount: Decimal::from(months),
            unit: TermUnit::Month,
        }
    }

    /// Parses a label such as `6m`, `1yr`, `0.25Y` or `2 weeks`.
    ///
    /// A bare number is read as years.
    pub fn parse(label: &str) -> SabrResult<Self> {
        let trimmed = label.trim().to_ascii_lowercase();
        let split = trimmed
            .find(|c: char| c.is_ascii_alphabetic())
            .unwrap_or(trimmed.len());
        let (number, unit) = trimmed.split_at(split);

        let amount = Decimal::from_str(number.trim()).map_err(|_| SabrError::invalid_label(label))?;
        let unit = if unit.is_empty() {
            TermUnit::Year
        } else {
            TermUnit::parse(unit.trim()).ok_or_else(|| SabrError::invalid_label(label))?
        };
        Self::new(amount, unit).map_err(|_| SabrError::invalid_label(label))
    }

    /// A label from a number of years, as found in numeric grid headers.
    pub fn from_years(years: f64) -> SabrResult<Self> {
        let amount = Decimal::from_f64_retain(years)
            .ok_or_else(|| SabrError::invalid_label(years.to_string()))?;
        // Retained binary noise beyond 12 places is never intended.
        Self::new(amount.round_dp(12), TermUnit::Year)
    }

    /// Amount in units.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Unit.
    #[must_use]
    pub fn unit(&self) -> TermUnit {
        self.unit
    }

    /// Length in years: days/365, weeks/52, months/12.
    #[must_use]
    pub fn year_fraction(&self) -> f64 {
        self.amount.to_f64().unwrap_or(f64::NAN) / self.unit.per_year()
    }
}

impl fmt::Display for TermLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.unit.code())
    }
}

impl FromStr for TermLabel {
    type Err = SabrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for TermLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TermLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_spellings_normalise() {
        assert_eq!(TermLabel::parse("6m").unwrap(), TermLabel::parse("6M").unwrap());
        assert_eq!(TermLabel::parse("1yr").unwrap(), TermLabel::years(1));
        assert_eq!(TermLabel::parse("1.0y").unwrap().to_string(), "1Y");
        assert_eq!(TermLabel::parse("0.25y").unwrap().to_string(), "0.25Y");
        assert_eq!(TermLabel::parse(" 10 years ").unwrap().to_string(), "10Y");
        assert_eq!(TermLabel::parse("2wk").unwrap().to_string(), "2W");
    }

    #[test]
    fn test_bare_number_is_years() {
        assert_eq!(TermLabel::parse("5").unwrap(), TermLabel::years(5));
        assert_eq!(TermLabel::from_years(0.5).unwrap().to_string(), "0.5Y");
    }

    #[test]
    fn test_year_fraction() {
        assert_relative_eq!(TermLabel::parse("3m").unwrap().year_fraction(), 0.25);
        assert_relative_eq!(TermLabel::parse("0.25y").unwrap().year_fraction(), 0.25);
        assert_relative_eq!(TermLabel::parse("26w").unwrap().year_fraction(), 0.5);
        assert_relative_eq!(TermLabel::parse("73d").unwrap().year_fraction(), 0.2);
        assert_relative_eq!(TermLabel::parse("0m").unwrap().year_fraction(), 0.0);
    }

    #[test]
    fn test_months_and_years_are_distinct_labels() {
        let m = TermLabel::months(12);
        let y = TermLabel::years(1);
        assert_ne!(m, y);
        assert_relative_eq!(m.year_fraction(), y.year_fraction());
    }

    #[test]
    fn test_rejects_garbage() {
        for label in ["", "ATM", "3q", "-1y", "y"] {
            assert!(matches!(TermLabel::parse(label), Err(SabrError::InvalidLabel { .. })), "{label}");
        }
    }

    #[test]
    fn test_serde_as_string() {
        let label = TermLabel::parse("6m").unwrap();
        let json = serde_json::to_string(&label).unwrap();
        assert_eq!(json, "\"6M\"");
        let back: TermLabel = serde_json::from_str("\"6mo\"").unwrap();
        assert_eq!(back, label);
    }
}
