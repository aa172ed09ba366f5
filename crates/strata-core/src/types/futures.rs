//! Futures expiry codes (`Z9`, `H25`) and expiry date rules.

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};
use crate::types::Date;

const MONTH_CODES: [char; 12] = ['F', 'G', 'H', 'J', 'K', 'M', 'N', 'Q', 'U', 'V', 'X', 'Z'];

/// How a contract month maps to its expiry (value) date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExpiryRule {
    /// Third Wednesday of the contract month (IMM date).
    #[default]
    ImmThirdWednesday,
    /// Second Friday of the contract month (bank bill futures).
    SecondFriday,
}

/// A futures expiry code: month letter followed by a one to four digit year.
///
/// One or two digit years resolve to the first matching year on or after the
/// base date's contract month, so `Z9` seen in 2025 means December 2029.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FuturesCode {
    month: u32,
    year_code: u32,
    year_width: u8,
}

impl FuturesCode {
    /// Parses a code such as `Z9`, `H10` or `M2026`.
    pub fn parse(code: &str) -> CoreResult<Self> {
        let trimmed = code.trim();
        let mut chars = trimmed.chars();
        let letter = chars
            .next()
            .ok_or_else(|| CoreError::invalid_futures_code(code, "empty code"))?
            .to_ascii_uppercase();
        let month = MONTH_CODES
            .iter()
            .position(|&c| c == letter)
            .ok_or_else(|| CoreError::invalid_futures_code(code, "unknown month letter"))?
            as u32
            + 1;
        let digits = chars.as_str();
        if digits.is_empty() || digits.len() > 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(CoreError::invalid_futures_code(
                code,
                "year must be one to four digits",
            ));
        }
        let year_code = digits
            .parse::<u32>()
            .map_err(|e| CoreError::invalid_futures_code(code, e.to_string()))?;
        Ok(Self {
            month,
            year_code,
            year_width: digits.len() as u8,
        })
    }

    /// Contract month (1-12).
    #[must_use]
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Resolves the contract year relative to `base`.
    #[must_use]
    pub fn contract_year(&self, base: Date) -> i32 {
        if self.year_width >= 4 {
            return self.year_code as i32;
        }
        let modulus = 10_i32.pow(u32::from(self.year_width));
        let code = self.year_code as i32;
        let mut year = base.year() - base.year().rem_euclid(modulus) + code;
        if year < base.year() || (year == base.year() && self.month < base.month()) {
            year += modulus;
        }
        year
    }

    /// Expiry date of the contract under `rule`.
    pub fn expiry_date(&self, base: Date, rule: ExpiryRule) -> CoreResult<Date> {
        let year = self.contract_year(base);
        match rule {
            ExpiryRule::ImmThirdWednesday => Date::nth_weekday(year, self.month, Weekday::Wed, 3),
            ExpiryRule::SecondFriday => Date::nth_weekday(year, self.month, Weekday::Fri, 2),
        }
    }
}

impl fmt::Display for FuturesCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = MONTH_CODES[(self.month - 1) as usize];
        write!(
            f,
            "{letter}{:0width$}",
            self.year_code,
            width = usize::from(self.year_width)
        )
    }
}

impl FromStr for FuturesCode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
