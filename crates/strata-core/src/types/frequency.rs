//! Payment frequency and interest compounding.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::Period;

/// Payment frequency of a leg or coupon schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Frequency {
    /// Once a year.
    Annual,
    /// Twice a year.
    #[default]
    SemiAnnual,
    /// Four times a year.
    Quarterly,
    /// Twelve times a year.
    Monthly,
    /// Single payment at maturity.
    Once,
}

impl Frequency {
    /// Number of periods per year (zero for a single payment).
    #[must_use]
    pub fn periods_per_year(&self) -> u32 {
        match self {
            Frequency::Annual => 1,
            Frequency::SemiAnnual => 2,
            Frequency::Quarterly => 4,
            Frequency::Monthly => 12,
            Frequency::Once => 0,
        }
    }

    /// The roll period, `None` for a single payment.
    #[must_use]
    pub fn period(&self) -> Option<Period> {
        match self {
            Frequency::Once => None,
            other => Some(Period::months(12 / other.periods_per_year() as i32)),
        }
    }

    /// Frequency whose roll period equals `period`, if any.
    #[must_use]
    pub fn from_period(period: Period) -> Option<Self> {
        match period.total_months()? {
            12 => Some(Frequency::Annual),
            6 => Some(Frequency::SemiAnnual),
            3 => Some(Frequency::Quarterly),
            1 => Some(Frequency::Monthly),
            _ => None,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Frequency::Annual => "Annual",
            Frequency::SemiAnnual => "Semi-Annual",
            Frequency::Quarterly => "Quarterly",
            Frequency::Monthly => "Monthly",
            Frequency::Once => "Once",
        };
        write!(f, "{name}")
    }
}

/// Interest compounding convention used to quote zero rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Compounding {
    /// Simple interest: `DF = 1 / (1 + r t)`.
    Simple,
    /// Compounded `n` times a year: `DF = (1 + r/n)^(-n t)`.
    Periodic(u32),
    /// Continuous: `DF = exp(-r t)`.
    #[default]
    Continuous,
}

impl Compounding {
    /// Discount factor implied by `rate` over `t` years.
    #[must_use]
    pub fn discount_factor(&self, rate: f64, t: f64) -> f64 {
        match *self {
            Compounding::Simple => 1.0 / (1.0 + rate * t),
            Compounding::Periodic(n) => {
                let n = f64::from(n.max(1));
                (1.0 + rate / n).powf(-n * t)
            }
            Compounding::Continuous => (-rate * t).exp(),
        }
    }

    /// Rate implied by discount factor `df` over `t` years (`t > 0`).
    #[must_use]
    pub fn rate(&self, df: f64, t: f64) -> f64 {
        match *self {
            Compounding::Simple => (1.0 / df - 1.0) / t,
            Compounding::Periodic(n) => {
                let n = f64::from(n.max(1));
                n * (df.powf(-1.0 / (n * t)) - 1.0)
            }
            Compounding::Continuous => -df.ln() / t,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_frequency_periods() {
        assert_eq!(Frequency::Quarterly.period(), Some(Period::months(3)));
        assert_eq!(Frequency::Once.period(), None);
        assert_eq!(Frequency::from_period(Period::years(1)), Some(Frequency::Annual));
        assert_eq!(Frequency::from_period(Period::months(4)), None);
    }

    #[test]
    fn test_compounding_round_trip() {
        for compounding in [
            Compounding::Simple,
            Compounding::Periodic(2),
            Compounding::Continuous,
        ] {
            let df = compounding.discount_factor(0.05, 2.5);
            assert_relative_eq!(compounding.rate(df, 2.5), 0.05, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_compounding_ordering() {
        // More frequent compounding gives a lower discount factor for the same rate
        let simple = Compounding::Simple.discount_factor(0.05, 2.0);
        let annual = Compounding::Periodic(1).discount_factor(0.05, 2.0);
        let continuous = Compounding::Continuous.discount_factor(0.05, 2.0);
        assert!(simple > annual && annual > continuous);
    }
}
