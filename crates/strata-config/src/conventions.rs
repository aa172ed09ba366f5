//! Per-currency market conventions.
//!
//! Every priceable asset takes its day counts, lags, frequencies and
//! holiday list from the [`CurrencyConventions`] of its currency.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use strata_core::calendars::{BusinessDayConvention, HolidayCalendar};
use strata_core::daycounts::DayCountConvention;
use strata_core::types::{Currency, Date, ExpiryRule, Frequency};

use crate::error::{ConfigError, ConfigResult, Validate, ValidationError};

/// Market conventions for one currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyConventions {
    /// Currency these conventions apply to.
    pub currency: Currency,

    /// Deposits, FRAs, caplets and floating legs.
    pub money_market_day_count: DayCountConvention,
    /// Bank bill FRAs and bill caplets.
    pub bill_day_count: DayCountConvention,
    /// Fixed legs of swaps.
    pub fixed_leg_day_count: DayCountConvention,
    /// Bond coupon accrual.
    pub bond_day_count: DayCountConvention,
    /// Time axis of pricing structures.
    #[serde(default = "default_curve_day_count")]
    pub curve_day_count: DayCountConvention,

    /// Business days from trade date to spot.
    pub spot_lag: u32,
    /// Business days from trade date to FX spot.
    #[serde(default = "default_fx_spot_lag")]
    pub fx_spot_lag: u32,
    /// Date roll convention.
    pub business_day_convention: BusinessDayConvention,

    /// Fixed leg payment frequency.
    pub fixed_frequency: Frequency,
    /// Floating leg reset frequency.
    pub floating_frequency: Frequency,
    /// OIS fixed leg frequency beyond one year.
    #[serde(default = "default_ois_frequency")]
    pub ois_frequency: Frequency,

    /// Short-term interest rate futures expiry rule.
    #[serde(default)]
    pub futures_expiry_rule: ExpiryRule,

    /// Explicit holidays (weekends are always non-business days).
    #[serde(default)]
    pub holidays: Vec<Date>,
}

fn default_curve_day_count() -> DayCountConvention {
    DayCountConvention::Act365Fixed
}

fn default_fx_spot_lag() -> u32 {
    2
}

fn default_ois_frequency() -> Frequency {
    Frequency::Annual
}

impl CurrencyConventions {
    /// Generic conventions (ACT/360 money market, T+2, semi-annual fixed,
    /// quarterly floating) for a currency without a standard entry.
    #[must_use]
    pub fn generic(currency: Currency) -> Self {
        Self {
            currency,
            money_market_day_count: DayCountConvention::Act360,
            bill_day_count: DayCountConvention::Act360,
            fixed_leg_day_count: DayCountConvention::Thirty360US,
            bond_day_count: DayCountConvention::ActActIsda,
            curve_day_count: DayCountConvention::Act365Fixed,
            spot_lag: 2,
            fx_spot_lag: 2,
            business_day_convention: BusinessDayConvention::ModifiedFollowing,
            fixed_frequency: Frequency::SemiAnnual,
            floating_frequency: Frequency::Quarterly,
            ois_frequency: Frequency::Annual,
            futures_expiry_rule: ExpiryRule::ImmThirdWednesday,
            holidays: Vec::new(),
        }
    }

    /// AUD: ACT/365F throughout, T+0 money market, bank bill futures.
    #[must_use]
    pub fn aud() -> Self {
        Self {
            money_market_day_count: DayCountConvention::Act365Fixed,
            bill_day_count: DayCountConvention::Act365Fixed,
            fixed_leg_day_count: DayCountConvention::Act365Fixed,
            spot_lag: 0,
            fixed_frequency: Frequency::Quarterly,
            floating_frequency: Frequency::Quarterly,
            futures_expiry_rule: ExpiryRule::SecondFriday,
            ..Self::generic(Currency::AUD)
        }
    }

    /// NZD: ACT/365F, T+2, bank bill futures.
    #[must_use]
    pub fn nzd() -> Self {
        Self {
            money_market_day_count: DayCountConvention::Act365Fixed,
            bill_day_count: DayCountConvention::Act365Fixed,
            fixed_leg_day_count: DayCountConvention::Act365Fixed,
            floating_frequency: Frequency::Quarterly,
            futures_expiry_rule: ExpiryRule::SecondFriday,
            ..Self::generic(Currency::NZD)
        }
    }

    /// USD: ACT/360 money market, 30/360 fixed legs.
    #[must_use]
    pub fn usd() -> Self {
        Self::generic(Currency::USD)
    }

    /// EUR: ACT/360 money market, annual 30E/360 fixed, semi-annual floating.
    #[must_use]
    pub fn eur() -> Self {
        Self {
            fixed_leg_day_count: DayCountConvention::Thirty360E,
            fixed_frequency: Frequency::Annual,
            floating_frequency: Frequency::SemiAnnual,
            ..Self::generic(Currency::EUR)
        }
    }

    /// GBP: ACT/365F, same-day spot, semi-annual legs.
    #[must_use]
    pub fn gbp() -> Self {
        Self {
            money_market_day_count: DayCountConvention::Act365Fixed,
            bill_day_count: DayCountConvention::Act365Fixed,
            fixed_leg_day_count: DayCountConvention::Act365Fixed,
            spot_lag: 0,
            floating_frequency: Frequency::SemiAnnual,
            ..Self::generic(Currency::GBP)
        }
    }

    /// JPY: ACT/360 money market, ACT/365F semi-annual fixed legs.
    #[must_use]
    pub fn jpy() -> Self {
        Self {
            fixed_leg_day_count: DayCountConvention::Act365Fixed,
            floating_frequency: Frequency::SemiAnnual,
            ..Self::generic(Currency::JPY)
        }
    }

    /// Holiday calendar built from the explicit holiday list.
    #[must_use]
    pub fn calendar(&self) -> HolidayCalendar {
        HolidayCalendar::new(self.currency.code(), self.holidays.iter().copied())
    }

    /// Adds a holiday.
    #[must_use]
    pub fn with_holiday(mut self, date: Date) -> Self {
        self.holidays.push(date);
        self
    }

    /// Sets the spot lag.
    #[must_use]
    pub fn with_spot_lag(mut self, spot_lag: u32) -> Self {
        self.spot_lag = spot_lag;
        self
    }
}

impl Validate for CurrencyConventions {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.spot_lag > 5 {
            errors.push(ValidationError::with_rule(
                "spot_lag",
                "Spot lag cannot exceed 5 days",
                "max_spot_lag",
            ));
        }
        if self.fx_spot_lag > 5 {
            errors.push(ValidationError::with_rule(
                "fx_spot_lag",
                "FX spot lag cannot exceed 5 days",
                "max_spot_lag",
            ));
        }
        if self.fixed_frequency == Frequency::Once || self.floating_frequency == Frequency::Once {
            errors.push(ValidationError::with_rule(
                "fixed_frequency",
                "Swap legs need a periodic frequency",
                "periodic_legs",
            ));
        }

        errors
    }
}

static STANDARD: Lazy<ConventionTable> = Lazy::new(|| {
    ConventionTable::from_entries([
        CurrencyConventions::aud(),
        CurrencyConventions::usd(),
        CurrencyConventions::eur(),
        CurrencyConventions::gbp(),
        CurrencyConventions::nzd(),
        CurrencyConventions::jpy(),
    ])
});

/// Lookup of conventions by currency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConventionTable {
    entries: HashMap<Currency, CurrencyConventions>,
}

impl ConventionTable {
    /// Table holding the given entries (later entries replace earlier ones).
    pub fn from_entries(entries: impl IntoIterator<Item = CurrencyConventions>) -> Self {
        Self {
            entries: entries.into_iter().map(|c| (c.currency, c)).collect(),
        }
    }

    /// Shared table with AUD, USD, EUR, GBP, NZD and JPY conventions.
    #[must_use]
    pub fn standard() -> &'static ConventionTable {
        &STANDARD
    }

    /// Standard table with `overrides` applied on top.
    pub fn standard_with(overrides: impl IntoIterator<Item = CurrencyConventions>) -> Self {
        let mut table = STANDARD.clone();
        for conventions in overrides {
            table.insert(conventions);
        }
        table
    }

    /// Inserts or replaces the entry for a currency.
    pub fn insert(&mut self, conventions: CurrencyConventions) {
        self.entries.insert(conventions.currency, conventions);
    }

    /// Entry for a currency.
    #[must_use]
    pub fn get(&self, currency: Currency) -> Option<&CurrencyConventions> {
        self.entries.get(&currency)
    }

    /// Entry for a currency, or an error naming it.
    pub fn lookup(&self, currency: Currency) -> ConfigResult<&CurrencyConventions> {
        self.get(currency).ok_or_else(|| ConfigError::NotFound {
            key: format!("conventions for {currency}"),
        })
    }

    /// Entry for a currency, falling back to [`CurrencyConventions::generic`].
    #[must_use]
    pub fn get_or_generic(&self, currency: Currency) -> CurrencyConventions {
        self.get(currency)
            .cloned()
            .unwrap_or_else(|| CurrencyConventions::generic(currency))
    }

    /// Currencies in the table.
    pub fn currencies(&self) -> impl Iterator<Item = &Currency> {
        self.entries.keys()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Validate for ConventionTable {
    fn validate(&self) -> Vec<ValidationError> {
        self.entries
            .values()
            .flat_map(|c| {
                let prefix = format!("conventions[{}]", c.currency);
                c.validate().into_iter().map(move |e| e.nested(&prefix))
            })
            .collect()
    }
}
