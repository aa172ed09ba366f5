//! Accrual legs shared by swap-style controllers.

use strata_core::daycounts::DayCountConvention;
use strata_core::schedule::{Schedule, ScheduleConfig};
use strata_core::types::{Date, Frequency};

use super::AssetContext;
use crate::curves::RateCurve;
use crate::error::{CurveError, CurveResult};

/// One accrual period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct AccrualPeriod {
    pub start: Date,
    pub end: Date,
    pub accrual: f64,
}

/// A regular leg of accrual periods paid at period end.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Leg {
    periods: Vec<AccrualPeriod>,
}

impl Leg {
    /// Generates a leg on the currency calendar.
    pub fn generate(
        ctx: &AssetContext,
        start: Date,
        end: Date,
        frequency: Frequency,
        day_count: DayCountConvention,
    ) -> CurveResult<Self> {
        let config = ScheduleConfig::new(start, end, frequency)
            .with_business_day_convention(ctx.conventions().business_day_convention);
        let schedule = Schedule::generate(&config, ctx.calendar())?;
        let periods: Vec<AccrualPeriod> = schedule
            .periods()
            .map(|(s, e)| AccrualPeriod {
                start: s,
                end: e,
                accrual: day_count.year_fraction(s, e),
            })
            .collect();
        if periods.is_empty() {
            return Err(CurveError::invalid_curve(format!("empty leg from {start} to {end}")));
        }
        Ok(Self { periods })
    }

    pub fn periods(&self) -> &[AccrualPeriod] {
        &self.periods
    }

    pub fn last(&self) -> &AccrualPeriod {
        // generate() guarantees at least one period
        &self.periods[self.periods.len() - 1]
    }

    pub fn start(&self) -> Date {
        self.periods[0].start
    }

    pub fn end(&self) -> Date {
        self.last().end
    }

    /// `Σ τᵢ DF(tᵢ)`.
    pub fn annuity(&self, discount: &RateCurve) -> CurveResult<f64> {
        self.periods.iter().try_fold(0.0, |acc, p| {
            Ok(acc + p.accrual * discount.discount_factor(p.end)?)
        })
    }

    /// Annuity of every period except the last.
    pub fn annuity_before_last(&self, discount: &RateCurve) -> CurveResult<f64> {
        let n = self.periods.len() - 1;
        self.periods[..n].iter().try_fold(0.0, |acc, p| {
            Ok(acc + p.accrual * discount.discount_factor(p.end)?)
        })
    }

    /// Value of the projected floating coupons, `Σ (P(sᵢ)/P(eᵢ) - 1) DF(eᵢ)`.
    pub fn floating_pv(&self, discount: &RateCurve, forecast: &RateCurve) -> CurveResult<f64> {
        self.periods.iter().try_fold(0.0, |acc, p| {
            let projected = forecast.discount_factor(p.start)? / forecast.discount_factor(p.end)? - 1.0;
            Ok(acc + projected * discount.discount_factor(p.end)?)
        })
    }
}
