//! # Strata Core
//!
//! Core types shared by every Strata crate.
//!
//! - **Types**: [`Date`], [`Period`]/[`Tenor`], futures expiry codes, currencies,
//!   payment frequencies and compounding
//! - **Day Count Conventions**: year fractions for accrual and curve time
//! - **Business Day Calendars**: the [`Calendar`](calendars::Calendar) seam, roll
//!   conventions and calendars built from configured holiday lists
//! - **Schedules**: regular payment schedules rolled back from maturity
//!
//! ## Example
//!
//! ```rust
//! use strata_core::prelude::*;
//!
//! let trade = Date::from_ymd(2025, 1, 15).unwrap();
//! let tenor: Tenor = "3M".parse().unwrap();
//! let end = tenor.add_to(trade).unwrap();
//! assert_eq!(end, Date::from_ymd(2025, 4, 15).unwrap());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::similar_names)]
#![allow(clippy::uninlined_format_args)]

pub mod calendars;
pub mod daycounts;
pub mod error;
pub mod schedule;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::calendars::{BusinessDayConvention, Calendar, HolidayCalendar, WeekendCalendar};
    pub use crate::daycounts::{DayCount, DayCountConvention};
    pub use crate::error::{CoreError, CoreResult};
    pub use crate::schedule::{Schedule, ScheduleConfig};
    pub use crate::types::{
        Compounding, Currency, CurrencyPair, Date, ExpiryRule, Frequency, FuturesCode, Period,
        Tenor, TimeUnit,
    };
}

pub use error::{CoreError, CoreResult};
pub use types::{Currency, Date, Period, Tenor};
