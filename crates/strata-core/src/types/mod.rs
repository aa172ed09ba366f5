//! Domain types: dates, tenors, futures codes, currencies and rate conventions.

mod currency;
mod date;
mod frequency;
mod futures;
mod period;

pub use currency::{Currency, CurrencyPair};
pub use date::Date;
pub use frequency::{Compounding, Frequency};
pub use futures::{ExpiryRule, FuturesCode};
pub use period::{Period, Tenor, TimeUnit};
