//! Market quotations attached to priceable assets.
//!
//! | Unit | Meaning | Normalised |
//! |------|---------|------------|
//! | `DecimalRate` | 0.0525 | as is |
//! | `Rate` | 5.25 (percent) | / 100 |
//! | `DecimalVolatility` | 0.20 | as is |
//! | `LognormalVolatility` | 20.0 (percent) | / 100 |
//! | `DecimalSpread` | 0.0010 | as is |
//! | `Price` | 95.25 (futures, 100 - rate) | as is |
//! | `DirtyPrice`, `Premium`, `DecimalValue` | amounts | as is |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{CurveError, CurveResult};

/// What a quotation measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasureType {
    /// The calibrating market quote.
    MarketQuote,
    /// An attached volatility.
    Volatility,
    /// An option premium.
    Premium,
    /// A spread added to the market quote.
    Spread,
}

impl fmt::Display for MeasureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::MarketQuote => "MarketQuote",
            Self::Volatility => "Volatility",
            Self::Premium => "Premium",
            Self::Spread => "Spread",
        };
        f.write_str(name)
    }
}

impl FromStr for MeasureType {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "marketquote" => Ok(Self::MarketQuote),
            "volatility" => Ok(Self::Volatility),
            "premium" => Ok(Self::Premium),
            "spread" => Ok(Self::Spread),
            _ => Err(CurveError::invalid_quote(format!("unknown measure type '{s}'"))),
        }
    }
}

/// Units a quotation value is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuoteUnit {
    /// Decimal rate.
    DecimalRate,
    /// Percent rate.
    Rate,
    /// Decimal volatility.
    DecimalVolatility,
    /// Percent lognormal volatility.
    LognormalVolatility,
    /// Decimal spread.
    DecimalSpread,
    /// Option premium.
    Premium,
    /// Bond dirty price per 100.
    DirtyPrice,
    /// Futures price (100 minus the rate in percent).
    Price,
    /// Plain decimal value (index levels).
    DecimalValue,
}

impl QuoteUnit {
    /// Converts a value in this unit to its decimal form.
    #[must_use]
    pub fn normalise(&self, value: f64) -> f64 {
        match self {
            Self::Rate | Self::LognormalVolatility => value / 100.0,
            _ => value,
        }
    }
}

impl fmt::Display for QuoteUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DecimalRate => "DecimalRate",
            Self::Rate => "Rate",
            Self::DecimalVolatility => "DecimalVolatility",
            Self::LognormalVolatility => "LognormalVolatility",
            Self::DecimalSpread => "DecimalSpread",
            Self::Premium => "Premium",
            Self::DirtyPrice => "DirtyPrice",
            Self::Price => "Price",
            Self::DecimalValue => "DecimalValue",
        };
        f.write_str(name)
    }
}

impl FromStr for QuoteUnit {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "decimalrate" => Ok(Self::DecimalRate),
            "rate" => Ok(Self::Rate),
            "decimalvolatility" => Ok(Self::DecimalVolatility),
            "lognormalvolatility" => Ok(Self::LognormalVolatility),
            "decimalspread" => Ok(Self::DecimalSpread),
            "premium" => Ok(Self::Premium),
            "dirtyprice" => Ok(Self::DirtyPrice),
            "price" => Ok(Self::Price),
            "decimalvalue" => Ok(Self::DecimalValue),
            _ => Err(CurveError::invalid_quote(format!("unknown quote unit '{s}'"))),
        }
    }
}

/// A single quotation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BasicQuotation {
    /// What is measured.
    pub measure: MeasureType,
    /// Unit of `value`.
    pub unit: QuoteUnit,
    /// Raw value as quoted.
    pub value: f64,
}

impl BasicQuotation {
    /// Creates a quotation.
    #[must_use]
    pub fn new(measure: MeasureType, unit: QuoteUnit, value: f64) -> Self {
        Self { measure, unit, value }
    }

    /// A decimal market quote.
    #[must_use]
    pub fn market_quote(value: f64) -> Self {
        Self::new(MeasureType::MarketQuote, QuoteUnit::DecimalRate, value)
    }

    /// A decimal volatility.
    #[must_use]
    pub fn volatility(value: f64) -> Self {
        Self::new(MeasureType::Volatility, QuoteUnit::DecimalVolatility, value)
    }

    /// A decimal spread.
    #[must_use]
    pub fn spread(value: f64) -> Self {
        Self::new(MeasureType::Spread, QuoteUnit::DecimalSpread, value)
    }

    /// The value converted to decimal form.
    #[must_use]
    pub fn normalised(&self) -> f64 {
        self.unit.normalise(self.value)
    }
}

/// Converts a futures price to a decimal rate.
#[must_use]
pub fn futures_price_to_rate(price: f64) -> f64 {
    (100.0 - price) / 100.0
}

/// Converts a decimal rate to a futures price.
#[must_use]
pub fn rate_to_futures_price(rate: f64) -> f64 {
    100.0 - rate * 100.0
}

/// The quotations attached to one asset, at most one per measure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuoteSet {
    quotes: Vec<BasicQuotation>,
}

impl QuoteSet {
    /// Creates a set, keeping the last quotation of each measure.
    pub fn new(quotes: impl IntoIterator<Item = BasicQuotation>) -> CurveResult<Self> {
        let mut set = Self::default();
        for q in quotes {
            set.insert(q)?;
        }
        Ok(set)
    }

    /// A set holding one decimal market quote.
    pub fn from_market_quote(value: f64) -> CurveResult<Self> {
        Self::new([BasicQuotation::market_quote(value)])
    }

    /// Inserts or replaces the quotation for its measure.
    pub fn insert(&mut self, quote: BasicQuotation) -> CurveResult<()> {
        if !quote.value.is_finite() {
            return Err(CurveError::invalid_quote(format!(
                "{} quote {} is not finite",
                quote.measure, quote.value
            )));
        }
        match self.quotes.iter_mut().find(|q| q.measure == quote.measure) {
            Some(existing) => *existing = quote,
            None => self.quotes.push(quote),
        }
        Ok(())
    }

    /// The quotation for a measure.
    #[must_use]
    pub fn get(&self, measure: MeasureType) -> Option<&BasicQuotation> {
        self.quotes.iter().find(|q| q.measure == measure)
    }

    /// The market quote, required.
    pub fn market_quote(&self) -> CurveResult<&BasicQuotation> {
        self.get(MeasureType::MarketQuote)
            .ok_or_else(|| CurveError::invalid_quote("no MarketQuote attached"))
    }

    /// Normalised value of a measure, if attached.
    #[must_use]
    pub fn normalised(&self, measure: MeasureType) -> Option<f64> {
        self.get(measure).map(BasicQuotation::normalised)
    }

    /// Replaces the market quote value, keeping its unit.
    pub fn set_market_quote(&mut self, value: f64) -> CurveResult<()> {
        let unit = self
            .get(MeasureType::MarketQuote)
            .map_or(QuoteUnit::DecimalRate, |q| q.unit);
        self.insert(BasicQuotation::new(MeasureType::MarketQuote, unit, value))
    }

    /// All quotations.
    pub fn iter(&self) -> impl Iterator<Item = &BasicQuotation> {
        self.quotes.iter()
    }
}
