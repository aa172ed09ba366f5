//! ISO currency codes and currency pairs.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};

/// A three-letter ISO 4217 currency code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Currency([u8; 3]);

impl Currency {
    /// Australian dollar.
    pub const AUD: Currency = Currency(*b"AUD");
    /// US dollar.
    pub const USD: Currency = Currency(*b"USD");
    /// Euro.
    pub const EUR: Currency = Currency(*b"EUR");
    /// Pound sterling.
    pub const GBP: Currency = Currency(*b"GBP");
    /// New Zealand dollar.
    pub const NZD: Currency = Currency(*b"NZD");
    /// Japanese yen.
    pub const JPY: Currency = Currency(*b"JPY");

    /// Parses an upper-case three-letter code.
    pub fn parse(code: &str) -> CoreResult<Self> {
        let bytes = code.trim().as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_uppercase) {
            return Err(CoreError::InvalidCurrency {
                code: code.to_string(),
            });
        }
        Ok(Currency([bytes[0], bytes[1], bytes[2]]))
    }

    /// The code as a string slice.
    #[must_use]
    pub fn code(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Currency {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Currency::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// An FX pair quoted as units of `quote` per one unit of `base` (`AUDUSD`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyPair {
    /// Base (commodity) currency.
    pub base: Currency,
    /// Quote (terms) currency.
    pub quote: Currency,
}

impl CurrencyPair {
    /// Creates a pair.
    #[must_use]
    pub fn new(base: Currency, quote: Currency) -> Self {
        Self { base, quote }
    }

    /// Parses a six-letter pair such as `AUDUSD`.
    pub fn parse(code: &str) -> CoreResult<Self> {
        let trimmed = code.trim();
        if trimmed.len() != 6 || !trimmed.is_ascii() {
            return Err(CoreError::InvalidCurrency {
                code: code.to_string(),
            });
        }
        let base = Currency::parse(&trimmed[..3]).map_err(|_| CoreError::InvalidCurrency {
            code: code.to_string(),
        })?;
        let quote = Currency::parse(&trimmed[3..]).map_err(|_| CoreError::InvalidCurrency {
            code: code.to_string(),
        })?;
        Ok(Self { base, quote })
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.base, self.quote)
    }
}

impl FromStr for CurrencyPair {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
