//! Asset identifier grammar.
//!
//! Identifiers are dash-delimited: currency (or currency pair), family, then
//! family-specific tokens. A canonical identifier displays back to exactly
//! the string it was parsed from.
//!
//! ```rust
//! use strata_curves::assets::{AssetFamily, AssetIdentifier};
//!
//! let id: AssetIdentifier = "AUD-Caplet-6M-3M-0.07".parse().unwrap();
//! assert_eq!(id.family(), AssetFamily::Caplet);
//! assert_eq!(id.to_string(), "AUD-Caplet-6M-3M-0.07");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use strata_core::types::{Currency, CurrencyPair, FuturesCode, Period, Tenor};

use crate::error::{CurveError, CurveResult};

/// Instrument families understood by the asset factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssetFamily {
    /// Money market deposit.
    Deposit,
    /// Interbank offered rate fixing.
    Xibor,
    /// Short-term interest rate future.
    IRFuture,
    /// Fixed-for-floating interest rate swap.
    IRSwap,
    /// Forward rate agreement.
    Fra,
    /// Bank bill forward rate agreement.
    BillFra,
    /// Overnight index swap.
    OIS,
    /// Consumer price index level.
    CPIndex,
    /// Cross-currency fixed-for-floating swap.
    XccySwap,
    /// Cross-currency floating-for-floating basis swap.
    XccyBasisSwap,
    /// Single-currency tenor basis swap.
    BasisSwap,
    /// Fixed coupon bond.
    Bond,
    /// Interest rate caplet.
    Caplet,
    /// Interest rate floorlet.
    Floorlet,
    /// Bank bill caplet.
    BillCaplet,
    /// Bank bill floorlet.
    BillFloorlet,
    /// FX spot (or short-date) rate.
    FxSpot,
    /// FX forward outright.
    FxForward,
    /// Commodity spot price.
    CommoditySpot,
    /// Commodity forward price.
    CommodityForward,
    /// Commodity futures price.
    CommodityFuture,
    /// Spread between two forward rates.
    SpreadFra,
}

impl AssetFamily {
    /// All families.
    pub const ALL: [AssetFamily; 22] = [
        AssetFamily::Deposit,
        AssetFamily::Xibor,
        AssetFamily::IRFuture,
        AssetFamily::IRSwap,
        AssetFamily::Fra,
        AssetFamily::BillFra,
        AssetFamily::OIS,
        AssetFamily::CPIndex,
        AssetFamily::XccySwap,
        AssetFamily::XccyBasisSwap,
        AssetFamily::BasisSwap,
        AssetFamily::Bond,
        AssetFamily::Caplet,
        AssetFamily::Floorlet,
        AssetFamily::BillCaplet,
        AssetFamily::BillFloorlet,
        AssetFamily::FxSpot,
        AssetFamily::FxForward,
        AssetFamily::CommoditySpot,
        AssetFamily::CommodityForward,
        AssetFamily::CommodityFuture,
        AssetFamily::SpreadFra,
    ];

    /// Canonical name as it appears in identifiers.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Deposit => "Deposit",
            Self::Xibor => "Xibor",
            Self::IRFuture => "IRFuture",
            Self::IRSwap => "IRSwap",
            Self::Fra => "Fra",
            Self::BillFra => "BillFra",
            Self::OIS => "OIS",
            Self::CPIndex => "CPIndex",
            Self::XccySwap => "XccySwap",
            Self::XccyBasisSwap => "XccyBasisSwap",
            Self::BasisSwap => "BasisSwap",
            Self::Bond => "Bond",
            Self::Caplet => "Caplet",
            Self::Floorlet => "Floorlet",
            Self::BillCaplet => "BillCaplet",
            Self::BillFloorlet => "BillFloorlet",
            Self::FxSpot => "FxSpot",
            Self::FxForward => "FxForward",
            Self::CommoditySpot => "CommoditySpot",
            Self::CommodityForward => "CommodityForward",
            Self::CommodityFuture => "CommodityFuture",
            Self::SpreadFra => "SpreadFra",
        }
    }

    /// Case-insensitive lookup by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.name().eq_ignore_ascii_case(name))
    }

    /// FX families are keyed by a currency pair.
    #[must_use]
    pub fn is_fx(&self) -> bool {
        matches!(self, Self::FxSpot | Self::FxForward)
    }

    /// Caplet and floorlet families.
    #[must_use]
    pub fn is_option(&self) -> bool {
        matches!(
            self,
            Self::Caplet | Self::Floorlet | Self::BillCaplet | Self::BillFloorlet
        )
    }
}

impl fmt::Display for AssetFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AssetFamily {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| CurveError::malformed(s, "unknown asset family"))
    }
}

/// Family-specific part of an identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AssetDescriptor {
    /// A single tenor from spot: deposits, OIS, CPI, FX.
    Term {
        /// Tenor from spot.
        tenor: Tenor,
    },
    /// Swap term with an optional floating index tenor.
    Swap {
        /// Swap maturity.
        term: Period,
        /// Floating index tenor.
        index_tenor: Option<Period>,
    },
    /// Forward period starting `start` after spot and lasting `index_tenor`.
    Forward {
        /// Forward start.
        start: Period,
        /// Index (accrual) tenor.
        index_tenor: Period,
    },
    /// Caplet or floorlet on a forward period.
    Optionlet {
        /// Period start.
        start: Period,
        /// Index tenor.
        index_tenor: Period,
        /// Decimal strike rate.
        strike: f64,
        /// Fraction digits the strike was written with.
        strike_digits: Option<usize>,
    },
    /// Exchange-traded futures contract.
    Future {
        /// Contract (product) code.
        contract: String,
        /// Expiry month and year.
        expiry: FuturesCode,
    },
    /// Commodity spot or forward.
    Commodity {
        /// Commodity code.
        code: String,
        /// Forward tenor; `None` for spot.
        tenor: Option<Tenor>,
    },
    /// Fixed coupon bond.
    Bond {
        /// Issuer code.
        issuer: String,
        /// Annual coupon in percent.
        coupon: f64,
        /// Fraction digits the coupon was written with.
        coupon_digits: Option<usize>,
        /// Maturity from the base date.
        maturity: Period,
    },
}

/// A parsed asset identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssetIdentifier {
    currency: Currency,
    pair: Option<CurrencyPair>,
    family: AssetFamily,
    descriptor: AssetDescriptor,
}

impl AssetIdentifier {
    /// Parses an identifier.
    pub fn parse(id: &str) -> CurveResult<Self> {
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(CurveError::malformed(id, "empty identifier"));
        }
        let tokens: Vec<&str> = trimmed.split('-').collect();
        if tokens.len() < 3 {
            return Err(CurveError::malformed(id, "expected CCY-Family-<terms>"));
        }
        let family = AssetFamily::from_name(tokens[1])
            .ok_or_else(|| CurveError::malformed(id, format!("unknown asset family '{}'", tokens[1])))?;

        let (currency, pair) = if family.is_fx() {
            let pair = CurrencyPair::parse(tokens[0])
                .map_err(|e| CurveError::malformed(id, e.to_string()))?;
            (pair.quote, Some(pair))
        } else {
            let ccy = Currency::parse(tokens[0]).map_err(|e| CurveError::malformed(id, e.to_string()))?;
            (ccy, None)
        };

        let terms = &tokens[2..];
        let descriptor = Self::parse_descriptor(id, family, terms)?;
        Ok(Self {
            currency,
            pair,
            family,
            descriptor,
        })
    }

    fn parse_descriptor(id: &str, family: AssetFamily, terms: &[&str]) -> CurveResult<AssetDescriptor> {
        let arity = |counts: &[usize]| -> CurveResult<()> {
            if counts.contains(&terms.len()) {
                Ok(())
            } else {
                Err(CurveError::malformed(
                    id,
                    format!(
                        "{family} expects {} term token(s), found {}",
                        counts
                            .iter()
                            .map(ToString::to_string)
                            .collect::<Vec<_>>()
                            .join(" or "),
                        terms.len()
                    ),
                ))
            }
        };
        let period = |s: &str| Period::parse(s).map_err(|e| CurveError::malformed(id, e.to_string()));
        let tenor = |s: &str| Tenor::parse(s).map_err(|e| CurveError::malformed(id, e.to_string()));
        let code = |s: &str| -> CurveResult<String> {
            if s.is_empty() || s.chars().any(char::is_whitespace) {
                Err(CurveError::malformed(id, "empty or blank code"))
            } else {
                Ok(s.to_string())
            }
        };

        use AssetFamily as F;
        match family {
            F::Deposit | F::Xibor | F::OIS | F::CPIndex | F::FxSpot | F::FxForward => {
                arity(&[1])?;
                let tenor = tenor(terms[0])?;
                if family != F::FxSpot && matches!(tenor, Tenor::Spot) {
                    return Err(CurveError::malformed(id, "SP is only valid for FxSpot"));
                }
                Ok(AssetDescriptor::Term { tenor })
            }
            F::IRSwap | F::BasisSwap | F::XccySwap | F::XccyBasisSwap => {
                arity(&[1, 2])?;
                Ok(AssetDescriptor::Swap {
                    term: period(terms[0])?,
                    index_tenor: terms.get(1).map(|s| period(*s)).transpose()?,
                })
            }
            F::Fra | F::BillFra | F::SpreadFra => {
                arity(&[2])?;
                Ok(AssetDescriptor::Forward {
                    start: period(terms[0])?,
                    index_tenor: period(terms[1])?,
                })
            }
            F::Caplet | F::Floorlet | F::BillCaplet | F::BillFloorlet => {
                arity(&[3])?;
                let strike: f64 = terms[2]
                    .parse()
                    .map_err(|_| CurveError::malformed(id, format!("invalid strike '{}'", terms[2])))?;
                if !strike.is_finite() {
                    return Err(CurveError::malformed(id, "strike must be finite"));
                }
                Ok(AssetDescriptor::Optionlet {
                    start: period(terms[0])?,
                    index_tenor: period(terms[1])?,
                    strike,
                    strike_digits: fraction_digits(terms[2]),
                })
            }
            F::IRFuture | F::CommodityFuture => {
                arity(&[2])?;
                Ok(AssetDescriptor::Future {
                    contract: code(terms[0])?,
                    expiry: FuturesCode::parse(terms[1])
                        .map_err(|e| CurveError::malformed(id, e.to_string()))?,
                })
            }
            F::CommoditySpot => {
                arity(&[1])?;
                Ok(AssetDescriptor::Commodity {
                    code: code(terms[0])?,
                    tenor: None,
                })
            }
            F::CommodityForward => {
                arity(&[2])?;
                Ok(AssetDescriptor::Commodity {
                    code: code(terms[0])?,
                    tenor: Some(tenor(terms[1])?),
                })
            }
            F::Bond => {
                arity(&[1])?;
                let parts: Vec<&str> = terms[0].split('.').collect();
                if parts.len() != 3 {
                    return Err(CurveError::malformed(
                        id,
                        "bond description must be <issuer>.<coupon>.<maturity>",
                    ));
                }
                let coupon: f64 = parts[1]
                    .replace(',', ".")
                    .parse()
                    .map_err(|_| CurveError::malformed(id, format!("invalid coupon '{}'", parts[1])))?;
                if !coupon.is_finite() || coupon < 0.0 {
                    return Err(CurveError::malformed(id, "coupon must be a non-negative number"));
                }
                Ok(AssetDescriptor::Bond {
                    issuer: code(parts[0])?,
                    coupon,
                    coupon_digits: fraction_digits(parts[1]),
                    maturity: period(parts[2])?,
                })
            }
        }
    }

    /// Instrument family.
    #[must_use]
    pub fn family(&self) -> AssetFamily {
        self.family
    }

    /// Currency of the asset (the quote currency for FX pairs).
    #[must_use]
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Currency pair of an FX asset.
    #[must_use]
    pub fn pair(&self) -> Option<CurrencyPair> {
        self.pair
    }

    /// Family-specific descriptor.
    #[must_use]
    pub fn descriptor(&self) -> &AssetDescriptor {
        &self.descriptor
    }

    /// Floating index tenor named by the identifier, if any.
    #[must_use]
    pub fn index_tenor(&self) -> Option<Period> {
        match &self.descriptor {
            AssetDescriptor::Swap { index_tenor, .. } => *index_tenor,
            AssetDescriptor::Forward { index_tenor, .. }
            | AssetDescriptor::Optionlet { index_tenor, .. } => Some(*index_tenor),
            _ => None,
        }
    }
}

/// Digits after the decimal separator (`.` or `,`), `None` for exponent forms.
fn fraction_digits(text: &str) -> Option<usize> {
    if text.contains(['e', 'E']) {
        return None;
    }
    Some(text.find(['.', ',']).map_or(0, |i| text.len() - i - 1))
}

fn format_decimal(value: f64, digits: Option<usize>) -> String {
    match digits {
        Some(digits) => format!("{value:.digits$}"),
        None => value.to_string(),
    }
}

impl fmt::Display for AssetIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.pair {
            Some(pair) => write!(f, "{}{}", pair.base, pair.quote)?,
            None => write!(f, "{}", self.currency)?,
        }
        write!(f, "-{}", self.family)?;
        match &self.descriptor {
            AssetDescriptor::Term { tenor } => write!(f, "-{tenor}"),
            AssetDescriptor::Swap { term, index_tenor } => {
                write!(f, "-{term}")?;
                match index_tenor {
                    Some(index) => write!(f, "-{index}"),
                    None => Ok(()),
                }
            }
            AssetDescriptor::Forward { start, index_tenor } => write!(f, "-{start}-{index_tenor}"),
            AssetDescriptor::Optionlet {
                start,
                index_tenor,
                strike,
                strike_digits,
            } => write!(f, "-{start}-{index_tenor}-{}", format_decimal(*strike, *strike_digits)),
            AssetDescriptor::Future { contract, expiry } => write!(f, "-{contract}-{expiry}"),
            AssetDescriptor::Commodity { code, tenor } => {
                write!(f, "-{code}")?;
                match tenor {
                    Some(t) => write!(f, "-{t}"),
                    None => Ok(()),
                }
            }
            AssetDescriptor::Bond {
                issuer,
                coupon,
                coupon_digits,
                maturity,
            } => {
                let coupon = format_decimal(*coupon, *coupon_digits).replace('.', ",");
                write!(f, "-{issuer}.{coupon}.{maturity}")
            }
        }
    }
}

impl FromStr for AssetIdentifier {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AssetIdentifier {
    type Error = CurveError;

    fn try_from(s: String) -> CurveResult<Self> {
        Self::parse(&s)
    }
}

impl From<AssetIdentifier> for String {
    fn from(id: AssetIdentifier) -> Self {
        id.to_string()
    }
}
