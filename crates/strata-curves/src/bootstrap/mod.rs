//! Curve bootstrapping.
//!
//! Builds a rate curve (discount factors) or an index curve (FX, commodity
//! or CPI levels) from quoted assets, one node per asset in maturity order.
//!
//! # Example: forecast curve over an existing discount curve
//!
//! ```rust,ignore
//! use strata_curves::bootstrap::{CurveBootstrapper, CurveProperties};
//!
//! let forecast = CurveBootstrapper::new(
//!     CurveProperties::rate("RateCurve.AUD-6M", base_date).with_discount_curve("RateCurve.AUD"),
//! )
//! .with_environment(env)
//! .add_instrument("AUD-Xibor-6M", QuoteSet::from_market_quote(0.0425)?)
//! .add_instrument("AUD-BasisSwap-5Y-6M", QuoteSet::from_market_quote(-0.0022)?)
//! .bootstrap()?;
//! ```

mod arena;
mod properties;
mod sequential;

pub use arena::{Node, NodeArena, NodeState};
pub use properties::{CurveKind, CurveProperties};
pub use sequential::{bootstrap, CurveBootstrapper};
