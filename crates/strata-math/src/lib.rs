//! # Strata Math
//!
//! Numerical building blocks for curve construction and smile calibration.
//!
//! - **Solvers**: bisection, Brent, hybrid Newton/Brent, bracket expansion
//! - **Interpolation**: linear, log-linear and bilinear
//! - **Optimization**: Nelder-Mead simplex
//! - **Sequences**: Halton low-discrepancy points
//!
//! Everything works on `f64`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::float_cmp)]
#![allow(clippy::neg_cmp_op_on_partial_ord)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod interpolation;
pub mod optimization;
pub mod sequences;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::interpolation::{
        BilinearInterpolator, Extrapolation, Interpolator, LinearInterpolator,
        LogLinearInterpolator,
    };
    pub use crate::optimization::{nelder_mead, NelderMeadConfig, OptimizationResult};
    pub use crate::sequences::{Halton, LowDiscrepancySequence};
    pub use crate::solvers::{
        bisection, brent, expand_bracket, hybrid, hybrid_numerical, BracketDirection,
        SolverConfig, SolverResult,
    };
}

pub use error::{MathError, MathResult};
