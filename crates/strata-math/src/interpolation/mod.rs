//! Interpolation on ordered nodes.
//!
//! - [`LinearInterpolator`]: straight lines between nodes
//! - [`LogLinearInterpolator`]: linear in `ln(y)`, positive values only
//! - [`BilinearInterpolator`]: rectangular grids (SABR parameter surfaces)
//!
//! Behaviour outside the node range is set with [`Extrapolation`]; the
//! default is to refuse with [`MathError::ExtrapolationNotAllowed`].

mod bilinear;
mod linear;
mod log_linear;

pub use bilinear::BilinearInterpolator;
pub use linear::LinearInterpolator;
pub use log_linear::LogLinearInterpolator;

use crate::error::{MathError, MathResult};

/// How an interpolator answers queries outside its node range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Extrapolation {
    /// Out-of-range queries fail.
    #[default]
    None,
    /// Hold the boundary value.
    Flat,
    /// Extend the boundary segment.
    Linear,
}

/// Trait for one-dimensional interpolation methods.
pub trait Interpolator: Send + Sync {
    /// Returns the interpolated value at x.
    fn interpolate(&self, x: f64) -> MathResult<f64>;

    /// Returns the first derivative at x.
    fn derivative(&self, x: f64) -> MathResult<f64>;

    /// Extrapolation mode in force.
    fn extrapolation(&self) -> Extrapolation {
        Extrapolation::None
    }

    /// Returns true if extrapolation is allowed.
    fn allows_extrapolation(&self) -> bool {
        self.extrapolation() != Extrapolation::None
    }

    /// Returns the minimum x value in the data.
    fn min_x(&self) -> f64;

    /// Returns the maximum x value in the data.
    fn max_x(&self) -> f64;

    /// Checks if x is within the interpolation range.
    fn in_range(&self, x: f64) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }
}

/// Checks that `xs` is strictly increasing, finite and matches `ys` in length.
pub fn validate_nodes(xs: &[f64], ys: &[f64], min_points: usize) -> MathResult<()> {
    if xs.len() < min_points {
        return Err(MathError::insufficient_data(min_points, xs.len()));
    }
    if xs.len() != ys.len() {
        return Err(MathError::invalid_input(format!(
            "xs and ys must have same length: {} vs {}",
            xs.len(),
            ys.len()
        )));
    }
    if xs.iter().chain(ys.iter()).any(|v| !v.is_finite()) {
        return Err(MathError::invalid_input("node values must be finite"));
    }
    if xs.windows(2).any(|w| w[1] <= w[0]) {
        return Err(MathError::invalid_input(
            "x values must be strictly increasing",
        ));
    }
    Ok(())
}

/// Index `i` of the segment `[xs[i], xs[i+1]]` holding `x`, clamped to the
/// first/last segment. `xs` must hold at least two strictly increasing values.
#[must_use]
pub fn find_segment(xs: &[f64], x: f64) -> usize {
    let last = xs.len().saturating_sub(2);
    // partition_point gives the count of nodes <= x
    let above = xs.partition_point(|&probe| probe <= x);
    above.saturating_sub(1).min(last)
}

pub(crate) fn out_of_range(x: f64, xs: &[f64]) -> MathError {
    MathError::ExtrapolationNotAllowed {
        x,
        min: xs[0],
        max: xs[xs.len() - 1],
    }
}
