//! Log-linear interpolation.

use crate::error::{MathError, MathResult};
use crate::interpolation::{find_segment, out_of_range, validate_nodes, Extrapolation, Interpolator};

/// Interpolates `ln(y)` linearly and exponentiates.
///
/// On discount factors this gives piecewise-constant continuously
/// compounded forwards; on index levels, piecewise-constant growth.
///
/// # Example
///
/// ```rust
/// use strata_math::interpolation::{Interpolator, LogLinearInterpolator};
///
/// let interp = LogLinearInterpolator::new(vec![0.0, 1.0, 2.0], vec![1.0, 0.97, 0.94]).unwrap();
/// assert!(interp.interpolate(1.5).unwrap() > 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LogLinearInterpolator {
    xs: Vec<f64>,
    log_ys: Vec<f64>,
    extrapolation: Extrapolation,
}

impl LogLinearInterpolator {
    /// Creates a new log-linear interpolator; every `y` must be positive.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_nodes(&xs, &ys, 2)?;
        if let Some(bad) = ys.iter().find(|&&y| y <= 0.0) {
            return Err(MathError::invalid_input(format!(
                "log-linear interpolation needs positive values, got {bad}"
            )));
        }
        let log_ys = ys.iter().map(|y| y.ln()).collect();
        Ok(Self {
            xs,
            log_ys,
            extrapolation: Extrapolation::None,
        })
    }

    /// Sets the extrapolation mode.
    #[must_use]
    pub fn with_extrapolation(mut self, extrapolation: Extrapolation) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    fn log_value(&self, x: f64) -> MathResult<f64> {
        let n = self.xs.len();
        if !self.in_range(x) {
            match self.extrapolation {
                Extrapolation::None => return Err(out_of_range(x, &self.xs)),
                Extrapolation::Flat => {
                    return Ok(if x < self.xs[0] {
                        self.log_ys[0]
                    } else {
                        self.log_ys[n - 1]
                    })
                }
                Extrapolation::Linear => {}
            }
        }
        let i = find_segment(&self.xs, x);
        let t = (x - self.xs[i]) / (self.xs[i + 1] - self.xs[i]);
        Ok(self.log_ys[i] + t * (self.log_ys[i + 1] - self.log_ys[i]))
    }
}

impl Interpolator for LogLinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        Ok(self.log_value(x)?.exp())
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        let y = self.interpolate(x)?;
        if !self.in_range(x) && self.extrapolation == Extrapolation::Flat {
            return Ok(0.0);
        }
        let i = find_segment(&self.xs, x);
        let slope = (self.log_ys[i + 1] - self.log_ys[i]) / (self.xs[i + 1] - self.xs[i]);
        Ok(y * slope)
    }

    fn extrapolation(&self) -> Extrapolation {
        self.extrapolation
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_geometric_midpoint() {
        let interp = LogLinearInterpolator::new(vec![0.0, 1.0], vec![1.0, 4.0]).unwrap();
        assert_relative_eq!(interp.interpolate(0.5).unwrap(), 2.0, epsilon = 1e-14);
        assert_relative_eq!(
            interp.derivative(0.5).unwrap(),
            2.0 * 4.0_f64.ln(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_rejects_non_positive() {
        assert!(LogLinearInterpolator::new(vec![0.0, 1.0], vec![1.0, 0.0]).is_err());
    }

    #[test]
    fn test_linear_extrapolation_in_log_space() {
        let interp = LogLinearInterpolator::new(vec![0.0, 1.0], vec![1.0, 0.5])
            .unwrap()
            .with_extrapolation(Extrapolation::Linear);
        assert_relative_eq!(interp.interpolate(2.0).unwrap(), 0.25, epsilon = 1e-14);
    }
}
