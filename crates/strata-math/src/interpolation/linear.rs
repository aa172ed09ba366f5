//! Linear interpolation.

use crate::error::MathResult;
use crate::interpolation::{find_segment, out_of_range, validate_nodes, Extrapolation, Interpolator};

/// Linear interpolation between data points.
///
/// # Example
///
/// ```rust
/// use strata_math::interpolation::{Interpolator, LinearInterpolator};
///
/// let xs = vec![0.0, 1.0, 2.0, 3.0];
/// let ys = vec![0.0, 1.0, 4.0, 9.0];
///
/// let interp = LinearInterpolator::new(xs, ys).unwrap();
/// assert!((interp.interpolate(1.5).unwrap() - 2.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    extrapolation: Extrapolation,
}

impl LinearInterpolator {
    /// Creates a new linear interpolator over strictly increasing `xs`.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_nodes(&xs, &ys, 2)?;
        Ok(Self {
            xs,
            ys,
            extrapolation: Extrapolation::None,
        })
    }

    /// Sets the extrapolation mode.
    #[must_use]
    pub fn with_extrapolation(mut self, extrapolation: Extrapolation) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    /// Node abscissae.
    #[must_use]
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Node values.
    #[must_use]
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    fn boundary(&self, x: f64) -> Option<f64> {
        let n = self.xs.len();
        if x < self.xs[0] {
            Some(self.ys[0])
        } else if x > self.xs[n - 1] {
            Some(self.ys[n - 1])
        } else {
            None
        }
    }
}

impl Interpolator for LinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        if !self.in_range(x) {
            match self.extrapolation {
                Extrapolation::None => return Err(out_of_range(x, &self.xs)),
                Extrapolation::Flat => {
                    if let Some(y) = self.boundary(x) {
                        return Ok(y);
                    }
                }
                Extrapolation::Linear => {}
            }
        }

        let i = find_segment(&self.xs, x);
        let (x0, x1) = (self.xs[i], self.xs[i + 1]);
        let (y0, y1) = (self.ys[i], self.ys[i + 1]);
        let t = (x - x0) / (x1 - x0);
        Ok(y0 + t * (y1 - y0))
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        if !self.in_range(x) {
            match self.extrapolation {
                Extrapolation::None => return Err(out_of_range(x, &self.xs)),
                Extrapolation::Flat => return Ok(0.0),
                Extrapolation::Linear => {}
            }
        }
        let i = find_segment(&self.xs, x);
        Ok((self.ys[i + 1] - self.ys[i]) / (self.xs[i + 1] - self.xs[i]))
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
    use crate::error::MathError;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_interpolation() {
        let interp = LinearInterpolator::new(vec![0.0, 1.0, 2.0, 3.0], vec![0.0, 1.0, 4.0, 9.0]).unwrap();

        assert_relative_eq!(interp.interpolate(0.0).unwrap(), 0.0);
        assert_relative_eq!(interp.interpolate(1.0).unwrap(), 1.0);
        assert_relative_eq!(interp.interpolate(0.5).unwrap(), 0.5);
        assert_relative_eq!(interp.interpolate(1.5).unwrap(), 2.5);
        assert_relative_eq!(interp.derivative(2.5).unwrap(), 5.0);
    }

    #[test]
    fn test_no_extrapolation() {
        let interp = LinearInterpolator::new(vec![0.0, 1.0], vec![0.0, 1.0]).unwrap();
        assert!(matches!(
            interp.interpolate(1.5),
            Err(MathError::ExtrapolationNotAllowed { .. })
        ));
    }

    #[test]
    fn test_flat_extrapolation() {
        let interp = LinearInterpolator::new(vec![1.0, 2.0], vec![3.0, 5.0])
            .unwrap()
            .with_extrapolation(Extrapolation::Flat);
        assert_relative_eq!(interp.interpolate(0.0).unwrap(), 3.0);
        assert_relative_eq!(interp.interpolate(9.0).unwrap(), 5.0);
        assert_relative_eq!(interp.derivative(9.0).unwrap(), 0.0);
    }

    #[test]
    fn test_linear_extrapolation() {
        let interp = LinearInterpolator::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 2.0])
            .unwrap()
            .with_extrapolation(Extrapolation::Linear);
        assert_relative_eq!(interp.interpolate(3.0).unwrap(), 3.0);
        assert_relative_eq!(interp.interpolate(-1.0).unwrap(), -1.0);
    }

    #[test]
    fn test_rejects_unsorted() {
        assert!(LinearInterpolator::new(vec![0.0, 2.0, 1.0], vec![0.0, 1.0, 2.0]).is_err());
    }
}
