//! Bilinear interpolation on a rectangular grid.

use ndarray::Array2;

use crate::error::{MathError, MathResult};
use crate::interpolation::find_segment;

/// Bilinear interpolation of `values[[i, j]]` at `(xs[i], ys[j])`.
///
/// Queries outside the grid are clamped to the boundary on each axis. An axis
/// with a single node is treated as constant along that axis.
///
/// # Example
///
/// ```rust
/// use ndarray::array;
/// use strata_math::interpolation::BilinearInterpolator;
///
/// let grid = BilinearInterpolator::new(
///     vec![1.0, 2.0],
///     vec![1.0, 5.0],
///     array![[0.2, 0.4], [0.3, 0.5]],
/// )
/// .unwrap();
/// assert!((grid.interpolate(1.5, 3.0).unwrap() - 0.35).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct BilinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    values: Array2<f64>,
}

impl BilinearInterpolator {
    /// Creates a grid interpolator; `values` must be `xs.len() × ys.len()`.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>, values: Array2<f64>) -> MathResult<Self> {
        if xs.is_empty() || ys.is_empty() {
            return Err(MathError::insufficient_data(1, xs.len().min(ys.len())));
        }
        if values.dim() != (xs.len(), ys.len()) {
            return Err(MathError::invalid_input(format!(
                "grid shape {:?} does not match axes ({}, {})",
                values.dim(),
                xs.len(),
                ys.len()
            )));
        }
        for axis in [&xs, &ys] {
            if axis.windows(2).any(|w| w[1] <= w[0]) {
                return Err(MathError::invalid_input(
                    "grid axes must be strictly increasing",
                ));
            }
        }
        if values.iter().any(|v| !v.is_finite()) {
            return Err(MathError::invalid_input("grid values must be finite"));
        }
        Ok(Self { xs, ys, values })
    }

    /// Interpolated value at `(x, y)`.
    pub fn interpolate(&self, x: f64, y: f64) -> MathResult<f64> {
        let (i0, i1, tx) = Self::locate(&self.xs, x);
        let (j0, j1, ty) = Self::locate(&self.ys, y);

        let v00 = self.values[[i0, j0]];
        let v01 = self.values[[i0, j1]];
        let v10 = self.values[[i1, j0]];
        let v11 = self.values[[i1, j1]];

        let lower = v00 + ty * (v01 - v00);
        let upper = v10 + ty * (v11 - v10);
        Ok(lower + tx * (upper - lower))
    }

    /// Bracketing indices and weight on one axis, clamped at the edges.
    fn locate(axis: &[f64], v: f64) -> (usize, usize, f64) {
        let n = axis.len();
        if n == 1 || v <= axis[0] {
            return (0, 0, 0.0);
        }
        if v >= axis[n - 1] {
            return (n - 1, n - 1, 0.0);
        }
        let i = find_segment(axis, v);
        let t = (v - axis[i]) / (axis[i + 1] - axis[i]);
        (i, i + 1, t)
    }

    /// Row axis.
    #[must_use]
    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    /// Column axis.
    #[must_use]
    pub fn ys(&self) -> &[f64] {
        &self.ys
    }
}
