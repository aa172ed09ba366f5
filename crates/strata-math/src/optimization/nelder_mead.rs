//! Nelder-Mead downhill simplex.

use crate::error::{MathError, MathResult};
use crate::optimization::OptimizationResult;

/// Configuration for [`nelder_mead`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NelderMeadConfig {
    /// Maximum simplex iterations.
    pub max_iterations: u32,
    /// Offset added to each coordinate of the start point to build the simplex.
    pub initial_step: f64,
    /// Converged once best and worst objective values differ by at most this.
    pub function_tolerance: f64,
    /// ... and every vertex lies within this distance of the centroid.
    pub parameter_tolerance: f64,
    /// Reflection coefficient.
    pub reflection: f64,
    /// Expansion coefficient.
    pub expansion: f64,
    /// Contraction coefficient.
    pub contraction: f64,
    /// Shrink coefficient.
    pub shrink: f64,
}

impl Default for NelderMeadConfig {
    fn default() -> Self {
        Self {
            max_iterations: 5000,
            initial_step: 0.1,
            function_tolerance: 1e-15,
            parameter_tolerance: 1e-10,
            reflection: 1.0,
            expansion: 2.0,
            contraction: 0.5,
            shrink: 0.5,
        }
    }
}

impl NelderMeadConfig {
    /// Sets the iteration limit.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the initial simplex step.
    #[must_use]
    pub fn with_initial_step(mut self, step: f64) -> Self {
        self.initial_step = step;
        self
    }

    /// Sets both convergence tolerances.
    #[must_use]
    pub fn with_tolerances(mut self, function_tolerance: f64, parameter_tolerance: f64) -> Self {
        self.function_tolerance = function_tolerance;
        self.parameter_tolerance = parameter_tolerance;
        self
    }
}

/// Minimises `f` from `initial` with an unconstrained Nelder-Mead simplex.
///
/// Non-convergence is not an error: the best vertex is returned with
/// `converged == false` so callers can restart from other seeds.
///
/// # Example
///
/// ```rust
/// use strata_math::optimization::{nelder_mead, NelderMeadConfig};
///
/// let rosen = |x: &[f64]| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2);
/// let result = nelder_mead(rosen, &[-1.2, 1.0], &NelderMeadConfig::default()).unwrap();
/// assert!(result.converged);
/// assert!((result.parameters[0] - 1.0).abs() < 1e-6);
/// ```
pub fn nelder_mead<F>(
    f: F,
    initial: &[f64],
    config: &NelderMeadConfig,
) -> MathResult<OptimizationResult>
where
    F: Fn(&[f64]) -> f64,
{
    let dim = initial.len();
    if dim == 0 {
        return Err(MathError::insufficient_data(1, 0));
    }
    if initial.iter().any(|v| !v.is_finite()) {
        return Err(MathError::invalid_input("initial point must be finite"));
    }

    let mut simplex: Vec<Vec<f64>> = Vec::with_capacity(dim + 1);
    simplex.push(initial.to_vec());
    for d in 0..dim {
        let mut x = initial.to_vec();
        x[d] += config.initial_step;
        simplex.push(x);
    }
    let mut values: Vec<f64> = simplex.iter().map(|x| f(x)).collect();

    let mut converged = false;
    let mut iterations = 0;

    for iteration in 0..config.max_iterations {
        iterations = iteration;

        let mut order: Vec<usize> = (0..=dim).collect();
        order.sort_by(|&i, &j| values[i].total_cmp(&values[j]));
        simplex = order.iter().map(|&i| simplex[i].clone()).collect();
        values = order.iter().map(|&i| values[i]).collect();

        let centroid: Vec<f64> = (0..dim)
            .map(|d| simplex.iter().take(dim).map(|x| x[d]).sum::<f64>() / dim as f64)
            .collect();

        let spread = (values[dim] - values[0]).abs();
        let max_vertex_dist = simplex
            .iter()
            .map(|x| distance(x, &centroid))
            .fold(0.0_f64, f64::max);

        if spread <= config.function_tolerance && max_vertex_dist <= config.parameter_tolerance {
            converged = true;
            break;
        }

        let xr = affine(&centroid, &simplex[dim], -config.reflection);
        let fr = f(&xr);

        if fr < values[0] {
            let xe = affine(&centroid, &xr, config.expansion);
            let fe = f(&xe);
            if fe < fr {
                simplex[dim] = xe;
                values[dim] = fe;
            } else {
                simplex[dim] = xr;
                values[dim] = fr;
            }
            continue;
        }

        if fr < values[dim - 1] {
            simplex[dim] = xr;
            values[dim] = fr;
            continue;
        }

        let xc = affine(&centroid, &simplex[dim], config.contraction);
        let fc = f(&xc);
        if fc < values[dim] {
            simplex[dim] = xc;
            values[dim] = fc;
            continue;
        }

        for i in 1..=dim {
            simplex[i] = affine(&simplex[0], &simplex[i], config.shrink);
            values[i] = f(&simplex[i]);
        }
    }

    let best = (0..=dim)
        .min_by(|&i, &j| values[i].total_cmp(&values[j]))
        .unwrap_or(0);

    log::trace!(
        "nelder-mead finished after {iterations} iterations, objective {:.3e}, converged {converged}",
        values[best]
    );

    Ok(OptimizationResult {
        parameters: simplex[best].clone(),
        objective_value: values[best],
        iterations,
        converged,
    })
}

/// `origin + coefficient * (towards - origin)`.
fn affine(origin: &[f64], towards: &[f64], coefficient: f64) -> Vec<f64> {
    origin
        .iter()
        .zip(towards)
        .map(|(o, t)| o + coefficient * (t - o))
        .collect()
}

fn distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_quadratic_bowl() {
        let f = |x: &[f64]| (x[0] - 0.25).powi(2) + (x[1] + 0.4).powi(2);
        let result = nelder_mead(f, &[0.9, 0.9], &NelderMeadConfig::default()).unwrap();
        assert!(result.converged);
        assert_relative_eq!(result.parameters[0], 0.25, epsilon = 1e-7);
        assert_relative_eq!(result.parameters[1], -0.4, epsilon = 1e-7);
    }

    #[test]
    fn test_rosenbrock() {
        let f = |x: &[f64]| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2);
        let result = nelder_mead(f, &[-1.2, 1.0], &NelderMeadConfig::default()).unwrap();
        assert!(result.converged);
        assert_relative_eq!(result.parameters[0], 1.0, epsilon = 1e-6);
        assert_relative_eq!(result.parameters[1], 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_iteration_limit_reports_unconverged() {
        let f = |x: &[f64]| (1.0 - x[0]).powi(2) + 100.0 * (x[1] - x[0] * x[0]).powi(2);
        let config = NelderMeadConfig::default().with_max_iterations(5);
        let result = nelder_mead(f, &[-1.2, 1.0], &config).unwrap();
        assert!(!result.converged);
        assert!(result.objective_value <= f(&[-1.2, 1.0]));
    }

    #[test]
    fn test_one_dimensional() {
        let f = |x: &[f64]| (x[0] - 3.0).powi(2);
        let result = nelder_mead(f, &[0.0], &NelderMeadConfig::default()).unwrap();
        assert_relative_eq!(result.parameters[0], 3.0, epsilon = 1e-7);
    }

    #[test]
    fn test_empty_start() {
        assert!(nelder_mead(|_: &[f64]| 0.0, &[], &NelderMeadConfig::default()).is_err());
    }
}
