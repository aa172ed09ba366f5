//! Derivative-free minimisation.
//!
//! SABR smile fits minimise squared vol errors over two transformed
//! parameters. Alpha is re-solved inside every evaluation, so the objective
//! has kinks and a simplex method is used.

mod nelder_mead;

pub use nelder_mead::{nelder_mead, NelderMeadConfig};

/// Best point found by an optimizer.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizationResult {
    /// Minimiser.
    pub parameters: Vec<f64>,
    /// Objective at `parameters`.
    pub objective_value: f64,
    /// Iterations run.
    pub iterations: u32,
    /// False when the iteration budget ran out first.
    pub converged: bool,
}
