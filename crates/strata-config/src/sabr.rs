//! SABR calibration settings.

use serde::{Deserialize, Serialize};

use crate::error::{Validate, ValidationError};

/// Numerical settings for SABR smile calibration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SabrConfig {
    /// Beta used when calibration settings do not name one.
    pub default_beta: f64,

    /// Nelder-Mead iteration limit.
    pub max_iterations: u32,
    /// Nelder-Mead objective spread tolerance.
    pub function_tolerance: f64,
    /// Nelder-Mead vertex-to-centroid tolerance.
    pub parameter_tolerance: f64,
    /// Initial simplex offset in (theta, mu) space.
    pub initial_step: f64,

    /// Halton points evaluated when the seeded fit does not converge.
    pub halton_points: usize,
    /// Best Halton candidates re-optimised.
    pub best_candidates: usize,

    /// Distance by which `rho = ±1` is pulled inside the open interval.
    pub rho_boundary_offset: f64,

    /// Absolute tolerance of the ATM alpha solve.
    pub alpha_tolerance: f64,
    /// Multiplier applied to the upper alpha bound while bracketing.
    pub alpha_bracket_factor: f64,
    /// Maximum bracket expansions for the alpha solve.
    pub alpha_bracket_expansions: u32,
    /// Objective value assigned when alpha cannot be solved.
    pub failed_objective: f64,
}

impl Default for SabrConfig {
    fn default() -> Self {
        Self {
            default_beta: 1.0,
            max_iterations: 5000,
            function_tolerance: 1e-12,
            parameter_tolerance: 1e-5,
            initial_step: 0.02,
            halton_points: 1500,
            best_candidates: 5,
            rho_boundary_offset: 0.01,
            alpha_tolerance: 1e-15,
            alpha_bracket_factor: 1.6,
            alpha_bracket_expansions: 50,
            failed_objective: 1e10,
        }
    }
}

impl SabrConfig {
    /// Sets the default beta.
    #[must_use]
    pub fn with_default_beta(mut self, beta: f64) -> Self {
        self.default_beta = beta;
        self
    }

    /// Sets the Halton search size.
    #[must_use]
    pub fn with_halton_search(mut self, points: usize, best_candidates: usize) -> Self {
        self.halton_points = points;
        self.best_candidates = best_candidates;
        self
    }
}

impl Validate for SabrConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !(0.0..=1.0).contains(&self.default_beta) {
            errors.push(ValidationError::with_rule(
                "default_beta",
                "Beta must lie in [0, 1]",
                "beta_range",
            ));
        }
        if self.max_iterations == 0 {
            errors.push(ValidationError::new(
                "max_iterations",
                "Max iterations must be positive",
            ));
        }
        if !(self.function_tolerance > 0.0) || !(self.parameter_tolerance > 0.0) {
            errors.push(ValidationError::with_rule(
                "function_tolerance",
                "Optimizer tolerances must be positive",
                "positive_tolerance",
            ));
        }
        if !(self.initial_step > 0.0) {
            errors.push(ValidationError::new("initial_step", "Initial step must be positive"));
        }
        if self.best_candidates == 0 || self.best_candidates > self.halton_points {
            errors.push(ValidationError::with_rule(
                "best_candidates",
                "Best candidates must be between 1 and the number of Halton points",
                "candidate_count",
            ));
        }
        if !(self.rho_boundary_offset > 0.0 && self.rho_boundary_offset < 1.0) {
            errors.push(ValidationError::new(
                "rho_boundary_offset",
                "Rho boundary offset must be in (0, 1)",
            ));
        }
        if !(self.alpha_bracket_factor > 1.0) {
            errors.push(ValidationError::new(
                "alpha_bracket_factor",
                "Alpha bracket factor must exceed 1",
            ));
        }

        errors
    }
}
