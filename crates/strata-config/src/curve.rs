//! Curve construction settings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigError, Validate, ValidationError};

/// Interpolation method for rate curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InterpolationMethod {
    /// Piecewise-constant simple forward rate between nodes.
    FlatForward,

    /// Linear in discount factor.
    Linear,

    /// Linear in log discount factor (piecewise-constant continuous forward).
    LogLinear,

    /// Linear in continuously compounded zero rate.
    #[default]
    LinearZero,
}

impl InterpolationMethod {
    /// All supported methods.
    pub const ALL: [InterpolationMethod; 4] = [
        InterpolationMethod::FlatForward,
        InterpolationMethod::Linear,
        InterpolationMethod::LogLinear,
        InterpolationMethod::LinearZero,
    ];

    /// Returns whether interpolated discount factors stay positive for
    /// positive node values.
    pub fn preserves_positivity(&self) -> bool {
        !matches!(self, Self::Linear)
    }
}

impl fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FlatForward => "FlatForward",
            Self::Linear => "Linear",
            Self::LogLinear => "LogLinear",
            Self::LinearZero => "LinearZero",
        };
        f.write_str(name)
    }
}

impl FromStr for InterpolationMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "flatforward" | "piecewiseconstantforward" => Ok(Self::FlatForward),
            "linear" | "lineardiscount" | "linearinterpolation" => Ok(Self::Linear),
            "loglinear" | "loglinearinterpolation" => Ok(Self::LogLinear),
            "linearzero" | "linearrate" | "linearrateinterpolation" => Ok(Self::LinearZero),
            _ => Err(ConfigError::NotFound {
                key: format!("interpolation method '{s}'"),
            }),
        }
    }
}

/// Settings for the sequential curve bootstrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Repricing tolerance in quote space.
    pub tolerance: f64,

    /// Maximum root-finder iterations per node.
    pub max_iterations: u32,

    /// Interpolation used when none is requested explicitly.
    pub interpolation: InterpolationMethod,

    /// Whether bootstrapped curves extrapolate beyond their last node.
    pub extrapolation: bool,

    /// Smallest discount factor the node search starts from.
    pub discount_factor_floor: f64,

    /// Largest discount factor the node search starts from (negative rates).
    pub discount_factor_cap: f64,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-12,
            max_iterations: 100,
            interpolation: InterpolationMethod::default(),
            extrapolation: true,
            discount_factor_floor: 1e-4,
            discount_factor_cap: 1.5,
        }
    }
}

impl BootstrapConfig {
    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the iteration limit.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the interpolation method.
    #[must_use]
    pub fn with_interpolation(mut self, interpolation: InterpolationMethod) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Enables or disables extrapolation.
    #[must_use]
    pub fn with_extrapolation(mut self, extrapolation: bool) -> Self {
        self.extrapolation = extrapolation;
        self
    }
}

impl Validate for BootstrapConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !(self.tolerance > 0.0 && self.tolerance <= 1e-4) {
            errors.push(ValidationError::with_rule(
                "tolerance",
                "Tolerance must be in (0, 1e-4]",
                "valid_tolerance",
            ));
        }

        if self.max_iterations == 0 || self.max_iterations > 10_000 {
            errors.push(ValidationError::with_rule(
                "max_iterations",
                "Max iterations must be between 1 and 10000",
                "valid_iterations",
            ));
        }

        if !(self.discount_factor_floor > 0.0 && self.discount_factor_floor < self.discount_factor_cap) {
            errors.push(ValidationError::with_rule(
                "discount_factor_floor",
                "Discount factor floor must be positive and below the cap",
                "valid_df_bracket",
            ));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BootstrapConfig::default();
        assert!((config.tolerance - 1e-12).abs() < f64::EPSILON);
        assert_eq!(config.max_iterations, 100);
        assert_eq!(config.interpolation, InterpolationMethod::LinearZero);
        assert!(config.extrapolation);
        assert!(config.is_valid());
    }

    #[test]
    fn test_invalid_tolerance() {
        let config = BootstrapConfig::default().with_tolerance(0.0).with_max_iterations(0);
        let errors = config.validate();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "tolerance");
    }

    #[test]
    fn test_interpolation_names() {
        assert_eq!(
            "LogLinearInterpolation".parse::<InterpolationMethod>().unwrap(),
            InterpolationMethod::LogLinear
        );
        assert_eq!(
            "flat-forward".parse::<InterpolationMethod>().unwrap(),
            InterpolationMethod::FlatForward
        );
        assert!("MonotoneConvex".parse::<InterpolationMethod>().is_err());
        for method in InterpolationMethod::ALL {
            assert_eq!(method.to_string().parse::<InterpolationMethod>().unwrap(), method);
        }
    }

    #[test]
    fn test_serde_partial() {
        let config: BootstrapConfig =
            serde_json::from_str(r#"{"interpolation": "LogLinear", "max_iterations": 50}"#).unwrap();
        assert_eq!(config.interpolation, InterpolationMethod::LogLinear);
        assert_eq!(config.max_iterations, 50);
        assert!((config.tolerance - 1e-12).abs() < f64::EPSILON);
    }
}
