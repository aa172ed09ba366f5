//! Nu/rho surface over calibrated engines.

use ndarray::Array2;

use strata_math::interpolation::BilinearInterpolator;

use crate::engine::SabrEngine;
use crate::error::{SabrError, SabrResult};

/// Bilinear nu and rho over expiry × tenor (both in years).
///
/// Built from engines sharing one beta. Every (expiry, tenor) combination
/// of the source engines must be present; queries outside the grid are
/// clamped to its edges.
#[derive(Debug, Clone)]
pub struct ParameterSurface {
    beta: f64,
    nu: BilinearInterpolator,
    rho: BilinearInterpolator,
}

impl ParameterSurface {
    /// Builds the surface from the calibrated engines whose beta equals `beta`.
    pub fn from_engines<'a>(
        engines: impl IntoIterator<Item = &'a SabrEngine>,
        beta: f64,
    ) -> SabrResult<Self> {
        let source: Vec<&SabrEngine> = engines
            .into_iter()
            .filter(|e| e.is_calibrated() && (e.beta() - beta).abs() < 1e-12)
            .collect();
        if source.is_empty() {
            return Err(SabrError::invalid_grid(format!(
                "no calibrated engines with beta {beta} to interpolate from"
            )));
        }

        let expiries = sorted_axis(source.iter().map(|e| e.expiry_years()));
        let tenors = sorted_axis(source.iter().map(|e| e.tenor().year_fraction()));

        let mut nu = Array2::from_elem((expiries.len(), tenors.len()), f64::NAN);
        let mut rho = nu.clone();
        for engine in &source {
            let i = position(&expiries, engine.expiry_years());
            let j = position(&tenors, engine.tenor().year_fraction());
            nu[[i, j]] = engine.nu();
            rho[[i, j]] = engine.rho();
        }
        if nu.iter().any(|v| v.is_nan()) {
            return Err(SabrError::invalid_grid(
                "engines do not cover every expiry/tenor combination",
            ));
        }

        Ok(Self {
            beta,
            nu: BilinearInterpolator::new(expiries.clone(), tenors.clone(), nu)?,
            rho: BilinearInterpolator::new(expiries, tenors, rho)?,
        })
    }

    /// Beta shared by the source engines.
    #[must_use]
    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Interpolated `(nu, rho)` at an expiry and tenor in years.
    pub fn nu_rho(&self, expiry: f64, tenor: f64) -> SabrResult<(f64, f64)> {
        Ok((
            self.nu.interpolate(expiry, tenor)?,
            self.rho.interpolate(expiry, tenor)?,
        ))
    }
}

fn sorted_axis(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut axis: Vec<f64> = values.collect();
    axis.sort_by(f64::total_cmp);
    axis.dedup_by(|a, b| (*a - *b).abs() < 1e-12);
    axis
}

fn position(axis: &[f64], value: f64) -> usize {
    axis.iter()
        .position(|x| (x - value).abs() < 1e-12)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::AtmQuote;
    use crate::label::TermLabel;
    use approx::assert_relative_eq;
    use strata_config::SabrConfig;

    fn engine(expiry: &str, tenor: &str, nu: f64, rho: f64) -> SabrEngine {
        let quote = AtmQuote {
            expiry: TermLabel::parse(expiry).unwrap(),
            tenor: TermLabel::parse(tenor).unwrap(),
            nu,
            rho,
            atm_vol: 0.2,
            forward: 0.04,
        };
        SabrEngine::calibrate_atm(&quote, 1.0, &SabrConfig::default()).unwrap()
    }

    #[test]
    fn test_bilinear_nu_rho() {
        let engines = [
            engine("1y", "1y", 0.4, -0.2),
            engine("1y", "5y", 0.6, -0.4),
            engine("5y", "1y", 0.3, -0.1),
            engine("5y", "5y", 0.5, -0.3),
        ];
        let surface = ParameterSurface::from_engines(&engines, 1.0).unwrap();
        let (nu, rho) = surface.nu_rho(3.0, 3.0).unwrap();
        assert_relative_eq!(nu, 0.45, epsilon = 1e-12);
        assert_relative_eq!(rho, -0.25, epsilon = 1e-12);

        let (nu, _) = surface.nu_rho(10.0, 0.5).unwrap();
        assert_relative_eq!(nu, 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_single_row() {
        let engines = [engine("6m", "1y", 0.4, -0.2), engine("6m", "2y", 0.6, -0.4)];
        let surface = ParameterSurface::from_engines(&engines, 1.0).unwrap();
        let (nu, rho) = surface.nu_rho(2.0, 1.5).unwrap();
        assert_relative_eq!(nu, 0.5, epsilon = 1e-12);
        assert_relative_eq!(rho, -0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_incomplete_grid() {
        let engines = [
            engine("1y", "1y", 0.4, -0.2),
            engine("1y", "5y", 0.6, -0.4),
            engine("5y", "1y", 0.3, -0.1),
        ];
        assert!(ParameterSurface::from_engines(&engines, 1.0).is_err());
    }

    #[test]
    fn test_other_beta_ignored() {
        let engines = [engine("1y", "1y", 0.4, -0.2)];
        assert!(ParameterSurface::from_engines(&engines, 0.5).is_err());
    }
}
