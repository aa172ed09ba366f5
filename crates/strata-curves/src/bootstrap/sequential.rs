//! Sequential bootstrap.
//!
//! Solves one node per calibrating asset in maturity order. Each solve
//! moves only the node under construction, so an asset's implied quote,
//! computed against the curve built so far, matches its market quote.

use std::time::Instant;

use strata_config::{BootstrapConfig, InterpolationMethod};
use strata_core::daycounts::DayCountConvention;
use strata_math::solvers::{hybrid_numerical, SolverConfig};
use strata_math::MathError;

use super::arena::NodeArena;
use super::properties::{CurveKind, CurveProperties};
use crate::assets::{build_properties, calibration_role, AssetFactory, CurveRole, PriceableAsset, QuoteSet};
use crate::curves::{IndexCurve, LevelInterpolation, PricingStructure, RateCurve};
use crate::environment::MarketEnvironment;
use crate::error::{CurveError, CurveResult};
use crate::repricing::{BootstrapResult, RepricingReport};

/// Builds a rate or index curve from market quotes.
///
/// Assets are created through the [`AssetFactory`] with their curve names
/// rewired to the target: single-curve rate assets discount and project on
/// it, basis assets project on it, cross-currency assets discount on it and
/// FX, commodity and CPI assets read their levels from it. Every other
/// curve an asset needs comes from the supplied environment.
///
/// # Example
///
/// ```rust
/// use strata_core::types::Date;
/// use strata_curves::assets::QuoteSet;
/// use strata_curves::bootstrap::{CurveBootstrapper, CurveProperties};
///
/// let base = Date::from_ymd(2025, 1, 15).unwrap();
/// let curve = CurveBootstrapper::new(CurveProperties::rate("RateCurve.AUD", base))
///     .add_instrument("AUD-Deposit-3M", QuoteSet::from_market_quote(0.041).unwrap())
///     .add_instrument("AUD-IRSwap-2Y", QuoteSet::from_market_quote(0.043).unwrap())
///     .bootstrap()
///     .unwrap();
///
/// let rate_curve = curve.as_rate_curve().unwrap();
/// assert!(rate_curve.discount_factor(base.add_years(1).unwrap()).unwrap() < 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct CurveBootstrapper {
    properties: CurveProperties,
    config: BootstrapConfig,
    environment: MarketEnvironment,
    factory: AssetFactory,
    instruments: Vec<(String, QuoteSet)>,
}

impl CurveBootstrapper {
    /// Creates a bootstrapper with default configuration and an empty environment.
    #[must_use]
    pub fn new(properties: CurveProperties) -> Self {
        let environment = MarketEnvironment::new(properties.name.clone());
        Self {
            properties,
            config: BootstrapConfig::default(),
            environment,
            factory: AssetFactory::with_defaults(),
            instruments: Vec::new(),
        }
    }

    /// Sets the bootstrap configuration.
    #[must_use]
    pub fn with_config(mut self, config: BootstrapConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the interpolation method.
    #[must_use]
    pub fn with_interpolation(mut self, interpolation: InterpolationMethod) -> Self {
        self.config.interpolation = interpolation;
        self
    }

    /// Supplies the other curves the assets need.
    #[must_use]
    pub fn with_environment(mut self, environment: MarketEnvironment) -> Self {
        self.environment = environment;
        self
    }

    /// Uses a custom asset factory.
    #[must_use]
    pub fn with_factory(mut self, factory: AssetFactory) -> Self {
        self.factory = factory;
        self
    }

    /// Adds a calibrating asset.
    #[must_use]
    pub fn add_instrument(mut self, id: impl Into<String>, quotes: QuoteSet) -> Self {
        self.instruments.push((id.into(), quotes));
        self
    }

    /// Adds several calibrating assets.
    #[must_use]
    pub fn add_instruments<S: Into<String>>(
        mut self,
        instruments: impl IntoIterator<Item = (S, QuoteSet)>,
    ) -> Self {
        self.instruments
            .extend(instruments.into_iter().map(|(id, q)| (id.into(), q)));
        self
    }

    /// The target properties.
    #[must_use]
    pub fn properties(&self) -> &CurveProperties {
        &self.properties
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// Number of calibrating assets.
    #[must_use]
    pub fn instrument_count(&self) -> usize {
        self.instruments.len()
    }

    /// Bootstraps the structure.
    ///
    /// # Errors
    ///
    /// - `InvalidCurve` when no assets were added or an asset cannot
    ///   calibrate this kind of structure;
    /// - `DuplicateNode` when two assets mature on the same date;
    /// - `BootstrapNonConvergence` when a node cannot be solved.
    ///
    /// No partial structure is returned on failure.
    pub fn bootstrap(&self) -> CurveResult<PricingStructure> {
        let (structure, _, _) = self.solve()?;
        Ok(structure)
    }

    /// Bootstraps and reprices every asset against the result.
    ///
    /// Does not fail when repricing misses tolerance; check
    /// [`BootstrapResult::is_valid`].
    pub fn bootstrap_validated(&self) -> CurveResult<BootstrapResult<PricingStructure>> {
        let started = Instant::now();
        let (structure, assets, env) = self.solve()?;
        let report = RepricingReport::from_assets(&assets, &env)?;
        if !report.is_valid() {
            tracing::warn!(
                curve = %self.properties.name,
                failed = ?report.failed_instruments(),
                max_error = report.max_error(),
                "bootstrapped curve does not reprice its inputs"
            );
        }
        Ok(BootstrapResult::new(structure, report, started.elapsed()))
    }

    /// Creates the assets, wired to the target, in node order.
    pub fn build_assets(&self) -> CurveResult<Vec<Box<dyn PriceableAsset>>> {
        if self.instruments.is_empty() {
            return Err(CurveError::invalid_curve(format!(
                "no instruments supplied for {}",
                self.properties.name
            )));
        }

        let mut assets = self
            .instruments
            .iter()
            .map(|(id, quotes)| self.create_asset(id, quotes))
            .collect::<CurveResult<Vec<_>>>()?;
        assets.sort_by_key(|a| a.node_date());

        for pair in assets.windows(2) {
            if pair[0].node_date() == pair[1].node_date() {
                return Err(CurveError::DuplicateNode {
                    date: pair[0].node_date().to_string(),
                    first: pair[0].identifier().to_string(),
                    second: pair[1].identifier().to_string(),
                });
            }
        }
        Ok(assets)
    }

    fn create_asset(&self, id: &str, quotes: &QuoteSet) -> CurveResult<Box<dyn PriceableAsset>> {
        let target = &self.properties;
        let properties = build_properties(&target.namespace, id, target.base_date, None)?;
        let role = calibration_role(properties.family());

        let properties = match (role, target.kind) {
            (Some(CurveRole::DiscountAndForecast), CurveKind::Rate) => {
                let discount = target.discount_curve.as_deref().unwrap_or(&target.name);
                properties
                    .with_discount_curve(discount)
                    .with_forecast_curve(&target.name)
            }
            (Some(CurveRole::Forecast), CurveKind::Rate) => {
                let properties = properties.with_forecast_curve(&target.name);
                match &target.discount_curve {
                    Some(discount) => properties.with_discount_curve(discount),
                    None => properties,
                }
            }
            (Some(CurveRole::Discount), CurveKind::Rate) => {
                properties.with_discount_curve(&target.name)
            }
            (Some(CurveRole::Index(kind)), CurveKind::Index(target_kind)) if kind == target_kind => {
                properties.with_index_curve(&target.name)
            }
            _ => {
                return Err(CurveError::invalid_curve(format!(
                    "{id} cannot calibrate the {} curve {}",
                    target.kind, target.name
                )))
            }
        };

        let conventions = self.factory.conventions_for(&properties);
        self.factory.create(quotes.clone(), properties, conventions)
    }

    fn solve(&self) -> CurveResult<(PricingStructure, Vec<Box<dyn PriceableAsset>>, MarketEnvironment)> {
        let assets = self.build_assets()?;
        let name = self.properties.name.as_str();
        tracing::info!(curve = name, instruments = assets.len(), "bootstrapping curve");

        let solver = SolverConfig::new(self.config.tolerance, self.config.max_iterations);
        let mut arena = NodeArena::new();

        for asset in &assets {
            let instrument = asset.identifier().to_string();
            let quote = asset.market_quote()?;
            let time = DayCountConvention::Act365Fixed
                .year_fraction(self.properties.base_date, asset.node_date());

            let seed = self.seed(&arena, time);
            arena.begin(asset.node_date(), time, seed, &instrument)?;

            let trial_env = |value: f64| -> CurveResult<MarketEnvironment> {
                let structure = self.structure(arena.pairs_with_trial(value), true)?;
                let mut env = self.environment.clone();
                env.add_pricing_structure(name, structure);
                Ok(env)
            };

            let guess = trial_env(seed)
                .and_then(|env| asset.node_estimate(&env))
                .ok()
                .filter(|v| v.is_finite() && *v > 0.0)
                .unwrap_or(seed);
            let guess = match self.properties.kind {
                CurveKind::Rate => guess.clamp(self.config.discount_factor_floor, self.config.discount_factor_cap),
                CurveKind::Index(_) => guess,
            };

            let objective = |value: f64| {
                trial_env(value)
                    .and_then(|env| asset.implied_quote(&env))
                    .map_or(f64::NAN, |implied| implied - quote)
            };

            let result = hybrid_numerical(&objective, guess, Some((0.5 * guess, 1.5 * guess)), &solver)
                .map_err(|e| {
                    let residual = match &e {
                        MathError::ConvergenceFailed { residual, .. } => *residual,
                        _ => objective(guess).abs(),
                    };
                    tracing::warn!(curve = name, %instrument, %e, "node solve failed");
                    CurveError::BootstrapNonConvergence {
                        instrument: instrument.clone(),
                        iterations: self.config.max_iterations,
                        residual,
                    }
                })?;

            if !(result.root.is_finite() && result.root > 0.0 && result.residual.is_finite()) {
                return Err(CurveError::BootstrapNonConvergence {
                    instrument,
                    iterations: result.iterations,
                    residual: result.residual,
                });
            }

            arena.set_solving(result.root)?;
            arena.freeze()?;
            tracing::debug!(
                curve = name,
                %instrument,
                t = time,
                value = result.root,
                iterations = result.iterations,
                residual = result.residual,
                "node solved"
            );
        }

        let structure = self.structure(arena.pairs(), self.config.extrapolation)?;
        let mut env = self.environment.clone();
        env.add_pricing_structure(name, structure.clone());
        tracing::info!(curve = name, nodes = arena.len(), "curve bootstrapped");
        Ok((structure, assets, env))
    }

    // Flat extrapolation of the curve so far: constant zero rate for
    // discount factors, last level for indices.
    fn seed(&self, arena: &NodeArena, time: f64) -> f64 {
        match (self.properties.kind, arena.last_frozen()) {
            (CurveKind::Rate, Some(last)) => last.value.powf(time / last.time),
            (CurveKind::Index(_), Some(last)) => last.value,
            (_, None) => 1.0,
        }
    }

    fn structure(&self, pairs: Vec<(f64, f64)>, extrapolation: bool) -> CurveResult<PricingStructure> {
        let base = self.properties.base_date;
        let structure: PricingStructure = match self.properties.kind {
            CurveKind::Rate => {
                RateCurve::new(base, pairs, self.config.interpolation, extrapolation)?.into()
            }
            CurveKind::Index(kind) => IndexCurve::new(
                base,
                kind,
                pairs,
                level_interpolation(self.config.interpolation),
                extrapolation,
            )?
            .into(),
        };
        Ok(structure)
    }
}

fn level_interpolation(method: InterpolationMethod) -> LevelInterpolation {
    match method {
        InterpolationMethod::LogLinear => LevelInterpolation::LogLinear,
        _ => LevelInterpolation::Linear,
    }
}

/// Bootstraps `properties` from parallel slices of identifiers and market
/// quotes with default settings and an empty environment.
pub fn bootstrap(
    properties: &CurveProperties,
    instrument_ids: &[&str],
    market_quotes: &[f64],
    interpolation: InterpolationMethod,
) -> CurveResult<PricingStructure> {
    if instrument_ids.len() != market_quotes.len() {
        return Err(CurveError::invalid_quote(format!(
            "{} instruments but {} quotes",
            instrument_ids.len(),
            market_quotes.len()
        )));
    }
    let instruments = instrument_ids
        .iter()
        .zip(market_quotes)
        .map(|(id, &q)| Ok((*id, QuoteSet::from_market_quote(q)?)))
        .collect::<CurveResult<Vec<_>>>()?;

    CurveBootstrapper::new(properties.clone())
        .with_interpolation(interpolation)
        .add_instruments(instruments)
        .bootstrap()
}
