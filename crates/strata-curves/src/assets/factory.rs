//! Registered constructors keyed by asset family.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use strata_config::{ConventionTable, CurrencyConventions};
use strata_core::types::Date;

use super::controllers::{
    BasisSwapController, BondController, CapletController, DepositController, FraController,
    FutureController, IndexLevelController, OisController, PriceableAsset, SpreadFraController,
    SwapController, XccyController,
};
use super::identifier::AssetFamily;
use super::properties::{build_properties, AssetProperties};
use super::quotes::QuoteSet;
use crate::error::{CurveError, CurveResult};

/// Builds a controller from quotes, properties and conventions.
pub type AssetConstructor = Arc<
    dyn Fn(QuoteSet, AssetProperties, CurrencyConventions) -> CurveResult<Box<dyn PriceableAsset>>
        + Send
        + Sync,
>;

fn boxed<T, F>(build: F) -> AssetConstructor
where
    T: PriceableAsset + 'static,
    F: Fn(QuoteSet, AssetProperties, CurrencyConventions) -> CurveResult<T> + Send + Sync + 'static,
{
    Arc::new(move |quotes, properties, conventions| {
        Ok(Box::new(build(quotes, properties, conventions)?) as Box<dyn PriceableAsset>)
    })
}

/// Creates priceable assets by family.
///
/// ```rust
/// use strata_curves::assets::{AssetFactory, QuoteSet};
/// use strata_core::types::Date;
///
/// let factory = AssetFactory::with_defaults();
/// let asset = factory
///     .create_from_id(
///         "demo",
///         "AUD-Deposit-3M",
///         QuoteSet::from_market_quote(0.0435).unwrap(),
///         Date::from_ymd(2025, 1, 15).unwrap(),
///         None,
///     )
///     .unwrap();
/// assert_eq!(asset.identifier().to_string(), "AUD-Deposit-3M");
/// ```
#[derive(Clone)]
pub struct AssetFactory {
    constructors: HashMap<AssetFamily, AssetConstructor>,
    conventions: ConventionTable,
}

impl fmt::Debug for AssetFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut families: Vec<_> = self.constructors.keys().collect();
        families.sort();
        f.debug_struct("AssetFactory")
            .field("families", &families)
            .field("conventions", &self.conventions.len())
            .finish()
    }
}

impl AssetFactory {
    /// An empty factory using the standard convention table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
            conventions: ConventionTable::standard().clone(),
        }
    }

    /// A factory with controllers for every family.
    #[must_use]
    pub fn with_defaults() -> Self {
        use AssetFamily as F;
        let mut factory = Self::new();
        factory.register(F::Deposit, boxed(DepositController::create));
        factory.register(F::Xibor, boxed(DepositController::create));
        factory.register(F::OIS, boxed(OisController::create));
        factory.register(F::Fra, boxed(FraController::create));
        factory.register(F::BillFra, boxed(FraController::create));
        factory.register(F::SpreadFra, boxed(SpreadFraController::create));
        factory.register(F::IRFuture, boxed(FutureController::create));
        factory.register(F::IRSwap, boxed(SwapController::create));
        factory.register(F::BasisSwap, boxed(BasisSwapController::create));
        factory.register(F::XccySwap, boxed(XccyController::create));
        factory.register(F::XccyBasisSwap, boxed(XccyController::create));
        factory.register(F::Bond, boxed(BondController::create));
        for family in [F::Caplet, F::Floorlet, F::BillCaplet, F::BillFloorlet] {
            factory.register(family, boxed(CapletController::create));
        }
        for family in [
            F::FxSpot,
            F::FxForward,
            F::CommoditySpot,
            F::CommodityForward,
            F::CommodityFuture,
            F::CPIndex,
        ] {
            factory.register(family, boxed(IndexLevelController::create));
        }
        factory
    }

    /// Uses `table` to resolve conventions in [`create_from_id`](Self::create_from_id).
    #[must_use]
    pub fn with_conventions(mut self, table: ConventionTable) -> Self {
        self.conventions = table;
        self
    }

    /// Registers (or replaces) the constructor for a family.
    pub fn register(&mut self, family: AssetFamily, constructor: AssetConstructor) {
        self.constructors.insert(family, constructor);
    }

    /// True when a constructor is registered for `family`.
    #[must_use]
    pub fn supports(&self, family: AssetFamily) -> bool {
        self.constructors.contains_key(&family)
    }

    /// Convention table used for identifier-based creation.
    #[must_use]
    pub fn conventions(&self) -> &ConventionTable {
        &self.conventions
    }

    /// Conventions for the currency of `properties`.
    #[must_use]
    pub fn conventions_for(&self, properties: &AssetProperties) -> CurrencyConventions {
        self.conventions
            .get_or_generic(properties.identifier.currency())
    }

    /// Creates a controller from explicit properties and conventions.
    pub fn create(
        &self,
        quotes: QuoteSet,
        properties: AssetProperties,
        conventions: CurrencyConventions,
    ) -> CurveResult<Box<dyn PriceableAsset>> {
        let family = properties.family();
        let constructor = self.constructors.get(&family).ok_or_else(|| {
            CurveError::malformed(
                properties.identifier.to_string(),
                format!("no controller registered for {family}"),
            )
        })?;
        constructor(quotes, properties, conventions)
    }

    /// Parses `id`, builds default properties and creates the controller.
    pub fn create_from_id(
        &self,
        namespace: &str,
        id: &str,
        quotes: QuoteSet,
        base_date: Date,
        notional: Option<f64>,
    ) -> CurveResult<Box<dyn PriceableAsset>> {
        let properties = build_properties(namespace, id, base_date, notional)?;
        let conventions = self.conventions_for(&properties);
        self.create(quotes, properties, conventions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::quotes::BasicQuotation;

    fn base() -> Date {
        Date::from_ymd(2025, 1, 15).unwrap()
    }

    #[test]
    fn test_defaults_cover_every_family() {
        let factory = AssetFactory::with_defaults();
        for family in AssetFamily::ALL {
            assert!(factory.supports(family), "{family}");
        }
    }

    #[test]
    fn test_create_every_family() {
        let factory = AssetFactory::with_defaults();
        let ids = [
            "AUD-Deposit-3M",
            "AUD-Xibor-3M",
            "AUD-OIS-1Y",
            "AUD-Fra-1M-3M",
            "AUD-BillFra-3M-3M",
            "AUD-SpreadFra-3M-6M",
            "AUD-IRFuture-IR-H6",
            "AUD-IRSwap-5Y",
            "AUD-BasisSwap-5Y-6M",
            "AUD-XccySwap-5Y",
            "AUD-XccyBasisSwap-5Y-3M",
            "AUD-Bond-ACGB.5,75.10Y",
            "AUD-Caplet-6M-3M-0.07",
            "AUD-Floorlet-6M-3M-0.03",
            "AUD-BillCaplet-6M-3M-0.07",
            "AUD-BillFloorlet-6M-3M-0.03",
            "AUDUSD-FxSpot-SP",
            "AUDUSD-FxForward-1M",
            "USD-CommoditySpot-ICE_B",
            "USD-CommodityForward-ICE_B-3M",
            "USD-CommodityFuture-CL-Z9",
            "AUD-CPIndex-1Y",
        ];
        assert_eq!(ids.len(), AssetFamily::ALL.len());
        for id in ids {
            let quotes = QuoteSet::new([BasicQuotation::market_quote(0.04), BasicQuotation::volatility(0.2)]).unwrap();
            let asset = factory.create_from_id("test", id, quotes, base(), None).unwrap();
            assert_eq!(asset.identifier().to_string(), id);
        }
    }

    #[test]
    fn test_unregistered_family() {
        let factory = AssetFactory::new();
        let result = factory.create_from_id(
            "test",
            "AUD-Deposit-3M",
            QuoteSet::from_market_quote(0.04).unwrap(),
            base(),
            None,
        );
        assert!(matches!(result, Err(CurveError::MalformedIdentifier { .. })));
    }

    #[test]
    fn test_register_replaces_constructor() {
        let mut factory = AssetFactory::with_defaults();
        factory.register(
            AssetFamily::Deposit,
            Arc::new(
                |_: QuoteSet, properties: AssetProperties, _: CurrencyConventions| -> CurveResult<Box<dyn PriceableAsset>> {
                    Err(CurveError::invalid_quote(format!("rejected {}", properties.identifier)))
                },
            ),
        );
        let result = factory.create_from_id(
            "test",
            "AUD-Deposit-3M",
            QuoteSet::from_market_quote(0.04).unwrap(),
            base(),
            None,
        );
        assert!(matches!(result, Err(CurveError::InvalidQuote { .. })));
    }
}
