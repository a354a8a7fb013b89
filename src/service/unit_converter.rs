use crate::models::{round2, ConversionFactor, Ingredient, StockItem};
use crate::service::unit_catalog::UnitCatalog;

/// Converts Mealie ingredients into the stock unit of a Grocy product.
pub struct UnitConverter<'a> {
    catalog: &'a UnitCatalog,
}

/// Which rule produced a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionRule {
    AnyAmount,
    SinglePiece,
    BareCount,
    Direct,
    Resolved,
    Fallback,
}

impl<'a> UnitConverter<'a> {
    pub fn new(catalog: &'a UnitCatalog) -> Self {
        Self { catalog }
    }

    /// Whether `convert` would have to look at the product's resolved conversions.
    pub fn requires_resolved(&self, source: &Ingredient, stock_item: &StockItem) -> bool {
        self.generic_rule(source, stock_item).is_none()
    }

    /// Convert `source` into `stock_item`'s stock unit.
    ///
    /// `resolved` is the product-specific conversion set from Grocy, in Grocy
    /// unit names; the first matching entry wins. Never fails: when no rule
    /// applies an error is logged and the amount falls back to 1.
    pub fn convert(
        &self,
        source: &Ingredient,
        stock_item: &StockItem,
        resolved: &[ConversionFactor],
    ) -> Ingredient {
        let (amount, unit, rule) = match self.generic_rule(source, stock_item) {
            Some((amount, rule)) => (amount, stock_item.stock_unit.clone(), rule),
            None => match self.resolved_factor(source, stock_item, resolved) {
                Some(conversion) => (
                    source.amount * conversion.factor,
                    conversion.to_unit.clone(),
                    ConversionRule::Resolved,
                ),
                None => {
                    tracing::error!(
                        "Could not convert {} to {} for product {}",
                        source.unit.as_deref().unwrap_or("<none>"),
                        stock_item.stock_unit,
                        stock_item.name
                    );
                    (1.0, stock_item.stock_unit.clone(), ConversionRule::Fallback)
                }
            },
        };

        tracing::debug!(
            "Converted {} -> {} {} ({:?})",
            source,
            round2(amount),
            unit,
            rule
        );

        Ingredient {
            name: stock_item.name.clone(),
            amount: round2(amount),
            unit: Some(unit),
            note: source.note.clone(),
            source_id: source.source_id.clone(),
            product_id: Some(stock_item.product_id),
        }
    }

    /// Rules that need nothing beyond the catalog, in priority order.
    fn generic_rule(&self, source: &Ingredient, stock_item: &StockItem) -> Option<(f64, ConversionRule)> {
        let special = self.catalog.special();
        let unit = source.unit.as_deref();

        if special.is_any_amount(unit) || source.amount == 0.0 {
            return Some((0.0, ConversionRule::AnyAmount));
        }
        if special.is_single_piece(unit) {
            return Some((1.0, ConversionRule::SinglePiece));
        }

        match unit {
            None => Some((source.amount, ConversionRule::BareCount)),
            Some(unit) => self
                .catalog
                .factor(unit, &stock_item.stock_unit)
                .map(|factor| (source.amount * factor, ConversionRule::Direct)),
        }
    }

    fn resolved_factor<'r>(
        &self,
        source: &Ingredient,
        stock_item: &StockItem,
        resolved: &'r [ConversionFactor],
    ) -> Option<&'r ConversionFactor> {
        let unit = source.unit.as_deref()?;
        resolved.iter().find(|conversion| {
            self.catalog.alias_of(&conversion.from_unit) == Some(unit)
                && conversion.to_unit == stock_item.stock_unit
        })
    }
}
