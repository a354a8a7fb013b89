use crate::error::{SyncError, SyncResult};
use crate::models::{ConversionFactor, Unit};
use std::collections::{HashMap, HashSet};

/// Unit names that carry meaning instead of a convertible quantity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpecialUnits {
    /// "a pinch", "a dash": any stock level satisfies the requirement
    pub any_amount: HashSet<String>,
    /// "a head", "a bunch": exactly one discrete item
    pub single_piece: HashSet<String>,
}

impl SpecialUnits {
    pub fn new<I, J, S, T>(any_amount: I, single_piece: J) -> Self
    where
        I: IntoIterator<Item = S>,
        J: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        Self {
            any_amount: any_amount.into_iter().map(Into::into).collect(),
            single_piece: single_piece.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_any_amount(&self, unit: Option<&str>) -> bool {
        unit.is_some_and(|u| self.any_amount.contains(u))
    }

    pub fn is_single_piece(&self, unit: Option<&str>) -> bool {
        unit.is_some_and(|u| self.single_piece.contains(u))
    }

    fn contains(&self, unit: &str) -> bool {
        self.any_amount.contains(unit) || self.single_piece.contains(unit)
    }
}

/// Mapping between the Mealie and Grocy unit vocabularies plus generic
/// conversion factors.
///
/// Built once per sync run and only read afterwards.
#[derive(Debug, Clone)]
pub struct UnitCatalog {
    /// (from unit, to unit) -> factor
    factors: HashMap<(String, String), f64>,
    /// Grocy unit name -> Mealie unit name, only for matched units
    aliases: HashMap<String, String>,
    special: SpecialUnits,
}

impl UnitCatalog {
    /// Build the catalog.
    ///
    /// Every Mealie unit is matched against Grocy units by exact name, or by
    /// its abbreviation equal to the Grocy unit's name. The first match is
    /// recorded with factor 1. A Mealie unit without a match that is not a
    /// special-case unit is a configuration error. Generic Grocy conversions
    /// are imported afterwards with both sides translated to Mealie names
    /// where an alias exists.
    pub fn build(
        mealie_units: &[Unit],
        grocy_units: &[Unit],
        grocy_conversions: &[ConversionFactor],
        special: SpecialUnits,
    ) -> SyncResult<Self> {
        let mut factors = HashMap::new();
        let mut aliases = HashMap::new();

        for mealie_unit in mealie_units {
            let matched = grocy_units.iter().find(|grocy_unit| {
                mealie_unit.name == grocy_unit.name
                    || mealie_unit
                        .abbreviation
                        .as_deref()
                        .filter(|a| !a.is_empty())
                        == Some(grocy_unit.name.as_str())
            });

            match matched {
                Some(grocy_unit) => {
                    factors.insert((mealie_unit.name.clone(), grocy_unit.name.clone()), 1.0);
                    aliases.insert(grocy_unit.name.clone(), mealie_unit.name.clone());
                }
                None if special.contains(&mealie_unit.name) => {
                    tracing::debug!("Unit {} is a special-case unit, no mapping needed", mealie_unit.name);
                }
                None => {
                    return Err(SyncError::UnmappedUnit {
                        unit: mealie_unit.name.clone(),
                    });
                }
            }
        }

        for conversion in grocy_conversions {
            let from = aliases
                .get(&conversion.from_unit)
                .cloned()
                .unwrap_or_else(|| conversion.from_unit.clone());
            let to = aliases
                .get(&conversion.to_unit)
                .cloned()
                .unwrap_or_else(|| conversion.to_unit.clone());
            factors.insert((from, to), conversion.factor);
        }

        tracing::info!(
            "Unit catalog built: {} factors, {} aliases",
            factors.len(),
            aliases.len()
        );

        Ok(Self {
            factors,
            aliases,
            special,
        })
    }

    pub fn factor(&self, from: &str, to: &str) -> Option<f64> {
        self.factors.get(&(from.to_string(), to.to_string())).copied()
    }

    /// Mealie name for a Grocy unit name.
    pub fn alias_of(&self, grocy_unit: &str) -> Option<&str> {
        self.aliases.get(grocy_unit).map(String::as_str)
    }

    pub fn special(&self) -> &SpecialUnits {
        &self.special
    }
}
