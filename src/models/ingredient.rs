use crate::error::{SyncError, SyncResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A quantity of a named food item.
///
/// `amount == 0.0` means any amount is sufficient. `unit == None` means a bare
/// count of pieces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub amount: f64,
    pub unit: Option<String>,
    pub note: Option<String>,
    /// Mealie shopping-list item id
    pub source_id: Option<String>,
    /// Grocy product id
    pub product_id: Option<i64>,
}

impl Ingredient {
    /// Negative or NaN amounts are clamped to zero.
    pub fn new(name: impl Into<String>, amount: f64, unit: Option<String>) -> Self {
        Self {
            name: name.into(),
            amount: if amount.is_nan() { 0.0 } else { amount.max(0.0) },
            unit,
            note: None,
            source_id: None,
            product_id: None,
        }
    }

    pub fn with_note(mut self, note: Option<String>) -> Self {
        self.note = note.filter(|n| !n.is_empty());
        self
    }

    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    pub fn with_product_id(mut self, product_id: i64) -> Self {
        self.product_id = Some(product_id);
        self
    }

    /// Merge `other` into `self`. Units must be identical, including both absent.
    pub fn add(&mut self, other: &Ingredient) -> SyncResult<()> {
        if self.unit != other.unit {
            return Err(SyncError::UnitMismatch {
                left: self.unit.clone(),
                right: other.unit.clone(),
            });
        }

        self.amount += other.amount;

        let mine = self.note.take().filter(|n| !n.is_empty());
        let theirs = other.note.as_deref().filter(|n| !n.is_empty());
        self.note = match (mine, theirs) {
            (Some(mine), Some(theirs)) if mine != theirs => Some(format!("{mine}, {theirs}")),
            (Some(mine), _) => Some(mine),
            (None, theirs) => theirs.map(str::to_string),
        };

        Ok(())
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.unit {
            Some(unit) => write!(f, "{} {} {}", self.amount, unit, self.name)?,
            None => write!(f, "{} {}", self.amount, self.name)?,
        }
        if let Some(note) = &self.note {
            write!(f, " ({note})")?;
        }
        Ok(())
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn grams(name: &str, amount: f64, note: Option<&str>) -> Ingredient {
        Ingredient::new(name, amount, Some("g".to_string())).with_note(note.map(str::to_string))
    }

    #[test]
    fn add_same_unit_keeps_single_note() {
        let mut sugar = grams("Sugar", 100.0, Some("for cake"));
        sugar.add(&grams("Sugar", 50.0, Some(""))).unwrap();

        assert_eq!(sugar.amount, 150.0);
        assert_eq!(sugar.note.as_deref(), Some("for cake"));
    }

    #[test]
    fn add_concatenates_distinct_notes() {
        let mut butter = grams("Butter", 100.0, Some("for cookies"));
        butter.add(&grams("Butter", 50.0, Some("for cake"))).unwrap();

        assert_eq!(butter.amount, 150.0);
        assert_eq!(butter.note.as_deref(), Some("for cookies, for cake"));
    }

    #[test]
    fn add_does_not_repeat_identical_note() {
        let mut butter = grams("Butter", 1.0, Some("soft"));
        butter.add(&grams("Butter", 1.0, Some("soft"))).unwrap();
        assert_eq!(butter.note.as_deref(), Some("soft"));
    }

    #[test]
    fn add_takes_other_note_when_missing() {
        let mut flour = grams("Flour", 1.0, None);
        flour.add(&grams("Flour", 2.0, Some("sifted"))).unwrap();
        assert_eq!(flour.note.as_deref(), Some("sifted"));

        let mut plain = grams("Flour", 1.0, None);
        plain.add(&grams("Flour", 2.0, None)).unwrap();
        assert_eq!(plain.note, None);
    }

    #[test]
    fn add_bare_counts() {
        let mut eggs = Ingredient::new("Eggs", 2.0, None);
        eggs.add(&Ingredient::new("Eggs", 4.0, None)).unwrap();
        assert_eq!(eggs.amount, 6.0);
    }

    #[test]
    fn add_different_units_fails() {
        let mut flour = grams("Flour", 100.0, None);
        let err = flour
            .add(&Ingredient::new("Flour", 1.0, Some("kg".to_string())))
            .unwrap_err();

        assert!(err.to_string().contains("different units"));
        assert_eq!(flour.amount, 100.0);
    }

    #[test]
    fn negative_amount_is_clamped() {
        assert_eq!(Ingredient::new("Salt", -3.0, None).amount, 0.0);
        assert_eq!(Ingredient::new("Salt", f64::NAN, None).amount, 0.0);
    }

    #[test]
    fn display_format() {
        let milk = Ingredient::new("Milk", 1.0, Some("L".to_string()))
            .with_note(Some("fresh".to_string()));
        assert_eq!(milk.to_string(), "1 L Milk (fresh)");
        assert_eq!(Ingredient::new("Eggs", 6.0, None).to_string(), "6 Eggs");
    }

    #[test]
    fn round2_rounds_to_cents() {
        assert_eq!(round2(1.004), 1.0);
        assert_eq!(round2(0.999), 1.0);
        assert_eq!(round2(2.345_1), 2.35);
    }

    proptest! {
        #[test]
        fn merge_total_is_commutative(a in 0.0f64..10_000.0, b in 0.0f64..10_000.0) {
            let mut left = grams("X", a, None);
            left.add(&grams("X", b, None)).unwrap();
            let mut right = grams("X", b, None);
            right.add(&grams("X", a, None)).unwrap();
            prop_assert_eq!(left.amount, right.amount);
        }

        #[test]
        fn merge_with_different_units_always_fails(u1 in "[a-zA-Z]{1,8}", u2 in "[a-zA-Z]{1,8}") {
            prop_assume!(u1 != u2);
            let mut left = Ingredient::new("X", 1.0, Some(u1));
            let right = Ingredient::new("X", 1.0, Some(u2));
            prop_assert!(left.add(&right).is_err());
            prop_assert!(left.add(&Ingredient::new("X", 1.0, None)).is_err());
        }
    }
}
