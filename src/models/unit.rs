use serde::{Deserialize, Serialize};

/// A unit of measure as known to one of the two systems.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    pub name: String,
    pub abbreviation: Option<String>,
}

impl Unit {
    /// An empty abbreviation is stored as `None`.
    pub fn new(id: impl Into<String>, name: impl Into<String>, abbreviation: Option<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            abbreviation: abbreviation.filter(|a| !a.is_empty()),
        }
    }
}

/// `amount_in_to_unit = amount_in_from_unit * factor`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionFactor {
    pub from_unit: String,
    pub to_unit: String,
    pub factor: f64,
}

impl ConversionFactor {
    pub fn new(from_unit: impl Into<String>, to_unit: impl Into<String>, factor: f64) -> Self {
        Self {
            from_unit: from_unit.into(),
            to_unit: to_unit.into(),
            factor,
        }
    }
}
