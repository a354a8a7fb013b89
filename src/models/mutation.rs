use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A shopping-list change for the inventory side to execute, in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ListMutation {
    Remove {
        product_id: i64,
    },
    Add {
        product_id: i64,
        amount: f64,
        note: Option<String>,
    },
}

/// Per-ingredient decision made during reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeedOutcome {
    pub product_id: i64,
    pub name: String,
    pub required: f64,
    pub stock: f64,
    pub min_stock: f64,
    pub stock_unit: String,
    pub already_on_list: f64,
    pub needed: f64,
    pub added: bool,
}

/// Result of a single reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reconciliation {
    pub mutations: Vec<ListMutation>,
    pub outcomes: Vec<NeedOutcome>,
    pub summary: String,
}

/// What one shopping-list sync did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub summary: String,
    pub mutations: Vec<ListMutation>,
    /// Free-text notes written for demand items without a Grocy product.
    pub unmatched: Vec<String>,
    pub finished_at: DateTime<Utc>,
}
