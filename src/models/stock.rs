use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Stock snapshot of one Grocy product, fetched once per sync run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    pub product_id: i64,
    pub name: String,
    pub stock: f64,
    pub stock_opened: f64,
    pub min_stock: f64,
    pub stock_unit_id: i64,
    pub stock_unit: String,
}

/// Grocy product master record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

/// Mealie food record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: Option<String>,
    pub name: String,
    pub plural_name: Option<String>,
    pub description: Option<String>,
}

impl Product {
    /// Build a product, stripping HTML markup from the description.
    ///
    /// Descriptions that are one character or shorter after stripping are dropped.
    pub fn new(id: i64, name: impl Into<String>, description: Option<&str>) -> Self {
        let description = description
            .map(|d| strip_tags(d).trim().to_string())
            .filter(|d| d.chars().count() > 1);

        Self {
            id,
            name: name.into(),
            description,
        }
    }
}

fn html_tag_regex() -> Option<&'static Regex> {
    static HTML_TAG: OnceLock<Option<Regex>> = OnceLock::new();
    HTML_TAG.get_or_init(|| Regex::new("<.*?>").ok()).as_ref()
}

fn strip_tags(html: &str) -> String {
    match html_tag_regex() {
        Some(re) => re.replace_all(html, "").into_owned(),
        None => html.to_string(),
    }
}
