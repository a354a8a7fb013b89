pub mod grocy;
pub mod http;
pub mod mealie;

pub use grocy::GrocyClient;
pub use http::create_http_client;
pub use mealie::MealieClient;

use crate::error::SyncResult;
use crate::models::{ConversionFactor, FoodItem, Ingredient, Product, StockItem, Unit};
use async_trait::async_trait;
use std::collections::HashMap;

/// Meal planner side (demand, unit vocabulary, foods).
#[async_trait]
pub trait MealieApi: Send + Sync {
    async fn units(&self) -> SyncResult<Vec<Unit>>;

    /// Unchecked shopping-list items that reference a food.
    async fn shopping_list_ingredients(&self) -> SyncResult<Vec<Ingredient>>;

    async fn foods(&self) -> SyncResult<Vec<FoodItem>>;

    async fn create_food(&self, food: &FoodItem) -> SyncResult<()>;

    async fn ping(&self) -> SyncResult<bool>;
}

/// Inventory side (products, stock, shopping list).
#[async_trait]
pub trait GrocyApi: Send + Sync {
    async fn products(&self) -> SyncResult<Vec<Product>>;

    async fn units(&self) -> SyncResult<Vec<Unit>>;

    /// Generic conversions only; product-specific entries are excluded.
    async fn unit_conversions(&self) -> SyncResult<Vec<ConversionFactor>>;

    async fn resolved_conversions(&self, product_id: i64) -> SyncResult<Vec<ConversionFactor>>;

    async fn stock_item(&self, product_id: i64) -> SyncResult<StockItem>;

    /// Open shopping-list amounts summed per product.
    async fn shopping_list(&self) -> SyncResult<HashMap<i64, f64>>;

    async fn add_to_shopping_list(&self, product_id: i64, amount: f64, note: Option<&str>) -> SyncResult<()>;

    async fn remove_from_shopping_list(&self, product_id: i64) -> SyncResult<()>;

    async fn clear_done_items(&self) -> SyncResult<()>;

    /// Append a free-text note to the list description unless already present.
    async fn append_shopping_list_note(&self, note: &str) -> SyncResult<()>;

    async fn ping(&self) -> SyncResult<bool>;
}
