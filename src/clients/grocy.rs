use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;

use super::http::{check_status, read_json};
use super::GrocyApi;
use crate::error::{SyncError, SyncResult};
use crate::models::{ConversionFactor, Product, StockItem, Unit};

const SYSTEM: &str = "grocy";
const API_KEY_HEADER: &str = "GROCY-API-KEY";
const SHOPPING_LIST_ID: i64 = 1;

/// Grocy REST client (API key header auth).
pub struct GrocyClient {
    http: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct ProductRow {
    id: i64,
    name: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UnitRow {
    id: i64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct ConversionRow {
    from_qu_id: i64,
    to_qu_id: i64,
    factor: f64,
    product_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct ResolvedConversionRow {
    from_qu_name: String,
    to_qu_name: String,
    factor: f64,
}

#[derive(Debug, Deserialize)]
struct StockProductRow {
    id: i64,
    name: String,
    #[serde(default)]
    min_stock_amount: f64,
    qu_id_stock: i64,
}

#[derive(Debug, Deserialize)]
struct StockRow {
    product: StockProductRow,
    #[serde(default)]
    stock_amount_aggregated: f64,
    #[serde(default)]
    stock_amount_opened: f64,
    quantity_unit_stock: UnitRow,
}

#[derive(Debug, Deserialize)]
struct ShoppingListRow {
    product_id: Option<i64>,
    amount: f64,
    #[serde(default)]
    done: i64,
}

#[derive(Debug, Deserialize)]
struct ShoppingListHeader {
    #[serde(default)]
    description: Option<String>,
}

impl GrocyClient {
    pub fn new(http: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.http
            .get(format!("{}{}", self.base_url, path))
            .header(API_KEY_HEADER, &self.api_key)
            .header("accept", "application/json")
    }

    fn post(&self, path: &str) -> RequestBuilder {
        self.http
            .post(format!("{}{}", self.base_url, path))
            .header(API_KEY_HEADER, &self.api_key)
    }

    async fn fetch<T: serde::de::DeserializeOwned>(&self, path: &str, what: &str) -> SyncResult<T> {
        let response = self
            .get(path)
            .send()
            .await
            .map_err(|e| SyncError::unavailable(SYSTEM, e))?;
        read_json(SYSTEM, what, response).await
    }

    async fn send(&self, request: RequestBuilder, what: &str) -> SyncResult<()> {
        let response = request
            .send()
            .await
            .map_err(|e| SyncError::unavailable(SYSTEM, e))?;
        check_status(SYSTEM, what, response).await?;
        Ok(())
    }

    async fn unit_names(&self) -> SyncResult<HashMap<i64, String>> {
        let rows: Vec<UnitRow> = self.fetch("/objects/quantity_units", "get units").await?;
        Ok(rows.into_iter().map(|u| (u.id, u.name)).collect())
    }
}

#[async_trait]
impl GrocyApi for GrocyClient {
    async fn products(&self) -> SyncResult<Vec<Product>> {
        let rows: Vec<ProductRow> = self.fetch("/objects/products", "get products").await?;
        Ok(rows
            .into_iter()
            .map(|p| Product::new(p.id, p.name, p.description.as_deref()))
            .collect())
    }

    async fn units(&self) -> SyncResult<Vec<Unit>> {
        let rows: Vec<UnitRow> = self.fetch("/objects/quantity_units", "get units").await?;
        Ok(rows
            .into_iter()
            .map(|u| Unit::new(u.id.to_string(), u.name, None))
            .collect())
    }

    async fn unit_conversions(&self) -> SyncResult<Vec<ConversionFactor>> {
        let names = self.unit_names().await?;
        let rows: Vec<ConversionRow> = self
            .fetch("/objects/quantity_unit_conversions", "get conversions")
            .await?;

        let mut conversions = Vec::new();
        for row in rows.into_iter().filter(|r| r.product_id.is_none()) {
            match (names.get(&row.from_qu_id), names.get(&row.to_qu_id)) {
                (Some(from), Some(to)) => conversions.push(ConversionFactor::new(from.clone(), to.clone(), row.factor)),
                _ => tracing::warn!(
                    "Conversion {} -> {} references an unknown unit, skipping",
                    row.from_qu_id,
                    row.to_qu_id
                ),
            }
        }

        Ok(conversions)
    }

    async fn resolved_conversions(&self, product_id: i64) -> SyncResult<Vec<ConversionFactor>> {
        let path = format!("/objects/quantity_unit_conversions_resolved?query%5B%5D=product_id%3D{product_id}");
        let rows: Vec<ResolvedConversionRow> = self.fetch(&path, "get resolved conversions").await?;
        Ok(rows
            .into_iter()
            .map(|r| ConversionFactor::new(r.from_qu_name, r.to_qu_name, r.factor))
            .collect())
    }

    async fn stock_item(&self, product_id: i64) -> SyncResult<StockItem> {
        let row: StockRow = self
            .fetch(&format!("/stock/products/{product_id}"), "get stock product")
            .await?;

        Ok(StockItem {
            product_id: row.product.id,
            name: row.product.name,
            stock: row.stock_amount_aggregated,
            stock_opened: row.stock_amount_opened,
            min_stock: row.product.min_stock_amount,
            stock_unit_id: row.product.qu_id_stock,
            stock_unit: row.quantity_unit_stock.name,
        })
    }

    async fn shopping_list(&self) -> SyncResult<HashMap<i64, f64>> {
        let rows: Vec<ShoppingListRow> = self.fetch("/objects/shopping_list", "get shopping list").await?;

        let mut amounts = HashMap::new();
        for row in rows.into_iter().filter(|r| r.done != 1) {
            if let Some(product_id) = row.product_id {
                *amounts.entry(product_id).or_insert(0.0) += row.amount;
            }
        }
        Ok(amounts)
    }

    async fn add_to_shopping_list(&self, product_id: i64, amount: f64, note: Option<&str>) -> SyncResult<()> {
        let body = json!({
            "product_id": product_id,
            "amount": amount,
            "note": note,
        });
        self.send(self.post("/objects/shopping_list").json(&body), "add item to shopping list")
            .await
    }

    async fn remove_from_shopping_list(&self, product_id: i64) -> SyncResult<()> {
        let body = json!({ "product_id": product_id });
        self.send(
            self.post("/stock/shoppinglist/remove-product").json(&body),
            "remove item from shopping list",
        )
        .await
    }

    async fn clear_done_items(&self) -> SyncResult<()> {
        let body = json!({ "done_only": true });
        self.send(
            self.post("/stock/shoppinglist/clear").json(&body),
            "clear checked items from shopping list",
        )
        .await
    }

    async fn append_shopping_list_note(&self, note: &str) -> SyncResult<()> {
        let path = format!("/objects/shopping_lists/{SHOPPING_LIST_ID}");
        let header: ShoppingListHeader = self.fetch(&path, "read shopping list notes").await?;
        let current = header.description.unwrap_or_default();

        if current.contains(note) {
            return Ok(());
        }

        let body = json!({ "description": format!("{current}<p>{note}</p>") });
        let request = self
            .http
            .put(format!("{}{}", self.base_url, path))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&body);
        self.send(request, "add note to shopping list").await
    }

    async fn ping(&self) -> SyncResult<bool> {
        let response = self
            .get("/system/info")
            .send()
            .await
            .map_err(|e| SyncError::unavailable(SYSTEM, e))?;
        Ok(response.status().is_success())
    }
}
