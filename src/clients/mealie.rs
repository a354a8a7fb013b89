use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::http::{check_status, read_json};
use super::MealieApi;
use crate::error::{SyncError, SyncResult};
use crate::models::{FoodItem, Ingredient, Unit};

const SYSTEM: &str = "mealie";

/// Mealie REST client (bearer token auth).
pub struct MealieClient {
    http: Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct Page<T> {
    items: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct UnitRow {
    id: String,
    name: String,
    #[serde(default)]
    abbreviation: Option<String>,
}

#[derive(Debug, Deserialize)]
struct NamedRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ShoppingItemRow {
    id: String,
    #[serde(default)]
    checked: bool,
    #[serde(default)]
    quantity: f64,
    unit: Option<NamedRef>,
    food: Option<NamedRef>,
    #[serde(default)]
    note: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FoodRow {
    id: String,
    name: String,
    plural_name: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateFood<'a> {
    name: &'a str,
    plural_name: Option<&'a str>,
    description: &'a str,
    aliases: Vec<String>,
}

impl MealieClient {
    pub fn new(http: Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    async fn get_page<T: serde::de::DeserializeOwned>(&self, path: &str, what: &str) -> SyncResult<Vec<T>> {
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.api_key)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| SyncError::unavailable(SYSTEM, e))?;

        let page: Page<T> = read_json(SYSTEM, what, response).await?;
        Ok(page.items)
    }
}

#[async_trait]
impl MealieApi for MealieClient {
    async fn units(&self) -> SyncResult<Vec<Unit>> {
        let rows: Vec<UnitRow> = self.get_page("/units?page=1&perPage=1000", "get units").await?;
        Ok(rows
            .into_iter()
            .map(|u| Unit::new(u.id, u.name, u.abbreviation))
            .collect())
    }

    async fn shopping_list_ingredients(&self) -> SyncResult<Vec<Ingredient>> {
        let rows: Vec<ShoppingItemRow> = self
            .get_page("/households/shopping/items?page=1&perPage=1000", "get shopping list")
            .await?;

        let mut ingredients = Vec::with_capacity(rows.len());
        for row in rows.into_iter().filter(|r| !r.checked) {
            let Some(food) = row.food else {
                tracing::warn!("Shopping list item {} has no food, skipping", row.id);
                continue;
            };
            ingredients.push(
                Ingredient::new(food.name, row.quantity, row.unit.map(|u| u.name))
                    .with_note(row.note)
                    .with_source_id(row.id),
            );
        }

        Ok(ingredients)
    }

    async fn foods(&self) -> SyncResult<Vec<FoodItem>> {
        let rows: Vec<FoodRow> = self.get_page("/foods?page=1&perPage=1000", "get foods").await?;
        Ok(rows
            .into_iter()
            .map(|f| FoodItem {
                id: Some(f.id),
                name: f.name,
                plural_name: f.plural_name,
                description: f.description,
            })
            .collect())
    }

    async fn create_food(&self, food: &FoodItem) -> SyncResult<()> {
        let body = CreateFood {
            name: &food.name,
            plural_name: food.plural_name.as_deref(),
            description: food.description.as_deref().unwrap_or(""),
            aliases: Vec::new(),
        };

        let response = self
            .http
            .post(format!("{}/foods", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| SyncError::unavailable(SYSTEM, e))?;

        check_status(SYSTEM, "create food", response).await?;
        Ok(())
    }

    async fn ping(&self) -> SyncResult<bool> {
        let response = self
            .http
            .get(format!("{}/app/about", self.base_url))
            .send()
            .await
            .map_err(|e| SyncError::unavailable(SYSTEM, e))?;

        Ok(response.status().is_success())
    }
}
