use crate::clients::{GrocyApi, MealieApi};
use crate::error::SyncResult;
use crate::models::{ConversionFactor, FoodItem, Ingredient, ListMutation, StockItem, SyncReport};
use crate::service::reconciler::{reconcile, ReconcileInput};
use crate::service::unit_catalog::{SpecialUnits, UnitCatalog};
use crate::service::unit_converter::UnitConverter;
use chrono::Utc;
use futures::future::{try_join, try_join3, try_join_all};
use indexmap::IndexSet;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

pub const PRODUCTS_IDENTICAL_MESSAGE: &str = "Product databases are identical.";

/// Connection status of both systems.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub grocy_connection: bool,
    pub mealie_connection: bool,
}

/// Shopping-list sync between Mealie and Grocy.
///
/// Runs are not meant to overlap; every run builds its own unit catalog.
pub struct SyncService {
    mealie: Arc<dyn MealieApi>,
    grocy: Arc<dyn GrocyApi>,
    special_units: SpecialUnits,
}

impl SyncService {
    pub fn new(mealie: Arc<dyn MealieApi>, grocy: Arc<dyn GrocyApi>, special_units: SpecialUnits) -> Self {
        Self {
            mealie,
            grocy,
            special_units,
        }
    }

    /// Bring the Grocy shopping list in line with the Mealie shopping list.
    ///
    /// Everything is fetched before the first write, so a failed fetch leaves
    /// the Grocy list untouched.
    pub async fn sync_shopping_list(&self) -> SyncResult<SyncReport> {
        // 1. 拉取商品、单位表和两边的购物清单
        let (products, (mealie_units, grocy_units, conversions), (mut demand, on_list)) = try_join3(
            self.grocy.products(),
            try_join3(self.mealie.units(), self.grocy.units(), self.grocy.unit_conversions()),
            try_join(self.mealie.shopping_list_ingredients(), self.grocy.shopping_list()),
        )
        .await?;

        // 2. 构建单位目录（每次运行重建）
        let catalog = UnitCatalog::build(&mealie_units, &grocy_units, &conversions, self.special_units.clone())?;
        let converter = UnitConverter::new(&catalog);

        // 3. 按名称匹配需求与商品
        let mut unmatched = Vec::new();
        for ingredient in demand.iter_mut() {
            match products.iter().find(|p| p.name == ingredient.name) {
                Some(product) => ingredient.product_id = Some(product.id),
                None => {
                    tracing::warn!("Could not find product for ingredient: {}", ingredient.name);
                    unmatched.push(unmatched_note(ingredient));
                }
            }
        }

        // 4. 拉取库存，仅在需要时拉取商品专属换算
        let product_ids: IndexSet<i64> = demand.iter().filter_map(|i| i.product_id).collect();
        let stock_items = try_join_all(product_ids.iter().map(|&id| self.grocy.stock_item(id))).await?;
        let stock: HashMap<i64, StockItem> = stock_items.into_iter().map(|s| (s.product_id, s)).collect();

        let needs_resolved: IndexSet<i64> = demand
            .iter()
            .filter_map(|ingredient| {
                let stock_item = stock.get(&ingredient.product_id?)?;
                let needs = ingredient.unit.as_deref() != Some(stock_item.stock_unit.as_str())
                    && converter.requires_resolved(ingredient, stock_item);
                needs.then_some(stock_item.product_id)
            })
            .collect();
        let resolved_sets = try_join_all(needs_resolved.iter().map(|&id| self.grocy.resolved_conversions(id))).await?;
        let resolved: HashMap<i64, Vec<ConversionFactor>> = needs_resolved.into_iter().zip(resolved_sets).collect();

        // 5. 对账
        let input = ReconcileInput {
            demand: &demand,
            stock: &stock,
            on_list: &on_list,
            resolved: &resolved,
        };
        let reconciliation = reconcile(&input, &converter)?;

        // 6. 写入 Grocy
        self.grocy.clear_done_items().await?;
        for note in &unmatched {
            self.grocy.append_shopping_list_note(note).await?;
        }
        for mutation in &reconciliation.mutations {
            match mutation {
                ListMutation::Remove { product_id } => {
                    self.grocy.remove_from_shopping_list(*product_id).await?;
                }
                ListMutation::Add {
                    product_id,
                    amount,
                    note,
                } => {
                    self.grocy
                        .add_to_shopping_list(*product_id, *amount, note.as_deref())
                        .await?;
                }
            }
        }

        tracing::info!(
            "Shopping list sync finished: {} mutations, {} unmatched",
            reconciliation.mutations.len(),
            unmatched.len()
        );

        Ok(SyncReport {
            summary: reconciliation.summary,
            mutations: reconciliation.mutations,
            unmatched,
            finished_at: Utc::now(),
        })
    }

    /// Create Mealie foods for Grocy products missing there. Returns how many were created.
    pub async fn push_products(&self) -> SyncResult<usize> {
        let (products, foods) = try_join(self.grocy.products(), self.mealie.foods()).await?;

        let mut created = 0;
        for product in products {
            if foods.iter().any(|f| f.name == product.name) {
                tracing::info!("Skipping existing item: {}", product.name);
                continue;
            }

            let food = FoodItem {
                id: None,
                name: product.name,
                plural_name: None,
                description: product.description,
            };
            self.mealie.create_food(&food).await?;
            created += 1;
        }

        Ok(created)
    }

    /// Products present in only one of the two systems.
    pub async fn compare_products(&self) -> SyncResult<String> {
        let (products, foods) = try_join(self.grocy.products(), self.mealie.foods()).await?;

        let mut lines = Vec::new();
        for product in &products {
            if !foods.iter().any(|f| f.name == product.name) {
                lines.push(format!("{} missing in Mealie.", product.name));
            }
        }
        for food in &foods {
            if !products.iter().any(|p| p.name == food.name) {
                lines.push(format!("{} missing in Grocy.", food.name));
            }
        }

        if lines.is_empty() {
            Ok(PRODUCTS_IDENTICAL_MESSAGE.to_string())
        } else {
            Ok(lines.join("\n"))
        }
    }

    /// Transport failures count as "not connected".
    pub async fn health(&self) -> HealthStatus {
        let (grocy, mealie) = futures::join!(self.grocy.ping(), self.mealie.ping());
        let grocy_connection = grocy.unwrap_or_else(|e| {
            tracing::error!("Grocy connection check failed: {}", e);
            false
        });
        let mealie_connection = mealie.unwrap_or_else(|e| {
            tracing::error!("Mealie connection check failed: {}", e);
            false
        });

        HealthStatus {
            status: if grocy_connection && mealie_connection {
                "alive"
            } else {
                "no connection"
            },
            grocy_connection,
            mealie_connection,
        }
    }
}

/// Free-text shopping-list note for demand without a Grocy product.
pub fn unmatched_note(ingredient: &Ingredient) -> String {
    let mut note = ingredient.name.clone();
    if ingredient.amount > 0.0 {
        note.push_str(&format!(": {}", ingredient.amount));
        if let Some(unit) = &ingredient.unit {
            note.push_str(&format!(" {unit}"));
        }
    }
    note
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmatched_note_formats() {
        assert_eq!(unmatched_note(&Ingredient::new("Basil", 0.0, Some("Bund".to_string()))), "Basil");
        assert_eq!(unmatched_note(&Ingredient::new("Limes", 3.0, None)), "Limes: 3");
        assert_eq!(
            unmatched_note(&Ingredient::new("Tofu", 400.0, Some("g".to_string()))),
            "Tofu: 400 g"
        );
    }
}
