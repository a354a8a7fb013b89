use crate::error::SyncResult;
use crate::models::{round2, ConversionFactor, Ingredient, ListMutation, NeedOutcome, Reconciliation, StockItem};
use crate::service::unit_converter::UnitConverter;
use indexmap::IndexMap;
use std::collections::HashMap;

/// Needs at or below this are treated as covered by stock.
pub const NEED_THRESHOLD: f64 = 0.05;

pub const UP_TO_DATE_MESSAGE: &str = "Shopping list is up to date.";

/// Inputs of one reconciliation pass, all fetched before it starts.
pub struct ReconcileInput<'a> {
    /// Demand, in Mealie units, in first-seen order
    pub demand: &'a [Ingredient],
    /// Grocy product id -> stock snapshot
    pub stock: &'a HashMap<i64, StockItem>,
    /// Grocy product id -> amount already on the Grocy shopping list
    pub on_list: &'a HashMap<i64, f64>,
    /// Grocy product id -> product-specific resolved conversions
    pub resolved: &'a HashMap<i64, Vec<ConversionFactor>>,
}

/// Compute the shopping-list mutations for one sync run.
pub fn reconcile(input: &ReconcileInput<'_>, converter: &UnitConverter<'_>) -> SyncResult<Reconciliation> {
    // 1. 换算为库存单位
    let normalized = normalize(input, converter);

    // 2. 按 (商品, 单位) 聚合，保持首次出现顺序
    let aggregated = aggregate(normalized)?;

    // 3. 计算每个食材的需求量
    let mut result = Reconciliation::default();
    let mut lines = Vec::with_capacity(aggregated.len());

    for ingredient in aggregated {
        let Some(product_id) = ingredient.product_id else {
            continue;
        };
        let Some(stock_item) = input.stock.get(&product_id) else {
            tracing::warn!("No stock item for product {}, skipping {}", product_id, ingredient.name);
            continue;
        };
        let already = input.on_list.get(&product_id).copied().unwrap_or(0.0);
        let needed = compute_need(ingredient.amount, stock_item, already);

        // 4. 阈值判断并生成变更
        let mutations = mutations_for(product_id, needed, already, ingredient.note.clone());
        let added = !mutations.is_empty();

        if added {
            tracing::info!(
                "Adding {} {} to shopping list (required: {}, stock: {}, min stock: {}, already on shopping list: {})",
                needed, ingredient.name, ingredient.amount, stock_item.stock, stock_item.min_stock, already
            );
            lines.push(format!("{} is added to the shopping list.", ingredient.name));
        } else {
            tracing::info!(
                "Stock is sufficient for {} (required: {}, stock: {}, min stock: {}, already on shopping list: {})",
                ingredient.name, ingredient.amount, stock_item.stock, stock_item.min_stock, already
            );
            lines.push(format!(
                "{} is in stock or already on the list ({} {})",
                ingredient.name, stock_item.stock, stock_item.stock_unit
            ));
        }

        result.mutations.extend(mutations);
        result.outcomes.push(NeedOutcome {
            product_id,
            name: ingredient.name.clone(),
            required: ingredient.amount,
            stock: stock_item.stock,
            min_stock: stock_item.min_stock,
            stock_unit: stock_item.stock_unit.clone(),
            already_on_list: already,
            needed,
            added,
        });
    }

    // 5. 汇总
    result.summary = if lines.is_empty() {
        UP_TO_DATE_MESSAGE.to_string()
    } else {
        lines.join("\n")
    };

    Ok(result)
}

fn normalize(input: &ReconcileInput<'_>, converter: &UnitConverter<'_>) -> Vec<Ingredient> {
    input
        .demand
        .iter()
        .filter_map(|ingredient| {
            let stock_item = input.stock.get(&ingredient.product_id?)?;
            if ingredient.unit.as_deref() == Some(stock_item.stock_unit.as_str()) {
                return Some(ingredient.clone());
            }

            tracing::info!(
                "Converting {} to {}",
                ingredient.unit.as_deref().unwrap_or("<none>"),
                stock_item.stock_unit
            );
            let resolved = input
                .resolved
                .get(&stock_item.product_id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            Some(converter.convert(ingredient, stock_item, resolved))
        })
        .collect()
}

/// Merge ingredients sharing product and unit. The first occurrence survives
/// and keeps its position.
pub fn aggregate(ingredients: Vec<Ingredient>) -> SyncResult<Vec<Ingredient>> {
    let mut groups: IndexMap<(Option<i64>, Option<String>), Ingredient> = IndexMap::new();

    for ingredient in ingredients {
        let key = (ingredient.product_id, ingredient.unit.clone());
        match groups.get_mut(&key) {
            Some(existing) => existing.add(&ingredient)?,
            None => {
                groups.insert(key, ingredient);
            }
        }
    }

    Ok(groups.into_values().collect())
}

/// Amount that has to be bought, rounded to two decimals.
///
/// An `amount` of zero means any stock suffices, so one piece is needed only
/// when nothing is in stock.
pub fn compute_need(amount: f64, stock_item: &StockItem, already_on_list: f64) -> f64 {
    if amount > 0.0 {
        round2((amount - stock_item.stock + stock_item.min_stock - already_on_list).max(0.0))
    } else if stock_item.stock == 0.0 {
        round2((1.0 - already_on_list).max(0.0))
    } else {
        0.0
    }
}

/// Grocy has no atomic increment, so an existing entry is removed and its
/// amount folded into the new one.
pub fn mutations_for(product_id: i64, needed: f64, already_on_list: f64, note: Option<String>) -> Vec<ListMutation> {
    if needed <= NEED_THRESHOLD {
        return Vec::new();
    }

    let mut mutations = Vec::with_capacity(2);
    let mut amount = needed;
    if already_on_list > 0.0 {
        mutations.push(ListMutation::Remove { product_id });
        amount = round2(needed + already_on_list);
    }
    mutations.push(ListMutation::Add {
        product_id,
        amount,
        note,
    });
    mutations
}
