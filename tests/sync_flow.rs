use async_trait::async_trait;
use shoplist_sync::clients::{GrocyApi, MealieApi};
use shoplist_sync::models::{ConversionFactor, FoodItem, Ingredient, ListMutation, Product, StockItem, Unit};
use shoplist_sync::service::SpecialUnits;
use shoplist_sync::{SyncError, SyncResult, SyncService};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct FakeMealie {
    units: Vec<Unit>,
    demand: Vec<Ingredient>,
    foods: Vec<FoodItem>,
    created: Mutex<Vec<String>>,
}

#[async_trait]
impl MealieApi for FakeMealie {
    async fn units(&self) -> SyncResult<Vec<Unit>> {
        Ok(self.units.clone())
    }

    async fn shopping_list_ingredients(&self) -> SyncResult<Vec<Ingredient>> {
        Ok(self.demand.clone())
    }

    async fn foods(&self) -> SyncResult<Vec<FoodItem>> {
        Ok(self.foods.clone())
    }

    async fn create_food(&self, food: &FoodItem) -> SyncResult<()> {
        self.created.lock().unwrap().push(food.name.clone());
        Ok(())
    }

    async fn ping(&self) -> SyncResult<bool> {
        Ok(true)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Clear,
    Note(String),
    Remove(i64),
    Add(i64, f64, Option<String>),
}

#[derive(Default)]
struct FakeGrocy {
    products: Vec<Product>,
    units: Vec<Unit>,
    conversions: Vec<ConversionFactor>,
    resolved: HashMap<i64, Vec<ConversionFactor>>,
    stock: HashMap<i64, StockItem>,
    on_list: HashMap<i64, f64>,
    fail_stock: bool,
    resolved_requests: Mutex<Vec<i64>>,
    calls: Mutex<Vec<Call>>,
}

impl FakeGrocy {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl GrocyApi for FakeGrocy {
    async fn products(&self) -> SyncResult<Vec<Product>> {
        Ok(self.products.clone())
    }

    async fn units(&self) -> SyncResult<Vec<Unit>> {
        Ok(self.units.clone())
    }

    async fn unit_conversions(&self) -> SyncResult<Vec<ConversionFactor>> {
        Ok(self.conversions.clone())
    }

    async fn resolved_conversions(&self, product_id: i64) -> SyncResult<Vec<ConversionFactor>> {
        self.resolved_requests.lock().unwrap().push(product_id);
        Ok(self.resolved.get(&product_id).cloned().unwrap_or_default())
    }

    async fn stock_item(&self, product_id: i64) -> SyncResult<StockItem> {
        if self.fail_stock {
            return Err(SyncError::unavailable("grocy", "connection refused"));
        }
        self.stock
            .get(&product_id)
            .cloned()
            .ok_or_else(|| SyncError::unavailable("grocy", format!("no product {product_id}")))
    }

    async fn shopping_list(&self) -> SyncResult<HashMap<i64, f64>> {
        Ok(self.on_list.clone())
    }

    async fn add_to_shopping_list(&self, product_id: i64, amount: f64, note: Option<&str>) -> SyncResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Add(product_id, amount, note.map(str::to_string)));
        Ok(())
    }

    async fn remove_from_shopping_list(&self, product_id: i64) -> SyncResult<()> {
        self.calls.lock().unwrap().push(Call::Remove(product_id));
        Ok(())
    }

    async fn clear_done_items(&self) -> SyncResult<()> {
        self.calls.lock().unwrap().push(Call::Clear);
        Ok(())
    }

    async fn append_shopping_list_note(&self, note: &str) -> SyncResult<()> {
        self.calls.lock().unwrap().push(Call::Note(note.to_string()));
        Ok(())
    }

    async fn ping(&self) -> SyncResult<bool> {
        Err(SyncError::unavailable("grocy", "timeout"))
    }
}

fn unit(id: &str, name: &str, abbreviation: Option<&str>) -> Unit {
    Unit::new(id, name, abbreviation.map(str::to_string))
}

fn stock(id: i64, name: &str, stock: f64, min_stock: f64, unit: &str) -> StockItem {
    StockItem {
        product_id: id,
        name: name.to_string(),
        stock,
        stock_opened: 0.0,
        min_stock,
        stock_unit_id: 1,
        stock_unit: unit.to_string(),
    }
}

fn demand(name: &str, amount: f64, unit: Option<&str>, note: Option<&str>) -> Ingredient {
    Ingredient::new(name, amount, unit.map(str::to_string)).with_note(note.map(str::to_string))
}

fn special() -> SpecialUnits {
    SpecialUnits::new(["Prise", "Teelöffel"], ["Kopf", "Bund"])
}

fn kitchen() -> (FakeMealie, FakeGrocy) {
    let mealie = FakeMealie {
        units: vec![
            unit("m1", "Gramm", Some("g")),
            unit("m2", "Kilogramm", Some("kg")),
            unit("m3", "Teelöffel", Some("TL")),
            unit("m4", "Dose", None),
            unit("m5", "Kopf", None),
        ],
        demand: vec![
            demand("Sugar", 500.0, Some("Gramm"), Some("for cake")),
            demand("Garlic", 2.0, Some("Kopf"), None),
            demand("Sugar", 1.5, Some("Kilogramm"), Some("for cookies")),
            demand("Tomatoes", 2.0, Some("Dose"), None),
            demand("Dragonfruit", 2.0, None, None),
            demand("Salt", 1.0, Some("Teelöffel"), None),
        ],
        ..Default::default()
    };

    let grocy = FakeGrocy {
        products: vec![
            Product::new(1, "Sugar", None),
            Product::new(2, "Garlic", None),
            Product::new(3, "Tomatoes", None),
            Product::new(4, "Salt", None),
        ],
        units: vec![
            unit("1", "g", None),
            unit("2", "kg", None),
            unit("3", "Dose", None),
            unit("4", "Stück", None),
        ],
        conversions: vec![ConversionFactor::new("g", "kg", 0.001)],
        resolved: HashMap::from([
            (1, vec![ConversionFactor::new("g", "kg", 0.001)]),
            (3, vec![ConversionFactor::new("Dose", "g", 400.0)]),
        ]),
        stock: HashMap::from([
            (1, stock(1, "Sugar", 0.5, 0.0, "kg")),
            (2, stock(2, "Garlic", 0.0, 0.0, "Stück")),
            (3, stock(3, "Tomatoes", 100.0, 0.0, "g")),
            (4, stock(4, "Salt", 250.0, 0.0, "g")),
        ]),
        on_list: HashMap::from([(1, 0.25)]),
        ..Default::default()
    };

    (mealie, grocy)
}

#[tokio::test]
async fn sync_applies_mutations_after_all_fetches() {
    let (mealie, grocy) = kitchen();
    let grocy = Arc::new(grocy);
    let service = SyncService::new(Arc::new(mealie), grocy.clone(), special());

    let report = service.sync_shopping_list().await.unwrap();

    // Sugar: 500 Gramm via the product's resolved g -> kg factor, plus 1.5 kg = 2 kg needed, 0.5 in stock, 0.25 listed -> 1.25 more, 1.5 total
    // Garlic: 1 piece, nothing in stock
    // Tomatoes: 2 cans via resolved factor = 800 g, 100 in stock -> 700
    // Salt: any amount, 250 g in stock
    assert_eq!(
        grocy.calls(),
        vec![
            Call::Clear,
            Call::Note("Dragonfruit: 2".to_string()),
            Call::Remove(1),
            Call::Add(1, 1.5, Some("for cake, for cookies".to_string())),
            Call::Add(2, 1.0, None),
            Call::Add(3, 700.0, None),
        ]
    );
    assert_eq!(report.unmatched, vec!["Dragonfruit: 2".to_string()]);
    assert_eq!(report.mutations.len(), 4);
    assert!(report.summary.contains("Sugar is added to the shopping list."));
    assert!(report.summary.contains("Salt is in stock or already on the list (250 g)"));
    assert_eq!(*grocy.resolved_requests.lock().unwrap(), vec![1, 3]);
}

#[tokio::test]
async fn failed_fetch_aborts_without_writing() {
    let (mealie, mut grocy) = kitchen();
    grocy.fail_stock = true;
    let grocy = Arc::new(grocy);
    let service = SyncService::new(Arc::new(mealie), grocy.clone(), special());

    let err = service.sync_shopping_list().await.unwrap_err();

    assert!(matches!(err, SyncError::Unavailable { system: "grocy", .. }));
    assert!(grocy.calls().is_empty());
}

#[tokio::test]
async fn unmapped_unit_aborts_without_writing() {
    let (mut mealie, grocy) = kitchen();
    mealie.units.push(unit("m9", "Tasse", None));
    let grocy = Arc::new(grocy);
    let service = SyncService::new(Arc::new(mealie), grocy.clone(), special());

    let err = service.sync_shopping_list().await.unwrap_err();

    assert!(matches!(err, SyncError::UnmappedUnit { ref unit } if unit == "Tasse"));
    assert!(grocy.calls().is_empty());
}

#[tokio::test]
async fn empty_demand_is_up_to_date() {
    let (mut mealie, grocy) = kitchen();
    mealie.demand.clear();
    let grocy = Arc::new(grocy);
    let service = SyncService::new(Arc::new(mealie), grocy.clone(), special());

    let report = service.sync_shopping_list().await.unwrap();

    assert_eq!(report.summary, "Shopping list is up to date.");
    assert!(report.mutations.is_empty());
    assert_eq!(grocy.calls(), vec![Call::Clear]);
}

#[tokio::test]
async fn compare_and_push_products() {
    let (mut mealie, grocy) = kitchen();
    mealie.foods = vec![
        FoodItem {
            id: Some("f1".to_string()),
            name: "Sugar".to_string(),
            plural_name: None,
            description: None,
        },
        FoodItem {
            id: Some("f2".to_string()),
            name: "Basil".to_string(),
            plural_name: None,
            description: None,
        },
    ];
    let mealie = Arc::new(mealie);
    let service = SyncService::new(mealie.clone(), Arc::new(grocy), special());

    let comparison = service.compare_products().await.unwrap();
    assert!(comparison.contains("Garlic missing in Mealie."));
    assert!(comparison.contains("Basil missing in Grocy."));
    assert!(!comparison.contains("Sugar"));

    let created = service.push_products().await.unwrap();
    assert_eq!(created, 3);
    assert_eq!(
        *mealie.created.lock().unwrap(),
        vec!["Garlic".to_string(), "Tomatoes".to_string(), "Salt".to_string()]
    );
}

#[tokio::test]
async fn health_reports_failed_ping_as_disconnected() {
    let (mealie, grocy) = kitchen();
    let service = SyncService::new(Arc::new(mealie), Arc::new(grocy), special());

    let health = service.health().await;

    assert_eq!(health.status, "no connection");
    assert!(!health.grocy_connection);
    assert!(health.mealie_connection);
}

#[tokio::test]
async fn list_mutations_serialize_with_op_tag() {
    let add = ListMutation::Add {
        product_id: 1,
        amount: 2.0,
        note: None,
    };
    let json = serde_json::to_value(&add).unwrap();
    assert_eq!(json["op"], "add");
    assert_eq!(json["product_id"], 1);
}
