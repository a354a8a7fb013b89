pub mod ingredient;
pub mod mutation;
pub mod stock;
pub mod unit;

pub use ingredient::{round2, Ingredient};
pub use mutation::{ListMutation, NeedOutcome, Reconciliation, SyncReport};
pub use stock::{FoodItem, Product, StockItem};
pub use unit::{ConversionFactor, Unit};
