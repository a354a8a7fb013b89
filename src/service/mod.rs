pub mod reconciler;
pub mod sync;
pub mod unit_catalog;
pub mod unit_converter;

pub use reconciler::{reconcile, ReconcileInput};
pub use sync::{HealthStatus, SyncService};
pub use unit_catalog::{SpecialUnits, UnitCatalog};
pub use unit_converter::UnitConverter;
