pub mod handlers;

pub use handlers::{compare_products, health_check, push_products, sync_shopping_list};

use crate::service::SyncService;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;

/// Build the HTTP router
pub fn router(service: Arc<SyncService>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/shopping-list/sync", post(sync_shopping_list))
        .route("/api/products/sync", post(push_products))
        .route("/api/products/compare", get(compare_products))
        .layer(ServiceBuilder::new())
        .with_state(service)
}
