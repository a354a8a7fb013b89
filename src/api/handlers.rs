use crate::models::ListMutation;
use crate::service::SyncService;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::sync::Arc;

/// Response body
#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub success: bool,
    pub message: String,
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mutations: Option<Vec<ListMutation>>,
}

impl SyncResponse {
    fn failure(message: String) -> Response {
        let response = SyncResponse {
            success: false,
            message,
            result: None,
            mutations: None,
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(response)).into_response()
    }
}

/// Health check: pings both remote systems
pub async fn health_check(State(service): State<Arc<SyncService>>) -> Response {
    Json(service.health().await).into_response()
}

/// Transfer the Mealie shopping list to Grocy
pub async fn sync_shopping_list(State(service): State<Arc<SyncService>>) -> Response {
    match service.sync_shopping_list().await {
        Ok(report) => {
            let response = SyncResponse {
                success: true,
                message: "Mealie shopping list transferred to Grocy".to_string(),
                result: Some(report.summary),
                mutations: Some(report.mutations),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            tracing::error!("Shopping list sync failed: {}", e);
            SyncResponse::failure(format!("Error: {}", e))
        }
    }
}

/// Create Mealie foods for Grocy products
pub async fn push_products(State(service): State<Arc<SyncService>>) -> Response {
    match service.push_products().await {
        Ok(created) => {
            let response = SyncResponse {
                success: true,
                message: format!("Created {} foods in Mealie", created),
                result: None,
                mutations: None,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            tracing::error!("Product push failed: {}", e);
            SyncResponse::failure(format!("Error: {}", e))
        }
    }
}

/// Compare product databases
pub async fn compare_products(State(service): State<Arc<SyncService>>) -> Response {
    match service.compare_products().await {
        Ok(result) => {
            let response = SyncResponse {
                success: true,
                message: "Compare product databases".to_string(),
                result: Some(result),
                mutations: None,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => SyncResponse::failure(format!("Error: {}", e)),
    }
}
