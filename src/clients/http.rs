use reqwest::{Client, ClientBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::error::{SyncError, SyncResult};

/// Build the HTTP client shared by both API clients.
pub fn create_http_client(timeout_secs: u64, connect_timeout_secs: u64) -> SyncResult<Client> {
    ClientBuilder::new()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(connect_timeout_secs))
        .build()
        .map_err(|e| SyncError::unavailable("http", e))
}

/// Fail on a non-success status, keeping the body for the error message.
pub(crate) async fn check_status(system: &'static str, what: &str, response: Response) -> SyncResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(SyncError::Unavailable {
        system,
        message: format!("failed to {what}: {status} {body}"),
    })
}

pub(crate) async fn read_json<T: DeserializeOwned>(system: &'static str, what: &str, response: Response) -> SyncResult<T> {
    check_status(system, what, response)
        .await?
        .json::<T>()
        .await
        .map_err(|e| SyncError::unavailable(system, format!("failed to decode {what}: {e}")))
}
