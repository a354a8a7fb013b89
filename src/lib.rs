pub mod api;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod service;

pub use config::AppConfig;
pub use error::{SyncError, SyncResult};
pub use service::SyncService;
