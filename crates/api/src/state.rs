use std::sync::Arc;

use danza_cache::Cache;

use crate::config::AppConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: danza_db::DbPool,
    /// Server configuration.
    pub config: Arc<AppConfig>,
    /// Cache facade (Redis or in-process, per configuration).
    pub cache: Cache,
}
