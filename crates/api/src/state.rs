use std::sync::Arc;

use landscaper_core::pdf::PdfRenderer;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool is reference-counted and the rest sits
/// behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: landscaper_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Invoice PDF renderer, possibly one that always reports unavailable.
    pub pdf: Arc<dyn PdfRenderer>,
}
