//! Application State

use std::sync::Arc;

use axum::http::HeaderValue;
use chain_status::{Aggregator, Catalog};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Batch orchestrator over all exchange adapters
    pub aggregator: Arc<Aggregator>,

    /// Read-only asset catalog
    pub catalog: Arc<Catalog>,

    /// `Cache-Control` sent with successful status responses
    pub cache_control: HeaderValue,
}
