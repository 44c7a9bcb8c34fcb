//! HTTP Handlers

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header::CACHE_CONTROL},
    response::{IntoResponse, Response},
};
use chain_status::{AggregatedAsset, AggregationResult};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub exchanges: Vec<String>,
    pub assets: usize,
}

#[derive(Debug, Serialize)]
pub struct ChainStatusResponse {
    pub success: bool,
    pub data: Vec<AggregatedAsset>,
    pub timestamp: DateTime<Utc>,
    pub count: usize,
}

impl From<AggregationResult> for ChainStatusResponse {
    fn from(result: AggregationResult) -> Self {
        let count = result.count();
        Self {
            success: result.success,
            data: result.data,
            timestamp: result.timestamp,
            count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Liveness probe; makes no upstream calls
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        exchanges: state
            .aggregator
            .exchange_names()
            .into_iter()
            .map(String::from)
            .collect(),
        assets: state.catalog.len(),
    })
}

/// Aggregated deposit/withdraw status for the whole catalog.
///
/// The run is spawned so it completes even if the client disconnects, and so
/// a panic inside it becomes a 500 instead of a dropped connection.
pub async fn chain_status(State(state): State<AppState>) -> Response {
    let aggregator = state.aggregator.clone();
    let catalog = state.catalog.clone();

    match tokio::spawn(async move { aggregator.aggregate(&catalog).await }).await {
        Ok(result) => (
            StatusCode::OK,
            [(CACHE_CONTROL, state.cache_control.clone())],
            Json(ChainStatusResponse::from(result)),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Chain status aggregation failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    success: false,
                    error: "Failed to fetch chain status".into(),
                    message: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
