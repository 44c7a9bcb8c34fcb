//! chain-status HTTP Server
//!
//! Axum-based server exposing the aggregated deposit/withdraw status of the
//! built-in chain catalog across six exchanges.

mod handlers;
mod state;

use std::sync::Arc;

use axum::{Router, http::HeaderValue, routing::get};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chain_status::{
    Aggregator, Catalog, ReqwestTransport, ResilientFetcher, StatusConfig, default_adapters,
};

use crate::handlers::{chain_status, health_check};
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();
    let config = match StatusConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e.user_message());
            return Err(e.into());
        }
    };

    // Exchange adapters over one pooled HTTP client
    let transport = Arc::new(ReqwestTransport::new()?);
    let fetcher = ResilientFetcher::new(transport, config.fetch.request_timeout);
    let adapters = default_adapters(&fetcher, config.fetch.retry);
    let aggregator = Aggregator::new(adapters, config.aggregator.clone())?;

    let catalog = Catalog::builtin();

    tracing::info!("Tracking {} chains on {} exchanges:", catalog.len(), aggregator.exchange_names().len());
    for name in aggregator.exchange_names() {
        tracing::info!("  • {}", name);
    }
    match config.aggregator.deadline {
        Some(deadline) => tracing::info!("Aggregation deadline: {}s", deadline.as_secs()),
        None => tracing::info!("Aggregation deadline: none (per-request timeouts only)"),
    }

    let state = AppState {
        aggregator: Arc::new(aggregator),
        catalog: Arc::new(catalog),
        cache_control: HeaderValue::from_str(&config.cache.header_value())?,
    };

    let app = build_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 chain-status server running on http://{}", config.bind_addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health            - Health check");
    tracing::info!("  GET  /api/chain-status  - Deposit/withdraw status per exchange");
    tracing::info!("");

    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/chain-status", get(chain_status))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
