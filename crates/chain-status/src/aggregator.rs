//! Batch Orchestration
//!
//! Walks the catalog in fixed-size batches. Inside a batch every asset, and
//! inside an asset every exchange, is queried concurrently; batches run
//! strictly in catalog order with an unconditional pause in between to stay
//! under upstream rate limits.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::assembler::{assemble_asset, assemble_result};
use crate::catalog::Catalog;
use crate::config::AggregatorSettings;
use crate::error::{Result, StatusError};
use crate::exchange::ExchangeAdapter;
use crate::model::{AggregatedAsset, AggregationResult, AssetDescriptor, ExchangeStatus};

/// Service fanning the catalog out over all exchange adapters
pub struct Aggregator {
    adapters: Vec<Arc<dyn ExchangeAdapter>>,
    settings: AggregatorSettings,
}

impl Aggregator {
    /// Create an aggregator, rejecting settings that would break the
    /// one-status-per-exchange guarantee or stall the batch loop
    pub fn new(adapters: Vec<Arc<dyn ExchangeAdapter>>, settings: AggregatorSettings) -> Result<Self> {
        if settings.batch_size == 0 {
            return Err(StatusError::Config("batch size must be at least 1".into()));
        }
        if adapters.is_empty() {
            return Err(StatusError::Config("no exchange adapters configured".into()));
        }

        let mut names = HashSet::new();
        for adapter in &adapters {
            if !names.insert(adapter.name()) {
                return Err(StatusError::DuplicateExchange(adapter.name().to_string()));
            }
        }

        Ok(Self { adapters, settings })
    }

    pub fn exchange_names(&self) -> Vec<&str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }

    /// Query every catalog asset on every exchange.
    ///
    /// Always yields one entry per asset and one status per exchange; failed
    /// or unfinished calls show up as `error`/`timeout` states.
    pub async fn aggregate(&self, catalog: &Catalog) -> AggregationResult {
        let started = Instant::now();
        // A deadline too far out to represent is no deadline
        let deadline = self.settings.deadline.and_then(|d| started.checked_add(d));
        let batch_count = catalog.len().div_ceil(self.settings.batch_size);

        info!(
            assets = catalog.len(),
            exchanges = self.adapters.len(),
            batch_size = self.settings.batch_size,
            batches = batch_count,
            "Starting chain status aggregation"
        );

        let mut data = Vec::with_capacity(catalog.len());

        for (index, batch) in catalog.assets().chunks(self.settings.batch_size).enumerate() {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                warn!(batch = index + 1, "Aggregation deadline passed, skipping batch");
                data.extend(batch.iter().map(|asset| self.timed_out(asset)));
                continue;
            }

            debug!(batch = index + 1, of = batch_count, assets = batch.len(), "Processing batch");
            let results = join_all(batch.iter().map(|asset| self.query_asset(asset, deadline))).await;
            data.extend(results);

            if index + 1 < batch_count {
                tokio::time::sleep(self.settings.batch_pause).await;
            }
        }

        let result = assemble_result(data);

        for name in self.exchange_names() {
            debug!(exchange = name, unavailable = result.unavailable_count(name), "Exchange summary");
        }
        info!(
            assets = result.count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Chain status aggregation complete"
        );

        result
    }

    async fn query_asset(&self, asset: &AssetDescriptor, deadline: Option<Instant>) -> AggregatedAsset {
        let statuses = join_all(self.adapters.iter().map(|adapter| async move {
            let status = query_exchange(adapter.as_ref(), &asset.symbol, deadline).await;
            (adapter.name().to_string(), status)
        }))
        .await;

        assemble_asset(asset, statuses)
    }

    fn timed_out(&self, asset: &AssetDescriptor) -> AggregatedAsset {
        assemble_asset(
            asset,
            self.adapters
                .iter()
                .map(|a| (a.name().to_string(), ExchangeStatus::timeout(a.name()))),
        )
    }
}

async fn query_exchange(adapter: &dyn ExchangeAdapter, symbol: &str, deadline: Option<Instant>) -> ExchangeStatus {
    let Some(deadline) = deadline else {
        return adapter.fetch_status(symbol).await;
    };

    match tokio::time::timeout_at(deadline, adapter.fetch_status(symbol)).await {
        Ok(status) => status,
        Err(_) => {
            warn!(exchange = adapter.name(), symbol, "Aggregation deadline reached");
            ExchangeStatus::timeout(adapter.name())
        }
    }
}
