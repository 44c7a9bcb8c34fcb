//! # chain-status
//!
//! Reports whether deposits and withdrawals are open for a fixed catalog of
//! chains on six centralized exchanges.
//!
//! ## Flow
//!
//! ```text
//! ┌──────────┐   ┌────────────┐   ┌──────────────────┐   ┌──────────────┐
//! │ Catalog  │──▶│ Aggregator │──▶│ ExchangeAdapter  │──▶│ Resilient    │
//! │ (static) │   │ (batches)  │   │ ×6, per asset    │   │ Fetcher      │
//! └──────────┘   └─────┬──────┘   └────────┬─────────┘   └──────┬───────┘
//!                      │                   │ union over          │ timeout,
//!                      ▼                   │ networks            │ linear retry
//!               AggregationResult ◀────────┘                     ▼
//!                                                        exchange REST API
//! ```
//!
//! Failures never escape an adapter: an exchange that is down shows `error`
//! in its own column and nothing else changes.

pub mod aggregator;
pub mod assembler;
pub mod catalog;
pub mod config;
pub mod error;
pub mod exchange;
pub mod fetch;
pub mod model;
pub mod symbol;

pub use aggregator::Aggregator;
pub use catalog::Catalog;
pub use config::{AggregatorSettings, CacheSettings, FetchSettings, StatusConfig};
pub use error::{FetchError, Result, StatusError};
pub use exchange::{ExchangeAdapter, default_adapters};
pub use fetch::{HttpTransport, ReqwestTransport, ResilientFetcher, RetryPolicy};
pub use model::{
    AggregatedAsset, AggregationResult, AssetCategory, AssetDescriptor, ChannelState, ExchangeStatus,
};
