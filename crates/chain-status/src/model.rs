//! Domain Models
//!
//! Core data types for exchange chain status reporting.
//! `available` on [`ExchangeStatus`] is always derived from the two states,
//! so the fields are private and only the constructors can set them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Chain taxonomy used by the catalog
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetCategory {
    #[serde(rename = "UTXO")]
    Utxo,
    #[serde(rename = "EVM")]
    Evm,
    #[serde(rename = "EVM L2")]
    EvmL2,
    #[serde(rename = "Non-EVM")]
    NonEvm,
}

/// A catalog entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDescriptor {
    /// Display name (e.g., "Bitcoin")
    pub name: String,

    /// Canonical ticker (e.g., "BTC")
    pub symbol: String,

    pub category: AssetCategory,

    /// Block explorer URL
    pub explorer: String,
}

impl AssetDescriptor {
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        category: AssetCategory,
        explorer: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into().to_uppercase(),
            category,
            explorer: explorer.into(),
        }
    }
}

/// State of a single direction (deposit or withdraw) on one exchange
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelState {
    Open,
    Closed,
    Unsupported,
    Error,
    Timeout,
}

impl ChannelState {
    pub const fn from_open(open: bool) -> Self {
        if open { Self::Open } else { Self::Closed }
    }

    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }
}

/// Deposit/withdraw status of one asset on one exchange
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExchangeStatus {
    exchange: String,
    deposit: ChannelState,
    withdraw: ChannelState,
    available: bool,
}

impl ExchangeStatus {
    pub fn new(exchange: impl Into<String>, deposit: ChannelState, withdraw: ChannelState) -> Self {
        Self {
            exchange: exchange.into(),
            deposit,
            withdraw,
            available: deposit.is_open() || withdraw.is_open(),
        }
    }

    /// Status after reducing the exchange's networks
    pub fn listed(exchange: impl Into<String>, deposit_open: bool, withdraw_open: bool) -> Self {
        Self::new(
            exchange,
            ChannelState::from_open(deposit_open),
            ChannelState::from_open(withdraw_open),
        )
    }

    pub fn unsupported(exchange: impl Into<String>) -> Self {
        Self::new(exchange, ChannelState::Unsupported, ChannelState::Unsupported)
    }

    pub fn error(exchange: impl Into<String>) -> Self {
        Self::new(exchange, ChannelState::Error, ChannelState::Error)
    }

    pub fn timeout(exchange: impl Into<String>) -> Self {
        Self::new(exchange, ChannelState::Timeout, ChannelState::Timeout)
    }

    pub fn exchange(&self) -> &str {
        &self.exchange
    }

    pub const fn deposit(&self) -> ChannelState {
        self.deposit
    }

    pub const fn withdraw(&self) -> ChannelState {
        self.withdraw
    }

    pub const fn available(&self) -> bool {
        self.available
    }
}

/// A catalog entry joined with its per-exchange statuses
#[derive(Clone, Debug, Serialize)]
pub struct AggregatedAsset {
    #[serde(flatten)]
    pub asset: AssetDescriptor,

    /// Exchange name -> status, one entry per configured exchange
    pub exchanges: BTreeMap<String, ExchangeStatus>,
}

impl AggregatedAsset {
    pub fn status(&self, exchange: &str) -> Option<&ExchangeStatus> {
        self.exchanges.get(exchange)
    }
}

/// Output of one aggregation run
#[derive(Clone, Debug, Serialize)]
pub struct AggregationResult {
    pub success: bool,

    /// Assets in catalog order
    pub data: Vec<AggregatedAsset>,

    pub timestamp: DateTime<Utc>,
}

impl AggregationResult {
    pub fn count(&self) -> usize {
        self.data.len()
    }

    /// Number of assets not available on the given exchange
    pub fn unavailable_count(&self, exchange: &str) -> usize {
        self.data
            .iter()
            .filter(|a| !a.status(exchange).is_some_and(ExchangeStatus::available))
            .count()
    }
}
