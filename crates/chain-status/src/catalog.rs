//! Asset Catalog
//!
//! The fixed, read-only list of assets queried on every run. Built once at
//! startup and shared by reference; adapters never add to it.

use std::collections::HashSet;

use crate::error::{Result, StatusError};
use crate::model::{AssetCategory, AssetDescriptor};

/// (name, symbol, category, explorer)
const BUILTIN: &[(&str, &str, AssetCategory, &str)] = &[
    ("Bitcoin", "BTC", AssetCategory::Utxo, "https://blockchair.com/bitcoin"),
    ("Litecoin", "LTC", AssetCategory::Utxo, "https://blockchair.com/litecoin"),
    ("Dogecoin", "DOGE", AssetCategory::Utxo, "https://blockchair.com/dogecoin"),
    ("Bitcoin Cash", "BCH", AssetCategory::Utxo, "https://blockchair.com/bitcoin-cash"),
    ("Ethereum", "ETH", AssetCategory::Evm, "https://etherscan.io"),
    ("BNB Smart Chain", "BNB", AssetCategory::Evm, "https://bscscan.com"),
    ("Avalanche", "AVAX", AssetCategory::Evm, "https://snowtrace.io"),
    ("Fantom", "FTM", AssetCategory::Evm, "https://ftmscan.com"),
    ("Cronos", "CRO", AssetCategory::Evm, "https://cronoscan.com"),
    ("Polygon", "MATIC", AssetCategory::EvmL2, "https://polygonscan.com"),
    ("Arbitrum", "ARB", AssetCategory::EvmL2, "https://arbiscan.io"),
    ("Optimism", "OP", AssetCategory::EvmL2, "https://optimistic.etherscan.io"),
    ("Base", "BASE", AssetCategory::EvmL2, "https://basescan.org"),
    ("zkSync Era", "ZK", AssetCategory::EvmL2, "https://explorer.zksync.io"),
    ("Linea", "LINEA", AssetCategory::EvmL2, "https://lineascan.build"),
    ("Scroll", "SCROLL", AssetCategory::EvmL2, "https://scrollscan.com"),
    ("Solana", "SOL", AssetCategory::NonEvm, "https://solscan.io"),
    ("Tron", "TRX", AssetCategory::NonEvm, "https://tronscan.org"),
    ("Ripple", "XRP", AssetCategory::NonEvm, "https://xrpscan.com"),
    ("Cardano", "ADA", AssetCategory::NonEvm, "https://cardanoscan.io"),
    ("Polkadot", "DOT", AssetCategory::NonEvm, "https://polkadot.subscan.io"),
    ("Cosmos", "ATOM", AssetCategory::NonEvm, "https://www.mintscan.io/cosmos"),
    ("Sui", "SUI", AssetCategory::NonEvm, "https://suiscan.xyz"),
    ("Aptos", "APT", AssetCategory::NonEvm, "https://aptoscan.com"),
    ("TON", "TON", AssetCategory::NonEvm, "https://tonscan.org"),
    ("Near", "NEAR", AssetCategory::NonEvm, "https://nearblocks.io"),
    ("Algorand", "ALGO", AssetCategory::NonEvm, "https://algoexplorer.io"),
    ("Stellar", "XLM", AssetCategory::NonEvm, "https://stellarchain.io"),
    ("EOS", "EOS", AssetCategory::NonEvm, "https://bloks.io"),
    ("Tezos", "XTZ", AssetCategory::NonEvm, "https://tzstats.com"),
];

/// Immutable, ordered asset catalog
#[derive(Clone, Debug)]
pub struct Catalog {
    assets: Vec<AssetDescriptor>,
}

impl Catalog {
    /// Build a catalog, rejecting empty lists and duplicate symbols
    pub fn new(assets: Vec<AssetDescriptor>) -> Result<Self> {
        if assets.is_empty() {
            return Err(StatusError::Catalog("catalog is empty".into()));
        }

        let mut seen = HashSet::new();
        for asset in &assets {
            if !seen.insert(asset.symbol.as_str()) {
                return Err(StatusError::Catalog(format!(
                    "duplicate symbol: {}",
                    asset.symbol
                )));
            }
        }

        Ok(Self { assets })
    }

    /// The compiled-in catalog
    pub fn builtin() -> Self {
        let assets = BUILTIN
            .iter()
            .map(|&(name, symbol, category, explorer)| {
                AssetDescriptor::new(name, symbol, category, explorer)
            })
            .collect();
        Self { assets }
    }

    pub fn assets(&self) -> &[AssetDescriptor] {
        &self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn get(&self, symbol: &str) -> Option<&AssetDescriptor> {
        self.assets
            .iter()
            .find(|a| a.symbol.eq_ignore_ascii_case(symbol))
    }
}
