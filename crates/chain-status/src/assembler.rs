//! Result Assembly
//!
//! Pure structural joins; nothing here issues requests.

use std::collections::BTreeMap;

use chrono::Utc;

use crate::model::{AggregatedAsset, AggregationResult, AssetDescriptor, ExchangeStatus};

/// Join a catalog entry with its statuses, keyed by the adapter that produced each one
pub fn assemble_asset<I>(asset: &AssetDescriptor, statuses: I) -> AggregatedAsset
where
    I: IntoIterator<Item = (String, ExchangeStatus)>,
{
    AggregatedAsset {
        asset: asset.clone(),
        exchanges: statuses.into_iter().collect::<BTreeMap<_, _>>(),
    }
}

/// Stamp a completed run
pub fn assemble_result(data: Vec<AggregatedAsset>) -> AggregationResult {
    AggregationResult {
        success: true,
        data,
        timestamp: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AssetCategory;

    #[test]
    fn test_assemble_preserves_order_and_keys() {
        let btc = AssetDescriptor::new("Bitcoin", "BTC", AssetCategory::Utxo, "https://blockchair.com/bitcoin");
        let sol = AssetDescriptor::new("Solana", "SOL", AssetCategory::NonEvm, "https://solscan.io");

        let data = vec![
            assemble_asset(
                &btc,
                [
                    ("OKX".to_string(), ExchangeStatus::listed("OKX", true, true)),
                    ("MEXC".to_string(), ExchangeStatus::error("MEXC")),
                ],
            ),
            assemble_asset(&sol, [("OKX".to_string(), ExchangeStatus::unsupported("OKX"))]),
        ];

        let result = assemble_result(data);

        assert!(result.success);
        assert_eq!(result.count(), 2);
        assert_eq!(result.data[0].asset.symbol, "BTC");
        assert_eq!(result.data[1].asset.symbol, "SOL");
        assert_eq!(result.data[0].exchanges.len(), 2);
        assert!(!result.data[0].status("MEXC").unwrap().available());
        assert_eq!(result.unavailable_count("OKX"), 1);
    }
}
