//! Bitget Adapter
//!
//! `GET /api/v2/spot/public/coins` lists coins with per-chain
//! `rechargeable`/`withdrawable` flags. The flags arrive as `"true"` strings
//! or as booleans depending on the record.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::{ExchangeAdapter, Listing, Route, find_record, lenient_flag, query_listing};
use crate::fetch::{ResilientFetcher, RetryPolicy};
use crate::model::ExchangeStatus;
use crate::symbol::normalize;

#[derive(Debug, Deserialize)]
struct Envelope {
    data: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct Coin {
    #[serde(default)]
    chains: Option<Vec<Chain>>,
}

#[derive(Debug, Deserialize)]
struct Chain {
    #[serde(default, deserialize_with = "lenient_flag")]
    rechargeable: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    withdrawable: bool,
}

fn parse_listing(body: Value, ticker: &str) -> serde_json::Result<Listing> {
    let envelope: Envelope = serde_json::from_value(body)?;

    let chains = find_record::<Coin>(envelope.data, "coin", ticker)?
        .and_then(|c| c.chains)
        .unwrap_or_default();

    Ok(Listing::from_routes(chains.iter().map(|c| Route {
        deposit: c.rechargeable,
        withdraw: c.withdrawable,
    })))
}

pub struct BitgetAdapter {
    fetcher: ResilientFetcher,
    url: String,
    retry: RetryPolicy,
}

impl BitgetAdapter {
    pub const NAME: &'static str = "Bitget";
    pub const URL: &'static str = "https://api.bitget.com/api/v2/spot/public/coins";

    pub fn new(fetcher: ResilientFetcher) -> Self {
        Self {
            fetcher,
            url: Self::URL.into(),
            retry: RetryPolicy::single(),
        }
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

#[async_trait]
impl ExchangeAdapter for BitgetAdapter {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn fetch_status(&self, symbol: &str) -> ExchangeStatus {
        let ticker = normalize(symbol);
        query_listing(&self.fetcher, Self::NAME, &self.url, self.retry, symbol, |body| {
            parse_listing(body, ticker)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mixed_flag_encodings() {
        let body = json!({"code": "00000", "data": [{
            "coin": "USDC",
            "chains": [
                {"chain": "ERC20", "rechargeable": "false", "withdrawable": "true"},
                {"chain": "SOL", "rechargeable": true, "withdrawable": false}
            ]
        }]});

        let listing = parse_listing(body, "usdc").unwrap();
        assert_eq!(listing, Listing::Listed { deposit: true, withdraw: true });
    }

    #[test]
    fn test_all_chains_closed() {
        let body = json!({"data": [{
            "coin": "DOT",
            "chains": [{"chain": "DOT", "rechargeable": "false", "withdrawable": "false"}]
        }]});

        let listing = parse_listing(body, "DOT").unwrap();
        assert_eq!(listing, Listing::Listed { deposit: false, withdraw: false });
    }

    #[test]
    fn test_unlisted_coin_is_unsupported() {
        let body = json!({"data": [{"coin": "APT", "chains": []}]});
        assert_eq!(parse_listing(body.clone(), "APT").unwrap(), Listing::Unsupported);
        assert_eq!(parse_listing(body, "SUI").unwrap(), Listing::Unsupported);
    }

    #[test]
    fn test_null_flag_reads_as_closed() {
        let body = json!({"data": [
            {"coin": "XRP", "chains": [{"chain": "XRP", "rechargeable": 1.5, "withdrawable": null}]},
            {"coin": "BTC", "chains": [{"chain": "BTC", "rechargeable": "true", "withdrawable": null}]}
        ]});

        let listing = parse_listing(body, "BTC").unwrap();
        assert_eq!(listing, Listing::Listed { deposit: true, withdraw: false });
    }

    #[test]
    fn test_missing_data_is_malformed() {
        assert!(parse_listing(json!({"code": "40001"}), "BTC").is_err());
    }
}
