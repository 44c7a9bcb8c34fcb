//! MEXC Adapter
//!
//! `GET /api/v3/capital/config/getall` returns a bare array of coins, each
//! with a `networkList`.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::{ExchangeAdapter, Listing, Route, find_record, lenient_flag, query_listing};
use crate::fetch::{ResilientFetcher, RetryPolicy};
use crate::model::ExchangeStatus;
use crate::symbol::normalize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoinConfig {
    #[serde(default)]
    network_list: Option<Vec<Network>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Network {
    #[serde(default, deserialize_with = "lenient_flag")]
    deposit_enable: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    withdraw_enable: bool,
}

fn parse_listing(body: Value, ticker: &str) -> serde_json::Result<Listing> {
    let coins: Vec<Value> = serde_json::from_value(body)?;

    let Some(coin) = find_record::<CoinConfig>(coins, "coin", ticker)? else {
        return Ok(Listing::Unsupported);
    };

    let networks = coin.network_list.as_deref().unwrap_or_default();

    Ok(Listing::from_routes(networks.iter().map(|n| Route {
        deposit: n.deposit_enable,
        withdraw: n.withdraw_enable,
    })))
}

pub struct MexcAdapter {
    fetcher: ResilientFetcher,
    url: String,
    retry: RetryPolicy,
}

impl MexcAdapter {
    pub const NAME: &'static str = "MEXC";
    pub const URL: &'static str = "https://api.mexc.com/api/v3/capital/config/getall";

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
impl ExchangeAdapter for MexcAdapter {
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
    fn test_network_union() {
        let body = json!([{
            "coin": "TRX",
            "name": "TRON",
            "networkList": [
                {"network": "TRC20", "depositEnable": false, "withdrawEnable": true},
                {"network": "BEP20", "depositEnable": true, "withdrawEnable": false}
            ]
        }]);

        let listing = parse_listing(body, "TRX").unwrap();
        assert_eq!(listing, Listing::Listed { deposit: true, withdraw: true });
    }

    #[test]
    fn test_empty_network_list_is_unsupported() {
        let body = json!([{"coin": "ALGO", "networkList": []}, {"coin": "XLM"}]);

        assert_eq!(parse_listing(body.clone(), "ALGO").unwrap(), Listing::Unsupported);
        assert_eq!(parse_listing(body, "XLM").unwrap(), Listing::Unsupported);
    }

    #[test]
    fn test_unrelated_coin_with_bad_flags_is_ignored() {
        let body = json!([
            {"coin": "LUNA", "networkList": [{"network": "LUNA", "depositEnable": "yes", "withdrawEnable": 3}]},
            {"coin": null},
            {"coin": "ADA", "networkList": [{"network": "ADA", "depositEnable": null, "withdrawEnable": true}]}
        ]);

        let listing = parse_listing(body, "ADA").unwrap();
        assert_eq!(listing, Listing::Listed { deposit: false, withdraw: true });
    }

    #[test]
    fn test_error_object_is_malformed() {
        assert!(parse_listing(json!({"code": 700002, "msg": "Signature invalid"}), "BTC").is_err());
    }
}
