//! OKX Adapter
//!
//! `GET /api/v5/asset/currencies` returns one row per (currency, chain), so
//! the networks for an asset are all rows sharing its `ccy`.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::{ExchangeAdapter, Listing, Route, lenient_flag, matching_records, query_listing};
use crate::fetch::{ResilientFetcher, RetryPolicy};
use crate::model::ExchangeStatus;
use crate::symbol::normalize;

#[derive(Debug, Deserialize)]
struct Envelope {
    data: Vec<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChainRow {
    #[serde(default, deserialize_with = "lenient_flag")]
    can_dep: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    can_wd: bool,
}

fn parse_listing(body: Value, ticker: &str) -> serde_json::Result<Listing> {
    let envelope: Envelope = serde_json::from_value(body)?;
    let rows: Vec<ChainRow> = matching_records(envelope.data, "ccy", ticker)?;

    Ok(Listing::from_routes(rows.iter().map(|row| Route {
        deposit: row.can_dep,
        withdraw: row.can_wd,
    })))
}

pub struct OkxAdapter {
    fetcher: ResilientFetcher,
    url: String,
    retry: RetryPolicy,
}

impl OkxAdapter {
    pub const NAME: &'static str = "OKX";
    pub const URL: &'static str = "https://www.okx.com/api/v5/asset/currencies";

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
impl ExchangeAdapter for OkxAdapter {
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

    fn body() -> Value {
        json!({"code": "0", "data": [
            {"ccy": "USDT", "chain": "USDT-TRC20", "canDep": true, "canWd": true},
            {"ccy": "SOL", "chain": "SOL-Solana", "canDep": false, "canWd": true},
            {"ccy": "SOL", "chain": "SOL-BSC", "canDep": false, "canWd": false},
            {"ccy": "ADA", "chain": "ADA-Cardano", "canDep": false, "canWd": false}
        ]})
    }

    #[test]
    fn test_rows_for_same_currency_are_networks() {
        let listing = parse_listing(body(), "sol").unwrap();
        assert_eq!(listing, Listing::Listed { deposit: false, withdraw: true });
    }

    #[test]
    fn test_all_closed() {
        let listing = parse_listing(body(), "ADA").unwrap();
        assert_eq!(listing, Listing::Listed { deposit: false, withdraw: false });
    }

    #[test]
    fn test_no_rows_is_unsupported() {
        assert_eq!(parse_listing(body(), "XTZ").unwrap(), Listing::Unsupported);
    }

    #[test]
    fn test_row_without_ccy_is_skipped() {
        let body = json!({"data": [
            {"chain": "orphan", "canDep": true, "canWd": true},
            {"ccy": "TRX", "chain": "TRX-TRON", "canDep": "maybe", "canWd": null},
            {"ccy": "ATOM", "chain": "ATOM-Cosmos", "canDep": true, "canWd": null}
        ]});

        let listing = parse_listing(body, "ATOM").unwrap();
        assert_eq!(listing, Listing::Listed { deposit: true, withdraw: false });
    }

    #[test]
    fn test_missing_data_is_malformed() {
        assert!(parse_listing(json!({"code": "50011", "msg": "rate limited"}), "SOL").is_err());
    }
}
