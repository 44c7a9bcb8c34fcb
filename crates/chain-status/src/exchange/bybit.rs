//! Bybit Adapter
//!
//! `GET /v5/asset/coin/query-info?coin=<SYM>` is filtered server-side, so the
//! URL depends on the symbol. Chain flags are `"1"`/`"0"` strings.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::{ExchangeAdapter, Listing, Route, lenient_flag, query_listing};
use crate::fetch::{ResilientFetcher, RetryPolicy};
use crate::model::ExchangeStatus;
use crate::symbol::normalize;

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    result: Option<CoinResult>,
}

#[derive(Debug, Deserialize)]
struct CoinResult {
    #[serde(default)]
    rows: Vec<CoinRow>,
}

#[derive(Debug, Deserialize)]
struct CoinRow {
    #[serde(default)]
    chains: Option<Vec<Chain>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Chain {
    #[serde(default, deserialize_with = "lenient_flag")]
    chain_deposit: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    chain_withdraw: bool,
}

/// The endpoint already filters by coin, so the first row is the asset.
fn parse_listing(body: Value) -> serde_json::Result<Listing> {
    let envelope: Envelope = serde_json::from_value(body)?;

    let chains = envelope
        .result
        .and_then(|r| r.rows.into_iter().next())
        .and_then(|row| row.chains)
        .unwrap_or_default();

    Ok(Listing::from_routes(chains.iter().map(|c| Route {
        deposit: c.chain_deposit,
        withdraw: c.chain_withdraw,
    })))
}

pub struct BybitAdapter {
    fetcher: ResilientFetcher,
    base_url: String,
    retry: RetryPolicy,
}

impl BybitAdapter {
    pub const NAME: &'static str = "Bybit";
    pub const URL: &'static str = "https://api.bybit.com/v5/asset/coin/query-info";

    pub fn new(fetcher: ResilientFetcher) -> Self {
        Self {
            fetcher,
            base_url: Self::URL.into(),
            retry: RetryPolicy::single(),
        }
    }

    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn url_for(&self, ticker: &str) -> String {
        format!("{}?coin={}", self.base_url, ticker.to_uppercase())
    }
}

#[async_trait]
impl ExchangeAdapter for BybitAdapter {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn fetch_status(&self, symbol: &str) -> ExchangeStatus {
        let url = self.url_for(normalize(symbol));
        query_listing(&self.fetcher, Self::NAME, &url, self.retry, symbol, parse_listing).await
    }
}
