//! Binance Adapter
//!
//! Uses the public product catalogue behind binance.com, which lists every
//! coin with a `networkList` of deposit/withdraw flags. No API key required.

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
#[serde(rename_all = "camelCase")]
struct Coin {
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
    let envelope: Envelope = serde_json::from_value(body)?;

    let networks = find_record::<Coin>(envelope.data, "coin", ticker)?
        .and_then(|c| c.network_list)
        .unwrap_or_default();

    Ok(Listing::from_routes(networks.iter().map(|n| Route {
        deposit: n.deposit_enable,
        withdraw: n.withdraw_enable,
    })))
}

pub struct BinanceAdapter {
    fetcher: ResilientFetcher,
    url: String,
    retry: RetryPolicy,
}

impl BinanceAdapter {
    pub const NAME: &'static str = "Binance";
    pub const URL: &'static str =
        "https://www.binance.com/bapi/asset/v2/public/asset-service/product/get-products";

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
impl ExchangeAdapter for BinanceAdapter {
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
