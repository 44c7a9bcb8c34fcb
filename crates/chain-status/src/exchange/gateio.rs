//! Gate.io Adapter
//!
//! `GET /api/v4/spot/currencies` returns one flat record per currency with
//! negative flags (`deposit_disabled`, `withdraw_disabled`, ...). There is no
//! per-network breakdown, so each currency is treated as a single route.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use super::{ExchangeAdapter, Listing, Route, find_record, lenient_flag, query_listing};
use crate::fetch::{ResilientFetcher, RetryPolicy};
use crate::model::ExchangeStatus;
use crate::symbol::normalize;

#[derive(Debug, Deserialize)]
struct Currency {
    #[serde(default, deserialize_with = "lenient_flag")]
    delisted: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    trade_disabled: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    deposit_disabled: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    withdraw_disabled: bool,
    #[serde(default, deserialize_with = "lenient_flag")]
    withdraw_delayed: bool,
}

fn parse_listing(body: Value, ticker: &str) -> serde_json::Result<Listing> {
    let currencies: Vec<Value> = serde_json::from_value(body)?;

    let Some(currency) = find_record::<Currency>(currencies, "currency", ticker)? else {
        return Ok(Listing::Unsupported);
    };

    if currency.delisted || currency.trade_disabled {
        return Ok(Listing::Unsupported);
    }

    Ok(Listing::from_routes([Route {
        deposit: !currency.deposit_disabled,
        withdraw: !(currency.withdraw_disabled || currency.withdraw_delayed),
    }]))
}

pub struct GateIoAdapter {
    fetcher: ResilientFetcher,
    url: String,
    retry: RetryPolicy,
}

impl GateIoAdapter {
    pub const NAME: &'static str = "Gate.io";
    pub const URL: &'static str = "https://api.gateio.ws/api/v4/spot/currencies";

    pub fn new(fetcher: ResilientFetcher) -> Self {
        Self {
            fetcher,
            url: Self::URL.into(),
            retry: RetryPolicy::default(),
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
impl ExchangeAdapter for GateIoAdapter {
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
        json!([
            {"currency": "BTC", "delisted": false, "trade_disabled": false,
             "deposit_disabled": false, "withdraw_disabled": false, "withdraw_delayed": false},
            {"currency": "ETH", "delisted": false, "trade_disabled": false,
             "deposit_disabled": true, "withdraw_disabled": false, "withdraw_delayed": true},
            {"currency": "FTM", "delisted": true, "trade_disabled": false,
             "deposit_disabled": false, "withdraw_disabled": false, "withdraw_delayed": false},
            {"currency": "EOS", "delisted": false, "trade_disabled": true,
             "deposit_disabled": false, "withdraw_disabled": false, "withdraw_delayed": false}
        ])
    }

    #[test]
    fn test_open_currency() {
        let listing = parse_listing(body(), "btc").unwrap();
        assert_eq!(listing, Listing::Listed { deposit: true, withdraw: true });
    }

    #[test]
    fn test_withdraw_delayed_counts_as_closed() {
        let listing = parse_listing(body(), "ETH").unwrap();
        assert_eq!(listing, Listing::Listed { deposit: false, withdraw: false });
    }

    #[test]
    fn test_delisted_and_trade_disabled_are_unsupported() {
        assert_eq!(parse_listing(body(), "FTM").unwrap(), Listing::Unsupported);
        assert_eq!(parse_listing(body(), "EOS").unwrap(), Listing::Unsupported);
        assert_eq!(parse_listing(body(), "XTZ").unwrap(), Listing::Unsupported);
    }

    #[test]
    fn test_odd_record_for_other_currency_is_ignored() {
        let body = json!([
            {"currency": "XRP", "deposit_disabled": null, "withdraw_disabled": 0},
            {"currency": 7},
            "not a record",
            {"currency": "BTC", "deposit_disabled": false, "withdraw_disabled": null}
        ]);

        let listing = parse_listing(body, "BTC").unwrap();
        assert_eq!(listing, Listing::Listed { deposit: true, withdraw: true });
    }

    #[test]
    fn test_non_array_is_malformed() {
        assert!(parse_listing(json!({"label": "INVALID"}), "BTC").is_err());
    }
}
