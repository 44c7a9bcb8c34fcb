//! Exchange Integration
//!
//! One adapter per exchange. Each adapter owns its endpoint, its response
//! schema and its retry policy; all of them share the same reduction rule:
//! deposit (or withdraw) is open when **any** listed network allows it.

mod binance;
mod bitget;
mod bybit;
mod gateio;
mod mexc;
pub mod mock;
mod okx;

pub use binance::BinanceAdapter;
pub use bitget::BitgetAdapter;
pub use bybit::BybitAdapter;
pub use gateio::GateIoAdapter;
pub use mexc::MexcAdapter;
pub use mock::MockAdapter;
pub use okx::OkxAdapter;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::{DeserializeOwned, Deserializer};
use serde_json::Value;
use tracing::{debug, warn};

use crate::fetch::{FetchContext, ResilientFetcher, RetryPolicy};
use crate::model::ExchangeStatus;

/// Exchange adapter trait (Strategy pattern)
///
/// Implementations never fail: every outcome, including transport errors,
/// is folded into the returned [`ExchangeStatus`].
#[async_trait]
pub trait ExchangeAdapter: Send + Sync {
    /// Display name, also the key in the aggregated exchange map
    fn name(&self) -> &str;

    /// Deposit/withdraw status for a canonical catalog symbol
    async fn fetch_status(&self, symbol: &str) -> ExchangeStatus;
}

/// Deposit/withdraw flags of one network an exchange offers for an asset
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Route {
    pub deposit: bool,
    pub withdraw: bool,
}

/// What an exchange's listing says about an asset
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Listing {
    /// Not listed, delisted, or trading disabled
    Unsupported,
    Listed { deposit: bool, withdraw: bool },
}

impl Listing {
    /// Union over networks. An asset with no networks is not listed.
    pub fn from_routes<I>(routes: I) -> Self
    where
        I: IntoIterator<Item = Route>,
    {
        routes.into_iter().fold(Self::Unsupported, |acc, route| match acc {
            Self::Unsupported => Self::Listed {
                deposit: route.deposit,
                withdraw: route.withdraw,
            },
            Self::Listed { deposit, withdraw } => Self::Listed {
                deposit: deposit || route.deposit,
                withdraw: withdraw || route.withdraw,
            },
        })
    }

    pub fn into_status(self, exchange: &str) -> ExchangeStatus {
        match self {
            Self::Unsupported => ExchangeStatus::unsupported(exchange),
            Self::Listed { deposit, withdraw } => ExchangeStatus::listed(exchange, deposit, withdraw),
        }
    }
}

/// Case-insensitive ticker comparison used by every adapter
pub(crate) fn same_ticker(listed: &str, ticker: &str) -> bool {
    listed.eq_ignore_ascii_case(ticker)
}

fn ticker_field_matches(record: &Value, field: &str, ticker: &str) -> bool {
    record
        .get(field)
        .and_then(Value::as_str)
        .is_some_and(|listed| same_ticker(listed, ticker))
}

/// Decode only the record whose `field` names `ticker`.
///
/// Listings cover every coin an exchange carries; records for other coins are
/// never decoded, so their shape cannot affect this asset.
pub(crate) fn find_record<T>(records: Vec<Value>, field: &str, ticker: &str) -> serde_json::Result<Option<T>>
where
    T: DeserializeOwned,
{
    records
        .into_iter()
        .find(|record| ticker_field_matches(record, field, ticker))
        .map(serde_json::from_value)
        .transpose()
}

/// Like [`find_record`] for listings with one record per network
pub(crate) fn matching_records<T>(records: Vec<Value>, field: &str, ticker: &str) -> serde_json::Result<Vec<T>>
where
    T: DeserializeOwned,
{
    records
        .into_iter()
        .filter(|record| ticker_field_matches(record, field, ticker))
        .map(serde_json::from_value)
        .collect()
}

/// Exchange flag: `true`, `"true"`, `"1"` and `1` are set; `null` and
/// anything else read as closed.
pub(crate) fn lenient_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(set) => set,
        Value::String(s) => s.eq_ignore_ascii_case("true") || s == "1",
        Value::Number(n) => n.as_u64() == Some(1),
        _ => false,
    })
}

/// Shared request flow: fetch, hand the body to the adapter's parser,
/// translate every failure into an `error` status.
pub(crate) async fn query_listing<F>(
    fetcher: &ResilientFetcher,
    exchange: &str,
    url: &str,
    retry: RetryPolicy,
    symbol: &str,
    parse: F,
) -> ExchangeStatus
where
    F: FnOnce(Value) -> serde_json::Result<Listing> + Send,
{
    let ctx = FetchContext { exchange, symbol };

    let body = match fetcher.fetch(url, retry, ctx).await {
        Ok(body) => body,
        Err(_) => return ExchangeStatus::error(exchange),
    };

    match parse(body) {
        Ok(listing) => {
            debug!(exchange, symbol, ?listing, "Exchange listing resolved");
            listing.into_status(exchange)
        }
        Err(e) => {
            warn!(exchange, symbol, error = %e, "Unexpected exchange response shape");
            ExchangeStatus::error(exchange)
        }
    }
}

/// The six production adapters in display order.
///
/// Gate.io opts in to `retry`; the others make a single attempt.
pub fn default_adapters(fetcher: &ResilientFetcher, retry: RetryPolicy) -> Vec<Arc<dyn ExchangeAdapter>> {
    vec![
        Arc::new(GateIoAdapter::new(fetcher.clone()).with_retry(retry)),
        Arc::new(BinanceAdapter::new(fetcher.clone())),
        Arc::new(OkxAdapter::new(fetcher.clone())),
        Arc::new(BybitAdapter::new(fetcher.clone())),
        Arc::new(BitgetAdapter::new(fetcher.clone())),
        Arc::new(MexcAdapter::new(fetcher.clone())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::exchange::mock::{StubReply, StubTransport};

    const fn route(deposit: bool, withdraw: bool) -> Route {
        Route { deposit, withdraw }
    }

    #[test]
    fn test_union_over_networks() {
        // Exactly one of three networks accepts deposits
        let listing = Listing::from_routes([
            route(false, true),
            route(true, false),
            route(false, false),
        ]);
        assert_eq!(
            listing,
            Listing::Listed {
                deposit: true,
                withdraw: true
            }
        );

        let listing = Listing::from_routes([route(false, false), route(false, false)]);
        assert_eq!(
            listing,
            Listing::Listed {
                deposit: false,
                withdraw: false
            }
        );
    }

    #[test]
    fn test_no_networks_is_unsupported() {
        assert_eq!(Listing::from_routes([]), Listing::Unsupported);
        assert_eq!(
            Listing::Unsupported.into_status("Test"),
            ExchangeStatus::unsupported("Test")
        );
    }

    #[derive(Debug, Deserialize)]
    struct Flags {
        #[serde(default, deserialize_with = "lenient_flag")]
        open: bool,
    }

    #[test]
    fn test_lenient_flag_values() {
        let read = |v: Value| serde_json::from_value::<Flags>(serde_json::json!({ "open": v })).unwrap().open;

        assert!(read(serde_json::json!(true)));
        assert!(read(serde_json::json!("true")));
        assert!(read(serde_json::json!("1")));
        assert!(read(serde_json::json!(1)));
        assert!(!read(serde_json::json!(false)));
        assert!(!read(serde_json::json!("0")));
        assert!(!read(Value::Null));
        assert!(!read(serde_json::json!(2)));
        assert!(!read(serde_json::json!({"nested": true})));
        assert!(!serde_json::from_value::<Flags>(serde_json::json!({})).unwrap().open);
    }

    #[test]
    fn test_find_record_skips_other_records() {
        let records = vec![
            serde_json::json!({"coin": 42, "open": "garbage"}),
            serde_json::json!({"open": true}),
            serde_json::json!({"coin": "btc", "open": "true"}),
        ];

        let found: Option<Flags> = find_record(records.clone(), "coin", "BTC").unwrap();
        assert!(found.unwrap().open);

        let missing: Option<Flags> = find_record(records, "coin", "ETH").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_default_adapters_names() {
        let transport = Arc::new(StubTransport::always(StubReply::Hang));
        let fetcher = ResilientFetcher::new(transport, Duration::from_secs(10));
        let names: Vec<String> = default_adapters(&fetcher, RetryPolicy::default())
            .iter()
            .map(|a| a.name().to_string())
            .collect();

        assert_eq!(names, ["Gate.io", "Binance", "OKX", "Bybit", "Bitget", "MEXC"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_parse_failure_is_error_without_retry() {
        let transport = Arc::new(StubTransport::always(StubReply::Json(serde_json::json!({}))));
        let fetcher = ResilientFetcher::new(transport.clone(), Duration::from_secs(10));

        let status = query_listing(&fetcher, "Test", "http://stub", RetryPolicy::default(), "BTC", |body| {
            serde_json::from_value::<Vec<String>>(body).map(|_| Listing::Unsupported)
        })
        .await;

        assert_eq!(status, ExchangeStatus::error("Test"));
        assert_eq!(transport.call_count(), 1);
    }
}
