//! Resilient Fetch
//!
//! Wraps every outbound exchange request with a per-attempt timeout and
//! bounded retries with linear backoff. Failures come back as a
//! [`FetchError`] value for the calling adapter to translate; nothing here
//! knows about exchange semantics.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::{FetchError, Result};

/// How many times to try a request and how long to wait in between
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,

    /// Sleep after failed attempt `n` is `n * backoff_step`
    pub backoff_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_step: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// One attempt, failure is terminal
    pub const fn single() -> Self {
        Self {
            max_attempts: 1,
            backoff_step: Duration::ZERO,
        }
    }

    /// Delay before the attempt following failed attempt `attempt` (1-based)
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.backoff_step * attempt
    }
}

/// Who a request is for, carried into log lines
#[derive(Clone, Copy, Debug)]
pub struct FetchContext<'a> {
    pub exchange: &'a str,
    pub symbol: &'a str,
}

/// Single GET returning parsed JSON (Strategy pattern)
///
/// Production uses [`ReqwestTransport`]; tests inject stubs.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get_json(&self, url: &str) -> std::result::Result<Value, FetchError>;
}

/// `reqwest`-backed transport sharing one connection pool
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get_json(&self, url: &str) -> std::result::Result<Value, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))
    }
}

/// Timeout + retry wrapper around a transport
#[derive(Clone)]
pub struct ResilientFetcher {
    transport: Arc<dyn HttpTransport>,
    timeout: Duration,
}

impl ResilientFetcher {
    pub fn new(transport: Arc<dyn HttpTransport>, timeout: Duration) -> Self {
        Self { transport, timeout }
    }

    /// GET `url` under `policy`, returning the parsed body or the last failure
    pub async fn fetch(
        &self,
        url: &str,
        policy: RetryPolicy,
        ctx: FetchContext<'_>,
    ) -> std::result::Result<Value, FetchError> {
        let attempts = policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            let outcome = match tokio::time::timeout(self.timeout, self.transport.get_json(url)).await {
                Ok(result) => result,
                Err(_) => Err(FetchError::Timeout(self.timeout.as_millis())),
            };

            let err = match outcome {
                Ok(body) => return Ok(body),
                Err(err) => err,
            };

            if !err.is_retryable() || attempt >= attempts {
                warn!(
                    exchange = ctx.exchange,
                    symbol = ctx.symbol,
                    attempt,
                    error = %err,
                    "Exchange request failed"
                );
                return Err(err);
            }

            let delay = policy.backoff(attempt);
            debug!(
                exchange = ctx.exchange,
                symbol = ctx.symbol,
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %err,
                "Retrying exchange request"
            );
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}
