//! Mock Exchanges
//!
//! For testing and demo purposes. [`MockAdapter`] answers from a static
//! table; [`StubTransport`] replays canned HTTP outcomes underneath a real
//! adapter.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::time::Instant;

use super::ExchangeAdapter;
use crate::error::FetchError;
use crate::fetch::HttpTransport;
use crate::model::{ChannelState, ExchangeStatus};

/// Mock exchange adapter with static statuses
pub struct MockAdapter {
    name: String,
    statuses: HashMap<String, (ChannelState, ChannelState)>,
    /// Returned for symbols not in the table
    fallback: (ChannelState, ChannelState),
    delay: Duration,
    calls: Mutex<Vec<(String, Instant)>>,
}

impl MockAdapter {
    /// Every unknown symbol is unsupported
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            statuses: HashMap::new(),
            fallback: (ChannelState::Unsupported, ChannelState::Unsupported),
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every symbol is open for both directions
    pub fn all_open(name: impl Into<String>) -> Self {
        Self::new(name).with_fallback(ChannelState::Open, ChannelState::Open)
    }

    /// Every symbol reports `error`, as if the exchange were down
    pub fn failing(name: impl Into<String>) -> Self {
        Self::new(name).with_fallback(ChannelState::Error, ChannelState::Error)
    }

    #[must_use]
    pub fn with_status(mut self, symbol: &str, deposit: ChannelState, withdraw: ChannelState) -> Self {
        self.statuses.insert(symbol.to_uppercase(), (deposit, withdraw));
        self
    }

    #[must_use]
    pub const fn with_fallback(mut self, deposit: ChannelState, withdraw: ChannelState) -> Self {
        self.fallback = (deposit, withdraw);
        self
    }

    /// Simulated response latency
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Symbols queried so far, with the (tokio) time of each call
    pub fn calls(&self) -> Vec<(String, Instant)> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[async_trait]
impl ExchangeAdapter for MockAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    async fn fetch_status(&self, symbol: &str) -> ExchangeStatus {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((symbol.to_uppercase(), Instant::now()));

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let (deposit, withdraw) = self
            .statuses
            .get(&symbol.to_uppercase())
            .copied()
            .unwrap_or(self.fallback);

        ExchangeStatus::new(self.name.clone(), deposit, withdraw)
    }
}

/// One canned transport outcome
#[derive(Clone, Debug)]
pub enum StubReply {
    Json(Value),
    Fail(FetchError),
    /// Never completes; only the caller's timeout ends it
    Hang,
}

/// Transport replaying scripted replies in order
///
/// Once the script runs out, the last reply repeats. An empty script hangs.
pub struct StubTransport {
    replies: Mutex<Vec<StubReply>>,
    log: Mutex<Vec<(String, Instant)>>,
}

impl StubTransport {
    pub fn sequence(replies: Vec<StubReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().rev().collect()),
            log: Mutex::new(Vec::new()),
        }
    }

    pub fn always(reply: StubReply) -> Self {
        Self::sequence(vec![reply])
    }

    pub fn call_count(&self) -> usize {
        self.log.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Time each request started
    pub fn call_times(&self) -> Vec<Instant> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, at)| *at)
            .collect()
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }

    fn next_reply(&self) -> StubReply {
        let mut replies = self.replies.lock().unwrap_or_else(PoisonError::into_inner);
        if replies.len() > 1 {
            replies.pop().unwrap_or(StubReply::Hang)
        } else {
            replies.last().cloned().unwrap_or(StubReply::Hang)
        }
    }
}

#[async_trait]
impl HttpTransport for StubTransport {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        self.log
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((url.to_string(), Instant::now()));

        match self.next_reply() {
            StubReply::Json(body) => Ok(body),
            StubReply::Fail(err) => Err(err),
            StubReply::Hang => std::future::pending().await,
        }
    }
}
