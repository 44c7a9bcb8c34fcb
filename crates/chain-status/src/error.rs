//! Error Types for Chain Status

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StatusError>;

/// Aggregation-level errors.
///
/// Per-exchange failures never surface here; they are folded into
/// [`ExchangeStatus`](crate::model::ExchangeStatus) values by the adapters.
#[derive(Error, Debug)]
pub enum StatusError {
    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Duplicate exchange adapter: {0}")]
    DuplicateExchange(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl StatusError {
    /// Convert to a user-facing message for the HTTP error body
    pub fn user_message(&self) -> String {
        match self {
            Self::Catalog(msg) => format!("Asset catalog unavailable: {msg}"),
            Self::Config(msg) => format!("Service misconfigured: {msg}"),
            Self::DuplicateExchange(name) => format!("Exchange '{name}' is configured twice"),
            Self::Network(_) => "Could not initialise the exchange HTTP client".into(),
        }
    }
}

/// Failure marker returned by the resilient fetch wrapper.
///
/// Adapters translate this into an `error` status; the wrapper itself knows
/// nothing about exchange semantics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Attempt exceeded the per-call timeout
    #[error("request timed out after {0}ms")]
    Timeout(u128),

    /// Connection, TLS or body read failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-2xx HTTP status
    #[error("HTTP status {0}")]
    Status(u16),

    /// Body was not valid JSON
    #[error("malformed response: {0}")]
    Decode(String),
}

impl FetchError {
    /// Check if another attempt could succeed.
    ///
    /// A malformed body will not change shape between attempts.
    pub const fn is_retryable(&self) -> bool {
        !matches!(self, Self::Decode(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_is_not_retryable() {
        assert!(FetchError::Timeout(10_000).is_retryable());
        assert!(FetchError::Transport("reset".into()).is_retryable());
        assert!(FetchError::Status(503).is_retryable());
        assert!(!FetchError::Decode("eof".into()).is_retryable());
    }
}
