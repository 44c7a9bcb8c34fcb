//! Runtime Configuration
//!
//! All tunables come from environment variables with defaults matching the
//! production deployment.

use std::time::Duration;

use crate::error::{Result, StatusError};
use crate::fetch::RetryPolicy;

/// Orchestrator tunables
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregatorSettings {
    /// Assets processed concurrently per batch
    pub batch_size: usize,

    /// Unconditional pause between batches
    pub batch_pause: Duration,

    /// Overall cap on a run; `None` keeps only the per-call bounds
    pub deadline: Option<Duration>,
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        Self {
            batch_size: 5,
            batch_pause: Duration::from_millis(500),
            deadline: None,
        }
    }
}

/// Outbound request tunables
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchSettings {
    /// Hard bound on a single attempt
    pub request_timeout: Duration,

    /// Policy for adapters that opt in to retries
    pub retry: RetryPolicy,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        }
    }
}

/// HTTP cache directive for the status endpoint
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheSettings {
    pub max_age: Duration,
    pub stale_while_revalidate: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            max_age: Duration::from_secs(300),
            stale_while_revalidate: Duration::from_secs(600),
        }
    }
}

impl CacheSettings {
    pub fn header_value(&self) -> String {
        format!(
            "public, s-maxage={}, stale-while-revalidate={}",
            self.max_age.as_secs(),
            self.stale_while_revalidate.as_secs()
        )
    }
}

/// Full service configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusConfig {
    pub bind_addr: String,
    pub aggregator: AggregatorSettings,
    pub fetch: FetchSettings,
    pub cache: CacheSettings,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".into(),
            aggregator: AggregatorSettings::default(),
            fetch: FetchSettings::default(),
            cache: CacheSettings::default(),
        }
    }
}

impl StatusConfig {
    /// Load from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let bind_addr = lookup("BIND_ADDR").unwrap_or(defaults.bind_addr);

        let batch_size = parse_or(&lookup, "BATCH_SIZE", defaults.aggregator.batch_size)?;
        if batch_size == 0 {
            return Err(StatusError::Config("BATCH_SIZE must be at least 1".into()));
        }

        let deadline = parse::<u64, _>(&lookup, "AGGREGATE_DEADLINE_SECS")?.map(Duration::from_secs);
        if deadline.is_some_and(|d| d.is_zero()) {
            return Err(StatusError::Config("AGGREGATE_DEADLINE_SECS must be at least 1".into()));
        }

        let aggregator = AggregatorSettings {
            batch_size,
            batch_pause: millis_or(&lookup, "BATCH_PAUSE_MS", defaults.aggregator.batch_pause)?,
            deadline,
        };

        let max_attempts = parse_or(&lookup, "RETRY_ATTEMPTS", defaults.fetch.retry.max_attempts)?;
        if max_attempts == 0 {
            return Err(StatusError::Config("RETRY_ATTEMPTS must be at least 1".into()));
        }

        let request_timeout = secs_or(&lookup, "REQUEST_TIMEOUT_SECS", defaults.fetch.request_timeout)?;
        if request_timeout.is_zero() {
            return Err(StatusError::Config("REQUEST_TIMEOUT_SECS must be at least 1".into()));
        }

        let fetch = FetchSettings {
            request_timeout,
            retry: RetryPolicy {
                max_attempts,
                backoff_step: millis_or(&lookup, "RETRY_BACKOFF_MS", defaults.fetch.retry.backoff_step)?,
            },
        };

        let cache = CacheSettings {
            max_age: secs_or(&lookup, "CACHE_MAX_AGE_SECS", defaults.cache.max_age)?,
            stale_while_revalidate: secs_or(
                &lookup,
                "CACHE_STALE_SECS",
                defaults.cache.stale_while_revalidate,
            )?,
        };

        Ok(Self {
            bind_addr,
            aggregator,
            fetch,
            cache,
        })
    }
}

fn parse<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| StatusError::Config(format!("{key} has invalid value '{raw}'")))
        })
        .transpose()
}

fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    Ok(parse(lookup, key)?.unwrap_or(default))
}

fn millis_or<F>(lookup: &F, key: &str, default: Duration) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    Ok(parse(lookup, key)?.map_or(default, Duration::from_millis))
}

fn secs_or<F>(lookup: &F, key: &str, default: Duration) -> Result<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    Ok(parse(lookup, key)?.map_or(default, Duration::from_secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StatusConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config, StatusConfig::default());
        assert_eq!(config.aggregator.batch_size, 5);
        assert_eq!(config.aggregator.batch_pause, Duration::from_millis(500));
        assert_eq!(config.aggregator.deadline, None);
        assert_eq!(config.fetch.request_timeout, Duration::from_secs(10));
        assert_eq!(config.fetch.retry.max_attempts, 3);
        assert_eq!(
            config.cache.header_value(),
            "public, s-maxage=300, stale-while-revalidate=600"
        );
    }

    #[test]
    fn test_overrides() {
        let config = StatusConfig::from_lookup(lookup_from(&[
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("BATCH_SIZE", "10"),
            ("BATCH_PAUSE_MS", "250"),
            ("AGGREGATE_DEADLINE_SECS", "45"),
            ("RETRY_ATTEMPTS", "2"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.aggregator.batch_size, 10);
        assert_eq!(config.aggregator.batch_pause, Duration::from_millis(250));
        assert_eq!(config.aggregator.deadline, Some(Duration::from_secs(45)));
        assert_eq!(config.fetch.retry.max_attempts, 2);
    }

    #[test]
    fn test_invalid_values() {
        let result = StatusConfig::from_lookup(lookup_from(&[("BATCH_SIZE", "five")]));
        assert!(matches!(result, Err(StatusError::Config(_))));

        let result = StatusConfig::from_lookup(lookup_from(&[("BATCH_SIZE", "0")]));
        assert!(matches!(result, Err(StatusError::Config(_))));

        let result = StatusConfig::from_lookup(lookup_from(&[("RETRY_ATTEMPTS", "0")]));
        assert!(matches!(result, Err(StatusError::Config(_))));

        let result = StatusConfig::from_lookup(lookup_from(&[("REQUEST_TIMEOUT_SECS", "0")]));
        assert!(matches!(result, Err(StatusError::Config(_))));

        let result = StatusConfig::from_lookup(lookup_from(&[("AGGREGATE_DEADLINE_SECS", "0")]));
        assert!(matches!(result, Err(StatusError::Config(_))));
    }

    #[test]
    fn test_huge_deadline_is_accepted() {
        let max = u64::MAX.to_string();
        let config = StatusConfig::from_lookup(lookup_from(&[("AGGREGATE_DEADLINE_SECS", max.as_str())])).unwrap();

        assert_eq!(config.aggregator.deadline, Some(Duration::from_secs(u64::MAX)));
    }
}
