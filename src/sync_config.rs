//! # Remote Sync Configuration
//!
//! Configuration for pushing account snapshots to the remote document store.
//! Settings come from the environment so deployments can point at different
//! backends without a rebuild.

use std::env;

/// Environment variable naming the document-store endpoint.
pub const SYNC_ENDPOINT_VAR: &str = "SYNC_ENDPOINT";
/// Environment variable holding the bearer token for the endpoint.
pub const SYNC_API_KEY_VAR: &str = "SYNC_API_KEY";

/// Recovery configuration for error handling
#[derive(Debug, Clone)]
pub struct RecoveryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Base delay between retries in milliseconds
    pub base_retry_delay_ms: u64,
    /// Maximum delay between retries in milliseconds
    pub max_retry_delay_ms: u64,
    /// Timeout for one sync request in seconds
    pub operation_timeout_secs: u64,
    /// Circuit breaker failure threshold
    pub circuit_breaker_threshold: u32,
    /// Circuit breaker reset timeout in seconds
    pub circuit_breaker_reset_secs: u64,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_retry_delay_ms: 1000,  // 1 second
            max_retry_delay_ms: 10000,  // 10 seconds
            operation_timeout_secs: 30, // 30 seconds
            circuit_breaker_threshold: 5,
            circuit_breaker_reset_secs: 60, // 1 minute
        }
    }
}

/// Configuration for the remote snapshot sync client
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Base URL of the document store (e.g. "https://store.example.com/v1")
    pub endpoint: String,
    /// Optional bearer token sent with every request
    pub api_key: Option<String>,
    /// Retry and circuit breaker settings
    pub recovery: RecoveryConfig,
}

impl SyncConfig {
    /// Build a config for the given endpoint with default recovery settings.
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key: None,
            recovery: RecoveryConfig::default(),
        }
    }

    /// Attach a bearer token.
    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    /// Read the sync configuration from the environment.
    ///
    /// Returns `None` when no endpoint is configured; sync is an optional
    /// layer and the rest of the app runs without it.
    pub fn from_env() -> Option<Self> {
        let endpoint = env::var(SYNC_ENDPOINT_VAR).ok()?;
        if endpoint.trim().is_empty() {
            return None;
        }

        let mut config = Self::new(&endpoint);
        if let Ok(api_key) = env::var(SYNC_API_KEY_VAR) {
            if !api_key.is_empty() {
                config.api_key = Some(api_key);
            }
        }
        Some(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovery_defaults() {
        let config = RecoveryConfig::default();
        assert_eq!(config.max_retries, 3);
        assert!(config.base_retry_delay_ms <= config.max_retry_delay_ms);
    }

    #[test]
    fn test_endpoint_trailing_slash_is_trimmed() {
        let config = SyncConfig::new("https://store.example.com/v1/");
        assert_eq!(config.endpoint, "https://store.example.com/v1");
    }

    #[test]
    fn test_with_api_key() {
        let config = SyncConfig::new("https://store.example.com").with_api_key("secret");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
    }
}
