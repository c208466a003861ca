//! Client configuration.

use serde::{Deserialize, Serialize};
use shelfmate_types::{Failure, StorageFailure, ValidationFailure};
use std::fs;
use std::path::Path;
use validator::Validate;

use crate::paths::CONFIG_FILE;

/// Configuration for retry behavior on transient errors of idempotent reads.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of retry attempts.
    #[validate(range(max = 10_u32))]
    pub max_retries: u32,
    /// Initial delay between retries in milliseconds.
    pub base_delay_ms: u64,
    /// Maximum delay between retries in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_retries: 3, base_delay_ms: 500, max_delay_ms: 30_000 }
    }
}

impl RetryConfig {
    /// Delay before retry number `attempt` (1-based), doubling up to the cap.
    pub fn delay_for(&self, attempt: u32) -> u64 {
        let factor = 1_u64.checked_shl(attempt.saturating_sub(1)).unwrap_or(u64::MAX);
        self.base_delay_ms.saturating_mul(factor).min(self.max_delay_ms)
    }
}

/// Configuration for the Shelfmate client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the Shelfmate API, without trailing slash.
    #[validate(url(message = "must be a valid URL"))]
    pub base_url: String,
    /// Request timeout in seconds.
    #[validate(range(min = 1_u64, max = 600_u64))]
    pub timeout_secs: u64,
    /// Refresh the access token when it expires within this many seconds.
    pub refresh_skew_secs: i64,
    /// Lifetime of cached catalogue responses; 0 disables the cache.
    pub cache_ttl_secs: u64,
    /// Retry configuration for transient errors.
    #[validate(nested)]
    pub retry: RetryConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.shelfmate.app/v1".to_string(),
            timeout_secs: 30,
            refresh_skew_secs: 30,
            cache_ttl_secs: 3600,
            retry: RetryConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Config pointing at `base_url` with all other values defaulted.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Self::default() }
    }

    /// Load `config.json` from `data_dir` if present, then apply
    /// `SHELFMATE_API_URL` and `SHELFMATE_TIMEOUT_SECS` overrides.
    pub fn load(data_dir: &Path) -> Result<Self, Failure> {
        let config_path = data_dir.join(CONFIG_FILE);
        let mut config = if config_path.exists() {
            let content = fs::read_to_string(&config_path).map_err(StorageFailure::from)?;
            serde_json::from_str(&content).map_err(|e| StorageFailure::Corrupted {
                key: CONFIG_FILE.to_string(),
                message: e.to_string(),
            })?
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var("SHELFMATE_API_URL") {
            config.base_url = url;
        }
        if let Ok(raw) = std::env::var("SHELFMATE_TIMEOUT_SECS") {
            config.timeout_secs = raw.parse().map_err(|_| {
                ValidationFailure::field("SHELFMATE_TIMEOUT_SECS", "must be a number of seconds")
            })?;
        }

        config.normalize();
        config.validate()?;
        tracing::debug!("Loaded client config for {}", config.base_url);
        Ok(config)
    }

    /// Write the config to `data_dir/config.json` atomically.
    pub fn save(&self, data_dir: &Path) -> Result<(), Failure> {
        let config_path = data_dir.join(CONFIG_FILE);
        let temp_path = data_dir.join(format!("{}.tmp", CONFIG_FILE));
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| Failure::unknown(format!("Failed to serialize config: {}", e)))?;

        fs::write(&temp_path, content).map_err(StorageFailure::from)?;
        fs::rename(&temp_path, &config_path).map_err(StorageFailure::from)?;
        Ok(())
    }

    fn normalize(&mut self) {
        while self.base_url.ends_with('/') {
            let _ = self.base_url.pop();
        }
    }
}
