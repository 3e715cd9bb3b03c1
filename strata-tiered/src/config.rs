//! Tiered cache configuration.

use serde::{Deserialize, Serialize};

use strata_core::error::{Result, StrataError};
use strata_core::{
    DEFAULT_FAST_CACHE_TIMEOUT_SECONDS, DEFAULT_TIMEOUT_SECONDS, FAST_CACHE_TIMEOUT_WARN_SECONDS,
};

/// Tiered cache configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TieredCacheConfig {
    /// Registry identifier of the fast tier
    pub fast_cache: String,
    /// Registry identifier of the slow tier
    pub slow_cache: String,
    /// Ceiling in seconds for fast-tier writes
    pub fast_cache_timeout: u64,
    /// Slow-tier lifetime in seconds when a write does not give one
    pub default_timeout: u64,
}

impl Default for TieredCacheConfig {
    fn default() -> Self {
        Self {
            fast_cache: String::new(),
            slow_cache: String::new(),
            fast_cache_timeout: DEFAULT_FAST_CACHE_TIMEOUT_SECONDS,
            default_timeout: DEFAULT_TIMEOUT_SECONDS,
        }
    }
}

impl TieredCacheConfig {
    /// Creates a config for the given tiers with default timeouts.
    pub fn new(fast_cache: impl Into<String>, slow_cache: impl Into<String>) -> Self {
        Self {
            fast_cache: fast_cache.into(),
            slow_cache: slow_cache.into(),
            ..Default::default()
        }
    }

    /// Sets the fast-tier ceiling.
    pub fn with_fast_cache_timeout(mut self, seconds: u64) -> Self {
        self.fast_cache_timeout = seconds;
        self
    }

    /// Sets the default slow-tier timeout.
    pub fn with_default_timeout(mut self, seconds: u64) -> Self {
        self.default_timeout = seconds;
        self
    }

    /// Returns true if the fast-tier ceiling is long enough to serve values
    /// the slow tier has already dropped.
    pub fn fast_cache_timeout_too_long(&self) -> bool {
        self.fast_cache_timeout > FAST_CACHE_TIMEOUT_WARN_SECONDS
    }

    /// Parses and validates a JSON configuration. Missing timeouts keep
    /// their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.fast_cache.trim().is_empty() {
            return Err(StrataError::ConfigError("fast_cache cannot be empty".into()));
        }
        if self.slow_cache.trim().is_empty() {
            return Err(StrataError::ConfigError("slow_cache cannot be empty".into()));
        }
        if self.fast_cache == self.slow_cache {
            return Err(StrataError::ConfigError(format!(
                "fast_cache and slow_cache both name '{}'",
                self.fast_cache
            )));
        }
        if self.fast_cache_timeout == 0 {
            return Err(StrataError::ConfigError(
                "fast_cache_timeout must be greater than zero".into(),
            ));
        }
        if self.default_timeout == 0 {
            return Err(StrataError::ConfigError(
                "default_timeout must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
