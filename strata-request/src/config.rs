//! Request-scoped cache configuration.

use serde::{Deserialize, Serialize};

use strata_core::error::{Result, StrataError};
use strata_core::{BackendOptions, DEFAULT_STORAGE_ATTRIBUTE};

/// Request-scoped cache configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestCacheConfig {
    /// Attribute on the request context that holds the mapping
    pub storage_attribute: String,
    /// Ceiling for entry lifetimes in seconds; falls back to the default timeout
    pub max_timeout: Option<u64>,
    /// Timeout and key options
    pub options: BackendOptions,
}

impl Default for RequestCacheConfig {
    fn default() -> Self {
        Self {
            storage_attribute: DEFAULT_STORAGE_ATTRIBUTE.into(),
            max_timeout: None,
            options: BackendOptions::default(),
        }
    }
}

impl RequestCacheConfig {
    /// Sets the storage attribute.
    pub fn with_storage_attribute(mut self, name: impl Into<String>) -> Self {
        self.storage_attribute = name.into();
        self
    }

    /// Sets the lifetime ceiling.
    pub fn with_max_timeout(mut self, seconds: u64) -> Self {
        self.max_timeout = Some(seconds);
        self
    }

    /// Sets the default timeout.
    pub fn with_default_timeout(mut self, seconds: u64) -> Self {
        self.options.default_timeout = seconds;
        self
    }

    /// The ceiling actually applied to writes.
    pub fn effective_max_timeout(&self) -> u64 {
        self.max_timeout.unwrap_or(self.options.default_timeout)
    }

    /// Parses and validates a JSON configuration. Missing fields keep their
    /// defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.storage_attribute.trim().is_empty() {
            return Err(StrataError::ConfigError(
                "storage_attribute cannot be empty".into(),
            ));
        }
        if self.max_timeout == Some(0) {
            return Err(StrataError::ConfigError(
                "max_timeout must be greater than zero".into(),
            ));
        }
        self.options.validate()
    }
}
