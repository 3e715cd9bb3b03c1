//! Options shared by every backend.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_KEY_VERSION, DEFAULT_TIMEOUT_SECONDS};
use crate::error::{Result, StrataError};
use crate::types::KeyMaker;

/// Options every backend understands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendOptions {
    /// Lifetime in seconds used when a write does not give one.
    pub default_timeout: u64,
    /// Prefix folded into every key.
    pub key_prefix: String,
    /// Key version used when a call does not give one.
    pub version: u32,
}

impl Default for BackendOptions {
    fn default() -> Self {
        Self {
            default_timeout: DEFAULT_TIMEOUT_SECONDS,
            key_prefix: String::new(),
            version: DEFAULT_KEY_VERSION,
        }
    }
}

impl BackendOptions {
    /// Sets the default timeout.
    pub fn with_default_timeout(mut self, seconds: u64) -> Self {
        self.default_timeout = seconds;
        self
    }

    /// Sets the key prefix.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Builds the key maker described by these options.
    pub fn key_maker(&self) -> KeyMaker {
        KeyMaker::new(self.key_prefix.clone(), self.version)
    }

    /// Checks the options for values no backend can honor.
    pub fn validate(&self) -> Result<()> {
        if self.default_timeout == 0 {
            return Err(StrataError::ConfigError(
                "default_timeout must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
