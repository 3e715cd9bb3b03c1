//! Cache key construction and validation.
//!
//! Every backend turns a caller's raw key into a namespaced key with a
//! [`KeyMaker`]: a prefix and a version are folded in by a key function, and
//! the result is validated before it touches storage.

use std::fmt;
use std::sync::Arc;

use crate::constants::{DEFAULT_KEY_VERSION, MAX_KEY_LENGTH};
use crate::error::{Result, StrataError};

/// Builds a full key from `(prefix, raw_key, version)`.
pub type KeyFunction = Arc<dyn Fn(&str, &str, u32) -> String + Send + Sync>;

/// The default key function: `"{prefix}:{version}:{key}"`.
pub fn default_key_func(prefix: &str, key: &str, version: u32) -> String {
    format!("{prefix}:{version}:{key}")
}

/// Namespaces and validates cache keys for one backend instance.
#[derive(Clone)]
pub struct KeyMaker {
    prefix: String,
    version: u32,
    key_func: KeyFunction,
}

impl KeyMaker {
    /// Creates a key maker using [`default_key_func`].
    pub fn new(prefix: impl Into<String>, version: u32) -> Self {
        Self {
            prefix: prefix.into(),
            version,
            key_func: Arc::new(default_key_func),
        }
    }

    /// Replaces the key function.
    pub fn with_key_func<F>(mut self, key_func: F) -> Self
    where
        F: Fn(&str, &str, u32) -> String + Send + Sync + 'static,
    {
        self.key_func = Arc::new(key_func);
        self
    }

    /// The configured prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The version used when a call does not name one.
    pub fn default_version(&self) -> u32 {
        self.version
    }

    /// Builds the namespaced key without validating it.
    pub fn make_key(&self, key: &str, version: Option<u32>) -> String {
        (self.key_func)(&self.prefix, key, version.unwrap_or(self.version))
    }

    /// Checks that a constructed key is storable.
    ///
    /// Keys longer than [`MAX_KEY_LENGTH`] or containing spaces or ASCII
    /// control characters are rejected.
    pub fn validate_key(&self, key: &str) -> Result<()> {
        if key.chars().count() > MAX_KEY_LENGTH {
            return Err(StrataError::invalid_key(
                key,
                format!("longer than {MAX_KEY_LENGTH} characters"),
            ));
        }
        if let Some(bad) = key.chars().find(|c| (*c as u32) < 33 || *c as u32 == 127) {
            return Err(StrataError::invalid_key(
                key,
                format!("contains disallowed character {bad:?}"),
            ));
        }
        Ok(())
    }

    /// Builds and validates the key used by every cache operation.
    pub fn cache_key(&self, key: &str, version: Option<u32>) -> Result<String> {
        let key = self.make_key(key, version);
        self.validate_key(&key)?;
        Ok(key)
    }
}

impl Default for KeyMaker {
    fn default() -> Self {
        Self::new("", DEFAULT_KEY_VERSION)
    }
}

impl fmt::Debug for KeyMaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaker")
            .field("prefix", &self.prefix)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}
