//! The cache capability shared by every Strata backend.
//!
//! Backends implement the six required operations; the bulk helpers are
//! provided on top of them.

use std::collections::HashMap;

use crate::error::Result;
use crate::types::Timeout;

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE CAPABILITY
// ═══════════════════════════════════════════════════════════════════════════════

/// A key-value cache with per-entry timeouts and versioned keys.
///
/// Keys are raw caller keys; each backend namespaces and validates them
/// itself. Every operation may fail with [`StrataError::InvalidKey`] when the
/// constructed key is rejected.
///
/// Implementations might be:
/// - Request-scoped storage (lives as long as one request)
/// - In-process memory (lives as long as the process)
/// - A composition of other backends (tiered caching)
///
/// [`StrataError::InvalidKey`]: crate::error::StrataError::InvalidKey
pub trait CacheBackend<V>: Send + Sync {
    /// Fetches a live value, or `None` when the key is absent or expired.
    fn get(&self, key: &str, version: Option<u32>) -> Result<Option<V>>;

    /// Stores a value, replacing any previous one.
    fn set(&self, key: &str, value: V, timeout: Timeout, version: Option<u32>) -> Result<()>;

    /// Removes a key. Absent keys are not an error.
    fn delete(&self, key: &str, version: Option<u32>) -> Result<()>;

    /// Removes every entry.
    fn clear(&self) -> Result<()>;

    /// Stores a value only if the key holds no live value.
    ///
    /// Returns true if the value was stored.
    fn add(&self, key: &str, value: V, timeout: Timeout, version: Option<u32>) -> Result<bool>;

    /// Returns true if the key holds a live value.
    fn has_key(&self, key: &str, version: Option<u32>) -> Result<bool> {
        Ok(self.get(key, version)?.is_some())
    }

    /// Fetches a value, falling back to `default` on a miss.
    fn get_or(&self, key: &str, default: V, version: Option<u32>) -> Result<V> {
        Ok(self.get(key, version)?.unwrap_or(default))
    }

    /// Fetches a value, computing and storing it on a miss.
    fn get_or_set<F>(&self, key: &str, timeout: Timeout, version: Option<u32>, make: F) -> Result<V>
    where
        F: FnOnce() -> V,
        V: Clone,
        Self: Sized,
    {
        if let Some(value) = self.get(key, version)? {
            return Ok(value);
        }
        let value = make();
        self.add(key, value.clone(), timeout, version)?;
        // Another writer may have won the add; return whatever is stored now.
        Ok(self.get(key, version)?.unwrap_or(value))
    }

    /// Fetches several keys at once. Misses are left out of the result.
    fn get_many(&self, keys: &[&str], version: Option<u32>) -> Result<HashMap<String, V>> {
        let mut found = HashMap::with_capacity(keys.len());
        for key in keys {
            if let Some(value) = self.get(key, version)? {
                found.insert((*key).to_string(), value);
            }
        }
        Ok(found)
    }

    /// Stores several values with the same timeout.
    fn set_many(
        &self,
        entries: Vec<(String,
        V)>,
        timeout: Timeout,
        version: Option<u32>,
    ) -> Result<()> {
        for (key, value) in entries {
            self.set(&key, value, timeout, version)?;
        }
        Ok(())
    }

    /// Removes several keys.
    fn delete_many(&self, keys: &[&str], version: Option<u32>) -> Result<()> {
        for key in keys {
            self.delete(key, version)?;
        }
        Ok(())
    }
}
