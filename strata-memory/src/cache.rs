//! In-memory TTL cache.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use strata_core::error::Result;
use strata_core::{
    deadline_after, BackendOptions, CacheBackend, Clock, KeyMaker, SystemClock, Timeout,
};

/// Cache entry with its resolved lifetime.
#[derive(Clone)]
struct CacheEntry<V> {
    value: V,
    /// `None` never expires.
    expire_at: Option<DateTime<Utc>>,
    /// Lifetime the entry was written with, after resolving the default.
    ttl: Timeout,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expire_at.is_some_and(|at| now >= at)
    }
}

/// Cache configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryCacheConfig {
    /// Timeout and key options
    pub options: BackendOptions,
}

impl MemoryCacheConfig {
    /// Creates a config with the given default timeout.
    pub fn with_default_timeout(seconds: u64) -> Self {
        Self {
            options: BackendOptions::default().with_default_timeout(seconds),
        }
    }
}

/// In-memory cache backend.
///
/// Thread-safe and supports TTL-based expiration. A `Seconds` timeout of zero
/// or less stores an entry that is already expired; `Forever` never expires.
pub struct MemoryCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    config: MemoryCacheConfig,
    keys: KeyMaker,
    clock: Arc<dyn Clock>,
}

impl<V: Clone + Send + Sync> MemoryCache<V> {
    /// Creates a new cache with default configuration.
    pub fn new() -> Self {
        Self::with_config(MemoryCacheConfig::default())
    }

    /// Creates a cache with custom configuration.
    pub fn with_config(config: MemoryCacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Creates a cache that reads time from `clock`.
    pub fn with_clock(config: MemoryCacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            keys: config.options.key_maker(),
            config,
            clock,
        }
    }

    /// The configuration this cache was built with.
    pub fn config(&self) -> &MemoryCacheConfig {
        &self.config
    }

    fn resolve(&self, timeout: Timeout) -> (Option<DateTime<Utc>>, Timeout) {
        let ttl = timeout.or_default_secs(self.config.options.default_timeout);
        let expire_at = match ttl {
            Timeout::Seconds(secs) => Some(deadline_after(self.clock.now(), secs)),
            Timeout::Forever | Timeout::Default => None,
        };
        (expire_at, ttl)
    }

    fn entry(&self, value: V, timeout: Timeout) -> CacheEntry<V> {
        let (expire_at, ttl) = self.resolve(timeout);
        CacheEntry { value, expire_at, ttl }
    }

    /// Returns true if an entry is stored under the key, expired or not.
    pub fn contains_entry(&self, key: &str, version: Option<u32>) -> Result<bool> {
        let key = self.keys.cache_key(key, version)?;
        Ok(self.entries.read().contains_key(&key))
    }

    /// Returns the lifetime an entry was written with.
    ///
    /// `Default` never comes back: it is resolved before the entry is stored.
    pub fn ttl_of(&self, key: &str, version: Option<u32>) -> Result<Option<Timeout>> {
        let key = self.keys.cache_key(key, version)?;
        Ok(self.entries.read().get(&key).map(|e| e.ttl))
    }

    /// Removes all expired entries.
    pub fn cleanup_expired(&self) {
        let now = self.clock.now();
        self.entries.write().retain(|_, e| !e.is_expired(now));
    }

    /// Returns the number of stored entries, including expired ones.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        let now = self.clock.now();
        let entries = self.entries.read();
        let expired = entries.values().filter(|e| e.is_expired(now)).count();
        CacheStats {
            total_entries: entries.len(),
            expired_entries: expired,
            valid_entries: entries.len().saturating_sub(expired),
        }
    }
}

impl<V: Clone + Send + Sync> Default for MemoryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone + Send + Sync> CacheBackend<V> for MemoryCache<V> {
    fn get(&self, key: &str, version: Option<u32>) -> Result<Option<V>> {
        let key = self.keys.cache_key(key, version)?;
        let now = self.clock.now();
        let entries = self.entries.read();
        Ok(entries
            .get(&key)
            .filter(|e| !e.is_expired(now))
            .map(|e| e.value.clone()))
    }

    fn set(&self, key: &str, value: V, timeout: Timeout, version: Option<u32>) -> Result<()> {
        let key = self.keys.cache_key(key, version)?;
        let entry = self.entry(value, timeout);
        self.entries.write().insert(key, entry);
        Ok(())
    }

    fn delete(&self, key: &str, version: Option<u32>) -> Result<()> {
        let key = self.keys.cache_key(key, version)?;
        self.entries.write().remove(&key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.entries.write().clear();
        Ok(())
    }

    fn add(&self, key: &str, value: V, timeout: Timeout, version: Option<u32>) -> Result<bool> {
        let key = self.keys.cache_key(key, version)?;
        let now = self.clock.now();
        let mut entries = self.entries.write();
        if entries.get(&key).is_some_and(|e| !e.is_expired(now)) {
            debug!(key = %key, "Add skipped, key holds a live value");
            return Ok(false);
        }
        entries.insert(key, self.entry(value, timeout));
        Ok(true)
    }
}

/// Cache statistics.
#[derive(Clone, Debug)]
pub struct CacheStats {
    /// Entries stored, expired or not
    pub total_entries: usize,
    /// Entries past their expiry but not yet removed
    pub expired_entries: usize,
    /// Entries still readable
    pub valid_entries: usize,
}
