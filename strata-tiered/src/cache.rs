//! Two-tier cache backend.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use strata_core::error::Result;
use strata_core::registry::SharedBackend;
use strata_core::{CacheBackend, CacheRegistry, Timeout};

use crate::config::TieredCacheConfig;

/// Cache that fronts a slow backend with a fast, short-lived one.
///
/// Both tiers are looked up by identifier in the registry on every call, so an
/// unknown identifier surfaces as [`StrataError::UnknownBackend`] on first use.
///
/// The slow tier is the source of truth: `add` asks only the slow tier whether
/// the key exists. The fast tier may briefly disagree with it, bounded by the
/// fast-tier ceiling.
///
/// [`StrataError::UnknownBackend`]: strata_core::StrataError::UnknownBackend
pub struct TieredCache<V> {
    config: TieredCacheConfig,
    registry: Arc<CacheRegistry<V>>,
}

impl<V: Clone + Send + Sync> TieredCache<V> {
    /// Creates a tiered cache over backends held by `registry`.
    pub fn new(config: TieredCacheConfig, registry: Arc<CacheRegistry<V>>) -> Self {
        if config.fast_cache_timeout_too_long() {
            warn!(
                fast_cache_timeout = config.fast_cache_timeout,
                "fast_cache_timeout should be low; \
                 the fast tier cannot tell when the slow tier drops a value"
            );
        }
        Self { config, registry }
    }

    /// The configuration this cache was built with.
    pub fn config(&self) -> &TieredCacheConfig {
        &self.config
    }

    /// Resolves the fast tier.
    pub fn fast_cache(&self) -> Result<SharedBackend<V>> {
        self.registry.get(&self.config.fast_cache)
    }

    /// Resolves the slow tier.
    pub fn slow_cache(&self) -> Result<SharedBackend<V>> {
        self.registry.get(&self.config.slow_cache)
    }

    /// Writes to the fast tier only, capping the timeout at the ceiling.
    ///
    /// The default sentinel and `Forever` both become the ceiling.
    pub fn fast_cache_set(
        &self,
        key: &str,
        value: V,
        timeout: Timeout,
        version: Option<u32>,
    ) -> Result<()> {
        let timeout = timeout.capped_at(self.config.fast_cache_timeout);
        self.fast_cache()?.set(key, value, timeout, version)
    }

    fn slow_timeout(&self, timeout: Timeout) -> Timeout {
        timeout.or_default_secs(self.config.default_timeout)
    }
}

impl<V: Clone + Send + Sync> CacheBackend<V> for TieredCache<V> {
    #[instrument(level = "debug", skip(self))]
    fn get(&self, key: &str, version: Option<u32>) -> Result<Option<V>> {
        if let Some(value) = self.fast_cache()?.get(key, version)? {
            debug!(key, "Fast tier hit");
            return Ok(Some(value));
        }

        match self.slow_cache()?.get(key, version)? {
            Some(value) => {
                debug!(key, "Slow tier hit, warming fast tier");
                self.fast_cache_set(key, value.clone(), Timeout::Default, version)?;
                Ok(Some(value))
            }
            None => {
                debug!(key, "Miss on both tiers");
                Ok(None)
            }
        }
    }

    #[instrument(level = "debug", skip(self, value))]
    fn set(&self, key: &str, value: V, timeout: Timeout, version: Option<u32>) -> Result<()> {
        let timeout = self.slow_timeout(timeout);
        self.slow_cache()?.set(key, value.clone(), timeout, version)?;
        self.fast_cache_set(key, value, timeout, version)
    }

    fn delete(&self, key: &str, version: Option<u32>) -> Result<()> {
        self.fast_cache()?.delete(key, version)?;
        self.slow_cache()?.delete(key, version)
    }

    fn clear(&self) -> Result<()> {
        self.fast_cache()?.clear()?;
        self.slow_cache()?.clear()
    }

    #[instrument(level = "debug", skip(self, value))]
    fn add(&self, key: &str, value: V, timeout: Timeout, version: Option<u32>) -> Result<bool> {
        let timeout = self.slow_timeout(timeout);
        if !self.slow_cache()?.add(key, value.clone(), timeout, version)? {
            return Ok(false);
        }
        self.fast_cache_set(key, value, timeout, version)?;
        Ok(true)
    }
}
