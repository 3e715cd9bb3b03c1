//! Request-scoped cache backend.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use strata_core::error::Result;
use strata_core::{deadline_after, CacheBackend, CacheItem, Clock, KeyMaker, SystemClock, Timeout};

use crate::config::RequestCacheConfig;
use crate::context::{MappingHandle, RequestContext, RequestStore};

/// Cache whose entries live in the current request's context.
///
/// Entry lifetimes are clamped to the configured maximum so nothing is meant
/// to outlive the request holding it. Expired entries are treated as absent
/// but stay in the mapping until it is replaced or dropped.
///
/// Without a request context the cache still answers: reads miss, writes are
/// dropped, and every operation logs exactly one warning.
pub struct RequestScopedCache<V> {
    config: RequestCacheConfig,
    keys: KeyMaker,
    max_timeout: i64,
    store: RequestStore<V>,
    clock: Arc<dyn Clock>,
}

impl<V: Clone + Send + Sync> RequestScopedCache<V> {
    /// Creates a cache bound to `context`.
    pub fn new(config: RequestCacheConfig, context: Option<Arc<RequestContext<V>>>) -> Self {
        Self::with_clock(config, context, Arc::new(SystemClock))
    }

    /// Creates a cache that reads time from `clock`.
    pub fn with_clock(
        config: RequestCacheConfig,
        context: Option<Arc<RequestContext<V>>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let max_timeout = i64::try_from(config.effective_max_timeout()).unwrap_or(i64::MAX);
        Self {
            keys: config.options.key_maker(),
            store: RequestStore::new(context, config.storage_attribute.clone()),
            max_timeout,
            config,
            clock,
        }
    }

    /// Creates a cache with the same configuration bound to another request.
    pub fn bind(&self, context: Arc<RequestContext<V>>) -> Self {
        Self {
            config: self.config.clone(),
            keys: self.keys.clone(),
            max_timeout: self.max_timeout,
            store: RequestStore::new(Some(context), self.config.storage_attribute.clone()),
            clock: Arc::clone(&self.clock),
        }
    }

    /// Replaces the key maker, for example to install a custom key function.
    pub fn with_key_maker(mut self, keys: KeyMaker) -> Self {
        self.keys = keys;
        self
    }

    /// The configuration this cache was built with.
    pub fn config(&self) -> &RequestCacheConfig {
        &self.config
    }

    /// Returns true if a request context is bound.
    pub fn is_bound(&self) -> bool {
        self.store.is_bound()
    }

    /// Number of operations performed without a request context.
    pub fn missing_context_warnings(&self) -> u64 {
        self.store.missing_context_warnings()
    }

    /// Returns the mapping currently bound to the request.
    pub fn storage(&self) -> MappingHandle<V> {
        self.store.mapping()
    }

    /// Builds and validates the key used for storage.
    pub fn cache_key(&self, key: &str, version: Option<u32>) -> Result<String> {
        self.keys.cache_key(key, version)
    }

    /// Lifetime in seconds a write with `timeout` gets.
    ///
    /// The default sentinel uses the default timeout; non-positive values and
    /// `Forever` mean "as long as allowed". The result never exceeds the
    /// configured maximum.
    pub fn effective_timeout(&self, timeout: Timeout) -> i64 {
        let secs = match timeout {
            Timeout::Default => {
                i64::try_from(self.config.options.default_timeout).unwrap_or(i64::MAX)
            }
            Timeout::Seconds(secs) if secs <= 0 => self.max_timeout,
            Timeout::Seconds(secs) => secs,
            Timeout::Forever => self.max_timeout,
        };
        secs.min(self.max_timeout)
    }

    /// Absolute expiry for a write made now with `timeout`.
    pub fn backend_expiry(&self, timeout: Timeout) -> DateTime<Utc> {
        deadline_after(self.clock.now(), self.effective_timeout(timeout))
    }
}

impl<V: Clone + Send + Sync> CacheBackend<V> for RequestScopedCache<V> {
    fn get(&self, key: &str, version: Option<u32>) -> Result<Option<V>> {
        let key = self.cache_key(key, version)?;
        let now = self.clock.now();
        let mapping = self.store.mapping();
        let mapping = mapping.lock();
        Ok(mapping
            .get(&key)
            .filter(|item| item.is_live(now))
            .map(|item| item.value().clone()))
    }

    fn set(&self, key: &str, value: V, timeout: Timeout, version: Option<u32>) -> Result<()> {
        let key = self.cache_key(key, version)?;
        let item = CacheItem::new(value, self.backend_expiry(timeout));
        self.store.mapping().lock().insert(key, item);
        Ok(())
    }

    fn delete(&self, key: &str, version: Option<u32>) -> Result<()> {
        let key = self.cache_key(key, version)?;
        self.store.mapping().lock().remove(&key);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.store.reset();
        Ok(())
    }

    fn add(&self, key: &str, value: V, timeout: Timeout, version: Option<u32>) -> Result<bool> {
        let key = self.cache_key(key, version)?;
        let now = self.clock.now();
        let mapping = self.store.mapping();
        let mut mapping = mapping.lock();
        if mapping.get(&key).is_some_and(|item| item.is_live(now)) {
            return Ok(false);
        }
        mapping.insert(key, CacheItem::new(value, self.backend_expiry(timeout)));
        Ok(true)
    }

    fn has_key(&self, key: &str, version: Option<u32>) -> Result<bool> {
        let key = self.cache_key(key, version)?;
        let now = self.clock.now();
        let mapping = self.store.mapping();
        let mapping = mapping.lock();
        Ok(mapping.get(&key).is_some_and(|item| item.is_live(now)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use proptest::prelude::*;
    use strata_core::ManualClock;
    use test_case::test_case;

    struct Fixture {
        cache: RequestScopedCache<String>,
        context: Arc<RequestContext<String>>,
        clock: ManualClock,
    }

    fn fixture(default_timeout: u64, max_timeout: Option<u64>) -> Fixture {
        let clock = ManualClock::default();
        let context = Arc::new(RequestContext::new());
        let mut config = RequestCacheConfig::default().with_default_timeout(default_timeout);
        config.max_timeout = max_timeout;
        let cache =
            RequestScopedCache::with_clock(config, Some(context.clone()), Arc::new(clock.clone()));
        Fixture { cache, context, clock }
    }

    fn stored_expiry(f: &Fixture, key: &str) -> DateTime<Utc> {
        let key = f.cache.cache_key(key, None).unwrap();
        let storage = f.cache.storage();
        let expiry = storage.lock()[&key].expire_at();
        expiry
    }

    #[test]
    fn test_set_then_get() {
        let f = fixture(10, None);
        f.cache.set("a", "x".into(), Timeout::Default, None).unwrap();
        assert_eq!(f.cache.get("a", None).unwrap().as_deref(), Some("x"));
        assert!(f.context.has_attribute(f.cache.config().storage_attribute.as_str()));
    }

    #[test]
    fn test_get_missing_returns_default() {
        let f = fixture(10, None);
        assert_eq!(f.cache.get_or("missing", "d".into(), None).unwrap(), "d");
    }

    #[test_case(Timeout::Default => 10 ; "default uses default timeout")]
    #[test_case(Timeout::Seconds(5) => 5 ; "shorter than max is kept")]
    #[test_case(Timeout::Seconds(500) => 20 ; "longer than max is clamped")]
    #[test_case(Timeout::Seconds(0) => 20 ; "zero means max")]
    #[test_case(Timeout::Seconds(-3) => 20 ; "negative means max")]
    #[test_case(Timeout::Forever => 20 ; "forever means max")]
    fn test_effective_timeout(timeout: Timeout) -> i64 {
        fixture(10, Some(20)).cache.effective_timeout(timeout)
    }

    #[test]
    fn test_max_timeout_defaults_to_default_timeout() {
        let f = fixture(10, None);
        assert_eq!(f.cache.effective_timeout(Timeout::Seconds(60)), 10);
    }

    #[test]
    fn test_stored_expiry_is_clamped() {
        let f = fixture(10, Some(20));
        let now = f.clock.now();
        f.cache.set("k", "v".into(), Timeout::Seconds(3600), None).unwrap();
        assert_eq!(stored_expiry(&f, "k"), now + Duration::seconds(20));

        f.cache.set("k", "v".into(), Timeout::Seconds(0), None).unwrap();
        assert_eq!(stored_expiry(&f, "k"), now + Duration::seconds(20));
    }

    #[test]
    fn test_entry_expires_but_stays_in_mapping() {
        let f = fixture(10, None);
        f.cache.set("k", "v".into(), Timeout::Seconds(5), None).unwrap();
        f.clock.advance_secs(5);

        assert!(f.cache.get("k", None).unwrap().is_none());
        assert!(!f.cache.has_key("k", None).unwrap());
        assert_eq!(f.cache.storage().lock().len(), 1);
    }

    #[test]
    fn test_delete_is_silent_on_absent() {
        let f = fixture(10, None);
        f.cache.set("k", "v".into(), Timeout::Default, None).unwrap();
        f.cache.delete("k", None).unwrap();
        f.cache.delete("k", None).unwrap();
        assert!(f.cache.get("k", None).unwrap().is_none());
    }

    #[test]
    fn test_clear_replaces_mapping() {
        let f = fixture(10, None);
        f.cache.set("a", "1".into(), Timeout::Default, None).unwrap();
        let before = f.cache.storage();

        f.cache.clear().unwrap();
        f.cache.clear().unwrap();
        assert!(f.cache.get("a", None).unwrap().is_none());

        f.cache.set("b", "2".into(), Timeout::Default, None).unwrap();
        let b_key = f.cache.cache_key("b", None).unwrap();
        assert!(!before.lock().contains_key(&b_key));
        assert!(!Arc::ptr_eq(&before, &f.cache.storage()));
    }

    #[test]
    fn test_add_keeps_existing_value() {
        let f = fixture(10, None);
        f.cache.set("k", "v1".into(), Timeout::Default, None).unwrap();
        assert!(!f.cache.add("k", "v2".into(), Timeout::Default, None).unwrap());
        assert_eq!(f.cache.get("k", None).unwrap().as_deref(), Some("v1"));
    }

    #[test]
    fn test_add_stores_absent_or_expired() {
        let f = fixture(10, None);
        assert!(f.cache.add("k", "v2".into(), Timeout::Seconds(2), None).unwrap());
        assert_eq!(f.cache.get("k", None).unwrap().as_deref(), Some("v2"));

        f.clock.advance_secs(2);
        assert!(f.cache.add("k", "v3".into(), Timeout::Default, None).unwrap());
        assert_eq!(f.cache.get("k", None).unwrap().as_deref(), Some("v3"));
    }

    #[test]
    fn test_versions_and_prefix() {
        let f = fixture(10, None);
        f.cache.set("k", "v1".into(), Timeout::Default, Some(1)).unwrap();
        f.cache.set("k", "v2".into(), Timeout::Default, Some(2)).unwrap();
        assert_eq!(f.cache.get("k", Some(1)).unwrap().as_deref(), Some("v1"));
        assert_eq!(f.cache.get("k", Some(2)).unwrap().as_deref(), Some("v2"));
    }

    #[test]
    fn test_invalid_key_propagates() {
        let f = fixture(10, None);
        let err = f.cache.set("white space", "v".into(), Timeout::Default, None).unwrap_err();
        assert!(err.is_key_error());
        assert!(f.cache.get(&"k".repeat(300), None).is_err());
    }

    #[test]
    fn test_custom_key_maker() {
        let f = fixture(10, None);
        let cache = f
            .cache
            .with_key_maker(KeyMaker::default().with_key_func(|_, key, _| format!("custom-{key}")));
        assert_eq!(cache.cache_key("k", None).unwrap(), "custom-k");
    }

    #[test]
    fn test_requests_do_not_share_entries() {
        let f = fixture(10, None);
        f.cache.set("k", "v".into(), Timeout::Default, None).unwrap();

        let other = f.cache.bind(Arc::new(RequestContext::new()));
        assert!(other.get("k", None).unwrap().is_none());
        other.set("k", "w".into(), Timeout::Default, None).unwrap();
        assert_eq!(f.cache.get("k", None).unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_missing_context_degrades_with_one_warning_per_operation() {
        let cache: RequestScopedCache<String> =
            RequestScopedCache::new(RequestCacheConfig::default(), None);
        assert!(!cache.is_bound());

        cache.set("k", "v".into(), Timeout::Default, None).unwrap();
        assert_eq!(cache.missing_context_warnings(), 1);

        assert!(cache.get("k", None).unwrap().is_none());
        assert_eq!(cache.missing_context_warnings(), 2);

        assert!(cache.add("k", "v".into(), Timeout::Default, None).unwrap());
        assert_eq!(cache.missing_context_warnings(), 3);

        cache.delete("k", None).unwrap();
        cache.clear().unwrap();
        assert!(!cache.has_key("k", None).unwrap());
        assert_eq!(cache.missing_context_warnings(), 6);
    }

    proptest! {
        /// Stored expiry never lies beyond `now + max_timeout`.
        #[test]
        fn prop_expiry_never_exceeds_max(secs in -1_000i64..1_000_000, max in 1u64..10_000) {
            let f = fixture(max, Some(max));
            let now = f.clock.now();
            f.cache.set("k", "v".into(), Timeout::Seconds(secs), None).unwrap();
            let expiry = stored_expiry(&f, "k");
            prop_assert!(expiry <= now + Duration::seconds(max as i64));
            if secs <= 0 {
                prop_assert_eq!(expiry, now + Duration::seconds(max as i64));
            }
        }

        /// A write is immediately readable.
        #[test]
        fn prop_set_then_get(key in "[a-z0-9_]{1,64}", value in ".{0,32}") {
            let f = fixture(10, None);
            f.cache.set(&key, value.clone(), Timeout::Default, None).unwrap();
            prop_assert_eq!(f.cache.get(&key, None).unwrap(), Some(value));
        }
    }
}
