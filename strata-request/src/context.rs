//! Request contexts and the storage bound to them.
//!
//! A [`RequestContext`] lives exactly as long as one unit of work. Caches
//! bind their mapping to it under a named attribute; the slot either holds a
//! mapping of the expected type or nothing at all.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use strata_core::CacheItem;

/// Key → item storage of one request-scoped cache.
pub type Mapping<V> = HashMap<String, CacheItem<V>>;

/// Shared handle to a mapping.
///
/// A handle taken before a `clear` keeps pointing at the old mapping, which is
/// no longer reachable from the context.
pub type MappingHandle<V> = Arc<Mutex<Mapping<V>>>;

/// Per-request attribute bag.
pub struct RequestContext<V> {
    slots: Mutex<HashMap<String, MappingHandle<V>>>,
}

impl<V> RequestContext<V> {
    /// Creates an empty context for a new request.
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the mapping bound to `attribute`, if any.
    pub fn attribute(&self, attribute: &str) -> Option<MappingHandle<V>> {
        self.slots.lock().get(attribute).cloned()
    }

    /// Returns true if a mapping is bound to `attribute`.
    pub fn has_attribute(&self, attribute: &str) -> bool {
        self.slots.lock().contains_key(attribute)
    }

    /// Removes the mapping bound to `attribute`.
    pub fn unbind(&self, attribute: &str) -> Option<MappingHandle<V>> {
        self.slots.lock().remove(attribute)
    }

    fn get_or_bind(&self, attribute: &str) -> MappingHandle<V> {
        self.slots
            .lock()
            .entry(attribute.to_string())
            .or_insert_with(|| {
                debug!(attribute, "Binding request cache mapping");
                Arc::new(Mutex::new(HashMap::new()))
            })
            .clone()
    }

    fn rebind(&self, attribute: &str) -> MappingHandle<V> {
        let fresh: MappingHandle<V> = Arc::new(Mutex::new(HashMap::new()));
        self.slots
            .lock()
            .insert(attribute.to_string(), Arc::clone(&fresh));
        fresh
    }
}

impl<V> Default for RequestContext<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Request-scoped store: a named slot on an optional request context.
///
/// Without a context every access gets a throwaway mapping, so reads miss and
/// writes are lost. Each such access logs one warning and bumps
/// [`missing_context_warnings`](Self::missing_context_warnings).
pub struct RequestStore<V> {
    context: Option<Arc<RequestContext<V>>>,
    attribute: String,
    missing_context_warnings: AtomicU64,
}

impl<V> RequestStore<V> {
    /// Creates a store for `attribute` on `context`.
    pub fn new(context: Option<Arc<RequestContext<V>>>, attribute: impl Into<String>) -> Self {
        Self {
            context,
            attribute: attribute.into(),
            missing_context_warnings: AtomicU64::new(0),
        }
    }

    /// The attribute name this store binds to.
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    /// The request context, if one is bound.
    pub fn context(&self) -> Option<&Arc<RequestContext<V>>> {
        self.context.as_ref()
    }

    /// Returns true if a request context is bound.
    pub fn is_bound(&self) -> bool {
        self.context.is_some()
    }

    /// Number of accesses made without a request context.
    pub fn missing_context_warnings(&self) -> u64 {
        self.missing_context_warnings.load(Ordering::Relaxed)
    }

    /// Returns the live mapping, creating it on first access.
    pub fn mapping(&self) -> MappingHandle<V> {
        match &self.context {
            Some(context) => context.get_or_bind(&self.attribute),
            None => self.throwaway(),
        }
    }

    /// Replaces the live mapping with an empty one and returns it.
    pub fn reset(&self) -> MappingHandle<V> {
        match &self.context {
            Some(context) => {
                debug!(attribute = %self.attribute, "Resetting request cache mapping");
                context.rebind(&self.attribute)
            }
            None => self.throwaway(),
        }
    }

    fn throwaway(&self) -> MappingHandle<V> {
        self.missing_context_warnings.fetch_add(1, Ordering::Relaxed);
        warn!(
            attribute = %self.attribute,
            "No request context bound; request cache access is not persisted"
        );
        Arc::new(Mutex::new(HashMap::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(value: &str) -> CacheItem<String> {
        CacheItem::new(value.to_string(), Utc::now())
    }

    #[test]
    fn test_mapping_created_lazily() {
        let context = Arc::new(RequestContext::<String>::new());
        let store = RequestStore::new(Some(context.clone()), "slot");
        assert!(!context.has_attribute("slot"));

        let mapping = store.mapping();
        assert!(context.has_attribute("slot"));
        mapping.lock().insert("k".into(), item("v"));

        assert!(store.mapping().lock().contains_key("k"));
        assert_eq!(store.missing_context_warnings(), 0);
    }

    #[test]
    fn test_reset_detaches_old_handle() {
        let context = Arc::new(RequestContext::<String>::new());
        let store = RequestStore::new(Some(context), "slot");

        let old = store.mapping();
        old.lock().insert("k".into(), item("v"));
        store.reset();

        store.mapping().lock().insert("after".into(), item("w"));
        assert!(old.lock().contains_key("k"));
        assert!(!old.lock().contains_key("after"));
        assert!(!store.mapping().lock().contains_key("k"));
    }

    #[test]
    fn test_attributes_are_independent() {
        let context = Arc::new(RequestContext::<String>::new());
        let a = RequestStore::new(Some(context.clone()), "a");
        let b = RequestStore::new(Some(context.clone()), "b");

        a.mapping().lock().insert("k".into(), item("v"));
        assert!(b.mapping().lock().is_empty());

        assert!(context.unbind("a").is_some());
        assert!(a.mapping().lock().is_empty());
    }

    #[test]
    fn test_missing_context_counts_each_access() {
        let store: RequestStore<String> = RequestStore::new(None, "slot");
        store.mapping().lock().insert("k".into(), item("v"));
        assert!(store.mapping().lock().is_empty());
        store.reset();
        assert_eq!(store.missing_context_warnings(), 3);
    }
}
