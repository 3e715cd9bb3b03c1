//! Named cache registry.
//!
//! Resolves identifiers to backend instances. Composite caches look their
//! tiers up here on every access, so a backend registered (or swapped) after
//! the composite was built is picked up on the next call.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::error::{Result, StrataError};
use crate::traits::CacheBackend;

/// Shared handle to a registered backend.
pub type SharedBackend<V> = Arc<dyn CacheBackend<V>>;

/// Maps identifiers to cache backends.
pub struct CacheRegistry<V> {
    backends: RwLock<HashMap<String, SharedBackend<V>>>,
}

impl<V> CacheRegistry<V> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            backends: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a backend, returning the one it replaced.
    pub fn register(
        &self,
        alias: impl Into<String>,
        backend: SharedBackend<V>,
    ) -> Option<SharedBackend<V>> {
        let alias = alias.into();
        debug!(alias = %alias, "Registering cache backend");
        self.backends.write().insert(alias, backend)
    }

    /// Registers a backend in builder style.
    pub fn with_backend(self, alias: impl Into<String>, backend: SharedBackend<V>) -> Self {
        self.register(alias, backend);
        self
    }

    /// Resolves an identifier.
    ///
    /// # Errors
    /// Returns [`StrataError::UnknownBackend`] if nothing is registered under
    /// `alias`.
    pub fn get(&self, alias: &str) -> Result<SharedBackend<V>> {
        self.backends
            .read()
            .get(alias)
            .cloned()
            .ok_or_else(|| StrataError::UnknownBackend(alias.to_string()))
    }

    /// Returns true if `alias` is registered.
    pub fn contains(&self, alias: &str) -> bool {
        self.backends.read().contains_key(alias)
    }

    /// Unregisters a backend.
    pub fn remove(&self, alias: &str) -> Option<SharedBackend<V>> {
        self.backends.write().remove(alias)
    }

    /// Registered identifiers, sorted.
    pub fn aliases(&self) -> Vec<String> {
        let mut aliases: Vec<String> = self.backends.read().keys().cloned().collect();
        aliases.sort();
        aliases
    }
}

impl<V> Default for CacheRegistry<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Timeout;

    struct NullBackend;

    impl CacheBackend<String> for NullBackend {
        fn get(&self, _key: &str, _version: Option<u32>) -> Result<Option<String>> {
            Ok(None)
        }
        fn set(
            &self,
            _key: &str,
            _value: String,
            _timeout: Timeout,
            _version: Option<u32>,
        ) -> Result<()> {
            Ok(())
        }
        fn delete(&self, _key: &str, _version: Option<u32>) -> Result<()> {
            Ok(())
        }
        fn clear(&self) -> Result<()> {
            Ok(())
        }
        fn add(
            &self,
            _key: &str,
            _value: String,
            _timeout: Timeout,
            _version: Option<u32>,
        ) -> Result<bool> {
            Ok(false)
        }
    }

    #[test]
    fn test_register_and_resolve() {
        let registry: CacheRegistry<String> =
            CacheRegistry::new().with_backend("null", Arc::new(NullBackend));
        assert!(registry.contains("null"));
        assert!(registry.get("null").is_ok());
        assert_eq!(registry.aliases(), vec!["null".to_string()]);
    }

    #[test]
    fn test_unknown_backend_names_alias() {
        let registry: CacheRegistry<String> = CacheRegistry::new();
        let err = registry.get("bad_cache").err().unwrap();
        assert!(matches!(err, StrataError::UnknownBackend(ref a) if a == "bad_cache"));
    }

    #[test]
    fn test_remove_and_replace() {
        let registry: CacheRegistry<String> = CacheRegistry::new();
        assert!(registry.register("a", Arc::new(NullBackend)).is_none());
        assert!(registry.register("a", Arc::new(NullBackend)).is_some());
        assert!(registry.remove("a").is_some());
        assert!(!registry.contains("a"));
    }
}
