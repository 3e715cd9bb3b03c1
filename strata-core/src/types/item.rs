//! Stored cache items.

use chrono::{DateTime, Utc};

/// A value and the instant it stops being served.
///
/// Items are never mutated; an update replaces the whole item.
#[derive(Clone, Debug, PartialEq)]
pub struct CacheItem<V> {
    value: V,
    expire_at: DateTime<Utc>,
}

impl<V> CacheItem<V> {
    /// Creates an item that expires at `expire_at`.
    pub fn new(value: V, expire_at: DateTime<Utc>) -> Self {
        Self { value, expire_at }
    }

    /// The stored value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// When the item expires.
    pub fn expire_at(&self) -> DateTime<Utc> {
        self.expire_at
    }

    /// Returns true while `now` is strictly before the expiry.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        now < self.expire_at
    }

    /// Consumes the item and returns its value.
    pub fn into_value(self) -> V {
        self.value
    }
}
