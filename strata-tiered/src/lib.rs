//! # Strata Tiered
//!
//! A cache that fronts a slow backend with a fast, short-lived one.
//!
//! Reads try the fast tier first and fall back to the slow tier, warming the
//! fast tier on the way out. Writes go to both tiers; the fast tier's copy is
//! capped at a small ceiling because nothing propagates slow-tier evictions to
//! it.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use strata_core::{CacheBackend, CacheRegistry, Timeout};
//! use strata_memory::MemoryCache;
//! use strata_tiered::{TieredCache, TieredCacheConfig};
//!
//! let registry: Arc<CacheRegistry<String>> = Arc::new(CacheRegistry::new());
//! registry.register("fast", Arc::new(MemoryCache::<String>::new()));
//! registry.register("slow", Arc::new(MemoryCache::<String>::new()));
//!
//! let cache = TieredCache::new(TieredCacheConfig::new("fast", "slow"), registry);
//! cache.set("a", "x".to_string(), Timeout::Default, None).unwrap();
//! assert_eq!(cache.get("a", None).unwrap().as_deref(), Some("x"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod cache;
mod config;

pub use cache::TieredCache;
pub use config::TieredCacheConfig;
