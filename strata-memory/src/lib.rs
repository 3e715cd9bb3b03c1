//! In-process TTL cache backend for Strata.
//!
//! A thread-safe map with per-entry expiry. It is the usual slow tier in
//! tests and single-process deployments, and a stand-in for any external
//! store implementing [`strata_core::CacheBackend`].

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod cache;

pub use cache::{CacheStats, MemoryCache, MemoryCacheConfig};
