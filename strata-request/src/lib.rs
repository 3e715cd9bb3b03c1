//! # Strata Request
//!
//! A cache whose storage lives inside one request.
//!
//! The host creates a [`RequestContext`] per unit of work and hands it to the
//! cache explicitly. Entries are kept in a mapping bound to that context, so
//! they disappear with it and are never visible to another request.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use strata_core::{CacheBackend, Timeout};
//! use strata_request::{RequestCacheConfig, RequestContext, RequestScopedCache};
//!
//! let request = Arc::new(RequestContext::new());
//! let cache = RequestScopedCache::new(RequestCacheConfig::default(), Some(request));
//!
//! cache.set("user", "alice".to_string(), Timeout::Default, None).unwrap();
//! assert_eq!(cache.get("user", None).unwrap().as_deref(), Some("alice"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod cache;
mod config;
mod context;

pub use cache::RequestScopedCache;
pub use config::RequestCacheConfig;
pub use context::{Mapping, MappingHandle, RequestContext, RequestStore};
