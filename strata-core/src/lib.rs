//! # Strata Core
//!
//! Core types, errors, and traits shared by the Strata cache backends.
//!
//! This crate provides the building blocks used by every other Strata crate:
//!
//! - **Types**: [`CacheItem`], [`Timeout`], [`KeyMaker`] and [`BackendOptions`]
//! - **Errors**: a single [`StrataError`] hierarchy
//! - **Traits**: the [`CacheBackend`] capability and the [`Clock`] time source
//! - **Registry**: [`CacheRegistry`], resolving identifiers to backends
//!
//! ## Example
//!
//! ```rust
//! use strata_core::{KeyMaker, Timeout};
//!
//! let keys = KeyMaker::new("app", 1);
//! assert_eq!(keys.cache_key("user:42", None).unwrap(), "app:1:user:42");
//! assert!(Timeout::Default.is_default());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod clock;
pub mod constants;
pub mod error;
pub mod registry;
pub mod traits;
pub mod types;

pub use clock::{deadline_after, Clock, ManualClock, SystemClock};
pub use constants::*;
pub use error::{Result, StrataError};
pub use registry::CacheRegistry;
pub use traits::*;
pub use types::*;
