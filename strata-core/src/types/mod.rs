//! Domain types for Strata.
//!
//! - [`CacheItem`]: an immutable value plus its absolute expiry
//! - [`Timeout`]: how long a write should live
//! - [`KeyMaker`]: key namespacing and validation
//! - [`BackendOptions`]: options every backend understands

mod item;
mod key;
mod options;
mod timeout;

pub use item::*;
pub use key::*;
pub use options::*;
pub use timeout::*;
