//! Shared constants for Strata backends.

// ═══════════════════════════════════════════════════════════════════════════════
// TIMEOUTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Default lifetime of a cache entry in seconds when a backend is not
/// configured otherwise.
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 300;

/// Default ceiling, in seconds, for writes to the fast tier of a tiered cache.
pub const DEFAULT_FAST_CACHE_TIMEOUT_SECONDS: u64 = 30;

/// Fast-tier ceilings above this value log a warning: a long-lived fast copy
/// can keep serving a value the slow tier has already evicted.
pub const FAST_CACHE_TIMEOUT_WARN_SECONDS: u64 = 30;

// ═══════════════════════════════════════════════════════════════════════════════
// KEYS
// ═══════════════════════════════════════════════════════════════════════════════

/// Maximum length of a constructed cache key.
pub const MAX_KEY_LENGTH: usize = 250;

/// Default key version.
pub const DEFAULT_KEY_VERSION: u32 = 1;

// ═══════════════════════════════════════════════════════════════════════════════
// REQUEST-SCOPED STORAGE
// ═══════════════════════════════════════════════════════════════════════════════

/// Attribute name under which a request-scoped cache binds its mapping to the
/// request context.
pub const DEFAULT_STORAGE_ATTRIBUTE: &str = "_strata_request_cache";
