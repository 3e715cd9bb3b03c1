//! Error types for Strata.
//!
//! A single error hierarchy built with `thiserror`. Misuse that the caches can
//! recover from (for example a request-scoped cache used without a request)
//! is logged instead of raised and never appears here.

use thiserror::Error;

/// Result type alias using `StrataError`.
pub type Result<T> = std::result::Result<T, StrataError>;

/// Main error type for all Strata operations.
#[derive(Debug, Error)]
pub enum StrataError {
    // ═══════════════════════════════════════════════════════════════════════════
    // KEY ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// A constructed cache key failed validation.
    #[error("Invalid cache key '{key}': {reason}")]
    InvalidKey {
        /// The rejected key
        key: String,
        /// Why it was rejected
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // BACKEND ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// No backend is registered under the given identifier.
    #[error("Unknown cache backend: '{0}'")]
    UnknownBackend(String),

    /// A cache collaborator failed to complete an operation.
    #[error("Cache backend error: {0}")]
    BackendError(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Configuration could not be parsed.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl StrataError {
    /// Builds an [`StrataError::InvalidKey`].
    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        StrataError::InvalidKey {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if this error comes from key construction or validation.
    pub fn is_key_error(&self) -> bool {
        matches!(self, StrataError::InvalidKey { .. })
    }

    /// Returns true if this error is a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            StrataError::ConfigError(_) | StrataError::JsonError(_) | StrataError::UnknownBackend(_)
        )
    }
}
