//! Entry lifetimes.

use serde::{Deserialize, Serialize};

/// How long a write should live.
///
/// `Default` is the "use the backend's default" sentinel. `Seconds` may be zero
/// or negative; each backend decides what a non-positive value means (the
/// request-scoped cache reads it as "the maximum", the memory cache as
/// "already expired").
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeout {
    /// Use the backend's configured default.
    #[default]
    Default,
    /// Live for this many seconds.
    Seconds(i64),
    /// Never expire, where the backend supports it.
    Forever,
}

impl Timeout {
    /// Shorthand for [`Timeout::Seconds`].
    pub fn secs(seconds: i64) -> Self {
        Timeout::Seconds(seconds)
    }

    /// Returns true for the default sentinel.
    pub fn is_default(&self) -> bool {
        matches!(self, Timeout::Default)
    }

    /// Replaces the default sentinel with `default_seconds`.
    pub fn or_default_secs(self, default_seconds: u64) -> Self {
        match self {
            Timeout::Default => Timeout::Seconds(saturating_secs(default_seconds)),
            other => other,
        }
    }

    /// Caps this timeout at `ceiling` seconds.
    ///
    /// `Default` and `Forever` become the ceiling itself. Explicit values keep
    /// the smaller of the two, so non-positive values pass through untouched.
    pub fn capped_at(self, ceiling: u64) -> Self {
        let ceiling = saturating_secs(ceiling);
        match self {
            Timeout::Default | Timeout::Forever => Timeout::Seconds(ceiling),
            Timeout::Seconds(secs) => Timeout::Seconds(secs.min(ceiling)),
        }
    }
}

impl From<u64> for Timeout {
    fn from(seconds: u64) -> Self {
        Timeout::Seconds(saturating_secs(seconds))
    }
}

pub(crate) fn saturating_secs(seconds: u64) -> i64 {
    i64::try_from(seconds).unwrap_or(i64::MAX)
}
