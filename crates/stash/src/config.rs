//! Cache configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::StashError;

/// Default freshness window for cached snapshots.
pub const DEFAULT_EXPIRY: Duration = Duration::from_millis(500);

/// Configuration for a [`SnapshotCache`](crate::SnapshotCache).
///
/// Serialized as `{ "expiry_ms": 500 }`.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use stash::CacheConfig;
///
/// let config = CacheConfig::default();
/// assert_eq!(config.expiry, Duration::from_millis(500));
/// assert!(CacheConfig::with_expiry(Duration::ZERO).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// How long a captured snapshot stays fresh after it was written.
    #[serde(rename = "expiry_ms", with = "millis", default = "default_expiry")]
    pub expiry: Duration,
}

fn default_expiry() -> Duration {
    DEFAULT_EXPIRY
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            expiry: DEFAULT_EXPIRY,
        }
    }
}

impl CacheConfig {
    /// Create a config with the given expiry window.
    #[must_use]
    pub fn with_expiry(expiry: Duration) -> Self {
        Self { expiry }
    }

    /// Checks that the config describes a usable cache.
    ///
    /// # Errors
    ///
    /// Returns [`StashError::InvalidConfig`] if the expiry window is zero or
    /// not a whole number of milliseconds. The window is stored as
    /// `expiry_ms`, so anything finer would not survive a save and reload.
    pub fn validate(&self) -> Result<(), StashError> {
        if self.expiry.is_zero() {
            return Err(StashError::InvalidConfig {
                reason: "expiry window must be greater than zero".to_string(),
            });
        }
        if self.expiry.subsec_nanos() % 1_000_000 != 0 {
            return Err(StashError::InvalidConfig {
                reason: format!(
                    "expiry window {:?} is not a whole number of milliseconds",
                    self.expiry
                ),
            });
        }
        Ok(())
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let ms = u64::try_from(value.as_millis()).unwrap_or(u64::MAX);
        serializer.serialize_u64(ms)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
