//! Error types for the snapshot cache.

use thiserror::Error;

/// Errors raised while building a snapshot cache.
#[derive(Debug, Error)]
pub enum StashError {
    /// The cache configuration cannot be used.
    #[error("invalid cache config: {reason}")]
    InvalidConfig {
        /// What is wrong with the config.
        reason: String,
    },
}
