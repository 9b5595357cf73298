//! Error types for effect queries.

use stash::SlotIndex;
use thiserror::Error;

use crate::condition::ConditionError;

/// Errors returned by resolution and query operations.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The host's condition evaluator failed.
    #[error(transparent)]
    Condition(#[from] ConditionError),

    /// A slot carried resolved levels but had no item in the snapshot the
    /// levels were resolved from. The slot-keyed and item-keyed views have
    /// diverged; this is a bug, not a recoverable state.
    #[error("slot {slot} has resolved effect levels but no item in the inventory snapshot")]
    SnapshotDiverged {
        /// The slot missing from the snapshot.
        slot: SlotIndex,
    },
}
