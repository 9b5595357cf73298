//! # Stash
//!
//! Point-in-time inventory snapshots and a time-bounded, per-actor cache
//! over them.
//!
//! Reading a live inventory slot by slot is cheap once and expensive when
//! every subsystem does it every tick for every actor. Stash captures the
//! occupied slots once, hands out the immutable capture behind an `Arc`, and
//! re-reads the live inventory at most once per expiry window per actor.
//!
//! - **Snapshots**: [`InventorySnapshot`] maps [`SlotIndex`] to [`ItemRef`]
//!   for occupied slots only
//! - **Cache**: [`SnapshotCache`] serves fresh snapshots lock-free and
//!   serialises captures per actor
//! - **Time**: [`Clock`] abstracts the time source; [`ManualClock`] drives
//!   expiry in tests
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stash::{SnapshotCache, SlotIndex};
//!
//! let cache = SnapshotCache::new();
//! let snapshot = cache.get_or_capture(&player_id, || player.read_slots());
//! for (slot, item) in snapshot.iter() {
//!     println!("{slot}: {item:?}");
//! }
//!
//! // The player consumed an item: the next read must see it.
//! cache.invalidate(&player_id);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod item;
pub mod slot;
pub mod snapshot;
pub mod stats;

// Re-exports for convenience
pub use cache::SnapshotCache;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CacheConfig, DEFAULT_EXPIRY};
pub use error::StashError;
pub use item::{ItemRef, Occupant};
pub use slot::{SlotIndex, SlotSet};
pub use snapshot::InventorySnapshot;
pub use stats::CacheStats;
