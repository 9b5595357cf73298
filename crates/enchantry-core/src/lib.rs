//! # Enchantry Core
//!
//! Slot-aware effect level resolution for actors holding slotted items.
//!
//! An actor's effects depend on which items sit in which slots, on each
//! effect's rules about which slots it may activate from, and on runtime
//! conditions evaluated by the host. Resolution runs once per tick per actor,
//! so it reads inventories through a time-bounded snapshot cache
//! ([`stash::SnapshotCache`]) and only re-reads the live inventory once per
//! expiry window or after an explicit invalidation.
//!
//! ## Architecture
//!
//! - **Collaborators**: [`Actor`] and [`EffectIndex`] are implemented by the host
//! - **Effects**: definitions, levels, target rules ([`effect`])
//! - **Matching**: [`SlotMatcher`] tests a slot against target rules
//! - **Resolution**: [`LevelResolver`] turns a snapshot into levels per slot
//!   and per item
//! - **Queries**: [`ActiveQuery`] applies conditions and exposes the public
//!   questions
//!
//! Data flows `ActiveQuery -> LevelResolver -> SnapshotCache`, with the
//! matcher consulted per candidate slot and conditions evaluated last.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use enchantry_core::{ActiveQuery, AlwaysMet};
//! use stash::{SlotIndex, SnapshotCache};
//!
//! let query = ActiveQuery::new(Arc::new(SnapshotCache::new()), AlwaysMet);
//! let level = query.active_level_in_slot(&player, &sharpness, SlotIndex::new(0))?;
//!
//! // An item was consumed; the next query must not see it.
//! query.invalidate(&player);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export stash for snapshot and slot types
pub use stash;

pub mod actor;
pub mod condition;
pub mod effect;
pub mod error;
pub mod matcher;
pub mod query;
pub mod resolver;

pub use actor::{Actor, EffectIndex};
pub use condition::{AlwaysMet, ConditionError, ConditionEvaluator, FnConditions};
pub use effect::{
    AttachedEffect, EffectDefinition, EffectId, EffectLevel, ForeignEffect, ProvidedHolder,
    TargetRule,
};
pub use error::QueryError;
pub use matcher::SlotMatcher;
pub use query::ActiveQuery;
pub use resolver::{ActorSnapshotCache, LevelResolver, ResolvedLevels, SlotResolution};

#[cfg(test)]
mod tests;
