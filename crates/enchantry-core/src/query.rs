//! Public query surface for active effects.
//!
//! [`ActiveQuery`] answers the questions the rest of the game asks every
//! tick:
//!
//! - which (level, item) holders does this actor carry ([`ActiveQuery::active_holders`])
//! - is this effect active at all ([`ActiveQuery::is_effect_active`])
//! - what level of this effect is active in this slot ([`ActiveQuery::active_level_in_slot`])
//! - what level is resolved in this slot, conditions aside ([`ActiveQuery::level_in_slot`])
//!
//! Queries never mutate inventories or effect state. The only side effect
//! is a snapshot capture in the cache on a miss.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use enchantry_core::{ActiveQuery, AlwaysMet};
//! use stash::{SlotIndex, SnapshotCache};
//!
//! let query = ActiveQuery::new(Arc::new(SnapshotCache::new()), AlwaysMet);
//!
//! if query.is_effect_active(&player, &telekinesis)? {
//!     // route drops to the player's inventory
//! }
//! let sharpness = query.active_level_in_slot(&player, &sharpness, SlotIndex::new(0))?;
//! ```

use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;
use stash::SlotIndex;

use crate::actor::Actor;
use crate::condition::ConditionEvaluator;
use crate::effect::{EffectDefinition, EffectLevel, ProvidedHolder};
use crate::error::QueryError;
use crate::resolver::{ActorSnapshotCache, LevelResolver, SlotResolution};

/// Query service over one snapshot cache and one condition evaluator.
pub struct ActiveQuery<A: Actor, C> {
    resolver: LevelResolver<A>,
    conditions: C,
}

impl<A, C> ActiveQuery<A, C>
where
    A: Actor,
    C: ConditionEvaluator<A>,
{
    /// Creates a query service.
    #[must_use]
    pub fn new(cache: Arc<ActorSnapshotCache<A>>, conditions: C) -> Self {
        Self {
            resolver: LevelResolver::new(cache),
            conditions,
        }
    }

    /// The underlying resolver.
    #[must_use]
    pub fn resolver(&self) -> &LevelResolver<A> {
        &self.resolver
    }

    /// The condition evaluator.
    #[must_use]
    pub fn conditions(&self) -> &C {
        &self.conditions
    }

    /// Every (level, item) holder the actor carries, conditions not applied.
    ///
    /// # Errors
    ///
    /// [`QueryError::SnapshotDiverged`] on an internal consistency failure.
    pub fn active_holders(&self, actor: &A) -> Result<Vec<ProvidedHolder<A>>, QueryError> {
        Ok(self.resolver.resolve(actor)?.into_holders())
    }

    /// [`active_holders`](Self::active_holders) for many actors in parallel.
    ///
    /// Results are in the order of `actors`.
    ///
    /// # Errors
    ///
    /// The first error encountered by any actor.
    pub fn active_holders_for_all(
        &self,
        actors: &[A],
    ) -> Result<Vec<Vec<ProvidedHolder<A>>>, QueryError> {
        actors
            .par_iter()
            .map(|actor| self.active_holders(actor))
            .collect()
    }

    /// Whether any holder of `definition` has its conditions met.
    ///
    /// Conditions are only evaluated for holders of `definition`, and
    /// evaluation stops at the first holder whose conditions are met.
    ///
    /// # Errors
    ///
    /// Condition evaluator failures, unchanged.
    pub fn is_effect_active(
        &self,
        actor: &A,
        definition: &EffectDefinition<A>,
    ) -> Result<bool, QueryError> {
        for holder in self.active_holders(actor)? {
            if holder.level.belongs_to(definition) && self.conditions.are_met(actor, &holder)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// The level of `definition` active in exactly `slot`, or 0.
    ///
    /// 0 means either nothing of `definition` is resolved in `slot` or its
    /// conditions are not met. It is never a real level.
    ///
    /// # Errors
    ///
    /// Condition evaluator failures, and [`QueryError::SnapshotDiverged`] on
    /// an internal consistency failure.
    pub fn active_level_in_slot(
        &self,
        actor: &A,
        definition: &EffectDefinition<A>,
        slot: SlotIndex,
    ) -> Result<u32, QueryError> {
        let resolution = self.resolver.resolve_slots(actor);
        let Some(level) = resolution.level_of(definition, slot) else {
            return Ok(0);
        };
        self.checked_level(actor, &resolution, level, slot)
    }

    /// The level of `definition` resolved in `slot`, conditions not applied.
    ///
    /// Distinguishes "resolved but inactive" (`Some`) from "not resolved"
    /// (`None`).
    pub fn level_in_slot(
        &self,
        actor: &A,
        definition: &EffectDefinition<A>,
        slot: SlotIndex,
    ) -> Option<EffectLevel<A>> {
        self.resolver
            .resolve_slots(actor)
            .level_of(definition, slot)
            .cloned()
    }

    /// Every slot where `definition` is active, with its level.
    ///
    /// # Errors
    ///
    /// Same as [`active_level_in_slot`](Self::active_level_in_slot).
    pub fn active_levels(
        &self,
        actor: &A,
        definition: &EffectDefinition<A>,
    ) -> Result<Vec<(SlotIndex, u32)>, QueryError> {
        let resolution = self.resolver.resolve_slots(actor);
        let mut active = Vec::new();
        for slot in resolution.slots() {
            if let Some(level) = resolution.level_of(definition, slot) {
                let value = self.checked_level(actor, &resolution, level, slot)?;
                if value > 0 {
                    active.push((slot, value));
                }
            }
        }
        Ok(active)
    }

    /// Drops the actor's cached snapshot. Call after equip, unequip or
    /// consumption when the next query must see the change.
    pub fn invalidate(&self, actor: &A) {
        self.resolver.cache().invalidate(&actor.id());
    }

    fn checked_level(
        &self,
        actor: &A,
        resolution: &SlotResolution<A>,
        level: &EffectLevel<A>,
        slot: SlotIndex,
    ) -> Result<u32, QueryError> {
        let item = resolution.item_at(slot)?;
        let holder = ProvidedHolder::new(level.clone(), item.clone());
        if self.conditions.are_met(actor, &holder)? {
            Ok(level.level())
        } else {
            Ok(0)
        }
    }
}

impl<A: Actor, C: fmt::Debug> fmt::Debug for ActiveQuery<A, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActiveQuery")
            .field("resolver", &self.resolver)
            .field("conditions", &self.conditions)
            .finish()
    }
}
