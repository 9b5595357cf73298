//! Slot-aware effect level resolution.
//!
//! [`LevelResolver`] walks an actor's cached inventory snapshot and finds
//! every effect level that is active *where the item currently sits*:
//!
//! 1. Fetch the snapshot from the [`SnapshotCache`]
//! 2. For each occupied slot, skip empty-slot markers
//! 3. Read the item's attached effects, skipping foreign kinds
//! 4. For each managed effect, ask the [`SlotMatcher`] whether the item's
//!    current slot qualifies under any of the effect's target rules; the
//!    first qualifying rule wins and the level is recorded once
//! 5. Optionally re-key the slot-keyed result by item
//!
//! Enumeration starts from the items and only then checks slot membership.
//! An effect therefore stays active on an item that is "unsupported" for it
//! (a weapon effect on a tool) as long as the slot itself qualifies.
//!
//! # Consistency
//!
//! A [`SlotResolution`] keeps the exact snapshot it was computed from. Every
//! slot-to-item join goes through that snapshot, never through a second
//! cache read that might return a newer capture.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use stash::{InventorySnapshot, ItemRef, Occupant, SlotIndex, SnapshotCache};
use tracing::{error, trace, warn};

use crate::actor::{Actor, EffectIndex};
use crate::effect::{EffectDefinition, EffectLevel, ProvidedHolder};
use crate::error::QueryError;
use crate::matcher::SlotMatcher;

/// Snapshot cache specialised to an actor type.
pub type ActorSnapshotCache<A> = SnapshotCache<<A as Actor>::Id, <A as Actor>::Item>;

// =============================================================================
// Slot-keyed result
// =============================================================================

/// Effect levels per slot, together with the snapshot they came from.
pub struct SlotResolution<A: Actor> {
    snapshot: Arc<InventorySnapshot<A::Item>>,
    levels: BTreeMap<SlotIndex, Vec<EffectLevel<A>>>,
}

impl<A: Actor> SlotResolution<A> {
    /// The snapshot this resolution was computed from.
    #[must_use]
    pub fn snapshot(&self) -> &Arc<InventorySnapshot<A::Item>> {
        &self.snapshot
    }

    /// Levels resolved in `slot`, in the item's attachment order.
    #[must_use]
    pub fn levels_at(&self, slot: SlotIndex) -> &[EffectLevel<A>] {
        self.levels.get(&slot).map(Vec::as_slice).unwrap_or_default()
    }

    /// The first level of `definition` resolved in `slot`.
    #[must_use]
    pub fn level_of(
        &self,
        definition: &EffectDefinition<A>,
        slot: SlotIndex,
    ) -> Option<&EffectLevel<A>> {
        self.levels_at(slot)
            .iter()
            .find(|level| level.belongs_to(definition))
    }

    /// Slots with at least one resolved level, ascending.
    pub fn slots(&self) -> impl Iterator<Item = SlotIndex> + '_ {
        self.levels.keys().copied()
    }

    /// Iterates `(slot, levels)` in ascending slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotIndex, &[EffectLevel<A>])> + '_ {
        self.levels
            .iter()
            .map(|(slot, levels)| (*slot, levels.as_slice()))
    }

    /// Returns true if no slot resolved any level.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// The item in `slot`, looked up in this resolution's own snapshot.
    ///
    /// # Errors
    ///
    /// [`QueryError::SnapshotDiverged`] if the snapshot has no item there.
    pub fn item_at(&self, slot: SlotIndex) -> Result<&ItemRef<A::Item>, QueryError> {
        self.snapshot.get(slot).ok_or_else(|| {
            error!(%slot, "resolved slot missing from its own inventory snapshot");
            QueryError::SnapshotDiverged { slot }
        })
    }

    /// Re-keys the result by granting item.
    ///
    /// # Errors
    ///
    /// [`QueryError::SnapshotDiverged`] if a resolved slot has no item in the
    /// snapshot.
    pub fn into_item_levels(self) -> Result<ResolvedLevels<A>, QueryError> {
        let mut entries: Vec<(ItemRef<A::Item>, Vec<EffectLevel<A>>)> =
            Vec::with_capacity(self.levels.len());

        for (slot, levels) in &self.levels {
            let item = self.item_at(*slot)?.clone();
            // The host may share one item instance across slots.
            match entries.iter_mut().find(|(existing, _)| *existing == item) {
                Some((_, merged)) => merged.extend(levels.iter().cloned()),
                None => entries.push((item, levels.clone())),
            }
        }

        Ok(ResolvedLevels { entries })
    }
}

impl<A: Actor> fmt::Debug for SlotResolution<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotResolution")
            .field("levels", &self.levels)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Item-keyed result
// =============================================================================

/// Effect levels per granting item, in ascending order of the first slot
/// each item occupies.
pub struct ResolvedLevels<A: Actor> {
    entries: Vec<(ItemRef<A::Item>, Vec<EffectLevel<A>>)>,
}

impl<A: Actor> ResolvedLevels<A> {
    /// Levels granted by `item`, if it granted any.
    #[must_use]
    pub fn get(&self, item: &ItemRef<A::Item>) -> Option<&[EffectLevel<A>]> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == item)
            .map(|(_, levels)| levels.as_slice())
    }

    /// Iterates `(item, levels)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&ItemRef<A::Item>, &[EffectLevel<A>])> + '_ {
        self.entries
            .iter()
            .map(|(item, levels)| (item, levels.as_slice()))
    }

    /// Number of items granting at least one level.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no item grants any level.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Flattens into one holder per (level, item) pair.
    #[must_use]
    pub fn into_holders(self) -> Vec<ProvidedHolder<A>> {
        self.entries
            .into_iter()
            .flat_map(|(item, levels)| {
                levels
                    .into_iter()
                    .map(move |level| ProvidedHolder::new(level, item.clone()))
            })
            .collect()
    }
}

impl<A: Actor> fmt::Debug for ResolvedLevels<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(_, levels)| levels))
            .finish()
    }
}

// =============================================================================
// Resolver
// =============================================================================

/// Resolves an actor's effect levels from its cached inventory snapshot.
pub struct LevelResolver<A: Actor> {
    cache: Arc<ActorSnapshotCache<A>>,
    matcher: SlotMatcher,
}

impl<A: Actor> LevelResolver<A> {
    /// Creates a resolver reading through `cache`.
    #[must_use]
    pub fn new(cache: Arc<ActorSnapshotCache<A>>) -> Self {
        Self {
            cache,
            matcher: SlotMatcher,
        }
    }

    /// The snapshot cache this resolver reads through.
    #[must_use]
    pub fn cache(&self) -> &Arc<ActorSnapshotCache<A>> {
        &self.cache
    }

    /// The actor's current snapshot, capturing it on a miss.
    pub fn snapshot(&self, actor: &A) -> Arc<InventorySnapshot<A::Item>> {
        self.cache
            .get_or_capture(&actor.id(), || actor.live_contents())
    }

    /// Resolves levels per slot.
    pub fn resolve_slots(&self, actor: &A) -> SlotResolution<A> {
        let snapshot = self.snapshot(actor);
        self.resolve_snapshot(actor, snapshot)
    }

    /// Resolves levels per granting item.
    ///
    /// # Errors
    ///
    /// [`QueryError::SnapshotDiverged`] if the slot-to-item join fails.
    pub fn resolve(&self, actor: &A) -> Result<ResolvedLevels<A>, QueryError> {
        self.resolve_slots(actor).into_item_levels()
    }

    /// Resolves levels per slot against a given snapshot.
    ///
    /// Target domains are evaluated against `actor`'s live state.
    pub fn resolve_snapshot(
        &self,
        actor: &A,
        snapshot: Arc<InventorySnapshot<A::Item>>,
    ) -> SlotResolution<A> {
        let mut levels: BTreeMap<SlotIndex, Vec<EffectLevel<A>>> = BTreeMap::new();

        for (slot, item) in snapshot.iter() {
            if item.is_empty() {
                continue;
            }

            for (attached, raw_level) in item.attached_effect_levels() {
                let Some(definition) = attached.managed() else {
                    trace!(%slot, effect = ?attached, "skipping foreign effect");
                    continue;
                };

                // Only the slot the item occupies right now counts.
                if self
                    .matcher
                    .first_match(actor, definition.targets(), slot)
                    .is_none()
                {
                    continue;
                }

                match EffectLevel::new(Arc::clone(definition), raw_level) {
                    Some(level) => levels.entry(slot).or_default().push(level),
                    None => {
                        warn!(%slot, effect = %definition.id(), "item carries level 0, ignoring");
                    }
                }
            }
        }

        SlotResolution { snapshot, levels }
    }
}

impl<A: Actor> Clone for LevelResolver<A> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            matcher: self.matcher,
        }
    }
}

impl<A: Actor> fmt::Debug for LevelResolver<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LevelResolver")
            .field("cache", &self.cache)
            .finish()
    }
}
