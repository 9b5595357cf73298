//! Test helper functions for setting up actors, items and effects.
//!
//! This module provides a small in-memory host (actor + item types) and
//! factory functions that make writing resolution tests concise.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use stash::{CacheConfig, ItemRef, ManualClock, Occupant, SlotIndex, SlotSet, SnapshotCache};

use crate::actor::{Actor, EffectIndex};
use crate::condition::{ConditionError, ConditionEvaluator};
use crate::effect::{
    AttachedEffect, EffectDefinition, EffectId, ForeignEffect, ProvidedHolder, TargetRule,
};
use crate::query::ActiveQuery;
use crate::resolver::ActorSnapshotCache;

/// Number of slots a test inventory exposes (0..=40, like a player inventory).
pub const INVENTORY_SIZE: u32 = 41;

// =============================================================================
// Test Host
// =============================================================================

/// An actor whose inventory can be edited from tests.
///
/// Counts how often its live inventory is read so tests can observe cache
/// behaviour.
#[derive(Debug)]
pub struct TestActor {
    id: u64,
    slots: RwLock<BTreeMap<SlotIndex, ItemRef<TestItem>>>,
    held: AtomicU32,
    reads: AtomicUsize,
}

impl TestActor {
    /// Creates an actor with an empty inventory holding slot 0.
    pub fn new(id: u64) -> Self {
        Self {
            id,
            slots: RwLock::new(BTreeMap::new()),
            held: AtomicU32::new(0),
            reads: AtomicUsize::new(0),
        }
    }

    /// Builder form of [`put`](Self::put).
    pub fn with(self, slot: u32, item: &ItemRef<TestItem>) -> Self {
        self.put(slot, item);
        self
    }

    /// Places an item in a slot of the live inventory.
    pub fn put(&self, slot: u32, item: &ItemRef<TestItem>) {
        self.slots.write().insert(SlotIndex::new(slot), item.clone());
    }

    /// Removes and returns the item in a slot of the live inventory.
    pub fn take(&self, slot: u32) -> Option<ItemRef<TestItem>> {
        self.slots.write().remove(&SlotIndex::new(slot))
    }

    /// Moves whatever is in `from` to `to`.
    pub fn move_item(&self, from: u32, to: u32) {
        if let Some(item) = self.take(from) {
            self.put(to, &item);
        }
    }

    /// Changes the held hotbar slot.
    pub fn hold(&self, slot: u32) {
        self.held.store(slot, Ordering::SeqCst);
    }

    /// The held hotbar slot.
    pub fn held_slot(&self) -> SlotIndex {
        SlotIndex::new(self.held.load(Ordering::SeqCst))
    }

    /// How many times the live inventory has been read.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

impl Actor for TestActor {
    type Id = u64;
    type Item = TestItem;

    fn id(&self) -> u64 {
        self.id
    }

    fn live_contents(&self) -> Vec<(SlotIndex, Option<ItemRef<TestItem>>)> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let slots = self.slots.read();
        (0..INVENTORY_SIZE)
            .map(SlotIndex::new)
            .map(|slot| (slot, slots.get(&slot).cloned()))
            .collect()
    }
}

/// An item with a name and a list of attached effects.
#[derive(Debug)]
pub struct TestItem {
    /// Display name, for assertions.
    pub name: &'static str,
    air: bool,
    effects: Vec<(AttachedEffect<TestActor>, u32)>,
}

impl TestItem {
    /// Creates an item without effects.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            air: false,
            effects: Vec::new(),
        }
    }

    /// Creates the empty-slot marker.
    pub fn air() -> Self {
        Self {
            name: "air",
            air: true,
            effects: Vec::new(),
        }
    }

    /// Attaches a managed effect at `level`.
    pub fn with_effect(
        mut self,
        definition: &Arc<EffectDefinition<TestActor>>,
        level: u32,
    ) -> Self {
        self.effects
            .push((AttachedEffect::Managed(Arc::clone(definition)), level));
        self
    }

    /// Attaches an effect of a kind the resolver does not manage.
    pub fn with_foreign(mut self, key: &str, level: u32) -> Self {
        self.effects
            .push((AttachedEffect::Foreign(ForeignEffect::new(key)), level));
        self
    }

    /// Wraps the item in a shared handle.
    pub fn into_ref(self) -> ItemRef<TestItem> {
        ItemRef::new(self)
    }
}

impl Occupant for TestItem {
    fn is_empty(&self) -> bool {
        self.air
    }
}

impl EffectIndex<TestActor> for TestItem {
    fn attached_effect_levels(&self) -> Vec<(AttachedEffect<TestActor>, u32)> {
        self.effects.clone()
    }
}

// =============================================================================
// Effect Factory Functions
// =============================================================================

/// A rule over a fixed list of slots.
pub fn slot_rule(name: &str, slots: &[u32]) -> TargetRule<TestActor> {
    TargetRule::fixed(name, SlotSet::of(slots))
}

/// A rule that follows the actor's held slot.
pub fn mainhand_rule() -> TargetRule<TestActor> {
    TargetRule::from_fn("mainhand", |actor: &TestActor| {
        SlotSet::single(actor.held_slot().as_u32())
    })
}

/// A shared effect definition.
pub fn effect(id: &str, targets: Vec<TargetRule<TestActor>>) -> Arc<EffectDefinition<TestActor>> {
    Arc::new(EffectDefinition::new(EffectId::new(id), targets))
}

// =============================================================================
// Condition Evaluators
// =============================================================================

/// Conditions toggled from the test.
#[derive(Debug)]
pub struct Switch(AtomicBool);

impl Switch {
    /// Creates a switch in the given state.
    pub fn new(on: bool) -> Self {
        Self(AtomicBool::new(on))
    }

    /// Flips the switch.
    pub fn set(&self, on: bool) {
        self.0.store(on, Ordering::SeqCst);
    }
}

impl ConditionEvaluator<TestActor> for Switch {
    fn are_met(
        &self,
        _actor: &TestActor,
        _holder: &ProvidedHolder<TestActor>,
    ) -> Result<bool, ConditionError> {
        Ok(self.0.load(Ordering::SeqCst))
    }
}

/// Conditions that are met and count how often they were asked.
#[derive(Debug, Default)]
pub struct Counting(AtomicUsize);

impl Counting {
    /// Number of evaluations so far.
    pub fn calls(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

impl ConditionEvaluator<TestActor> for Counting {
    fn are_met(
        &self,
        _actor: &TestActor,
        _holder: &ProvidedHolder<TestActor>,
    ) -> Result<bool, ConditionError> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(true)
    }
}

/// Conditions whose evaluator always fails.
#[derive(Debug)]
pub struct Broken;

impl ConditionEvaluator<TestActor> for Broken {
    fn are_met(
        &self,
        _actor: &TestActor,
        _holder: &ProvidedHolder<TestActor>,
    ) -> Result<bool, ConditionError> {
        Err(ConditionError::new("evaluator offline"))
    }
}

// =============================================================================
// Setup
// =============================================================================

/// A snapshot cache on a manual clock with the default window.
pub fn manual_cache() -> (Arc<ActorSnapshotCache<TestActor>>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let cache = SnapshotCache::with_config(CacheConfig::default(), clock.clone())
        .expect("default config is valid");
    (Arc::new(cache), clock)
}

/// A query service on a manual clock.
pub fn query_with<C>(conditions: C) -> (ActiveQuery<TestActor, C>, Arc<ManualClock>)
where
    C: ConditionEvaluator<TestActor>,
{
    let (cache, clock) = manual_cache();
    (ActiveQuery::new(cache, conditions), clock)
}

/// Installs a test-writer subscriber so trace output shows up on failure.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}
