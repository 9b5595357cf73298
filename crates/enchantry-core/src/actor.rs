//! Collaborator traits implemented by the host.
//!
//! The host owns actors and items. This crate only needs to read an actor's
//! live inventory (once per snapshot capture) and to list the effects stored
//! on an item.

use std::fmt;
use std::hash::Hash;

use stash::{ItemRef, Occupant, SlotIndex};

use crate::effect::AttachedEffect;

/// An entity owning a slotted inventory.
///
/// # Example
///
/// ```
/// use enchantry_core::actor::{Actor, EffectIndex};
/// use enchantry_core::effect::AttachedEffect;
/// use stash::{ItemRef, Occupant, SlotIndex};
///
/// struct Rock;
/// impl Occupant for Rock {
///     fn is_empty(&self) -> bool { false }
/// }
/// impl EffectIndex<Golem> for Rock {
///     fn attached_effect_levels(&self) -> Vec<(AttachedEffect<Golem>, u32)> { Vec::new() }
/// }
///
/// struct Golem { id: u64, hands: ItemRef<Rock> }
/// impl Actor for Golem {
///     type Id = u64;
///     type Item = Rock;
///     fn id(&self) -> u64 { self.id }
///     fn live_contents(&self) -> Vec<(SlotIndex, Option<ItemRef<Rock>>)> {
///         vec![(SlotIndex::new(0), Some(self.hands.clone()))]
///     }
/// }
/// ```
pub trait Actor: Sized + Send + Sync {
    /// Stable identity, used as the snapshot cache key.
    type Id: Clone + Eq + Hash + fmt::Debug + Send + Sync;

    /// The host's item type.
    type Item: EffectIndex<Self>;

    /// The actor's identity. Must not change for the actor's lifetime.
    fn id(&self) -> Self::Id;

    /// Reads every slot of the live inventory.
    ///
    /// Called only when a snapshot is captured. `None` means the slot is
    /// vacant.
    fn live_contents(&self) -> Vec<(SlotIndex, Option<ItemRef<Self::Item>>)>;
}

/// The effect metadata stored on an item.
pub trait EffectIndex<A>: Occupant + Send + Sync {
    /// Every effect on the item with its raw level, in the item's own order.
    fn attached_effect_levels(&self) -> Vec<(AttachedEffect<A>, u32)>;
}
