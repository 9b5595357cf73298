//! Immutable point-in-time captures of an inventory.

use std::collections::BTreeMap;
use std::time::Instant;

use crate::item::{ItemRef, Occupant};
use crate::slot::SlotIndex;

/// Immutable capture of one actor's inventory.
///
/// Only occupied slots are stored: a slot that is absent from the snapshot
/// holds no item. Snapshots are never mutated after creation; a newer capture
/// replaces the old one wholesale.
///
/// Iteration is in ascending slot order.
///
/// # Example
///
/// ```
/// use std::time::Instant;
/// use stash::{InventorySnapshot, ItemRef, Occupant, SlotIndex};
///
/// struct Stack(u8);
/// impl Occupant for Stack {
///     fn is_empty(&self) -> bool { self.0 == 0 }
/// }
///
/// let contents = vec![
///     (SlotIndex::new(0), Some(ItemRef::new(Stack(1)))),
///     (SlotIndex::new(1), None),
///     (SlotIndex::new(2), Some(ItemRef::new(Stack(0)))),
/// ];
/// let snapshot = InventorySnapshot::capture(contents, Instant::now());
///
/// assert_eq!(snapshot.len(), 1);
/// assert!(snapshot.contains(SlotIndex::new(0)));
/// assert!(!snapshot.contains(SlotIndex::new(2)));
/// ```
#[derive(Debug)]
pub struct InventorySnapshot<T> {
    slots: BTreeMap<SlotIndex, ItemRef<T>>,
    captured_at: Instant,
}

impl<T: Occupant> InventorySnapshot<T> {
    /// Captures live inventory contents, keeping only occupied slots.
    ///
    /// Slots with no item and slots holding the empty-slot marker are
    /// dropped. If the same slot appears twice, the later entry wins.
    pub fn capture<I>(contents: I, captured_at: Instant) -> Self
    where
        I: IntoIterator<Item = (SlotIndex, Option<ItemRef<T>>)>,
    {
        let slots = contents
            .into_iter()
            .filter_map(|(slot, item)| item.map(|item| (slot, item)))
            .filter(|(_, item)| !item.is_empty())
            .collect();
        Self { slots, captured_at }
    }
}

impl<T> InventorySnapshot<T> {
    /// Builds a snapshot from an already-prepared slot map, without filtering.
    #[must_use]
    pub fn from_slots(slots: BTreeMap<SlotIndex, ItemRef<T>>, captured_at: Instant) -> Self {
        Self { slots, captured_at }
    }

    /// Returns the item in `slot`, if any.
    #[must_use]
    pub fn get(&self, slot: SlotIndex) -> Option<&ItemRef<T>> {
        self.slots.get(&slot)
    }

    /// Returns true if `slot` holds an item.
    #[must_use]
    pub fn contains(&self, slot: SlotIndex) -> bool {
        self.slots.contains_key(&slot)
    }

    /// Iterates `(slot, item)` pairs in ascending slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotIndex, &ItemRef<T>)> + '_ {
        self.slots.iter().map(|(slot, item)| (*slot, item))
    }

    /// Number of occupied slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if no slot is occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// When the snapshot was taken.
    #[must_use]
    pub fn captured_at(&self) -> Instant {
        self.captured_at
    }
}
