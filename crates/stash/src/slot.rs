//! Slot addressing for slotted inventories.
//!
//! A [`SlotIndex`] names one addressable position in an actor's inventory.
//! A [`SlotSet`] is an ordered set of slot indices, used by target rules to
//! describe which positions qualify for an effect.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of a single inventory slot.
///
/// `SlotIndex` is a newtype wrapper around `u32`. Slot indices are ordered by
/// their numeric value, which fixes the iteration order of snapshots and
/// resolution results.
///
/// # Example
///
/// ```
/// use stash::SlotIndex;
///
/// let offhand = SlotIndex::new(40);
/// assert_eq!(offhand.as_u32(), 40);
/// assert!(SlotIndex::new(0) < offhand);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SlotIndex(u32);

impl SlotIndex {
    /// Creates a new `SlotIndex` from a raw `u32` value.
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw `u32` value of this index.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SlotIndex({})", self.0)
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SlotIndex {
    fn from(index: u32) -> Self {
        Self::new(index)
    }
}

impl From<SlotIndex> for u32 {
    fn from(index: SlotIndex) -> Self {
        index.0
    }
}

/// Ordered set of slot indices.
///
/// # Example
///
/// ```
/// use stash::{SlotIndex, SlotSet};
///
/// let armor = SlotSet::range(36, 39);
/// assert!(armor.contains(SlotIndex::new(37)));
/// assert!(!armor.contains(SlotIndex::new(40)));
/// assert_eq!(armor.len(), 4);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSet(BTreeSet<SlotIndex>);

impl SlotSet {
    /// Creates an empty slot set.
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Creates a set holding exactly one slot.
    #[must_use]
    pub fn single(slot: u32) -> Self {
        let mut set = Self::new();
        set.insert(SlotIndex::new(slot));
        set
    }

    /// Creates a set from raw slot numbers. Duplicates collapse.
    #[must_use]
    pub fn of(slots: &[u32]) -> Self {
        slots.iter().copied().map(SlotIndex::new).collect()
    }

    /// Creates a set holding every slot in `first..=last`.
    #[must_use]
    pub fn range(first: u32, last: u32) -> Self {
        (first..=last).map(SlotIndex::new).collect()
    }

    /// Adds a slot. Returns false if it was already present.
    pub fn insert(&mut self, slot: SlotIndex) -> bool {
        self.0.insert(slot)
    }

    /// Membership test.
    #[must_use]
    pub fn contains(&self, slot: SlotIndex) -> bool {
        self.0.contains(&slot)
    }

    /// Iterates slots in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = SlotIndex> + '_ {
        self.0.iter().copied()
    }

    /// Number of slots in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the set holds no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<SlotIndex> for SlotSet {
    fn from_iter<I: IntoIterator<Item = SlotIndex>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_index_ordering() {
        let mut slots = vec![SlotIndex::new(40), SlotIndex::new(0), SlotIndex::new(36)];
        slots.sort();
        assert_eq!(slots, vec![SlotIndex::new(0), SlotIndex::new(36), SlotIndex::new(40)]);
    }

    #[test]
    fn slot_set_of_dedups() {
        let set = SlotSet::of(&[3, 1, 3, 2]);
        assert_eq!(set.len(), 3);
        let ordered: Vec<u32> = set.iter().map(SlotIndex::as_u32).collect();
        assert_eq!(ordered, vec![1, 2, 3]);
    }

    #[test]
    fn slot_set_single_and_empty() {
        assert!(SlotSet::new().is_empty());
        let set = SlotSet::single(5);
        assert!(set.contains(SlotIndex::new(5)));
        assert!(!set.contains(SlotIndex::new(4)));
    }

    #[test]
    fn slot_index_serde() {
        let json = serde_json::to_string(&SlotIndex::new(7)).unwrap();
        assert_eq!(json, "7");
    }
}
