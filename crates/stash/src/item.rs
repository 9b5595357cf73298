//! Item handles with reference identity.
//!
//! Inventories hand out items as shared handles. Two [`ItemRef`]s are equal
//! only when they point at the same item instance, never because their
//! contents happen to compare equal: two identical swords in two slots are two
//! distinct items.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

/// Capability shared by anything that can sit in a slot.
///
/// Hosts commonly model "nothing here" with a placeholder item rather than
/// an absent value. Such placeholders report `is_empty() == true` and never
/// take part in resolution.
pub trait Occupant {
    /// Returns true if this item is the empty-slot marker.
    fn is_empty(&self) -> bool;
}

/// Shared handle to one item instance.
///
/// Equality and hashing use the address of the shared allocation.
///
/// # Example
///
/// ```
/// use stash::ItemRef;
///
/// let a = ItemRef::new("sword");
/// let b = ItemRef::new("sword");
///
/// assert_ne!(a, b);
/// assert_eq!(a, a.clone());
/// assert_eq!(*a, *b);
/// ```
pub struct ItemRef<T>(Arc<T>);

impl<T> ItemRef<T> {
    /// Wraps a fresh item instance.
    #[must_use]
    pub fn new(item: T) -> Self {
        Self(Arc::new(item))
    }

    /// Wraps an item instance the host already shares.
    #[must_use]
    pub fn from_arc(item: Arc<T>) -> Self {
        Self(item)
    }

    /// Returns true if both handles point at the same instance.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for ItemRef<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> Deref for ItemRef<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> PartialEq for ItemRef<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T> Eq for ItemRef<T> {}

impl<T> Hash for ItemRef<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.0), state);
    }
}

impl<T: fmt::Debug> fmt::Debug for ItemRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ItemRef").field(&*self.0).finish()
    }
}

impl<T: Occupant> Occupant for ItemRef<T> {
    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
