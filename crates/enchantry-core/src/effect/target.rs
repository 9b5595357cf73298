//! Target rules: which slots an effect may activate from.
//!
//! A [`TargetRule`] wraps a [`SlotDomain`], a function from the actor's
//! current state to the set of qualifying slots. Domains are evaluated fresh
//! on every query because they can depend on fast-changing actor state such
//! as the currently held slot.

use std::fmt;
use std::sync::Arc;

use stash::{SlotIndex, SlotSet};

/// The slot domain of a target rule.
///
/// # Example
///
/// ```
/// use enchantry_core::effect::{FixedSlots, SlotDomain};
/// use stash::{SlotIndex, SlotSet};
///
/// let armor = FixedSlots::new(SlotSet::range(36, 39));
/// assert!(SlotDomain::<()>::contains(&armor, &(), SlotIndex::new(38)));
/// ```
pub trait SlotDomain<A>: Send + Sync {
    /// Every slot that currently qualifies for `actor`.
    fn qualifying_slots(&self, actor: &A) -> SlotSet;

    /// Whether `slot` currently qualifies for `actor`.
    fn contains(&self, actor: &A, slot: SlotIndex) -> bool {
        self.qualifying_slots(actor).contains(slot)
    }
}

/// A domain that is the same fixed set of slots for every actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedSlots(SlotSet);

impl FixedSlots {
    /// Creates a fixed domain.
    #[must_use]
    pub fn new(slots: SlotSet) -> Self {
        Self(slots)
    }
}

impl<A> SlotDomain<A> for FixedSlots {
    fn qualifying_slots(&self, _actor: &A) -> SlotSet {
        self.0.clone()
    }

    fn contains(&self, _actor: &A, slot: SlotIndex) -> bool {
        self.0.contains(slot)
    }
}

/// A domain computed by a closure over the actor.
pub struct FnDomain<F>(F);

impl<A, F> SlotDomain<A> for FnDomain<F>
where
    F: Fn(&A) -> SlotSet + Send + Sync,
{
    fn qualifying_slots(&self, actor: &A) -> SlotSet {
        (self.0)(actor)
    }
}

/// A named slot domain attached to an effect definition.
pub struct TargetRule<A> {
    name: String,
    domain: Arc<dyn SlotDomain<A>>,
}

impl<A> TargetRule<A> {
    /// Creates a rule from any domain.
    pub fn new(name: &str, domain: impl SlotDomain<A> + 'static) -> Self {
        Self {
            name: name.to_string(),
            domain: Arc::new(domain),
        }
    }

    /// Creates a rule over a fixed slot set.
    #[must_use]
    pub fn fixed(name: &str, slots: SlotSet) -> Self {
        Self::new(name, FixedSlots::new(slots))
    }

    /// Creates a rule whose domain is computed from the actor.
    pub fn from_fn<F>(name: &str, domain: F) -> Self
    where
        F: Fn(&A) -> SlotSet + Send + Sync + 'static,
    {
        Self::new(name, FnDomain(domain))
    }

    /// The rule's name, for logs and diagnostics.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Every slot that currently qualifies for `actor`.
    #[must_use]
    pub fn qualifying_slots(&self, actor: &A) -> SlotSet {
        self.domain.qualifying_slots(actor)
    }

    /// Whether `slot` currently qualifies for `actor`.
    #[must_use]
    pub fn contains(&self, actor: &A, slot: SlotIndex) -> bool {
        self.domain.contains(actor, slot)
    }
}

impl<A> Clone for TargetRule<A> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            domain: Arc::clone(&self.domain),
        }
    }
}

impl<A> fmt::Debug for TargetRule<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetRule").field("name", &self.name).finish_non_exhaustive()
    }
}
