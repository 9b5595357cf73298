//! Effect model: definitions, levels and the holders that grant them.
//!
//! - [`EffectId`]: stable identity of an effect definition
//! - [`EffectDefinition`]: shared, immutable definition with its target rules
//! - [`EffectLevel`]: one numeric level (always `>= 1`) of a definition
//! - [`AttachedEffect`]: an effect as found on an item, managed or foreign
//! - [`ProvidedHolder`]: a level paired with the item granting it
//!
//! Definitions are owned by whatever loads them and shared by `Arc`; this
//! crate only ever holds additional references.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use enchantry_core::effect::{EffectDefinition, EffectId, EffectLevel, TargetRule};
//! use stash::SlotSet;
//!
//! let sharpness: Arc<EffectDefinition<()>> = Arc::new(EffectDefinition::new(
//!     EffectId::new("sharpness"),
//!     vec![TargetRule::fixed("mainhand", SlotSet::single(0))],
//! ));
//!
//! let level = EffectLevel::new(Arc::clone(&sharpness), 3).unwrap();
//! assert_eq!(level.level(), 3);
//! assert!(level.belongs_to(&sharpness));
//! assert!(EffectLevel::new(sharpness, 0).is_none());
//! ```

mod target;

use std::fmt;
use std::num::NonZeroU32;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use stash::ItemRef;

use crate::actor::Actor;

pub use target::{FixedSlots, FnDomain, SlotDomain, TargetRule};

// =============================================================================
// Identity
// =============================================================================

/// Unique identifier for an effect definition.
///
/// # Example
///
/// ```
/// use enchantry_core::effect::EffectId;
///
/// let id = EffectId::new("telekinesis");
/// assert_eq!(id.as_str(), "telekinesis");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EffectId(String);

impl EffectId {
    /// Creates a new `EffectId` from a string.
    #[must_use]
    pub fn new(id: &str) -> Self {
        Self(id.to_string())
    }

    /// Returns the effect ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EffectId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for EffectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// =============================================================================
// Definition
// =============================================================================

/// Static definition of an effect.
///
/// Two definitions are the same effect exactly when their ids match.
pub struct EffectDefinition<A> {
    id: EffectId,
    targets: Vec<TargetRule<A>>,
}

impl<A> EffectDefinition<A> {
    /// Creates a definition with its target rules.
    #[must_use]
    pub fn new(id: EffectId, targets: Vec<TargetRule<A>>) -> Self {
        Self { id, targets }
    }

    /// The definition's identity.
    #[must_use]
    pub fn id(&self) -> &EffectId {
        &self.id
    }

    /// Target rules, in declaration order.
    #[must_use]
    pub fn targets(&self) -> &[TargetRule<A>] {
        &self.targets
    }
}

impl<A> PartialEq for EffectDefinition<A> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<A> Eq for EffectDefinition<A> {}

impl<A> fmt::Debug for EffectDefinition<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectDefinition")
            .field("id", &self.id)
            .field("targets", &self.targets)
            .finish()
    }
}

// =============================================================================
// Level
// =============================================================================

/// A specific level of an effect definition.
///
/// Levels are at least 1. Level 0 is reserved as the "not active" sentinel
/// and cannot be constructed.
pub struct EffectLevel<A> {
    definition: Arc<EffectDefinition<A>>,
    level: NonZeroU32,
}

impl<A> EffectLevel<A> {
    /// Creates a level, or `None` if `level` is 0.
    #[must_use]
    pub fn new(definition: Arc<EffectDefinition<A>>, level: u32) -> Option<Self> {
        NonZeroU32::new(level).map(|level| Self { definition, level })
    }

    /// The definition this level belongs to.
    #[must_use]
    pub fn definition(&self) -> &Arc<EffectDefinition<A>> {
        &self.definition
    }

    /// The numeric level, always `>= 1`.
    #[must_use]
    pub fn level(&self) -> u32 {
        self.level.get()
    }

    /// Whether this is a level of `definition`.
    #[must_use]
    pub fn belongs_to(&self, definition: &EffectDefinition<A>) -> bool {
        *self.definition == *definition
    }
}

impl<A> Clone for EffectLevel<A> {
    fn clone(&self) -> Self {
        Self {
            definition: Arc::clone(&self.definition),
            level: self.level,
        }
    }
}

impl<A> PartialEq for EffectLevel<A> {
    fn eq(&self, other: &Self) -> bool {
        self.level == other.level && self.definition == other.definition
    }
}

impl<A> Eq for EffectLevel<A> {}

impl<A> fmt::Debug for EffectLevel<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EffectLevel({} {})", self.definition.id, self.level)
    }
}

// =============================================================================
// Attached effects
// =============================================================================

/// Key of an effect this crate does not manage (for example a host-native
/// enchantment stored on the same item).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForeignEffect(String);

impl ForeignEffect {
    /// Creates a foreign effect key.
    #[must_use]
    pub fn new(key: &str) -> Self {
        Self(key.to_string())
    }

    /// The host's key for the effect.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.0
    }
}

/// An effect as read from an item's metadata.
///
/// Items may carry effects of kinds unrelated to this crate. Those are
/// [`AttachedEffect::Foreign`] and are skipped during resolution.
pub enum AttachedEffect<A> {
    /// An effect with a definition this crate resolves.
    Managed(Arc<EffectDefinition<A>>),
    /// An effect of a kind this crate does not recognise.
    Foreign(ForeignEffect),
}

impl<A> AttachedEffect<A> {
    /// The definition, if this effect is of a recognised kind.
    #[must_use]
    pub fn managed(&self) -> Option<&Arc<EffectDefinition<A>>> {
        match self {
            Self::Managed(definition) => Some(definition),
            Self::Foreign(_) => None,
        }
    }
}

impl<A> Clone for AttachedEffect<A> {
    fn clone(&self) -> Self {
        match self {
            Self::Managed(definition) => Self::Managed(Arc::clone(definition)),
            Self::Foreign(foreign) => Self::Foreign(foreign.clone()),
        }
    }
}

impl<A> fmt::Debug for AttachedEffect<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Managed(definition) => write!(f, "Managed({})", definition.id),
            Self::Foreign(foreign) => write!(f, "Foreign({})", foreign.0),
        }
    }
}

impl<A> From<Arc<EffectDefinition<A>>> for AttachedEffect<A> {
    fn from(definition: Arc<EffectDefinition<A>>) -> Self {
        Self::Managed(definition)
    }
}

impl<A> From<ForeignEffect> for AttachedEffect<A> {
    fn from(foreign: ForeignEffect) -> Self {
        Self::Foreign(foreign)
    }
}

// =============================================================================
// Holder
// =============================================================================

/// An effect level together with the item that grants it.
///
/// This is the context handed to condition evaluation.
pub struct ProvidedHolder<A: Actor> {
    /// The granted level.
    pub level: EffectLevel<A>,
    /// The granting item.
    pub item: ItemRef<A::Item>,
}

impl<A: Actor> ProvidedHolder<A> {
    /// Pairs a level with its item.
    #[must_use]
    pub fn new(level: EffectLevel<A>, item: ItemRef<A::Item>) -> Self {
        Self { level, item }
    }
}

impl<A: Actor> Clone for ProvidedHolder<A> {
    fn clone(&self) -> Self {
        Self {
            level: self.level.clone(),
            item: self.item.clone(),
        }
    }
}

impl<A: Actor> fmt::Debug for ProvidedHolder<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProvidedHolder")
            .field("level", &self.level)
            .finish_non_exhaustive()
    }
}
