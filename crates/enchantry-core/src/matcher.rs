//! Slot membership tests against target rules.

use stash::{SlotIndex, SlotSet};

use crate::effect::TargetRule;

/// Answers whether slots qualify for target rules.
///
/// Nothing is cached: target domains may depend on actor state that changes
/// between ticks.
///
/// # Example
///
/// ```
/// use enchantry_core::effect::TargetRule;
/// use enchantry_core::matcher::SlotMatcher;
/// use stash::{SlotIndex, SlotSet};
///
/// let rules: Vec<TargetRule<()>> = vec![
///     TargetRule::fixed("helmet", SlotSet::single(39)),
///     TargetRule::fixed("offhand", SlotSet::single(40)),
/// ];
/// let matcher = SlotMatcher;
///
/// let hit = matcher.first_match(&(), &rules, SlotIndex::new(40)).unwrap();
/// assert_eq!(hit.name(), "offhand");
/// assert!(matcher.first_match(&(), &rules, SlotIndex::new(0)).is_none());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SlotMatcher;

impl SlotMatcher {
    /// Every slot `rule` currently accepts for `actor`.
    #[must_use]
    pub fn qualifying_slots<A>(&self, actor: &A, rule: &TargetRule<A>) -> SlotSet {
        rule.qualifying_slots(actor)
    }

    /// Whether `slot` currently qualifies under `rule`.
    #[must_use]
    pub fn qualifies<A>(&self, actor: &A, rule: &TargetRule<A>, slot: SlotIndex) -> bool {
        rule.contains(actor, slot)
    }

    /// The first rule, in declaration order, that accepts `slot`.
    ///
    /// Stops at the first match; later rules are not consulted.
    #[must_use]
    pub fn first_match<'r, A>(
        &self,
        actor: &A,
        rules: &'r [TargetRule<A>],
        slot: SlotIndex,
    ) -> Option<&'r TargetRule<A>> {
        rules.iter().find(|rule| self.qualifies(actor, rule, slot))
    }
}
