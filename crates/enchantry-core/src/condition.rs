//! Condition evaluation for resolved effect levels.
//!
//! Conditions are implemented by the host. This crate asks one question per
//! holder, "are this holder's conditions met for this actor right now", and
//! passes any evaluator failure straight back to its caller.

use std::error::Error as StdError;

use thiserror::Error;

use crate::actor::Actor;
use crate::effect::ProvidedHolder;

/// Failure reported by a condition evaluator.
#[derive(Debug, Error)]
#[error("condition evaluation failed: {message}")]
pub struct ConditionError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl ConditionError {
    /// Creates an error with a message only.
    #[must_use]
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
            source: None,
        }
    }

    /// Creates an error wrapping the evaluator's own failure.
    pub fn with_source(message: &str, source: impl StdError + Send + Sync + 'static) -> Self {
        Self {
            message: message.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// The evaluator's description of the failure.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Decides whether a holder's conditions are satisfied.
pub trait ConditionEvaluator<A: Actor>: Send + Sync {
    /// Whether the conditions of `holder` are met for `actor`.
    ///
    /// # Errors
    ///
    /// Any failure of the evaluator itself. It is propagated unchanged.
    fn are_met(&self, actor: &A, holder: &ProvidedHolder<A>) -> Result<bool, ConditionError>;
}

/// Evaluator for effects without conditions.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysMet;

impl<A: Actor> ConditionEvaluator<A> for AlwaysMet {
    fn are_met(&self, _actor: &A, _holder: &ProvidedHolder<A>) -> Result<bool, ConditionError> {
        Ok(true)
    }
}

/// Evaluator backed by a closure.
///
/// # Example
///
/// ```rust,ignore
/// use enchantry_core::condition::FnConditions;
///
/// // Only levels 2 and above are active.
/// let conditions = FnConditions::new(|_actor: &Player, holder| Ok(holder.level.level() >= 2));
/// ```
pub struct FnConditions<F>(F);

impl<F> FnConditions<F> {
    /// Wraps a closure.
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<A, F> ConditionEvaluator<A> for FnConditions<F>
where
    A: Actor,
    F: Fn(&A, &ProvidedHolder<A>) -> Result<bool, ConditionError> + Send + Sync,
{
    fn are_met(&self, actor: &A, holder: &ProvidedHolder<A>) -> Result<bool, ConditionError> {
        (self.0)(actor, holder)
    }
}
