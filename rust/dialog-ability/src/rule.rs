use crate::Verdict;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Test applied to the actor alone.
pub type ActorTest<A> = Arc<dyn Fn(&A) -> bool + Send + Sync>;

/// Test applied to the target, with the actor available for context.
pub type Condition<A, T> = Arc<dyn Fn(&T, &A) -> bool + Send + Sync>;

/// Whether a matching rule grants or revokes permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    /// Registered through `allow`.
    Grant,
    /// Registered through `deny`.
    Revoke,
}

/// A single allow or deny rule.
///
/// A rule matches when its actor test accepts the actor and its condition
/// accepts the target. The condition is not consulted when the actor test
/// fails. Rules are immutable once built and cheap to clone.
pub struct Rule<A, T> {
    actor: ActorTest<A>,
    condition: Condition<A, T>,
    effect: Effect,
}

impl<A, T> Rule<A, T> {
    /// Build a rule from its parts.
    pub fn new<P, C>(effect: Effect, actor: P, condition: C) -> Self
    where
        P: Fn(&A) -> bool + Send + Sync + 'static,
        C: Fn(&T, &A) -> bool + Send + Sync + 'static,
    {
        Self::from_parts(effect, Arc::new(actor), Arc::new(condition))
    }

    /// Rule that grants permission when it matches.
    pub fn grant<P, C>(actor: P, condition: C) -> Self
    where
        P: Fn(&A) -> bool + Send + Sync + 'static,
        C: Fn(&T, &A) -> bool + Send + Sync + 'static,
    {
        Self::new(Effect::Grant, actor, condition)
    }

    /// Rule that revokes permission when it matches.
    pub fn revoke<P, C>(actor: P, condition: C) -> Self
    where
        P: Fn(&A) -> bool + Send + Sync + 'static,
        C: Fn(&T, &A) -> bool + Send + Sync + 'static,
    {
        Self::new(Effect::Revoke, actor, condition)
    }

    pub(crate) fn from_parts(
        effect: Effect,
        actor: ActorTest<A>,
        condition: Condition<A, T>,
    ) -> Self {
        Self {
            actor,
            condition,
            effect,
        }
    }

    /// The effect of this rule.
    pub fn effect(&self) -> Effect {
        self.effect
    }

    /// Whether both tests accept the given actor and target.
    pub fn matches(&self, actor: &A, target: &T) -> bool {
        (self.actor)(actor) && (self.condition)(target, actor)
    }

    /// Outcome of this rule on its own: [`Verdict::Unmatched`] when it does
    /// not match, otherwise the verdict its effect produces.
    pub fn evaluate(&self, actor: &A, target: &T) -> Verdict {
        match (self.effect, self.matches(actor, target)) {
            (_, false) => Verdict::Unmatched,
            (Effect::Grant, true) => Verdict::Granted,
            (Effect::Revoke, true) => Verdict::Revoked,
        }
    }
}

/// Condition that accepts every target.
pub(crate) fn anything<A, T>() -> Condition<A, T> {
    Arc::new(|_: &T, _: &A| true)
}

impl<A, T> Clone for Rule<A, T> {
    fn clone(&self) -> Self {
        Self {
            actor: self.actor.clone(),
            condition: self.condition.clone(),
            effect: self.effect,
        }
    }
}

impl<A, T> Debug for Rule<A, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("effect", &self.effect)
            .finish_non_exhaustive()
    }
}
