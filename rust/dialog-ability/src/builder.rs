use crate::rule::{ActorTest, Condition, anything};
use crate::{Ability, Actions, DialogAbilityError, Effect, Refusal};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

#[derive(Debug)]
enum Stage {
    Fresh,
    ActionsChosen(Actions),
    Finished,
}

/// Step-by-step construction of a rule, returned by
/// [`Ability::allow_when`] and [`Ability::deny_when`].
///
/// Call [`to`](RuleBuilder::to) once to pick the actions, then exactly one of
/// [`on`](RuleBuilder::on) or [`anything`](RuleBuilder::anything) to register
/// the rule. Steps called out of order or repeated fail with
/// [`DialogAbilityError::InvalidState`].
///
/// ```
/// use dialog_ability::Ability;
///
/// # fn main() -> Result<(), dialog_ability::DialogAbilityError> {
/// let ability = Ability::<u32, u32>::new();
/// ability
///     .allow_when(|actor: &u32| *actor > 0)
///     .to(["read", "comment"])?
///     .on(|target: &u32, actor: &u32| target == actor)?
///     .deny_when(|actor: &u32| *actor == 13)
///     .to("comment")?
///     .anything()?;
///
/// assert!(ability.can(&7, "read", &7));
/// assert!(ability.cannot(&13, "comment", &13));
/// # Ok(())
/// # }
/// ```
pub struct RuleBuilder<'a, A, T, R = Refusal> {
    ability: &'a Ability<A, T, R>,
    effect: Effect,
    predicate: ActorTest<A>,
    stage: Stage,
}

impl<'a, A, T, R> RuleBuilder<'a, A, T, R> {
    pub(crate) fn new(
        ability: &'a Ability<A, T, R>,
        effect: Effect,
        predicate: ActorTest<A>,
    ) -> Self {
        Self {
            ability,
            effect,
            predicate,
            stage: Stage::Fresh,
        }
    }

    /// Choose the actions the rule applies to. Can only be called once.
    pub fn to(&mut self, actions: impl Into<Actions>) -> Result<&mut Self, DialogAbilityError> {
        if !matches!(self.stage, Stage::Fresh) {
            return Err(DialogAbilityError::invalid_state(
                "`to` cannot be called more than once",
            ));
        }

        self.stage = Stage::ActionsChosen(actions.into());
        Ok(self)
    }

    /// Register the rule, matching targets accepted by `condition`.
    pub fn on<C>(&mut self, condition: C) -> Result<&'a Ability<A, T, R>, DialogAbilityError>
    where
        C: Fn(&T, &A) -> bool + Send + Sync + 'static,
    {
        self.finish(Arc::new(condition))
    }

    /// Register the rule, matching every target.
    pub fn anything(&mut self) -> Result<&'a Ability<A, T, R>, DialogAbilityError> {
        self.finish(anything())
    }

    fn finish(
        &mut self,
        condition: Condition<A, T>,
    ) -> Result<&'a Ability<A, T, R>, DialogAbilityError> {
        match std::mem::replace(&mut self.stage, Stage::Finished) {
            Stage::ActionsChosen(actions) => {
                self.ability
                    .register(self.effect, self.predicate.clone(), actions, condition)
            }
            Stage::Fresh => {
                self.stage = Stage::Fresh;
                Err(DialogAbilityError::invalid_state(
                    "`to` must be called before `on` or `anything`",
                ))
            }
            Stage::Finished => Err(DialogAbilityError::invalid_state(
                "`on` or `anything` cannot be called more than once",
            )),
        }
    }
}

impl<A, T, R> Debug for RuleBuilder<'_, A, T, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleBuilder")
            .field("effect", &self.effect)
            .field("stage", &self.stage)
            .finish_non_exhaustive()
    }
}
