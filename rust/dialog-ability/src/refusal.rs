use crate::{Actions, DialogAbilityDenied};

/// Builds the error [`Ability::authorize`](crate::Ability::authorize) returns
/// when the requested actions are not permitted.
///
/// Replacing the refusal changes the shape of the returned error but never
/// whether one is returned. Any closure taking the actor, actions and target
/// is a refusal:
///
/// ```
/// use dialog_ability::{Ability, Actions};
///
/// let ability = Ability::with_refusal(|actor: &&str, actions: &Actions, _: &u32| {
///     format!("{actor} may not {actions}")
/// });
/// ability.allow_to(|_: &&str| true, "read").unwrap();
///
/// assert!(ability.authorize(&"guest", "read", &1).is_ok());
/// assert_eq!(
///     ability.authorize(&"guest", "write", &1).unwrap_err(),
///     "guest may not write"
/// );
/// ```
pub trait Refuse<A, T> {
    /// Error produced for a denied request.
    type Error;

    /// Build the error for `actor` being denied `actions` on `target`.
    fn refuse(&self, actor: &A, actions: &Actions, target: &T) -> Self::Error;
}

/// Default refusal producing a [`DialogAbilityDenied`] that owns copies of
/// the actor and target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Refusal;

impl<A: Clone, T: Clone> Refuse<A, T> for Refusal {
    type Error = DialogAbilityDenied<A, T>;

    fn refuse(&self, actor: &A, actions: &Actions, target: &T) -> Self::Error {
        DialogAbilityDenied::new(actor.clone(), actions.clone(), target.clone())
    }
}

impl<A, T, E, F> Refuse<A, T> for F
where
    F: Fn(&A, &Actions, &T) -> E,
{
    type Error = E;

    fn refuse(&self, actor: &A, actions: &Actions, target: &T) -> Self::Error {
        self(actor, actions, target)
    }
}
