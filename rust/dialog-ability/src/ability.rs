use crate::rule::{ActorTest, Condition, anything};
use crate::table::AbilityTable;
use crate::{Actions, DialogAbilityError, Effect, Refusal, Refuse, Rule, RuleBuilder, Verdict};
use parking_lot::RwLock;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Rule engine deciding whether an actor may perform actions on a target.
///
/// Rules are registered with [`allow`](Ability::allow) and
/// [`deny`](Ability::deny) (or their variants) and evaluated by
/// [`can`](Ability::can). For each requested action the rules registered
/// under that action are folded first, followed by the rules registered
/// under [`MANAGE`](crate::MANAGE), all in registration order:
///
/// - a matching grant permits the action unless a revoke matches later;
/// - a matching revoke denies the action and ends evaluation, so no later
///   grant can restore permission.
///
/// When several actions are requested all of them must be permitted.
///
/// `A` is the actor type and `T` the target type. The engine never looks
/// inside either; only the registered predicates do. `R` builds the error
/// returned by [`authorize`](Ability::authorize).
pub struct Ability<A, T, R = Refusal> {
    table: RwLock<AbilityTable<A, T>>,
    refusal: R,
}

impl<A, T> Ability<A, T> {
    /// Create an engine with no rules and the default [`Refusal`].
    pub fn new() -> Self {
        Self::with_refusal(Refusal)
    }
}

impl<A, T> Default for Ability<A, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, T, R> Ability<A, T, R> {
    /// Create an engine with no rules that reports denials through `refusal`.
    pub fn with_refusal(refusal: R) -> Self {
        Self {
            table: RwLock::new(AbilityTable::new()),
            refusal,
        }
    }

    /// The refusal used by [`authorize`](Ability::authorize).
    pub fn refusal(&self) -> &R {
        &self.refusal
    }

    /// Register a rule granting `actions` to actors accepted by `predicate`
    /// on targets accepted by `condition`.
    pub fn allow<P, C>(
        &self,
        predicate: P,
        actions: impl Into<Actions>,
        condition: C,
    ) -> Result<&Self, DialogAbilityError>
    where
        P: Fn(&A) -> bool + Send + Sync + 'static,
        C: Fn(&T, &A) -> bool + Send + Sync + 'static,
    {
        self.register(
            Effect::Grant,
            Arc::new(predicate),
            actions.into(),
            Arc::new(condition),
        )
    }

    /// Register a rule granting `actions` to actors accepted by `predicate`
    /// on any target.
    pub fn allow_to<P>(
        &self,
        predicate: P,
        actions: impl Into<Actions>,
    ) -> Result<&Self, DialogAbilityError>
    where
        P: Fn(&A) -> bool + Send + Sync + 'static,
    {
        self.register(Effect::Grant, Arc::new(predicate), actions.into(), anything())
    }

    /// Start building a granting rule for actors accepted by `predicate`.
    /// Nothing is registered until the builder completes.
    pub fn allow_when<P>(&self, predicate: P) -> RuleBuilder<'_, A, T, R>
    where
        P: Fn(&A) -> bool + Send + Sync + 'static,
    {
        RuleBuilder::new(self, Effect::Grant, Arc::new(predicate))
    }

    /// Register a rule revoking `actions` from actors accepted by `predicate`
    /// on targets accepted by `condition`.
    pub fn deny<P, C>(
        &self,
        predicate: P,
        actions: impl Into<Actions>,
        condition: C,
    ) -> Result<&Self, DialogAbilityError>
    where
        P: Fn(&A) -> bool + Send + Sync + 'static,
        C: Fn(&T, &A) -> bool + Send + Sync + 'static,
    {
        self.register(
            Effect::Revoke,
            Arc::new(predicate),
            actions.into(),
            Arc::new(condition),
        )
    }

    /// Register a rule revoking `actions` from actors accepted by `predicate`
    /// on any target.
    pub fn deny_to<P>(
        &self,
        predicate: P,
        actions: impl Into<Actions>,
    ) -> Result<&Self, DialogAbilityError>
    where
        P: Fn(&A) -> bool + Send + Sync + 'static,
    {
        self.register(Effect::Revoke, Arc::new(predicate), actions.into(), anything())
    }

    /// Start building a revoking rule for actors accepted by `predicate`.
    /// Nothing is registered until the builder completes.
    pub fn deny_when<P>(&self, predicate: P) -> RuleBuilder<'_, A, T, R>
    where
        P: Fn(&A) -> bool + Send + Sync + 'static,
    {
        RuleBuilder::new(self, Effect::Revoke, Arc::new(predicate))
    }

    pub(crate) fn register(
        &self,
        effect: Effect,
        predicate: ActorTest<A>,
        actions: Actions,
        condition: Condition<A, T>,
    ) -> Result<&Self, DialogAbilityError> {
        tracing::debug!(?effect, %actions, "Registering rule");

        let rule = Rule::from_parts(effect, predicate, condition);
        self.table.write().append(&actions, rule);
        Ok(self)
    }

    /// Whether `actor` may perform every one of `actions` on `target`.
    ///
    /// Never fails: an action without any applicable rule is simply not
    /// permitted.
    pub fn can(&self, actor: &A, actions: impl Into<Actions>, target: &T) -> bool {
        let actions = actions.into();
        actions.iter().all(|action| {
            let verdict = self.verdict(actor, action, target);
            tracing::trace!(action, ?verdict, "Resolved action");
            verdict.is_permitted()
        })
    }

    /// Exact negation of [`can`](Ability::can).
    pub fn cannot(&self, actor: &A, actions: impl Into<Actions>, target: &T) -> bool {
        !self.can(actor, actions, target)
    }

    /// Resolve a single action.
    ///
    /// The candidate rules are copied out of the table before any predicate
    /// runs, so predicates may register rules on this same engine. Each call
    /// pays for that snapshot: one `Vec` of cloned rule handles.
    pub fn verdict(&self, actor: &A, action: &str, target: &T) -> Verdict {
        let candidates: Vec<Rule<A, T>> = self.table.read().candidates(action).cloned().collect();
        Verdict::resolve(&candidates, actor, target)
    }

    /// Succeed when `actor` may perform `actions` on `target`, otherwise
    /// return the error built by this engine's refusal.
    pub fn authorize(
        &self,
        actor: &A,
        actions: impl Into<Actions>,
        target: &T,
    ) -> Result<(), R::Error>
    where
        R: Refuse<A, T>,
    {
        let actions = actions.into();
        if self.cannot(actor, &actions, target) {
            tracing::debug!(%actions, "Authorization denied");
            return Err(self.refusal.refuse(actor, &actions, target));
        }
        Ok(())
    }

    /// Build a new engine holding, for every action, the rules of each
    /// source in the order given.
    ///
    /// The sources are left untouched. The combined engine uses the default
    /// [`Refusal`] regardless of the refusals of its sources.
    pub fn combine<'a, I>(abilities: I) -> Ability<A, T>
    where
        I: IntoIterator<Item = &'a Ability<A, T, R>>,
        A: 'a,
        T: 'a,
        R: 'a,
    {
        let mut table = AbilityTable::new();
        let mut sources = 0usize;
        for ability in abilities {
            table.extend(&ability.table.read());
            sources += 1;
        }
        tracing::debug!(sources, actions = table.actions().count(), "Combined abilities");

        Ability {
            table: RwLock::new(table),
            refusal: Refusal,
        }
    }

    /// Action names with registered rules, in order of first registration.
    pub fn actions(&self) -> Vec<String> {
        self.table.read().actions().map(str::to_owned).collect()
    }

    /// Number of rules registered under exactly `action`.
    pub fn rule_count(&self, action: &str) -> usize {
        self.table.read().rules(action).len()
    }

    /// Total number of registered rules. A rule registered for several
    /// actions counts once per action.
    pub fn len(&self) -> usize {
        self.table.read().len()
    }

    /// Whether no rule has been registered.
    pub fn is_empty(&self) -> bool {
        self.table.read().is_empty()
    }
}

impl<A, T, R: Debug> Debug for Ability<A, T, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ability")
            .field("rules", &*self.table.read())
            .field("refusal", &self.refusal)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ErrorKind, MANAGE};
    use pretty_assertions::assert_eq;
    use testresult::TestResult;

    #[derive(Debug, Clone, PartialEq)]
    enum Actor {
        User,
        Guest,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Product {
        published: bool,
    }

    fn is_user(actor: &Actor) -> bool {
        *actor == Actor::User
    }

    fn is_published(product: &Product, _: &Actor) -> bool {
        product.published
    }

    const PUBLISHED: Product = Product { published: true };
    const DRAFT: Product = Product { published: false };

    #[test]
    fn it_denies_without_rules() {
        let ability = Ability::<Actor, Product>::new();
        assert!(!ability.can(&Actor::User, "read", &PUBLISHED));
        assert!(ability.cannot(&Actor::User, "read", &PUBLISHED));
    }

    #[test]
    fn it_grants_matching_actor_and_target() -> TestResult {
        let ability = Ability::new();
        ability.allow(is_user, "read", is_published)?;

        assert!(ability.can(&Actor::User, "read", &PUBLISHED));
        assert!(!ability.can(&Actor::User, "read", &DRAFT));
        assert!(!ability.can(&Actor::Guest, "read", &PUBLISHED));
        assert!(!ability.can(&Actor::User, "write", &PUBLISHED));
        Ok(())
    }

    #[test]
    fn it_narrows_manage_with_specific_deny() -> TestResult {
        let ability = Ability::new();
        ability
            .allow(is_user, MANAGE, |_: &Product, _: &Actor| true)?
            .deny(is_user, "read", is_published)?;

        assert!(ability.can(&Actor::User, "read", &DRAFT));
        assert!(!ability.can(&Actor::User, "read", &PUBLISHED));
        assert!(ability.can(&Actor::User, "delete", &PUBLISHED));
        assert!(ability.can(&Actor::User, "delete", &DRAFT));
        Ok(())
    }

    #[test]
    fn it_lets_later_deny_override_grant() -> TestResult {
        let ability = Ability::new();
        ability.allow_to(is_user, "read")?.deny_to(is_user, "read")?;

        assert!(!ability.can(&Actor::User, "read", &PUBLISHED));
        Ok(())
    }

    #[test]
    fn it_does_not_regrant_after_deny() -> TestResult {
        let ability = Ability::new();
        ability
            .deny_to(is_user, "read")?
            .allow(is_user, "read", is_published)?;

        assert!(!ability.can(&Actor::User, "read", &PUBLISHED));
        Ok(())
    }

    #[test]
    fn it_requires_every_requested_action() -> TestResult {
        let ability = Ability::new();
        ability.allow_to(is_user, "read")?;

        assert!(ability.can(&Actor::User, ["read"], &DRAFT));
        assert!(!ability.can(&Actor::User, ["read", "write"], &DRAFT));

        ability.allow_to(is_user, "write")?;
        assert!(ability.can(&Actor::User, ["read", "write"], &DRAFT));
        Ok(())
    }

    #[test]
    fn it_registers_one_rule_per_action() -> TestResult {
        let ability = Ability::<Actor, Product>::new();
        ability.allow_to(is_user, ["read", "write"])?;
        ability.deny_to(is_user, "write")?;

        assert_eq!(ability.actions(), vec!["read".to_string(), "write".to_string()]);
        assert_eq!(ability.rule_count("read"), 1);
        assert_eq!(ability.rule_count("write"), 2);
        assert_eq!(ability.rule_count("delete"), 0);
        assert_eq!(ability.len(), 3);
        assert!(!ability.is_empty());
        Ok(())
    }

    #[test]
    fn it_registers_nothing_for_empty_action_list() -> TestResult {
        let ability = Ability::<Actor, Product>::new();
        ability
            .allow_to(is_user, Vec::<String>::new())?
            .deny(is_user, [] as [&str; 0], is_published)?;

        assert!(ability.is_empty());
        assert!(ability.actions().is_empty());
        Ok(())
    }

    #[test]
    fn it_treats_empty_action_name_as_ordinary_key() -> TestResult {
        let ability = Ability::<Actor, Product>::new();
        ability.allow_to(is_user, "")?.deny(is_user, "", is_published)?;

        assert_eq!(ability.actions(), vec![String::new()]);
        assert_eq!(ability.rule_count(""), 2);
        assert!(ability.can(&Actor::User, "", &DRAFT));
        assert!(ability.cannot(&Actor::User, "", &PUBLISHED));
        assert!(ability.cannot(&Actor::Guest, "", &DRAFT));
        assert!(ability.cannot(&Actor::User, "read", &DRAFT));
        Ok(())
    }

    #[test]
    fn it_returns_default_denial_from_authorize() -> TestResult {
        let ability = Ability::new();
        ability.allow(is_user, "read", is_published)?;

        ability.authorize(&Actor::User, "read", &PUBLISHED)?;

        let denied = ability
            .authorize(&Actor::User, ["read", "write"], &DRAFT)
            .unwrap_err();
        assert_eq!(denied.kind(), ErrorKind::AuthorizationDenied);
        assert_eq!(denied.actor, Actor::User);
        assert_eq!(denied.actions, Actions::from(["read", "write"]));
        assert_eq!(denied.target, DRAFT);
        assert_eq!(denied.message, "Not authorized to read, write");
        Ok(())
    }

    #[test]
    fn it_combines_tables_in_order() -> TestResult {
        let writers = Ability::new();
        writers.allow(is_user, "write", is_published)?;
        let readers = Ability::new();
        readers.allow(is_user, "read", is_published)?;

        let combined = Ability::combine([&writers, &readers]);

        assert!(combined.can(&Actor::User, ["read", "write"], &PUBLISHED));
        assert!(combined.cannot(&Actor::User, "read", &DRAFT));
        assert!(combined.cannot(&Actor::User, "write", &DRAFT));
        assert_eq!(writers.actions(), vec!["write".to_string()]);
        assert_eq!(readers.actions(), vec!["read".to_string()]);
        Ok(())
    }

    #[test]
    fn it_combines_nothing_into_empty_engine() {
        let combined = Ability::<Actor, Product>::combine(std::iter::empty());
        assert!(combined.is_empty());
        assert!(combined.cannot(&Actor::User, "read", &PUBLISHED));
    }

    #[test]
    fn it_allows_registration_from_predicates() -> TestResult {
        let ability = Arc::new(Ability::<Actor, Product>::new());
        let inner = Arc::downgrade(&ability);
        ability.allow_to(
            move |_: &Actor| {
                if let Some(ability) = inner.upgrade() {
                    let _ = ability.allow_to(|_: &Actor| true, "audit");
                }
                true
            },
            "read",
        )?;

        assert!(ability.can(&Actor::Guest, "read", &DRAFT));
        assert_eq!(ability.rule_count("audit"), 1);
        Ok(())
    }
}
