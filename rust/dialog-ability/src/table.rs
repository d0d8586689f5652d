use crate::{Actions, MANAGE, Rule};
use indexmap::IndexMap;
use std::fmt::{Debug, Formatter};

/// Rules keyed by action name, in registration order.
///
/// The table is append-only: rules are never removed or reordered, and the
/// same rule may be stored any number of times.
pub(crate) struct AbilityTable<A, T> {
    rules: IndexMap<String, Vec<Rule<A, T>>>,
}

impl<A, T> AbilityTable<A, T> {
    pub fn new() -> Self {
        Self {
            rules: IndexMap::new(),
        }
    }

    /// Push `rule` onto the sequence of every named action.
    pub fn append(&mut self, actions: &Actions, rule: Rule<A, T>) {
        for action in actions.iter() {
            self.rules
                .entry(action.to_owned())
                .or_default()
                .push(rule.clone());
        }
    }

    /// Rules registered under exactly `action`.
    pub fn rules(&self, action: &str) -> &[Rule<A, T>] {
        self.rules.get(action).map(Vec::as_slice).unwrap_or_default()
    }

    /// Rules consulted when evaluating `action`: those registered under the
    /// action itself followed by those registered under [`MANAGE`].
    pub fn candidates(&self, action: &str) -> impl Iterator<Item = &Rule<A, T>> {
        self.rules(action).iter().chain(self.rules(MANAGE))
    }

    /// Registered action names, in order of first registration.
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    /// Total number of stored rules, counting one per action they were
    /// registered under.
    pub fn len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.values().all(Vec::is_empty)
    }

    /// Concatenate the rules of `other` after the rules of this table,
    /// action by action.
    pub fn extend(&mut self, other: &AbilityTable<A, T>) {
        for (action, rules) in &other.rules {
            self.rules
                .entry(action.clone())
                .or_default()
                .extend(rules.iter().cloned());
        }
    }
}

impl<A, T> Default for AbilityTable<A, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, T> Clone for AbilityTable<A, T> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
        }
    }
}

impl<A, T> Debug for AbilityTable<A, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.rules.iter().map(|(action, rules)| (action, rules.len())))
            .finish()
    }
}
