use crate::Rule;

/// State threaded through the evaluation of a single action.
///
/// Evaluation starts [`Unmatched`](Verdict::Unmatched) and folds the
/// outcome of each candidate rule in order. Once a revoking rule matches the
/// verdict is [`Revoked`](Verdict::Revoked) and no further rule is consulted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// No rule has granted permission yet.
    #[default]
    Unmatched,
    /// A granting rule matched and no revoking rule has matched since.
    Granted,
    /// A revoking rule matched. Final.
    Revoked,
}

impl Verdict {
    /// Only a granted verdict permits the action.
    pub fn is_permitted(self) -> bool {
        matches!(self, Verdict::Granted)
    }

    /// Whether no further rule can change this verdict.
    pub fn is_final(self) -> bool {
        matches!(self, Verdict::Revoked)
    }

    /// Fold the outcome of the next rule into this verdict.
    ///
    /// `outcome` is only invoked when the verdict is not final, so predicates
    /// of rules after a matching revoke never run.
    pub fn fold(self, outcome: impl FnOnce() -> Verdict) -> Verdict {
        match self {
            Verdict::Revoked => Verdict::Revoked,
            Verdict::Granted => match outcome() {
                Verdict::Unmatched => Verdict::Granted,
                next => next,
            },
            Verdict::Unmatched => outcome(),
        }
    }

    /// Resolve the verdict for `actor` acting on `target` over an ordered
    /// sequence of candidate rules.
    pub fn resolve<'a, A, T>(
        rules: impl IntoIterator<Item = &'a Rule<A, T>>,
        actor: &A,
        target: &T,
    ) -> Verdict
    where
        A: 'a,
        T: 'a,
    {
        let mut verdict = Verdict::Unmatched;
        for rule in rules {
            if verdict.is_final() {
                break;
            }
            verdict = verdict.fold(|| rule.evaluate(actor, target));
        }
        verdict
    }
}

impl From<Verdict> for bool {
    fn from(verdict: Verdict) -> Self {
        verdict.is_permitted()
    }
}
