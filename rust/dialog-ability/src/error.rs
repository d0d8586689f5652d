use crate::Actions;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};

/// Stable classification for every error this crate produces.
///
/// The serialized form (`INVALID_ARGUMENT`, `INVALID_STATE`,
/// `AUTHORIZATION_DENIED`) is meant for logs and API responses where the
/// label must not change between releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Rule input that cannot be used as a predicate or condition
    InvalidArgument,
    /// Rule builder step called out of order or repeated
    InvalidState,
    /// Raised by `authorize` when the actor is not permitted
    AuthorizationDenied,
}

impl ErrorKind {
    /// Label for this kind, matching its serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "INVALID_ARGUMENT",
            ErrorKind::InvalidState => "INVALID_STATE",
            ErrorKind::AuthorizationDenied => "AUTHORIZATION_DENIED",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while registering rules.
///
/// These are always raised at the offending call and never deferred to
/// evaluation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DialogAbilityError {
    /// A predicate or condition could not be used. Closures are checked by
    /// the compiler, so registration through [`Ability`](crate::Ability)
    /// does not produce this variant.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the rejected input.
        message: String,
    },

    /// A [`RuleBuilder`](crate::RuleBuilder) step was called out of order or
    /// more than once.
    #[error("Invalid state: {message}")]
    InvalidState {
        /// Description of the violated step.
        message: String,
    },
}

impl DialogAbilityError {
    pub(crate) fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Stable classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidArgument { .. } => ErrorKind::InvalidArgument,
            Self::InvalidState { .. } => ErrorKind::InvalidState,
        }
    }
}

/// Default error returned by [`Ability::authorize`](crate::Ability::authorize)
/// when the requested actions are not permitted.
///
/// Carries the denied actor, actions and target so that callers can report
/// or audit the refusal.
#[derive(Clone)]
pub struct DialogAbilityDenied<A, T> {
    /// The actor that was refused.
    pub actor: A,
    /// The actions that were requested.
    pub actions: Actions,
    /// The target the actions were requested on.
    pub target: T,
    /// Human-readable description of the refusal.
    pub message: String,
}

impl<A, T> DialogAbilityDenied<A, T> {
    /// Create a denial with the default message naming `actions`.
    pub fn new(actor: A, actions: Actions, target: T) -> Self {
        let message = format!("Not authorized to {actions}");
        Self {
            actor,
            actions,
            target,
            message,
        }
    }

    /// Replace the message, keeping the structured fields.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Always [`ErrorKind::AuthorizationDenied`].
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::AuthorizationDenied
    }
}

impl<A: Debug, T: Debug> Debug for DialogAbilityDenied<A, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DialogAbilityDenied")
            .field("kind", &self.kind())
            .field("actor", &self.actor)
            .field("actions", &self.actions)
            .field("target", &self.target)
            .field("message", &self.message)
            .finish()
    }
}

impl<A, T> Display for DialogAbilityDenied<A, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl<A: Debug, T: Debug> Error for DialogAbilityDenied<A, T> {}
