#![warn(missing_docs)]

//! Allow/deny rule engine for in-process authorization.
//!
//! An [`Ability`] answers one question: may this actor perform these actions
//! on this target? The answer comes from rules registered up front, each
//! pairing a test on the actor with a condition on the target and tagged as
//! either granting ([`allow`](Ability::allow)) or revoking
//! ([`deny`](Ability::deny)) permission.
//!
//! # Quick Example
//!
//! ```rust
//! use dialog_ability::{Ability, MANAGE};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! enum Actor { User, Guest }
//!
//! #[derive(Debug, Clone)]
//! struct Product { published: bool }
//!
//! fn is_user(actor: &Actor) -> bool {
//!     *actor == Actor::User
//! }
//!
//! # fn main() -> Result<(), dialog_ability::DialogAbilityError> {
//! let ability = Ability::new();
//! ability
//!     .allow(is_user, MANAGE, |_: &Product, _: &Actor| true)?
//!     .deny(is_user, "read", |product: &Product, _: &Actor| product.published)?;
//!
//! let draft = Product { published: false };
//! let published = Product { published: true };
//!
//! assert!(ability.can(&Actor::User, "read", &draft));
//! assert!(ability.cannot(&Actor::User, "read", &published));
//! assert!(ability.can(&Actor::User, "delete", &published));
//! assert!(ability.cannot(&Actor::Guest, "delete", &draft));
//!
//! let denied = ability.authorize(&Actor::User, "read", &published).unwrap_err();
//! assert_eq!(denied.to_string(), "Not authorized to read");
//! # Ok(())
//! # }
//! ```
//!
//! # Evaluation
//!
//! For every requested action the engine collects the rules registered
//! under that exact action, followed by the rules registered under the
//! [`MANAGE`] wildcard, and folds over them in registration order starting
//! from [`Verdict::Unmatched`]:
//!
//! | Current verdict | Next rule | New verdict |
//! |-----------------|-----------|-------------|
//! | `Unmatched` | any | outcome of the rule |
//! | `Granted` | no match | `Granted` |
//! | `Granted` | matching grant / revoke | `Granted` / `Revoked` |
//! | `Revoked` | not evaluated | `Revoked` |
//!
//! Only a final `Granted` permits the action. A request naming several
//! actions is permitted only if every one of them is.
//!
//! Because action-specific rules come first, a broad rule under `manage` can
//! be narrowed by a deny registered under a specific action.
//!
//! # Registering Rules
//!
//! | Method | Actions | Condition |
//! |--------|---------|-----------|
//! | [`allow`](Ability::allow) / [`deny`](Ability::deny) | given | given |
//! | [`allow_to`](Ability::allow_to) / [`deny_to`](Ability::deny_to) | given | any target |
//! | [`allow_when`](Ability::allow_when) / [`deny_when`](Ability::deny_when) | via [`RuleBuilder`] | via [`RuleBuilder`] |
//!
//! Engines built separately can be merged with [`Ability::combine`].

mod error;
pub use error::*;

mod action;
pub use action::*;

mod rule;
pub use rule::{ActorTest, Condition, Effect, Rule};

mod verdict;
pub use verdict::*;

mod table;

mod refusal;
pub use refusal::*;

mod builder;
pub use builder::*;

mod ability;
pub use ability::*;
