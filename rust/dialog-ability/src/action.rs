use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Wildcard action. Its rules are consulted for every action, after the
/// rules registered under the exact action name.
pub const MANAGE: &str = "manage";

/// One or more action names.
///
/// Anything that names actions converts into `Actions`, so both a single
/// name and a list can be passed wherever actions are expected:
///
/// ```
/// use dialog_ability::Actions;
///
/// assert_eq!(Actions::from("read").len(), 1);
/// assert_eq!(Actions::from(["read", "write"]).len(), 2);
/// assert_eq!(Actions::from(vec![String::from("read")]).to_string(), "read");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Actions(Vec<String>);

impl Actions {
    /// Collect action names from an iterator.
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// Iterate over the action names in the order given.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Number of action names.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no action was named.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The action names as a slice.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Display for Actions {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

impl From<&str> for Actions {
    fn from(value: &str) -> Self {
        Self(vec![value.to_owned()])
    }
}

impl From<String> for Actions {
    fn from(value: String) -> Self {
        Self(vec![value])
    }
}

impl From<&String> for Actions {
    fn from(value: &String) -> Self {
        Self(vec![value.clone()])
    }
}

impl<S: Into<String>> From<Vec<S>> for Actions {
    fn from(value: Vec<S>) -> Self {
        Self::new(value)
    }
}

impl<S: Into<String>, const N: usize> From<[S; N]> for Actions {
    fn from(value: [S; N]) -> Self {
        Self::new(value)
    }
}

impl<S: Into<String> + Clone> From<&[S]> for Actions {
    fn from(value: &[S]) -> Self {
        Self::new(value.iter().cloned())
    }
}

impl From<&Actions> for Actions {
    fn from(value: &Actions) -> Self {
        value.clone()
    }
}

impl<'a> IntoIterator for &'a Actions {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
