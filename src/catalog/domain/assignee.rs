//! Kinds of people a duty can be assigned to.

use super::{CatalogDomainError, ParseCatalogValueError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Kind of person taking a duty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssigneeKind {
    /// Teaching staff.
    Teacher,
    /// Non-teaching staff.
    Staff,
    /// Students, subject to weekly caps.
    Student,
}

impl AssigneeKind {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Teacher => "teacher",
            Self::Staff => "staff",
            Self::Student => "student",
        }
    }
}

impl fmt::Display for AssigneeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AssigneeKind {
    type Error = ParseCatalogValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "teacher" => Ok(Self::Teacher),
            "staff" => Ok(Self::Staff),
            "student" => Ok(Self::Student),
            _ => Err(ParseCatalogValueError::new("assignee kind", value)),
        }
    }
}

/// Non-empty set of assignee kinds a duty accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<AssigneeKind>", into = "Vec<AssigneeKind>")]
pub struct AssigneeKindSet(BTreeSet<AssigneeKind>);

impl AssigneeKindSet {
    /// Creates a set from the given kinds.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogDomainError::EmptyAssigneeKinds`] when no kind is
    /// given.
    pub fn new(kinds: impl IntoIterator<Item = AssigneeKind>) -> Result<Self, CatalogDomainError> {
        let set: BTreeSet<AssigneeKind> = kinds.into_iter().collect();
        if set.is_empty() {
            return Err(CatalogDomainError::EmptyAssigneeKinds);
        }
        Ok(Self(set))
    }

    /// Returns whether `kind` is allowed.
    #[must_use]
    pub fn allows(&self, kind: AssigneeKind) -> bool {
        self.0.contains(&kind)
    }

    /// Iterates over the allowed kinds in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = AssigneeKind> + '_ {
        self.0.iter().copied()
    }
}

impl TryFrom<Vec<AssigneeKind>> for AssigneeKindSet {
    type Error = CatalogDomainError;

    fn try_from(kinds: Vec<AssigneeKind>) -> Result<Self, Self::Error> {
        Self::new(kinds)
    }
}

impl From<AssigneeKindSet> for Vec<AssigneeKind> {
    fn from(set: AssigneeKindSet) -> Self {
        set.0.into_iter().collect()
    }
}
