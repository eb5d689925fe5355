//! References to the people a duty is assigned to.

use super::AssigneeId;
use crate::catalog::domain::AssigneeKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind and identifier of an assignee.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssigneeRef {
    kind: AssigneeKind,
    id: AssigneeId,
}

impl AssigneeRef {
    /// Creates an assignee reference.
    #[must_use]
    pub const fn new(kind: AssigneeKind, id: AssigneeId) -> Self {
        Self { kind, id }
    }

    /// Returns the assignee kind.
    #[must_use]
    pub const fn kind(&self) -> AssigneeKind {
        self.kind
    }

    /// Returns the assignee identifier.
    #[must_use]
    pub const fn id(&self) -> &AssigneeId {
        &self.id
    }

    /// Key used to serialize concurrent writers for one assignee.
    #[must_use]
    pub fn lock_key(&self) -> String {
        format!("{}:{}", self.kind.as_str(), self.id)
    }
}

impl fmt::Display for AssigneeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}
