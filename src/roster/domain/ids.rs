//! Identifier types for roster records and the people they reference.

use super::RosterDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! roster_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the wrapped UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

roster_id!(
    /// Unique identifier for a roster assignment.
    AssignmentId
);
roster_id!(
    /// Unique identifier for one dated occurrence of an assignment.
    OccurrenceId
);
roster_id!(
    /// Unique identifier for an audit log entry.
    AuditEntryId
);

const MAX_EXTERNAL_ID_LENGTH: usize = 64;

fn normalize_external_id(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let is_valid = !trimmed.is_empty()
        && trimmed.len() <= MAX_EXTERNAL_ID_LENGTH
        && !trimmed.chars().any(char::is_whitespace);
    is_valid.then(|| trimmed.to_owned())
}

/// Opaque identifier of a teacher, staff member, or student held by the
/// wider school system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AssigneeId(String);

impl AssigneeId {
    /// Creates a validated assignee identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RosterDomainError::InvalidAssigneeId`] for blank values,
    /// values with inner whitespace, or values longer than 64 bytes.
    pub fn new(value: impl Into<String>) -> Result<Self, RosterDomainError> {
        let raw = value.into();
        normalize_external_id(&raw)
            .map(Self)
            .ok_or(RosterDomainError::InvalidAssigneeId(raw))
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AssigneeId {
    type Error = RosterDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AssigneeId> for String {
    fn from(id: AssigneeId) -> Self {
        id.0
    }
}

impl fmt::Display for AssigneeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of the user performing an action, recorded in the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActorId(String);

impl ActorId {
    /// Creates a validated actor identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RosterDomainError::InvalidActorId`] under the same rules as
    /// [`AssigneeId::new`].
    pub fn new(value: impl Into<String>) -> Result<Self, RosterDomainError> {
        let raw = value.into();
        normalize_external_id(&raw)
            .map(Self)
            .ok_or(RosterDomainError::InvalidActorId(raw))
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ActorId {
    type Error = RosterDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ActorId> for String {
    fn from(id: ActorId) -> Self {
        id.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
