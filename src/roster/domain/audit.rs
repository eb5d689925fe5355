//! Append-only audit log of roster state changes.

use super::{
    ActorId, AssignmentId, AssignmentStatus, AuditEntryId, OccurrenceId, OccurrenceStatus,
    ParseRosterValueError,
};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of change recorded by an audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    /// Assignment created.
    Created,
    /// Assignment forced past detected conflicts.
    ConflictOverridden,
    /// Assignment approved by an administrator.
    Approved,
    /// Assignment cancelled.
    Cancelled,
    /// Occurrence accepted by the assignee.
    OccurrenceAccepted,
    /// Occurrence declined by the assignee.
    OccurrenceDeclined,
    /// Occurrence carried out.
    OccurrenceCompleted,
    /// Single occurrence withdrawn.
    OccurrenceCancelled,
}

impl AuditAction {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::ConflictOverridden => "conflict_overridden",
            Self::Approved => "approved",
            Self::Cancelled => "cancelled",
            Self::OccurrenceAccepted => "occurrence_accepted",
            Self::OccurrenceDeclined => "occurrence_declined",
            Self::OccurrenceCompleted => "occurrence_completed",
            Self::OccurrenceCancelled => "occurrence_cancelled",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AuditAction {
    type Error = ParseRosterValueError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "created" => Ok(Self::Created),
            "conflict_overridden" => Ok(Self::ConflictOverridden),
            "approved" => Ok(Self::Approved),
            "cancelled" => Ok(Self::Cancelled),
            "occurrence_accepted" => Ok(Self::OccurrenceAccepted),
            "occurrence_declined" => Ok(Self::OccurrenceDeclined),
            "occurrence_completed" => Ok(Self::OccurrenceCompleted),
            "occurrence_cancelled" => Ok(Self::OccurrenceCancelled),
            _ => Err(ParseRosterValueError::new("audit action", value)),
        }
    }
}

/// State captured before or after a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "entity", rename_all = "snake_case")]
pub enum AuditSnapshot {
    /// Assignment-level state.
    Assignment {
        /// Assignment status.
        status: AssignmentStatus,
    },
    /// Occurrence-level state.
    Occurrence {
        /// Occurrence date.
        date: NaiveDate,
        /// Occurrence status.
        status: OccurrenceStatus,
    },
}

/// Write-once record of a state change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    id: AuditEntryId,
    assignment_id: AssignmentId,
    occurrence_id: Option<OccurrenceId>,
    action: AuditAction,
    before: Option<AuditSnapshot>,
    after: Option<AuditSnapshot>,
    actor: ActorId,
    reason: Option<String>,
    recorded_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted audit entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAuditEntry {
    /// Persisted identifier.
    pub id: AuditEntryId,
    /// Assignment concerned.
    pub assignment_id: AssignmentId,
    /// Occurrence concerned, for occurrence-level actions.
    pub occurrence_id: Option<OccurrenceId>,
    /// Recorded action.
    pub action: AuditAction,
    /// State before the change.
    pub before: Option<AuditSnapshot>,
    /// State after the change.
    pub after: Option<AuditSnapshot>,
    /// Acting user.
    pub actor: ActorId,
    /// Free-text reason.
    pub reason: Option<String>,
    /// Recording time.
    pub recorded_at: DateTime<Utc>,
}

impl AuditLogEntry {
    /// Starts an entry for `action` on an assignment.
    #[must_use]
    pub fn new(
        assignment_id: AssignmentId,
        action: AuditAction,
        actor: ActorId,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: AuditEntryId::new(),
            assignment_id,
            occurrence_id: None,
            action,
            before: None,
            after: None,
            actor,
            reason: None,
            recorded_at: clock.utc(),
        }
    }

    /// Attaches the occurrence concerned.
    #[must_use]
    pub const fn for_occurrence(mut self, occurrence_id: OccurrenceId) -> Self {
        self.occurrence_id = Some(occurrence_id);
        self
    }

    /// Records the state before and after the change.
    #[must_use]
    pub const fn with_change(
        mut self,
        before: Option<AuditSnapshot>,
        after: AuditSnapshot,
    ) -> Self {
        self.before = before;
        self.after = Some(after);
        self
    }

    /// Records a free-text reason.
    #[must_use]
    pub fn with_reason(mut self, reason: Option<String>) -> Self {
        self.reason = reason;
        self
    }

    /// Reconstructs an entry from persistence.
    #[must_use]
    pub fn from_persisted(data: PersistedAuditEntry) -> Self {
        Self {
            id: data.id,
            assignment_id: data.assignment_id,
            occurrence_id: data.occurrence_id,
            action: data.action,
            before: data.before,
            after: data.after,
            actor: data.actor,
            reason: data.reason,
            recorded_at: data.recorded_at,
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> AuditEntryId {
        self.id
    }

    /// Returns the assignment concerned.
    #[must_use]
    pub const fn assignment_id(&self) -> AssignmentId {
        self.assignment_id
    }

    /// Returns the occurrence concerned.
    #[must_use]
    pub const fn occurrence_id(&self) -> Option<OccurrenceId> {
        self.occurrence_id
    }

    /// Returns the recorded action.
    #[must_use]
    pub const fn action(&self) -> AuditAction {
        self.action
    }

    /// Returns the state before the change.
    #[must_use]
    pub const fn before(&self) -> Option<AuditSnapshot> {
        self.before
    }

    /// Returns the state after the change.
    #[must_use]
    pub const fn after(&self) -> Option<AuditSnapshot> {
        self.after
    }

    /// Returns the acting user.
    #[must_use]
    pub const fn actor(&self) -> &ActorId {
        &self.actor
    }

    /// Returns the reason.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Returns the recording time.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }
}
