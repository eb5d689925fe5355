//! The roster assignment aggregate.

use super::{
    ActorId, AssigneeId, AssigneeRef, AssignmentId, AssignmentStatus, LocationSelection,
    Recurrence, RosterDomainError,
};
use crate::catalog::domain::{DutyDefinitionId, RoleId, TimeSlotId, TimeWindow};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Fields of a new assignment, already validated against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAssignment {
    /// Duty being assigned.
    pub duty_id: DutyDefinitionId,
    /// When the duty recurs.
    pub recurrence: Recurrence,
    /// Catalog slot, absent for custom windows.
    pub time_slot_id: Option<TimeSlotId>,
    /// Effective time window.
    pub window: TimeWindow,
    /// Where the duty happens.
    pub location: Option<LocationSelection>,
    /// Person taking the duty.
    pub assignee: AssigneeRef,
    /// Supervising staff member.
    pub supervisor_id: Option<AssigneeId>,
    /// Role held on the duty.
    pub role_id: Option<RoleId>,
    /// Initial status.
    pub status: AssignmentStatus,
    /// Whether occurrences need the assignee's acceptance.
    pub acceptance_required: bool,
    /// Reason recorded when conflicts were overridden.
    pub override_reason: Option<String>,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Administrator creating the assignment.
    pub created_by: ActorId,
}

/// A duty bound to an assignee over a date pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterAssignment {
    id: AssignmentId,
    duty_id: DutyDefinitionId,
    recurrence: Recurrence,
    time_slot_id: Option<TimeSlotId>,
    window: TimeWindow,
    location: Option<LocationSelection>,
    assignee: AssigneeRef,
    supervisor_id: Option<AssigneeId>,
    role_id: Option<RoleId>,
    status: AssignmentStatus,
    acceptance_required: bool,
    override_reason: Option<String>,
    notes: Option<String>,
    created_by: ActorId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedAssignment {
    /// Persisted identifier.
    pub id: AssignmentId,
    /// Persisted field values.
    pub fields: NewAssignment,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl RosterAssignment {
    /// Creates an assignment with a fresh identifier.
    #[must_use]
    pub fn new(fields: NewAssignment, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self::from_persisted(PersistedAssignment {
            id: AssignmentId::new(),
            fields,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Reconstructs an assignment from persistence.
    #[must_use]
    pub fn from_persisted(data: PersistedAssignment) -> Self {
        let PersistedAssignment {
            id,
            fields,
            created_at,
            updated_at,
        } = data;
        Self {
            id,
            duty_id: fields.duty_id,
            recurrence: fields.recurrence,
            time_slot_id: fields.time_slot_id,
            window: fields.window,
            location: fields.location,
            assignee: fields.assignee,
            supervisor_id: fields.supervisor_id,
            role_id: fields.role_id,
            status: fields.status,
            acceptance_required: fields.acceptance_required,
            override_reason: fields.override_reason,
            notes: fields.notes,
            created_by: fields.created_by,
            created_at,
            updated_at,
        }
    }

    /// Moves the assignment to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`RosterDomainError::InvalidAssignmentTransition`] when the
    /// transition table forbids the move.
    pub fn transition_to(
        &mut self,
        next: AssignmentStatus,
        clock: &impl Clock,
    ) -> Result<(), RosterDomainError> {
        if !self.status.can_transition_to(next) {
            return Err(RosterDomainError::InvalidAssignmentTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = clock.utc();
        Ok(())
    }

    /// Status that follows approval under the acceptance policy captured at
    /// creation.
    #[must_use]
    pub const fn status_after_approval(&self) -> AssignmentStatus {
        if self.acceptance_required {
            AssignmentStatus::PendingAcceptance
        } else {
            AssignmentStatus::Scheduled
        }
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> AssignmentId {
        self.id
    }

    /// Returns the duty.
    #[must_use]
    pub const fn duty_id(&self) -> DutyDefinitionId {
        self.duty_id
    }

    /// Returns the recurrence pattern.
    #[must_use]
    pub const fn recurrence(&self) -> &Recurrence {
        &self.recurrence
    }

    /// Returns the catalog slot, if any.
    #[must_use]
    pub const fn time_slot_id(&self) -> Option<TimeSlotId> {
        self.time_slot_id
    }

    /// Returns the effective time window.
    #[must_use]
    pub const fn window(&self) -> TimeWindow {
        self.window
    }

    /// Returns the location.
    #[must_use]
    pub const fn location(&self) -> Option<&LocationSelection> {
        self.location.as_ref()
    }

    /// Returns the assignee.
    #[must_use]
    pub const fn assignee(&self) -> &AssigneeRef {
        &self.assignee
    }

    /// Returns the supervisor.
    #[must_use]
    pub const fn supervisor_id(&self) -> Option<&AssigneeId> {
        self.supervisor_id.as_ref()
    }

    /// Returns the role.
    #[must_use]
    pub const fn role_id(&self) -> Option<RoleId> {
        self.role_id
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> AssignmentStatus {
        self.status
    }

    /// Returns whether occurrences needed acceptance at creation.
    #[must_use]
    pub const fn acceptance_required(&self) -> bool {
        self.acceptance_required
    }

    /// Returns the conflict override reason, if conflicts were forced.
    #[must_use]
    pub fn override_reason(&self) -> Option<&str> {
        self.override_reason.as_deref()
    }

    /// Returns whether conflicts were overridden.
    #[must_use]
    pub const fn is_overridden(&self) -> bool {
        self.override_reason.is_some()
    }

    /// Returns the notes.
    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Returns the creating administrator.
    #[must_use]
    pub const fn created_by(&self) -> &ActorId {
        &self.created_by
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
