//! Dated occurrences of an assignment and the acceptance workflow on them.

use super::{
    ActorId, AssigneeRef, AssignmentId, OccurrenceId, OccurrenceStatus, RosterAssignment,
    RosterDomainError,
};
use crate::catalog::domain::{DutyDefinitionId, TimeSlotId, TimeWindow};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Who made a workflow decision and when.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Acting user.
    pub by: ActorId,
    /// Decision time.
    pub at: DateTime<Utc>,
}

/// One calendar occurrence of an assignment.
///
/// Assignee, duty, and slot are copied from the parent so bookings can be
/// checked without joining back to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentOccurrence {
    id: OccurrenceId,
    assignment_id: AssignmentId,
    duty_id: DutyDefinitionId,
    assignee: AssigneeRef,
    time_slot_id: Option<TimeSlotId>,
    date: NaiveDate,
    window: TimeWindow,
    status: OccurrenceStatus,
    conflict_override: bool,
    accepted: Option<Decision>,
    declined: Option<Decision>,
    decline_reason: Option<String>,
    completed: Option<Decision>,
    completion_notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedOccurrence {
    /// Persisted identifier.
    pub id: OccurrenceId,
    /// Parent assignment.
    pub assignment_id: AssignmentId,
    /// Duty of the parent.
    pub duty_id: DutyDefinitionId,
    /// Assignee of the parent.
    pub assignee: AssigneeRef,
    /// Catalog slot of the parent.
    pub time_slot_id: Option<TimeSlotId>,
    /// Calendar date.
    pub date: NaiveDate,
    /// Time window on that date.
    pub window: TimeWindow,
    /// Current status.
    pub status: OccurrenceStatus,
    /// Whether the booking was forced past a conflict.
    pub conflict_override: bool,
    /// Acceptance decision.
    pub accepted: Option<Decision>,
    /// Decline decision.
    pub declined: Option<Decision>,
    /// Decline reason.
    pub decline_reason: Option<String>,
    /// Completion decision.
    pub completed: Option<Decision>,
    /// Completion notes.
    pub completion_notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl AssignmentOccurrence {
    /// Creates the occurrence of `assignment` on `date` with an initial
    /// status.
    #[must_use]
    pub fn new(
        assignment: &RosterAssignment,
        date: NaiveDate,
        status: OccurrenceStatus,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: OccurrenceId::new(),
            assignment_id: assignment.id(),
            duty_id: assignment.duty_id(),
            assignee: assignment.assignee().clone(),
            time_slot_id: assignment.time_slot_id(),
            date,
            window: assignment.window(),
            status,
            conflict_override: assignment.is_overridden(),
            accepted: None,
            declined: None,
            decline_reason: None,
            completed: None,
            completion_notes: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs an occurrence from persistence.
    #[must_use]
    pub fn from_persisted(data: PersistedOccurrence) -> Self {
        Self {
            id: data.id,
            assignment_id: data.assignment_id,
            duty_id: data.duty_id,
            assignee: data.assignee,
            time_slot_id: data.time_slot_id,
            date: data.date,
            window: data.window,
            status: data.status,
            conflict_override: data.conflict_override,
            accepted: data.accepted,
            declined: data.declined,
            decline_reason: data.decline_reason,
            completed: data.completed,
            completion_notes: data.completion_notes,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    fn move_to(
        &mut self,
        next: OccurrenceStatus,
        at: DateTime<Utc>,
    ) -> Result<(), RosterDomainError> {
        if !self.status.can_transition_to(next) {
            return Err(RosterDomainError::InvalidOccurrenceTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = at;
        Ok(())
    }

    /// Records the assignee's acceptance.
    ///
    /// # Errors
    ///
    /// Returns [`RosterDomainError::InvalidOccurrenceTransition`] unless the
    /// occurrence is pending acceptance.
    pub fn accept(&mut self, actor: ActorId, clock: &impl Clock) -> Result<(), RosterDomainError> {
        let at = clock.utc();
        self.move_to(OccurrenceStatus::Accepted, at)?;
        self.accepted = Some(Decision { by: actor, at });
        Ok(())
    }

    /// Records the assignee's refusal with a mandatory reason.
    ///
    /// # Errors
    ///
    /// Returns [`RosterDomainError::EmptyDeclineReason`] for a blank reason
    /// and [`RosterDomainError::InvalidOccurrenceTransition`] unless the
    /// occurrence is pending acceptance.
    pub fn decline(
        &mut self,
        actor: ActorId,
        reason: &str,
        clock: &impl Clock,
    ) -> Result<(), RosterDomainError> {
        let trimmed = reason.trim();
        if trimmed.is_empty() {
            return Err(RosterDomainError::EmptyDeclineReason);
        }
        let at = clock.utc();
        self.move_to(OccurrenceStatus::Declined, at)?;
        self.declined = Some(Decision { by: actor, at });
        self.decline_reason = Some(trimmed.to_owned());
        Ok(())
    }

    /// Records that the duty was carried out.
    ///
    /// # Errors
    ///
    /// Returns [`RosterDomainError::CompletionBeforeDate`] when the
    /// occurrence lies after the clock's current date and
    /// [`RosterDomainError::InvalidOccurrenceTransition`] unless the
    /// occurrence is accepted or scheduled.
    pub fn complete(
        &mut self,
        actor: ActorId,
        notes: Option<String>,
        clock: &impl Clock,
    ) -> Result<(), RosterDomainError> {
        let at = clock.utc();
        let today = at.date_naive();
        if !self.status.can_transition_to(OccurrenceStatus::Completed) {
            return Err(RosterDomainError::InvalidOccurrenceTransition {
                from: self.status,
                to: OccurrenceStatus::Completed,
            });
        }
        if self.date > today {
            return Err(RosterDomainError::CompletionBeforeDate {
                date: self.date,
                today,
            });
        }
        self.move_to(OccurrenceStatus::Completed, at)?;
        self.completed = Some(Decision { by: actor, at });
        self.completion_notes = notes.filter(|text| !text.trim().is_empty());
        Ok(())
    }

    /// Withdraws the occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`RosterDomainError::InvalidOccurrenceTransition`] when the
    /// occurrence is already terminal.
    pub fn cancel(&mut self, clock: &impl Clock) -> Result<(), RosterDomainError> {
        self.move_to(OccurrenceStatus::Cancelled, clock.utc())
    }

    /// Returns the identifier.
    #[must_use]
    pub const fn id(&self) -> OccurrenceId {
        self.id
    }

    /// Returns the parent assignment.
    #[must_use]
    pub const fn assignment_id(&self) -> AssignmentId {
        self.assignment_id
    }

    /// Returns the duty.
    #[must_use]
    pub const fn duty_id(&self) -> DutyDefinitionId {
        self.duty_id
    }

    /// Returns the assignee.
    #[must_use]
    pub const fn assignee(&self) -> &AssigneeRef {
        &self.assignee
    }

    /// Returns the catalog slot, if any.
    #[must_use]
    pub const fn time_slot_id(&self) -> Option<TimeSlotId> {
        self.time_slot_id
    }

    /// Returns the calendar date.
    #[must_use]
    pub const fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the time window.
    #[must_use]
    pub const fn window(&self) -> TimeWindow {
        self.window
    }

    /// Returns the status.
    #[must_use]
    pub const fn status(&self) -> OccurrenceStatus {
        self.status
    }

    /// Returns whether the booking was forced past a conflict.
    #[must_use]
    pub const fn conflict_override(&self) -> bool {
        self.conflict_override
    }

    /// Returns the acceptance decision.
    #[must_use]
    pub const fn accepted(&self) -> Option<&Decision> {
        self.accepted.as_ref()
    }

    /// Returns the decline decision.
    #[must_use]
    pub const fn declined(&self) -> Option<&Decision> {
        self.declined.as_ref()
    }

    /// Returns the decline reason.
    #[must_use]
    pub fn decline_reason(&self) -> Option<&str> {
        self.decline_reason.as_deref()
    }

    /// Returns the completion decision.
    #[must_use]
    pub const fn completed(&self) -> Option<&Decision> {
        self.completed.as_ref()
    }

    /// Returns the completion notes.
    #[must_use]
    pub fn completion_notes(&self) -> Option<&str> {
        self.completion_notes.as_deref()
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
