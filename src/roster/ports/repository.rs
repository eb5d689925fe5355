//! Repository port for assignments, occurrences, and the audit log.

use crate::catalog::domain::{AssigneeKind, TimeWindow};
use crate::roster::domain::{
    AssigneeRef, AssignmentId, AssignmentOccurrence, AssignmentStatus, AuditLogEntry, Booking,
    CapacityBreach, ConflictReport, OccurrenceId, OccurrenceStatus, RosterAssignment, WeeklyLoad,
    week_start,
};
use crate::tenant::domain::TenantContext;
use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use std::sync::Arc;
use thiserror::Error;

/// Result type for roster repository operations.
pub type RosterRepositoryResult<T> = Result<T, RosterRepositoryError>;

/// An assignment together with its occurrences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentDetails {
    /// The assignment.
    pub assignment: RosterAssignment,
    /// Its occurrences in date order.
    pub occurrences: Vec<AssignmentOccurrence>,
}

/// Checks the repository repeats inside the insert transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingGuard {
    /// Proposed window.
    pub window: TimeWindow,
    /// Proposed dates.
    pub dates: Vec<NaiveDate>,
    /// Reject overlaps with existing bookings. Cleared by an override.
    pub enforce_conflicts: bool,
    /// Weekly cap applied to student assignees.
    pub student_weekly_cap: Option<u16>,
}

impl BookingGuard {
    /// Date range whose bookings the guard needs: the full ISO weeks
    /// spanned by the proposed dates. `None` when there are no dates.
    #[must_use]
    pub fn lookup_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.dates.iter().min()?;
        let last = self.dates.iter().max()?;
        let from = week_start(*first);
        let to = week_start(*last) + Days::new(6);
        Some((from, to))
    }

    /// Runs the weekly cap check and then the conflict check for
    /// `assignees` against existing `bookings`.
    ///
    /// # Errors
    ///
    /// Returns [`RosterRepositoryError::CapacityExceeded`] for the first
    /// student over the cap, then [`RosterRepositoryError::Conflict`] when
    /// conflicts are enforced and any assignee is double-booked.
    pub fn evaluate(
        &self,
        assignees: &[AssigneeRef],
        bookings: &[Booking],
    ) -> RosterRepositoryResult<()> {
        if let Some(cap) = self.student_weekly_cap {
            for assignee in assignees
                .iter()
                .filter(|assignee| assignee.kind() == AssigneeKind::Student)
            {
                WeeklyLoad::from_bookings(assignee, bookings)
                    .check(assignee, &self.dates, cap)
                    .map_err(RosterRepositoryError::CapacityExceeded)?;
            }
        }
        if self.enforce_conflicts {
            let report = ConflictReport::build(self.window, assignees, &self.dates, bookings);
            if report.has_conflicts() {
                return Err(RosterRepositoryError::Conflict(report));
            }
        }
        Ok(())
    }
}

/// Assignments created together by one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentBatch {
    /// One entry per assignee.
    pub assignments: Vec<AssignmentDetails>,
    /// Audit entries written with the batch.
    pub audit: Vec<AuditLogEntry>,
    /// Checks repeated under lock before inserting.
    pub guard: BookingGuard,
}

impl AssignmentBatch {
    /// Returns the assignees of the batch in insertion order.
    #[must_use]
    pub fn assignees(&self) -> Vec<AssigneeRef> {
        self.assignments
            .iter()
            .map(|details| details.assignment.assignee().clone())
            .collect()
    }
}

/// New state of an occurrence and the status it must still have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccurrenceChange {
    /// Updated occurrence.
    pub occurrence: AssignmentOccurrence,
    /// Status the stored row must have for the change to apply.
    pub expected: OccurrenceStatus,
}

/// Status an untouched occurrence must still have for a change to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiblingStatus {
    /// Occurrence identifier.
    pub id: OccurrenceId,
    /// Status the new assignment status was derived from.
    pub expected: OccurrenceStatus,
}

/// A workflow transition persisted atomically with its audit entries.
///
/// Adapters serialize changes per assignment and verify every expected
/// status before writing, so a derived assignment status never rests on
/// occurrence statuses another writer has since replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChange {
    /// Updated assignment.
    pub assignment: RosterAssignment,
    /// Status the stored assignment must have for the change to apply.
    pub expected: AssignmentStatus,
    /// Updated occurrences.
    pub occurrences: Vec<OccurrenceChange>,
    /// Unmodified occurrences the assignment status was derived from.
    pub siblings: Vec<SiblingStatus>,
    /// Audit entries appended with the change.
    pub audit: Vec<AuditLogEntry>,
}

/// Tenant-scoped roster persistence contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RosterRepository: Send + Sync {
    /// Returns occurrences of `assignees` between `from` and `to` inclusive
    /// whose status counts as a booking.
    async fn find_bookings(
        &self,
        ctx: &TenantContext,
        assignees: &[AssigneeRef],
        from: NaiveDate,
        to: NaiveDate,
    ) -> RosterRepositoryResult<Vec<Booking>>;

    /// Inserts a batch of assignments, their occurrences, and audit entries
    /// in one transaction after repeating the guard checks.
    ///
    /// # Errors
    ///
    /// Returns [`RosterRepositoryError::CapacityExceeded`] or
    /// [`RosterRepositoryError::Conflict`] when a guard check fails, and
    /// [`RosterRepositoryError::DuplicateBooking`] when a concurrent writer
    /// booked the same slot first. Nothing is written on error.
    async fn create_assignments(
        &self,
        ctx: &TenantContext,
        batch: AssignmentBatch,
    ) -> RosterRepositoryResult<()>;

    /// Loads an assignment with its occurrences.
    async fn find_assignment(
        &self,
        ctx: &TenantContext,
        id: AssignmentId,
    ) -> RosterRepositoryResult<Option<AssignmentDetails>>;

    /// Loads a single occurrence.
    async fn find_occurrence(
        &self,
        ctx: &TenantContext,
        id: OccurrenceId,
    ) -> RosterRepositoryResult<Option<AssignmentOccurrence>>;

    /// Persists a transition and appends its audit entries atomically.
    ///
    /// # Errors
    ///
    /// Returns [`RosterRepositoryError::StaleState`] when a stored status no
    /// longer matches the expected one. Nothing is written on error.
    async fn apply_change(
        &self,
        ctx: &TenantContext,
        change: StateChange,
    ) -> RosterRepositoryResult<()>;

    /// Returns the assignments of `assignee` with occurrences between `from`
    /// and `to` inclusive, restricted to those occurrences.
    async fn assignments_for_assignee(
        &self,
        ctx: &TenantContext,
        assignee: &AssigneeRef,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RosterRepositoryResult<Vec<AssignmentDetails>>;

    /// Returns every occurrence between `from` and `to` inclusive, ordered
    /// by date and start time.
    async fn occurrences_between(
        &self,
        ctx: &TenantContext,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RosterRepositoryResult<Vec<AssignmentOccurrence>>;

    /// Returns the audit entries of an assignment in recording order.
    async fn audit_trail(
        &self,
        ctx: &TenantContext,
        assignment_id: AssignmentId,
    ) -> RosterRepositoryResult<Vec<AuditLogEntry>>;
}

/// Errors returned by roster repository implementations.
#[derive(Debug, Clone, Error)]
pub enum RosterRepositoryError {
    /// The in-transaction conflict check found overlaps.
    #[error("booking conflict detected while inserting")]
    Conflict(ConflictReport),

    /// The in-transaction weekly cap check failed.
    #[error(transparent)]
    CapacityExceeded(CapacityBreach),

    /// A concurrent writer booked the same assignee, date, and slot.
    #[error("a concurrent booking already holds this slot")]
    DuplicateBooking,

    /// A stored status changed since it was read.
    #[error("{entity} {id} was modified concurrently")]
    StaleState {
        /// Kind of record.
        entity: &'static str,
        /// Rendered identifier.
        id: String,
    },

    /// Stored data could not be reconstructed into domain types.
    #[error("invalid persisted roster data: {0}")]
    InvalidPersistedData(Arc<dyn std::error::Error + Send + Sync>),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl RosterRepositoryError {
    /// Builds a stale-state error for an assignment.
    #[must_use]
    pub fn stale_assignment(id: AssignmentId) -> Self {
        Self::StaleState {
            entity: "assignment",
            id: id.to_string(),
        }
    }

    /// Builds a stale-state error for an occurrence.
    #[must_use]
    pub fn stale_occurrence(id: OccurrenceId) -> Self {
        Self::StaleState {
            entity: "occurrence",
            id: id.to_string(),
        }
    }

    /// Wraps persisted-data decoding or validation failures.
    pub fn invalid_persisted_data(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::InvalidPersistedData(Arc::new(err))
    }

    /// Wraps a persistence-layer failure.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
