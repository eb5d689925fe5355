//! Read-only roster projections.

use super::error::{NotFoundError, RosterServiceResult, ValidationError};
use crate::roster::{
    domain::{
        AssigneeRef, AssignmentId, AssignmentOccurrence, AuditLogEntry, OccurrenceStatus,
        RosterDomainError,
    },
    ports::{AssignmentDetails, RosterRepository},
};
use crate::tenant::domain::TenantContext;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Occurrence counts and booked time for one assignee over a period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkloadEntry {
    /// Person summarised.
    pub assignee: AssigneeRef,
    /// Occurrences still expected to happen.
    pub live: u32,
    /// Occurrences accepted and not yet completed.
    pub accepted: u32,
    /// Occurrences carried out.
    pub completed: u32,
    /// Occurrences refused.
    pub declined: u32,
    /// Minutes across live and completed occurrences.
    pub total_minutes: i64,
}

impl WorkloadEntry {
    const fn empty(assignee: AssigneeRef) -> Self {
        Self {
            assignee,
            live: 0,
            accepted: 0,
            completed: 0,
            declined: 0,
            total_minutes: 0,
        }
    }

    fn record(&mut self, occurrence: &AssignmentOccurrence) {
        let status = occurrence.status();
        if status.is_live() {
            self.live += 1;
        }
        match status {
            OccurrenceStatus::Accepted => self.accepted += 1,
            OccurrenceStatus::Completed => self.completed += 1,
            OccurrenceStatus::Declined => self.declined += 1,
            OccurrenceStatus::Scheduled
            | OccurrenceStatus::PendingAcceptance
            | OccurrenceStatus::Cancelled => {}
        }
        if status.is_booking() {
            self.total_minutes += occurrence.window().duration_minutes();
        }
    }
}

/// Read-only queries over assignments, occurrences and the audit trail.
#[derive(Clone)]
pub struct RosterReporting<R>
where
    R: RosterRepository,
{
    roster: Arc<R>,
}

impl<R> RosterReporting<R>
where
    R: RosterRepository,
{
    /// Creates a reporting service.
    #[must_use]
    pub const fn new(roster: Arc<R>) -> Self {
        Self { roster }
    }

    /// Lists an assignee's assignments with occurrences in `from..=to`.
    ///
    /// # Errors
    ///
    /// Returns [`super::RosterServiceError::Validation`] when `to` precedes
    /// `from`.
    pub async fn assignments_for_assignee(
        &self,
        ctx: &TenantContext,
        assignee: &AssigneeRef,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RosterServiceResult<Vec<AssignmentDetails>> {
        ensure_range(from, to)?;
        Ok(self
            .roster
            .assignments_for_assignee(ctx, assignee, from, to)
            .await?)
    }

    /// Lists the bookings of one day ordered by start time. Declined and
    /// cancelled occurrences are left out.
    ///
    /// # Errors
    ///
    /// Returns [`super::RosterServiceError::Internal`] when the lookup fails.
    pub async fn roster_for_date(
        &self,
        ctx: &TenantContext,
        date: NaiveDate,
    ) -> RosterServiceResult<Vec<AssignmentOccurrence>> {
        let mut occurrences = self.roster.occurrences_between(ctx, date, date).await?;
        occurrences.retain(|occurrence| occurrence.status().is_booking());
        Ok(occurrences)
    }

    /// Summarises each assignee's occurrences in `from..=to`, ordered by
    /// assignee.
    ///
    /// # Errors
    ///
    /// Returns [`super::RosterServiceError::Validation`] when `to` precedes
    /// `from`.
    pub async fn workload_summary(
        &self,
        ctx: &TenantContext,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RosterServiceResult<Vec<WorkloadEntry>> {
        ensure_range(from, to)?;
        let occurrences = self.roster.occurrences_between(ctx, from, to).await?;
        let mut summary: BTreeMap<AssigneeRef, WorkloadEntry> = BTreeMap::new();
        for occurrence in &occurrences {
            summary
                .entry(occurrence.assignee().clone())
                .or_insert_with_key(|assignee| WorkloadEntry::empty(assignee.clone()))
                .record(occurrence);
        }
        Ok(summary.into_values().collect())
    }

    /// Returns the audit entries of an assignment in recording order.
    ///
    /// # Errors
    ///
    /// Returns [`super::RosterServiceError::NotFound`] when the assignment
    /// does not exist for the tenant.
    pub async fn audit_trail(
        &self,
        ctx: &TenantContext,
        assignment_id: AssignmentId,
    ) -> RosterServiceResult<Vec<AuditLogEntry>> {
        if self.roster.find_assignment(ctx, assignment_id).await?.is_none() {
            return Err(NotFoundError::Assignment(assignment_id).into());
        }
        Ok(self.roster.audit_trail(ctx, assignment_id).await?)
    }
}

fn ensure_range(from: NaiveDate, to: NaiveDate) -> Result<(), ValidationError> {
    if to < from {
        return Err(ValidationError::Domain(RosterDomainError::InvalidDateRange {
            start: from,
            end: to,
        }));
    }
    Ok(())
}
