//! In-memory roster repository for tests and embedding.
//!
//! A single write lock covers each batch insert and state change, which
//! gives the same all-or-nothing behaviour as the database transaction.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::roster::{
    domain::{
        AssigneeRef, AssignmentId, AssignmentOccurrence, AuditLogEntry, Booking, OccurrenceId,
        RosterAssignment,
    },
    ports::{
        AssignmentBatch, AssignmentDetails, RosterRepository, RosterRepositoryError,
        RosterRepositoryResult, StateChange,
    },
};
use crate::tenant::domain::{TenantContext, TenantId};

/// Thread-safe in-memory roster repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRosterRepository {
    state: Arc<RwLock<RosterState>>,
}

#[derive(Debug, Default)]
struct RosterState {
    assignments: HashMap<(TenantId, AssignmentId), RosterAssignment>,
    occurrences: HashMap<(TenantId, OccurrenceId), AssignmentOccurrence>,
    audit: Vec<(TenantId, AuditLogEntry)>,
}

impl RosterState {
    fn bookings(
        &self,
        tenant: TenantId,
        assignees: &[AssigneeRef],
        from: NaiveDate,
        to: NaiveDate,
    ) -> Vec<Booking> {
        let mut bookings: Vec<Booking> = self
            .occurrences
            .iter()
            .filter(|((owner, _), occurrence)| {
                *owner == tenant
                    && assignees.contains(occurrence.assignee())
                    && occurrence.date() >= from
                    && occurrence.date() <= to
                    && occurrence.status().is_booking()
            })
            .map(|(_, occurrence)| Booking::from(occurrence))
            .collect();
        bookings.sort_by_key(|booking| (booking.date, booking.window.start()));
        bookings
    }

    fn occurrences_of(
        &self,
        tenant: TenantId,
        assignment_id: AssignmentId,
    ) -> Vec<AssignmentOccurrence> {
        let mut occurrences: Vec<AssignmentOccurrence> = self
            .occurrences
            .iter()
            .filter(|((owner, _), occurrence)| {
                *owner == tenant && occurrence.assignment_id() == assignment_id
            })
            .map(|(_, occurrence)| occurrence.clone())
            .collect();
        occurrences.sort_by_key(AssignmentOccurrence::date);
        occurrences
    }

    fn holds_slot(&self, tenant: TenantId, candidate: &AssignmentOccurrence) -> bool {
        if candidate.conflict_override() || candidate.time_slot_id().is_none() {
            return false;
        }
        self.occurrences.iter().any(|((owner, _), existing)| {
            *owner == tenant
                && !existing.conflict_override()
                && existing.status().is_booking()
                && existing.assignee() == candidate.assignee()
                && existing.date() == candidate.date()
                && existing.time_slot_id() == candidate.time_slot_id()
        })
    }
}

impl InMemoryRosterRepository {
    /// Creates an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RosterRepositoryResult<RwLockReadGuard<'_, RosterState>> {
        self.state.read().map_err(|err| {
            RosterRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> RosterRepositoryResult<RwLockWriteGuard<'_, RosterState>> {
        self.state.write().map_err(|err| {
            RosterRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

#[async_trait]
impl RosterRepository for InMemoryRosterRepository {
    async fn find_bookings(
        &self,
        ctx: &TenantContext,
        assignees: &[AssigneeRef],
        from: NaiveDate,
        to: NaiveDate,
    ) -> RosterRepositoryResult<Vec<Booking>> {
        let state = self.read()?;
        Ok(state.bookings(ctx.tenant_id(), assignees, from, to))
    }

    async fn create_assignments(
        &self,
        ctx: &TenantContext,
        batch: AssignmentBatch,
    ) -> RosterRepositoryResult<()> {
        let tenant = ctx.tenant_id();
        let mut state = self.write()?;

        if let Some((from, to)) = batch.guard.lookup_range() {
            let assignees = batch.assignees();
            let bookings = state.bookings(tenant, &assignees, from, to);
            batch.guard.evaluate(&assignees, &bookings)?;
        }
        let races = batch
            .assignments
            .iter()
            .flat_map(|details| details.occurrences.iter())
            .any(|occurrence| state.holds_slot(tenant, occurrence));
        if races {
            return Err(RosterRepositoryError::DuplicateBooking);
        }

        for details in batch.assignments {
            for occurrence in details.occurrences {
                state.occurrences.insert((tenant, occurrence.id()), occurrence);
            }
            state
                .assignments
                .insert((tenant, details.assignment.id()), details.assignment);
        }
        state
            .audit
            .extend(batch.audit.into_iter().map(|entry| (tenant, entry)));
        Ok(())
    }

    async fn find_assignment(
        &self,
        ctx: &TenantContext,
        id: AssignmentId,
    ) -> RosterRepositoryResult<Option<AssignmentDetails>> {
        let tenant = ctx.tenant_id();
        let state = self.read()?;
        Ok(state
            .assignments
            .get(&(tenant, id))
            .map(|assignment| AssignmentDetails {
                assignment: assignment.clone(),
                occurrences: state.occurrences_of(tenant, id),
            }))
    }

    async fn find_occurrence(
        &self,
        ctx: &TenantContext,
        id: OccurrenceId,
    ) -> RosterRepositoryResult<Option<AssignmentOccurrence>> {
        let state = self.read()?;
        Ok(state.occurrences.get(&(ctx.tenant_id(), id)).cloned())
    }

    async fn apply_change(
        &self,
        ctx: &TenantContext,
        change: StateChange,
    ) -> RosterRepositoryResult<()> {
        let tenant = ctx.tenant_id();
        let mut state = self.write()?;

        let assignment_id = change.assignment.id();
        let stored_status = state
            .assignments
            .get(&(tenant, assignment_id))
            .map(RosterAssignment::status);
        if stored_status != Some(change.expected) {
            return Err(RosterRepositoryError::stale_assignment(assignment_id));
        }
        for update in &change.occurrences {
            let occurrence_id = update.occurrence.id();
            let stored = state
                .occurrences
                .get(&(tenant, occurrence_id))
                .map(AssignmentOccurrence::status);
            if stored != Some(update.expected) {
                return Err(RosterRepositoryError::stale_occurrence(occurrence_id));
            }
        }
        for sibling in &change.siblings {
            let stored = state
                .occurrences
                .get(&(tenant, sibling.id))
                .map(AssignmentOccurrence::status);
            if stored != Some(sibling.expected) {
                return Err(RosterRepositoryError::stale_occurrence(sibling.id));
            }
        }

        for update in change.occurrences {
            state
                .occurrences
                .insert((tenant, update.occurrence.id()), update.occurrence);
        }
        state
            .assignments
            .insert((tenant, assignment_id), change.assignment);
        state
            .audit
            .extend(change.audit.into_iter().map(|entry| (tenant, entry)));
        Ok(())
    }

    async fn assignments_for_assignee(
        &self,
        ctx: &TenantContext,
        assignee: &AssigneeRef,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RosterRepositoryResult<Vec<AssignmentDetails>> {
        let tenant = ctx.tenant_id();
        let state = self.read()?;
        let mut found: Vec<AssignmentDetails> = state
            .assignments
            .iter()
            .filter(|((owner, _), assignment)| {
                *owner == tenant && assignment.assignee() == assignee
            })
            .filter_map(|((_, id), assignment)| {
                let occurrences: Vec<AssignmentOccurrence> = state
                    .occurrences_of(tenant, *id)
                    .into_iter()
                    .filter(|occurrence| occurrence.date() >= from && occurrence.date() <= to)
                    .collect();
                (!occurrences.is_empty()).then(|| AssignmentDetails {
                    assignment: assignment.clone(),
                    occurrences,
                })
            })
            .collect();
        found.sort_by_key(|details| {
            (
                details.occurrences.first().map(AssignmentOccurrence::date),
                details.assignment.window().start(),
            )
        });
        Ok(found)
    }

    async fn occurrences_between(
        &self,
        ctx: &TenantContext,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RosterRepositoryResult<Vec<AssignmentOccurrence>> {
        let tenant = ctx.tenant_id();
        let state = self.read()?;
        let mut occurrences: Vec<AssignmentOccurrence> = state
            .occurrences
            .iter()
            .filter(|((owner, _), occurrence)| {
                *owner == tenant && occurrence.date() >= from && occurrence.date() <= to
            })
            .map(|(_, occurrence)| occurrence.clone())
            .collect();
        occurrences.sort_by(|left, right| {
            (left.date(), left.window().start(), left.assignee())
                .cmp(&(right.date(), right.window().start(), right.assignee()))
        });
        Ok(occurrences)
    }

    async fn audit_trail(
        &self,
        ctx: &TenantContext,
        assignment_id: AssignmentId,
    ) -> RosterRepositoryResult<Vec<AuditLogEntry>> {
        let tenant = ctx.tenant_id();
        let state = self.read()?;
        Ok(state
            .audit
            .iter()
            .filter(|(owner, entry)| *owner == tenant && entry.assignment_id() == assignment_id)
            .map(|(_, entry)| entry.clone())
            .collect())
    }
}
