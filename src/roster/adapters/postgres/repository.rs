//! `PostgreSQL` implementation of the roster repository.
//!
//! Batch inserts take transaction-scoped advisory locks on every affected
//! assignee before re-running the booking checks, so concurrent creators
//! for the same person serialize. A partial unique index on live,
//! non-overridden bookings backs this up for the catalog slot case.

use super::{
    models::{AssignmentRow, AuditRow, OccurrenceRow},
    schema::{roster_assignments, roster_audit_log, roster_occurrences},
};
use crate::catalog::domain::{AssigneeKind, DutyDefinitionId, RoleId, TimeSlotId, TimeWindow};
use crate::roster::{
    domain::{
        ActorId, AssigneeId, AssigneeRef, AssignmentId, AssignmentOccurrence, AssignmentStatus,
        AuditAction, AuditEntryId, AuditLogEntry, AuditSnapshot, Booking, Decision,
        LocationSelection, NewAssignment, OccurrenceId, OccurrenceStatus, ParseRosterValueError,
        PersistedAssignment, PersistedAuditEntry, PersistedOccurrence, Recurrence,
        RosterAssignment,
    },
    ports::{
        AssignmentBatch, AssignmentDetails, RosterRepository, RosterRepositoryError,
        RosterRepositoryResult, SiblingStatus, StateChange,
    },
};
use crate::tenant::domain::{TenantContext, TenantId};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sql_types::Text;
use std::collections::BTreeMap;
use tracing::debug;

/// `PostgreSQL` connection pool type used by roster adapters.
pub type RosterPgPool = Pool<ConnectionManager<PgConnection>>;

/// Name of the partial unique index guarding live catalog-slot bookings.
const LIVE_BOOKING_INDEX: &str = "uq_roster_occurrences_live_booking";

/// `PostgreSQL`-backed roster repository.
#[derive(Debug, Clone)]
pub struct PostgresRosterRepository {
    pool: RosterPgPool,
}

impl PostgresRosterRepository {
    /// Creates a repository over a tenant database pool.
    #[must_use]
    pub const fn new(pool: RosterPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> RosterRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> RosterRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(RosterRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(RosterRepositoryError::persistence)?
    }
}

impl From<DieselError> for RosterRepositoryError {
    fn from(err: DieselError) -> Self {
        let duplicate = matches!(
            &err,
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)
                if info.constraint_name() == Some(LIVE_BOOKING_INDEX)
        );
        if duplicate {
            Self::DuplicateBooking
        } else {
            Self::persistence(err)
        }
    }
}

fn lock_assignees(
    connection: &mut PgConnection,
    tenant: TenantId,
    assignees: &[AssigneeRef],
) -> RosterRepositoryResult<()> {
    let mut keys: Vec<String> = assignees
        .iter()
        .map(|assignee| format!("{tenant}:{}", assignee.lock_key()))
        .collect();
    keys.sort();
    keys.dedup();
    for key in keys {
        diesel::sql_query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind::<Text, _>(key)
            .execute(connection)?;
    }
    Ok(())
}

fn load_bookings(
    connection: &mut PgConnection,
    tenant: TenantId,
    assignees: &[AssigneeRef],
    from: NaiveDate,
    to: NaiveDate,
) -> RosterRepositoryResult<Vec<Booking>> {
    let ids: Vec<String> = assignees
        .iter()
        .map(|assignee| assignee.id().as_str().to_owned())
        .collect();
    let statuses: Vec<&'static str> = OccurrenceStatus::BOOKINGS
        .iter()
        .map(|status| status.as_str())
        .collect();
    let rows = roster_occurrences::table
        .filter(roster_occurrences::tenant_id.eq(tenant.into_inner()))
        .filter(roster_occurrences::assignee_id.eq_any(ids))
        .filter(roster_occurrences::occurrence_date.between(from, to))
        .filter(roster_occurrences::status.eq_any(statuses))
        .order((
            roster_occurrences::occurrence_date.asc(),
            roster_occurrences::start_time.asc(),
        ))
        .select(OccurrenceRow::as_select())
        .load::<OccurrenceRow>(connection)?;

    let mut bookings = Vec::with_capacity(rows.len());
    for row in rows {
        let occurrence = row_to_occurrence(row)?;
        if assignees.contains(occurrence.assignee()) {
            bookings.push(Booking::from(&occurrence));
        }
    }
    Ok(bookings)
}

fn load_occurrences_of(
    connection: &mut PgConnection,
    tenant: TenantId,
    assignment_id: AssignmentId,
) -> RosterRepositoryResult<Vec<AssignmentOccurrence>> {
    roster_occurrences::table
        .filter(roster_occurrences::tenant_id.eq(tenant.into_inner()))
        .filter(roster_occurrences::assignment_id.eq(assignment_id.into_inner()))
        .order(roster_occurrences::occurrence_date.asc())
        .select(OccurrenceRow::as_select())
        .load::<OccurrenceRow>(connection)?
        .into_iter()
        .map(row_to_occurrence)
        .collect()
}

/// Fails with a stale-state error when an untouched occurrence no longer
/// has the status the change was derived from.
fn verify_siblings(
    tx: &mut PgConnection,
    tenant: TenantId,
    siblings: &[SiblingStatus],
) -> RosterRepositoryResult<()> {
    if siblings.is_empty() {
        return Ok(());
    }
    let ids: Vec<uuid::Uuid> = siblings.iter().map(|sibling| sibling.id.into_inner()).collect();
    let stored: BTreeMap<uuid::Uuid, String> = roster_occurrences::table
        .filter(roster_occurrences::tenant_id.eq(tenant.into_inner()))
        .filter(roster_occurrences::id.eq_any(&ids))
        .select((roster_occurrences::id, roster_occurrences::status))
        .load::<(uuid::Uuid, String)>(tx)?
        .into_iter()
        .collect();
    for sibling in siblings {
        let current = stored.get(&sibling.id.into_inner()).map(String::as_str);
        if current != Some(sibling.expected.as_str()) {
            return Err(RosterRepositoryError::stale_occurrence(sibling.id));
        }
    }
    Ok(())
}

fn insert_audit(
    connection: &mut PgConnection,
    tenant: TenantId,
    entries: &[AuditLogEntry],
) -> RosterRepositoryResult<()> {
    if entries.is_empty() {
        return Ok(());
    }
    let rows = entries
        .iter()
        .map(|entry| audit_to_row(tenant, entry))
        .collect::<RosterRepositoryResult<Vec<_>>>()?;
    diesel::insert_into(roster_audit_log::table)
        .values(&rows)
        .execute(connection)?;
    Ok(())
}

#[async_trait]
impl RosterRepository for PostgresRosterRepository {
    async fn find_bookings(
        &self,
        ctx: &TenantContext,
        assignees: &[AssigneeRef],
        from: NaiveDate,
        to: NaiveDate,
    ) -> RosterRepositoryResult<Vec<Booking>> {
        let tenant = ctx.tenant_id();
        let lookup = assignees.to_vec();
        self.run_blocking(move |connection| load_bookings(connection, tenant, &lookup, from, to))
            .await
    }

    async fn create_assignments(
        &self,
        ctx: &TenantContext,
        batch: AssignmentBatch,
    ) -> RosterRepositoryResult<()> {
        let tenant = ctx.tenant_id();
        let assignees = batch.assignees();
        let mut assignment_rows = Vec::with_capacity(batch.assignments.len());
        let mut occurrence_rows = Vec::new();
        for details in &batch.assignments {
            assignment_rows.push(assignment_to_row(tenant, &details.assignment)?);
            for occurrence in &details.occurrences {
                occurrence_rows.push(occurrence_to_row(tenant, occurrence));
            }
        }

        self.run_blocking(move |connection| {
            connection.transaction::<_, RosterRepositoryError, _>(|tx| {
                lock_assignees(tx, tenant, &assignees)?;
                if let Some((from, to)) = batch.guard.lookup_range() {
                    let bookings = load_bookings(tx, tenant, &assignees, from, to)?;
                    batch.guard.evaluate(&assignees, &bookings)?;
                }
                diesel::insert_into(roster_assignments::table)
                    .values(&assignment_rows)
                    .execute(tx)?;
                diesel::insert_into(roster_occurrences::table)
                    .values(&occurrence_rows)
                    .execute(tx)?;
                insert_audit(tx, tenant, &batch.audit)?;
                debug!(
                    tenant = %tenant,
                    assignments = assignment_rows.len(),
                    occurrences = occurrence_rows.len(),
                    "roster batch committed"
                );
                Ok(())
            })
        })
        .await
    }

    async fn find_assignment(
        &self,
        ctx: &TenantContext,
        id: AssignmentId,
    ) -> RosterRepositoryResult<Option<AssignmentDetails>> {
        let tenant = ctx.tenant_id();
        self.run_blocking(move |connection| {
            let row = roster_assignments::table
                .filter(roster_assignments::tenant_id.eq(tenant.into_inner()))
                .filter(roster_assignments::id.eq(id.into_inner()))
                .select(AssignmentRow::as_select())
                .first::<AssignmentRow>(connection)
                .optional()?;
            let Some(found) = row else {
                return Ok(None);
            };
            Ok(Some(AssignmentDetails {
                assignment: row_to_assignment(found)?,
                occurrences: load_occurrences_of(connection, tenant, id)?,
            }))
        })
        .await
    }

    async fn find_occurrence(
        &self,
        ctx: &TenantContext,
        id: OccurrenceId,
    ) -> RosterRepositoryResult<Option<AssignmentOccurrence>> {
        let tenant = ctx.tenant_id().into_inner();
        self.run_blocking(move |connection| {
            let row = roster_occurrences::table
                .filter(roster_occurrences::tenant_id.eq(tenant))
                .filter(roster_occurrences::id.eq(id.into_inner()))
                .select(OccurrenceRow::as_select())
                .first::<OccurrenceRow>(connection)
                .optional()?;
            row.map(row_to_occurrence).transpose()
        })
        .await
    }

    async fn apply_change(
        &self,
        ctx: &TenantContext,
        change: StateChange,
    ) -> RosterRepositoryResult<()> {
        let tenant = ctx.tenant_id();
        let assignment_id = change.assignment.id();
        let assignment_row = assignment_to_row(tenant, &change.assignment)?;
        let expected_status = change.expected.as_str();
        let occurrence_updates: Vec<(OccurrenceId, OccurrenceRow, &'static str)> = change
            .occurrences
            .iter()
            .map(|update| {
                (
                    update.occurrence.id(),
                    occurrence_to_row(tenant, &update.occurrence),
                    update.expected.as_str(),
                )
            })
            .collect();
        let siblings = change.siblings;
        let audit = change.audit;

        self.run_blocking(move |connection| {
            connection.transaction::<_, RosterRepositoryError, _>(|tx| {
                // Row lock serializes changes to the same assignment; later
                // statements in this transaction see the winner's writes.
                let locked = roster_assignments::table
                    .filter(roster_assignments::tenant_id.eq(tenant.into_inner()))
                    .filter(roster_assignments::id.eq(assignment_id.into_inner()))
                    .select(roster_assignments::id)
                    .for_update()
                    .first::<uuid::Uuid>(tx)
                    .optional()?;
                if locked.is_none() {
                    return Err(RosterRepositoryError::stale_assignment(assignment_id));
                }
                verify_siblings(tx, tenant, &siblings)?;

                let updated = diesel::update(
                    roster_assignments::table
                        .filter(roster_assignments::tenant_id.eq(tenant.into_inner()))
                        .filter(roster_assignments::id.eq(assignment_id.into_inner()))
                        .filter(roster_assignments::status.eq(expected_status)),
                )
                .set(&assignment_row)
                .execute(tx)?;
                if updated == 0 {
                    return Err(RosterRepositoryError::stale_assignment(assignment_id));
                }

                for (occurrence_id, row, expected) in &occurrence_updates {
                    let changed = diesel::update(
                        roster_occurrences::table
                            .filter(roster_occurrences::tenant_id.eq(tenant.into_inner()))
                            .filter(roster_occurrences::id.eq(occurrence_id.into_inner()))
                            .filter(roster_occurrences::status.eq(*expected)),
                    )
                    .set(row)
                    .execute(tx)?;
                    if changed == 0 {
                        return Err(RosterRepositoryError::stale_occurrence(*occurrence_id));
                    }
                }

                insert_audit(tx, tenant, &audit)
            })
        })
        .await
    }

    async fn assignments_for_assignee(
        &self,
        ctx: &TenantContext,
        assignee: &AssigneeRef,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RosterRepositoryResult<Vec<AssignmentDetails>> {
        let tenant = ctx.tenant_id();
        let kind = assignee.kind().as_str();
        let external_id = assignee.id().as_str().to_owned();
        self.run_blocking(move |connection| {
            let occurrence_rows = roster_occurrences::table
                .filter(roster_occurrences::tenant_id.eq(tenant.into_inner()))
                .filter(roster_occurrences::assignee_kind.eq(kind))
                .filter(roster_occurrences::assignee_id.eq(&external_id))
                .filter(roster_occurrences::occurrence_date.between(from, to))
                .order(roster_occurrences::occurrence_date.asc())
                .select(OccurrenceRow::as_select())
                .load::<OccurrenceRow>(connection)?;

            let mut grouped: BTreeMap<AssignmentId, Vec<AssignmentOccurrence>> = BTreeMap::new();
            for row in occurrence_rows {
                let occurrence = row_to_occurrence(row)?;
                grouped
                    .entry(occurrence.assignment_id())
                    .or_default()
                    .push(occurrence);
            }
            if grouped.is_empty() {
                return Ok(Vec::new());
            }

            let ids: Vec<uuid::Uuid> = grouped.keys().map(|id| id.into_inner()).collect();
            let assignment_rows = roster_assignments::table
                .filter(roster_assignments::tenant_id.eq(tenant.into_inner()))
                .filter(roster_assignments::id.eq_any(ids))
                .select(AssignmentRow::as_select())
                .load::<AssignmentRow>(connection)?;

            let mut found = Vec::with_capacity(assignment_rows.len());
            for row in assignment_rows {
                let assignment = row_to_assignment(row)?;
                let occurrences = grouped.remove(&assignment.id()).unwrap_or_default();
                found.push(AssignmentDetails {
                    assignment,
                    occurrences,
                });
            }
            found.sort_by_key(|details| {
                (
                    details.occurrences.first().map(AssignmentOccurrence::date),
                    details.assignment.window().start(),
                )
            });
            Ok(found)
        })
        .await
    }

    async fn occurrences_between(
        &self,
        ctx: &TenantContext,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RosterRepositoryResult<Vec<AssignmentOccurrence>> {
        let tenant = ctx.tenant_id().into_inner();
        self.run_blocking(move |connection| {
            roster_occurrences::table
                .filter(roster_occurrences::tenant_id.eq(tenant))
                .filter(roster_occurrences::occurrence_date.between(from, to))
                .order((
                    roster_occurrences::occurrence_date.asc(),
                    roster_occurrences::start_time.asc(),
                    roster_occurrences::assignee_kind.asc(),
                    roster_occurrences::assignee_id.asc(),
                ))
                .select(OccurrenceRow::as_select())
                .load::<OccurrenceRow>(connection)?
                .into_iter()
                .map(row_to_occurrence)
                .collect()
        })
        .await
    }

    async fn audit_trail(
        &self,
        ctx: &TenantContext,
        assignment_id: AssignmentId,
    ) -> RosterRepositoryResult<Vec<AuditLogEntry>> {
        let tenant = ctx.tenant_id().into_inner();
        self.run_blocking(move |connection| {
            roster_audit_log::table
                .filter(roster_audit_log::tenant_id.eq(tenant))
                .filter(roster_audit_log::assignment_id.eq(assignment_id.into_inner()))
                .order(roster_audit_log::seq.asc())
                .select(AuditRow::as_select())
                .load::<AuditRow>(connection)?
                .into_iter()
                .map(row_to_audit)
                .collect()
        })
        .await
    }
}

fn parse_assignee(kind: &str, id: String) -> RosterRepositoryResult<AssigneeRef> {
    let parsed_kind =
        AssigneeKind::try_from(kind).map_err(RosterRepositoryError::invalid_persisted_data)?;
    let parsed_id = AssigneeId::new(id).map_err(RosterRepositoryError::invalid_persisted_data)?;
    Ok(AssigneeRef::new(parsed_kind, parsed_id))
}

fn parse_actor(value: String) -> RosterRepositoryResult<ActorId> {
    ActorId::new(value).map_err(RosterRepositoryError::invalid_persisted_data)
}

fn parse_window(
    start: chrono::NaiveTime,
    end: chrono::NaiveTime,
) -> RosterRepositoryResult<TimeWindow> {
    TimeWindow::new(start, end).map_err(RosterRepositoryError::invalid_persisted_data)
}

fn parse_decision(
    field: &'static str,
    by: Option<String>,
    at: Option<DateTime<Utc>>,
) -> RosterRepositoryResult<Option<Decision>> {
    match (by, at) {
        (Some(actor), Some(timestamp)) => Ok(Some(Decision {
            by: parse_actor(actor)?,
            at: timestamp,
        })),
        (None, None) => Ok(None),
        (actor, _) => Err(RosterRepositoryError::invalid_persisted_data(
            ParseRosterValueError::new(field, actor.as_deref().unwrap_or("<missing actor>")),
        )),
    }
}

fn decision_columns(decision: Option<&Decision>) -> (Option<String>, Option<DateTime<Utc>>) {
    decision.map_or((None, None), |made| {
        (Some(made.by.as_str().to_owned()), Some(made.at))
    })
}

fn assignment_to_row(
    tenant: TenantId,
    assignment: &RosterAssignment,
) -> RosterRepositoryResult<AssignmentRow> {
    let recurrence =
        serde_json::to_value(assignment.recurrence()).map_err(RosterRepositoryError::persistence)?;
    let location = assignment
        .location()
        .map(serde_json::to_value)
        .transpose()
        .map_err(RosterRepositoryError::persistence)?;
    Ok(AssignmentRow {
        id: assignment.id().into_inner(),
        tenant_id: tenant.into_inner(),
        duty_id: assignment.duty_id().into_inner(),
        recurrence,
        time_slot_id: assignment.time_slot_id().map(TimeSlotId::into_inner),
        start_time: assignment.window().start(),
        end_time: assignment.window().end(),
        location,
        assignee_kind: assignment.assignee().kind().as_str().to_owned(),
        assignee_id: assignment.assignee().id().as_str().to_owned(),
        supervisor_id: assignment.supervisor_id().map(|id| id.as_str().to_owned()),
        role_id: assignment.role_id().map(RoleId::into_inner),
        status: assignment.status().as_str().to_owned(),
        acceptance_required: assignment.acceptance_required(),
        override_reason: assignment.override_reason().map(str::to_owned),
        notes: assignment.notes().map(str::to_owned),
        created_by: assignment.created_by().as_str().to_owned(),
        created_at: assignment.created_at(),
        updated_at: assignment.updated_at(),
    })
}

fn row_to_assignment(row: AssignmentRow) -> RosterRepositoryResult<RosterAssignment> {
    let recurrence = serde_json::from_value::<Recurrence>(row.recurrence)
        .map_err(RosterRepositoryError::invalid_persisted_data)?;
    let location = row
        .location
        .map(serde_json::from_value::<LocationSelection>)
        .transpose()
        .map_err(RosterRepositoryError::invalid_persisted_data)?;
    let supervisor_id = row
        .supervisor_id
        .map(AssigneeId::new)
        .transpose()
        .map_err(RosterRepositoryError::invalid_persisted_data)?;
    let fields = NewAssignment {
        duty_id: DutyDefinitionId::from_uuid(row.duty_id),
        recurrence,
        time_slot_id: row.time_slot_id.map(TimeSlotId::from_uuid),
        window: parse_window(row.start_time, row.end_time)?,
        location,
        assignee: parse_assignee(&row.assignee_kind, row.assignee_id)?,
        supervisor_id,
        role_id: row.role_id.map(RoleId::from_uuid),
        status: AssignmentStatus::try_from(row.status.as_str())
            .map_err(RosterRepositoryError::invalid_persisted_data)?,
        acceptance_required: row.acceptance_required,
        override_reason: row.override_reason,
        notes: row.notes,
        created_by: parse_actor(row.created_by)?,
    };
    Ok(RosterAssignment::from_persisted(PersistedAssignment {
        id: AssignmentId::from_uuid(row.id),
        fields,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn occurrence_to_row(tenant: TenantId, occurrence: &AssignmentOccurrence) -> OccurrenceRow {
    let (accepted_by, accepted_at) = decision_columns(occurrence.accepted());
    let (declined_by, declined_at) = decision_columns(occurrence.declined());
    let (completed_by, completed_at) = decision_columns(occurrence.completed());
    OccurrenceRow {
        id: occurrence.id().into_inner(),
        tenant_id: tenant.into_inner(),
        assignment_id: occurrence.assignment_id().into_inner(),
        duty_id: occurrence.duty_id().into_inner(),
        assignee_kind: occurrence.assignee().kind().as_str().to_owned(),
        assignee_id: occurrence.assignee().id().as_str().to_owned(),
        time_slot_id: occurrence.time_slot_id().map(TimeSlotId::into_inner),
        occurrence_date: occurrence.date(),
        start_time: occurrence.window().start(),
        end_time: occurrence.window().end(),
        status: occurrence.status().as_str().to_owned(),
        conflict_override: occurrence.conflict_override(),
        accepted_by,
        accepted_at,
        declined_by,
        declined_at,
        decline_reason: occurrence.decline_reason().map(str::to_owned),
        completed_by,
        completed_at,
        completion_notes: occurrence.completion_notes().map(str::to_owned),
        created_at: occurrence.created_at(),
        updated_at: occurrence.updated_at(),
    }
}

fn row_to_occurrence(row: OccurrenceRow) -> RosterRepositoryResult<AssignmentOccurrence> {
    Ok(AssignmentOccurrence::from_persisted(PersistedOccurrence {
        id: OccurrenceId::from_uuid(row.id),
        assignment_id: AssignmentId::from_uuid(row.assignment_id),
        duty_id: DutyDefinitionId::from_uuid(row.duty_id),
        assignee: parse_assignee(&row.assignee_kind, row.assignee_id)?,
        time_slot_id: row.time_slot_id.map(TimeSlotId::from_uuid),
        date: row.occurrence_date,
        window: parse_window(row.start_time, row.end_time)?,
        status: OccurrenceStatus::try_from(row.status.as_str())
            .map_err(RosterRepositoryError::invalid_persisted_data)?,
        conflict_override: row.conflict_override,
        accepted: parse_decision("accepted_by", row.accepted_by, row.accepted_at)?,
        declined: parse_decision("declined_by", row.declined_by, row.declined_at)?,
        decline_reason: row.decline_reason,
        completed: parse_decision("completed_by", row.completed_by, row.completed_at)?,
        completion_notes: row.completion_notes,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn audit_to_row(tenant: TenantId, entry: &AuditLogEntry) -> RosterRepositoryResult<AuditRow> {
    let snapshot = |value: Option<AuditSnapshot>| {
        value
            .map(serde_json::to_value)
            .transpose()
            .map_err(RosterRepositoryError::persistence)
    };
    Ok(AuditRow {
        id: entry.id().into_inner(),
        tenant_id: tenant.into_inner(),
        assignment_id: entry.assignment_id().into_inner(),
        occurrence_id: entry.occurrence_id().map(OccurrenceId::into_inner),
        action: entry.action().as_str().to_owned(),
        before_state: snapshot(entry.before())?,
        after_state: snapshot(entry.after())?,
        actor: entry.actor().as_str().to_owned(),
        reason: entry.reason().map(str::to_owned),
        recorded_at: entry.recorded_at(),
    })
}

fn row_to_audit(row: AuditRow) -> RosterRepositoryResult<AuditLogEntry> {
    let snapshot = |value: Option<serde_json::Value>| {
        value
            .map(serde_json::from_value::<AuditSnapshot>)
            .transpose()
            .map_err(RosterRepositoryError::invalid_persisted_data)
    };
    Ok(AuditLogEntry::from_persisted(PersistedAuditEntry {
        id: AuditEntryId::from_uuid(row.id),
        assignment_id: AssignmentId::from_uuid(row.assignment_id),
        occurrence_id: row.occurrence_id.map(OccurrenceId::from_uuid),
        action: AuditAction::try_from(row.action.as_str())
            .map_err(RosterRepositoryError::invalid_persisted_data)?,
        before: snapshot(row.before_state)?,
        after: snapshot(row.after_state)?,
        actor: parse_actor(row.actor)?,
        reason: row.reason,
        recorded_at: row.recorded_at,
    }))
}
