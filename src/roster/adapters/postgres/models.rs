//! Diesel row models for roster persistence.

use super::schema::{roster_assignments, roster_audit_log, roster_occurrences};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Row of the `roster_assignments` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = roster_assignments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct AssignmentRow {
    /// Assignment identifier.
    pub id: uuid::Uuid,
    /// Owning tenant.
    pub tenant_id: uuid::Uuid,
    /// Duty identifier.
    pub duty_id: uuid::Uuid,
    /// Recurrence JSON.
    pub recurrence: Value,
    /// Catalog slot.
    pub time_slot_id: Option<uuid::Uuid>,
    /// Window start.
    pub start_time: NaiveTime,
    /// Window end.
    pub end_time: NaiveTime,
    /// Location JSON.
    pub location: Option<Value>,
    /// Assignee kind.
    pub assignee_kind: String,
    /// Assignee identifier.
    pub assignee_id: String,
    /// Supervisor identifier.
    pub supervisor_id: Option<String>,
    /// Role identifier.
    pub role_id: Option<uuid::Uuid>,
    /// Status.
    pub status: String,
    /// Acceptance flag.
    pub acceptance_required: bool,
    /// Override reason.
    pub override_reason: Option<String>,
    /// Notes.
    pub notes: Option<String>,
    /// Creator.
    pub created_by: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Row of the `roster_occurrences` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = roster_occurrences)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct OccurrenceRow {
    /// Occurrence identifier.
    pub id: uuid::Uuid,
    /// Owning tenant.
    pub tenant_id: uuid::Uuid,
    /// Parent assignment.
    pub assignment_id: uuid::Uuid,
    /// Duty identifier.
    pub duty_id: uuid::Uuid,
    /// Assignee kind.
    pub assignee_kind: String,
    /// Assignee identifier.
    pub assignee_id: String,
    /// Catalog slot.
    pub time_slot_id: Option<uuid::Uuid>,
    /// Calendar date.
    pub occurrence_date: NaiveDate,
    /// Window start.
    pub start_time: NaiveTime,
    /// Window end.
    pub end_time: NaiveTime,
    /// Status.
    pub status: String,
    /// Override flag.
    pub conflict_override: bool,
    /// Accepting actor.
    pub accepted_by: Option<String>,
    /// Acceptance time.
    pub accepted_at: Option<DateTime<Utc>>,
    /// Declining actor.
    pub declined_by: Option<String>,
    /// Decline time.
    pub declined_at: Option<DateTime<Utc>>,
    /// Decline reason.
    pub decline_reason: Option<String>,
    /// Completing actor.
    pub completed_by: Option<String>,
    /// Completion time.
    pub completed_at: Option<DateTime<Utc>>,
    /// Completion notes.
    pub completion_notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Row of the `roster_audit_log` table. Entries are never updated.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = roster_audit_log)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AuditRow {
    /// Entry identifier.
    pub id: uuid::Uuid,
    /// Owning tenant.
    pub tenant_id: uuid::Uuid,
    /// Assignment identifier.
    pub assignment_id: uuid::Uuid,
    /// Occurrence identifier.
    pub occurrence_id: Option<uuid::Uuid>,
    /// Action name.
    pub action: String,
    /// Before snapshot.
    pub before_state: Option<Value>,
    /// After snapshot.
    pub after_state: Option<Value>,
    /// Actor.
    pub actor: String,
    /// Reason.
    pub reason: Option<String>,
    /// Recording time.
    pub recorded_at: DateTime<Utc>,
}
