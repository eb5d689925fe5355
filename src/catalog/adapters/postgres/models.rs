//! Diesel row models for catalog persistence.
//!
//! Each row type is used for reads, inserts and full-row updates.

use super::schema::{duty_definitions, locations, roster_roles, time_slots};
use chrono::{DateTime, NaiveTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Row of the `duty_definitions` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = duty_definitions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct DutyDefinitionRow {
    /// Definition identifier.
    pub id: uuid::Uuid,
    /// Owning tenant.
    pub tenant_id: uuid::Uuid,
    /// Tenant-unique code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Category.
    pub category: String,
    /// Allowed assignee kinds.
    pub allowed_assignees: Value,
    /// Risk level.
    pub risk_level: String,
    /// Supervisor flag.
    pub supervisor_required: bool,
    /// Default time slot.
    pub default_time_slot_id: Option<uuid::Uuid>,
    /// Default location.
    pub default_location_id: Option<uuid::Uuid>,
    /// Minimum assignees.
    pub min_assignees: Option<i16>,
    /// Maximum assignees.
    pub max_assignees: Option<i16>,
    /// Student weekly cap.
    pub student_weekly_cap: Option<i16>,
    /// Soft-delete flag.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Row of the `time_slots` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = time_slots)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TimeSlotRow {
    /// Slot identifier.
    pub id: uuid::Uuid,
    /// Owning tenant.
    pub tenant_id: uuid::Uuid,
    /// Tenant-unique code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Window start.
    pub start_time: NaiveTime,
    /// Window end.
    pub end_time: NaiveTime,
    /// Weekday bitmask.
    pub weekdays: i16,
    /// Soft-delete flag.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Row of the `locations` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = locations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct LocationRow {
    /// Location identifier.
    pub id: uuid::Uuid,
    /// Owning tenant.
    pub tenant_id: uuid::Uuid,
    /// Tenant-unique code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Zone type.
    pub location_type: String,
    /// Building name.
    pub building: Option<String>,
    /// Floor label.
    pub floor: Option<String>,
    /// Advisory capacity.
    pub capacity: Option<i32>,
    /// Soft-delete flag.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Row of the `roster_roles` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = roster_roles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
#[diesel(treat_none_as_null = true)]
pub struct RoleRow {
    /// Role identifier.
    pub id: uuid::Uuid,
    /// Owning tenant.
    pub tenant_id: uuid::Uuid,
    /// Tenant-unique code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Description.
    pub description: Option<String>,
    /// Soft-delete flag.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
