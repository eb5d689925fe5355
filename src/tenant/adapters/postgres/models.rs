//! Diesel row models for the tenant directory.

use super::schema::tenants;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde_json::Value;

/// Query result row for tenant records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tenants)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TenantRow {
    /// Tenant identifier.
    pub id: uuid::Uuid,
    /// Routing code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Connection string of the tenant database.
    pub database_url: String,
    /// Organisation settings payload.
    pub settings: Value,
    /// Whether the tenant may be served.
    pub is_active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}
