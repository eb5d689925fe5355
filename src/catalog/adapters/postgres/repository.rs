//! `PostgreSQL` implementation of the catalog store.

use super::{
    models::{DutyDefinitionRow, LocationRow, RoleRow, TimeSlotRow},
    schema::{duty_definitions, locations, roster_roles, time_slots},
};
use crate::catalog::{
    domain::{
        AssigneeBounds, AssigneeKindSet, CatalogCode, CatalogEntry, DutyCategory, DutyDefinition,
        DutyDefinitionId, Location, LocationId, LocationType, PersistedDutyDefinition,
        PersistedLocation, PersistedRole, PersistedTimeSlot, RiskLevel, Role, RoleId, TimeSlot,
        TimeSlotId, TimeWindow, WeekdaySet,
    },
    ports::{CatalogRepository, CatalogRepositoryError, CatalogRepositoryResult},
};
use crate::tenant::domain::{TenantContext, TenantId};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL` connection pool type used by catalog adapters.
pub type CatalogPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed store for all four catalogs.
#[derive(Debug, Clone)]
pub struct PostgresCatalogStore {
    pool: CatalogPgPool,
}

impl PostgresCatalogStore {
    /// Creates a store over a tenant database pool.
    #[must_use]
    pub const fn new(pool: CatalogPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> CatalogRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> CatalogRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(CatalogRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(CatalogRepositoryError::persistence)?
    }
}

fn map_write_error<T: CatalogEntry>(err: DieselError, code: CatalogCode) -> CatalogRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            CatalogRepositoryError::DuplicateCode {
                kind: T::KIND,
                code,
            }
        }
        other => CatalogRepositoryError::persistence(other),
    }
}

macro_rules! impl_pg_catalog {
    ($entry:ty, $id:ty, $table:ident, $row:ty, $to_row:ident, $from_row:ident) => {
        #[async_trait]
        impl CatalogRepository<$entry> for PostgresCatalogStore {
            async fn insert(
                &self,
                ctx: &TenantContext,
                entry: &$entry,
            ) -> CatalogRepositoryResult<()> {
                let row = $to_row(ctx.tenant_id(), entry)?;
                let code = entry.code().clone();
                self.run_blocking(move |connection| {
                    diesel::insert_into($table::table)
                        .values(&row)
                        .execute(connection)
                        .map_err(|err| map_write_error::<$entry>(err, code))?;
                    Ok(())
                })
                .await
            }

            async fn update(
                &self,
                ctx: &TenantContext,
                entry: &$entry,
            ) -> CatalogRepositoryResult<()> {
                let row = $to_row(ctx.tenant_id(), entry)?;
                let id = entry.id();
                let code = entry.code().clone();
                self.run_blocking(move |connection| {
                    let updated = diesel::update(
                        $table::table
                            .filter($table::tenant_id.eq(row.tenant_id))
                            .filter($table::id.eq(row.id)),
                    )
                    .set(&row)
                    .execute(connection)
                    .map_err(|err| map_write_error::<$entry>(err, code))?;
                    if updated == 0 {
                        return Err(CatalogRepositoryError::not_found::<$entry>(id));
                    }
                    Ok(())
                })
                .await
            }

            async fn find_by_id(
                &self,
                ctx: &TenantContext,
                id: $id,
            ) -> CatalogRepositoryResult<Option<$entry>> {
                let tenant = ctx.tenant_id().into_inner();
                self.run_blocking(move |connection| {
                    let row = $table::table
                        .filter($table::tenant_id.eq(tenant))
                        .filter($table::id.eq(id.into_inner()))
                        .select(<$row>::as_select())
                        .first::<$row>(connection)
                        .optional()
                        .map_err(CatalogRepositoryError::persistence)?;
                    row.map($from_row).transpose()
                })
                .await
            }

            async fn find_by_code(
                &self,
                ctx: &TenantContext,
                code: &CatalogCode,
            ) -> CatalogRepositoryResult<Option<$entry>> {
                let tenant = ctx.tenant_id().into_inner();
                let lookup = code.as_str().to_owned();
                self.run_blocking(move |connection| {
                    let row = $table::table
                        .filter($table::tenant_id.eq(tenant))
                        .filter($table::code.eq(&lookup))
                        .select(<$row>::as_select())
                        .first::<$row>(connection)
                        .optional()
                        .map_err(CatalogRepositoryError::persistence)?;
                    row.map($from_row).transpose()
                })
                .await
            }

            async fn list(
                &self,
                ctx: &TenantContext,
                include_inactive: bool,
            ) -> CatalogRepositoryResult<Vec<$entry>> {
                let tenant = ctx.tenant_id().into_inner();
                self.run_blocking(move |connection| {
                    let mut query = $table::table
                        .filter($table::tenant_id.eq(tenant))
                        .into_boxed();
                    if !include_inactive {
                        query = query.filter($table::is_active.eq(true));
                    }
                    let rows = query
                        .order($table::code.asc())
                        .select(<$row>::as_select())
                        .load::<$row>(connection)
                        .map_err(CatalogRepositoryError::persistence)?;
                    rows.into_iter().map($from_row).collect()
                })
                .await
            }
        }
    };
}

impl_pg_catalog!(
    DutyDefinition,
    DutyDefinitionId,
    duty_definitions,
    DutyDefinitionRow,
    duty_to_row,
    row_to_duty
);
impl_pg_catalog!(TimeSlot, TimeSlotId, time_slots, TimeSlotRow, slot_to_row, row_to_slot);
impl_pg_catalog!(Location, LocationId, locations, LocationRow, location_to_row, row_to_location);
impl_pg_catalog!(Role, RoleId, roster_roles, RoleRow, role_to_row, row_to_role);

fn to_small(value: Option<u16>) -> CatalogRepositoryResult<Option<i16>> {
    value
        .map(i16::try_from)
        .transpose()
        .map_err(CatalogRepositoryError::persistence)
}

fn from_small(value: Option<i16>) -> CatalogRepositoryResult<Option<u16>> {
    value
        .map(u16::try_from)
        .transpose()
        .map_err(CatalogRepositoryError::invalid_persisted_data)
}

fn parse_code(code: String) -> CatalogRepositoryResult<CatalogCode> {
    CatalogCode::new(code).map_err(CatalogRepositoryError::invalid_persisted_data)
}

fn duty_to_row(
    tenant: TenantId,
    duty: &DutyDefinition,
) -> CatalogRepositoryResult<DutyDefinitionRow> {
    let allowed_assignees = serde_json::to_value(duty.allowed_assignees())
        .map_err(CatalogRepositoryError::persistence)?;
    Ok(DutyDefinitionRow {
        id: duty.id().into_inner(),
        tenant_id: tenant.into_inner(),
        code: duty.code().as_str().to_owned(),
        name: duty.name().to_owned(),
        description: duty.description().map(str::to_owned),
        category: duty.category().as_str().to_owned(),
        allowed_assignees,
        risk_level: duty.risk_level().as_str().to_owned(),
        supervisor_required: duty.supervisor_required(),
        default_time_slot_id: duty.default_time_slot().map(TimeSlotId::into_inner),
        default_location_id: duty.default_location().map(LocationId::into_inner),
        min_assignees: to_small(duty.bounds().min())?,
        max_assignees: to_small(duty.bounds().max())?,
        student_weekly_cap: to_small(duty.student_weekly_cap())?,
        is_active: duty.is_active(),
        created_at: duty.created_at(),
        updated_at: duty.updated_at(),
    })
}

fn row_to_duty(row: DutyDefinitionRow) -> CatalogRepositoryResult<DutyDefinition> {
    let allowed_assignees = serde_json::from_value::<AssigneeKindSet>(row.allowed_assignees)
        .map_err(CatalogRepositoryError::invalid_persisted_data)?;
    let bounds = AssigneeBounds::new(from_small(row.min_assignees)?, from_small(row.max_assignees)?)
        .map_err(CatalogRepositoryError::invalid_persisted_data)?;
    Ok(DutyDefinition::from_persisted(PersistedDutyDefinition {
        id: DutyDefinitionId::from_uuid(row.id),
        code: parse_code(row.code)?,
        name: row.name,
        description: row.description,
        category: DutyCategory::try_from(row.category.as_str())
            .map_err(CatalogRepositoryError::invalid_persisted_data)?,
        allowed_assignees,
        risk_level: RiskLevel::try_from(row.risk_level.as_str())
            .map_err(CatalogRepositoryError::invalid_persisted_data)?,
        supervisor_required: row.supervisor_required,
        default_time_slot: row.default_time_slot_id.map(TimeSlotId::from_uuid),
        default_location: row.default_location_id.map(LocationId::from_uuid),
        bounds,
        student_weekly_cap: from_small(row.student_weekly_cap)?,
        is_active: row.is_active,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

#[expect(
    clippy::unnecessary_wraps,
    reason = "row converters share one signature across catalogs"
)]
fn slot_to_row(tenant: TenantId, slot: &TimeSlot) -> CatalogRepositoryResult<TimeSlotRow> {
    Ok(TimeSlotRow {
        id: slot.id().into_inner(),
        tenant_id: tenant.into_inner(),
        code: slot.code().as_str().to_owned(),
        name: slot.name().to_owned(),
        start_time: slot.window().start(),
        end_time: slot.window().end(),
        weekdays: i16::from(slot.weekdays().bits()),
        is_active: slot.is_active(),
        created_at: slot.created_at(),
        updated_at: slot.updated_at(),
    })
}

fn row_to_slot(row: TimeSlotRow) -> CatalogRepositoryResult<TimeSlot> {
    let bits = u8::try_from(row.weekdays).map_err(CatalogRepositoryError::invalid_persisted_data)?;
    Ok(TimeSlot::from_persisted(PersistedTimeSlot {
        id: TimeSlotId::from_uuid(row.id),
        code: parse_code(row.code)?,
        name: row.name,
        window: TimeWindow::new(row.start_time, row.end_time)
            .map_err(CatalogRepositoryError::invalid_persisted_data)?,
        weekdays: WeekdaySet::from_bits(bits)
            .map_err(CatalogRepositoryError::invalid_persisted_data)?,
        is_active: row.is_active,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

fn location_to_row(tenant: TenantId, location: &Location) -> CatalogRepositoryResult<LocationRow> {
    let capacity = location
        .capacity()
        .map(i32::try_from)
        .transpose()
        .map_err(CatalogRepositoryError::persistence)?;
    Ok(LocationRow {
        id: location.id().into_inner(),
        tenant_id: tenant.into_inner(),
        code: location.code().as_str().to_owned(),
        name: location.name().to_owned(),
        location_type: location.location_type().as_str().to_owned(),
        building: location.building().map(str::to_owned),
        floor: location.floor().map(str::to_owned),
        capacity,
        is_active: location.is_active(),
        created_at: location.created_at(),
        updated_at: location.updated_at(),
    })
}

fn row_to_location(row: LocationRow) -> CatalogRepositoryResult<Location> {
    let capacity = row
        .capacity
        .map(u32::try_from)
        .transpose()
        .map_err(CatalogRepositoryError::invalid_persisted_data)?;
    Ok(Location::from_persisted(PersistedLocation {
        id: LocationId::from_uuid(row.id),
        code: parse_code(row.code)?,
        name: row.name,
        location_type: LocationType::try_from(row.location_type.as_str())
            .map_err(CatalogRepositoryError::invalid_persisted_data)?,
        building: row.building,
        floor: row.floor,
        capacity,
        is_active: row.is_active,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}

#[expect(
    clippy::unnecessary_wraps,
    reason = "row converters share one signature across catalogs"
)]
fn role_to_row(tenant: TenantId, role: &Role) -> CatalogRepositoryResult<RoleRow> {
    Ok(RoleRow {
        id: role.id().into_inner(),
        tenant_id: tenant.into_inner(),
        code: role.code().as_str().to_owned(),
        name: role.name().to_owned(),
        description: role.description().map(str::to_owned),
        is_active: role.is_active(),
        created_at: role.created_at(),
        updated_at: role.updated_at(),
    })
}

fn row_to_role(row: RoleRow) -> CatalogRepositoryResult<Role> {
    Ok(Role::from_persisted(PersistedRole {
        id: RoleId::from_uuid(row.id),
        code: parse_code(row.code)?,
        name: row.name,
        description: row.description,
        is_active: row.is_active,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }))
}
