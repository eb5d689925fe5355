//! `PostgreSQL` implementation of the tenant directory.

use super::{models::TenantRow, schema::tenants};
use crate::tenant::{
    domain::{OrgSettings, TenantCode, TenantId, TenantRecord},
    ports::{TenantDirectory, TenantDirectoryError, TenantDirectoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};

/// `PostgreSQL` connection pool type for the admin database.
pub type TenantPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed tenant directory.
#[derive(Debug, Clone)]
pub struct PostgresTenantDirectory {
    pool: TenantPgPool,
}

impl PostgresTenantDirectory {
    /// Creates a directory over the admin database pool.
    #[must_use]
    pub const fn new(pool: TenantPgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TenantDirectory for PostgresTenantDirectory {
    async fn find_by_code(&self, code: &TenantCode) -> TenantDirectoryResult<Option<TenantRecord>> {
        let pool = self.pool.clone();
        let lookup = code.as_str().to_owned();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TenantDirectoryError::persistence)?;
            let row = tenants::table
                .filter(tenants::code.eq(&lookup))
                .select(TenantRow::as_select())
                .first::<TenantRow>(&mut connection)
                .optional()
                .map_err(TenantDirectoryError::persistence)?;
            row.map(row_to_record).transpose()
        })
        .await
        .map_err(TenantDirectoryError::persistence)?
    }
}

fn row_to_record(row: TenantRow) -> TenantDirectoryResult<TenantRecord> {
    let TenantRow {
        id,
        code,
        name,
        database_url,
        settings,
        is_active,
        created_at: _,
    } = row;

    Ok(TenantRecord {
        id: TenantId::from_uuid(id),
        code: TenantCode::new(code).map_err(TenantDirectoryError::invalid_persisted_data)?,
        name,
        database_url,
        settings: OrgSettings::from_json(&settings)
            .map_err(TenantDirectoryError::invalid_persisted_data)?,
        is_active,
    })
}
