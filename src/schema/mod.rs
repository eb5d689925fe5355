//! Database schema versioning.
//!
//! Migrations are embedded at compile time and applied in version order.
//! Each one runs in its own transaction together with the row recording it
//! in `schema_versions`, so re-running [`apply_migrations`] is a no-op once
//! the database is current.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use thiserror::Error;
use tracing::info;

/// One embedded migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Migration {
    /// Sortable version label, also the directory name under `migrations/`.
    pub version: &'static str,
    /// Forward SQL.
    pub up: &'static str,
}

/// Every migration, oldest first.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "2025-03-01-000000_create_tenants",
        up: include_str!("../../migrations/2025-03-01-000000_create_tenants/up.sql"),
    },
    Migration {
        version: "2025-03-01-000001_create_catalogs",
        up: include_str!("../../migrations/2025-03-01-000001_create_catalogs/up.sql"),
    },
    Migration {
        version: "2025-03-01-000002_create_roster",
        up: include_str!("../../migrations/2025-03-01-000002_create_roster/up.sql"),
    },
];

/// Version the code expects the database to be at.
pub const SCHEMA_VERSION: &str = "2025-03-01-000002_create_roster";

const CREATE_VERSIONS_TABLE: &str = "CREATE TABLE IF NOT EXISTS schema_versions (
    version VARCHAR(64) PRIMARY KEY,
    applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)";

diesel::table! {
    /// Applied migrations.
    schema_versions (version) {
        /// Applied version label.
        #[max_length = 64]
        version -> Varchar,
        /// Application timestamp.
        applied_at -> Timestamptz,
    }
}

/// Errors raised while bringing a database up to date.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The version bookkeeping table could not be read or created.
    #[error("schema version bookkeeping failed: {0}")]
    Bookkeeping(#[source] DieselError),

    /// A migration failed and was rolled back.
    #[error("migration {version} failed: {source}")]
    Migration {
        /// Version that failed.
        version: &'static str,
        /// Underlying database error.
        #[source]
        source: DieselError,
    },
}

/// Applies every migration missing from `schema_versions`.
///
/// Returns the versions applied by this call, oldest first.
///
/// # Errors
///
/// Returns [`SchemaError::Bookkeeping`] when the version table cannot be
/// prepared and [`SchemaError::Migration`] when a migration fails; earlier
/// migrations from the same call stay applied.
pub fn apply_migrations(conn: &mut PgConnection) -> Result<Vec<&'static str>, SchemaError> {
    conn.batch_execute(CREATE_VERSIONS_TABLE)
        .map_err(SchemaError::Bookkeeping)?;
    let applied: Vec<String> = schema_versions::table
        .select(schema_versions::version)
        .load(conn)
        .map_err(SchemaError::Bookkeeping)?;

    let mut newly_applied = Vec::new();
    for migration in pending(MIGRATIONS, &applied) {
        conn.transaction::<_, DieselError, _>(|tx| {
            tx.batch_execute(migration.up)?;
            diesel::insert_into(schema_versions::table)
                .values(schema_versions::version.eq(migration.version))
                .execute(tx)?;
            Ok(())
        })
        .map_err(|source| SchemaError::Migration {
            version: migration.version,
            source,
        })?;
        info!(version = migration.version, "migration applied");
        newly_applied.push(migration.version);
    }
    Ok(newly_applied)
}

/// Returns the newest applied version, if any.
///
/// # Errors
///
/// Returns [`SchemaError::Bookkeeping`] when the version table cannot be
/// read.
pub fn current_version(conn: &mut PgConnection) -> Result<Option<String>, SchemaError> {
    conn.batch_execute(CREATE_VERSIONS_TABLE)
        .map_err(SchemaError::Bookkeeping)?;
    schema_versions::table
        .select(diesel::dsl::max(schema_versions::version))
        .first::<Option<String>>(conn)
        .map_err(SchemaError::Bookkeeping)
}

fn pending<'a>(
    migrations: &'a [Migration],
    applied: &'a [String],
) -> impl Iterator<Item = &'a Migration> {
    migrations
        .iter()
        .filter(move |migration| !applied.iter().any(|version| version == migration.version))
}
