//! Shared test helpers for `PostgreSQL` integration tests.

use super::cluster::{SCRATCH_DB, shared_cluster};
use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sql_types::{Jsonb, Text, Uuid as SqlUuid};
use duty_roster::catalog::adapters::postgres::PostgresCatalogStore;
use duty_roster::catalog::services::CatalogService;
use duty_roster::roster::adapters::postgres::PostgresRosterRepository;
use duty_roster::roster::services::{AcceptanceWorkflow, AssignmentEngine, RosterReporting};
use duty_roster::schema;
use duty_roster::tenant::domain::{OrgSettings, TenantCode, TenantContext, TenantId};
use mockable::Clock;
use std::env;
use std::sync::{Arc, OnceLock};
use uuid::Uuid;

/// Environment variable naming an external test database. When set, the
/// embedded cluster is not started.
pub const DATABASE_URL_ENV: &str = "ROSTER_TEST_DATABASE_URL";

/// Pool type used by the suite.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

static MIGRATED: OnceLock<Result<(), String>> = OnceLock::new();

/// Returns the test database URL, or `None` when the suite should skip.
///
/// An explicit URL wins; otherwise the shared embedded cluster provides one.
pub fn database_url() -> Option<String> {
    env::var(DATABASE_URL_ENV)
        .ok()
        .filter(|url| !url.trim().is_empty())
        .or_else(|| shared_cluster().map(|cluster| cluster.database_url(SCRATCH_DB)))
}

/// Opens a pool on the migrated test database, or `None` when no database
/// is available.
pub fn test_pool() -> Option<PgPool> {
    let url = database_url()?;
    let migrated = MIGRATED.get_or_init(|| {
        let mut conn = PgConnection::establish(&url).map_err(|err| err.to_string())?;
        schema::apply_migrations(&mut conn)
            .map(|_| ())
            .map_err(|err| err.to_string())
    });
    if let Err(err) = migrated {
        panic!("test database migration failed: {err}");
    }
    let pool = Pool::builder()
        .max_size(4)
        .build(ConnectionManager::<PgConnection>::new(url))
        .expect("test pool builds");
    Some(pool)
}

/// Clock pinned to noon UTC on one day.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(DateTime<Utc>);

impl FixedClock {
    /// Pins the clock to noon UTC on `date`.
    pub fn on(date: NaiveDate) -> Self {
        let noon = date.and_hms_opt(12, 0, 0).expect("valid time");
        Self(Utc.from_utc_datetime(&noon))
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Services for one fresh tenant over the test database.
pub struct PgHarness {
    pub pool: PgPool,
    pub ctx: TenantContext,
    pub catalog: CatalogService<PostgresCatalogStore, FixedClock>,
    pub engine: AssignmentEngine<PostgresRosterRepository, PostgresCatalogStore, FixedClock>,
    pub workflow: AcceptanceWorkflow<PostgresRosterRepository, FixedClock>,
    pub reporting: RosterReporting<PostgresRosterRepository>,
}

impl PgHarness {
    /// Wires a harness whose clock reads noon on `today`.
    pub fn new(pool: PgPool, today: &str) -> Self {
        let clock = Arc::new(FixedClock::on(date(today)));
        let store = Arc::new(PostgresCatalogStore::new(pool.clone()));
        let roster = Arc::new(PostgresRosterRepository::new(pool.clone()));
        let ctx = TenantContext::new(
            TenantId::new(),
            TenantCode::new(unique_code()).expect("valid tenant code"),
            OrgSettings::default(),
        );
        Self {
            pool,
            ctx,
            catalog: CatalogService::new(Arc::clone(&store), Arc::clone(&clock)),
            engine: AssignmentEngine::new(Arc::clone(&roster), store, Arc::clone(&clock)),
            workflow: AcceptanceWorkflow::new(Arc::clone(&roster), clock),
            reporting: RosterReporting::new(roster),
        }
    }

    /// Borrows a pooled connection for direct SQL.
    pub fn connection(
        &self,
    ) -> diesel::r2d2::PooledConnection<ConnectionManager<PgConnection>> {
        self.pool.get().expect("pooled connection")
    }
}

/// Returns a tenant code no other test uses.
pub fn unique_code() -> String {
    format!("t{}", Uuid::new_v4().simple())
}

/// Inserts a tenant row into the directory table.
pub fn insert_tenant(
    conn: &mut PgConnection,
    id: Uuid,
    code: &str,
    settings: serde_json::Value,
    is_active: bool,
) {
    diesel::sql_query(
        "INSERT INTO tenants (id, code, name, database_url, settings, is_active) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind::<SqlUuid, _>(id)
    .bind::<Text, _>(code)
    .bind::<Text, _>(format!("{code} school"))
    .bind::<Text, _>(format!("postgres://localhost/{code}"))
    .bind::<Jsonb, _>(settings)
    .bind::<diesel::sql_types::Bool, _>(is_active)
    .execute(conn)
    .expect("tenant row inserts");
}

/// Parses an ISO date.
pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid date")
}
