//! Shared test helpers for in-memory integration tests.

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use duty_roster::catalog::{
    adapters::memory::InMemoryCatalogStore,
    domain::{AssigneeKind, DutyDefinition},
    services::CatalogService,
};
use duty_roster::roster::{
    adapters::memory::InMemoryRosterRepository,
    domain::{ActorId, AssigneeId, AssigneeRef},
    services::{AssignmentEngine, RosterReporting},
};
use duty_roster::tenant::{
    adapters::memory::InMemoryTenantDirectory,
    domain::{OrgSettings, TenantCode, TenantContext, TenantId, TenantRecord},
};
use mockable::Clock;
use std::sync::Arc;

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

/// Catalog, engine and reporting services over shared in-memory stores.
///
/// One set of stores serves every tenant, so isolation relies on the
/// tenant context alone.
pub struct Services {
    pub catalog: CatalogService<InMemoryCatalogStore, FixedClock>,
    pub engine: AssignmentEngine<InMemoryRosterRepository, InMemoryCatalogStore, FixedClock>,
    pub reporting: RosterReporting<InMemoryRosterRepository>,
}

impl Services {
    /// Wires services whose clock reads noon on 2025-03-03.
    pub fn new() -> Self {
        let clock = Arc::new(FixedClock::on(date("2025-03-03")));
        let store = Arc::new(InMemoryCatalogStore::new());
        let roster = Arc::new(InMemoryRosterRepository::new());
        Self {
            catalog: CatalogService::new(Arc::clone(&store), Arc::clone(&clock)),
            engine: AssignmentEngine::new(Arc::clone(&roster), store, clock),
            reporting: RosterReporting::new(roster),
        }
    }

    /// Seeds the default catalog for `ctx`.
    pub async fn seed(&self, ctx: &TenantContext) {
        self.catalog
            .seed_defaults(ctx)
            .await
            .expect("seeding should succeed");
    }

    /// Looks up a seeded duty by code.
    pub async fn duty(&self, ctx: &TenantContext, code: &str) -> DutyDefinition {
        self.catalog
            .find_by_code::<DutyDefinition>(ctx, code)
            .await
            .expect("lookup should succeed")
            .expect("seeded duty should exist")
    }
}

/// Builds an active tenant record.
pub fn record(code: &str, settings: OrgSettings) -> TenantRecord {
    TenantRecord {
        id: TenantId::new(),
        code: TenantCode::new(code).expect("valid tenant code"),
        name: format!("{code} school"),
        database_url: format!("postgres://localhost/{code}"),
        settings,
        is_active: true,
    }
}

/// Builds a directory holding `records`.
pub fn directory(records: impl IntoIterator<Item = TenantRecord>) -> Arc<InMemoryTenantDirectory> {
    let directory = InMemoryTenantDirectory::new();
    for tenant in records {
        directory.insert(tenant).expect("insert tenant");
    }
    Arc::new(directory)
}

/// Parses an ISO date.
pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("valid date")
}

/// Builds a teacher reference.
pub fn teacher(id: &str) -> AssigneeRef {
    AssigneeRef::new(
        AssigneeKind::Teacher,
        AssigneeId::new(id).expect("valid assignee id"),
    )
}

/// Builds an administrator actor.
pub fn admin() -> ActorId {
    ActorId::new("admin-1").expect("valid actor id")
}
