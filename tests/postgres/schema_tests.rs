//! Migration bookkeeping and database-level guards.

use super::cluster::{SCRATCH_DB, shared_cluster};
use super::helpers::{DATABASE_URL_ENV, PgHarness, database_url, date, test_pool};
use diesel::prelude::*;
use diesel::sql_types::Uuid as SqlUuid;
use duty_roster::catalog::domain::{AssigneeKind, DutyDefinition};
use duty_roster::roster::{
    domain::{ActorId, AssigneeId, AssigneeRef, Recurrence},
    services::CreateAssignmentRequest,
};
use duty_roster::schema::{self, SCHEMA_VERSION};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reapplying_migrations_is_a_no_op() {
    let Some(_pool) = test_pool() else {
        return;
    };
    let url = database_url().expect("url is set when the pool exists");

    let (applied, current) = tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&url).expect("connect");
        let applied = schema::apply_migrations(&mut conn).expect("migrations apply");
        let current = schema::current_version(&mut conn).expect("version reads");
        (applied, current)
    })
    .await
    .expect("blocking task joins");

    assert!(applied.is_empty());
    assert_eq!(current.as_deref(), Some(SCHEMA_VERSION));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn embedded_cluster_hosts_the_migrated_scratch_database() {
    if std::env::var_os(DATABASE_URL_ENV).is_some() {
        return;
    }
    let Some(cluster) = shared_cluster() else {
        return;
    };
    let url = cluster.database_url(SCRATCH_DB);
    assert_eq!(database_url().as_deref(), Some(url.as_str()));
    let Some(pool) = test_pool() else {
        panic!("pool should open on a running cluster");
    };

    let current = tokio::task::spawn_blocking(move || {
        let mut conn = pool.get().expect("pooled connection");
        schema::current_version(&mut conn).expect("version reads")
    })
    .await
    .expect("blocking task joins");

    assert_eq!(current.as_deref(), Some(SCHEMA_VERSION));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn audit_rows_cannot_be_rewritten() {
    let Some(pool) = test_pool() else {
        return;
    };
    let harness = PgHarness::new(pool, "2025-03-03");
    harness
        .catalog
        .seed_defaults(&harness.ctx)
        .await
        .expect("seed");
    let gate = harness
        .catalog
        .find_by_code::<DutyDefinition>(&harness.ctx, "GATE_DUTY")
        .await
        .expect("lookup")
        .expect("gate duty seeded");
    let mut created = harness
        .engine
        .create_assignment(
            &harness.ctx,
            CreateAssignmentRequest::new(
                gate.id(),
                [AssigneeRef::new(
                    AssigneeKind::Teacher,
                    AssigneeId::new("T1").expect("valid id"),
                )],
                Recurrence::Once {
                    date: date("2025-03-04"),
                },
                ActorId::new("admin-1").expect("valid actor"),
            ),
        )
        .await
        .expect("assignment created");
    let assignment_id = created
        .pop()
        .expect("one assignment")
        .assignment
        .id()
        .into_inner();

    let mut conn = harness.connection();
    let update = diesel::sql_query(
        "UPDATE roster_audit_log SET action = 'approved' WHERE assignment_id = $1",
    )
    .bind::<SqlUuid, _>(assignment_id)
    .execute(&mut conn);
    let delete = diesel::sql_query("DELETE FROM roster_audit_log WHERE assignment_id = $1")
        .bind::<SqlUuid, _>(assignment_id)
        .execute(&mut conn);

    assert!(update.is_err(), "audit update must be rejected");
    assert!(delete.is_err(), "audit delete must be rejected");
}
