//! Tenant resolution and per-tenant scoping of catalog and roster data.

use super::helpers::{Services, admin, date, directory, record, teacher};
use duty_roster::roster::{domain::Recurrence, services::CreateAssignmentRequest};
use duty_roster::tenant::{
    domain::{OrgSettings, TenantContext},
    ports::TenantDirectory,
    services::{TenantResolutionError, TenantResolver},
};
use rstest::rstest;

async fn resolve<D: TenantDirectory>(resolver: &TenantResolver<D>, code: &str) -> TenantContext {
    resolver
        .resolve_context(code)
        .await
        .expect("tenant should resolve")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn each_tenant_books_the_same_teacher_code_independently() {
    let resolver = TenantResolver::new(directory([
        record("north", OrgSettings::default()),
        record("south", OrgSettings::default()),
    ]));
    let north = resolve(&resolver, "NORTH").await;
    let south = resolve(&resolver, "south").await;
    let services = Services::new();
    services.seed(&north).await;
    services.seed(&south).await;
    let monday = Recurrence::Once {
        date: date("2025-03-03"),
    };

    for ctx in [&north, &south] {
        let duty = services.duty(ctx, "GATE_DUTY").await;
        services
            .engine
            .create_assignment(
                ctx,
                CreateAssignmentRequest::new(duty.id(), [teacher("T1")], monday, admin()),
            )
            .await
            .expect("each tenant books its own T1");
    }

    let north_day = services
        .reporting
        .roster_for_date(&north, date("2025-03-03"))
        .await
        .expect("roster loads");
    let south_day = services
        .reporting
        .roster_for_date(&south, date("2025-03-03"))
        .await
        .expect("roster loads");
    assert_eq!(north_day.len(), 1);
    assert_eq!(south_day.len(), 1);
    assert_ne!(
        north_day.first().map(|o| o.assignment_id()),
        south_day.first().map(|o| o.assignment_id())
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duties_of_one_tenant_are_invisible_to_another() {
    let resolver = TenantResolver::new(directory([
        record("north", OrgSettings::default()),
        record("south", OrgSettings::default()),
    ]));
    let north = resolve(&resolver, "north").await;
    let south = resolve(&resolver, "south").await;
    let services = Services::new();
    services.seed(&north).await;

    let north_gate = services.duty(&north, "GATE_DUTY").await;
    let err = services
        .engine
        .create_assignment(
            &south,
            CreateAssignmentRequest::new(
                north_gate.id(),
                [teacher("T1")],
                Recurrence::Once {
                    date: date("2025-03-03"),
                },
                admin(),
            ),
        )
        .await
        .expect_err("another tenant's duty is unknown");
    assert_eq!(err.kind().http_status(), 404);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn inactive_tenants_do_not_resolve() {
    let mut closed = record("closed", OrgSettings::default());
    closed.is_active = false;
    let resolver = TenantResolver::new(directory([closed]));

    let err = resolver
        .resolve_context("closed")
        .await
        .expect_err("inactive tenant is rejected");
    assert!(matches!(err, TenantResolutionError::NotFound(_)));
}
