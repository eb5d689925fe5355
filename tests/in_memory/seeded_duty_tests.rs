//! Assignments made against the default catalog.

use super::helpers::{Services, admin, date, record, teacher};
use duty_roster::catalog::domain::{CatalogKind, RiskLevel};
use duty_roster::roster::{
    domain::{AssigneeId, AssignmentStatus, Recurrence},
    services::{CreateAssignmentRequest, ErrorKind},
};
use duty_roster::tenant::domain::{OrgSettings, TenantContext};
use rstest::{fixture, rstest};
use std::sync::Arc;
use tokio::sync::Barrier;

#[fixture]
fn ctx() -> TenantContext {
    record("greenfield", OrgSettings::default()).context()
}

fn on(day: &str) -> Recurrence {
    Recurrence::Once { date: date(day) }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn seeding_twice_creates_nothing_new(ctx: TenantContext) {
    let services = Services::new();

    let first = services.catalog.seed_defaults(&ctx).await.expect("first seed");
    let second = services.catalog.seed_defaults(&ctx).await.expect("second seed");

    assert!(first.skipped.is_empty());
    assert!(second.created.is_empty());
    assert_eq!(second.skipped.len(), first.created.len());
    assert!(
        first
            .created
            .iter()
            .any(|entry| entry.kind == CatalogKind::DutyDefinition)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn default_catalog_has_no_compliance_issues(ctx: TenantContext) {
    let services = Services::new();
    services.seed(&ctx).await;

    let issues = services
        .catalog
        .duty_compliance_issues(&ctx)
        .await
        .expect("compliance check");

    assert!(issues.is_empty(), "unexpected issues: {issues:?}");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bus_duty_needs_a_supervisor_and_approval(ctx: TenantContext) {
    let services = Services::new();
    services.seed(&ctx).await;
    let bus = services.duty(&ctx, "BUS_DUTY").await;
    assert_eq!(bus.risk_level(), RiskLevel::High);

    let unsupervised = services
        .engine
        .create_assignment(
            &ctx,
            CreateAssignmentRequest::new(bus.id(), [teacher("T1")], on("2025-03-04"), admin()),
        )
        .await
        .expect_err("supervisor is required");
    assert_eq!(unsupervised.kind(), ErrorKind::Validation);

    let supervisor = AssigneeId::new("T9").expect("valid supervisor id");
    let mut created = services
        .engine
        .create_assignment(
            &ctx,
            CreateAssignmentRequest::new(bus.id(), [teacher("T1")], on("2025-03-04"), admin())
                .with_supervisor(supervisor),
        )
        .await
        .expect("supervised bus duty is created");
    let details = created.pop().expect("one assignment");
    assert_eq!(details.assignment.status(), AssignmentStatus::PendingApproval);

    let approved = services
        .engine
        .approve_assignment(&ctx, details.assignment.id(), admin())
        .await
        .expect("approval succeeds");
    assert_eq!(approved.assignment.status(), AssignmentStatus::PendingAcceptance);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assembly_duty_only_runs_on_mondays(ctx: TenantContext) {
    let services = Services::new();
    services.seed(&ctx).await;
    let assembly = services.duty(&ctx, "ASSEMBLY_DUTY").await;

    let tuesday = services
        .engine
        .create_assignment(
            &ctx,
            CreateAssignmentRequest::new(
                assembly.id(),
                [teacher("T1")],
                on("2025-03-04"),
                admin(),
            ),
        )
        .await
        .expect_err("assembly slot is Monday only");
    assert_eq!(tuesday.kind(), ErrorKind::Validation);

    services
        .engine
        .create_assignment(
            &ctx,
            CreateAssignmentRequest::new(
                assembly.id(),
                [teacher("T1")],
                on("2025-03-03"),
                admin(),
            ),
        )
        .await
        .expect("Monday assembly is accepted");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn gate_duty_caps_assignees_at_two(ctx: TenantContext) {
    let services = Services::new();
    services.seed(&ctx).await;
    let gate = services.duty(&ctx, "GATE_DUTY").await;

    let err = services
        .engine
        .create_assignment(
            &ctx,
            CreateAssignmentRequest::new(
                gate.id(),
                [teacher("T1"), teacher("T2"), teacher("T3")],
                on("2025-03-03"),
                admin(),
            ),
        )
        .await
        .expect_err("three assignees exceed the bound");

    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn simultaneous_bookings_of_one_teacher_admit_exactly_one(ctx: TenantContext) {
    let services = Arc::new(Services::new());
    services.seed(&ctx).await;
    let gate = services.duty(&ctx, "GATE_DUTY").await;
    let start = Arc::new(Barrier::new(2));

    let attempts = (0..2).map(|_| {
        let services = Arc::clone(&services);
        let start = Arc::clone(&start);
        let ctx = ctx.clone();
        let request =
            CreateAssignmentRequest::new(gate.id(), [teacher("T1")], on("2025-03-05"), admin());
        tokio::spawn(async move {
            start.wait().await;
            services.engine.create_assignment(&ctx, request).await
        })
    });
    let mut outcomes = Vec::new();
    for attempt in attempts.collect::<Vec<_>>() {
        outcomes.push(attempt.await.expect("booking task should not panic"));
    }

    let kinds: Vec<Option<ErrorKind>> = outcomes
        .iter()
        .map(|outcome| outcome.as_ref().err().map(|err| err.kind()))
        .collect();
    assert_eq!(kinds.iter().filter(|kind| kind.is_none()).count(), 1, "{kinds:?}");
    assert!(kinds.contains(&Some(ErrorKind::Conflict)), "{kinds:?}");
    let day = services
        .reporting
        .roster_for_date(&ctx, date("2025-03-05"))
        .await
        .expect("roster loads");
    assert_eq!(day.len(), 1);
}
