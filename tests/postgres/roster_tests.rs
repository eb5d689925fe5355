//! Assignment creation, the acceptance workflow and audit ordering against
//! `PostgreSQL`.

use super::helpers::{PgHarness, date, test_pool};
use diesel::prelude::*;
use duty_roster::catalog::domain::{AssigneeKind, DutyDefinition, WeekdaySet};
use duty_roster::roster::{
    domain::{
        ActorId, AssigneeId, AssigneeRef, AssignmentStatus, AuditAction, AuditLogEntry,
        OccurrenceStatus, Recurrence,
    },
    ports::AssignmentDetails,
    services::{ConflictQuery, CreateAssignmentRequest, ErrorKind, RosterServiceError},
};
use rstest::rstest;
use std::sync::Arc;
use tokio::sync::Barrier;

fn teacher(id: &str) -> AssigneeRef {
    AssigneeRef::new(
        AssigneeKind::Teacher,
        AssigneeId::new(id).expect("valid assignee id"),
    )
}

fn actor(id: &str) -> ActorId {
    ActorId::new(id).expect("valid actor id")
}

fn school_week() -> Recurrence {
    Recurrence::Weekly {
        start: date("2025-03-03"),
        end: date("2025-03-07"),
        weekdays: WeekdaySet::school_days(),
    }
}

async fn seeded(today: &str) -> Option<PgHarness> {
    let pool = test_pool()?;
    let harness = PgHarness::new(pool, today);
    harness
        .catalog
        .seed_defaults(&harness.ctx)
        .await
        .expect("seed");
    Some(harness)
}

async fn duty(harness: &PgHarness, code: &str) -> DutyDefinition {
    harness
        .catalog
        .find_by_code::<DutyDefinition>(&harness.ctx, code)
        .await
        .expect("lookup")
        .expect("duty seeded")
}

async fn book(
    harness: &PgHarness,
    duty: &DutyDefinition,
    who: &str,
    recurrence: Recurrence,
) -> AssignmentDetails {
    harness
        .engine
        .create_assignment(
            &harness.ctx,
            CreateAssignmentRequest::new(duty.id(), [teacher(who)], recurrence, actor("admin-1")),
        )
        .await
        .expect("assignment created")
        .pop()
        .expect("one assignment")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn accepted_week_is_scheduled_with_an_ordered_audit_trail() {
    let Some(harness) = seeded("2025-03-03").await else {
        return;
    };
    let gate = duty(&harness, "GATE_DUTY").await;
    let created = book(&harness, &gate, "T1", school_week()).await;

    let stored = harness
        .engine
        .get_assignment(&harness.ctx, created.assignment.id())
        .await
        .expect("assignment loads");
    assert_eq!(stored.occurrences.len(), 5);
    assert!(
        stored
            .occurrences
            .windows(2)
            .all(|pair| pair.first().map(|o| o.date()) < pair.last().map(|o| o.date()))
    );

    for occurrence in &stored.occurrences {
        harness
            .workflow
            .accept(&harness.ctx, occurrence.id(), actor("T1"))
            .await
            .expect("accept");
    }

    let scheduled = harness
        .engine
        .get_assignment(&harness.ctx, created.assignment.id())
        .await
        .expect("assignment loads");
    assert_eq!(scheduled.assignment.status(), AssignmentStatus::Scheduled);
    let trail = harness
        .reporting
        .audit_trail(&harness.ctx, created.assignment.id())
        .await
        .expect("audit trail loads");
    let actions: Vec<_> = trail.iter().map(AuditLogEntry::action).collect();
    assert_eq!(actions.first(), Some(&AuditAction::Created));
    assert_eq!(actions.len(), 6);
    assert!(
        actions
            .iter()
            .skip(1)
            .all(|action| *action == AuditAction::OccurrenceAccepted)
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn overlapping_request_is_rejected_without_writes() {
    let Some(harness) = seeded("2025-03-03").await else {
        return;
    };
    let gate = duty(&harness, "GATE_DUTY").await;
    book(&harness, &gate, "T1", school_week()).await;

    let err = harness
        .engine
        .create_assignment(
            &harness.ctx,
            CreateAssignmentRequest::new(
                gate.id(),
                [teacher("T1")],
                Recurrence::Once {
                    date: date("2025-03-05"),
                },
                actor("admin-1"),
            ),
        )
        .await
        .expect_err("double booking is rejected");

    let RosterServiceError::Conflict(report) = err else {
        panic!("expected a conflict, got {err:?}");
    };
    assert_eq!(report.conflicts().count(), 1);
    let day = harness
        .reporting
        .roster_for_date(&harness.ctx, date("2025-03-05"))
        .await
        .expect("roster loads");
    assert_eq!(day.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn declined_occurrence_releases_the_booking() {
    let Some(harness) = seeded("2025-03-03").await else {
        return;
    };
    let gate = duty(&harness, "GATE_DUTY").await;
    let tuesday = Recurrence::Once {
        date: date("2025-03-04"),
    };
    let first = book(&harness, &gate, "T1", tuesday).await;
    let occurrence = first.occurrences.first().expect("one occurrence");

    let declined = harness
        .workflow
        .decline(&harness.ctx, occurrence.id(), actor("T1"), "  training day ")
        .await
        .expect("decline");
    assert_eq!(declined.status(), OccurrenceStatus::Declined);
    assert_eq!(declined.decline_reason(), Some("training day"));

    let report = harness
        .engine
        .check_conflicts(
            &harness.ctx,
            ConflictQuery::new(gate.id(), [teacher("T1")], tuesday),
        )
        .await
        .expect("preview");
    assert!(!report.has_conflicts());
    book(&harness, &gate, "T1", tuesday).await;
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn workload_counts_minutes_per_teacher() {
    let Some(harness) = seeded("2025-03-03").await else {
        return;
    };
    let gate = duty(&harness, "GATE_DUTY").await;
    let recess = duty(&harness, "RECESS_SUPERVISION").await;
    book(&harness, &gate, "T1", school_week()).await;
    book(
        &harness,
        &recess,
        "T2",
        Recurrence::Once {
            date: date("2025-03-06"),
        },
    )
    .await;

    let summary = harness
        .reporting
        .workload_summary(&harness.ctx, date("2025-03-03"), date("2025-03-07"))
        .await
        .expect("summary");

    let t1 = summary
        .iter()
        .find(|entry| entry.assignee == teacher("T1"))
        .expect("T1 summarised");
    let t2 = summary
        .iter()
        .find(|entry| entry.assignee == teacher("T2"))
        .expect("T2 summarised");
    assert_eq!((t1.live, t1.total_minutes), (5, 225));
    assert_eq!((t2.live, t2.total_minutes), (1, 30));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cancelled_assignment_leaves_the_day_roster() {
    let Some(harness) = seeded("2025-03-03").await else {
        return;
    };
    let gate = duty(&harness, "GATE_DUTY").await;
    let created = book(&harness, &gate, "T1", school_week()).await;

    let cancelled = harness
        .engine
        .cancel_assignment(
            &harness.ctx,
            created.assignment.id(),
            Some("timetable change".to_owned()),
            actor("admin-1"),
        )
        .await
        .expect("cancel");

    assert_eq!(cancelled.assignment.status(), AssignmentStatus::Cancelled);
    assert!(
        cancelled
            .occurrences
            .iter()
            .all(|o| o.status() == OccurrenceStatus::Cancelled)
    );
    let day = harness
        .reporting
        .roster_for_date(&harness.ctx, date("2025-03-04"))
        .await
        .expect("roster loads");
    assert!(day.is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn simultaneous_bookings_of_one_teacher_commit_one_row() {
    let Some(harness) = seeded("2025-03-03").await else {
        return;
    };
    let harness = Arc::new(harness);
    let gate = duty(&harness, "GATE_DUTY").await;
    let start = Arc::new(Barrier::new(2));

    let attempts: Vec<_> = (0..2)
        .map(|_| {
            let harness = Arc::clone(&harness);
            let start = Arc::clone(&start);
            let request = CreateAssignmentRequest::new(
                gate.id(),
                [teacher("T1")],
                Recurrence::Once {
                    date: date("2025-03-05"),
                },
                actor("admin-1"),
            );
            tokio::spawn(async move {
                start.wait().await;
                harness.engine.create_assignment(&harness.ctx, request).await
            })
        })
        .collect();
    let mut kinds = Vec::new();
    for attempt in attempts {
        let outcome = attempt.await.expect("booking task should not panic");
        kinds.push(outcome.err().map(|err| err.kind()));
    }

    assert_eq!(kinds.iter().filter(|kind| kind.is_none()).count(), 1, "{kinds:?}");
    assert!(kinds.contains(&Some(ErrorKind::Conflict)), "{kinds:?}");
    let tenant = harness.ctx.tenant_id().into_inner();
    let rows = {
        let mut conn = harness.connection();
        tokio::task::block_in_place(|| {
            diesel::sql_query(
                "SELECT COUNT(*) AS total FROM roster_occurrences \
                 WHERE tenant_id = $1 AND occurrence_date = $2",
            )
            .bind::<diesel::sql_types::Uuid, _>(tenant)
            .bind::<diesel::sql_types::Date, _>(date("2025-03-05"))
            .get_result::<OccurrenceCount>(&mut conn)
            .expect("count query runs")
        })
    };
    assert_eq!(rows.total, 1);
}

#[derive(diesel::QueryableByName)]
struct OccurrenceCount {
    #[diesel(sql_type = diesel::sql_types::BigInt)]
    total: i64,
}
