//! Catalog seeding and code uniqueness against `PostgreSQL`.

use super::helpers::{PgHarness, test_pool};
use chrono::NaiveTime;
use duty_roster::catalog::{
    domain::{CatalogKind, DutyDefinition, Location, TimeSlot, TimeSlotDraft},
    services::CatalogServiceError,
};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn seeding_links_duties_to_their_slots_and_locations() {
    let Some(pool) = test_pool() else {
        return;
    };
    let harness = PgHarness::new(pool, "2025-03-03");

    let first = harness.catalog.seed_defaults(&harness.ctx).await.expect("seed");
    let second = harness
        .catalog
        .seed_defaults(&harness.ctx)
        .await
        .expect("reseed");

    assert!(second.created.is_empty());
    assert_eq!(second.skipped.len(), first.created.len());

    let gate = harness
        .catalog
        .find_by_code::<DutyDefinition>(&harness.ctx, "GATE_DUTY")
        .await
        .expect("lookup")
        .expect("gate duty seeded");
    let slot = harness
        .catalog
        .find_by_code::<TimeSlot>(&harness.ctx, "MORNING_GATE")
        .await
        .expect("lookup")
        .expect("slot seeded");
    let location = harness
        .catalog
        .find_by_code::<Location>(&harness.ctx, "MAIN_GATE")
        .await
        .expect("lookup")
        .expect("location seeded");
    assert_eq!(gate.default_time_slot(), Some(slot.id()));
    assert_eq!(gate.default_location(), Some(location.id()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_codes_are_rejected_per_tenant() {
    let Some(pool) = test_pool() else {
        return;
    };
    let harness = PgHarness::new(pool.clone(), "2025-03-03");
    let neighbour = PgHarness::new(pool, "2025-03-03");
    let draft = || {
        TimeSlotDraft::new(
            "BREAKFAST_CLUB",
            "Breakfast Club",
            NaiveTime::from_hms_opt(7, 0, 0).expect("valid time"),
            NaiveTime::from_hms_opt(7, 40, 0).expect("valid time"),
        )
    };

    harness
        .catalog
        .create::<TimeSlot>(&harness.ctx, draft())
        .await
        .expect("first slot");
    let err = harness
        .catalog
        .create::<TimeSlot>(&harness.ctx, draft())
        .await
        .expect_err("duplicate code");
    neighbour
        .catalog
        .create::<TimeSlot>(&neighbour.ctx, draft())
        .await
        .expect("another tenant may reuse the code");

    assert!(matches!(
        err,
        CatalogServiceError::DuplicateCode {
            kind: CatalogKind::TimeSlot,
            ..
        }
    ));
}
