//! Fixtures shared by roster service tests.

use std::sync::Arc;

use crate::catalog::{
    adapters::memory::InMemoryCatalogStore,
    domain::{
        AssigneeKind, DutyCategory, DutyDefinition, DutyDefinitionDraft, Location, LocationDraft,
        LocationType, TimeSlot, TimeSlotDraft, TimeWindow, WeekdaySet,
    },
    services::CatalogService,
};
use crate::roster::{
    adapters::memory::InMemoryRosterRepository,
    domain::{
        ActorId, AssigneeId, AssigneeRef, AssignmentId, AssignmentOccurrence, AuditLogEntry,
        Booking, OccurrenceId, Recurrence,
    },
    ports::{
        AssignmentBatch, AssignmentDetails, RosterRepository, RosterRepositoryResult,
        StateChange,
    },
    services::{AcceptanceWorkflow, AssignmentEngine, RosterReporting},
};
use crate::tenant::domain::{OrgSettings, TenantContext};
use crate::test_support::{FixedClock, date, tenant};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};
use tokio::sync::Barrier;

pub(super) const TODAY: &str = "2025-03-03";

pub(super) type Engine =
    AssignmentEngine<InMemoryRosterRepository, InMemoryCatalogStore, FixedClock>;
pub(super) type Workflow = AcceptanceWorkflow<InMemoryRosterRepository, FixedClock>;

/// Services wired over shared in-memory stores for one tenant.
pub(super) struct Harness {
    pub(super) ctx: TenantContext,
    pub(super) catalog: CatalogService<InMemoryCatalogStore, FixedClock>,
    pub(super) engine: Engine,
    pub(super) reporting: RosterReporting<InMemoryRosterRepository>,
    roster: Arc<InMemoryRosterRepository>,
}

impl Harness {
    pub(super) fn new(settings: OrgSettings) -> Self {
        let clock = Arc::new(FixedClock::on(date(TODAY)));
        let store = Arc::new(InMemoryCatalogStore::new());
        let roster = Arc::new(InMemoryRosterRepository::new());
        Self {
            ctx: tenant("greenfield", settings),
            catalog: CatalogService::new(Arc::clone(&store), Arc::clone(&clock)),
            engine: AssignmentEngine::new(Arc::clone(&roster), store, clock),
            reporting: RosterReporting::new(Arc::clone(&roster)),
            roster,
        }
    }

    /// Workflow whose clock reads noon on `today`.
    pub(super) fn workflow(&self, today: &str) -> Workflow {
        AcceptanceWorkflow::new(
            Arc::clone(&self.roster),
            Arc::new(FixedClock::on(date(today))),
        )
    }

    /// Workflow whose assignment reads wait until `parties` callers have
    /// loaded the same snapshot.
    pub(super) fn lockstep_workflow(
        &self,
        today: &str,
        parties: usize,
    ) -> AcceptanceWorkflow<LockstepRoster, FixedClock> {
        let roster = LockstepRoster {
            inner: Arc::clone(&self.roster),
            barrier: Barrier::new(parties),
        };
        AcceptanceWorkflow::new(Arc::new(roster), Arc::new(FixedClock::on(date(today))))
    }

    pub(super) async fn slot(
        &self,
        code: &str,
        start: (u32, u32),
        end: (u32, u32),
    ) -> TimeSlot {
        self.catalog
            .create::<TimeSlot>(
                &self.ctx,
                TimeSlotDraft::new(code, code, time(start.0, start.1), time(end.0, end.1)),
            )
            .await
            .expect("slot creation should succeed")
    }

    pub(super) async fn location(&self, code: &str) -> Location {
        self.catalog
            .create::<Location>(&self.ctx, LocationDraft::new(code, code, LocationType::Gate))
            .await
            .expect("location creation should succeed")
    }

    pub(super) async fn duty(&self, draft: DutyDefinitionDraft) -> DutyDefinition {
        self.catalog
            .create::<DutyDefinition>(&self.ctx, draft)
            .await
            .expect("duty creation should succeed")
    }

    /// Morning gate duty: teachers and staff, at most four, 07:30 to 08:15.
    pub(super) async fn gate_duty(&self) -> DutyDefinition {
        let slot = self.slot("MORNING_GATE", (7, 30), (8, 15)).await;
        self.duty(
            DutyDefinitionDraft::new(
                "GATE_DUTY",
                "Morning Gate Duty",
                DutyCategory::Operational,
                [AssigneeKind::Teacher, AssigneeKind::Staff],
            )
            .with_assignee_bounds(None, Some(4))
            .with_default_time_slot(slot.id()),
        )
        .await
    }

    /// Recess supervision: teachers, 12:00 to 12:45.
    pub(super) async fn recess_duty(&self) -> DutyDefinition {
        let slot = self.slot("RECESS", (12, 0), (12, 45)).await;
        self.duty(
            DutyDefinitionDraft::new(
                "RECESS_SUPERVISION",
                "Recess Supervision",
                DutyCategory::Operational,
                [AssigneeKind::Teacher],
            )
            .with_default_time_slot(slot.id()),
        )
        .await
    }

    /// Student duty with a weekly cap, 13:00 to 13:30.
    pub(super) async fn student_duty(&self, code: &str, cap: u16) -> DutyDefinition {
        let slot = self.slot(&format!("{code}_SLOT"), (13, 0), (13, 30)).await;
        self.duty(
            DutyDefinitionDraft::new(
                code,
                code,
                DutyCategory::StudentLeadership,
                [AssigneeKind::Student],
            )
            .with_student_weekly_cap(cap)
            .with_default_time_slot(slot.id()),
        )
        .await
    }
}

/// Roster store that holds every assignment read at a barrier, so that
/// concurrent transitions start from the same snapshot.
pub(super) struct LockstepRoster {
    inner: Arc<InMemoryRosterRepository>,
    barrier: Barrier,
}

#[async_trait]
impl RosterRepository for LockstepRoster {
    async fn find_bookings(
        &self,
        ctx: &TenantContext,
        assignees: &[AssigneeRef],
        from: NaiveDate,
        to: NaiveDate,
    ) -> RosterRepositoryResult<Vec<Booking>> {
        self.inner.find_bookings(ctx, assignees, from, to).await
    }

    async fn create_assignments(
        &self,
        ctx: &TenantContext,
        batch: AssignmentBatch,
    ) -> RosterRepositoryResult<()> {
        self.inner.create_assignments(ctx, batch).await
    }

    async fn find_assignment(
        &self,
        ctx: &TenantContext,
        id: AssignmentId,
    ) -> RosterRepositoryResult<Option<AssignmentDetails>> {
        let found = self.inner.find_assignment(ctx, id).await;
        self.barrier.wait().await;
        found
    }

    async fn find_occurrence(
        &self,
        ctx: &TenantContext,
        id: OccurrenceId,
    ) -> RosterRepositoryResult<Option<AssignmentOccurrence>> {
        self.inner.find_occurrence(ctx, id).await
    }

    async fn apply_change(
        &self,
        ctx: &TenantContext,
        change: StateChange,
    ) -> RosterRepositoryResult<()> {
        self.inner.apply_change(ctx, change).await
    }

    async fn assignments_for_assignee(
        &self,
        ctx: &TenantContext,
        assignee: &AssigneeRef,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RosterRepositoryResult<Vec<AssignmentDetails>> {
        self.inner
            .assignments_for_assignee(ctx, assignee, from, to)
            .await
    }

    async fn occurrences_between(
        &self,
        ctx: &TenantContext,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RosterRepositoryResult<Vec<AssignmentOccurrence>> {
        self.inner.occurrences_between(ctx, from, to).await
    }

    async fn audit_trail(
        &self,
        ctx: &TenantContext,
        assignment_id: AssignmentId,
    ) -> RosterRepositoryResult<Vec<AuditLogEntry>> {
        self.inner.audit_trail(ctx, assignment_id).await
    }
}

pub(super) fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("valid time")
}

pub(super) fn window(start: (u32, u32), end: (u32, u32)) -> TimeWindow {
    TimeWindow::new(time(start.0, start.1), time(end.0, end.1)).expect("valid window")
}

pub(super) fn teacher(id: &str) -> AssigneeRef {
    AssigneeRef::new(
        AssigneeKind::Teacher,
        AssigneeId::new(id).expect("valid assignee id"),
    )
}

pub(super) fn student(id: &str) -> AssigneeRef {
    AssigneeRef::new(
        AssigneeKind::Student,
        AssigneeId::new(id).expect("valid assignee id"),
    )
}

pub(super) fn actor(id: &str) -> ActorId {
    ActorId::new(id).expect("valid actor id")
}

pub(super) fn admin() -> ActorId {
    actor("admin-1")
}

pub(super) fn once(day: &str) -> Recurrence {
    Recurrence::Once { date: date(day) }
}

/// Monday 2025-03-03 to Friday 2025-03-07.
pub(super) fn school_week() -> Recurrence {
    weekdays_between("2025-03-03", "2025-03-07")
}

pub(super) fn weekdays_between(start: &str, end: &str) -> Recurrence {
    Recurrence::Weekly {
        start: date(start),
        end: date(end),
        weekdays: WeekdaySet::school_days(),
    }
}

pub(super) fn dates(values: &[&str]) -> Vec<NaiveDate> {
    values.iter().map(|value| date(value)).collect()
}
