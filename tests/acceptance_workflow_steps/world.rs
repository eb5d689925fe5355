//! Shared world state for acceptance workflow BDD scenarios.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use duty_roster::catalog::{
    adapters::memory::InMemoryCatalogStore,
    domain::{AssigneeKind, DutyDefinition, WeekdaySet},
    services::CatalogService,
};
use duty_roster::roster::{
    adapters::memory::InMemoryRosterRepository,
    domain::{ActorId, AssigneeId, AssigneeRef, AssignmentOccurrence, Recurrence},
    ports::AssignmentDetails,
    services::{AcceptanceWorkflow, AssignmentEngine, RosterReporting, RosterServiceError},
};
use duty_roster::tenant::domain::{OrgSettings, TenantCode, TenantContext, TenantId};
use eyre::WrapErr;
use mockable::Clock;
use rstest::fixture;

/// Day the scenario clock reads.
const TODAY: (i32, u32, u32) = (2025, 3, 7);

/// Clock pinned to noon UTC on [`TODAY`].
#[derive(Debug, Clone, Copy)]
pub struct ScenarioClock(DateTime<Utc>);

impl Clock for ScenarioClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Scenario world wiring the roster services over in-memory stores.
pub struct RosterWorld {
    pub ctx: TenantContext,
    pub catalog: CatalogService<InMemoryCatalogStore, ScenarioClock>,
    pub engine: AssignmentEngine<InMemoryRosterRepository, InMemoryCatalogStore, ScenarioClock>,
    pub workflow: AcceptanceWorkflow<InMemoryRosterRepository, ScenarioClock>,
    pub reporting: RosterReporting<InMemoryRosterRepository>,
    pub assignment: Option<AssignmentDetails>,
    pub last_request: Option<Result<Vec<AssignmentDetails>, RosterServiceError>>,
}

impl RosterWorld {
    /// Creates a world for a fresh tenant with default settings.
    ///
    /// # Panics
    ///
    /// Panics if the fixed scenario date or tenant code is invalid.
    #[must_use]
    pub fn new() -> Self {
        let (year, month, day) = TODAY;
        let noon = NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(12, 0, 0))
            .expect("valid scenario date");
        let clock = Arc::new(ScenarioClock(Utc.from_utc_datetime(&noon)));
        let store = Arc::new(InMemoryCatalogStore::new());
        let roster = Arc::new(InMemoryRosterRepository::new());
        let code = TenantCode::new("riverside").expect("valid tenant code");

        Self {
            ctx: TenantContext::new(TenantId::new(), code, OrgSettings::default()),
            catalog: CatalogService::new(Arc::clone(&store), Arc::clone(&clock)),
            engine: AssignmentEngine::new(Arc::clone(&roster), store, Arc::clone(&clock)),
            workflow: AcceptanceWorkflow::new(Arc::clone(&roster), clock),
            reporting: RosterReporting::new(roster),
            assignment: None,
            last_request: None,
        }
    }

    /// Looks up the seeded gate duty.
    pub fn gate_duty(&self) -> Result<DutyDefinition, eyre::Report> {
        run_async(
            self.catalog
                .find_by_code::<DutyDefinition>(&self.ctx, "GATE_DUTY"),
        )
        .wrap_err("look up gate duty")?
        .ok_or_else(|| eyre::eyre!("gate duty missing from the seeded catalog"))
    }

    /// Returns the scenario's assignment.
    pub fn assignment(&self) -> Result<&AssignmentDetails, eyre::Report> {
        self.assignment
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing assignment in scenario world"))
    }

    /// Reloads the scenario's assignment from the repository.
    pub fn refresh(&mut self) -> Result<(), eyre::Report> {
        let id = self.assignment()?.assignment.id();
        let reloaded = run_async(self.engine.get_assignment(&self.ctx, id))
            .wrap_err("reload assignment")?;
        self.assignment = Some(reloaded);
        Ok(())
    }

    /// Finds the assignment's occurrence on `date`.
    pub fn occurrence_on(&self, date: NaiveDate) -> Result<&AssignmentOccurrence, eyre::Report> {
        self.assignment()?
            .occurrences
            .iter()
            .find(|occurrence| occurrence.date() == date)
            .ok_or_else(|| eyre::eyre!("no occurrence on {date}"))
    }
}

impl Default for RosterWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> RosterWorld {
    RosterWorld::default()
}

/// Builds a teacher reference.
pub fn teacher(id: &str) -> Result<AssigneeRef, eyre::Report> {
    let assignee_id = AssigneeId::new(id).wrap_err("parse assignee id")?;
    Ok(AssigneeRef::new(AssigneeKind::Teacher, assignee_id))
}

/// Builds an actor identifier.
pub fn actor(id: &str) -> Result<ActorId, eyre::Report> {
    ActorId::new(id).wrap_err("parse actor id")
}

/// Parses an ISO date from a step argument.
pub fn parse_date(value: &str) -> Result<NaiveDate, eyre::Report> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").wrap_err_with(|| format!("parse date {value}"))
}

/// Weekday recurrence between two step dates.
pub fn school_days(from: &str, to: &str) -> Result<Recurrence, eyre::Report> {
    Ok(Recurrence::Weekly {
        start: parse_date(from)?,
        end: parse_date(to)?,
        weekdays: WeekdaySet::school_days(),
    })
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
