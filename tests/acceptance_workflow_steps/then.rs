//! Then steps for acceptance workflow BDD scenarios.

use super::world::{RosterWorld, parse_date, run_async, school_days, teacher};
use duty_roster::roster::{
    domain::{AssignmentStatus, OccurrenceStatus},
    services::{ConflictQuery, RosterServiceError},
};
use eyre::WrapErr;
use rstest_bdd_macros::then;
use std::collections::BTreeSet;

#[then(r#"the assignment status is "{status}""#)]
fn assignment_status_is(world: &RosterWorld, status: String) -> Result<(), eyre::Report> {
    let expected = AssignmentStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let actual = world.assignment()?.assignment.status();
    if actual != expected {
        return Err(eyre::eyre!("expected assignment {expected}, found {actual}"));
    }
    Ok(())
}

#[then(r#"the occurrence on "{day}" is "{status}""#)]
fn occurrence_status_is(
    world: &RosterWorld,
    day: String,
    status: String,
) -> Result<(), eyre::Report> {
    let expected = OccurrenceStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let actual = world.occurrence_on(parse_date(&day)?)?.status();
    if actual != expected {
        return Err(eyre::eyre!("expected occurrence {expected}, found {actual}"));
    }
    Ok(())
}

#[then(r#"teacher "{id}" is free for gate duty on "{day}""#)]
fn teacher_is_free(world: &RosterWorld, id: String, day: String) -> Result<(), eyre::Report> {
    let duty = world.gate_duty()?;
    let query = ConflictQuery::new(duty.id(), [teacher(&id)?], school_days(&day, &day)?);
    let report = run_async(world.engine.check_conflicts(&world.ctx, query))
        .wrap_err("check conflicts")?;
    if report.has_conflicts() {
        return Err(eyre::eyre!("expected no conflicts, got {report:?}"));
    }
    Ok(())
}

#[then("the request fails with conflicts on {count:u64} dates")]
fn request_fails_with_conflicts(world: &RosterWorld, count: u64) -> Result<(), eyre::Report> {
    let result = world
        .last_request
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing request result"))?;
    let Err(RosterServiceError::Conflict(report)) = result else {
        return Err(eyre::eyre!("expected a conflict error, got {result:?}"));
    };
    let dates: BTreeSet<_> = report.conflicts().map(|conflict| conflict.date).collect();
    if u64::try_from(dates.len())? != count {
        return Err(eyre::eyre!("expected {count} conflicting dates, got {dates:?}"));
    }
    Ok(())
}
