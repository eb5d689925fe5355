//! When steps for acceptance workflow BDD scenarios.

use super::world::{RosterWorld, actor, parse_date, run_async, school_days, teacher};
use duty_roster::roster::services::CreateAssignmentRequest;
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when(r#"teacher "{id}" accepts every occurrence"#)]
fn accept_every_occurrence(world: &mut RosterWorld, id: String) -> Result<(), eyre::Report> {
    let ids: Vec<_> = world
        .assignment()?
        .occurrences
        .iter()
        .map(|occurrence| occurrence.id())
        .collect();
    for occurrence_id in ids {
        run_async(world.workflow.accept(&world.ctx, occurrence_id, actor(&id)?))
            .wrap_err("accept occurrence")?;
    }
    world.refresh()
}

#[when(r#"teacher "{id}" declines the occurrence on "{day}" because "{reason}""#)]
fn decline_occurrence(
    world: &mut RosterWorld,
    id: String,
    day: String,
    reason: String,
) -> Result<(), eyre::Report> {
    let occurrence_id = world.occurrence_on(parse_date(&day)?)?.id();
    run_async(
        world
            .workflow
            .decline(&world.ctx, occurrence_id, actor(&id)?, &reason),
    )
    .wrap_err("decline occurrence")?;
    world.refresh()
}

#[when(r#"teacher "{id}" completes the occurrence on "{day}""#)]
fn complete_occurrence(
    world: &mut RosterWorld,
    id: String,
    day: String,
) -> Result<(), eyre::Report> {
    let occurrence_id = world.occurrence_on(parse_date(&day)?)?.id();
    run_async(
        world
            .workflow
            .complete(&world.ctx, occurrence_id, actor(&id)?, None),
    )
    .wrap_err("complete occurrence")?;
    world.refresh()
}

#[when(r#"gate duty is requested for teacher "{id}" from "{from}" to "{to}""#)]
fn request_gate_duty(
    world: &mut RosterWorld,
    id: String,
    from: String,
    to: String,
) -> Result<(), eyre::Report> {
    let duty = world.gate_duty()?;
    let request = CreateAssignmentRequest::new(
        duty.id(),
        [teacher(&id)?],
        school_days(&from, &to)?,
        actor("admin-1")?,
    );
    world.last_request = Some(run_async(
        world.engine.create_assignment(&world.ctx, request),
    ));
    Ok(())
}
