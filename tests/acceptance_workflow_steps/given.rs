//! Given steps for acceptance workflow BDD scenarios.

use super::world::{RosterWorld, actor, run_async, school_days, teacher};
use duty_roster::roster::services::CreateAssignmentRequest;
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given("a school with the default duty catalog")]
fn default_catalog(world: &mut RosterWorld) -> Result<(), eyre::Report> {
    let report = run_async(world.catalog.seed_defaults(&world.ctx)).wrap_err("seed catalog")?;
    if report.created.is_empty() {
        return Err(eyre::eyre!("seeding created no catalog entries"));
    }
    Ok(())
}

#[given(r#"teacher "{id}" holds gate duty from "{from}" to "{to}""#)]
fn teacher_holds_gate_duty(
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
    let mut created = run_async(world.engine.create_assignment(&world.ctx, request))
        .wrap_err("create gate assignment")?;
    world.assignment = created.pop();
    Ok(())
}
