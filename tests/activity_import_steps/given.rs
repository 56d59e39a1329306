//! Given steps for activity import BDD scenarios.

use super::world::ImportWorld;
use activity_import::task::{
    domain::{ImportColumn, ImportRow, ProjectCode, ProjectId, ProjectRef, UserId, UserRef},
    services::DuplicatePolicy,
};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"project "{code}" and user "{user}" exist"#)]
fn project_and_user_exist(
    world: &mut ImportWorld,
    code: String,
    user: String,
) -> Result<(), eyre::Report> {
    let project = ProjectRef {
        id: ProjectId::new(),
        code: ProjectCode::new(code).wrap_err("construct seeded commessa")?,
        name: "Ristrutturazione uffici".to_owned(),
        default_stage: None,
    };
    world
        .directory
        .add_project(project)
        .wrap_err("seed project")?;
    world
        .directory
        .add_user(UserRef {
            id: UserId::new(),
            name: user,
        })
        .wrap_err("seed user")?;
    Ok(())
}

#[given(r#"a row named "{name}" with commessa "{code}" and status "{status}""#)]
fn row_with_commessa_and_status(
    world: &mut ImportWorld,
    name: String,
    code: String,
    status: String,
) {
    let row = ImportRow::new(world.next_line())
        .with_cell(ImportColumn::Name.label(), name)
        .with_cell(ImportColumn::ProjectCode.label(), code)
        .with_cell(ImportColumn::Status.label(), status);
    world.pending_rows.push(row);
}

#[given(r#"the row carries macro types "{tags}""#)]
fn row_carries_macro_types(world: &mut ImportWorld, tags: String) -> Result<(), eyre::Report> {
    let row = world
        .pending_rows
        .pop()
        .ok_or_else(|| eyre::eyre!("no pending row to extend"))?;
    world
        .pending_rows
        .push(row.with_cell(ImportColumn::MacroType.label(), tags));
    Ok(())
}

#[given("a row without a name")]
fn row_without_name(world: &mut ImportWorld) {
    let row = ImportRow::new(world.next_line())
        .with_cell(ImportColumn::Name.label(), "")
        .with_cell(ImportColumn::ProjectCode.label(), "00001-24");
    world.pending_rows.push(row);
}

#[given("duplicate activities are updated")]
fn duplicates_are_updated(world: &mut ImportWorld) {
    world.policy = DuplicatePolicy::UpdateExisting;
}
