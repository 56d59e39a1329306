//! Then steps for activity import BDD scenarios.

use super::world::{ImportWorld, run_async};
use activity_import::task::{
    domain::{ProjectCode, Task, TagCategory},
    ports::{ReferenceDirectory, StageCatalog, TagCatalog, TaskRepository},
    services::ImportReport,
};
use eyre::WrapErr;
use rstest_bdd_macros::then;

fn last_report(world: &ImportWorld) -> Result<&ImportReport, eyre::Report> {
    world
        .last_report
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing import report in scenario world"))
}

fn stored_activity(world: &ImportWorld, name: &str) -> Result<Task, eyre::Report> {
    let tasks = run_async(world.repository.list()).wrap_err("list stored activities")?;
    tasks
        .into_iter()
        .find(|task| task.details().name() == name)
        .ok_or_else(|| eyre::eyre!("no stored activity named {name}"))
}

#[then("{created:usize} created, {updated:usize} updated and {failed:usize} failed rows are reported")]
fn report_counts(
    world: &ImportWorld,
    created: usize,
    updated: usize,
    failed: usize,
) -> Result<(), eyre::Report> {
    let report = last_report(world)?;
    eyre::ensure!(
        (report.created.len(), report.updated.len(), report.failed.len())
            == (created, updated, failed),
        "unexpected report counts:\n{}",
        report.summary()
    );
    Ok(())
}

#[then(r#"activity "{name}" belongs to project "{code}""#)]
fn activity_belongs_to_project(
    world: &ImportWorld,
    name: String,
    code: String,
) -> Result<(), eyre::Report> {
    let task = stored_activity(world, &name)?;
    let project_code = ProjectCode::new(code.as_str()).wrap_err("parse expected commessa")?;
    let project = run_async(world.directory.find_project_by_code(&project_code))
        .wrap_err("look up expected project")?
        .ok_or_else(|| eyre::eyre!("project {code} is not seeded"))?;

    eyre::ensure!(
        task.details().project() == Some(project.id),
        "activity {name} is not linked to project {code}"
    );
    eyre::ensure!(
        task.details().project_code() == Some(code.as_str()),
        "activity {name} lost its commessa text"
    );
    Ok(())
}

#[then(r#"activity "{name}" has no project"#)]
fn activity_has_no_project(world: &ImportWorld, name: String) -> Result<(), eyre::Report> {
    let task = stored_activity(world, &name)?;
    eyre::ensure!(
        task.details().project().is_none(),
        "activity {name} unexpectedly linked to a project"
    );
    eyre::ensure!(
        task.details().project_code().is_some(),
        "activity {name} should keep the commessa text"
    );
    Ok(())
}

#[then(r#"activity "{name}" is in stage "{stage}""#)]
fn activity_is_in_stage(
    world: &ImportWorld,
    name: String,
    stage: String,
) -> Result<(), eyre::Report> {
    let task = stored_activity(world, &name)?;
    let found = run_async(world.stages.find_by_id(task.details().stage()))
        .wrap_err("look up activity stage")?
        .ok_or_else(|| eyre::eyre!("stage of activity {name} does not exist"))?;
    eyre::ensure!(
        found.label().as_str() == stage,
        "activity {name} is in stage {}, expected {stage}",
        found.label()
    );
    Ok(())
}

#[then("{count:usize} import issues are reported")]
fn import_issues_reported(world: &ImportWorld, count: usize) -> Result<(), eyre::Report> {
    let report = last_report(world)?;
    eyre::ensure!(
        report.issues.len() == count,
        "expected {count} import issues, found {:?}",
        report.issues
    );
    Ok(())
}

#[then("{count:usize} macro type tags exist")]
fn macro_type_tags_exist(world: &ImportWorld, count: usize) -> Result<(), eyre::Report> {
    let tags = run_async(world.tags.list(TagCategory::MacroType)).wrap_err("list macro types")?;
    eyre::ensure!(
        tags.len() == count,
        "expected {count} macro type tags, found {}",
        tags.len()
    );
    Ok(())
}

#[then("{count:usize} activities are stored")]
fn activities_are_stored(world: &ImportWorld, count: usize) -> Result<(), eyre::Report> {
    let tasks = run_async(world.repository.list()).wrap_err("list stored activities")?;
    eyre::ensure!(
        tasks.len() == count,
        "expected {count} stored activities, found {}",
        tasks.len()
    );
    Ok(())
}
