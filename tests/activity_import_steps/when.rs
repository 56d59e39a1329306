//! When steps for activity import BDD scenarios.

use super::world::{ImportWorld, run_async};
use activity_import::task::adapters::csv::CsvRowError;
use rstest_bdd_macros::when;

fn import_pending_rows(world: &mut ImportWorld) {
    let service = world.service();
    let rows = world.pending_rows.iter().cloned().map(Ok::<_, CsvRowError>);
    world.last_report = Some(run_async(service.import_rows(rows, &world.context)));
}

#[when("the rows are imported")]
fn rows_are_imported(world: &mut ImportWorld) {
    import_pending_rows(world);
}

#[when("the rows are imported again")]
fn rows_are_imported_again(world: &mut ImportWorld) {
    import_pending_rows(world);
}
