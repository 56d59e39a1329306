//! Shared fixture: reference data seeded into in-memory adapters.

use std::sync::Arc;

use crate::task::{
    adapters::memory::{
        InMemoryReferenceDirectory, InMemoryStageCatalog, InMemoryTagCatalog,
        InMemoryTaskRepository,
    },
    domain::{
        CompanyId, CompanyRef, ImportRow, ProjectCode, ProjectId, ProjectRef, Stage, StageLabel,
        StandardStage, UserId, UserRef,
    },
    services::{ReconcileContext, TaskImportReconciler, TaskImportService},
};
use mockable::DefaultClock;
use rstest::fixture;

pub(super) type TestReconciler =
    TaskImportReconciler<InMemoryReferenceDirectory, InMemoryTagCatalog, InMemoryStageCatalog>;

pub(super) type TestImportService = TaskImportService<
    InMemoryTaskRepository,
    InMemoryReferenceDirectory,
    InMemoryTagCatalog,
    InMemoryStageCatalog,
    DefaultClock,
>;

pub(super) struct ImportWorld {
    pub directory: Arc<InMemoryReferenceDirectory>,
    pub tags: Arc<InMemoryTagCatalog>,
    pub stages: Arc<InMemoryStageCatalog>,
    pub repository: Arc<InMemoryTaskRepository>,
    pub operator: UserRef,
    pub assignee: UserRef,
    pub project: ProjectRef,
    pub company: CompanyRef,
    pub default_stage: Stage,
    pub context: ReconcileContext,
}

impl ImportWorld {
    pub fn reconciler(&self) -> TestReconciler {
        TaskImportReconciler::new(
            Arc::clone(&self.directory),
            Arc::clone(&self.tags),
            Arc::clone(&self.stages),
        )
    }

    pub fn service(&self) -> TestImportService {
        TaskImportService::new(
            Arc::clone(&self.repository),
            self.reconciler(),
            Arc::new(DefaultClock),
        )
    }
}

#[fixture]
pub(super) fn world() -> ImportWorld {
    let directory = Arc::new(InMemoryReferenceDirectory::new());
    let stages = Arc::new(InMemoryStageCatalog::new());

    let operator = UserRef {
        id: UserId::new(),
        name: "Operatore".to_owned(),
    };
    let assignee = UserRef {
        id: UserId::new(),
        name: "Mario Rossi".to_owned(),
    };
    let project = ProjectRef {
        id: ProjectId::new(),
        code: ProjectCode::new("00001-24").expect("valid commessa"),
        name: "Ristrutturazione uffici".to_owned(),
        default_stage: None,
    };
    let company = CompanyRef {
        id: CompanyId::new(),
        name: "ACME S.p.A.".to_owned(),
    };
    let default_stage = Stage::new(StageLabel::from(StandardStage::ToDo));

    directory
        .add_user(operator.clone())
        .expect("seed operator");
    directory
        .add_user(assignee.clone())
        .expect("seed assignee");
    directory
        .add_project(project.clone())
        .expect("seed project");
    directory
        .add_company(company.clone())
        .expect("seed company");
    stages
        .register(default_stage.clone())
        .expect("seed default stage");

    let context = ReconcileContext::new(operator.id, default_stage.id());
    ImportWorld {
        directory,
        tags: Arc::new(InMemoryTagCatalog::new()),
        stages,
        repository: Arc::new(InMemoryTaskRepository::new()),
        operator,
        assignee,
        project,
        company,
        default_stage,
        context,
    }
}

/// Builds a row from `(header, value)` pairs on line 2.
pub(super) fn row(cells: &[(&str, &str)]) -> ImportRow {
    row_at(2, cells)
}

pub(super) fn row_at(line: usize, cells: &[(&str, &str)]) -> ImportRow {
    ImportRow::from_cells(line, cells.iter().copied())
}
