//! Shared world state for activity import BDD scenarios.

use std::sync::Arc;

use activity_import::task::{
    adapters::memory::{
        InMemoryReferenceDirectory, InMemoryStageCatalog, InMemoryTagCatalog,
        InMemoryTaskRepository,
    },
    domain::{ImportRow, Stage, StageLabel, StandardStage, UserId, UserRef},
    services::{
        DuplicatePolicy, ImportReport, ReconcileContext, TaskImportReconciler, TaskImportService,
    },
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestImportService = TaskImportService<
    InMemoryTaskRepository,
    InMemoryReferenceDirectory,
    InMemoryTagCatalog,
    InMemoryStageCatalog,
    DefaultClock,
>;

/// Scenario world for activity import behaviour tests.
pub struct ImportWorld {
    pub directory: Arc<InMemoryReferenceDirectory>,
    pub tags: Arc<InMemoryTagCatalog>,
    pub stages: Arc<InMemoryStageCatalog>,
    pub repository: Arc<InMemoryTaskRepository>,
    pub context: ReconcileContext,
    pub policy: DuplicatePolicy,
    pub pending_rows: Vec<ImportRow>,
    pub last_report: Option<ImportReport>,
}

impl ImportWorld {
    /// Creates a world with an operator and a "Da fare" default stage.
    ///
    /// # Panics
    ///
    /// Panics if the in-memory adapters refuse the seed data.
    #[must_use]
    pub fn new() -> Self {
        let directory = Arc::new(InMemoryReferenceDirectory::new());
        let stages = Arc::new(InMemoryStageCatalog::new());
        let operator = UserRef {
            id: UserId::new(),
            name: "Operatore".to_owned(),
        };
        let default_stage = Stage::new(StageLabel::from(StandardStage::ToDo));
        let context = ReconcileContext::new(operator.id, default_stage.id());
        if let Err(err) = directory
            .add_user(operator)
            .and_then(|()| stages.register(default_stage))
        {
            panic!("seeding the scenario world failed: {err}");
        }

        Self {
            directory,
            tags: Arc::new(InMemoryTagCatalog::new()),
            stages,
            repository: Arc::new(InMemoryTaskRepository::new()),
            context,
            policy: DuplicatePolicy::AlwaysInsert,
            pending_rows: Vec::new(),
            last_report: None,
        }
    }

    /// Builds an import service over the world's adapters.
    #[must_use]
    pub fn service(&self) -> TestImportService {
        let reconciler = TaskImportReconciler::new(
            Arc::clone(&self.directory),
            Arc::clone(&self.tags),
            Arc::clone(&self.stages),
        );
        TaskImportService::new(
            Arc::clone(&self.repository),
            reconciler,
            Arc::new(DefaultClock),
        )
        .with_policy(self.policy)
    }

    /// Returns the line number the next pending row will carry.
    #[must_use]
    pub fn next_line(&self) -> usize {
        self.pending_rows.len() + 2
    }
}

impl Default for ImportWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> ImportWorld {
    ImportWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
