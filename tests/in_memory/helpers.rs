//! Seeded in-memory adapters shared by the integration tests.

use std::sync::Arc;

use activity_import::task::{
    adapters::memory::{
        InMemoryReferenceDirectory, InMemoryStageCatalog, InMemoryTagCatalog,
        InMemoryTaskRepository,
    },
    domain::{
        CompanyId, CompanyRef, ProjectCode, ProjectId, ProjectRef, StageLabel, StandardStage, Task,
        UserId, UserRef,
    },
    ports::{StageCatalog, TaskRepository},
    services::{ReconcileContext, TaskImportReconciler, TaskImportService},
};
use mockable::DefaultClock;

/// Import service over in-memory adapters.
pub type MemoryImportService = TaskImportService<
    InMemoryTaskRepository,
    InMemoryReferenceDirectory,
    InMemoryTagCatalog,
    InMemoryStageCatalog,
    DefaultClock,
>;

/// In-memory adapters seeded with one project, two users and a company.
pub struct SeededStore {
    pub directory: Arc<InMemoryReferenceDirectory>,
    pub tags: Arc<InMemoryTagCatalog>,
    pub stages: Arc<InMemoryStageCatalog>,
    pub repository: Arc<InMemoryTaskRepository>,
    pub operator: UserRef,
    pub project: ProjectRef,
    pub context: ReconcileContext,
}

impl SeededStore {
    /// Seeds reference data and resolves the default stage.
    ///
    /// # Errors
    ///
    /// Returns an error when seeding an adapter fails.
    pub async fn new() -> Result<Self, eyre::Report> {
        let directory = Arc::new(InMemoryReferenceDirectory::new());
        let stages = Arc::new(InMemoryStageCatalog::new());
        let operator = UserRef {
            id: UserId::new(),
            name: "Operatore".to_owned(),
        };
        let project = ProjectRef {
            id: ProjectId::new(),
            code: ProjectCode::new("00001-24")?,
            name: "Ristrutturazione uffici".to_owned(),
            default_stage: None,
        };
        directory.add_user(operator.clone())?;
        directory.add_user(UserRef {
            id: UserId::new(),
            name: "Mario Rossi".to_owned(),
        })?;
        directory.add_project(project.clone())?;
        directory.add_company(CompanyRef {
            id: CompanyId::new(),
            name: "ACME S.p.A.".to_owned(),
        })?;
        let default_stage = stages
            .get_or_create(&StageLabel::from(StandardStage::ToDo))
            .await?;
        let context = ReconcileContext::new(operator.id, default_stage.id());

        Ok(Self {
            directory,
            tags: Arc::new(InMemoryTagCatalog::new()),
            stages,
            repository: Arc::new(InMemoryTaskRepository::new()),
            operator,
            project,
            context,
        })
    }

    /// Builds an import service with the default duplicate policy.
    #[must_use]
    pub fn import_service(&self) -> MemoryImportService {
        TaskImportService::new(
            Arc::clone(&self.repository),
            TaskImportReconciler::new(
                Arc::clone(&self.directory),
                Arc::clone(&self.tags),
                Arc::clone(&self.stages),
            ),
            Arc::new(DefaultClock),
        )
    }

    /// Returns the stored activity with the given name.
    ///
    /// # Errors
    ///
    /// Returns an error when listing fails or no activity matches.
    pub async fn activity(&self, name: &str) -> Result<Task, eyre::Report> {
        self.repository
            .list()
            .await?
            .into_iter()
            .find(|task| task.details().name() == name)
            .ok_or_else(|| eyre::eyre!("no stored activity named {name}"))
    }

    /// Returns the label of the stage an activity sits in.
    ///
    /// # Errors
    ///
    /// Returns an error when the stage cannot be found.
    pub async fn stage_label(&self, task: &Task) -> Result<String, eyre::Report> {
        let stage = self
            .stages
            .find_by_id(task.details().stage())
            .await?
            .ok_or_else(|| eyre::eyre!("stage of {} does not exist", task.details().name()))?;
        Ok(stage.label().to_string())
    }
}
