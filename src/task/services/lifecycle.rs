//! Service layer for stage moves on imported tasks.

use crate::task::{
    domain::{StageId, StageLabel, StandardStage, Task, TaskId},
    ports::{CatalogError, StageCatalog, TaskRepository, TaskRepositoryError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// The task does not exist.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),
    /// The target stage does not exist.
    #[error("stage not found: {0}")]
    StageNotFound(StageId),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// Stage lookup failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<R, S, C>
where
    R: TaskRepository,
    S: StageCatalog,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    stages: Arc<S>,
    clock: Arc<C>,
}

impl<R, S, C> TaskLifecycleService<R, S, C>
where
    R: TaskRepository,
    S: StageCatalog,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, stages: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            repository,
            stages,
            clock,
        }
    }

    /// Retrieves a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the lookup fails.
    pub async fn find_by_id(&self, task_id: TaskId) -> TaskLifecycleResult<Option<Task>> {
        Ok(self.repository.find_by_id(task_id).await?)
    }

    /// Moves a task to any existing stage.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] or
    /// [`TaskLifecycleError::StageNotFound`] for unknown identifiers.
    pub async fn move_to_stage(
        &self,
        task_id: TaskId,
        stage_id: StageId,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        if self.stages.find_by_id(stage_id).await?.is_none() {
            return Err(TaskLifecycleError::StageNotFound(stage_id));
        }
        task.move_to_stage(stage_id, &*self.clock);
        self.repository.update(&task).await?;
        Ok(task)
    }

    /// Flips a task between "Completata" and "Da fare".
    ///
    /// A task in any stage other than "Completata" is completed.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] for an unknown task, or
    /// a wrapped port error.
    pub async fn toggle_completed(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        let mut task = self.load(task_id).await?;
        let current = self.stages.find_by_id(task.details().stage()).await?;
        let is_completed = current
            .and_then(|stage| stage.label().standard())
            .is_some_and(|standard| standard == StandardStage::Completed);
        let target = if is_completed {
            StandardStage::ToDo
        } else {
            StandardStage::Completed
        };

        let stage = self
            .stages
            .get_or_create(&StageLabel::from(target))
            .await?;
        task.move_to_stage(stage.id(), &*self.clock);
        self.repository.update(&task).await?;
        tracing::info!(task_id = %task.id(), stage = target.label(), "toggled completion");
        Ok(task)
    }

    async fn load(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::TaskNotFound(task_id))
    }
}
