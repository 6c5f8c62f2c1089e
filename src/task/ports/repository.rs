//! Repository port for the hosted `tasks` table.

use crate::{
    account::domain::UserId,
    project::domain::ProjectId,
    task::domain::{NewTask, PositionUpdate, Task, TaskDetails, TaskId},
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task table contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Inserts a task and returns the stored row with its assigned id and
    /// timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::UnknownProject`] or
    /// [`TaskRepositoryError::OwnerMismatch`] when the task does not belong
    /// to a project of the same owner.
    async fn insert(&self, task: NewTask) -> TaskRepositoryResult<Task>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns the tasks of a project ordered by their `order` field.
    async fn list_for_project(&self, project_id: ProjectId) -> TaskRepositoryResult<Vec<Task>>;

    /// Writes a column and optional order change for one task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn update_position(
        &self,
        id: TaskId,
        update: PositionUpdate,
    ) -> TaskRepositoryResult<Task>;

    /// Writes edited fields for one task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not exist.
    async fn update_details(&self, id: TaskId, details: TaskDetails)
    -> TaskRepositoryResult<Task>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The referenced project does not exist.
    #[error("unknown project: {0}")]
    UnknownProject(ProjectId),

    /// The project belongs to a different user than the task.
    #[error("project {project_id} is not owned by user {owner}")]
    OwnerMismatch {
        /// Referenced project.
        project_id: ProjectId,
        /// Owner recorded on the task.
        owner: UserId,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
