//! Repository port for the hosted `projects` table.

use crate::{
    account::domain::UserId,
    project::domain::{NewProject, Project, ProjectId, ProjectStatus},
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for project repository operations.
pub type ProjectRepositoryResult<T> = Result<T, ProjectRepositoryError>;

/// Project table contract.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Inserts a project and returns the stored row with its assigned id
    /// and timestamps.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::Persistence`] when the insert fails.
    async fn insert(&self, project: NewProject) -> ProjectRepositoryResult<Project>;

    /// Finds a project by identifier.
    ///
    /// Returns `None` when the project does not exist.
    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>>;

    /// Returns the projects owned by `owner`, newest first by creation time.
    async fn list_for_owner(&self, owner: UserId) -> ProjectRepositoryResult<Vec<Project>>;

    /// Sets the status of a project and returns the updated row.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectRepositoryError::NotFound`] when the project does not
    /// exist.
    async fn update_status(
        &self,
        id: ProjectId,
        status: ProjectStatus,
    ) -> ProjectRepositoryResult<Project>;
}

/// Errors returned by project repository implementations.
#[derive(Debug, Clone, Error)]
pub enum ProjectRepositoryError {
    /// The project was not found.
    #[error("project not found: {0}")]
    NotFound(ProjectId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl ProjectRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
