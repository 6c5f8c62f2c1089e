//! In-memory `projects` table.

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use std::sync::{Arc, PoisonError, RwLock};

use super::InMemoryProjectFeed;
use crate::{
    account::domain::UserId,
    project::{
        domain::{NewProject, Project, ProjectId, ProjectStatus},
        ports::{ProjectChange, ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult},
    },
};

/// Thread-safe in-memory project table.
///
/// When linked to an [`InMemoryProjectFeed`], every insert, update and
/// delete is published to the feed the way the hosted service would.
#[derive(Clone)]
pub struct InMemoryProjectRepository {
    rows: Arc<RwLock<Vec<Project>>>,
    clock: Arc<dyn Clock + Send + Sync>,
    feed: Option<InMemoryProjectFeed>,
}

impl Default for InMemoryProjectRepository {
    fn default() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl std::fmt::Debug for InMemoryProjectRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryProjectRepository")
            .field("rows", &self.rows)
            .field("feed", &self.feed)
            .finish_non_exhaustive()
    }
}

impl InMemoryProjectRepository {
    /// Creates an empty table using the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty table that stamps rows with `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            rows: Arc::default(),
            clock,
            feed: None,
        }
    }

    /// Publishes row changes to `feed`.
    #[must_use]
    pub fn with_feed(mut self, feed: InMemoryProjectFeed) -> Self {
        self.feed = Some(feed);
        self
    }

    /// Returns the owner of a stored project.
    #[must_use]
    pub fn owner_of(&self, id: ProjectId) -> Option<UserId> {
        let rows = self.rows.read().unwrap_or_else(PoisonError::into_inner);
        rows.iter()
            .find(|project| project.id() == id)
            .map(Project::owner)
    }

    /// Deletes a project, as the hosted service would on an external
    /// request. Returns `false` when the project does not exist.
    pub fn delete(&self, id: ProjectId) -> bool {
        let removed = {
            let mut rows = self.rows.write().unwrap_or_else(PoisonError::into_inner);
            rows.iter()
                .position(|project| project.id() == id)
                .map(|index| rows.remove(index))
        };
        let Some(project) = removed else {
            return false;
        };
        self.publish(project.owner(), &ProjectChange::Deleted(id));
        true
    }

    fn publish(&self, owner: UserId, change: &ProjectChange) {
        if let Some(feed) = &self.feed {
            feed.publish(owner, change);
        }
    }
}

fn lock_error(err: impl std::fmt::Display) -> ProjectRepositoryError {
    ProjectRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ProjectRepository for InMemoryProjectRepository {
    async fn insert(&self, project: NewProject) -> ProjectRepositoryResult<Project> {
        let stored = Project::create(project, &*self.clock);
        {
            let mut rows = self.rows.write().map_err(lock_error)?;
            rows.push(stored.clone());
        }
        self.publish(stored.owner(), &ProjectChange::Created(stored.clone()));
        Ok(stored)
    }

    async fn find_by_id(&self, id: ProjectId) -> ProjectRepositoryResult<Option<Project>> {
        let rows = self.rows.read().map_err(lock_error)?;
        Ok(rows.iter().find(|project| project.id() == id).cloned())
    }

    async fn list_for_owner(&self, owner: UserId) -> ProjectRepositoryResult<Vec<Project>> {
        let rows = self.rows.read().map_err(lock_error)?;
        // Later inserts come first among equal timestamps.
        let mut owned: Vec<Project> = rows
            .iter()
            .rev()
            .filter(|project| project.owner() == owner)
            .cloned()
            .collect();
        owned.sort_by(|left, right| right.created_at().cmp(&left.created_at()));
        Ok(owned)
    }

    async fn update_status(
        &self,
        id: ProjectId,
        status: ProjectStatus,
    ) -> ProjectRepositoryResult<Project> {
        let updated = {
            let mut rows = self.rows.write().map_err(lock_error)?;
            let project = rows
                .iter_mut()
                .find(|project| project.id() == id)
                .ok_or(ProjectRepositoryError::NotFound(id))?;
            project.set_status(status, &*self.clock);
            project.clone()
        };
        self.publish(updated.owner(), &ProjectChange::Updated(updated.clone()));
        Ok(updated)
    }
}
