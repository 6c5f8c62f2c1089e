//! Dashboard service holding a user's project list.
//!
//! The list is loaded once, newest first, and then kept current by applying
//! push-feed events through [`crate::sync::apply_change`]. Newly created
//! projects reach the list through the feed rather than local insertion.

use crate::{
    account::domain::UserId,
    notice::{Notice, Notifier, report_failure},
    project::{
        domain::{NewProject, Project, ProjectDomainError},
        ports::{
            FeedError, FeedFilter, FeedSubscription, ProjectChange, ProjectFeed,
            ProjectRepository, ProjectRepositoryError,
        },
    },
    sync::apply_change,
};
use im::Vector;
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tracing::{debug, info};

/// Request payload for the create-project form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateProjectRequest {
    name: String,
    description: String,
}

impl CreateProjectRequest {
    /// Creates a request from form values.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Errors returned by [`ProjectDashboard`].
#[derive(Debug, Clone, Error)]
pub enum DashboardError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] ProjectDomainError),

    /// The project table call failed.
    #[error(transparent)]
    Repository(#[from] ProjectRepositoryError),

    /// The push feed call failed.
    #[error(transparent)]
    Feed(#[from] FeedError),

    /// The in-memory list lock was poisoned.
    #[error("project list state is poisoned")]
    StatePoisoned,
}

/// Result type for dashboard operations.
pub type DashboardResult<T> = Result<T, DashboardError>;

/// Holds and synchronizes the project list shown on the dashboard.
pub struct ProjectDashboard<R, F, N>
where
    R: ProjectRepository,
    F: ProjectFeed,
    N: Notifier,
{
    repository: Arc<R>,
    feed: Arc<F>,
    notifier: Arc<N>,
    projects: RwLock<Vector<Project>>,
}

impl<R, F, N> ProjectDashboard<R, F, N>
where
    R: ProjectRepository,
    F: ProjectFeed,
    N: Notifier,
{
    /// Creates a dashboard with an empty project list.
    #[must_use]
    pub fn new(repository: Arc<R>, feed: Arc<F>, notifier: Arc<N>) -> Self {
        Self {
            repository,
            feed,
            notifier,
            projects: RwLock::new(Vector::new()),
        }
    }

    /// Fetches the owner's projects, newest first, replacing the list.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Repository`] when the fetch fails; the held
    /// list is left as it was.
    pub async fn load(&self, owner: UserId) -> DashboardResult<Vec<Project>> {
        let fetched = match self.repository.list_for_owner(owner).await {
            Ok(projects) => projects,
            Err(err) => {
                report_failure(&*self.notifier, "Failed to load projects", &err);
                return Err(err.into());
            }
        };
        self.replace(fetched.iter().cloned().collect())?;
        info!(owner = %owner, count = fetched.len(), "loaded projects");
        Ok(fetched)
    }

    /// Opens a feed subscription scoped to the owner's projects.
    ///
    /// The subscription is released when the returned value is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Feed`] when the feed refuses the
    /// subscription.
    pub async fn subscribe(&self, owner: UserId) -> DashboardResult<FeedSubscription> {
        self.feed
            .subscribe(FeedFilter::projects_owned_by(owner))
            .await
            .map_err(|err| {
                report_failure(&*self.notifier, "Failed to subscribe to project updates", &err);
                err.into()
            })
    }

    /// Applies one change event to the held list.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::StatePoisoned`] when the list lock is
    /// poisoned.
    pub fn apply_change(&self, change: ProjectChange) -> DashboardResult<()> {
        let mut projects = self
            .projects
            .write()
            .map_err(|_| DashboardError::StatePoisoned)?;
        debug!(kind = change.kind(), project_id = %change.row_id(), "applying project change");
        let next = apply_change(&projects, change);
        *projects = next;
        Ok(())
    }

    /// Applies events from `subscription` until the feed disconnects.
    ///
    /// Returns the number of events applied. No reconnection or backfill is
    /// attempted.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::StatePoisoned`] when the list lock is
    /// poisoned.
    pub async fn sync(&self, subscription: &mut FeedSubscription) -> DashboardResult<usize> {
        let mut applied = 0;
        while let Some(change) = subscription.next_change().await {
            self.apply_change(change)?;
            applied += 1;
        }
        info!(
            owner = %subscription.filter().owner(),
            applied,
            "project feed disconnected"
        );
        Ok(applied)
    }

    /// Creates an active project owned by `owner`.
    ///
    /// The held list is not modified; the feed delivers the new row.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Domain`] when the name is blank or
    /// [`DashboardError::Repository`] when the insert fails.
    pub async fn create_project(
        &self,
        owner: UserId,
        request: CreateProjectRequest,
    ) -> DashboardResult<Project> {
        let result = self.insert_project(owner, request).await;
        match &result {
            Ok(project) => {
                info!(project_id = %project.id(), owner = %owner, "created project");
                self.notifier
                    .notify(Notice::success("Project created successfully!"));
            }
            Err(err) => report_failure(&*self.notifier, "Failed to create project", err),
        }
        result
    }

    /// Returns a copy of the held project list.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::StatePoisoned`] when the list lock is
    /// poisoned.
    pub fn projects(&self) -> DashboardResult<Vec<Project>> {
        let projects = self
            .projects
            .read()
            .map_err(|_| DashboardError::StatePoisoned)?;
        Ok(projects.iter().cloned().collect())
    }

    async fn insert_project(
        &self,
        owner: UserId,
        request: CreateProjectRequest,
    ) -> DashboardResult<Project> {
        let new_project = NewProject::new(owner, request.name, request.description)?;
        Ok(self.repository.insert(new_project).await?)
    }

    fn replace(&self, projects: Vector<Project>) -> DashboardResult<()> {
        let mut held = self
            .projects
            .write()
            .map_err(|_| DashboardError::StatePoisoned)?;
        *held = projects;
        Ok(())
    }
}
