//! Shared wiring for in-memory integration tests.

use std::sync::Arc;

use rstest::fixture;
use taskboard::{
    account::domain::UserId,
    config::Settings,
    notice::RecordingNotifier,
    project::{
        adapters::memory::{InMemoryProjectFeed, InMemoryProjectRepository},
        domain::{NewProject, Project},
        ports::ProjectRepository,
        services::ProjectDashboard,
    },
    task::{
        adapters::memory::{InMemoryObjectStorage, InMemoryTaskRepository},
        services::BoardService,
    },
};

/// Board service wired to the in-memory hosted service.
pub type TestBoard = BoardService<
    InMemoryProjectRepository,
    InMemoryTaskRepository,
    InMemoryObjectStorage,
    RecordingNotifier,
>;

/// Dashboard wired to the in-memory hosted service.
pub type TestDashboard =
    ProjectDashboard<InMemoryProjectRepository, InMemoryProjectFeed, RecordingNotifier>;

/// One in-memory hosted service shared by every view in a test.
#[derive(Debug, Clone)]
pub struct Backend {
    /// Push feed fed by the project table.
    pub feed: InMemoryProjectFeed,
    /// The `projects` table.
    pub projects: InMemoryProjectRepository,
    /// The `tasks` table, linked to `projects`.
    pub tasks: InMemoryTaskRepository,
    /// The reference image bucket.
    pub storage: InMemoryObjectStorage,
    /// Notices shown to the user.
    pub notifier: Arc<RecordingNotifier>,
    /// Settings the views were built with.
    pub settings: Settings,
}

impl Backend {
    /// Builds a backend from `settings`.
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        let feed = InMemoryProjectFeed::new();
        let projects = InMemoryProjectRepository::new().with_feed(feed.clone());
        let tasks = InMemoryTaskRepository::new().with_projects(projects.clone());
        let storage = InMemoryObjectStorage::from_settings(&settings);
        Self {
            feed,
            projects,
            tasks,
            storage,
            notifier: Arc::new(RecordingNotifier::new()),
            settings,
        }
    }

    /// Opens a board view.
    #[must_use]
    pub fn board(&self) -> TestBoard {
        BoardService::new(
            Arc::new(self.projects.clone()),
            Arc::new(self.tasks.clone()),
            Arc::new(self.storage.clone()),
            Arc::clone(&self.notifier),
            self.settings.clone(),
        )
    }

    /// Opens a dashboard view.
    #[must_use]
    pub fn dashboard(&self) -> TestDashboard {
        ProjectDashboard::new(
            Arc::new(self.projects.clone()),
            Arc::new(self.feed.clone()),
            Arc::clone(&self.notifier),
        )
    }

    /// Inserts a project for `owner` directly into the table.
    ///
    /// # Errors
    ///
    /// Returns an error when the name is blank or the insert fails.
    pub async fn seed_project(&self, owner: UserId, name: &str) -> eyre::Result<Project> {
        Ok(self
            .projects
            .insert(NewProject::new(owner, name, "")?)
            .await?)
    }
}

/// Provides a backend built from default settings.
#[fixture]
pub fn backend() -> Backend {
    Backend::new(Settings::default())
}
