//! In-memory `tasks` table.

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use std::sync::{Arc, RwLock};

use crate::{
    project::{adapters::memory::InMemoryProjectRepository, domain::ProjectId},
    task::{
        domain::{NewTask, PositionUpdate, Task, TaskDetails, TaskId},
        ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
    },
};

/// Thread-safe in-memory task table.
///
/// When linked to an [`InMemoryProjectRepository`], inserts are checked
/// against it so every task references an existing project of the same
/// owner.
#[derive(Clone)]
pub struct InMemoryTaskRepository {
    rows: Arc<RwLock<Vec<Task>>>,
    clock: Arc<dyn Clock + Send + Sync>,
    projects: Option<InMemoryProjectRepository>,
}

impl Default for InMemoryTaskRepository {
    fn default() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl std::fmt::Debug for InMemoryTaskRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryTaskRepository")
            .field("rows", &self.rows)
            .field("projects", &self.projects)
            .finish_non_exhaustive()
    }
}

impl InMemoryTaskRepository {
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
            projects: None,
        }
    }

    /// Checks inserts against the given project table.
    #[must_use]
    pub fn with_projects(mut self, projects: InMemoryProjectRepository) -> Self {
        self.projects = Some(projects);
        self
    }

    fn check_project(&self, task: &NewTask) -> TaskRepositoryResult<()> {
        let Some(projects) = &self.projects else {
            return Ok(());
        };
        let project_id = task.project_id();
        match projects.owner_of(project_id) {
            None => Err(TaskRepositoryError::UnknownProject(project_id)),
            Some(owner) if owner != task.owner() => Err(TaskRepositoryError::OwnerMismatch {
                project_id,
                owner: task.owner(),
            }),
            Some(_) => Ok(()),
        }
    }

    fn modify(
        &self,
        id: TaskId,
        change: impl FnOnce(&mut Task, &(dyn Clock + Send + Sync)),
    ) -> TaskRepositoryResult<Task> {
        let mut rows = self.rows.write().map_err(lock_error)?;
        let task = rows
            .iter_mut()
            .find(|task| task.id() == id)
            .ok_or(TaskRepositoryError::NotFound(id))?;
        change(task, &*self.clock);
        Ok(task.clone())
    }
}

fn lock_error(err: impl std::fmt::Display) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn insert(&self, task: NewTask) -> TaskRepositoryResult<Task> {
        self.check_project(&task)?;
        let stored = Task::create(task, &*self.clock);
        let mut rows = self.rows.write().map_err(lock_error)?;
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let rows = self.rows.read().map_err(lock_error)?;
        Ok(rows.iter().find(|task| task.id() == id).cloned())
    }

    async fn list_for_project(&self, project_id: ProjectId) -> TaskRepositoryResult<Vec<Task>> {
        let rows = self.rows.read().map_err(lock_error)?;
        let mut tasks: Vec<Task> = rows
            .iter()
            .filter(|task| task.project_id() == project_id)
            .cloned()
            .collect();
        tasks.sort_by_key(Task::order);
        Ok(tasks)
    }

    async fn update_position(
        &self,
        id: TaskId,
        update: PositionUpdate,
    ) -> TaskRepositoryResult<Task> {
        self.modify(id, |task, clock| task.apply_position(update, clock))
    }

    async fn update_details(
        &self,
        id: TaskId,
        details: TaskDetails,
    ) -> TaskRepositoryResult<Task> {
        self.modify(id, |task, clock| task.apply_details(details, clock))
    }
}
