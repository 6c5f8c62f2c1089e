//! Board service for one project view.
//!
//! Local state changes first and the hosted service is told afterwards.
//! When the remote call fails only the moved task is put back; changes
//! made to other tasks in the meantime stay on the board.

use crate::{
    config::Settings,
    notice::{Notice, Notifier, report_failure},
    project::{
        domain::{Project, ProjectId},
        ports::{ProjectRepository, ProjectRepositoryError},
    },
    sync::position_of,
    task::{
        domain::{NewTask, ObjectPath, PositionUpdate, Task, TaskDetails, TaskDomainError, TaskId, TaskStatus},
        ports::{ObjectStorage, SignedUrl, StorageError, TaskRepository, TaskRepositoryError, UploadOptions},
        services::board::{self, BoardChange, BoardColumns, DropRequest, UnknownTask},
    },
};
use im::Vector;
use std::{
    collections::HashMap,
    sync::{Arc, RwLock},
};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Request payload for the create-task form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    context: String,
}

impl CreateTaskRequest {
    /// Creates a request from form values.
    #[must_use]
    pub fn new(title: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            context: context.into(),
        }
    }
}

/// Image file chosen in the edit form.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    file_name: String,
    bytes: Vec<u8>,
}

impl ImageUpload {
    /// Creates an upload from the original file name and its contents.
    #[must_use]
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Request payload for the edit-task form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTaskRequest {
    task_id: TaskId,
    title: String,
    context: String,
    completion_notes: Option<String>,
    image: Option<ImageUpload>,
}

impl EditTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(task_id: TaskId, title: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            task_id,
            title: title.into(),
            context: context.into(),
            completion_notes: None,
            image: None,
        }
    }

    /// Sets completion notes.
    #[must_use]
    pub fn with_completion_notes(mut self, notes: impl Into<String>) -> Self {
        self.completion_notes = Some(notes.into());
        self
    }

    /// Attaches a new reference image.
    #[must_use]
    pub fn with_image(mut self, image: ImageUpload) -> Self {
        self.image = Some(image);
        self
    }
}

/// Errors returned by [`BoardService`].
#[derive(Debug, Clone, Error)]
pub enum BoardError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// The task is not on the board.
    #[error(transparent)]
    UnknownTask(#[from] UnknownTask),

    /// The project does not exist.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// No project has been loaded into the board.
    #[error("no project loaded")]
    NotLoaded,

    /// The project table call failed.
    #[error(transparent)]
    Projects(#[from] ProjectRepositoryError),

    /// The task table call failed.
    #[error(transparent)]
    Tasks(#[from] TaskRepositoryError),

    /// The storage call failed.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The board state lock was poisoned.
    #[error("board state is poisoned")]
    StatePoisoned,
}

/// Result type for board operations.
pub type BoardResult<T> = Result<T, BoardError>;

#[derive(Debug, Default)]
struct BoardState {
    project: Option<Project>,
    tasks: Vector<Task>,
    /// Position writes awaiting a remote answer, per task.
    in_flight: HashMap<TaskId, usize>,
}

impl BoardState {
    fn track(&mut self, task_id: TaskId) {
        *self.in_flight.entry(task_id).or_default() += 1;
    }

    fn settle(&mut self, task_id: TaskId) {
        if let Some(count) = self.in_flight.get_mut(&task_id) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                self.in_flight.remove(&task_id);
            }
        }
    }

    /// Undoes `change` for its task alone.
    ///
    /// Nothing happens when the task has left the board or a later change
    /// has already moved it elsewhere.
    fn revert(&mut self, change: &OptimisticChange) {
        let id = change.applied.id();
        let Some(index) = position_of(&self.tasks, id) else {
            return;
        };
        let current = self.tasks.remove(index);
        let superseded = current.status() != change.applied.status()
            || current.order() != change.applied.order();
        if superseded {
            self.tasks.insert(index, current);
            return;
        }
        let restored = current.with_position(change.original.status(), change.original.order());
        let at = change.origin.min(self.tasks.len());
        self.tasks.insert(at, restored);
    }

    /// Installs `updated`, keeping the board position while a position
    /// write for the task is still pending.
    fn replace_details(&mut self, updated: &Task) -> bool {
        let Some(index) = position_of(&self.tasks, updated.id()) else {
            return false;
        };
        let row = match self.tasks.get(index) {
            Some(local) if self.in_flight.contains_key(&updated.id()) => {
                updated.with_position(local.status(), local.order())
            }
            _ => updated.clone(),
        };
        self.tasks.set(index, row);
        true
    }
}

/// One optimistic change as installed on the board.
#[derive(Debug)]
struct OptimisticChange {
    /// The task as it was before the change.
    original: Task,
    /// Index of the task before the change.
    origin: usize,
    /// The task as the change left it.
    applied: Task,
}

/// Holds the task list of one project and keeps it in step with the
/// hosted service.
pub struct BoardService<P, T, S, N>
where
    P: ProjectRepository,
    T: TaskRepository,
    S: ObjectStorage,
    N: Notifier,
{
    projects: Arc<P>,
    tasks: Arc<T>,
    storage: Arc<S>,
    notifier: Arc<N>,
    settings: Settings,
    state: RwLock<BoardState>,
}

impl<P, T, S, N> BoardService<P, T, S, N>
where
    P: ProjectRepository,
    T: TaskRepository,
    S: ObjectStorage,
    N: Notifier,
{
    /// Creates a board with no project loaded.
    #[must_use]
    pub fn new(
        projects: Arc<P>,
        tasks: Arc<T>,
        storage: Arc<S>,
        notifier: Arc<N>,
        settings: Settings,
    ) -> Self {
        Self {
            projects,
            tasks,
            storage,
            notifier,
            settings,
            state: RwLock::new(BoardState::default()),
        }
    }

    /// Loads a project and its tasks, ordered by `order`, into the board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::ProjectNotFound`] when the project does not
    /// exist, or a repository error when a fetch fails. The board is left
    /// as it was.
    pub async fn load(&self, project_id: ProjectId) -> BoardResult<Project> {
        let result = self.fetch(project_id).await;
        let (project, tasks) = self.reported(result, "Failed to load project")?;
        info!(project_id = %project_id, count = tasks.len(), "loaded board");
        let mut state = self.write_state()?;
        state.project = Some(project.clone());
        state.tasks = tasks.into_iter().collect();
        Ok(project)
    }

    /// Moves a task to another column, keeping its list position.
    ///
    /// The board changes immediately; the new status is then written with
    /// one remote call. Returns `Ok(None)` without a remote call when the
    /// task already has `status`.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownTask`] for a task not on the board, or
    /// [`BoardError::Tasks`] when the write fails, in which case the task
    /// gets its previous status back.
    pub async fn move_to_status(
        &self,
        task_id: TaskId,
        status: TaskStatus,
    ) -> BoardResult<Option<Task>> {
        let result = self
            .persist_optimistic(
                |tasks| board::change_status(tasks, task_id, status),
                PositionUpdate::status_only(status),
            )
            .await;
        self.reported(result, "Failed to update task")
    }

    /// Applies a drag-and-drop move.
    ///
    /// The board changes immediately; the new status and order are then
    /// written with one remote call. Returns `Ok(None)` without a remote
    /// call when the drop changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownTask`] for a task not on the board, or
    /// [`BoardError::Tasks`] when the write fails, in which case the task
    /// goes back to its previous column and slot.
    pub async fn drop_task(&self, request: DropRequest) -> BoardResult<Option<Task>> {
        let order = request
            .destination
            .map(|slot| i32::try_from(slot.index).unwrap_or(i32::MAX))
            .unwrap_or_default();
        let status = request
            .destination
            .map_or(request.source.status, |slot| slot.status);
        let result = self
            .persist_optimistic(
                |tasks| board::apply_drop(tasks, request),
                PositionUpdate::placed(status, order),
            )
            .await;
        self.reported(result, "Failed to update task")
    }

    /// Creates a `todo` task in the loaded project and appends it to the
    /// board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::NotLoaded`] before [`Self::load`], a domain
    /// error for a blank title, or [`BoardError::Tasks`] when the insert
    /// fails.
    pub async fn create_task(&self, request: CreateTaskRequest) -> BoardResult<Task> {
        let result = self.insert_task(request).await;
        let task = self.reported(result, "Failed to create task")?;
        self.write_state()?.tasks.push_back(task.clone());
        info!(task_id = %task.id(), project_id = %task.project_id(), "created task");
        self.notifier
            .notify(Notice::success("Task created successfully!"));
        Ok(task)
    }

    /// Saves the edit form, uploading a new reference image first when one
    /// is attached, and replaces the task on the board.
    ///
    /// A move of the same task that is still awaiting the hosted service
    /// keeps its board position.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownTask`] for a task not on the board, a
    /// domain error for a blank title, [`BoardError::Storage`] when the
    /// upload fails, or [`BoardError::Tasks`] when the update fails. The
    /// board is unchanged on error.
    pub async fn edit_task(&self, request: EditTaskRequest) -> BoardResult<Task> {
        let result = self.save_details(request).await;
        let updated = self.reported(result, "Failed to update task")?;
        if !self.write_state()?.replace_details(&updated) {
            warn!(task_id = %updated.id(), "edited task left the board");
        }
        info!(task_id = %updated.id(), "updated task");
        self.notifier
            .notify(Notice::success("Task updated successfully!"));
        Ok(updated)
    }

    /// Issues a signed URL for the task's reference image.
    ///
    /// Returns `Ok(None)` when the task has no image.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::UnknownTask`] for a task not on the board, or
    /// [`BoardError::Storage`] when the URL cannot be issued.
    pub async fn reference_image_url(&self, task_id: TaskId) -> BoardResult<Option<SignedUrl>> {
        let result = self.sign_image(task_id).await;
        self.reported(result, "Failed to load image")
    }

    /// Returns the loaded project.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn project(&self) -> BoardResult<Option<Project>> {
        Ok(self.read_state()?.project.clone())
    }

    /// Returns the task list in board order.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn tasks(&self) -> BoardResult<Vec<Task>> {
        Ok(self.read_state()?.tasks.iter().cloned().collect())
    }

    /// Returns the task list split into columns.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::StatePoisoned`] when the state lock is
    /// poisoned.
    pub fn columns(&self) -> BoardResult<BoardColumns> {
        Ok(board::columns(&self.read_state()?.tasks))
    }

    async fn fetch(&self, project_id: ProjectId) -> BoardResult<(Project, Vec<Task>)> {
        let project = self
            .projects
            .find_by_id(project_id)
            .await?
            .ok_or(BoardError::ProjectNotFound(project_id))?;
        let tasks = self.tasks.list_for_project(project_id).await?;
        Ok((project, tasks))
    }

    /// Applies `reducer` to the board, writes `update` remotely, and puts
    /// the moved task back if the write fails.
    async fn persist_optimistic<F>(
        &self,
        reducer: F,
        update: PositionUpdate,
    ) -> BoardResult<Option<Task>>
    where
        F: FnOnce(&Vector<Task>) -> Result<BoardChange, UnknownTask>,
    {
        let Some(change) = self.begin_optimistic(reducer)? else {
            return Ok(None);
        };
        let task_id = change.applied.id();
        debug!(
            task_id = %task_id,
            status = change.applied.status().as_str(),
            "applied optimistic board change"
        );

        let result = self.tasks.update_position(task_id, update).await;
        let mut state = self.write_state()?;
        state.settle(task_id);
        match result {
            Ok(persisted) => Ok(Some(persisted)),
            Err(err) => {
                state.revert(&change);
                warn!(task_id = %task_id, "restored task after rejected change");
                Err(err.into())
            }
        }
    }

    /// Runs `reducer` under the state lock and installs its result.
    ///
    /// Returns `None` when the reducer left the list unchanged.
    fn begin_optimistic<F>(&self, reducer: F) -> BoardResult<Option<OptimisticChange>>
    where
        F: FnOnce(&Vector<Task>) -> Result<BoardChange, UnknownTask>,
    {
        let mut state = self.write_state()?;
        let BoardChange::Changed { tasks, task } = reducer(&state.tasks)? else {
            return Ok(None);
        };
        let origin = position_of(&state.tasks, task.id()).ok_or(UnknownTask(task.id()))?;
        let original = state
            .tasks
            .get(origin)
            .cloned()
            .ok_or(UnknownTask(task.id()))?;
        state.tasks = tasks;
        state.track(task.id());
        Ok(Some(OptimisticChange {
            original,
            origin,
            applied: task,
        }))
    }

    async fn insert_task(&self, request: CreateTaskRequest) -> BoardResult<Task> {
        let project = self.project()?.ok_or(BoardError::NotLoaded)?;
        let new_task = NewTask::new(project.id(), project.owner(), request.title, request.context)?;
        Ok(self.tasks.insert(new_task).await?)
    }

    async fn save_details(&self, request: EditTaskRequest) -> BoardResult<Task> {
        let current = self.task(request.task_id)?;
        let details = TaskDetails::new(request.title, request.context)?
            .with_completion_notes(request.completion_notes);

        let mut reference_image = current.reference_image().cloned();
        if let Some(image) = request.image {
            let path = ObjectPath::for_upload(&self.settings.image_prefix, &image.file_name)?;
            self.storage
                .upload(
                    &path,
                    image.bytes,
                    UploadOptions::upsert(self.settings.upload_cache_control_secs),
                )
                .await?;
            debug!(task_id = %current.id(), path = %path, "uploaded reference image");
            reference_image = Some(path);
        }

        let details = details.with_reference_image(reference_image);
        Ok(self.tasks.update_details(current.id(), details).await?)
    }

    async fn sign_image(&self, task_id: TaskId) -> BoardResult<Option<SignedUrl>> {
        let task = self.task(task_id)?;
        let Some(path) = task.reference_image() else {
            return Ok(None);
        };
        let signed = self
            .storage
            .signed_url(path, self.settings.signed_url_ttl())
            .await?;
        Ok(Some(signed))
    }

    fn task(&self, task_id: TaskId) -> BoardResult<Task> {
        let state = self.read_state()?;
        state
            .tasks
            .iter()
            .find(|task| task.id() == task_id)
            .cloned()
            .ok_or_else(|| UnknownTask(task_id).into())
    }

    fn reported<V>(&self, result: BoardResult<V>, message: &str) -> BoardResult<V> {
        if let Err(err) = &result {
            report_failure(&*self.notifier, message, err);
        }
        result
    }

    fn read_state(&self) -> BoardResult<std::sync::RwLockReadGuard<'_, BoardState>> {
        self.state.read().map_err(|_| BoardError::StatePoisoned)
    }

    fn write_state(&self) -> BoardResult<std::sync::RwLockWriteGuard<'_, BoardState>> {
        self.state.write().map_err(|_| BoardError::StatePoisoned)
    }
}
