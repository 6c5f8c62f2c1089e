//! Task entity and board column status.

use super::{ObjectPath, ParseTaskStatusError, TaskDomainError, TaskId};
use crate::{account::domain::UserId, project::domain::ProjectId, sync::Row};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Board column a task sits in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started.
    #[default]
    Todo,
    /// Being worked on.
    InProgress,
    /// Finished.
    Completed,
}

impl TaskStatus {
    /// Every status, in board column order.
    pub const ALL: [Self; 3] = [Self::Todo, Self::InProgress, Self::Completed];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "todo" => Ok(Self::Todo),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Insert payload for a task; the table assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    project_id: ProjectId,
    owner: UserId,
    title: String,
    context: String,
    status: TaskStatus,
    order: i32,
}

impl NewTask {
    /// Creates a `todo` task payload at order zero.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is blank.
    pub fn new(
        project_id: ProjectId,
        owner: UserId,
        title: impl Into<String>,
        context: impl Into<String>,
    ) -> Result<Self, TaskDomainError> {
        Ok(Self {
            project_id,
            owner,
            title: validated_title(title.into())?,
            context: context.into(),
            status: TaskStatus::Todo,
            order: 0,
        })
    }

    /// Overrides the initial column and order.
    #[must_use]
    pub const fn with_position(mut self, status: TaskStatus, order: i32) -> Self {
        self.status = status;
        self.order = order;
        self
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }
}

/// Editable task fields written by the edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDetails {
    title: String,
    context: String,
    completion_notes: Option<String>,
    reference_image: Option<ObjectPath>,
}

impl TaskDetails {
    /// Creates details with the required fields.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is blank.
    pub fn new(
        title: impl Into<String>,
        context: impl Into<String>,
    ) -> Result<Self, TaskDomainError> {
        Ok(Self {
            title: validated_title(title.into())?,
            context: context.into(),
            completion_notes: None,
            reference_image: None,
        })
    }

    /// Sets completion notes. Blank notes clear the field.
    #[must_use]
    pub fn with_completion_notes(mut self, notes: Option<String>) -> Self {
        self.completion_notes = notes.filter(|text| !text.trim().is_empty());
        self
    }

    /// Sets the reference image path.
    #[must_use]
    pub fn with_reference_image(mut self, path: Option<ObjectPath>) -> Self {
        self.reference_image = path;
        self
    }

    /// Returns the reference image path.
    #[must_use]
    pub const fn reference_image(&self) -> Option<&ObjectPath> {
        self.reference_image.as_ref()
    }
}

/// Column and order change written when a task is dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionUpdate {
    /// New column.
    pub status: TaskStatus,
    /// New order within the column, when the drop carries one.
    pub order: Option<i32>,
}

impl PositionUpdate {
    /// Changes only the column.
    #[must_use]
    pub const fn status_only(status: TaskStatus) -> Self {
        Self {
            status,
            order: None,
        }
    }

    /// Changes the column and the order.
    #[must_use]
    pub const fn placed(status: TaskStatus, order: i32) -> Self {
        Self {
            status,
            order: Some(order),
        }
    }
}

/// A task row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    context: String,
    status: TaskStatus,
    order: i32,
    #[serde(rename = "reference_image_url")]
    reference_image: Option<ObjectPath>,
    completion_notes: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    project_id: ProjectId,
    #[serde(rename = "user_id")]
    owner: UserId,
}

/// Parameter object for reconstructing a stored task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Stored task identifier.
    pub id: TaskId,
    /// Stored title.
    pub title: String,
    /// Stored free-text context.
    pub context: String,
    /// Stored column.
    pub status: TaskStatus,
    /// Stored order within the column.
    pub order: i32,
    /// Stored reference image path, if any.
    pub reference_image: Option<ObjectPath>,
    /// Stored completion notes, if any.
    pub completion_notes: Option<String>,
    /// Stored creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Stored last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Owning project.
    pub project_id: ProjectId,
    /// Owning user.
    pub owner: UserId,
}

impl Task {
    /// Materializes an inserted task, assigning id and timestamps.
    #[must_use]
    pub fn create(new: NewTask, clock: &(impl Clock + ?Sized)) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            title: new.title,
            context: new.context,
            status: new.status,
            order: new.order,
            reference_image: None,
            completion_notes: None,
            created_at: timestamp,
            updated_at: timestamp,
            project_id: new.project_id,
            owner: new.owner,
        }
    }

    /// Reconstructs a task from stored data.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            context: data.context,
            status: data.status,
            order: data.order,
            reference_image: data.reference_image,
            completion_notes: data.completion_notes,
            created_at: data.created_at,
            updated_at: data.updated_at,
            project_id: data.project_id,
            owner: data.owner,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the free-text context.
    #[must_use]
    pub fn context(&self) -> &str {
        &self.context
    }

    /// Returns the board column.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the order within the column.
    #[must_use]
    pub const fn order(&self) -> i32 {
        self.order
    }

    /// Returns the reference image path, if any.
    #[must_use]
    pub const fn reference_image(&self) -> Option<&ObjectPath> {
        self.reference_image.as_ref()
    }

    /// Returns the completion notes, if any.
    #[must_use]
    pub fn completion_notes(&self) -> Option<&str> {
        self.completion_notes.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the owning project.
    #[must_use]
    pub const fn project_id(&self) -> ProjectId {
        self.project_id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Returns a copy moved to `status`, leaving every other field as is.
    #[must_use]
    pub fn with_status(&self, status: TaskStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    /// Returns a copy moved to `status` at `order`.
    #[must_use]
    pub fn with_position(&self, status: TaskStatus, order: i32) -> Self {
        Self {
            status,
            order,
            ..self.clone()
        }
    }

    /// Applies a stored position change and refreshes `updated_at`.
    pub fn apply_position(&mut self, update: PositionUpdate, clock: &(impl Clock + ?Sized)) {
        self.status = update.status;
        if let Some(order) = update.order {
            self.order = order;
        }
        self.touch(clock);
    }

    /// Applies stored detail edits and refreshes `updated_at`.
    pub fn apply_details(&mut self, details: TaskDetails, clock: &(impl Clock + ?Sized)) {
        self.title = details.title;
        self.context = details.context;
        self.completion_notes = details.completion_notes;
        self.reference_image = details.reference_image;
        self.touch(clock);
    }

    fn touch(&mut self, clock: &(impl Clock + ?Sized)) {
        self.updated_at = clock.utc();
    }
}

impl Row for Task {
    type Id = TaskId;

    fn row_id(&self) -> TaskId {
        self.id
    }
}

fn validated_title(raw: String) -> Result<String, TaskDomainError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TaskDomainError::EmptyTitle);
    }
    Ok(trimmed.to_owned())
}
