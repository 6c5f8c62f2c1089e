//! Project entity and its status.

use super::{ParseProjectStatusError, ProjectDomainError, ProjectId};
use crate::{account::domain::UserId, sync::Row};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Project lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Work on the project is ongoing.
    #[default]
    Active,
    /// The project is finished.
    Completed,
    /// The project is shelved.
    Archived,
}

impl ProjectStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }
}

impl TryFrom<&str> for ProjectStatus {
    type Error = ParseProjectStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "archived" => Ok(Self::Archived),
            _ => Err(ParseProjectStatusError(value.to_owned())),
        }
    }
}

/// Insert payload for a project; the table assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProject {
    owner: UserId,
    name: String,
    description: String,
    status: ProjectStatus,
}

impl NewProject {
    /// Creates an active project payload.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectDomainError::EmptyName`] when the name is blank.
    pub fn new(
        owner: UserId,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, ProjectDomainError> {
        let raw_name = name.into();
        let trimmed = raw_name.trim();
        if trimmed.is_empty() {
            return Err(ProjectDomainError::EmptyName);
        }
        Ok(Self {
            owner,
            name: trimmed.to_owned(),
            description: description.into(),
            status: ProjectStatus::Active,
        })
    }

    /// Overrides the initial status.
    #[must_use]
    pub const fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Returns the project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A project row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    name: String,
    description: String,
    status: ProjectStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(rename = "user_id")]
    owner: UserId,
}

/// Parameter object for reconstructing a stored project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedProjectData {
    /// Stored project identifier.
    pub id: ProjectId,
    /// Stored name.
    pub name: String,
    /// Stored description.
    pub description: String,
    /// Stored status.
    pub status: ProjectStatus,
    /// Stored creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Stored last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Owning user.
    pub owner: UserId,
}

impl Project {
    /// Materializes an inserted project, assigning id and timestamps.
    #[must_use]
    pub fn create(new: NewProject, clock: &(impl Clock + ?Sized)) -> Self {
        let timestamp = clock.utc();
        Self {
            id: ProjectId::new(),
            name: new.name,
            description: new.description,
            status: new.status,
            created_at: timestamp,
            updated_at: timestamp,
            owner: new.owner,
        }
    }

    /// Reconstructs a project from stored data.
    #[must_use]
    pub fn from_persisted(data: PersistedProjectData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            status: data.status,
            created_at: data.created_at,
            updated_at: data.updated_at,
            owner: data.owner,
        }
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the project description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the project status.
    #[must_use]
    pub const fn status(&self) -> ProjectStatus {
        self.status
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

    /// Returns the owning user.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Sets the status and refreshes `updated_at`.
    pub fn set_status(&mut self, status: ProjectStatus, clock: &(impl Clock + ?Sized)) {
        self.status = status;
        self.updated_at = clock.utc();
    }
}

impl Row for Project {
    type Id = ProjectId;

    fn row_id(&self) -> ProjectId {
        self.id
    }
}
