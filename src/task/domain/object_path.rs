//! Bucket-relative storage paths for task reference images.

use super::TaskDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Path of a stored object, relative to its bucket.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectPath(String);

impl ObjectPath {
    /// Creates a validated path.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidObjectPath`] when the path is empty,
    /// starts with `/`, contains whitespace-only or `..` segments, or has
    /// empty segments.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let is_valid = !raw.is_empty()
            && raw
                .split('/')
                .all(|segment| !segment.trim().is_empty() && segment != "." && segment != "..");
        if !is_valid {
            return Err(TaskDomainError::InvalidObjectPath(raw));
        }
        Ok(Self(raw))
    }

    /// Generates a fresh upload path under `prefix`, keeping the extension
    /// of `file_name`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidObjectPath`] when `prefix` does not
    /// form a valid path.
    pub fn for_upload(prefix: &str, file_name: &str) -> Result<Self, TaskDomainError> {
        let stem = Uuid::new_v4();
        let prefix = prefix.trim_matches('/');
        let path = match extension_of(file_name) {
            Some(extension) => format!("{prefix}/{stem}.{extension}"),
            None => format!("{prefix}/{stem}"),
        };
        Self::new(path)
    }

    /// Returns the path as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Returns the lowercase extension after the last dot, if any.
fn extension_of(file_name: &str) -> Option<String> {
    let (stem, extension) = file_name.rsplit_once('.')?;
    let is_usable = !stem.is_empty()
        && !extension.is_empty()
        && extension.chars().all(|ch| ch.is_ascii_alphanumeric());
    is_usable.then(|| extension.to_ascii_lowercase())
}

impl TryFrom<String> for ObjectPath {
    type Error = TaskDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ObjectPath> for String {
    fn from(path: ObjectPath) -> Self {
        path.0
    }
}

impl AsRef<str> for ObjectPath {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
