//! Object storage port for task reference images.

use crate::task::domain::ObjectPath;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Upload behaviour requested from the storage service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadOptions {
    /// Cache-control max-age in seconds.
    pub cache_control_secs: u64,
    /// Overwrite an existing object at the same path.
    pub upsert: bool,
}

impl UploadOptions {
    /// Creates options that overwrite existing objects.
    #[must_use]
    pub const fn upsert(cache_control_secs: u64) -> Self {
        Self {
            cache_control_secs,
            upsert: true,
        }
    }
}

/// Time-limited link to a private object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUrl {
    url: Url,
    expires_at: DateTime<Utc>,
}

impl SignedUrl {
    /// Creates a signed URL.
    #[must_use]
    pub const fn new(url: Url, expires_at: DateTime<Utc>) -> Self {
        Self { url, expires_at }
    }

    /// Returns the URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Returns when the URL stops working.
    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Returns whether the URL is still usable at `now`.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Object storage contract.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Stores `bytes` at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::AlreadyExists`] when an object exists at the
    /// path and `options.upsert` is false.
    async fn upload(
        &self,
        path: &ObjectPath,
        bytes: Vec<u8>,
        options: UploadOptions,
    ) -> StorageResult<()>;

    /// Issues a signed URL for `path` that expires after `ttl`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`] when no object exists at the path.
    async fn signed_url(&self, path: &ObjectPath, ttl: Duration) -> StorageResult<SignedUrl>;
}

/// Errors returned by storage implementations.
#[derive(Debug, Clone, Error)]
pub enum StorageError {
    /// An object already exists at the path.
    #[error("object already exists: {0}")]
    AlreadyExists(ObjectPath),

    /// No object exists at the path.
    #[error("object not found: {0}")]
    NotFound(ObjectPath),

    /// The requested lifetime cannot be represented.
    #[error("signed URL lifetime out of range: {0:?}")]
    InvalidTtl(Duration),

    /// Transport-layer failure.
    #[error("storage transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl StorageError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
