//! In-memory object storage bucket.

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use url::Url;
use uuid::Uuid;

use crate::{
    config::{Settings, as_base_url},
    task::{
        domain::ObjectPath,
        ports::{ObjectStorage, SignedUrl, StorageError, StorageResult, UploadOptions},
    },
};

#[derive(Debug, Clone)]
struct StoredObject {
    bytes: Vec<u8>,
    cache_control_secs: u64,
}

/// Thread-safe in-memory storage bucket issuing signed URLs.
#[derive(Clone)]
pub struct InMemoryObjectStorage {
    bucket: String,
    base_url: Url,
    clock: Arc<dyn Clock + Send + Sync>,
    objects: Arc<RwLock<HashMap<ObjectPath, StoredObject>>>,
}

impl std::fmt::Debug for InMemoryObjectStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectStorage")
            .field("bucket", &self.bucket)
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl InMemoryObjectStorage {
    /// Creates an empty bucket served under `base_url`.
    ///
    /// A missing trailing `/` is added so the last path segment survives.
    #[must_use]
    pub fn new(bucket: impl Into<String>, base_url: Url) -> Self {
        Self {
            bucket: bucket.into(),
            base_url: as_base_url(base_url),
            clock: Arc::new(DefaultClock),
            objects: Arc::default(),
        }
    }

    /// Creates an empty bucket from the storage settings.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.storage_bucket.clone(),
            settings.storage_base_url().clone(),
        )
    }

    /// Uses `clock` for signed URL expiry.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns the bytes stored at `path`.
    #[must_use]
    pub fn object(&self, path: &ObjectPath) -> Option<Vec<u8>> {
        let objects = self.objects.read().unwrap_or_else(PoisonError::into_inner);
        objects.get(path).map(|object| object.bytes.clone())
    }

    /// Returns the cache-control max-age stored with `path`.
    #[must_use]
    pub fn cache_control_secs(&self, path: &ObjectPath) -> Option<u64> {
        let objects = self.objects.read().unwrap_or_else(PoisonError::into_inner);
        objects.get(path).map(|object| object.cache_control_secs)
    }

    /// Returns the number of stored objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns whether the bucket is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock_error(err: impl std::fmt::Display) -> StorageError {
    StorageError::transport(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl ObjectStorage for InMemoryObjectStorage {
    async fn upload(
        &self,
        path: &ObjectPath,
        bytes: Vec<u8>,
        options: UploadOptions,
    ) -> StorageResult<()> {
        let mut objects = self.objects.write().map_err(lock_error)?;
        if !options.upsert && objects.contains_key(path) {
            return Err(StorageError::AlreadyExists(path.clone()));
        }
        objects.insert(
            path.clone(),
            StoredObject {
                bytes,
                cache_control_secs: options.cache_control_secs,
            },
        );
        Ok(())
    }

    async fn signed_url(&self, path: &ObjectPath, ttl: Duration) -> StorageResult<SignedUrl> {
        {
            let objects = self.objects.read().map_err(lock_error)?;
            if !objects.contains_key(path) {
                return Err(StorageError::NotFound(path.clone()));
            }
        }

        let lifetime = chrono::Duration::from_std(ttl).map_err(|_| StorageError::InvalidTtl(ttl))?;
        let expires_at = self
            .clock
            .utc()
            .checked_add_signed(lifetime)
            .ok_or(StorageError::InvalidTtl(ttl))?;

        let mut url = self
            .base_url
            .join(&format!("object/sign/{}/{}", self.bucket, path))
            .map_err(StorageError::transport)?;
        url.query_pairs_mut()
            .append_pair("token", &Uuid::new_v4().simple().to_string())
            .append_pair("expires", &expires_at.timestamp().to_string());

        Ok(SignedUrl::new(url, expires_at))
    }
}
