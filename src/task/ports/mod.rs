//! Port contracts for tasks.
//!
//! Ports define the hosted-service interfaces used by task services.

pub mod repository;
pub mod storage;

pub use repository::{TaskRepository, TaskRepositoryError, TaskRepositoryResult};
pub use storage::{ObjectStorage, SignedUrl, StorageError, StorageResult, UploadOptions};
