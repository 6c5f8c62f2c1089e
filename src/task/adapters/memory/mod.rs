//! In-memory task adapters standing in for the hosted service.

mod repository;
mod storage;

pub use repository::InMemoryTaskRepository;
pub use storage::InMemoryObjectStorage;
