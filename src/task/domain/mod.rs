//! Domain model for tasks.
//!
//! The task domain models board columns, ordering within a column and
//! reference images while keeping all infrastructure concerns outside of
//! the domain boundary.

mod error;
mod ids;
mod object_path;
mod task;

pub use error::{ParseTaskStatusError, TaskDomainError};
pub use ids::TaskId;
pub use object_path::ObjectPath;
pub use task::{NewTask, PersistedTaskData, PositionUpdate, Task, TaskDetails, TaskStatus};
