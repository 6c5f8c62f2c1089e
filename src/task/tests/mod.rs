//! Unit tests for the task module.


use crate::{
    account::domain::UserId,
    project::domain::ProjectId,
    task::domain::{PersistedTaskData, Task, TaskId, TaskStatus},
};
use mockable::{Clock, DefaultClock};

/// Builds a stored task for reducer tests.
pub(super) fn stored_task(title: &str, status: TaskStatus, order: i32) -> Task {
    stored_task_in(ProjectId::new(), UserId::new(), title, status, order)
}

/// Builds a stored task owned by the given project and user.
pub(super) fn stored_task_in(
    project_id: ProjectId,
    owner: UserId,
    title: &str,
    status: TaskStatus,
    order: i32,
) -> Task {
    let timestamp = DefaultClock.utc();
    Task::from_persisted(PersistedTaskData {
        id: TaskId::new(),
        title: title.to_owned(),
        context: format!("context for {title}"),
        status,
        order,
        reference_image: None,
        completion_notes: None,
        created_at: timestamp,
        updated_at: timestamp,
        project_id,
        owner,
    })
}
