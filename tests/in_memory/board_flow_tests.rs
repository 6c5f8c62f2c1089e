//! In-memory integration tests for the Kanban board.

use super::helpers::{Backend, backend};
use rstest::rstest;
use taskboard::{
    account::domain::UserId,
    config::Settings,
    notice::{Notice, NoticeLevel},
    task::{
        domain::{Task, TaskStatus},
        ports::TaskRepository,
        services::{BoardSlot, CreateTaskRequest, DropRequest, EditTaskRequest, ImageUpload},
    },
};

fn column_titles(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(Task::title).collect()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tasks_move_across_the_board(
    backend: Backend,
) -> eyre::Result<()> {
    let project = backend.seed_project(UserId::new(), "Website").await?;
    let board = backend.board();
    board.load(project.id()).await?;
    let copy = board
        .create_task(CreateTaskRequest::new("Write copy", "Hero section"))
        .await?;
    let review = board
        .create_task(CreateTaskRequest::new("Review copy", ""))
        .await?;
    board
        .create_task(CreateTaskRequest::new("Publish", ""))
        .await?;

    board
        .move_to_status(copy.id(), TaskStatus::InProgress)
        .await?;
    board
        .drop_task(DropRequest::new(
            review.id(),
            BoardSlot::new(TaskStatus::Todo, 0),
            BoardSlot::new(TaskStatus::InProgress, 0),
        ))
        .await?;

    let columns = board.columns()?;
    eyre::ensure!(column_titles(&columns.todo) == ["Publish"]);
    eyre::ensure!(column_titles(&columns.in_progress) == ["Review copy", "Write copy"]);
    eyre::ensure!(columns.completed.is_empty());

    let stored = backend
        .tasks
        .find_by_id(review.id())
        .await?
        .ok_or_else(|| eyre::eyre!("review task missing from table"))?;
    eyre::ensure!(stored.status() == TaskStatus::InProgress);
    eyre::ensure!(stored.order() == 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reopened_board_matches_persisted_state(
    backend: Backend,
) -> eyre::Result<()> {
    let project = backend.seed_project(UserId::new(), "Website").await?;
    let board = backend.board();
    board.load(project.id()).await?;
    let task = board
        .create_task(CreateTaskRequest::new("Write copy", ""))
        .await?;
    board
        .move_to_status(task.id(), TaskStatus::Completed)
        .await?;

    let reopened = backend.board();
    reopened.load(project.id()).await?;

    let columns = reopened.columns()?;
    eyre::ensure!(column_titles(&columns.completed) == ["Write copy"]);
    eyre::ensure!(reopened.project()? == Some(project));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reference_images_use_configured_storage() -> eyre::Result<()> {
    let settings = Settings::from_toml_str(
        r#"
storage_bucket = "board-assets"
image_prefix = "refs"
signed_url_ttl_secs = 600
storage_url = "https://files.example.test/storage/v1"
"#,
    )?;
    let backend = Backend::new(settings);
    let project = backend.seed_project(UserId::new(), "Website").await?;
    let board = backend.board();
    board.load(project.id()).await?;
    let task = board
        .create_task(CreateTaskRequest::new("Mock-up", ""))
        .await?;

    let edited = board
        .edit_task(
            EditTaskRequest::new(task.id(), "Mock-up", "Final layout")
                .with_image(ImageUpload::new("Layout.JPG", vec![0xff, 0xd8])),
        )
        .await?;
    let signed = board
        .reference_image_url(task.id())
        .await?
        .ok_or_else(|| eyre::eyre!("expected a signed URL"))?;

    let path = edited
        .reference_image()
        .ok_or_else(|| eyre::eyre!("expected a stored image path"))?;
    eyre::ensure!(path.as_str().starts_with("refs/"));
    eyre::ensure!(path.as_str().ends_with(".jpg"));
    eyre::ensure!(backend.storage.object(path) == Some(vec![0xff, 0xd8]));
    eyre::ensure!(
        signed
            .url()
            .as_str()
            .starts_with("https://files.example.test/storage/v1/object/sign/board-assets/refs/"),
        "unexpected url {}",
        signed.url()
    );
    eyre::ensure!(
        backend.notifier.last() == Some(Notice::success("Task updated successfully!"))
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn unknown_task_is_reported(
    backend: Backend,
) -> eyre::Result<()> {
    let project = backend.seed_project(UserId::new(), "Website").await?;
    let board = backend.board();
    board.load(project.id()).await?;
    let foreign = backend.seed_project(UserId::new(), "Elsewhere").await?;
    let other_board = backend.board();
    other_board.load(foreign.id()).await?;
    let foreign_task = other_board
        .create_task(CreateTaskRequest::new("Not here", ""))
        .await?;

    let result = board
        .move_to_status(foreign_task.id(), TaskStatus::Completed)
        .await;

    eyre::ensure!(result.is_err());
    let last = backend
        .notifier
        .last()
        .ok_or_else(|| eyre::eyre!("expected a notice"))?;
    eyre::ensure!(last.level() == NoticeLevel::Error);
    eyre::ensure!(last.message() == "Failed to update task");
    Ok(())
}
