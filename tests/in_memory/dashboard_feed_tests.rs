//! In-memory integration tests for the realtime project dashboard.

use super::helpers::{Backend, backend};
use rstest::rstest;
use std::sync::Arc;
use taskboard::{
    account::domain::UserId,
    project::{
        domain::{ProjectId, ProjectStatus},
        ports::{ProjectChange, ProjectRepository},
        services::CreateProjectRequest,
    },
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dashboard_follows_table_changes(
    backend: Backend,
) -> eyre::Result<()> {
    let owner = UserId::new();
    let existing = backend.seed_project(owner, "Existing").await?;
    let dashboard = Arc::new(backend.dashboard());
    dashboard.load(owner).await?;
    let mut subscription = dashboard.subscribe(owner).await?;
    let listener = tokio::spawn({
        let view = Arc::clone(&dashboard);
        async move { view.sync(&mut subscription).await }
    });

    let created = dashboard
        .create_project(owner, CreateProjectRequest::new("Launch", "Go live"))
        .await?;
    let completed = backend
        .projects
        .update_status(existing.id(), ProjectStatus::Completed)
        .await?;
    backend
        .seed_project(UserId::new(), "Someone else's")
        .await?;
    backend.feed.disconnect_all();
    let applied = listener.await??;

    eyre::ensure!(applied == 2);
    eyre::ensure!(dashboard.projects()? == vec![created, completed]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn closing_the_view_releases_its_subscription(
    backend: Backend,
) -> eyre::Result<()> {
    let owner = UserId::new();
    let dashboard = backend.dashboard();

    {
        let _subscription = dashboard.subscribe(owner).await?;
        eyre::ensure!(backend.feed.subscriber_count() == 1);
    }

    eyre::ensure!(backend.feed.subscriber_count() == 0);
    let stray = ProjectChange::Deleted(ProjectId::new());
    eyre::ensure!(backend.feed.publish(owner, &stray) == 0);
    Ok(())
}
