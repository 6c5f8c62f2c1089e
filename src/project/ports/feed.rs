//! Push-feed port delivering project change events.
//!
//! A subscription is a scoped resource: it is acquired when a view mounts
//! and released when the [`FeedSubscription`] is dropped, whatever the state
//! of the connection at that time. Reconnection and backfill of missed
//! events are the feed implementation's concern.

use crate::{account::domain::UserId, project::domain::Project, sync::ChangeEvent};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc::{UnboundedReceiver, error::TryRecvError};

/// Change event for a project row.
pub type ProjectChange = ChangeEvent<Project>;

/// Result type for feed operations.
pub type FeedResult<T> = Result<T, FeedError>;

/// Scope of a project feed subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FeedFilter {
    owner: UserId,
}

impl FeedFilter {
    /// Table name the project feed listens on.
    pub const TABLE: &'static str = "projects";

    /// Restricts the feed to projects owned by `owner`.
    #[must_use]
    pub const fn projects_owned_by(owner: UserId) -> Self {
        Self { owner }
    }

    /// Returns the owner the feed is restricted to.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Returns the filter expression understood by the hosted service.
    #[must_use]
    pub fn expression(&self) -> String {
        format!("user_id=eq.{}", self.owner)
    }
}

/// Push-feed contract.
#[async_trait]
pub trait ProjectFeed: Send + Sync {
    /// Opens a subscription for the given filter.
    ///
    /// # Errors
    ///
    /// Returns [`FeedError`] when the subscription cannot be established.
    async fn subscribe(&self, filter: FeedFilter) -> FeedResult<FeedSubscription>;
}

/// Errors returned by feed implementations.
#[derive(Debug, Clone, Error)]
pub enum FeedError {
    /// The feed has been shut down.
    #[error("project feed is closed")]
    Closed,

    /// Transport-layer failure.
    #[error("feed transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl FeedError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}

type ReleaseFn = Box<dyn FnOnce() + Send + Sync>;

/// Live subscription to the project feed.
///
/// Yields events in arrival order. Dropping the subscription releases it.
pub struct FeedSubscription {
    filter: FeedFilter,
    receiver: UnboundedReceiver<ProjectChange>,
    release: Option<ReleaseFn>,
}

impl FeedSubscription {
    /// Wraps a receiver with the hook that releases the subscription.
    #[must_use]
    pub fn new(
        filter: FeedFilter,
        receiver: UnboundedReceiver<ProjectChange>,
        release: impl FnOnce() + Send + Sync + 'static,
    ) -> Self {
        Self {
            filter,
            receiver,
            release: Some(Box::new(release)),
        }
    }

    /// Returns the subscription filter.
    #[must_use]
    pub const fn filter(&self) -> FeedFilter {
        self.filter
    }

    /// Waits for the next event. Returns `None` once the feed disconnects.
    pub async fn next_change(&mut self) -> Option<ProjectChange> {
        self.receiver.recv().await
    }

    /// Returns the next queued event without waiting.
    ///
    /// Returns `None` when no event is queued or the feed disconnected.
    pub fn try_next_change(&mut self) -> Option<ProjectChange> {
        match self.receiver.try_recv() {
            Ok(change) => Some(change),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Releases the subscription.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for FeedSubscription {
    fn drop(&mut self) {
        self.receiver.close();
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for FeedSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedSubscription")
            .field("filter", &self.filter)
            .field("released", &self.release.is_none())
            .finish_non_exhaustive()
    }
}
