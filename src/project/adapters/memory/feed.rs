//! In-memory push feed fanning project changes out to subscribers.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, Weak};
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};
use tracing::debug;

use crate::{
    account::domain::UserId,
    project::ports::{FeedError, FeedFilter, FeedResult, FeedSubscription, ProjectChange, ProjectFeed},
};

/// Thread-safe in-memory project feed.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProjectFeed {
    hub: Arc<RwLock<FeedHub>>,
}

#[derive(Debug, Default)]
struct FeedHub {
    next_id: u64,
    subscribers: HashMap<u64, Subscriber>,
}

#[derive(Debug)]
struct Subscriber {
    filter: FeedFilter,
    sender: UnboundedSender<ProjectChange>,
}

impl InMemoryProjectFeed {
    /// Creates a feed with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers `change` to every subscriber whose filter matches `owner`.
    ///
    /// Returns the number of subscribers the event was delivered to.
    pub fn publish(&self, owner: UserId, change: &ProjectChange) -> usize {
        let hub = self.hub.read().unwrap_or_else(PoisonError::into_inner);
        let mut delivered = 0;
        for subscriber in hub.subscribers.values() {
            if subscriber.filter.owner() != owner {
                continue;
            }
            if subscriber.sender.send(change.clone()).is_ok() {
                delivered += 1;
            }
        }
        debug!(
            kind = change.kind(),
            row_id = %change.row_id(),
            delivered,
            "published project change"
        );
        delivered
    }

    /// Drops every subscriber's sender, ending their streams.
    pub fn disconnect_all(&self) {
        let mut hub = self.hub.write().unwrap_or_else(PoisonError::into_inner);
        hub.subscribers.clear();
    }

    /// Returns the number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.hub
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .subscribers
            .len()
    }
}

fn release_subscriber(hub: &Weak<RwLock<FeedHub>>, id: u64) {
    if let Some(hub) = hub.upgrade() {
        let mut hub = hub.write().unwrap_or_else(PoisonError::into_inner);
        if hub.subscribers.remove(&id).is_some() {
            debug!(subscription = id, "released project feed subscription");
        }
    }
}

#[async_trait]
impl ProjectFeed for InMemoryProjectFeed {
    async fn subscribe(&self, filter: FeedFilter) -> FeedResult<FeedSubscription> {
        let (sender, receiver) = unbounded_channel();
        let id = {
            let mut hub = self
                .hub
                .write()
                .map_err(|err| FeedError::transport(std::io::Error::other(err.to_string())))?;
            let id = hub.next_id;
            hub.next_id += 1;
            hub.subscribers.insert(id, Subscriber { filter, sender });
            id
        };
        debug!(
            subscription = id,
            table = FeedFilter::TABLE,
            filter = %filter.expression(),
            "opened project feed subscription"
        );

        let hub = Arc::downgrade(&self.hub);
        Ok(FeedSubscription::new(filter, receiver, move || {
            release_subscriber(&hub, id);
        }))
    }
}
