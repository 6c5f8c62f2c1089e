//! Port contracts for projects.
//!
//! Ports define the hosted-service interfaces used by project services.

pub mod feed;
pub mod repository;

pub use feed::{FeedError, FeedFilter, FeedResult, FeedSubscription, ProjectChange, ProjectFeed};
pub use repository::{ProjectRepository, ProjectRepositoryError, ProjectRepositoryResult};
