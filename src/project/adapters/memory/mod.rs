//! In-memory project adapters standing in for the hosted service.

mod feed;
mod repository;

pub use feed::InMemoryProjectFeed;
pub use repository::InMemoryProjectRepository;
