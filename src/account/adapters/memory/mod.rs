//! In-memory account adapters.

mod auth;

pub use auth::InMemoryAuthGateway;
