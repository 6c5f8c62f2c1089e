//! Port contracts for account management.

pub mod auth;

pub use auth::{AuthError, AuthGateway, AuthResult};
