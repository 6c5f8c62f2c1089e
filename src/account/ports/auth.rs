//! Auth gateway port for the hosted sign-up endpoint.

use crate::account::domain::UserId;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for auth gateway operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Sign-up contract of the hosted auth service.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Registers a new user and returns the assigned identifier.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Rejected`] when the service refuses the
    /// registration, or [`AuthError::Transport`] when the call fails.
    async fn sign_up(&self, email: &str, password: &str) -> AuthResult<UserId>;
}

/// Errors returned by auth gateway implementations.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The service rejected the registration.
    #[error("registration rejected: {0}")]
    Rejected(String),

    /// The call to the service failed.
    #[error("auth transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl AuthError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
