//! In-memory auth gateway for tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::account::{
    domain::UserId,
    ports::{AuthError, AuthGateway, AuthResult},
};

/// Thread-safe in-memory auth gateway keyed by normalized email.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAuthGateway {
    users: Arc<RwLock<HashMap<String, UserId>>>,
}

impl InMemoryAuthGateway {
    /// Creates a gateway with no registered users.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the identifier registered for `email`, if any.
    #[must_use]
    pub fn user_for(&self, email: &str) -> Option<UserId> {
        let users = self.users.read().ok()?;
        users.get(&email.trim().to_ascii_lowercase()).copied()
    }
}

#[async_trait]
impl AuthGateway for InMemoryAuthGateway {
    async fn sign_up(&self, email: &str, _password: &str) -> AuthResult<UserId> {
        let mut users = self
            .users
            .write()
            .map_err(|err| AuthError::transport(std::io::Error::other(err.to_string())))?;
        let key = email.trim().to_ascii_lowercase();
        if users.contains_key(&key) {
            return Err(AuthError::Rejected(format!("{key} is already registered")));
        }
        let user_id = UserId::new();
        users.insert(key, user_id);
        Ok(user_id)
    }
}
