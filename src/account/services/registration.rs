//! Registration service guarding sign-up with local checks.

use crate::{
    account::{
        domain::{AccountDomainError, RegistrationForm, UserId},
        ports::{AuthError, AuthGateway},
    },
    notice::{Notice, Notifier, report_failure},
};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors returned by [`RegistrationService`].
#[derive(Debug, Clone, Error)]
pub enum RegistrationError {
    /// The form failed local validation; no remote call was made.
    #[error(transparent)]
    Invalid(#[from] AccountDomainError),

    /// The auth gateway failed or rejected the sign-up.
    #[error(transparent)]
    Gateway(#[from] AuthError),
}

/// Runs the registration flow.
#[derive(Clone)]
pub struct RegistrationService<G, N>
where
    G: AuthGateway,
    N: Notifier,
{
    gateway: Arc<G>,
    notifier: Arc<N>,
}

impl<G, N> RegistrationService<G, N>
where
    G: AuthGateway,
    N: Notifier,
{
    /// Creates a registration service.
    #[must_use]
    pub const fn new(gateway: Arc<G>, notifier: Arc<N>) -> Self {
        Self { gateway, notifier }
    }

    /// Validates the form, then signs the user up.
    ///
    /// A mismatched password confirmation is reported with a notice and
    /// never reaches the gateway.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::Invalid`] when validation fails or
    /// [`RegistrationError::Gateway`] when the sign-up call fails.
    pub async fn register(&self, form: RegistrationForm) -> Result<UserId, RegistrationError> {
        if let Err(err) = form.validate() {
            let message = match err {
                AccountDomainError::PasswordMismatch => "Passwords do not match",
                AccountDomainError::EmptyEmail | AccountDomainError::EmptyPassword => {
                    "Registration failed"
                }
            };
            self.notifier.notify(Notice::error(message));
            return Err(err.into());
        }

        match self.gateway.sign_up(form.email(), form.password()).await {
            Ok(user_id) => {
                info!(user_id = %user_id, "user registered");
                self.notifier
                    .notify(Notice::success("Registration successful! Please sign in."));
                Ok(user_id)
            }
            Err(err) => {
                report_failure(&*self.notifier, "Registration failed", &err);
                Err(err.into())
            }
        }
    }
}
