//! Registration form checked before sign-up.

use super::AccountDomainError;

/// Sign-up form fields as entered by the user.
#[derive(Clone, PartialEq, Eq)]
pub struct RegistrationForm {
    email: String,
    password: String,
    confirm_password: String,
}

impl RegistrationForm {
    /// Creates a form from raw field values.
    #[must_use]
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
        }
    }

    /// Returns the email address with surrounding whitespace removed.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.trim()
    }

    /// Returns the chosen password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Checks the form without contacting the auth service.
    ///
    /// # Errors
    ///
    /// Returns [`AccountDomainError::PasswordMismatch`] when the password and
    /// its confirmation differ, or an empty-field error when a required
    /// field is blank.
    pub fn validate(&self) -> Result<(), AccountDomainError> {
        if self.email().is_empty() {
            return Err(AccountDomainError::EmptyEmail);
        }
        if self.password.is_empty() {
            return Err(AccountDomainError::EmptyPassword);
        }
        if self.password != self.confirm_password {
            return Err(AccountDomainError::PasswordMismatch);
        }
        Ok(())
    }
}

impl std::fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("confirm_password", &"<redacted>")
            .finish()
    }
}
