//! Error types for account validation.

use thiserror::Error;

/// Errors returned while validating account input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountDomainError {
    /// The email address is empty after trimming.
    #[error("email address must not be empty")]
    EmptyEmail,

    /// The password is empty.
    #[error("password must not be empty")]
    EmptyPassword,

    /// The password and its confirmation differ.
    #[error("passwords do not match")]
    PasswordMismatch,
}
