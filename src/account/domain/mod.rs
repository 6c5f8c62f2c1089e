//! Domain model for user accounts.

mod error;
mod ids;
mod registration;

pub use error::AccountDomainError;
pub use ids::UserId;
pub use registration::RegistrationForm;
