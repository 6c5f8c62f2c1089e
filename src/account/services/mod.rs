//! Application services for account management.

mod registration;

pub use registration::{RegistrationError, RegistrationService};
