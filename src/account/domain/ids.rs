//! Identifier types for the account domain.

crate::ids::uuid_newtype! {
    /// Unique identifier for a user, assigned by the hosted auth service.
    UserId
}
