//! Identifier types for the project domain.

crate::ids::uuid_newtype! {
    /// Unique identifier for a project row.
    ProjectId
}
