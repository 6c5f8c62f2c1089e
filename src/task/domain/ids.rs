//! Identifier types for the task domain.

crate::ids::uuid_newtype! {
    /// Unique identifier for a task row.
    TaskId
}
