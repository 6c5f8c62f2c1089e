//! Tasks and the Kanban board.
//!
//! Tasks belong to a project and sit in one of three board columns. The
//! board applies drag-and-drop moves to local state immediately and then
//! persists them, putting the moved task back if the hosted service rejects
//! the change. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
