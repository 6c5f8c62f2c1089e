//! Taskboard: client-side state core for a project and task board.
//!
//! Users own projects, and each project carries tasks laid out on a Kanban
//! board with `todo`, `in_progress` and `completed` columns. A hosted table,
//! storage and push-feed service is the system of record; this crate keeps
//! the in-memory view of that service consistent with it.
//!
//! # Architecture
//!
//! Taskboard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure entity types and invariants with no I/O
//! - **Ports**: Abstract trait interfaces for the hosted service
//! - **Adapters**: In-memory implementations of the ports
//! - **Services**: Optimistic board updates and realtime list sync
//!
//! # Modules
//!
//! - [`account`]: User identifiers and registration checks
//! - [`project`]: Projects, the project feed, and the dashboard list
//! - [`task`]: Tasks, reference images, and the Kanban board
//! - [`sync`]: Reducer applying change events to ordered row lists
//! - [`notice`]: Transient user-facing notifications
//! - [`config`]: Settings loading

pub mod account;
pub mod config;
mod ids;
pub mod notice;
pub mod project;
pub mod sync;
pub mod task;
