//! Projects and the realtime project dashboard.
//!
//! A project groups a user's tasks. The dashboard keeps the user's project
//! list current by folding push-feed change events into it instead of
//! refetching. The module follows hexagonal architecture:
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
