//! User accounts.
//!
//! Sign-in and session handling belong to the hosted service. This module
//! owns the user identifier shared by projects and tasks, and the local
//! checks a registration form passes before anything is sent to the
//! [`ports::AuthGateway`].

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
