//! Adapter implementations for account ports.

pub mod memory;
