//! Unit tests for the account module.

mod registration_tests;
