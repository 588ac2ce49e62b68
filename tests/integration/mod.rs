//! Integration tests for bizdesk-access
//!
//! These tests drive the public API with the bundled in-memory
//! collaborators.

pub mod guard_tests;
pub mod identity_event_tests;
pub mod policy_tests;
