//! Common test utilities for bizdesk-access


pub use fixtures::{AccessFixture, RoleFactory};
