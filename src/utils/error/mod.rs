//! Error handling for the access gate
//!
//! Errors only exist at the edges that are allowed to fail: configuration
//! loading, policy validation and collaborator implementations. The gate
//! itself converts every failure into a safe decision.

mod helpers;
mod types;

pub use types::{AccessError, Result};
