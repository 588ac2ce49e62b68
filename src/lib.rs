//! # bizdesk-access
//!
//! Page-level role-based access control for the bizdesk back office.
//!
//! A signed-in session is mapped to one of five roles, the role is checked
//! against a static page policy, and every navigation ends in one of three
//! decisions: render the page, redirect to the dashboard, or redirect to the
//! login screen. Failures anywhere on the way fall back to the
//! least-privileged role, never to rendering.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bizdesk_access::{
//!     AccessSystem, Config, GuardDecision, InMemoryIdentityProvider, InMemoryRecordStore,
//!     PageId, TracingSink,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let identity = Arc::new(InMemoryIdentityProvider::new(config.access.identity_event_buffer));
//!     let store = Arc::new(InMemoryRecordStore::new());
//!     store.insert_role("8c1f", "cashier");
//!
//!     let sink = Arc::new(TracingSink::new());
//!     let access = AccessSystem::new(&config.access, identity.clone(), store, sink)?;
//!     let _watcher = access.start();
//!
//!     identity.sign_in("8c1f");
//!     assert_eq!(access.guard_current(PageId::Finances).await, GuardDecision::Render);
//!     assert_eq!(access.guard_current(PageId::Settings).await, GuardDecision::RedirectToDefault);
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod auth;
pub mod config;
pub mod identity;
pub mod utils;

pub use auth::{
    AccessSystem, GuardCheck, GuardDecision, NavigationTicket, PageId, PolicyTable,
    ResolutionState, Role, RoleCache, RoleResolver, RouteGuard, parse_role,
};
pub use config::Config;
pub use identity::{
    Attributes, IdentityKey, IdentityProvider, InMemoryIdentityProvider, InMemoryRecordStore,
    ObservabilitySink, RecordStore, RecordedEvent, RecordingSink, RoleRecord, Session,
    SessionEvent, StoreFailure, TracingSink,
};
pub use utils::error::{AccessError, Result};
pub use utils::logging::init_tracing;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
