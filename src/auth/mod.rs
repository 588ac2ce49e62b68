//! Page access control
//!
//! [`AccessSystem`] wires the policy table, the role resolver and the route
//! guard to the external collaborators.

pub mod guard;
pub mod rbac;
pub mod resolver;

pub use guard::{NavigationTicket, RouteGuard};
pub use rbac::{GuardCheck, GuardDecision, PageId, PolicyTable, Role, parse_role};
pub use resolver::{ResolutionState, RoleCache, RoleResolver};

use crate::config::AccessConfig;
use crate::identity::{IdentityProvider, ObservabilitySink, RecordStore};
use crate::utils::error::Result;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// Main access control system
#[derive(Clone)]
pub struct AccessSystem {
    config: Arc<AccessConfig>,
    identity: Arc<dyn IdentityProvider>,
    guard: RouteGuard,
}

impl AccessSystem {
    /// Create an access system enforcing the standard policy table
    pub fn new(
        config: &AccessConfig,
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn RecordStore>,
        sink: Arc<dyn ObservabilitySink>,
    ) -> Result<Self> {
        Self::with_policy(
            config,
            PolicyTable::standard().clone(),
            identity,
            store,
            sink,
        )
    }

    /// Create an access system enforcing `policy`
    ///
    /// Fails when the table violates its invariants.
    pub fn with_policy(
        config: &AccessConfig,
        policy: PolicyTable,
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn RecordStore>,
        sink: Arc<dyn ObservabilitySink>,
    ) -> Result<Self> {
        info!("Initializing access control system");

        policy.validate()?;

        let resolver = Arc::new(
            RoleResolver::new(store, Arc::new(RoleCache::new()), sink.clone())
                .with_cache_failed_resolutions(config.cache_failed_resolutions),
        );
        let guard = RouteGuard::new(resolver, Arc::new(policy), sink)
            .with_audit_denials(config.audit_denials);

        info!("Access control system initialized successfully");
        Ok(Self {
            config: Arc::new(config.clone()),
            identity,
            guard,
        })
    }

    /// Start invalidating cached roles on identity events
    pub fn start(&self) -> JoinHandle<()> {
        self.guard.watch_identity(self.identity.subscribe())
    }

    /// Guard a navigation of the current session to `page`
    pub async fn guard_current(&self, page: PageId) -> GuardDecision {
        let session = self.identity.current_session().await;
        self.guard.guard(session.as_ref(), page).await
    }

    /// Like [`AccessSystem::guard_current`], but superseded by later
    /// navigations
    pub async fn navigate_current(&self, page: PageId) -> Option<GuardDecision> {
        let ticket = self.guard.begin_navigation();
        let session = self.identity.current_session().await;
        self.guard.navigate(ticket, session.as_ref(), page).await
    }

    /// Role of the current session
    pub async fn current_role(&self) -> Role {
        let session = self.identity.current_session().await;
        self.guard.resolver().resolve_role(session.as_ref()).await
    }

    pub fn config(&self) -> &AccessConfig {
        &self.config
    }

    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    pub fn resolver(&self) -> &RoleResolver {
        self.guard.resolver()
    }

    pub fn policy(&self) -> &PolicyTable {
        self.guard.policy()
    }
}

impl std::fmt::Debug for AccessSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessSystem")
            .field("config", &self.config)
            .field("guard", &self.guard)
            .finish_non_exhaustive()
    }
}
