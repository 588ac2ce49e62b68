//! Route guard
//!
//! The single enforcement point for page access. Every navigation to a
//! protected page goes through [`RouteGuard::guard`] (or
//! [`RouteGuard::navigate`] when supersession matters) and ends in one of
//! the three [`GuardDecision`]s. Any failure on the way resolves to the
//! least-privileged role, so the guard never fails open.

mod events;
mod navigation;

pub use navigation::{NavigationTicket, NavigationTracker};

use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::auth::rbac::{GuardCheck, GuardDecision, PageId, PolicyTable, Role};
use crate::auth::resolver::RoleResolver;
use crate::identity::{Attributes, ObservabilitySink, Session};

/// Enforces the policy table on navigation
#[derive(Clone)]
pub struct RouteGuard {
    resolver: Arc<RoleResolver>,
    policy: Arc<PolicyTable>,
    sink: Arc<dyn ObservabilitySink>,
    navigation: Arc<NavigationTracker>,
    audit_denials: bool,
}

impl RouteGuard {
    pub fn new(
        resolver: Arc<RoleResolver>,
        policy: Arc<PolicyTable>,
        sink: Arc<dyn ObservabilitySink>,
    ) -> Self {
        Self {
            resolver,
            policy,
            sink,
            navigation: Arc::new(NavigationTracker::new()),
            audit_denials: true,
        }
    }

    pub fn with_audit_denials(mut self, enabled: bool) -> Self {
        self.audit_denials = enabled;
        self
    }

    pub fn policy(&self) -> &PolicyTable {
        &self.policy
    }

    pub fn resolver(&self) -> &Arc<RoleResolver> {
        &self.resolver
    }

    /// Decide whether `session` may open `page`
    ///
    /// Suspends while the role is fetched; the caller shows a loading state
    /// until the future completes.
    pub async fn guard(&self, session: Option<&Session>, page: PageId) -> GuardDecision {
        let Some(session) = session else {
            return GuardDecision::RedirectToLogin;
        };

        let role = self.resolver.resolve_role(Some(session)).await;
        self.decide(role, page)
    }

    /// Decide without fetching
    ///
    /// Returns [`GuardCheck::Pending`] when the role has not been resolved
    /// yet; no decision is made on partial information.
    pub fn check_resolved(&self, session: Option<&Session>, page: PageId) -> GuardCheck {
        let Some(session) = session else {
            return GuardCheck::Decided(GuardDecision::RedirectToLogin);
        };

        match self.resolver.cached_role(session) {
            Some(role) => GuardCheck::Decided(self.decide(role, page)),
            None => GuardCheck::Pending,
        }
    }

    /// Start a navigation; earlier navigations become stale
    pub fn begin_navigation(&self) -> NavigationTicket {
        self.navigation.begin()
    }

    /// Guard a navigation started with [`RouteGuard::begin_navigation`]
    ///
    /// Returns `None` when a newer navigation began (or the session changed)
    /// while the role was being resolved. Nothing is emitted for a stale
    /// navigation.
    pub async fn navigate(
        &self,
        ticket: NavigationTicket,
        session: Option<&Session>,
        page: PageId,
    ) -> Option<GuardDecision> {
        let decision = match session {
            None => GuardDecision::RedirectToLogin,
            Some(session) => {
                let role = self.resolver.resolve_role(Some(session)).await;
                if !self.navigation.is_current(ticket) {
                    debug!(
                        ticket = ticket.sequence(),
                        page = %page,
                        "Navigation superseded, discarding decision"
                    );
                    return None;
                }
                self.decide(role, page)
            }
        };

        self.navigation.is_current(ticket).then_some(decision)
    }

    fn decide(&self, role: Role, page: PageId) -> GuardDecision {
        let decision = self.policy.decide(role, page);
        if decision.allowed {
            return GuardDecision::Render;
        }

        debug!(role = %role, page = %page, "Access denied, redirecting to default page");
        if self.audit_denials {
            let mut attributes: Attributes = HashMap::with_capacity(3);
            attributes.insert("role".to_string(), serde_json::json!(role.as_str()));
            attributes.insert("page".to_string(), serde_json::json!(page.as_str()));
            attributes.insert(
                "timestamp".to_string(),
                serde_json::json!(Utc::now().to_rfc3339()),
            );
            self.sink.emit("access_denied", attributes);
        }
        GuardDecision::RedirectToDefault
    }
}

impl std::fmt::Debug for RouteGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteGuard")
            .field("resolver", &self.resolver)
            .field("navigation", &self.navigation)
            .field("audit_denials", &self.audit_denials)
            .finish_non_exhaustive()
    }
}
