//! Role resolution
//!
//! Maps a session to exactly one [`Role`]. Resolution never fails: absent
//! sessions, missing records, store errors, panicking stores and unknown
//! role strings all resolve to [`Role::User`].

mod cache;

pub use cache::RoleCache;

use futures::FutureExt;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::auth::rbac::{Role, parse_role_checked};
use crate::identity::{Attributes, IdentityKey, ObservabilitySink, RecordStore, Session};

/// Observable resolution state for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
    Unresolved,
    Resolved(Role),
}

/// What a single store lookup produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lookup {
    Found(Role),
    Missing,
    Failed,
}

impl Lookup {
    fn role(self) -> Role {
        match self {
            Lookup::Found(role) => role,
            Lookup::Missing | Lookup::Failed => Role::User,
        }
    }
}

/// Resolves and caches the role of a session
pub struct RoleResolver {
    store: Arc<dyn RecordStore>,
    cache: Arc<RoleCache>,
    sink: Arc<dyn ObservabilitySink>,
    cache_failed_resolutions: bool,
}

impl RoleResolver {
    pub fn new(
        store: Arc<dyn RecordStore>,
        cache: Arc<RoleCache>,
        sink: Arc<dyn ObservabilitySink>,
    ) -> Self {
        Self {
            store,
            cache,
            sink,
            cache_failed_resolutions: true,
        }
    }

    /// Whether the `user` fallback from a failed fetch is cached
    pub fn with_cache_failed_resolutions(mut self, enabled: bool) -> Self {
        self.cache_failed_resolutions = enabled;
        self
    }

    pub fn cache(&self) -> &Arc<RoleCache> {
        &self.cache
    }

    /// Cached role for `session`, without fetching
    pub fn cached_role(&self, session: &Session) -> Option<Role> {
        self.cache.get(session)
    }

    pub fn resolution_state(&self, session: Option<&Session>) -> ResolutionState {
        match session.and_then(|s| self.cached_role(s)) {
            Some(role) => ResolutionState::Resolved(role),
            None => ResolutionState::Unresolved,
        }
    }

    /// Resolve the role of `session`
    ///
    /// Concurrent calls for the same identity may each hit the store; the
    /// cache write is idempotent.
    pub async fn resolve_role(&self, session: Option<&Session>) -> Role {
        let Some(session) = session else {
            return Role::User;
        };
        let identity = &session.identity;

        if let Some(role) = self.cache.get(session) {
            debug!(identity = %identity, role = %role, "Role cache hit");
            return role;
        }

        let generation = self.cache.generation();
        let lookup = self.lookup(identity).await;
        let role = lookup.role();

        if lookup != Lookup::Failed || self.cache_failed_resolutions {
            if self.cache.insert(session, role, generation) {
                debug!(identity = %identity, role = %role, "Role resolved");
            } else {
                debug!(identity = %identity, "Session changed during role fetch, not caching");
            }
        }

        role
    }

    async fn lookup(&self, identity: &IdentityKey) -> Lookup {
        // the call sits inside the block so a panic while building the
        // future is caught as well
        let fetched = AssertUnwindSafe(async { self.store.get_role_record(identity).await })
            .catch_unwind()
            .await;

        match fetched {
            Ok(Ok(Some(record))) => {
                let (role, normalized) = parse_role_checked(&record.role);
                if normalized {
                    warn!(
                        identity = %identity,
                        stored = %record.role,
                        "Stored role is not recognised, treating as user"
                    );
                    self.emit(
                        "role_normalized",
                        identity,
                        [("stored_role", serde_json::json!(record.role))],
                    );
                }
                Lookup::Found(role)
            }
            Ok(Ok(None)) => {
                debug!(identity = %identity, "No role record, treating as user");
                Lookup::Missing
            }
            Ok(Err(e)) => {
                warn!(identity = %identity, error = %e, "Role fetch failed, treating as user");
                self.emit(
                    "role_resolution_failed",
                    identity,
                    [
                        ("error", serde_json::json!(e.to_string())),
                        ("kind", serde_json::json!(e.kind())),
                    ],
                );
                Lookup::Failed
            }
            Err(_) => {
                warn!(identity = %identity, "Record store panicked, treating as user");
                self.emit(
                    "role_resolution_failed",
                    identity,
                    [("kind", serde_json::json!("panic"))],
                );
                Lookup::Failed
            }
        }
    }

    fn emit<const N: usize>(
        &self,
        event: &str,
        identity: &IdentityKey,
        extra: [(&str, serde_json::Value); N],
    ) {
        let mut attributes: Attributes = HashMap::with_capacity(N + 1);
        attributes.insert("identity".to_string(), serde_json::json!(identity.as_str()));
        for (key, value) in extra {
            attributes.insert(key.to_string(), value);
        }
        self.sink.emit(event, attributes);
    }
}

impl std::fmt::Debug for RoleResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoleResolver")
            .field("cache", &self.cache)
            .field("cache_failed_resolutions", &self.cache_failed_resolutions)
            .finish_non_exhaustive()
    }
}
