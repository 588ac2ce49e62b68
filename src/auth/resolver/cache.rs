//! Session-scoped role cache

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;
use uuid::Uuid;

use crate::auth::rbac::Role;
use crate::identity::{IdentityKey, Session};

#[derive(Debug, Clone, Copy)]
struct CachedRole {
    role: Role,
    session_id: Uuid,
    generation: u64,
}

/// Resolved roles keyed by identity
///
/// An entry only answers for the session that resolved it: a new session
/// for the same identity is a miss even before any identity event has been
/// applied. Token refreshes keep the session id and keep hitting.
///
/// Every entry is also tagged with the generation that was current when its
/// fetch started. [`RoleCache::invalidate_all`] bumps the generation, so
/// entries written by fetches that straddle an invalidation are never
/// served.
#[derive(Debug, Default)]
pub struct RoleCache {
    entries: DashMap<IdentityKey, CachedRole>,
    generation: AtomicU64,
}

impl RoleCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generation to pass to [`RoleCache::insert`] after a fetch
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn get(&self, session: &Session) -> Option<Role> {
        let current = self.generation();
        self.entries
            .get(&session.identity)
            .filter(|entry| {
                entry.generation == current && entry.session_id == session.session_id
            })
            .map(|entry| entry.role)
    }

    /// Store `role` for `session` unless the cache was invalidated after
    /// `generation`
    ///
    /// Returns `false` when the write was discarded as stale.
    pub fn insert(&self, session: &Session, role: Role, generation: u64) -> bool {
        if generation != self.generation() {
            return false;
        }
        self.entries.insert(
            session.identity.clone(),
            CachedRole {
                role,
                session_id: session.session_id,
                generation,
            },
        );
        true
    }

    /// Forget one identity
    pub fn remove(&self, identity: &IdentityKey) -> Option<Role> {
        self.entries.remove(identity).map(|(_, entry)| entry.role)
    }

    /// Forget everything and reject writes from in-flight fetches
    pub fn invalidate_all(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.entries.clear();
        debug!(generation, "Role cache invalidated");
        generation
    }

    /// Forget every session except `session`
    ///
    /// Applied on sign-in. The new session's own entry survives even when
    /// the sign-in event is handled after its role was resolved.
    pub fn invalidate_except(&self, session: &Session) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.entries.retain(|_, entry| entry.session_id == session.session_id);
        for mut entry in self.entries.iter_mut() {
            entry.generation = generation;
        }
        debug!(
            generation,
            identity = %session.identity,
            "Role cache invalidated except current session"
        );
        generation
    }

    pub fn len(&self) -> usize {
        let current = self.generation();
        self.entries
            .iter()
            .filter(|entry| entry.generation == current)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
