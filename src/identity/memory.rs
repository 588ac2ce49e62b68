//! In-process identity provider and record store
//!
//! Used by the CLI, by embedders that already hold session state locally,
//! and by tests.

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::broadcast;
use tracing::{debug, info};

use super::traits::{IdentityProvider, RecordStore};
use super::types::{IdentityKey, RoleRecord, Session, SessionEvent};
use crate::utils::error::{AccessError, Result};

/// Identity provider holding a single current session
#[derive(Debug)]
pub struct InMemoryIdentityProvider {
    current: RwLock<Option<Session>>,
    event_sender: broadcast::Sender<SessionEvent>,
}

impl InMemoryIdentityProvider {
    pub fn new(event_buffer: usize) -> Self {
        let (event_sender, _) = broadcast::channel(event_buffer.max(1));
        Self {
            current: RwLock::new(None),
            event_sender,
        }
    }

    /// Start a session for `identity`, replacing any current one
    pub fn sign_in<K: Into<IdentityKey>>(&self, identity: K) -> Session {
        let session = Session::new(identity);
        info!(identity = %session.identity, "Signed in");

        *self.current.write() = Some(session.clone());
        self.publish(SessionEvent::SignedIn(session.clone()));
        session
    }

    /// End the current session; no-op when signed out
    pub fn sign_out(&self) {
        let previous = self.current.write().take();
        if let Some(session) = previous {
            info!(identity = %session.identity, "Signed out");
            self.publish(SessionEvent::SignedOut);
        }
    }

    /// Reissue the current session's token, keeping its identity
    pub fn refresh_token(&self) -> Option<Session> {
        let refreshed = {
            let mut current = self.current.write();
            let refreshed = current.as_ref()?.refreshed();
            *current = Some(refreshed.clone());
            refreshed
        };

        debug!(identity = %refreshed.identity, "Token refreshed");
        self.publish(SessionEvent::TokenRefreshed(refreshed.clone()));
        Some(refreshed)
    }

    fn publish(&self, event: SessionEvent) {
        // no subscribers is fine
        let _ = self.event_sender.send(event);
    }
}

impl Default for InMemoryIdentityProvider {
    fn default() -> Self {
        Self::new(crate::config::models::default_identity_event_buffer())
    }
}

#[async_trait]
impl IdentityProvider for InMemoryIdentityProvider {
    async fn current_session(&self) -> Option<Session> {
        self.current.read().clone()
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_sender.subscribe()
    }
}

/// Failure injected into [`InMemoryRecordStore`] lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreFailure {
    /// Store unreachable
    Network(String),
    /// Row present but unreadable
    Malformed(String),
}

impl StoreFailure {
    fn to_error(&self) -> AccessError {
        match self {
            StoreFailure::Network(msg) => AccessError::network(msg.clone()),
            StoreFailure::Malformed(msg) => AccessError::store(msg.clone()),
        }
    }
}

/// Identity → raw role string table
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    roles: DashMap<IdentityKey, String>,
    failure: Mutex<Option<StoreFailure>>,
    fetches: AtomicUsize,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `role` verbatim; it is not validated here
    pub fn insert_role<K: Into<IdentityKey>, S: Into<String>>(&self, identity: K, role: S) {
        self.roles.insert(identity.into(), role.into());
    }

    pub fn remove(&self, identity: &IdentityKey) -> Option<String> {
        self.roles.remove(identity).map(|(_, role)| role)
    }

    /// Make every following lookup fail, or clear the failure with `None`
    pub fn fail_with(&self, failure: Option<StoreFailure>) {
        *self.failure.lock() = failure;
    }

    /// Number of lookups served so far, failed ones included
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn get_role_record(&self, identity: &IdentityKey) -> Result<Option<RoleRecord>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if let Some(failure) = self.failure.lock().as_ref() {
            return Err(failure.to_error());
        }

        Ok(self
            .roles
            .get(identity)
            .map(|entry| RoleRecord::new(entry.value().clone())))
    }
}
