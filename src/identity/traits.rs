//! Contracts of the collaborators the gate consumes

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::types::{Attributes, IdentityKey, RoleRecord, Session, SessionEvent};
use crate::utils::error::Result;

/// Source of the current session and its lifecycle events
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Session of the signed-in identity, `None` when signed out
    async fn current_session(&self) -> Option<Session>;

    /// Stream of `signed_in` / `signed_out` / `token_refreshed` events
    fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;
}

/// Single-record role lookup keyed by identity
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch the role record for `identity`
    ///
    /// `Ok(None)` means the identity has no record. Errors cover network and
    /// availability failures as well as malformed rows.
    async fn get_role_record(&self, identity: &IdentityKey) -> Result<Option<RoleRecord>>;
}

/// Fire-and-forget event sink
///
/// Implementations must not block and must not panic.
pub trait ObservabilitySink: Send + Sync {
    fn emit(&self, event: &str, attributes: Attributes);
}
