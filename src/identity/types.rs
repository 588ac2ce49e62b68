//! Identity and record types shared with the external collaborators

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Stable key identifying a signed-in principal across token refreshes
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityKey(String);

impl IdentityKey {
    pub fn new<S: Into<String>>(key: S) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for IdentityKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for IdentityKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

impl From<Uuid> for IdentityKey {
    fn from(id: Uuid) -> Self {
        Self(id.to_string())
    }
}

/// Session issued by the identity provider
///
/// The gate only reads [`Session::identity`]; the token is carried for the
/// provider's benefit and never interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Provider-side session identifier
    pub session_id: Uuid,
    /// Identity the session belongs to
    pub identity: IdentityKey,
    /// Opaque access token
    #[serde(skip_serializing, default)]
    pub access_token: String,
    /// When the current token was issued
    pub issued_at: DateTime<Utc>,
}

impl Session {
    pub fn new<K: Into<IdentityKey>>(identity: K) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            identity: identity.into(),
            access_token: Uuid::new_v4().simple().to_string(),
            issued_at: Utc::now(),
        }
    }

    /// Same session with a freshly issued token
    pub fn refreshed(&self) -> Self {
        Self {
            session_id: self.session_id,
            identity: self.identity.clone(),
            access_token: Uuid::new_v4().simple().to_string(),
            issued_at: Utc::now(),
        }
    }
}

/// Session lifecycle notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn(Session),
    SignedOut,
    TokenRefreshed(Session),
}

impl SessionEvent {
    pub fn name(&self) -> &'static str {
        match self {
            SessionEvent::SignedIn(_) => "signed_in",
            SessionEvent::SignedOut => "signed_out",
            SessionEvent::TokenRefreshed(_) => "token_refreshed",
        }
    }
}

/// Row returned by the record store's role lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    /// Raw role string as stored
    pub role: String,
}

impl RoleRecord {
    pub fn new<S: Into<String>>(role: S) -> Self {
        Self { role: role.into() }
    }
}

/// Structured attributes attached to an observability event
pub type Attributes = HashMap<String, serde_json::Value>;
