//! Access gate configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Access gate behaviour switches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Emit an `access_denied` audit event when the guard redirects
    #[serde(default = "default_true")]
    pub audit_denials: bool,
    /// Cache the `user` fallback produced by a failed role fetch until the
    /// session changes
    #[serde(default = "default_true")]
    pub cache_failed_resolutions: bool,
    /// Capacity of the in-memory identity provider's event channel
    #[serde(default = "default_identity_event_buffer")]
    pub identity_event_buffer: usize,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            audit_denials: true,
            cache_failed_resolutions: true,
            identity_event_buffer: default_identity_event_buffer(),
        }
    }
}
