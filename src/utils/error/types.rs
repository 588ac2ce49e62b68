//! Error types for the access gate

use thiserror::Error;

/// Result type alias for the access gate
pub type Result<T> = std::result::Result<T, AccessError>;

/// Main error type for the access gate
#[derive(Error, Debug)]
pub enum AccessError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Record store errors (malformed data, rejected query)
    #[error("Record store error: {0}")]
    Store(String),

    /// Network errors talking to a collaborator
    #[error("Network error: {0}")]
    Network(String),

    /// Policy table invariant violations
    #[error("Policy error: {0}")]
    Policy(String),
}
