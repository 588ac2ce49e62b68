//! Configuration management for the access gate
//!
//! Configuration comes from a YAML file or from `BIZDESK_*` environment
//! variables (a `.env` file is honoured), and is validated before use.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{AccessError, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// Main configuration struct
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub access: AccessConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path).await?;
        let config = Self::from_yaml_str(&content)?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate YAML configuration
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");
        Self::default().with_env_overrides()
    }

    /// Apply `BIZDESK_*` environment variables on top of this configuration
    ///
    /// A `.env` file is read first when present.
    pub fn with_env_overrides(self) -> Result<Self> {
        // a missing .env file is not an error
        let _ = dotenvy::dotenv();
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Apply overrides looked up by variable name, then validate
    ///
    /// Only variables that are set replace the current value.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(audit) = parse_override::<bool, _>(&lookup, "BIZDESK_AUDIT_DENIALS")? {
            self.access.audit_denials = audit;
        }
        if let Some(cache) =
            parse_override::<bool, _>(&lookup, "BIZDESK_CACHE_FAILED_RESOLUTIONS")?
        {
            self.access.cache_failed_resolutions = cache;
        }
        if let Some(buffer) =
            parse_override::<usize, _>(&lookup, "BIZDESK_IDENTITY_EVENT_BUFFER")?
        {
            self.access.identity_event_buffer = buffer;
        }
        if let Some(level) = lookup("BIZDESK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(json) = parse_override::<bool, _>(&lookup, "BIZDESK_LOG_JSON")? {
            self.logging.json = json;
        }

        self.validate()?;
        Ok(self)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.access
            .validate()
            .map_err(|e| AccessError::Config(format!("Access config error: {}", e)))?;

        self.logging
            .validate()
            .map_err(|e| AccessError::Config(format!("Logging config error: {}", e)))?;

        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

fn parse_override<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| AccessError::Config(format!("Invalid {}: {}", key, e))),
        None => Ok(None),
    }
}
