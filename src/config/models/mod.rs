//! Configuration data models

pub mod access;
pub mod logging;

pub use access::*;
pub use logging::*;

/// Log levels accepted in configuration
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

pub fn default_true() -> bool {
    true
}

pub fn default_identity_event_buffer() -> usize {
    64
}

pub fn default_log_level() -> String {
    "info".to_string()
}
