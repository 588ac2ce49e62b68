//! Observability sinks

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{Level, debug, info, warn};

use super::traits::ObservabilitySink;
use super::types::Attributes;

/// Forwards events to `tracing` under the `audit` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink {
    level: Option<Level>,
}

impl TracingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit every event at `level` instead of the per-event default
    pub fn with_level(level: Level) -> Self {
        Self { level: Some(level) }
    }

    fn level_for(&self, event: &str) -> Level {
        match self.level {
            Some(level) => level,
            None if event == "access_denied" || event.ends_with("_failed") => Level::WARN,
            None => Level::INFO,
        }
    }
}

impl ObservabilitySink for TracingSink {
    fn emit(&self, event: &str, attributes: Attributes) {
        let fields = serde_json::Value::Object(attributes.into_iter().collect());

        let level = self.level_for(event);
        if level <= Level::WARN {
            warn!(target: "audit", event, attributes = %fields);
        } else if level == Level::INFO {
            info!(target: "audit", event, attributes = %fields);
        } else {
            debug!(target: "audit", event, attributes = %fields);
        }
    }
}

/// Event captured by [`RecordingSink`]
#[derive(Debug, Clone)]
pub struct RecordedEvent {
    pub name: String,
    pub attributes: Attributes,
    pub recorded_at: DateTime<Utc>,
}

impl RecordedEvent {
    /// String attribute, if present
    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(|value| value.as_str())
    }
}

/// Keeps every emitted event in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<RecordedEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().clone()
    }

    pub fn events_named(&self, name: &str) -> Vec<RecordedEvent> {
        self.events
            .lock()
            .iter()
            .filter(|event| event.name == name)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl ObservabilitySink for RecordingSink {
    fn emit(&self, event: &str, attributes: Attributes) {
        self.events.lock().push(RecordedEvent {
            name: event.to_string(),
            attributes,
            recorded_at: Utc::now(),
        });
    }
}
