//! Audit log entries and the event builder used to append them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::trace::{DEFAULT_TRACE_PREFIX, TraceId};

/// Timestamp format of [`AuditEntry::ts`], second precision, local time.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Severity tag of an audit entry.
///
/// Conventionally one of INFO/WARN/ERROR; any other tag is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum LogLevel {
    #[default]
    Info,
    Warn,
    Error,
    Custom(String),
}

impl LogLevel {
    pub fn as_str(&self) -> &str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Custom(tag) => tag,
        }
    }

    fn from_tag(tag: &str) -> Self {
        match tag.trim().to_uppercase().as_str() {
            "INFO" => LogLevel::Info,
            "WARN" | "WARNING" => LogLevel::Warn,
            "ERROR" => LogLevel::Error,
            _ => LogLevel::Custom(tag.trim().to_string()),
        }
    }

    /// Folds a custom tag that spells a known level into that level.
    pub fn normalized(self) -> Self {
        match self {
            LogLevel::Custom(tag) => Self::from_tag(&tag),
            level => level,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = std::convert::Infallible;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_tag(input))
    }
}

impl Serialize for LogLevel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_tag(&raw))
    }
}

/// One immutable record in the `logs` slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub ts: String,
    pub level: LogLevel,
    pub event: String,
    pub trace_id: TraceId,
    pub data: Value,
}

impl AuditEntry {
    /// Case-insensitive substring match over the entry's JSON form.
    pub fn contains(&self, needle: &str) -> bool {
        let haystack = serde_json::to_string(self).unwrap_or_default();
        haystack.to_lowercase().contains(&needle.to_lowercase())
    }
}

/// An event about to be logged.
///
/// Only the event name is required. The level defaults to INFO, a missing
/// trace id is generated with the `evt` prefix and a missing payload becomes
/// an empty object.
#[derive(Debug, Clone)]
pub struct AuditEvent {
    pub(crate) event: String,
    pub(crate) level: LogLevel,
    pub(crate) trace_id: Option<TraceId>,
    pub(crate) data: Option<Value>,
}

impl AuditEvent {
    pub fn new(event: impl Into<String>) -> Self {
        Self {
            event: event.into(),
            level: LogLevel::Info,
            trace_id: None,
            data: None,
        }
    }

    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level.normalized();
        self
    }

    pub fn trace_id(mut self, trace_id: TraceId) -> Self {
        self.trace_id = Some(trace_id);
        self
    }

    /// Attaches a payload. Anything serializable is accepted as-is; a value
    /// that fails to serialize is recorded as `null`.
    pub fn data<T: Serialize>(mut self, data: &T) -> Self {
        self.data = Some(serde_json::to_value(data).unwrap_or(Value::Null));
        self
    }

    pub fn event_name(&self) -> &str {
        &self.event
    }

    /// Stamps the event into an entry.
    pub(crate) fn into_entry(self) -> AuditEntry {
        AuditEntry {
            ts: chrono::Local::now().format(TIMESTAMP_FORMAT).to_string(),
            level: self.level,
            event: self.event,
            trace_id: self
                .trace_id
                .unwrap_or_else(|| TraceId::generate(DEFAULT_TRACE_PREFIX)),
            data: self
                .data
                .unwrap_or_else(|| Value::Object(serde_json::Map::new())),
        }
    }
}
