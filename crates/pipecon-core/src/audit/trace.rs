//! Trace identifiers correlating a chain of actions.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PipeconError;

/// Prefix used when a caller logs an event without a trace id.
pub const DEFAULT_TRACE_PREFIX: &str = "evt";

/// Length of the random hex suffix.
const SUFFIX_LEN: usize = 8;

static TRACE_ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<prefix>.+)-(?P<ts>[0-9]+)-(?P<suffix>[0-9a-f]{8})$")
        .expect("trace id pattern is valid")
});

/// A trace identifier of the form `{prefix}-{unix seconds}-{8 hex chars}`.
///
/// The timestamp has one-second resolution; uniqueness comes from the random
/// suffix drawn from a v4 UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraceId(String);

impl TraceId {
    /// Generates a fresh trace id for the given action category.
    pub fn generate(prefix: &str) -> Self {
        let ts = chrono::Utc::now().timestamp();
        let suffix = Uuid::new_v4().simple().to_string();
        Self(format!("{prefix}-{ts}-{}", &suffix[..SUFFIX_LEN]))
    }

    /// Validates an existing identifier.
    pub fn parse(value: &str) -> Result<Self, PipeconError> {
        if TRACE_ID_PATTERN.is_match(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(PipeconError::validation(
                "trace_id",
                format!("'{value}' is not of the form prefix-timestamp-hex8"),
            ))
        }
    }

    /// The action category this id was generated for.
    pub fn prefix(&self) -> &str {
        TRACE_ID_PATTERN
            .captures(&self.0)
            .and_then(|caps| caps.name("prefix"))
            .map(|m| m.as_str())
            .unwrap_or("")
    }

    /// Unix timestamp (seconds) embedded in the id.
    pub fn timestamp(&self) -> Option<i64> {
        TRACE_ID_PATTERN
            .captures(&self.0)
            .and_then(|caps| caps.name("ts"))
            .and_then(|m| m.as_str().parse().ok())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Generates a trace id with the given prefix.
pub fn new_trace_id(prefix: &str) -> TraceId {
    TraceId::generate(prefix)
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TraceId {
    type Err = PipeconError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for TraceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_format() {
        for prefix in ["crawl", "ctx", "rank", "send", "evt"] {
            let id = new_trace_id(prefix);
            let re = Regex::new(&format!(r"^{prefix}-\d+-[0-9a-f]{{8}}$")).unwrap();
            assert!(re.is_match(id.as_str()), "bad trace id: {id}");
            assert_eq!(id.prefix(), prefix);
        }
    }

    #[test]
    fn test_timestamp_is_current() {
        let before = chrono::Utc::now().timestamp();
        let id = TraceId::generate("crawl");
        let after = chrono::Utc::now().timestamp();
        let ts = id.timestamp().unwrap();
        assert!(ts >= before && ts <= after);
    }

    #[test]
    fn test_ten_thousand_ids_are_distinct() {
        let ids: HashSet<TraceId> = (0..10_000).map(|_| new_trace_id("rank")).collect();
        assert_eq!(ids.len(), 10_000);
    }

    #[test]
    fn test_parse() {
        let id = TraceId::parse("ctx-1730000000-0a1b2c3d").unwrap();
        assert_eq!(id.prefix(), "ctx");
        assert_eq!(id.timestamp(), Some(1730000000));

        // Prefixes may themselves contain dashes.
        assert_eq!(
            TraceId::parse("crawl-batch-1-0a1b2c3d").unwrap().prefix(),
            "crawl-batch"
        );

        assert!(TraceId::parse("ctx-1730000000-0A1B2C3D").is_err());
        assert!(TraceId::parse("ctx-abc-0a1b2c3d").is_err());
        assert!(TraceId::parse("ctx-1730000000-0a1b2c").is_err());
        assert!("".parse::<TraceId>().is_err());
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let id = TraceId::parse("send-1730000000-deadbeef").unwrap();
        assert_eq!(
            serde_json::to_value(&id).unwrap(),
            serde_json::json!("send-1730000000-deadbeef")
        );
    }
}
