//! Audit logging.
//!
//! Every console action that changes a slot appends exactly one
//! [`AuditEntry`] to the session's `logs` slot. Entries are append-only and
//! kept in insertion order; [`filter_logs`] narrows a view without
//! reordering it.
//!
//! # Module Structure
//!
//! - `trace`: trace identifiers (`TraceId`, `new_trace_id`)
//! - `entry`: log entries, levels and the `AuditEvent` builder
//! - `filter`: level/substring filtering (`LogFilter`, `filter_logs`)

mod entry;
mod filter;
mod trace;

pub use entry::{AuditEntry, AuditEvent, LogLevel, TIMESTAMP_FORMAT};
pub use filter::{LogFilter, filter_logs};
pub use trace::{DEFAULT_TRACE_PREFIX, TraceId, new_trace_id};

use crate::error::{PipeconError, Result};

/// Appends one entry built from `event` to `logs`.
///
/// The event name is the only thing checked; payloads are stored as given.
/// The entry is mirrored to `tracing` at the matching level.
pub fn append(logs: &mut Vec<AuditEntry>, event: AuditEvent) -> Result<&AuditEntry> {
    if event.event_name().trim().is_empty() {
        return Err(PipeconError::validation(
            "event",
            "event name must not be empty",
        ));
    }

    let entry = event.into_entry();
    match entry.level {
        LogLevel::Warn => tracing::warn!(
            target: "audit",
            event = %entry.event,
            trace_id = %entry.trace_id,
            data = %entry.data,
            "audit entry appended"
        ),
        LogLevel::Error => tracing::error!(
            target: "audit",
            event = %entry.event,
            trace_id = %entry.trace_id,
            data = %entry.data,
            "audit entry appended"
        ),
        _ => tracing::info!(
            target: "audit",
            tag = %entry.level,
            event = %entry.event,
            trace_id = %entry.trace_id,
            "audit entry appended"
        ),
    }

    let index = logs.len();
    logs.push(entry);
    Ok(&logs[index])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_append_keeps_call_order() {
        let mut logs = Vec::new();
        for i in 0..25 {
            append(&mut logs, AuditEvent::new(format!("step.{i}"))).unwrap();
        }
        assert_eq!(logs.len(), 25);
        for (i, entry) in logs.iter().enumerate() {
            assert_eq!(entry.event, format!("step.{i}"));
        }
    }

    #[test]
    fn test_append_leaves_prior_entries_untouched() {
        let mut logs = Vec::new();
        append(&mut logs, AuditEvent::new("a").data(&json!({"n": 1}))).unwrap();
        let first = logs[0].clone();
        append(&mut logs, AuditEvent::new("b")).unwrap();
        assert_eq!(logs[0], first);
    }

    #[test]
    fn test_append_rejects_empty_event() {
        let mut logs = Vec::new();
        let err = append(&mut logs, AuditEvent::new("  ")).unwrap_err();
        assert!(err.is_validation());
        assert!(logs.is_empty());
    }

    #[test]
    fn test_append_accepts_any_payload() {
        let mut logs = Vec::new();
        let entry = append(&mut logs, AuditEvent::new("odd.payload").data(&json!(null))).unwrap();
        assert_eq!(entry.data, json!(null));
    }
}
