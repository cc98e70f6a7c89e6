//! Logs & traceability page.

use pipecon_core::audit::{AuditEntry, LogFilter, TraceId, filter_logs};
use pipecon_core::SessionState;

/// Entries matching `filter`, oldest first.
pub fn view(state: &mut SessionState, filter: &LogFilter) -> Vec<AuditEntry> {
    state.initialize();
    filter_logs(state.logs(), filter).into_iter().cloned().collect()
}

/// Every entry recorded under `trace_id`, oldest first.
pub fn trace(state: &mut SessionState, trace_id: &TraceId) -> Vec<AuditEntry> {
    state.initialize();
    state
        .logs()
        .iter()
        .filter(|entry| &entry.trace_id == trace_id)
        .cloned()
        .collect()
}
