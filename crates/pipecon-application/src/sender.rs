//! Document sender page: mock-send a prepared report to the channel.

use serde_json::json;

use pipecon_core::audit::{AuditEvent, TraceId};
use pipecon_core::pipeline::OutboxMessage;
use pipecon_core::{Outcome, PipeconError, Result, SessionState};

const NO_REPORTS: &str = "No reports yet. Prepare a report on the ranking page first.";

/// Sets the channel reports are sent to. Not an audited action.
pub fn set_channel(state: &mut SessionState, channel: &str) {
    state.initialize();
    state.settings_mut().telegram_channel = channel.trim().to_string();
}

/// Labels of the available reports, in slot order.
pub fn report_labels(state: &mut SessionState) -> Vec<String> {
    state.initialize();
    state.reports().iter().map(|report| report.label()).collect()
}

/// Queues report `index` (0-based) into the outbox.
///
/// Skipped when no report exists.
pub fn send(state: &mut SessionState, index: usize) -> Result<Outcome<OutboxMessage>> {
    state.initialize();
    if state.reports().is_empty() {
        return Ok(Outcome::skipped(NO_REPORTS));
    }
    let report = state
        .reports()
        .get(index)
        .cloned()
        .ok_or_else(|| PipeconError::not_found("report", (index + 1).to_string()))?;

    let channel = state.settings().telegram_channel;
    let message = OutboxMessage {
        trace_id: TraceId::generate("send"),
        channel: channel.clone(),
        content: report.content,
    };
    state.outbox_mut().push(message.clone());
    state.log_event(
        AuditEvent::new("report.sent_mock")
            .data(&json!({
                "channel": channel,
                "size": message.content.chars().count(),
            }))
            .trace_id(message.trace_id.clone()),
    )?;
    tracing::info!(target: "sender", trace_id = %message.trace_id, "Queued report for sending (mock)");
    Ok(Outcome::Completed(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipecon_core::pipeline::{Report, ReportFormat};

    fn report(content: &str) -> Report {
        Report {
            trace_id: TraceId::generate("report"),
            title: "Ranking report #1".to_string(),
            fmt: ReportFormat::Txt,
            content: content.to_string(),
        }
    }

    #[test]
    fn test_send_without_reports_is_noop() {
        let mut state = SessionState::initialized();
        assert!(send(&mut state, 0).unwrap().is_skipped());
        assert!(state.outbox().is_empty());
        assert!(state.logs().is_empty());
    }

    #[test]
    fn test_send_queues_message() {
        let mut state = SessionState::initialized();
        state.reports_mut().push(report("Top candidates:"));
        set_channel(&mut state, " @ai_digest ");

        let message = send(&mut state, 0).unwrap().completed().unwrap();
        assert_eq!(message.channel, "@ai_digest");
        assert_eq!(message.trace_id.prefix(), "send");
        assert_eq!(state.outbox(), &[message.clone()]);

        let entry = &state.logs()[0];
        assert_eq!(entry.event, "report.sent_mock");
        assert_eq!(entry.trace_id, message.trace_id);
        assert_eq!(entry.data, json!({"channel": "@ai_digest", "size": 15}));
    }

    #[test]
    fn test_send_unknown_index() {
        let mut state = SessionState::initialized();
        state.reports_mut().push(report("x"));
        assert!(send(&mut state, 3).unwrap_err().is_not_found());
        assert!(state.outbox().is_empty());
    }

    #[test]
    fn test_report_labels() {
        let mut state = SessionState::initialized();
        state.reports_mut().push(report("x"));
        assert_eq!(report_labels(&mut state), vec!["Ranking report #1 (txt)"]);
    }
}
