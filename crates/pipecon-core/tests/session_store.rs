use pipecon_core::audit::{LogFilter, filter_logs};
use pipecon_core::session::complete_slots;
use pipecon_core::{AuditEvent, LogLevel, SessionState, SlotName, TraceId};

#[test]
fn initialize_is_stable_under_repetition() {
    let mut state = SessionState::new();
    state.settings_mut().telegram_channel = "@digest".to_string();

    let once = complete_slots(state.clone());
    let many = (0..5).fold(state, |s, _| complete_slots(s));
    assert_eq!(once, many);
    assert_eq!(many.settings().telegram_channel, "@digest");
    assert_eq!(many.present_slots().len(), SlotName::defaulted().count());
}

#[test]
fn log_order_survives_filtering() {
    let mut state = SessionState::initialized();
    let levels = [LogLevel::Info, LogLevel::Warn, LogLevel::Info, LogLevel::Error, LogLevel::Warn];
    for (i, level) in levels.iter().enumerate() {
        state
            .log_event(AuditEvent::new(format!("step.{i}")).level(level.clone()))
            .unwrap();
    }

    let warn = filter_logs(state.logs(), &LogFilter::all().level(LogLevel::Warn));
    let names: Vec<&str> = warn.iter().map(|e| e.event.as_str()).collect();
    assert_eq!(names, vec!["step.1", "step.4"]);

    let all = filter_logs(state.logs(), &LogFilter::all());
    assert_eq!(all.len(), 5);
    assert!(all.windows(2).all(|w| w[0].event < w[1].event));
}

#[test]
fn generated_trace_ids_parse_back() {
    for prefix in ["crawler", "ctx", "schema", "rank", "report", "send", "evt"] {
        let id = TraceId::generate(prefix);
        let parsed: TraceId = id.as_str().parse().unwrap();
        assert_eq!(parsed.prefix(), prefix);
        assert_eq!(parsed, id);
    }
}
