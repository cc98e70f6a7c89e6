//! Settings page: endpoints, chat model and API keys.
//!
//! Keys entered here stay in the session's settings slot. The audit entry
//! written on save carries a redacted copy.

use pipecon_core::audit::{AuditEvent, TraceId};
use pipecon_core::validation::parse_bounded;
use pipecon_core::{Result, SessionState, Settings};

/// A partial update; `None` fields are left as they are.
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub qdrant_host: Option<String>,
    /// Port, as typed.
    pub qdrant_port: Option<String>,
    pub qdrant_collection: Option<String>,
    pub gemini_model: Option<String>,
    pub cohere_key: Option<String>,
    pub gemini_key: Option<String>,
    pub huggingface_token: Option<String>,
}

/// Applies an update to the session's settings.
///
/// The port is validated first; on error nothing changes.
pub fn update(state: &mut SessionState, update: &SettingsUpdate) -> Result<Settings> {
    state.initialize();
    let port = update
        .qdrant_port
        .as_deref()
        .map(|port| parse_bounded::<u16>("qdrant_port", port, 1..=u16::MAX))
        .transpose()?;

    let settings = state.settings_mut();
    if let Some(host) = &update.qdrant_host {
        settings.qdrant_host = host.trim().to_string();
    }
    if let Some(port) = port {
        settings.qdrant_port = port;
    }
    if let Some(collection) = &update.qdrant_collection {
        settings.qdrant_collection = collection.trim().to_string();
    }
    if let Some(model) = &update.gemini_model {
        settings.gemini_model = model.trim().to_string();
    }
    if let Some(key) = &update.cohere_key {
        settings.api_keys.cohere = key.trim().to_string();
    }
    if let Some(key) = &update.gemini_key {
        settings.api_keys.gemini = key.trim().to_string();
    }
    if let Some(token) = &update.huggingface_token {
        settings.api_keys.huggingface = token.trim().to_string();
    }
    Ok(settings.clone())
}

/// Records the current settings in the audit log, with keys masked.
pub fn save(state: &mut SessionState) -> Result<TraceId> {
    state.initialize();
    let redacted = state.settings().redacted();
    state.log_event(AuditEvent::new("settings.saved").data(&redacted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pipecon_core::TraceId;
    use pipecon_core::pipeline::CrawlerBatch;

    #[test]
    fn test_update_only_touches_given_fields() {
        let mut state = SessionState::initialized();
        let settings = update(
            &mut state,
            &SettingsUpdate {
                qdrant_host: Some("http://vectors:6333".to_string()),
                gemini_key: Some("secret".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(settings.qdrant_host, "http://vectors:6333");
        assert_eq!(settings.qdrant_port, 6333);
        assert_eq!(settings.gemini_model, "gemini-2.5-flash");
        assert_eq!(settings.api_keys.gemini, "secret");
    }

    #[test]
    fn test_update_does_not_reset_other_slots() {
        let mut state = SessionState::initialized();
        state.crawler_batches_mut().push(CrawlerBatch {
            trace_id: TraceId::generate("crawler"),
            urls: vec!["https://www.reddit.com/r/MachineLearning/new.json?limit=100".to_string()],
        });
        let before = state.crawler_batches().to_vec();

        update(
            &mut state,
            &SettingsUpdate {
                qdrant_host: Some("http://other:6333".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(state.crawler_batches(), before.as_slice());
    }

    #[test]
    fn test_update_rejects_bad_port_atomically() {
        let mut state = SessionState::initialized();
        let err = update(
            &mut state,
            &SettingsUpdate {
                qdrant_host: Some("http://elsewhere".to_string()),
                qdrant_port: Some("sixty".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(state.settings().qdrant_host, "http://qdrant:6333");
    }

    #[test]
    fn test_save_masks_keys() {
        let mut state = SessionState::initialized();
        state.settings_mut().api_keys.cohere = "co-123".to_string();

        save(&mut state).unwrap();
        let entry = &state.logs()[0];
        assert_eq!(entry.event, "settings.saved");
        assert_eq!(entry.data["api_keys"]["cohere"], "***");
        assert!(!entry.contains("co-123"));
        // The session still holds the real key.
        assert_eq!(state.settings().api_keys.cohere, "co-123");
    }
}
