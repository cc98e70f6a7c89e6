//! Embeddings & reranker page.

use serde::Serialize;

use pipecon_core::audit::AuditEvent;
use pipecon_core::validation::parse_bounded;
use pipecon_core::{Result, SessionState};

/// Allowed embedding dimensions (informational only).
pub const DIMENSION_RANGE: std::ops::RangeInclusive<u32> = 128..=4096;
/// Allowed reranker `top_k`.
pub const RERANK_TOP_K_RANGE: std::ops::RangeInclusive<u32> = 1..=100;

/// Input of the model configuration form.
#[derive(Debug, Clone)]
pub struct ModelConfigForm {
    pub embedding_model: String,
    pub dimension: String,
    pub reranker_model: String,
    pub top_k: String,
}

impl ModelConfigForm {
    /// A form prefilled from the session's current settings.
    pub fn from_state(state: &SessionState) -> Self {
        let settings = state.settings();
        Self {
            embedding_model: settings.embedding_model,
            dimension: "384".to_string(),
            reranker_model: settings.reranker_model,
            top_k: "20".to_string(),
        }
    }
}

/// The validated configuration that was saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelConfig {
    pub embedding_model: String,
    pub dimension: u32,
    pub reranker_model: String,
    pub top_k: u32,
}

/// Writes both model names into settings and logs the configuration.
pub fn save_config(state: &mut SessionState, form: &ModelConfigForm) -> Result<ModelConfig> {
    state.initialize();
    let config = ModelConfig {
        embedding_model: form.embedding_model.trim().to_string(),
        dimension: parse_bounded("dimension", &form.dimension, DIMENSION_RANGE)?,
        reranker_model: form.reranker_model.trim().to_string(),
        top_k: parse_bounded("top_k", &form.top_k, RERANK_TOP_K_RANGE)?,
    };

    let settings = state.settings_mut();
    settings.embedding_model = config.embedding_model.clone();
    settings.reranker_model = config.reranker_model.clone();
    state.log_event(AuditEvent::new("models.config_saved").data(&config))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_prefills_from_settings() {
        let state = SessionState::initialized();
        let form = ModelConfigForm::from_state(&state);
        assert_eq!(form.embedding_model, "intfloat/e5-base-v2");
        assert_eq!(form.reranker_model, "cohere/rerank-v3.5");
    }

    #[test]
    fn test_save_config_updates_settings() {
        let mut state = SessionState::initialized();
        let form = ModelConfigForm {
            embedding_model: "BAAI/bge-small-en".to_string(),
            ..ModelConfigForm::from_state(&state)
        };
        let config = save_config(&mut state, &form).unwrap();

        assert_eq!(config.dimension, 384);
        assert_eq!(state.settings().embedding_model, "BAAI/bge-small-en");
        let entry = &state.logs()[0];
        assert_eq!(entry.event, "models.config_saved");
        assert_eq!(entry.trace_id.prefix(), "evt");
        assert_eq!(entry.data["top_k"], 20);
    }

    #[test]
    fn test_save_config_rejects_bad_dimension() {
        let mut state = SessionState::initialized();
        let form = ModelConfigForm {
            embedding_model: "other".to_string(),
            dimension: "64".to_string(),
            ..ModelConfigForm::from_state(&state)
        };
        assert!(save_config(&mut state, &form).unwrap_err().is_validation());
        assert_eq!(state.settings().embedding_model, "intfloat/e5-base-v2");
        assert!(state.logs().is_empty());
    }
}
