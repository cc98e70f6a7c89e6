//! Endpoint, model and credential settings held in a session.
//!
//! Settings live only in the session's `settings` slot. API keys entered by a
//! user are never persisted and never logged in clear; use
//! [`Settings::redacted`] when a payload leaves the slot.

use serde::{Deserialize, Serialize};

pub const DEFAULT_QDRANT_HOST: &str = "http://qdrant:6333";
pub const DEFAULT_QDRANT_PORT: u16 = 6333;
pub const DEFAULT_QDRANT_COLLECTION: &str = "ai-comments";
pub const DEFAULT_EMBEDDING_MODEL: &str = "intfloat/e5-base-v2";
pub const DEFAULT_RERANKER_MODEL: &str = "cohere/rerank-v3.5";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

const REDACTED: &str = "***";

/// API credentials for the (mocked) model providers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeys {
    pub cohere: String,
    pub gemini: String,
    pub huggingface: String,
}

impl ApiKeys {
    /// Returns a copy where every non-empty key is replaced by a mask.
    pub fn redacted(&self) -> Self {
        fn mask(value: &str) -> String {
            if value.is_empty() {
                String::new()
            } else {
                REDACTED.to_string()
            }
        }

        Self {
            cohere: mask(&self.cohere),
            gemini: mask(&self.gemini),
            huggingface: mask(&self.huggingface),
        }
    }
}

/// The `settings` slot record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub qdrant_host: String,
    pub qdrant_port: u16,
    pub qdrant_collection: String,
    pub embedding_model: String,
    pub reranker_model: String,
    pub gemini_model: String,
    pub telegram_channel: String,
    pub api_keys: ApiKeys,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            qdrant_host: DEFAULT_QDRANT_HOST.to_string(),
            qdrant_port: DEFAULT_QDRANT_PORT,
            qdrant_collection: DEFAULT_QDRANT_COLLECTION.to_string(),
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            reranker_model: DEFAULT_RERANKER_MODEL.to_string(),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            telegram_channel: String::new(),
            api_keys: ApiKeys::default(),
        }
    }
}

impl Settings {
    /// Returns a copy safe to put into an audit payload.
    pub fn redacted(&self) -> Self {
        Self {
            api_keys: self.api_keys.redacted(),
            ..self.clone()
        }
    }
}
