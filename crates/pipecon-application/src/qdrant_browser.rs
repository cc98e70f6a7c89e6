//! Qdrant browser page: connection settings and a mock search over staged
//! documents.

use pipecon_core::pipeline::StagedDocument;
use pipecon_core::validation::parse_bounded;
use pipecon_core::{Result, SessionState};

/// Allowed search `top_k`.
pub const SEARCH_TOP_K_RANGE: std::ops::RangeInclusive<usize> = 1..=50;

/// Input of the connection form.
#[derive(Debug, Clone)]
pub struct ConnectionForm {
    pub host: String,
    pub port: String,
    pub collection: String,
}

impl ConnectionForm {
    pub fn from_state(state: &SessionState) -> Self {
        let settings = state.settings();
        Self {
            host: settings.qdrant_host,
            port: settings.qdrant_port.to_string(),
            collection: settings.qdrant_collection,
        }
    }
}

/// Writes the connection fields into settings. Not an audited action.
pub fn update_connection(state: &mut SessionState, form: &ConnectionForm) -> Result<()> {
    state.initialize();
    let port = parse_bounded::<u16>("port", &form.port, 1..=u16::MAX)?;

    let settings = state.settings_mut();
    settings.qdrant_host = form.host.trim().to_string();
    settings.qdrant_port = port;
    settings.qdrant_collection = form.collection.trim().to_string();
    Ok(())
}

/// Input of the search form.
#[derive(Debug, Clone)]
pub struct SearchForm {
    pub query: String,
    pub top_k: String,
}

impl Default for SearchForm {
    fn default() -> Self {
        Self {
            query: String::new(),
            top_k: "5".to_string(),
        }
    }
}

/// Returns the first `top_k` staged documents and keeps them as the last
/// search results. The query text is not used by the mock.
pub fn search(state: &mut SessionState, form: &SearchForm) -> Result<Vec<StagedDocument>> {
    state.initialize();
    let top_k = parse_bounded("top_k", &form.top_k, SEARCH_TOP_K_RANGE)?;

    let results: Vec<StagedDocument> = state.qdrant_stage().iter().take(top_k).cloned().collect();
    tracing::debug!(target: "qdrant", query = %form.query, top_k, hits = results.len(), "Mock search");
    state.set_qdrant_results(results.clone());
    Ok(results)
}
