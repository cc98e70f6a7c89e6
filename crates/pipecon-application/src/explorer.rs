//! Data explorer page: inspect and filter the intermediate datasets.

use serde_json::Value;

use pipecon_core::validation::parse_bounded;
use pipecon_core::{PipeconError, Result, SessionState, SlotName};

/// Slots the explorer can read from.
pub const SOURCES: [SlotName; 6] = [
    SlotName::RawPosts,
    SlotName::ExtractedAiDiscussions,
    SlotName::DeduplicatedPosts,
    SlotName::ParsedPosts,
    SlotName::CleanPosts,
    SlotName::QdrantStage,
];

/// Allowed view size.
pub const VIEW_LIMIT_RANGE: std::ops::RangeInclusive<usize> = 1..=1000;

/// Input of the filter form.
#[derive(Debug, Clone)]
pub struct ExplorerForm {
    pub source: SlotName,
    /// Case-insensitive substring; empty matches everything.
    pub keyword: String,
    pub limit: String,
}

impl Default for ExplorerForm {
    fn default() -> Self {
        Self {
            source: SlotName::RawPosts,
            keyword: String::new(),
            limit: "50".to_string(),
        }
    }
}

fn check_source(source: SlotName) -> Result<()> {
    if SOURCES.contains(&source) {
        Ok(())
    } else {
        Err(PipeconError::not_found("explorer source", source.to_string()))
    }
}

/// Records of an explorer source, unfiltered.
pub fn dataset(state: &mut SessionState, source: SlotName) -> Result<Vec<Value>> {
    state.initialize();
    check_source(source)?;
    state.slot_records(source)
}

/// Filters a source by keyword and keeps the first `limit` matches as the
/// explorer view.
pub fn apply(state: &mut SessionState, form: &ExplorerForm) -> Result<Vec<Value>> {
    state.initialize();
    check_source(form.source)?;
    let limit = parse_bounded("limit", &form.limit, VIEW_LIMIT_RANGE)?;

    let needle = form.keyword.to_lowercase();
    let view: Vec<Value> = state
        .slot_records(form.source)?
        .into_iter()
        .filter(|record| record.is_object())
        .filter(|record| record.to_string().to_lowercase().contains(&needle))
        .take(limit)
        .collect();
    state.set_explorer_view(view.clone());
    Ok(view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::mock_posts;

    #[test]
    fn test_apply_filters_and_limits() {
        let mut state = SessionState::initialized();
        state.set_raw_posts(mock_posts());

        let form = ExplorerForm {
            keyword: "discussion 1".to_string(),
            limit: "5".to_string(),
            ..ExplorerForm::default()
        };
        let view = apply(&mut state, &form).unwrap();
        // "discussion 1", "discussion 10".."discussion 13" in slot order.
        let ids: Vec<&str> = view.iter().map(|v| v["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["p1", "p10", "p11", "p12", "p13"]);
        assert_eq!(state.explorer_view().len(), 5);
    }

    #[test]
    fn test_keyword_is_case_insensitive() {
        let mut state = SessionState::initialized();
        state.set_raw_posts(mock_posts());
        let form = ExplorerForm {
            keyword: "MACHINELEARNING".to_string(),
            ..ExplorerForm::default()
        };
        assert_eq!(apply(&mut state, &form).unwrap().len(), 20);
    }

    #[test]
    fn test_rejects_non_dataset_slot() {
        let mut state = SessionState::initialized();
        let form = ExplorerForm {
            source: SlotName::Logs,
            ..ExplorerForm::default()
        };
        assert!(apply(&mut state, &form).unwrap_err().is_not_found());
        assert!(dataset(&mut state, SlotName::Settings).unwrap_err().is_not_found());
    }

    #[test]
    fn test_rejects_bad_limit() {
        let mut state = SessionState::initialized();
        let form = ExplorerForm {
            limit: "1001".to_string(),
            ..ExplorerForm::default()
        };
        assert!(apply(&mut state, &form).unwrap_err().is_validation());
    }
}
