//! The per-session state store.

use serde::Serialize;
use serde_json::Value;

use super::slot::{SlotKind, SlotName};
use crate::audit::{self, AuditEntry, AuditEvent, TraceId};
use crate::error::{PipeconError, Result};
use crate::pipeline::{
    Candidate, CleanPost, ContextTemplate, CrawlerBatch, CriteriaSchema, EmbeddedPost,
    OutboxMessage, ParsedPost, Post, RankResult, Report, StagedDocument,
};
use crate::settings::Settings;

/// Typed accessors for a list slot: a read view that falls back to an empty
/// slice, a mutable view that defaults the slot first, and a setter.
macro_rules! list_slot {
    ($field:ident, $field_mut:ident, $set:ident, $ty:ty) => {
        pub fn $field(&self) -> &[$ty] {
            self.$field.as_deref().unwrap_or(&[])
        }

        pub fn $field_mut(&mut self) -> &mut Vec<$ty> {
            self.$field.get_or_insert_with(Vec::new)
        }

        pub fn $set(&mut self, value: Vec<$ty>) {
            self.$field = Some(value);
        }
    };
}

/// Named, typed slots owned by one session.
///
/// A slot is `None` until it is defaulted by [`SessionState::initialize`] or
/// written by a setter. Readers never observe `None`: every accessor falls
/// back to the slot's empty value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionState {
    #[serde(skip_serializing_if = "Option::is_none")]
    settings: Option<Settings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    crawler_batches: Option<Vec<CrawlerBatch>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw_posts: Option<Vec<Post>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    extracted_ai_discussions: Option<Vec<Post>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    deduplicated_posts: Option<Vec<EmbeddedPost>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parsed_posts: Option<Vec<ParsedPost>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    clean_posts: Option<Vec<CleanPost>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    qdrant_stage: Option<Vec<StagedDocument>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    contexts: Option<Vec<ContextTemplate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    criteria_schemas: Option<Vec<CriteriaSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rank_inputs: Option<Vec<Candidate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rank_results: Option<Vec<RankResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    reports: Option<Vec<Report>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    outbox: Option<Vec<OutboxMessage>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    logs: Option<Vec<AuditEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    explorer_view: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    qdrant_results: Option<Vec<StagedDocument>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_report_txt: Option<String>,
}

/// Fills every absent defaulted slot and leaves present ones untouched.
///
/// Applying it twice yields the same store as applying it once.
pub fn complete_slots(mut state: SessionState) -> SessionState {
    state.settings.get_or_insert_with(Settings::default);
    state.crawler_batches.get_or_insert_with(Vec::new);
    state.raw_posts.get_or_insert_with(Vec::new);
    state.extracted_ai_discussions.get_or_insert_with(Vec::new);
    state.deduplicated_posts.get_or_insert_with(Vec::new);
    state.parsed_posts.get_or_insert_with(Vec::new);
    state.clean_posts.get_or_insert_with(Vec::new);
    state.qdrant_stage.get_or_insert_with(Vec::new);
    state.contexts.get_or_insert_with(Vec::new);
    state.criteria_schemas.get_or_insert_with(Vec::new);
    state.rank_inputs.get_or_insert_with(Vec::new);
    state.rank_results.get_or_insert_with(Vec::new);
    state.reports.get_or_insert_with(Vec::new);
    state.outbox.get_or_insert_with(Vec::new);
    state.logs.get_or_insert_with(Vec::new);
    state.last_trace_id.get_or_insert_with(String::new);
    state
}

impl SessionState {
    /// An empty store with no slot present.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store with every defaulted slot present.
    pub fn initialized() -> Self {
        complete_slots(Self::default())
    }

    /// Defaults every absent slot. Safe to call before every action.
    pub fn initialize(&mut self) {
        *self = complete_slots(std::mem::take(self));
    }

    pub fn is_present(&self, slot: SlotName) -> bool {
        match slot {
            SlotName::Settings => self.settings.is_some(),
            SlotName::CrawlerBatches => self.crawler_batches.is_some(),
            SlotName::RawPosts => self.raw_posts.is_some(),
            SlotName::ExtractedAiDiscussions => self.extracted_ai_discussions.is_some(),
            SlotName::DeduplicatedPosts => self.deduplicated_posts.is_some(),
            SlotName::ParsedPosts => self.parsed_posts.is_some(),
            SlotName::CleanPosts => self.clean_posts.is_some(),
            SlotName::QdrantStage => self.qdrant_stage.is_some(),
            SlotName::Contexts => self.contexts.is_some(),
            SlotName::CriteriaSchemas => self.criteria_schemas.is_some(),
            SlotName::RankInputs => self.rank_inputs.is_some(),
            SlotName::RankResults => self.rank_results.is_some(),
            SlotName::Reports => self.reports.is_some(),
            SlotName::Outbox => self.outbox.is_some(),
            SlotName::Logs => self.logs.is_some(),
            SlotName::LastTraceId => self.last_trace_id.is_some(),
            SlotName::ExplorerView => self.explorer_view.is_some(),
            SlotName::QdrantResults => self.qdrant_results.is_some(),
            SlotName::LastReportTxt => self.last_report_txt.is_some(),
        }
    }

    /// Names of the slots currently present.
    pub fn present_slots(&self) -> Vec<SlotName> {
        SlotName::all().filter(|slot| self.is_present(*slot)).collect()
    }

    /// A slot's current value as JSON, or its empty value when absent.
    pub fn slot_json(&self, slot: SlotName) -> Result<Value> {
        let value = match slot {
            SlotName::Settings => serde_json::to_value(self.settings())?,
            SlotName::CrawlerBatches => serde_json::to_value(self.crawler_batches())?,
            SlotName::RawPosts => serde_json::to_value(self.raw_posts())?,
            SlotName::ExtractedAiDiscussions => {
                serde_json::to_value(self.extracted_ai_discussions())?
            }
            SlotName::DeduplicatedPosts => serde_json::to_value(self.deduplicated_posts())?,
            SlotName::ParsedPosts => serde_json::to_value(self.parsed_posts())?,
            SlotName::CleanPosts => serde_json::to_value(self.clean_posts())?,
            SlotName::QdrantStage => serde_json::to_value(self.qdrant_stage())?,
            SlotName::Contexts => serde_json::to_value(self.contexts())?,
            SlotName::CriteriaSchemas => serde_json::to_value(self.criteria_schemas())?,
            SlotName::RankInputs => serde_json::to_value(self.rank_inputs())?,
            SlotName::RankResults => serde_json::to_value(self.rank_results())?,
            SlotName::Reports => serde_json::to_value(self.reports())?,
            SlotName::Outbox => serde_json::to_value(self.outbox())?,
            SlotName::Logs => serde_json::to_value(self.logs())?,
            SlotName::LastTraceId => Value::String(self.last_trace_id().to_string()),
            SlotName::ExplorerView => Value::Array(self.explorer_view().to_vec()),
            SlotName::QdrantResults => serde_json::to_value(self.qdrant_results())?,
            SlotName::LastReportTxt => Value::String(self.last_report_txt().to_string()),
        };
        Ok(value)
    }

    /// The records of a list slot as JSON values, in slot order.
    pub fn slot_records(&self, slot: SlotName) -> Result<Vec<Value>> {
        if slot.kind() != SlotKind::List {
            return Err(PipeconError::validation(
                "slot",
                format!("'{slot}' does not hold a list of records"),
            ));
        }
        match self.slot_json(slot)? {
            Value::Array(items) => Ok(items),
            _ => Ok(Vec::new()),
        }
    }

    // ============================================================================
    // Settings
    // ============================================================================

    /// Current settings, or the defaults when the slot is absent.
    pub fn settings(&self) -> Settings {
        self.settings.clone().unwrap_or_default()
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        self.settings.get_or_insert_with(Settings::default)
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = Some(settings);
    }

    // ============================================================================
    // List slots
    // ============================================================================

    list_slot!(crawler_batches, crawler_batches_mut, set_crawler_batches, CrawlerBatch);
    list_slot!(raw_posts, raw_posts_mut, set_raw_posts, Post);
    list_slot!(
        extracted_ai_discussions,
        extracted_ai_discussions_mut,
        set_extracted_ai_discussions,
        Post
    );
    list_slot!(
        deduplicated_posts,
        deduplicated_posts_mut,
        set_deduplicated_posts,
        EmbeddedPost
    );
    list_slot!(parsed_posts, parsed_posts_mut, set_parsed_posts, ParsedPost);
    list_slot!(clean_posts, clean_posts_mut, set_clean_posts, CleanPost);
    list_slot!(qdrant_stage, qdrant_stage_mut, set_qdrant_stage, StagedDocument);
    list_slot!(contexts, contexts_mut, set_contexts, ContextTemplate);
    list_slot!(
        criteria_schemas,
        criteria_schemas_mut,
        set_criteria_schemas,
        CriteriaSchema
    );
    list_slot!(rank_inputs, rank_inputs_mut, set_rank_inputs, Candidate);
    list_slot!(rank_results, rank_results_mut, set_rank_results, RankResult);
    list_slot!(reports, reports_mut, set_reports, Report);
    list_slot!(outbox, outbox_mut, set_outbox, OutboxMessage);
    list_slot!(explorer_view, explorer_view_mut, set_explorer_view, Value);
    list_slot!(qdrant_results, qdrant_results_mut, set_qdrant_results, StagedDocument);

    // ============================================================================
    // Scalars
    // ============================================================================

    pub fn last_trace_id(&self) -> &str {
        self.last_trace_id.as_deref().unwrap_or("")
    }

    pub fn set_last_trace_id(&mut self, trace_id: &TraceId) {
        self.last_trace_id = Some(trace_id.to_string());
    }

    pub fn last_report_txt(&self) -> &str {
        self.last_report_txt.as_deref().unwrap_or("")
    }

    pub fn set_last_report_txt(&mut self, text: String) {
        self.last_report_txt = Some(text);
    }

    // ============================================================================
    // Audit log
    // ============================================================================

    /// The audit log, oldest first. There is no mutable view: entries are
    /// only ever added through [`SessionState::log_event`].
    pub fn logs(&self) -> &[AuditEntry] {
        self.logs.as_deref().unwrap_or(&[])
    }

    /// Appends one audit entry and returns the trace id it was recorded under.
    pub fn log_event(&mut self, event: AuditEvent) -> Result<TraceId> {
        let logs = self.logs.get_or_insert_with(Vec::new);
        let entry = audit::append(logs, event)?;
        Ok(entry.trace_id.clone())
    }
}
