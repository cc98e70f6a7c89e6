//! Overview page: headline metrics and the quick "new crawl batch" action.

use serde::Serialize;

use pipecon_core::audit::TraceId;
use pipecon_core::SessionState;

/// Counts shown on the overview page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub crawler_batches: usize,
    pub posts_parsed: usize,
    pub vectors_staged: usize,
    pub reports_generated: usize,
}

pub fn metrics(state: &mut SessionState) -> Metrics {
    state.initialize();
    Metrics {
        crawler_batches: state.crawler_batches().len(),
        posts_parsed: state.parsed_posts().len(),
        vectors_staged: state.qdrant_stage().len(),
        reports_generated: state.reports().len(),
    }
}

/// Starts a new crawl by minting a `crawl` trace id as the session's last
/// trace id. No slot other than `last_trace_id` changes and nothing is logged.
pub fn new_crawl_batch(state: &mut SessionState) -> TraceId {
    state.initialize();
    let trace_id = TraceId::generate("crawl");
    state.set_last_trace_id(&trace_id);
    trace_id
}
