//! Ranking agent page.
//!
//! Candidates are loaded from the clean posts or the staged documents, scored
//! with a fixed mock curve and exported as a plain-text report.

use serde_json::json;

use pipecon_core::audit::{AuditEvent, TraceId};
use pipecon_core::pipeline::{Candidate, CandidateSource, RankResult, Report, ReportFormat};
use pipecon_core::validation::parse_bounded;
use pipecon_core::{Outcome, Result, SessionState};

/// Allowed number of candidates per run.
pub const CANDIDATE_LIMIT_RANGE: std::ops::RangeInclusive<usize> = 1..=100;

const BASE_SCORE: f64 = 0.5;
const SCORE_STEP: f64 = 0.03;
const PREVIEW_CHARS: usize = 300;

const NO_RESULTS: &str = "No ranking results yet. Run ranking first.";

/// Input of the candidate selection form.
#[derive(Debug, Clone)]
pub struct CandidateForm {
    pub source: CandidateSource,
    /// Candidate limit, as typed.
    pub limit: String,
}

impl Default for CandidateForm {
    fn default() -> Self {
        Self {
            source: CandidateSource::CleanPosts,
            limit: "10".to_string(),
        }
    }
}

/// Copies up to `limit` items from the chosen source into `rank_inputs`.
pub fn load_candidates(state: &mut SessionState, form: &CandidateForm) -> Result<usize> {
    state.initialize();
    let limit = parse_bounded("limit", &form.limit, CANDIDATE_LIMIT_RANGE)?;

    let candidates: Vec<Candidate> = match form.source {
        CandidateSource::CleanPosts => state
            .clean_posts()
            .iter()
            .take(limit)
            .cloned()
            .map(Candidate::Clean)
            .collect(),
        CandidateSource::QdrantStage => state
            .qdrant_stage()
            .iter()
            .take(limit)
            .cloned()
            .map(Candidate::Staged)
            .collect(),
    };
    let count = candidates.len();
    state.set_rank_inputs(candidates);
    tracing::debug!(target: "ranking", source = %form.source, count, "Loaded candidates");
    Ok(count)
}

/// Mock score of the candidate at `index`, rounded to three decimals.
pub fn mock_score(index: usize) -> f64 {
    let raw = BASE_SCORE + index as f64 * SCORE_STEP;
    (raw * 1000.0).round() / 1000.0
}

/// Scores every loaded candidate and stores the results, best first.
pub fn run(state: &mut SessionState, model: &str) -> Result<Vec<RankResult>> {
    state.initialize();
    let trace_id = TraceId::generate("rank");

    let mut results: Vec<RankResult> = state
        .rank_inputs()
        .iter()
        .enumerate()
        .map(|(index, item)| RankResult {
            item: item.clone(),
            score: mock_score(index),
        })
        .collect();
    results.sort_by(|a, b| b.score.total_cmp(&a.score));

    state.set_rank_results(results.clone());
    state.log_event(
        AuditEvent::new("ranking.completed")
            .data(&json!({ "count": results.len(), "model": model }))
            .trace_id(trace_id),
    )?;
    Ok(results)
}

/// Renders ranking results as the plain-text report body.
pub fn report_text(results: &[RankResult]) -> String {
    let lines: Vec<String> = results
        .iter()
        .enumerate()
        .map(|(index, result)| {
            format!(
                "{}. score={:?} | title={}",
                index + 1,
                result.score,
                result.item.title()
            )
        })
        .collect();
    format!("Top candidates:\n{}", lines.join("\n"))
}

/// A short preview of a report, with an ellipsis when truncated.
pub fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let head: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

/// Turns the current ranking results into a text report.
///
/// The text is kept as the session's last report and appended to `reports`
/// so the sender can pick it up.
pub fn prepare_report(state: &mut SessionState) -> Result<Outcome<Report>> {
    state.initialize();
    if state.rank_results().is_empty() {
        return Ok(Outcome::skipped(NO_RESULTS));
    }

    let content = report_text(state.rank_results());
    let report = Report {
        trace_id: TraceId::generate("report"),
        title: format!("Ranking report #{}", state.reports().len() + 1),
        fmt: ReportFormat::Txt,
        content: content.clone(),
    };

    state.set_last_report_txt(content);
    state.reports_mut().push(report.clone());
    state.log_event(
        AuditEvent::new("report.prepared")
            .data(&json!({ "title": report.title, "size": report.content.chars().count() }))
            .trace_id(report.trace_id.clone()),
    )?;
    Ok(Outcome::Completed(report))
}
