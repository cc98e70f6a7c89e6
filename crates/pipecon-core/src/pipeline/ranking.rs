//! Ranking candidates, results, reports and the outbox.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::crawl::{CleanPost, StagedDocument};
use crate::audit::TraceId;

/// Slot a ranking run draws its candidates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CandidateSource {
    CleanPosts,
    QdrantStage,
}

/// One item considered by the ranker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Candidate {
    Staged(StagedDocument),
    Clean(CleanPost),
}

impl Candidate {
    /// Title of the underlying post, or an empty string when it was cleaned away.
    pub fn title(&self) -> &str {
        let post = match self {
            Candidate::Clean(post) => post,
            Candidate::Staged(doc) => &doc.payload,
        };
        post.title.as_deref().unwrap_or("")
    }
}

/// A scored candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankResult {
    pub item: Candidate,
    pub score: f64,
}

/// Output format of a prepared report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReportFormat {
    Txt,
}

/// A report ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub trace_id: TraceId,
    pub title: String,
    pub fmt: ReportFormat,
    pub content: String,
}

impl Report {
    /// Label used when listing reports, e.g. `Ranking report (txt)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.title, self.fmt)
    }
}

/// A message queued for the (mock) channel sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboxMessage {
    pub trace_id: TraceId,
    pub channel: String,
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::crawl::VECTOR_PLACEHOLDER;

    fn clean(title: Option<&str>) -> CleanPost {
        CleanPost {
            post_id: Some("p1".to_string()),
            title: title.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_candidate_title() {
        assert_eq!(Candidate::Clean(clean(Some("AI discussion 1"))).title(), "AI discussion 1");
        assert_eq!(Candidate::Clean(clean(None)).title(), "");

        let staged = StagedDocument {
            doc_id: "d1".to_string(),
            payload: clean(Some("AI discussion 2")),
            vector: VECTOR_PLACEHOLDER.to_string(),
        };
        assert_eq!(Candidate::Staged(staged).title(), "AI discussion 2");
    }

    #[test]
    fn test_untagged_candidate_round_trips_staged_shape() {
        let staged = Candidate::Staged(StagedDocument {
            doc_id: "d4".to_string(),
            payload: clean(Some("AI discussion 4")),
            vector: VECTOR_PLACEHOLDER.to_string(),
        });
        let json = serde_json::to_value(&staged).unwrap();
        assert_eq!(json["doc_id"], "d4");
        let back: Candidate = serde_json::from_value(json).unwrap();
        assert_eq!(back, staged);
    }

    #[test]
    fn test_source_names() {
        assert_eq!("clean_posts".parse::<CandidateSource>().unwrap(), CandidateSource::CleanPosts);
        assert_eq!(CandidateSource::QdrantStage.to_string(), "qdrant_stage");
    }
}
