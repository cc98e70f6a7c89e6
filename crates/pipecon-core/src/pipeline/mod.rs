//! Typed records held in the session's list slots.
//!
//! Each slot element is an explicit struct so that shape mistakes surface at
//! compile time instead of as silently accepted maps.

mod crawl;
mod evaluation;
mod ranking;

pub use crawl::{
    CleanPost, CrawlerBatch, EMBEDDING_PLACEHOLDER, EmbeddedPost, ParsedPost, Post, PostField,
    StagedDocument, VECTOR_PLACEHOLDER,
};
pub use evaluation::{ContextTemplate, CriteriaSchema};
pub use ranking::{Candidate, CandidateSource, OutboxMessage, RankResult, Report, ReportFormat};
