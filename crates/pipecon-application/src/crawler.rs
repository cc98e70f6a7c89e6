//! Crawler pipeline page.
//!
//! Seven mock stages, each reading the previous stage's slot and replacing
//! its own: URL generation, fetch, AI-discussion extraction, deduplication,
//! JSON projection, deep clean and staging for the vector store. Only URL
//! generation appends; every other stage overwrites its slot wholesale.

use serde_json::json;

use pipecon_core::audit::{AuditEvent, TraceId};
use pipecon_core::pipeline::{
    CleanPost, CrawlerBatch, EMBEDDING_PLACEHOLDER, EmbeddedPost, ParsedPost, Post, PostField,
    StagedDocument, VECTOR_PLACEHOLDER,
};
use pipecon_core::validation::{non_blank_lines, parse_bounded};
use pipecon_core::{Outcome, Result, SessionState};

/// Allowed per-subreddit post limit.
pub const POST_LIMIT_RANGE: std::ops::RangeInclusive<u32> = 10..=500;
/// Number of posts the mock fetcher returns.
pub const MOCK_POST_COUNT: i64 = 20;
/// `created_utc` of mock post zero.
pub const MOCK_CREATED_UTC_BASE: i64 = 1_730_000_000;
/// Bodies shorter than this are dropped by a deep clean.
pub const MIN_BODY_CHARS: usize = 20;

const NO_BATCH: &str = "No URL batch. Generate URLs first.";

/// Input of the "Build Reddit URLs" form.
#[derive(Debug, Clone)]
pub struct UrlForm {
    /// One subreddit per line.
    pub subreddits: String,
    /// Per-subreddit post limit, as typed.
    pub limit: String,
}

impl Default for UrlForm {
    fn default() -> Self {
        Self {
            subreddits: "MachineLearning\nLocalLlama\nArtificialInteligence".to_string(),
            limit: "100".to_string(),
        }
    }
}

/// Builds one listing URL per non-blank subreddit line and appends the batch.
pub fn generate_urls(state: &mut SessionState, form: &UrlForm) -> Result<CrawlerBatch> {
    state.initialize();
    let limit = parse_bounded("limit", &form.limit, POST_LIMIT_RANGE)?;

    let trace_id = TraceId::generate("crawler");
    let urls = non_blank_lines(&form.subreddits)
        .iter()
        .map(|sub| format!("https://www.reddit.com/r/{}/new.json?limit={limit}", sub.trim()))
        .collect();
    let batch = CrawlerBatch { trace_id, urls };

    state.crawler_batches_mut().push(batch.clone());
    state.log_event(
        AuditEvent::new("crawler.urls_generated")
            .data(&batch)
            .trace_id(batch.trace_id.clone()),
    )?;
    tracing::info!(target: "crawler", trace_id = %batch.trace_id, urls = batch.urls.len(), "Generated URLs");
    Ok(batch)
}

/// The fixed posts returned by the mock fetcher.
pub fn mock_posts() -> Vec<Post> {
    (1..=MOCK_POST_COUNT)
        .map(|i| Post {
            id: format!("p{i}"),
            sub: "MachineLearning".to_string(),
            title: format!("AI discussion {i}"),
            body: "Content...".to_string(),
            created_utc: MOCK_CREATED_UTC_BASE + i,
        })
        .collect()
}

/// Replaces `raw_posts` with the mock fetch result for the latest batch.
///
/// Skipped, without touching any slot or the log, when no batch exists.
pub fn fetch_posts(state: &mut SessionState) -> Result<Outcome<usize>> {
    state.initialize();
    let Some(batch) = state.crawler_batches().last() else {
        return Ok(Outcome::skipped(NO_BATCH));
    };
    let trace_id = batch.trace_id.clone();

    let posts = mock_posts();
    let count = posts.len();
    state.set_raw_posts(posts);
    state.log_event(
        AuditEvent::new("crawler.posts_fetched")
            .data(&json!({ "count": count }))
            .trace_id(trace_id),
    )?;
    Ok(Outcome::Completed(count))
}

/// Keeps raw posts whose title mentions AI.
pub fn extract_ai(state: &mut SessionState) -> Result<usize> {
    state.initialize();
    let extracted: Vec<Post> = state
        .raw_posts()
        .iter()
        .filter(|post| post.title.contains("AI"))
        .cloned()
        .collect();
    let count = extracted.len();
    state.set_extracted_ai_discussions(extracted);
    state.log_event(AuditEvent::new("crawler.extracted_ai").data(&json!({ "count": count })))?;
    Ok(count)
}

/// Keeps the first post for each distinct title and tags it with an embedding.
pub fn deduplicate(state: &mut SessionState) -> Result<usize> {
    state.initialize();
    let mut seen = std::collections::HashSet::new();
    let deduplicated: Vec<EmbeddedPost> = state
        .extracted_ai_discussions()
        .iter()
        .filter(|post| seen.insert(post.title.clone()))
        .map(|post| EmbeddedPost {
            post: post.clone(),
            embedding: EMBEDDING_PLACEHOLDER.to_string(),
        })
        .collect();
    let count = deduplicated.len();
    state.set_deduplicated_posts(deduplicated);
    state.log_event(AuditEvent::new("crawler.deduplicated").data(&json!({ "count": count })))?;
    Ok(count)
}

/// Projects deduplicated posts to their id/sub/title/body.
pub fn parse_json(state: &mut SessionState) -> Result<usize> {
    state.initialize();
    let parsed: Vec<ParsedPost> = state
        .deduplicated_posts()
        .iter()
        .map(|embedded| ParsedPost::from_post(&embedded.post))
        .collect();
    let count = parsed.len();
    state.set_parsed_posts(parsed);
    state.log_event(AuditEvent::new("crawler.parsed_json").data(&json!({ "count": count })))?;
    Ok(count)
}

/// Options of the deep-clean form.
#[derive(Debug, Clone)]
pub struct DeepCleanOptions {
    /// Drop posts whose body is shorter than [`MIN_BODY_CHARS`].
    pub remove_short: bool,
    /// Lowercase bodies.
    pub lowercase: bool,
    pub keep_fields: Vec<PostField>,
}

impl Default for DeepCleanOptions {
    fn default() -> Self {
        Self {
            remove_short: true,
            lowercase: true,
            keep_fields: PostField::all(),
        }
    }
}

/// Cleans parsed posts into `clean_posts`.
pub fn deep_clean(state: &mut SessionState, options: &DeepCleanOptions) -> Result<usize> {
    state.initialize();
    let cleaned: Vec<CleanPost> = state
        .parsed_posts()
        .iter()
        .filter_map(|parsed| {
            let body = if options.lowercase {
                parsed.body.to_lowercase()
            } else {
                parsed.body.clone()
            };
            if options.remove_short && body.chars().count() < MIN_BODY_CHARS {
                return None;
            }
            Some(CleanPost::project(parsed, body, &options.keep_fields))
        })
        .collect();
    let count = cleaned.len();
    state.set_clean_posts(cleaned);
    state.log_event(AuditEvent::new("crawler.deep_cleaned").data(&json!({ "count": count })))?;
    Ok(count)
}

/// Stages every clean post as a document `d1..dn`.
pub fn stage_documents(state: &mut SessionState) -> Result<usize> {
    state.initialize();
    let staged: Vec<StagedDocument> = state
        .clean_posts()
        .iter()
        .enumerate()
        .map(|(index, post)| StagedDocument {
            doc_id: format!("d{}", index + 1),
            payload: post.clone(),
            vector: VECTOR_PLACEHOLDER.to_string(),
        })
        .collect();
    let count = staged.len();
    state.set_qdrant_stage(staged);
    state.log_event(AuditEvent::new("crawler.qdrant_staged").data(&json!({ "count": count })))?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(id: &str, title: &str, body: &str) -> ParsedPost {
        ParsedPost {
            post_id: id.to_string(),
            sub: "MachineLearning".to_string(),
            title: title.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_generate_urls() {
        let mut state = SessionState::new();
        let form = UrlForm {
            subreddits: "MachineLearning\n\n  LocalLlama  \n".to_string(),
            limit: "50".to_string(),
        };
        let batch = generate_urls(&mut state, &form).unwrap();

        assert_eq!(
            batch.urls,
            vec![
                "https://www.reddit.com/r/MachineLearning/new.json?limit=50",
                "https://www.reddit.com/r/LocalLlama/new.json?limit=50",
            ]
        );
        assert_eq!(batch.trace_id.prefix(), "crawler");
        assert_eq!(state.crawler_batches(), &[batch.clone()]);

        let entry = &state.logs()[0];
        assert_eq!(entry.event, "crawler.urls_generated");
        assert_eq!(entry.trace_id, batch.trace_id);
        assert_eq!(entry.data["urls"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_generate_urls_rejects_bad_limit() {
        let mut state = SessionState::initialized();
        for limit in ["5", "501", "lots"] {
            let form = UrlForm {
                limit: limit.to_string(),
                ..UrlForm::default()
            };
            assert!(generate_urls(&mut state, &form).unwrap_err().is_validation());
        }
        assert!(state.crawler_batches().is_empty());
        assert!(state.logs().is_empty());
    }

    #[test]
    fn test_fetch_without_batch_is_noop() {
        let mut state = SessionState::initialized();
        let outcome = fetch_posts(&mut state).unwrap();
        assert!(outcome.is_skipped());
        assert!(state.raw_posts().is_empty());
        assert!(state.logs().is_empty());
    }

    #[test]
    fn test_fetch_uses_latest_batch_trace() {
        let mut state = SessionState::new();
        generate_urls(&mut state, &UrlForm::default()).unwrap();
        let latest = generate_urls(&mut state, &UrlForm::default()).unwrap();

        assert_eq!(fetch_posts(&mut state).unwrap(), Outcome::Completed(20));
        assert_eq!(state.raw_posts().len(), 20);
        assert_eq!(state.raw_posts()[0].id, "p1");
        assert_eq!(state.raw_posts()[19].created_utc, 1_730_000_020);

        let entry = state.logs().last().unwrap();
        assert_eq!(entry.event, "crawler.posts_fetched");
        assert_eq!(entry.trace_id, latest.trace_id);
        assert_eq!(entry.data, json!({"count": 20}));
    }

    #[test]
    fn test_extract_and_deduplicate() {
        let mut state = SessionState::initialized();
        let mut posts = mock_posts();
        posts[1].title = "Weekly thread".to_string();
        posts[2].title = posts[0].title.clone();
        state.set_raw_posts(posts);

        assert_eq!(extract_ai(&mut state).unwrap(), 19);
        assert_eq!(deduplicate(&mut state).unwrap(), 18);

        let dedup = state.deduplicated_posts();
        assert_eq!(dedup[0].post.id, "p1");
        // p3 repeats p1's title and is dropped; order is otherwise preserved.
        assert_eq!(dedup[1].post.id, "p4");
        assert!(dedup.iter().all(|p| p.embedding == "[vector]"));
    }

    #[test]
    fn test_deep_clean_defaults_drop_mock_bodies() {
        let mut state = SessionState::initialized();
        state.set_parsed_posts(vec![parsed("p1", "AI discussion 1", "Content...")]);
        assert_eq!(deep_clean(&mut state, &DeepCleanOptions::default()).unwrap(), 0);
        assert!(state.clean_posts().is_empty());

        let entry = state.logs().last().unwrap();
        assert_eq!(entry.event, "crawler.deep_cleaned");
        assert_eq!(entry.data, json!({ "count": 0 }));
    }

    #[test]
    fn test_deep_clean_lowercases_and_projects() {
        let mut state = SessionState::initialized();
        state.set_parsed_posts(vec![
            parsed("p1", "AI discussion 1", "A Long Body About Transformers"),
            parsed("p2", "AI discussion 2", "Short"),
        ]);
        let options = DeepCleanOptions {
            keep_fields: vec![PostField::PostId, PostField::Body],
            ..DeepCleanOptions::default()
        };
        assert_eq!(deep_clean(&mut state, &options).unwrap(), 1);

        let clean = &state.clean_posts()[0];
        assert_eq!(clean.post_id.as_deref(), Some("p1"));
        assert_eq!(clean.title, None);
        assert_eq!(clean.body.as_deref(), Some("a long body about transformers"));
    }

    #[test]
    fn test_deep_clean_without_filters_keeps_everything() {
        let mut state = SessionState::initialized();
        state.set_parsed_posts(vec![parsed("p1", "AI discussion 1", "Content...")]);
        let options = DeepCleanOptions {
            remove_short: false,
            lowercase: false,
            keep_fields: PostField::all(),
        };
        deep_clean(&mut state, &options).unwrap();
        assert_eq!(state.clean_posts()[0].body.as_deref(), Some("Content..."));
    }

    #[test]
    fn test_stage_documents_numbers_from_one() {
        let mut state = SessionState::initialized();
        state.set_clean_posts(vec![CleanPost::default(), CleanPost::default()]);
        assert_eq!(stage_documents(&mut state).unwrap(), 2);
        let ids: Vec<&str> = state.qdrant_stage().iter().map(|d| d.doc_id.as_str()).collect();
        assert_eq!(ids, vec!["d1", "d2"]);
        assert_eq!(state.logs().last().unwrap().event, "crawler.qdrant_staged");
    }
}
