//! Records produced by the crawler stages.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::audit::TraceId;

/// Placeholder written where a real embedding vector would go.
pub const EMBEDDING_PLACEHOLDER: &str = "[vector]";
/// Placeholder written where a staged point's vector would go.
pub const VECTOR_PLACEHOLDER: &str = "[embedding]";

/// A batch of listing URLs generated for one crawl.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrawlerBatch {
    pub trace_id: TraceId,
    pub urls: Vec<String>,
}

/// A fetched post as it arrives from the (mock) fetcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub sub: String,
    pub title: String,
    pub body: String,
    pub created_utc: i64,
}

/// A deduplicated post tagged with its embedding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedPost {
    #[serde(flatten)]
    pub post: Post,
    pub embedding: String,
}

/// A post projected to the fields the later stages care about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedPost {
    pub post_id: String,
    pub sub: String,
    pub title: String,
    pub body: String,
}

impl ParsedPost {
    pub fn from_post(post: &Post) -> Self {
        Self {
            post_id: post.id.clone(),
            sub: post.sub.clone(),
            title: post.title.clone(),
            body: post.body.clone(),
        }
    }
}

/// Fields a deep clean may keep.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PostField {
    PostId,
    Sub,
    Title,
    Body,
}

impl PostField {
    /// All fields, in display order.
    pub fn all() -> Vec<PostField> {
        PostField::iter().collect()
    }
}

/// A cleaned post. Fields dropped by the clean are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanPost {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl CleanPost {
    /// Keeps only `fields` from `parsed`, with `body` replacing the parsed body.
    pub fn project(parsed: &ParsedPost, body: String, fields: &[PostField]) -> Self {
        let keep = |field: PostField| fields.contains(&field);
        Self {
            post_id: keep(PostField::PostId).then(|| parsed.post_id.clone()),
            sub: keep(PostField::Sub).then(|| parsed.sub.clone()),
            title: keep(PostField::Title).then(|| parsed.title.clone()),
            body: keep(PostField::Body).then_some(body),
        }
    }
}

/// A document staged for upload to the vector store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedDocument {
    pub doc_id: String,
    pub payload: CleanPost,
    pub vector: String,
}
