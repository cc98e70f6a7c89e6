//! Slot names of the session state store.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

/// Name of one entry in the session state store.
///
/// The string form of each variant is the slot's key.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SlotName {
    Settings,
    CrawlerBatches,
    RawPosts,
    ExtractedAiDiscussions,
    DeduplicatedPosts,
    ParsedPosts,
    CleanPosts,
    QdrantStage,
    Contexts,
    CriteriaSchemas,
    RankInputs,
    RankResults,
    Reports,
    Outbox,
    Logs,
    LastTraceId,
    // Written on demand by individual pages, never defaulted.
    ExplorerView,
    QdrantResults,
    LastReportTxt,
}

/// Shape of a slot's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    /// The nested settings record.
    Record,
    /// An ordered sequence of records.
    List,
    /// A single string.
    Scalar,
}

impl SlotName {
    pub fn kind(self) -> SlotKind {
        match self {
            SlotName::Settings => SlotKind::Record,
            SlotName::LastTraceId | SlotName::LastReportTxt => SlotKind::Scalar,
            _ => SlotKind::List,
        }
    }

    /// Whether `initialize` gives this slot a default.
    pub fn is_defaulted(self) -> bool {
        !matches!(
            self,
            SlotName::ExplorerView | SlotName::QdrantResults | SlotName::LastReportTxt
        )
    }

    /// The slots `initialize` fills in, in declaration order.
    pub fn defaulted() -> impl Iterator<Item = SlotName> {
        SlotName::iter().filter(|slot| slot.is_defaulted())
    }

    /// Every known slot.
    pub fn all() -> impl Iterator<Item = SlotName> {
        SlotName::iter()
    }
}
