//! Level and substring filtering over the audit log.

use super::entry::{AuditEntry, LogLevel};

/// Filter applied when viewing the audit log.
///
/// `level: None` means every level. An empty `contains` matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    pub level: Option<LogLevel>,
    pub contains: Option<String>,
}

impl LogFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = Some(level.normalized());
        self
    }

    pub fn contains(mut self, needle: impl Into<String>) -> Self {
        let needle = needle.into();
        self.contains = (!needle.is_empty()).then_some(needle);
        self
    }

    /// Parses the level selector used by the console, where `ALL` disables
    /// level filtering.
    pub fn with_level_selector(self, selector: &str) -> Self {
        if selector.trim().is_empty() || selector.trim().eq_ignore_ascii_case("all") {
            Self {
                level: None,
                ..self
            }
        } else {
            let level = selector.parse().unwrap_or(LogLevel::Info);
            self.level(level)
        }
    }

    pub fn matches(&self, entry: &AuditEntry) -> bool {
        if let Some(level) = &self.level {
            if &entry.level != level {
                return false;
            }
        }
        match &self.contains {
            Some(needle) => entry.contains(needle),
            None => true,
        }
    }
}

/// Returns the entries matching `filter`, in their original order.
pub fn filter_logs<'a>(entries: &'a [AuditEntry], filter: &LogFilter) -> Vec<&'a AuditEntry> {
    entries.iter().filter(|entry| filter.matches(entry)).collect()
}
