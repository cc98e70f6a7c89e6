//! Console configuration loaded from `config.toml`.
//!
//! ```toml
//! [console]
//! prompt = "pipecon> "
//! history_file = "/home/me/.pipecon_history"
//! log_filter = "info,audit=debug"
//! default_session = "default"
//!
//! [defaults]
//! subreddits = ["MachineLearning", "LocalLlama"]
//! post_limit = 100
//! candidate_limit = 10
//! top_k = 5
//! ```
//!
//! Every key is optional. The file never holds API keys; those are entered
//! per session on the settings page.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use pipecon_core::{PipeconError, Result};

use crate::paths::PipeconPaths;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub console: ConsoleSection,
    pub defaults: DefaultsSection,
}

/// `[console]`: REPL behaviour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleSection {
    pub prompt: String,
    /// Falls back to [`PipeconPaths::history_file`].
    pub history_file: Option<PathBuf>,
    /// `tracing` filter directive used when neither `--log-level` nor
    /// `RUST_LOG` is given.
    pub log_filter: Option<String>,
    pub default_session: String,
}

impl Default for ConsoleSection {
    fn default() -> Self {
        Self {
            prompt: "pipecon> ".to_string(),
            history_file: None,
            log_filter: None,
            default_session: "default".to_string(),
        }
    }
}

/// `[defaults]`: values pre-filled into page forms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsSection {
    pub subreddits: Vec<String>,
    pub post_limit: u32,
    pub candidate_limit: usize,
    pub top_k: usize,
}

impl Default for DefaultsSection {
    fn default() -> Self {
        Self {
            subreddits: vec![
                "MachineLearning".to_string(),
                "LocalLlama".to_string(),
                "ArtificialInteligence".to_string(),
            ],
            post_limit: 100,
            candidate_limit: 10,
            top_k: 5,
        }
    }
}

impl ConsoleConfig {
    /// Loads the config at `path`.
    ///
    /// A missing or empty file yields the defaults; an unreadable or
    /// malformed one is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(target: "config", path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            PipeconError::io(format!("Failed to read config file at {}: {e}", path.display()))
        })?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = toml::from_str(&content).map_err(|e| {
            PipeconError::config(format!("Failed to parse {}: {e}", path.display()))
        })?;
        tracing::info!(target: "config", path = %path.display(), "Loaded console config");
        Ok(config)
    }

    /// Loads `~/.config/pipecon/config.toml`, or the defaults when the
    /// platform has no config directory.
    pub fn load_default() -> Result<Self> {
        match PipeconPaths::config_file() {
            Ok(path) => Self::load(&path),
            Err(_) => Ok(Self::default()),
        }
    }

    /// The history file to use: the configured one, else the default path.
    pub fn history_path(&self) -> Option<PathBuf> {
        self.console
            .history_file
            .clone()
            .or_else(|| PipeconPaths::history_file().ok())
    }

    /// `[defaults].subreddits` as the comma-separated default of the URL form.
    pub fn subreddit_list(&self) -> String {
        self.defaults.subreddits.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ConsoleConfig::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, ConsoleConfig::default());
        assert_eq!(config.console.prompt, "pipecon> ");
        assert_eq!(
            config.subreddit_list(),
            "MachineLearning, LocalLlama, ArtificialInteligence"
        );
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[console]
log_filter = "debug"

[defaults]
top_k = 12
"#
        )
        .unwrap();

        let config = ConsoleConfig::load(file.path()).unwrap();
        assert_eq!(config.console.log_filter.as_deref(), Some("debug"));
        assert_eq!(config.console.default_session, "default");
        assert_eq!(config.defaults.top_k, 12);
        assert_eq!(config.defaults.post_limit, 100);
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let file = NamedTempFile::new().unwrap();
        assert_eq!(
            ConsoleConfig::load(file.path()).unwrap(),
            ConsoleConfig::default()
        );
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[defaults]\ntop_k = \"many\"").unwrap();
        let err = ConsoleConfig::load(file.path()).unwrap_err();
        assert!(err.is_config());
    }
}
