//! Unified path management for pipecon configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/pipecon/           # Config directory
//! ├── config.toml              # Console configuration
//! └── history.txt              # Readline history
//! ```

use std::path::PathBuf;

use pipecon_core::{PipeconError, Result};

const APP_DIR: &str = "pipecon";

pub struct PipeconPaths;

impl PipeconPaths {
    /// Returns the pipecon configuration directory.
    ///
    /// # Returns
    ///
    /// - `Ok(PathBuf)`: Path to config directory (e.g., `~/.config/pipecon/`)
    /// - `Err(PipeconError::Config)`: The platform has no config directory
    pub fn config_dir() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .ok_or_else(|| PipeconError::config("Cannot find config directory"))
    }

    /// Returns the path to the console configuration file.
    pub fn config_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Default readline history file, used when the config names none.
    pub fn history_file() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("history.txt"))
    }
}
