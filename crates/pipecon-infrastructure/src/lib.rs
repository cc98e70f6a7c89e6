//! Console configuration file and path resolution.

pub mod config;
pub mod paths;

pub use config::{ConsoleConfig, ConsoleSection, DefaultsSection};
pub use paths::PipeconPaths;
