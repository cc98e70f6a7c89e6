//! Application layer for pipecon.
//!
//! One module per console page. Every action takes the session's store,
//! re-establishes its defaults, does its (mock) work, writes its slot and
//! records one audit entry. Actions guarded by a precondition return
//! [`pipecon_core::Outcome::Skipped`] and leave the store untouched.

pub mod context_provider;
pub mod crawler;
pub mod explorer;
pub mod logs;
pub mod models;
pub mod overview;
pub mod qdrant_browser;
pub mod ranking;
pub mod sender;
pub mod settings;
