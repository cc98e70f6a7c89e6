//! Core domain of the pipecon console.
//!
//! The console's state lives in one [`SessionState`] per session: named,
//! typed slots that are defaulted idempotently before every action. Actions
//! record what they did as append-only audit entries correlated by
//! [`TraceId`]s.

pub mod audit;
pub mod error;
pub mod outcome;
pub mod pipeline;
pub mod session;
pub mod settings;
pub mod validation;

// Re-export common types
pub use audit::{AuditEntry, AuditEvent, LogFilter, LogLevel, TraceId, new_trace_id};
pub use error::{PipeconError, Result};
pub use outcome::Outcome;
pub use session::{SessionHandle, SessionManager, SessionState, SlotName};
pub use settings::{ApiKeys, Settings};
