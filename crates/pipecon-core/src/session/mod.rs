//! Session domain module.
//!
//! Each console session owns one [`SessionState`]: a store of named, typed
//! slots. Sessions never share a store; [`SessionManager`] keys them by id.
//!
//! # Module Structure
//!
//! - `slot`: slot names and kinds (`SlotName`, `SlotKind`)
//! - `state`: the store itself and its default completion (`SessionState`, `complete_slots`)
//! - `manager`: session lifecycle and locking (`SessionManager`)

mod manager;
mod manager_test;
mod slot;
mod state;

pub use manager::{SessionHandle, SessionManager};
pub use slot::{SlotKind, SlotName};
pub use state::{SessionState, complete_slots};
