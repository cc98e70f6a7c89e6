//! Result of a console action that may be skipped by a precondition guard.

/// What an action did.
///
/// A skipped action mutated nothing and logged nothing; `reason` is the
/// message shown to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Completed(T),
    Skipped { reason: &'static str },
}

impl<T> Outcome<T> {
    pub fn skipped(reason: &'static str) -> Self {
        Outcome::Skipped { reason }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed(_))
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Outcome::Skipped { .. })
    }

    /// The completed value, if any.
    pub fn completed(self) -> Option<T> {
        match self {
            Outcome::Completed(value) => Some(value),
            Outcome::Skipped { .. } => None,
        }
    }
}
