use super::state::SessionState;
use crate::error::{PipeconError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Shared handle to one session's store.
pub type SessionHandle = Arc<RwLock<SessionState>>;

/// Manages the independent stores of all live sessions.
///
/// `SessionManager` is responsible for:
/// - Creating new sessions, each with its own initialized store
/// - Looking sessions up by id
/// - Tracking the active session
/// - Running actions under a session's write lock
///
/// Nothing is persisted; dropping the manager drops every session.
#[derive(Default)]
pub struct SessionManager {
    /// In-memory session stores keyed by session id
    sessions: Arc<RwLock<HashMap<String, SessionHandle>>>,
    /// ID of the currently active session
    active_session_id: Arc<RwLock<Option<String>>>,
}

impl SessionManager {
    /// Creates a `SessionManager` with no sessions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new session and sets it as active.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the id is empty or already in use.
    pub async fn create_session(&self, session_id: impl Into<String>) -> Result<SessionHandle> {
        let session_id = session_id.into();
        if session_id.trim().is_empty() {
            return Err(PipeconError::validation(
                "session_id",
                "session id must not be empty",
            ));
        }

        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session_id) {
            return Err(PipeconError::validation(
                "session_id",
                format!("session '{session_id}' already exists"),
            ));
        }

        let handle = Arc::new(RwLock::new(SessionState::initialized()));
        sessions.insert(session_id.clone(), handle.clone());
        drop(sessions);

        tracing::info!(target: "session", session_id = %session_id, "Session created");
        *self.active_session_id.write().await = Some(session_id);
        Ok(handle)
    }

    /// Creates a session with a generated id and returns that id.
    pub async fn new_session(&self) -> Result<String> {
        let session_id = Uuid::new_v4().to_string();
        self.create_session(session_id.clone()).await?;
        Ok(session_id)
    }

    /// Returns the session's store, creating it if it does not exist yet.
    ///
    /// Unlike [`SessionManager::create_session`], this does not change the
    /// active session.
    pub async fn get_or_create(&self, session_id: &str) -> SessionHandle {
        let mut sessions = self.sessions.write().await;
        sessions
            .entry(session_id.to_string())
            .or_insert_with(|| {
                tracing::info!(target: "session", session_id = %session_id, "Session created");
                Arc::new(RwLock::new(SessionState::initialized()))
            })
            .clone()
    }

    /// Retrieves a session's store by id.
    pub async fn get_session(&self, session_id: &str) -> Option<SessionHandle> {
        let sessions = self.sessions.read().await;
        sessions.get(session_id).cloned()
    }

    /// Ids of all live sessions, sorted.
    pub async fn session_ids(&self) -> Vec<String> {
        let sessions = self.sessions.read().await;
        let mut ids: Vec<String> = sessions.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Drops a session and its store.
    ///
    /// If the session was active, no session is active afterwards.
    pub async fn remove_session(&self, session_id: &str) -> Result<()> {
        let removed = self.sessions.write().await.remove(session_id);
        if removed.is_none() {
            return Err(PipeconError::not_found("session", session_id));
        }

        let mut active = self.active_session_id.write().await;
        if active.as_deref() == Some(session_id) {
            *active = None;
        }
        tracing::info!(target: "session", session_id = %session_id, "Session removed");
        Ok(())
    }

    /// Makes an existing session the active one.
    pub async fn switch_session(&self, session_id: &str) -> Result<SessionHandle> {
        let handle = self
            .get_session(session_id)
            .await
            .ok_or_else(|| PipeconError::not_found("session", session_id))?;
        *self.active_session_id.write().await = Some(session_id.to_string());
        tracing::debug!(target: "session", session_id = %session_id, "Session switched");
        Ok(handle)
    }

    /// Id of the active session, if any.
    pub async fn active_session_id(&self) -> Option<String> {
        self.active_session_id.read().await.clone()
    }

    /// Store of the active session, if any.
    pub async fn active_session(&self) -> Option<SessionHandle> {
        let id = self.active_session_id().await?;
        self.get_session(&id).await
    }

    /// Runs `action` against a session's store while holding its write lock.
    ///
    /// Concurrent callers on the same session are serialized, so store
    /// mutations and log appends keep their order.
    pub async fn with_session<R, F>(&self, session_id: &str, action: F) -> Result<R>
    where
        F: FnOnce(&mut SessionState) -> R,
    {
        let handle = self
            .get_session(session_id)
            .await
            .ok_or_else(|| PipeconError::not_found("session", session_id))?;
        let mut state = handle.write().await;
        Ok(action(&mut state))
    }
}
