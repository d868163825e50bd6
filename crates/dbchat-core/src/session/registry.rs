//! Chat history registry.
//!
//! Holds the ordered list of sessions of one data source together with the
//! active-selection pointer, and drives the session CRUD service. The
//! registry is the exclusive owner of both; transcripts only ever
//! reference a session by id.

use crate::error::{DbChatError, Result};
use crate::service::SessionService;
use crate::session::ChatSession;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct RegistryState {
    sessions: Vec<ChatSession>,
    active_index: Option<usize>,
    loading: bool,
}

/// Effect of a session deletion on the active selection.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    /// A non-active session was removed; the selection is unchanged.
    ActiveUnchanged,
    /// The active session was removed and a neighbor became active.
    /// The caller must reload this session's transcript.
    ActiveMoved(ChatSession),
    /// The active session was removed and no sessions remain.
    Cleared,
}

/// Registry of the chat sessions of one data source.
///
/// Invariant: whenever the session list is non-empty, `active_index`
/// refers to a valid element. Deletion adjusts the pointer *before* any
/// caller-side reload, so the view never points at a removed session.
pub struct ChatHistoryRegistry {
    service: Arc<dyn SessionService>,
    state: RwLock<RegistryState>,
}

impl ChatHistoryRegistry {
    pub fn new(service: Arc<dyn SessionService>) -> Self {
        Self {
            service,
            state: RwLock::new(RegistryState::default()),
        }
    }

    /// Reloads the session list of a data source.
    ///
    /// On success the list is replaced and the active selection is
    /// re-anchored by session id (falling back to the first element).
    /// On failure the previously loaded list is kept as-is: stale data is
    /// preferred over a blank state.
    pub async fn refresh(&self, data_source_id: Uuid) -> Result<Vec<ChatSession>> {
        {
            let mut state = self.state.write().await;
            state.loading = true;
        }

        let result = self.service.list(data_source_id).await;

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(sessions) => {
                let active_id = state
                    .active_index
                    .and_then(|i| state.sessions.get(i))
                    .map(|s| s.id);
                state.active_index = match active_id {
                    Some(id) => sessions
                        .iter()
                        .position(|s| s.id == id)
                        .or(if sessions.is_empty() { None } else { Some(0) }),
                    None if sessions.is_empty() => None,
                    None => Some(0),
                };
                state.sessions = sessions.clone();
                tracing::debug!(count = sessions.len(), "session list reloaded");
                Ok(sessions)
            }
            Err(err) => {
                tracing::warn!(error = %err, "session list reload failed, keeping stale list");
                Err(err)
            }
        }
    }

    /// Creates a new session, appends it and makes it active.
    ///
    /// The caller is responsible for clearing any attached transcript so
    /// the new session starts blank.
    pub async fn create(&self, data_source_id: Uuid) -> Result<ChatSession> {
        let session = self.service.create(data_source_id).await?;

        let mut state = self.state.write().await;
        state.sessions.push(session.clone());
        state.active_index = Some(state.sessions.len() - 1);
        tracing::debug!(session_id = %session.id, "session created and activated");
        Ok(session)
    }

    /// Renames a session.
    ///
    /// The local entry is only updated after the backend confirms; a
    /// failed rename leaves the registry untouched.
    pub async fn rename(&self, session_id: Uuid, new_name: &str) -> Result<()> {
        self.service.rename(session_id, new_name).await?;
        self.apply_name(session_id, new_name).await;
        Ok(())
    }

    /// Applies a server-derived session name without issuing a rename
    /// request (the backend already renamed the session itself).
    pub async fn apply_system_rename(&self, session_id: Uuid, name: &str) {
        self.apply_name(session_id, name).await;
    }

    async fn apply_name(&self, session_id: Uuid, name: &str) {
        let mut state = self.state.write().await;
        if let Some(session) = state.sessions.iter_mut().find(|s| s.id == session_id) {
            session.name = name.to_string();
        }
    }

    /// Deletes a session and repairs the active selection.
    ///
    /// When the deleted session was active, the previous neighbor is
    /// preferred, then the next, then no selection at all.
    pub async fn delete(&self, session_id: Uuid) -> Result<DeleteOutcome> {
        self.service.delete(session_id).await?;

        let mut state = self.state.write().await;
        let Some(index) = state.sessions.iter().position(|s| s.id == session_id) else {
            return Ok(DeleteOutcome::ActiveUnchanged);
        };
        state.sessions.remove(index);

        let outcome = match state.active_index {
            Some(active) if active == index => {
                if state.sessions.is_empty() {
                    state.active_index = None;
                    DeleteOutcome::Cleared
                } else {
                    let new_index = if index > 0 { index - 1 } else { 0 };
                    state.active_index = Some(new_index);
                    DeleteOutcome::ActiveMoved(state.sessions[new_index].clone())
                }
            }
            Some(active) if active > index => {
                state.active_index = Some(active - 1);
                DeleteOutcome::ActiveUnchanged
            }
            _ => DeleteOutcome::ActiveUnchanged,
        };

        tracing::debug!(session_id = %session_id, ?outcome, "session deleted");
        Ok(outcome)
    }

    /// Moves the active pointer. Pure pointer move: reloading the selected
    /// session's transcript is the composing controller's job.
    pub async fn select(&self, index: usize) -> Result<ChatSession> {
        let mut state = self.state.write().await;
        let session = state
            .sessions
            .get(index)
            .cloned()
            .ok_or_else(|| DbChatError::validation(format!("no session at index {index}")))?;
        state.active_index = Some(index);
        Ok(session)
    }

    pub async fn sessions(&self) -> Vec<ChatSession> {
        self.state.read().await.sessions.clone()
    }

    pub async fn active_index(&self) -> Option<usize> {
        self.state.read().await.active_index
    }

    pub async fn active_session(&self) -> Option<ChatSession> {
        let state = self.state.read().await;
        state
            .active_index
            .and_then(|i| state.sessions.get(i))
            .cloned()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }
}

#[cfg(test)]
#[path = "registry_test.rs"]
mod tests;
