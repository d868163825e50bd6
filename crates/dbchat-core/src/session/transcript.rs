//! Transcript store.
//!
//! Holds the transcript of the currently selected session. A session
//! switch replaces the transcript wholesale; results of requests that were
//! issued against a previous session are discarded by an explicit
//! session-id guard instead of being applied to the wrong conversation.

use crate::error::{DbChatError, Result};
use crate::service::{MessageDataService, SessionService};
use crate::session::{ChatTranscript, MessageTurn};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Owner of the single active [`ChatTranscript`].
pub struct TranscriptStore {
    sessions: Arc<dyn SessionService>,
    data: Arc<dyn MessageDataService>,
    state: RwLock<Option<ChatTranscript>>,
}

impl TranscriptStore {
    pub fn new(sessions: Arc<dyn SessionService>, data: Arc<dyn MessageDataService>) -> Self {
        Self {
            sessions,
            data,
            state: RwLock::new(None),
        }
    }

    /// Installs an empty transcript for a freshly created session, so the
    /// new conversation starts blank without a fetch.
    pub async fn begin(&self, session_id: Uuid) {
        let mut state = self.state.write().await;
        *state = Some(ChatTranscript::empty(session_id));
    }

    /// Drops the current transcript entirely (no session selected).
    pub async fn clear(&self) {
        let mut state = self.state.write().await;
        *state = None;
    }

    /// Loads the transcript of a session, replacing whatever was held.
    ///
    /// While the fetch is in flight the store exposes an empty, `loading`
    /// transcript for the session. On failure the messages stay empty and
    /// the error is surfaced; no partial transcript is ever installed.
    pub async fn load(&self, session_id: Uuid) -> Result<ChatTranscript> {
        {
            let mut state = self.state.write().await;
            *state = Some(ChatTranscript {
                session_id,
                messages: Vec::new(),
                loading: true,
            });
        }

        let result = self.sessions.transcript(session_id).await;

        let mut state = self.state.write().await;
        // Another load may have replaced the slot while this one was in
        // flight; only the load for the still-current session applies.
        let current = state.as_mut().filter(|t| t.session_id == session_id);
        match (current, result) {
            (Some(slot), Ok(mut transcript)) => {
                transcript.loading = false;
                *slot = transcript.clone();
                tracing::debug!(session_id = %session_id, turns = transcript.messages.len(), "transcript loaded");
                Ok(transcript)
            }
            (Some(slot), Err(err)) => {
                slot.loading = false;
                tracing::warn!(session_id = %session_id, error = %err, "transcript load failed");
                Err(err)
            }
            (None, result) => {
                tracing::debug!(session_id = %session_id, "discarding stale transcript load");
                result
            }
        }
    }

    /// Appends a turn to the current transcript.
    ///
    /// The only way new turns enter a transcript outside of a full load.
    /// A turn whose session is no longer current is discarded; returns
    /// whether the turn was applied.
    pub async fn append(&self, session_id: Uuid, turn: MessageTurn) -> bool {
        let mut state = self.state.write().await;
        match state.as_mut() {
            Some(transcript) if transcript.session_id == session_id => {
                transcript.messages.push(turn);
                true
            }
            _ => {
                tracing::warn!(session_id = %session_id, "discarding turn for non-current session");
                false
            }
        }
    }

    /// Loads one page of result data for a turn of the current transcript.
    ///
    /// If the transcript has been replaced by the time the page arrives
    /// (session switched mid-flight), the page is discarded rather than
    /// applied to the wrong session. Returns whether the page was applied.
    pub async fn refresh_turn_data(
        &self,
        session_id: Uuid,
        message_id: Uuid,
        page: u32,
        page_size: u32,
    ) -> Result<bool> {
        {
            let state = self.state.read().await;
            let transcript = state
                .as_ref()
                .filter(|t| t.session_id == session_id)
                .ok_or_else(|| DbChatError::validation("session is no longer current"))?;
            if !transcript.messages.iter().any(|m| m.message_id == message_id) {
                return Err(DbChatError::not_found("Message", message_id.to_string()));
            }
        }

        let result_page = self.data.fetch(message_id, page, page_size).await?;

        let mut state = self.state.write().await;
        let applied = match state.as_mut().filter(|t| t.session_id == session_id) {
            Some(transcript) => transcript
                .messages
                .iter_mut()
                .find(|m| m.message_id == message_id)
                .map(|turn| turn.replace_data(result_page))
                .unwrap_or(false),
            None => false,
        };
        if !applied {
            tracing::debug!(message_id = %message_id, "discarding page for replaced transcript");
        }
        Ok(applied)
    }

    /// A clone of the current transcript, if any.
    pub async fn snapshot(&self) -> Option<ChatTranscript> {
        self.state.read().await.clone()
    }

    pub async fn current_session_id(&self) -> Option<Uuid> {
        self.state.read().await.as_ref().map(|t| t.session_id)
    }

    pub async fn is_loading(&self) -> bool {
        self.state
            .read()
            .await
            .as_ref()
            .map(|t| t.loading)
            .unwrap_or(false)
    }
}

#[cfg(test)]
#[path = "transcript_test.rs"]
mod tests;
