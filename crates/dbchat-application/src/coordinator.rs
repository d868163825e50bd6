//! Query submission coordinator.
//!
//! Drives one natural-language turn end to end: validate the input,
//! snapshot the prior transcript as generation context, call the query
//! service, and integrate the reply. Concurrent submissions are allowed;
//! turns are appended in completion order, which may differ from
//! submission order.

use dbchat_core::service::{PriorExchange, QueryModel, QueryService, TurnRequest};
use dbchat_core::session::{ChatHistoryRegistry, MessageTurn, TranscriptStore};
use dbchat_core::{DbChatError, Result};
use std::sync::Arc;
use uuid::Uuid;

pub struct QuerySubmissionCoordinator {
    queries: Arc<dyn QueryService>,
    transcript: Arc<TranscriptStore>,
    registry: Arc<ChatHistoryRegistry>,
}

impl QuerySubmissionCoordinator {
    pub fn new(
        queries: Arc<dyn QueryService>,
        transcript: Arc<TranscriptStore>,
        registry: Arc<ChatHistoryRegistry>,
    ) -> Self {
        Self {
            queries,
            transcript,
            registry,
        }
    }

    /// Submits one natural-language turn against a session.
    ///
    /// The full prior transcript travels with the new text so the
    /// generation service sees the whole conversation. On success the
    /// returned turn is appended to the transcript (unless the session was
    /// switched away mid-flight) and a server-derived session name, sent
    /// on the first turn, is applied to the registry. On failure nothing
    /// is appended.
    ///
    /// # Errors
    ///
    /// Returns a validation error for blank input without contacting the
    /// service, and a generation error when the service fails.
    pub async fn submit(
        &self,
        data_source_id: Uuid,
        session_id: Uuid,
        text: &str,
        model: QueryModel,
        page_size: u32,
    ) -> Result<MessageTurn> {
        let text = text.trim();
        if text.is_empty() {
            return Err(DbChatError::validation("query text must not be empty"));
        }

        let prior_turns: Vec<PriorExchange> = match self.transcript.snapshot().await {
            Some(transcript) if transcript.session_id == session_id => {
                transcript.messages.iter().map(PriorExchange::from).collect()
            }
            _ => Vec::new(),
        };

        let reply = self
            .queries
            .submit(
                data_source_id,
                TurnRequest {
                    session_id,
                    prior_turns,
                    text: text.to_string(),
                    model,
                    page_size,
                },
            )
            .await?;

        let appended = self.transcript.append(session_id, reply.turn.clone()).await;
        if !appended {
            tracing::debug!(session_id = %session_id, "turn completed after session switch");
        }
        if let Some(name) = reply.session_name {
            self.registry.apply_system_rename(session_id, &name).await;
        }
        Ok(reply.turn)
    }
}

#[cfg(test)]
#[path = "coordinator_test.rs"]
mod tests;
