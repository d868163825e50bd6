//! Session controller.
//!
//! Composition root of the whole client: owns the registry, the
//! transcript store, the submission coordinator and the console, and
//! sequences every cross-component effect (select-then-reload,
//! create-then-blank, delete-then-reload-neighbor). Presentation code
//! calls only this surface.

use crate::console::DirectQueryConsole;
use crate::coordinator::QuerySubmissionCoordinator;
use dbchat_core::service::{
    ConsoleService, MessageDataService, QueryModel, QueryService, SessionService,
};
use dbchat_core::session::{
    ChatHistoryRegistry, ChatSession, ChatTranscript, ConsoleOutcome, DeleteOutcome, MessageTurn,
    TranscriptStore,
};
use dbchat_core::{ClientConfig, DbChatError, Result};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

pub struct SessionController {
    config: ClientConfig,
    registry: Arc<ChatHistoryRegistry>,
    transcript: Arc<TranscriptStore>,
    coordinator: QuerySubmissionCoordinator,
    console: DirectQueryConsole,
    data_source: RwLock<Option<Uuid>>,
}

impl SessionController {
    pub fn new(
        config: ClientConfig,
        sessions: Arc<dyn SessionService>,
        queries: Arc<dyn QueryService>,
        console: Arc<dyn ConsoleService>,
        message_data: Arc<dyn MessageDataService>,
    ) -> Self {
        let registry = Arc::new(ChatHistoryRegistry::new(sessions.clone()));
        let transcript = Arc::new(TranscriptStore::new(sessions, message_data));
        let coordinator =
            QuerySubmissionCoordinator::new(queries, transcript.clone(), registry.clone());
        Self {
            config,
            registry,
            transcript,
            coordinator,
            console: DirectQueryConsole::new(console),
            data_source: RwLock::new(None),
        }
    }

    async fn require_data_source(&self) -> Result<Uuid> {
        (*self.data_source.read().await)
            .ok_or_else(|| DbChatError::validation("no data source selected"))
    }

    /// Switches to a data source: reloads its session list and the
    /// transcript of whichever session ends up active.
    pub async fn select_data_source(&self, data_source_id: Uuid) -> Result<Vec<ChatSession>> {
        {
            let mut data_source = self.data_source.write().await;
            *data_source = Some(data_source_id);
        }
        let sessions = self.registry.refresh(data_source_id).await?;
        match self.registry.active_session().await {
            Some(active) => {
                self.transcript.load(active.id).await?;
            }
            None => self.transcript.clear().await,
        }
        Ok(sessions)
    }

    /// Activates the session at `index` and loads its transcript.
    pub async fn select_session(&self, index: usize) -> Result<ChatTranscript> {
        self.require_data_source().await?;
        let session = self.registry.select(index).await?;
        self.transcript.load(session.id).await
    }

    /// Creates a session on the current data source and starts it blank.
    pub async fn create_session(&self) -> Result<ChatSession> {
        let data_source_id = self.require_data_source().await?;
        let session = self.registry.create(data_source_id).await?;
        self.transcript.begin(session.id).await;
        Ok(session)
    }

    /// Renames a session. Blank names are rejected locally.
    pub async fn rename_session(&self, session_id: Uuid, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DbChatError::validation("session name must not be empty"));
        }
        self.registry.rename(session_id, name).await
    }

    /// Deletes a session and, when the deletion moved the active
    /// selection, loads the transcript of the new active session.
    pub async fn delete_session(&self, session_id: Uuid) -> Result<DeleteOutcome> {
        let outcome = self.registry.delete(session_id).await?;
        match &outcome {
            DeleteOutcome::ActiveMoved(neighbor) => {
                self.transcript.load(neighbor.id).await?;
            }
            DeleteOutcome::Cleared => self.transcript.clear().await,
            DeleteOutcome::ActiveUnchanged => {}
        }
        Ok(outcome)
    }

    /// Submits one natural-language turn against the active session.
    pub async fn submit_natural_language_turn(
        &self,
        text: &str,
        model: QueryModel,
    ) -> Result<MessageTurn> {
        let data_source_id = self.require_data_source().await?;
        let session = self
            .registry
            .active_session()
            .await
            .ok_or_else(|| DbChatError::validation("no session selected"))?;
        self.coordinator
            .submit(
                data_source_id,
                session.id,
                text,
                model,
                self.config.default_page_size,
            )
            .await
    }

    /// Loads another result page for a turn of the current transcript.
    pub async fn load_more_turn_data(
        &self,
        message_id: Uuid,
        page: u32,
        page_size: u32,
    ) -> Result<bool> {
        let session_id = self
            .transcript
            .current_session_id()
            .await
            .ok_or_else(|| DbChatError::validation("no session selected"))?;
        self.transcript
            .refresh_turn_data(session_id, message_id, page, page_size)
            .await
    }

    /// Runs literal query text on the console, starting at the first page.
    pub async fn run_console_query(
        &self,
        query: &str,
        page_size: u32,
    ) -> Result<ConsoleOutcome> {
        let data_source_id = self.require_data_source().await?;
        self.console.execute(data_source_id, query, 0, page_size).await
    }

    /// Moves the console to another page of its last executed query.
    pub async fn change_console_page(&self, page: u32, page_size: u32) -> Result<ConsoleOutcome> {
        let data_source_id = self.require_data_source().await?;
        self.console.change_page(data_source_id, page, page_size).await
    }

    pub async fn data_source_id(&self) -> Option<Uuid> {
        *self.data_source.read().await
    }

    pub async fn sessions(&self) -> Vec<ChatSession> {
        self.registry.sessions().await
    }

    pub async fn active_session(&self) -> Option<ChatSession> {
        self.registry.active_session().await
    }

    pub async fn transcript(&self) -> Option<ChatTranscript> {
        self.transcript.snapshot().await
    }

    pub async fn console_result(&self) -> Option<ConsoleOutcome> {
        self.console.result().await
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
