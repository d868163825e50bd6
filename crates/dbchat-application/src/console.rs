//! Direct query console.
//!
//! Executes literal query text against a data source, bypassing
//! natural-language generation entirely. The console holds a single result
//! slot outside of any transcript; pagination re-issues the last
//! successfully executed query, not whatever the editor currently holds.

use dbchat_core::service::ConsoleService;
use dbchat_core::session::ConsoleOutcome;
use dbchat_core::{DbChatError, Result};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct ConsoleState {
    result: Option<ConsoleOutcome>,
    /// The exact text of the last execution that succeeded. Page changes
    /// re-run this, so edits made after a run do not leak into pagination.
    last_executed: Option<String>,
    loading: bool,
}

pub struct DirectQueryConsole {
    service: Arc<dyn ConsoleService>,
    state: RwLock<ConsoleState>,
}

impl DirectQueryConsole {
    pub fn new(service: Arc<dyn ConsoleService>) -> Self {
        Self {
            service,
            state: RwLock::new(ConsoleState::default()),
        }
    }

    /// Executes query text and replaces the console result.
    ///
    /// An execution failure is part of the outcome, not an error; only
    /// transport-level problems are raised. A failed execution does not
    /// update the paginatable query.
    pub async fn execute(
        &self,
        data_source_id: Uuid,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<ConsoleOutcome> {
        let query = query.trim();
        if query.is_empty() {
            return Err(DbChatError::validation("console query must not be empty"));
        }
        self.run(data_source_id, query, page, page_size).await
    }

    /// Loads another page of the last successfully executed query.
    ///
    /// # Errors
    ///
    /// Returns a validation error when nothing has been executed yet.
    pub async fn change_page(
        &self,
        data_source_id: Uuid,
        page: u32,
        page_size: u32,
    ) -> Result<ConsoleOutcome> {
        let query = self
            .state
            .read()
            .await
            .last_executed
            .clone()
            .ok_or_else(|| DbChatError::validation("no query has been executed yet"))?;
        self.run(data_source_id, &query, page, page_size).await
    }

    async fn run(
        &self,
        data_source_id: Uuid,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<ConsoleOutcome> {
        {
            let mut state = self.state.write().await;
            state.loading = true;
        }

        let result = self.service.execute(data_source_id, query, page, page_size).await;

        let mut state = self.state.write().await;
        state.loading = false;
        match result {
            Ok(outcome) => {
                if let ConsoleOutcome::Success { executed_query, .. } = &outcome {
                    state.last_executed = Some(executed_query.clone());
                }
                state.result = Some(outcome.clone());
                Ok(outcome)
            }
            Err(err) => {
                tracing::warn!(error = %err, "console execution failed");
                Err(err)
            }
        }
    }

    pub async fn result(&self) -> Option<ConsoleOutcome> {
        self.state.read().await.result.clone()
    }

    pub async fn last_executed(&self) -> Option<String> {
        self.state.read().await.last_executed.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.read().await.loading
    }
}

#[cfg(test)]
#[path = "console_test.rs"]
mod tests;
