//! HTTP implementation of the session CRUD service.

use crate::dto::{ChatDto, ChatSummaryDto};
use crate::http::ApiClient;
use async_trait::async_trait;
use dbchat_core::Result;
use dbchat_core::service::SessionService;
use dbchat_core::session::{ChatSession, ChatTranscript};
use reqwest::Method;
use std::sync::Arc;
use uuid::Uuid;

pub struct HttpSessionService {
    client: Arc<ApiClient>,
}

impl HttpSessionService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SessionService for HttpSessionService {
    async fn list(&self, data_source_id: Uuid) -> Result<Vec<ChatSession>> {
        let response = self
            .client
            .request(Method::GET, &format!("/database/{data_source_id}/chats"), |b| b)
            .await?;
        let response =
            ApiClient::ensure_ok(response, "DataSource", data_source_id.to_string()).await?;
        let items: Vec<ChatSummaryDto> = ApiClient::decode(response).await?;
        Ok(items.into_iter().map(ChatSession::from).collect())
    }

    async fn create(&self, data_source_id: Uuid) -> Result<ChatSession> {
        let response = self
            .client
            .request(Method::POST, "/chat", |b| {
                b.query(&[("databaseId", data_source_id.to_string())])
            })
            .await?;
        let response =
            ApiClient::ensure_ok(response, "DataSource", data_source_id.to_string()).await?;
        let chat: ChatDto = ApiClient::decode(response).await?;
        Ok(chat.into_session())
    }

    async fn rename(&self, session_id: Uuid, name: &str) -> Result<()> {
        let response = self
            .client
            .request(Method::PUT, &format!("/chat/{session_id}/name"), |b| {
                b.query(&[("name", name.to_string())])
            })
            .await?;
        ApiClient::ensure_ok(response, "Chat", session_id.to_string()).await?;
        Ok(())
    }

    async fn delete(&self, session_id: Uuid) -> Result<()> {
        let response = self
            .client
            .request(Method::DELETE, &format!("/chat/{session_id}"), |b| b)
            .await?;
        ApiClient::ensure_ok(response, "Chat", session_id.to_string()).await?;
        Ok(())
    }

    async fn transcript(&self, session_id: Uuid) -> Result<ChatTranscript> {
        let response = self
            .client
            .request(Method::GET, &format!("/chat/{session_id}"), |b| b)
            .await?;
        let response = ApiClient::ensure_ok(response, "Chat", session_id.to_string()).await?;
        let chat: ChatDto = ApiClient::decode(response).await?;
        Ok(chat.into_transcript())
    }
}
