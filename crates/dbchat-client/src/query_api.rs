//! HTTP implementations of the generation/execution and console services.

use crate::dto::{ConsoleResponseDto, PriorExchangeDto, QueryRequestDto, TurnReplyDto};
use crate::http::ApiClient;
use async_trait::async_trait;
use dbchat_core::service::{ConsoleService, QueryService, TurnReply, TurnRequest};
use dbchat_core::session::{ConsoleOutcome, MessageTurn};
use dbchat_core::{DbChatError, Result};
use reqwest::Method;
use std::sync::Arc;
use uuid::Uuid;

pub struct HttpQueryService {
    client: Arc<ApiClient>,
}

impl HttpQueryService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl QueryService for HttpQueryService {
    async fn submit(&self, data_source_id: Uuid, request: TurnRequest) -> Result<TurnReply> {
        let body = QueryRequestDto {
            chat_id: request.session_id,
            query: request.text.clone(),
            model: request.model.as_str().to_string(),
            prior_turns: request
                .prior_turns
                .iter()
                .map(|turn| PriorExchangeDto {
                    nl_query: turn.natural_language_query.clone(),
                    db_query: turn.generated_query.clone(),
                })
                .collect(),
        };

        let path = format!(
            "/database/{data_source_id}/chat/{}/query",
            request.session_id
        );
        let response = self
            .client
            .request(Method::POST, &path, |b| {
                b.query(&[("pageSize", request.page_size.to_string())])
                    .json(&body)
            })
            .await?;

        // The generation service errored before producing a turn: nothing
        // is appended, unlike an execution error embedded in the reply.
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DbChatError::generation(format!("{status}: {body}")));
        }

        let reply: TurnReplyDto = ApiClient::decode(response).await?;
        Ok(TurnReply {
            turn: MessageTurn::from(reply.message),
            session_name: reply.chat_name,
        })
    }
}

pub struct HttpConsoleService {
    client: Arc<ApiClient>,
}

impl HttpConsoleService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ConsoleService for HttpConsoleService {
    async fn execute(
        &self,
        data_source_id: Uuid,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<ConsoleOutcome> {
        let path = format!("/database/{data_source_id}/query/queryLanguage");
        let body = query.to_string();
        let response = self
            .client
            .request(Method::POST, &path, move |b| {
                b.query(&[
                    ("page", page.to_string()),
                    ("pageSize", page_size.to_string()),
                ])
                .header("content-type", "text/plain")
                .body(body.clone())
            })
            .await?;
        let response =
            ApiClient::ensure_ok(response, "DataSource", data_source_id.to_string()).await?;
        let console: ConsoleResponseDto = ApiClient::decode(response).await?;
        console.into_outcome(query)
    }
}
