//! Wire DTOs for the backend REST API.
//!
//! The backend speaks camelCase JSON; these types are private to the
//! client crate and convert into the core domain types at the boundary.

use chrono::{DateTime, Utc};
use dbchat_core::session::{ChatSession, ChatTranscript, ConsoleOutcome, MessageTurn, ResultPage};
use dbchat_core::{DbChatError, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn default_page_size() -> u32 {
    10
}

/// Entry of the session-list endpoint. Carries no modification date.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChatSummaryDto {
    pub id: Uuid,
    pub name: String,
}

impl From<ChatSummaryDto> for ChatSession {
    fn from(dto: ChatSummaryDto) -> Self {
        ChatSession::new(dto.id, dto.name)
    }
}

/// Full chat payload: create and transcript endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChatDto {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub messages: Vec<ChatMessageDto>,
    #[serde(default)]
    pub modification_date: Option<DateTime<Utc>>,
}

impl ChatDto {
    pub fn into_session(self) -> ChatSession {
        ChatSession {
            id: self.id,
            name: self.name,
            last_modified: self.modification_date,
        }
    }

    pub fn into_transcript(self) -> ChatTranscript {
        ChatTranscript {
            session_id: self.id,
            messages: self.messages.into_iter().map(MessageTurn::from).collect(),
            loading: false,
        }
    }
}

/// One merged query/response exchange as the backend reports it.
///
/// Error, data and plot arrive as parallel nullable fields;
/// [`MessageTurn::from_parts`] collapses them into the tagged outcome.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChatMessageDto {
    pub message_id: Uuid,
    pub nl_query: String,
    #[serde(default)]
    pub db_query: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub plot_url: Option<String>,
    #[serde(default)]
    pub plot_error: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub data: Option<ResultPageDto>,
}

impl From<ChatMessageDto> for MessageTurn {
    fn from(dto: ChatMessageDto) -> Self {
        MessageTurn::from_parts(
            dto.message_id,
            dto.nl_query,
            dto.timestamp,
            dto.description,
            dto.db_query,
            dto.plot_url,
            dto.plot_error,
            dto.data.map(ResultPage::from),
            dto.error,
        )
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResultPageDto {
    pub column_names: Vec<String>,
    pub rows: Vec<Vec<String>>,
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default)]
    pub total_count: u64,
}

impl From<ResultPageDto> for ResultPage {
    fn from(dto: ResultPageDto) -> Self {
        ResultPage {
            column_names: dto.column_names,
            rows: dto.rows,
            page: dto.page,
            page_size: dto.page_size,
            total_count: dto.total_count,
        }
    }
}

/// Response of the natural-language submission endpoint: the produced
/// turn, plus the session name the service derived on a first turn.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TurnReplyDto {
    #[serde(flatten)]
    pub message: ChatMessageDto,
    #[serde(default)]
    pub chat_name: Option<String>,
}

/// Body of the natural-language submission endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct QueryRequestDto {
    pub chat_id: Uuid,
    pub query: String,
    pub model: String,
    pub prior_turns: Vec<PriorExchangeDto>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PriorExchangeDto {
    pub nl_query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub db_query: Option<String>,
}

/// Response of the direct console endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConsoleResponseDto {
    #[serde(default)]
    pub data: Option<ResultPageDto>,
    #[serde(default)]
    pub db_query: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ConsoleResponseDto {
    /// Converts into a console outcome. `sent_query` is the text the
    /// client actually submitted, used when the backend does not echo it.
    pub fn into_outcome(self, sent_query: &str) -> Result<ConsoleOutcome> {
        if let Some(error) = self.error {
            return Ok(ConsoleOutcome::Failed { error });
        }
        let data = self.data.ok_or_else(|| {
            DbChatError::internal("console response carried neither data nor error")
        })?;
        Ok(ConsoleOutcome::Success {
            executed_query: self.db_query.unwrap_or_else(|| sent_query.to_string()),
            data: data.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_with_error_and_data_decodes_to_failed_turn() {
        let json = r#"{
            "messageId": "7f8480cb-0536-4e02-a351-5a2b73171b68",
            "nlQuery": "count users",
            "dbQuery": "SELECT count(*) FROM public.user;",
            "error": "relation does not exist",
            "data": {"columnNames": ["count"], "rows": [["0"]]}
        }"#;
        let dto: ChatMessageDto = serde_json::from_str(json).unwrap();
        let turn = MessageTurn::from(dto);

        assert!(turn.is_failed());
        assert!(turn.data().is_none());
    }

    #[test]
    fn result_page_defaults_fill_missing_pagination_fields() {
        let json = r#"{"columnNames": ["id"], "rows": [["1"], ["2"]]}"#;
        let page = ResultPage::from(serde_json::from_str::<ResultPageDto>(json).unwrap());

        assert_eq!(page.page, 0);
        assert_eq!(page.page_size, 10);
        assert_eq!(page.total_count, 0);
    }

    #[test]
    fn turn_reply_flattens_message_fields() {
        let json = r#"{
            "messageId": "7f8480cb-0536-4e02-a351-5a2b73171b68",
            "nlQuery": "find me all users",
            "dbQuery": "SELECT * FROM public.user;",
            "chatName": "Users overview"
        }"#;
        let reply: TurnReplyDto = serde_json::from_str(json).unwrap();

        assert_eq!(reply.chat_name.as_deref(), Some("Users overview"));
        assert_eq!(
            reply.message.db_query.as_deref(),
            Some("SELECT * FROM public.user;")
        );
    }

    #[test]
    fn console_error_maps_to_failed_outcome() {
        let dto = ConsoleResponseDto {
            data: None,
            db_query: None,
            error: Some("syntax error at or near \"SELEC\"".into()),
        };
        match dto.into_outcome("SELEC 1").unwrap() {
            ConsoleOutcome::Failed { error } => assert!(error.contains("syntax error")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn console_success_prefers_echoed_query() {
        let dto = ConsoleResponseDto {
            data: Some(ResultPageDto {
                column_names: vec!["?column?".into()],
                rows: vec![vec!["1".into()]],
                page: 0,
                page_size: 10,
                total_count: 1,
            }),
            db_query: Some("SELECT 1;".into()),
            error: None,
        };
        match dto.into_outcome("SELECT 1").unwrap() {
            ConsoleOutcome::Success { executed_query, .. } => {
                assert_eq!(executed_query, "SELECT 1;");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn prior_exchange_without_query_omits_the_field() {
        let dto = PriorExchangeDto {
            nl_query: "hello".into(),
            db_query: None,
        };
        let json = serde_json::to_string(&dto).unwrap();
        assert_eq!(json, r#"{"nlQuery":"hello"}"#);
    }
}
