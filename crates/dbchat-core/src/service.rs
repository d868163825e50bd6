//! External service contracts.
//!
//! The core depends on remote collaborators only through these traits.
//! Implementations live in `dbchat-client`; tests inject in-memory mocks.
//! Every call is made through the authenticated-request capability of the
//! implementing crate, which performs one transparent credential
//! refresh-and-retry on authorization failure.

use crate::error::Result;
use crate::session::{ChatSession, ChatTranscript, ConsoleOutcome, MessageTurn, ResultPage};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of the model used for natural-language translation.
///
/// Either a well-known model name or the id of a user-defined custom
/// model; the backend resolves it, so the client treats it as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryModel(String);

impl QueryModel {
    pub fn new(model: impl Into<String>) -> Self {
        Self(model.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QueryModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One prior exchange sent back to the generation service as context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorExchange {
    pub natural_language_query: String,
    pub generated_query: Option<String>,
}

impl From<&MessageTurn> for PriorExchange {
    fn from(turn: &MessageTurn) -> Self {
        Self {
            natural_language_query: turn.natural_language_query.clone(),
            generated_query: turn.generated_query().map(str::to_string),
        }
    }
}

/// Request for one natural-language turn round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnRequest {
    pub session_id: Uuid,
    /// The full prior transcript, oldest first.
    pub prior_turns: Vec<PriorExchange>,
    /// The new user text.
    pub text: String,
    pub model: QueryModel,
    /// Page size for the first page of result data.
    pub page_size: u32,
}

/// The structured response to one submitted turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnReply {
    pub turn: MessageTurn,
    /// Name the service derived for the session, present when this was
    /// the session's first turn.
    pub session_name: Option<String>,
}

/// Session CRUD operations for one data source.
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Lists the sessions of a data source, most recently modified first.
    async fn list(&self, data_source_id: Uuid) -> Result<Vec<ChatSession>>;

    /// Creates a new, empty session.
    async fn create(&self, data_source_id: Uuid) -> Result<ChatSession>;

    /// Renames a session. Concurrent renames are last-write-wins.
    async fn rename(&self, session_id: Uuid, name: &str) -> Result<()>;

    /// Deletes a session.
    async fn delete(&self, session_id: Uuid) -> Result<()>;

    /// Fetches the full transcript of a session.
    async fn transcript(&self, session_id: Uuid) -> Result<ChatTranscript>;
}

/// The natural-language generation/execution service.
#[async_trait]
pub trait QueryService: Send + Sync {
    /// Submits one turn: prior transcript plus new text plus model.
    ///
    /// A successful reply carries exactly one structured turn; execution
    /// and plot failures are embedded in the turn, not raised here.
    async fn submit(&self, data_source_id: Uuid, request: TurnRequest) -> Result<TurnReply>;
}

/// Direct execution of literal query text, bypassing generation.
#[async_trait]
pub trait ConsoleService: Send + Sync {
    async fn execute(
        &self,
        data_source_id: Uuid,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<ConsoleOutcome>;
}

/// Paged access to the result data of an already-generated turn.
#[async_trait]
pub trait MessageDataService: Send + Sync {
    async fn fetch(&self, message_id: Uuid, page: u32, page_size: u32) -> Result<ResultPage>;
}
