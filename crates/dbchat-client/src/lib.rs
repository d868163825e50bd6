//! HTTP backend for the dbchat core service traits.
//!
//! Implements `SessionService`, `QueryService`, `ConsoleService` and
//! `MessageDataService` against the backend REST API, wrapped in an
//! authenticated-request capability that performs one transparent
//! credential refresh-and-retry on authorization failure.

mod auth;
mod dto;
mod http;
mod message_api;
mod query_api;
mod session_api;

pub use auth::{StaticTokenProvider, TokenProvider};
pub use http::ApiClient;
pub use message_api::HttpMessageDataService;
pub use query_api::{HttpConsoleService, HttpQueryService};
pub use session_api::HttpSessionService;

use dbchat_core::service::{ConsoleService, MessageDataService, QueryService, SessionService};
use dbchat_core::{ClientConfig, Result};
use std::sync::Arc;

/// All four remote services wired to one backend.
pub struct HttpBackend {
    pub sessions: Arc<dyn SessionService>,
    pub queries: Arc<dyn QueryService>,
    pub console: Arc<dyn ConsoleService>,
    pub message_data: Arc<dyn MessageDataService>,
}

impl HttpBackend {
    /// Builds the full service set from one configuration and one
    /// credential source.
    pub fn connect(config: &ClientConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self> {
        let client = Arc::new(ApiClient::new(config, tokens)?);
        Ok(Self {
            sessions: Arc::new(HttpSessionService::new(client.clone())),
            queries: Arc::new(HttpQueryService::new(client.clone())),
            console: Arc::new(HttpConsoleService::new(client.clone())),
            message_data: Arc::new(HttpMessageDataService::new(client)),
        })
    }
}
