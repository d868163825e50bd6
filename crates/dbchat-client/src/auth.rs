//! Credential supply for the authenticated-request capability.
//!
//! The client never implements token refresh itself; it asks a
//! [`TokenProvider`] for the current access token and, on an authorization
//! failure, for a refreshed one, exactly once per request.

use async_trait::async_trait;
use dbchat_core::{DbChatError, Result};

/// Source of bearer credentials for backend requests.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// The access token to attach to the next request.
    async fn access_token(&self) -> Result<String>;

    /// Exchanges the refresh credential for a new access token.
    ///
    /// Called at most once per request, after a 401 response.
    async fn refresh(&self) -> Result<String>;
}

/// A fixed token with no refresh path, for development and tests.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }

    async fn refresh(&self) -> Result<String> {
        Err(DbChatError::unauthorized(
            "static credentials cannot be refreshed",
        ))
    }
}
