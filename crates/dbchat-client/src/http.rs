//! Authenticated HTTP client.
//!
//! One explicit client instance per backend, built from a
//! [`ClientConfig`], never a process-wide singleton. Every request
//! carries a bearer token; a 401 triggers exactly one credential
//! refresh-and-retry before the failure is surfaced as `Unauthorized`.

use crate::auth::TokenProvider;
use dbchat_core::{ClientConfig, DbChatError, Result};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

pub struct ApiClient {
    http: Client,
    base_url: String,
    tokens: Arc<dyn TokenProvider>,
}

impl ApiClient {
    /// Builds a client for the configured backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|err| DbChatError::internal(format!("failed to build http client: {err}")))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tokens,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a request with the current access token, retrying once with a
    /// refreshed token if the backend answers 401.
    pub(crate) async fn request<F>(
        &self,
        method: Method,
        path: &str,
        customize: F,
    ) -> Result<Response>
    where
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        let token = self.tokens.access_token().await?;
        let response = self.send_once(&method, path, &customize, &token).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        tracing::debug!(path, "request unauthorized, refreshing credentials");
        let token = self.tokens.refresh().await?;
        let response = self.send_once(&method, path, &customize, &token).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Err(DbChatError::unauthorized(
                "request rejected after credential refresh",
            ));
        }
        Ok(response)
    }

    async fn send_once<F>(
        &self,
        method: &Method,
        path: &str,
        customize: &F,
        token: &str,
    ) -> Result<Response>
    where
        F: Fn(RequestBuilder) -> RequestBuilder,
    {
        let builder = self
            .http
            .request(method.clone(), self.url(path))
            .bearer_auth(token);
        customize(builder)
            .send()
            .await
            .map_err(|err| DbChatError::transport(format!("{method} {path}: {err}")))
    }

    /// Rejects non-success responses, turning 404 into a typed `NotFound`
    /// and everything else into a transport failure with the body text.
    pub(crate) async fn ensure_ok(
        response: Response,
        entity_type: &'static str,
        id: impl Into<String>,
    ) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::NOT_FOUND {
            return Err(DbChatError::not_found(entity_type, id));
        }
        let body = response.text().await.unwrap_or_default();
        Err(DbChatError::transport(format!(
            "unexpected status {status}: {body}"
        )))
    }

    /// Decodes a JSON response body.
    pub(crate) async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let body = response
            .text()
            .await
            .map_err(|err| DbChatError::transport(format!("failed to read body: {err}")))?;
        Ok(serde_json::from_str(&body)?)
    }
}
