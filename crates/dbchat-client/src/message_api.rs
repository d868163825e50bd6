//! HTTP implementation of the paged message-data service.

use crate::dto::ResultPageDto;
use crate::http::ApiClient;
use async_trait::async_trait;
use dbchat_core::Result;
use dbchat_core::service::MessageDataService;
use dbchat_core::session::ResultPage;
use reqwest::Method;
use std::sync::Arc;
use uuid::Uuid;

pub struct HttpMessageDataService {
    client: Arc<ApiClient>,
}

impl HttpMessageDataService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl MessageDataService for HttpMessageDataService {
    async fn fetch(&self, message_id: Uuid, page: u32, page_size: u32) -> Result<ResultPage> {
        let response = self
            .client
            .request(Method::GET, &format!("/message/{message_id}/data"), |b| {
                b.query(&[
                    ("page", page.to_string()),
                    ("pageSize", page_size.to_string()),
                ])
            })
            .await?;
        let response = ApiClient::ensure_ok(response, "Message", message_id.to_string()).await?;
        let page: ResultPageDto = ApiClient::decode(response).await?;
        Ok(page.into())
    }
}
