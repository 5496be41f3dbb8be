//! Message API Client
//!
//! This module provides the HTTP implementation of [`MessageStore`] against
//! the storefront REST API.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;

use super::config::Config;
use super::store::{MessageStore, StoreResult};
use crate::shared::messaging::{
    decode_feed, ApiEnvelope, MarkRead, Message, MessageId, MessageRecord, NewMessage, UserId,
};
use crate::shared::MessagingError;

const FALLBACK_ERROR: &str = "An unexpected error occurred.";

/// HTTP-backed message store
#[derive(Debug, Clone)]
pub struct HttpMessageStore {
    config: Config,
    client: Client,
}

impl HttpMessageStore {
    pub fn new(config: Config) -> Result<Self, MessagingError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| MessagingError::transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.config.api_url(path);
        tracing::debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method, &url)
            .header("Content-Type", "application/json");
        if let Some(token) = self.config.get_token() {
            request = request.header("Authorization", format!("Bearer {}", token));
        }
        request
    }

    async fn execute(&self, request: RequestBuilder) -> StoreResult<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| MessagingError::transport(format!("No response from the server: {}", e)))?;

        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(error_for_status(status, &body))
    }

    async fn fetch_feed(&self, path: &str) -> StoreResult<Vec<MessageRecord>> {
        let response = self.execute(self.request(Method::GET, path)).await?;
        let body: Value = response.json().await?;
        Ok(decode_feed(body))
    }
}

/// Map a non-success response to an error, pulling the server's message out
/// of the body when it has one
pub(crate) fn error_for_status(status: StatusCode, body: &str) -> MessagingError {
    match status {
        StatusCode::UNAUTHORIZED => {
            tracing::warn!("Store rejected the session (401)");
            MessagingError::Unauthorized
        }
        StatusCode::FORBIDDEN => {
            tracing::warn!("Store denied access (403)");
            MessagingError::Forbidden
        }
        _ => MessagingError::server(status.as_u16(), server_message(status, body)),
    }
}

fn server_message(status: StatusCode, body: &str) -> String {
    let from_body = match serde_json::from_str::<Value>(body) {
        Ok(Value::String(text)) => Some(text),
        Ok(Value::Object(map)) => map
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        Ok(_) => None,
        Err(_) => Some(body.trim().to_string()),
    };

    from_body
        .filter(|text| !text.is_empty())
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| FALLBACK_ERROR.to_string())
}

#[async_trait]
impl MessageStore for HttpMessageStore {
    async fn fetch_inbox(&self, current_user: UserId) -> StoreResult<Vec<MessageRecord>> {
        // The API scopes the inbox to the authenticated user
        let records = self.fetch_feed("/messages/inbox").await?;
        tracing::debug!("Fetched {} inbox records for user {}", records.len(), current_user);
        Ok(records)
    }

    async fn fetch_conversation(&self, a: UserId, b: UserId) -> StoreResult<Vec<MessageRecord>> {
        self.fetch_feed(&format!("/messages/{}/{}", a, b)).await
    }

    async fn send_message(&self, message: NewMessage) -> StoreResult<Message> {
        let response = self
            .execute(self.request(Method::POST, "/messages").json(&message))
            .await?;
        let envelope: ApiEnvelope<Message> = response.json().await?;
        let sent = envelope
            .result
            .ok_or_else(|| MessagingError::serialization("Send response has no result"))?;
        tracing::info!(
            "Sent message {} from {} to {}",
            sent.id,
            sent.sender_id,
            sent.receiver_id
        );
        Ok(sent)
    }

    async fn mark_conversation_read(&self, request: MarkRead) -> StoreResult<()> {
        self.execute(self.request(Method::POST, "/messages/mark-read").json(&request))
            .await?;
        Ok(())
    }

    async fn mark_message_read(&self, id: MessageId) -> StoreResult<()> {
        self.execute(self.request(Method::PATCH, &format!("/messages/{}/read", id)))
            .await?;
        Ok(())
    }

    async fn fetch_all_messages(&self) -> StoreResult<Vec<MessageRecord>> {
        self.fetch_feed("/messages").await
    }

    async fn delete_message(&self, id: MessageId) -> StoreResult<()> {
        self.execute(self.request(Method::DELETE, &format!("/admin/message/{}", id)))
            .await?;
        tracing::info!("Deleted message {}", id);
        Ok(())
    }
}
