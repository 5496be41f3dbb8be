//! Mock server helpers for integration tests
//!
//! Wraps a `wiremock` server and an `HttpMessageStore` pointed at it.

use courier::client::{Config, HttpMessageStore};
use courier::shared::messaging::MessageRecord;
use courier::shared::AppConfig;
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::MockServer;

/// Base path the store is configured with
pub const API_PREFIX: &str = "/api/v1";

/// Token configured by [`MockStore::start_with_token`]
pub const TEST_TOKEN: &str = "test-token";

/// A mock API and a store talking to it
pub struct MockStore {
    pub server: MockServer,
    pub store: HttpMessageStore,
}

impl MockStore {
    /// Start without a bearer token
    pub async fn start() -> Self {
        Self::build(None).await
    }

    /// Start with [`TEST_TOKEN`] configured
    pub async fn start_with_token() -> Self {
        Self::build(Some(TEST_TOKEN)).await
    }

    async fn build(token: Option<&str>) -> Self {
        let server = MockServer::start().await;
        let mut builder = AppConfig::builder()
            .server_url(format!("{}{}", server.uri(), API_PREFIX))
            .request_timeout(Duration::from_secs(2));
        if let Some(token) = token {
            builder = builder.api_token(token);
        }
        let config = Config::with_builder(builder).unwrap();
        let store = HttpMessageStore::new(config).unwrap();
        Self { server, store }
    }

    /// Full mock path for an API path
    pub fn path(api_path: &str) -> String {
        format!("{}{}", API_PREFIX, api_path)
    }
}

/// `{ "result": [...] }` body for a feed
pub fn feed_body(records: &[MessageRecord]) -> Value {
    json!({ "result": records })
}
