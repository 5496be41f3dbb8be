//! HTTP store tests
//!
//! Endpoint paths, headers, envelope handling and status mapping of
//! `HttpMessageStore`, checked against a wiremock server.

use crate::common::*;
use crate::{assert_err, assert_ok};
use courier::client::{Config, HttpMessageStore, MessageStore};
use courier::shared::messaging::{MarkRead, NewMessage};
use courier::shared::{AppConfig, MessagingError};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_fetch_inbox_sends_bearer_token() {
    init_tracing();
    let mock = MockStore::start_with_token().await;
    let records = vec![record(1, 2, 1, "hi", 0), record(2, 1, 2, "yo", 5)];

    Mock::given(method("GET"))
        .and(path(MockStore::path("/messages/inbox")))
        .and(header("Authorization", format!("Bearer {}", TEST_TOKEN).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(feed_body(&records)))
        .expect(1)
        .mount(&mock.server)
        .await;

    let fetched = assert_ok!(mock.store.fetch_inbox(1).await);
    assert_eq!(fetched, records);
}

#[tokio::test]
async fn test_no_authorization_header_without_token() {
    let mock = MockStore::start().await;
    Mock::given(method("GET"))
        .and(path(MockStore::path("/messages")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": [] })))
        .mount(&mock.server)
        .await;

    assert_ok!(mock.store.fetch_all_messages().await);

    let requests = mock.server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_fetch_conversation_tolerates_malformed_entries() {
    let mock = MockStore::start().await;
    Mock::given(method("GET"))
        .and(path(MockStore::path("/messages/1/2")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": [
                { "id": 1, "sender_id": 1, "receiver_id": 2, "content": "hi",
                  "sent_at": "2024-03-01 12:00:00", "seen": 0 },
                null,
                { "id": "oops" },
                { "id": 3, "sender_id": "2", "receiver_id": null, "content": null,
                  "sent_at": "2024-03-01T12:00:05Z", "seen": 1 }
            ]
        })))
        .mount(&mock.server)
        .await;

    let fetched = assert_ok!(mock.store.fetch_conversation(1, 2).await);

    assert_eq!(fetched.len(), 2);
    assert_eq!(fetched[0].sent_at, at(0));
    assert!(!fetched[0].seen);
    assert_eq!(fetched[1].sender_id, Some(2));
    assert_eq!(fetched[1].receiver_id, None);
    assert_eq!(fetched[1].content, "");
    assert!(fetched[1].seen);
}

#[tokio::test]
async fn test_admin_feed_accepts_single_object() {
    let mock = MockStore::start().await;
    Mock::given(method("GET"))
        .and(path(MockStore::path("/messages")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "result": record(9, 1, 2, "only", 0) })),
        )
        .mount(&mock.server)
        .await;

    let fetched = assert_ok!(mock.store.fetch_all_messages().await);
    assert_eq!(fetched, vec![record(9, 1, 2, "only", 0)]);
}

#[tokio::test]
async fn test_send_message_posts_camel_case_body() {
    let mock = MockStore::start_with_token().await;
    Mock::given(method("POST"))
        .and(path(MockStore::path("/messages")))
        .and(body_json(json!({ "senderId": 1, "receiverId": 2, "content": "hello" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "result": { "id": 10, "sender_id": 1, "receiver_id": 2, "content": "hello",
                        "sent_at": "2024-03-01T12:00:00Z", "seen": false }
        })))
        .expect(1)
        .mount(&mock.server)
        .await;

    let sent = assert_ok!(
        mock.store
            .send_message(NewMessage {
                sender_id: 1,
                receiver_id: 2,
                content: "hello".to_string(),
            })
            .await
    );

    assert_eq!(sent.id, 10);
    assert_eq!(sent.content, "hello");
    assert_eq!(sent.sent_at, at(0));
}

#[tokio::test]
async fn test_send_without_result_is_serialization_error() {
    let mock = MockStore::start().await;
    Mock::given(method("POST"))
        .and(path(MockStore::path("/messages")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&mock.server)
        .await;

    let result = mock
        .store
        .send_message(NewMessage {
            sender_id: 1,
            receiver_id: 2,
            content: "hello".to_string(),
        })
        .await;
    assert_err!(result, MessagingError::Serialization { .. });
}

#[tokio::test]
async fn test_mark_read_endpoints() {
    let mock = MockStore::start().await;
    Mock::given(method("POST"))
        .and(path(MockStore::path("/messages/mark-read")))
        .and(body_json(json!({ "userId": 1, "otherUserId": 2 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": 3 })))
        .expect(2)
        .mount(&mock.server)
        .await;
    Mock::given(method("PATCH"))
        .and(path(MockStore::path("/messages/7/read")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&mock.server)
        .await;

    let request = MarkRead {
        user_id: 1,
        other_user_id: 2,
    };
    assert_ok!(mock.store.mark_conversation_read(request).await);
    assert_ok!(mock.store.mark_conversation_read(request).await);
    assert_ok!(mock.store.mark_message_read(7).await);
}

#[tokio::test]
async fn test_delete_message_endpoint() {
    let mock = MockStore::start_with_token().await;
    Mock::given(method("DELETE"))
        .and(path(MockStore::path("/admin/message/7")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock.server)
        .await;

    assert_ok!(mock.store.delete_message(7).await);
}

#[tokio::test]
async fn test_status_mapping() {
    let mock = MockStore::start().await;
    Mock::given(method("GET"))
        .and(path(MockStore::path("/messages/inbox")))
        .respond_with(ResponseTemplate::new(401))
        .mount(&mock.server)
        .await;
    Mock::given(method("GET"))
        .and(path(MockStore::path("/messages")))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(MockStore::path("/admin/message/5")))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "message": "Database unavailable" })),
        )
        .mount(&mock.server)
        .await;

    assert_err!(mock.store.fetch_inbox(1).await, MessagingError::Unauthorized);
    assert_err!(mock.store.fetch_all_messages().await, MessagingError::Forbidden);

    let error = mock.store.delete_message(5).await.unwrap_err();
    assert_eq!(error, MessagingError::server(500, "Database unavailable"));
    assert!(error.is_retryable());
}

#[tokio::test]
async fn test_unreachable_server_is_transport_error() {
    let config = Config::with_builder(
        AppConfig::builder()
            .server_url("http://127.0.0.1:1/api/v1")
            .request_timeout(std::time::Duration::from_secs(1)),
    )
    .unwrap();
    let store = HttpMessageStore::new(config).unwrap();

    let error = store.fetch_inbox(1).await.unwrap_err();
    assert!(matches!(error, MessagingError::Transport { .. }), "got {:?}", error);
    assert!(error.is_retryable());
}
