//! Message fixtures
//!
//! Builders for the records the store hands back, including the malformed
//! shapes real feeds contain.

use chrono::{DateTime, TimeZone, Utc};
use courier::client::InMemoryMessageStore;
use courier::shared::messaging::{MessageId, MessageRecord, UserId};

/// `2024-03-01 12:00:00 UTC` plus `secs`
pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap() + chrono::Duration::seconds(secs)
}

/// A well-formed record without usernames
pub fn record(id: MessageId, from: UserId, to: UserId, content: &str, secs: i64) -> MessageRecord {
    MessageRecord {
        id,
        sender_id: Some(from),
        receiver_id: Some(to),
        content: content.to_string(),
        sent_at: at(secs),
        seen: false,
        sender_username: None,
        receiver_username: None,
    }
}

/// A record with both usernames filled in
pub fn named_record(
    id: MessageId,
    (from, from_name): (UserId, &str),
    (to, to_name): (UserId, &str),
    content: &str,
    secs: i64,
) -> MessageRecord {
    MessageRecord {
        sender_username: Some(from_name.to_string()),
        receiver_username: Some(to_name.to_string()),
        ..record(id, from, to, content, secs)
    }
}

/// A record whose receiver id was lost upstream
pub fn orphaned_record(id: MessageId, from: UserId, content: &str, secs: i64) -> MessageRecord {
    MessageRecord {
        receiver_id: None,
        ..record(id, from, 0, content, secs)
    }
}

/// Store seeded with `records` as-is
pub async fn store_with(records: Vec<MessageRecord>) -> InMemoryMessageStore {
    let store = InMemoryMessageStore::new();
    for record in records {
        store.insert(record).await;
    }
    store
}
