//! Message Data Structure
//!
//! Two shapes of the same persisted entity:
//!
//! - [`MessageRecord`] is what the store hands back. Feeds are not trusted, so
//!   endpoint ids and usernames are optional and numeric fields accept the
//!   loose encodings the API is known to produce (`"7"` for `7`, `0/1` for
//!   booleans, SQL-style timestamps).
//! - [`Message`] is a record whose two endpoint ids are known. Aggregators that
//!   need a counterpart work on `Message`; moderation keeps raw records.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

/// Participant identifier
pub type UserId = i64;

/// Store-assigned message identifier
pub type MessageId = i64;

/// Stand-in for a missing or unparseable `sent_at`; sorts before everything
pub const UNKNOWN_SENT_AT: DateTime<Utc> = DateTime::<Utc>::UNIX_EPOCH;

/// A message as returned by the store
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MessageRecord {
    pub id: MessageId,
    #[serde(default, deserialize_with = "lenient_id")]
    pub sender_id: Option<UserId>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub receiver_id: Option<UserId>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub content: String,
    /// [`UNKNOWN_SENT_AT`] when the feed had no usable timestamp
    #[serde(default = "unknown_sent_at", deserialize_with = "lenient_record_timestamp")]
    pub sent_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub seen: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_username: Option<String>,
}

impl MessageRecord {
    /// Whether the store sent a parseable `sent_at`
    pub fn has_timestamp(&self) -> bool {
        self.sent_at != UNKNOWN_SENT_AT
    }

    /// Total order within a conversation: `(sent_at, id)`
    pub fn order_key(&self) -> (DateTime<Utc>, MessageId) {
        (self.sent_at, self.id)
    }
}

/// A message with both endpoints resolved
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub content: String,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub sent_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub seen: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_username: Option<String>,
}

impl Message {
    /// Total order within a conversation: `(sent_at, id)`
    pub fn order_key(&self) -> (DateTime<Utc>, MessageId) {
        (self.sent_at, self.id)
    }

    /// Compare two messages chronologically, id breaking timestamp ties
    pub fn chronological(a: &Message, b: &Message) -> Ordering {
        a.order_key().cmp(&b.order_key())
    }

    /// Whether `user` is one of the two endpoints
    pub fn involves(&self, user: UserId) -> bool {
        self.sender_id == user || self.receiver_id == user
    }

    /// The other endpoint, seen from `user`. `None` if `user` is not a participant.
    pub fn counterpart(&self, user: UserId) -> Option<UserId> {
        if self.sender_id == user {
            Some(self.receiver_id)
        } else if self.receiver_id == user {
            Some(self.sender_id)
        } else {
            None
        }
    }

    /// Display name of the other endpoint, seen from `user`
    pub fn counterpart_username(&self, user: UserId) -> Option<&str> {
        if self.sender_id == user {
            self.receiver_username.as_deref()
        } else {
            self.sender_username.as_deref()
        }
    }

    /// Addressed to `user` and not yet read
    pub fn is_unread_for(&self, user: UserId) -> bool {
        self.receiver_id == user && !self.seen
    }

    /// Get a preview of the message (first N characters)
    pub fn preview(&self, max_len: usize) -> String {
        if self.content.chars().count() <= max_len {
            self.content.clone()
        } else {
            let mut preview: String = self.content.chars().take(max_len.saturating_sub(3)).collect();
            preview.push_str("...");
            preview
        }
    }
}

/// A record that cannot be turned into a [`Message`]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("message {id} is missing its {missing}")]
pub struct MalformedRecord {
    pub id: MessageId,
    pub missing: &'static str,
}

impl TryFrom<MessageRecord> for Message {
    type Error = MalformedRecord;

    fn try_from(record: MessageRecord) -> Result<Self, Self::Error> {
        let sender_id = record.sender_id.ok_or(MalformedRecord {
            id: record.id,
            missing: "sender_id",
        })?;
        let receiver_id = record.receiver_id.ok_or(MalformedRecord {
            id: record.id,
            missing: "receiver_id",
        })?;
        Ok(Message {
            id: record.id,
            sender_id,
            receiver_id,
            content: record.content,
            sent_at: record.sent_at,
            seen: record.seen,
            sender_username: record.sender_username,
            receiver_username: record.receiver_username,
        })
    }
}

impl From<Message> for MessageRecord {
    fn from(message: Message) -> Self {
        MessageRecord {
            id: message.id,
            sender_id: Some(message.sender_id),
            receiver_id: Some(message.receiver_id),
            content: message.content,
            sent_at: message.sent_at,
            seen: message.seen,
            sender_username: message.sender_username,
            receiver_username: message.receiver_username,
        }
    }
}

/// Request to send a message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub content: String,
}

/// Request to mark every message from `other_user_id` to `user_id` as read
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MarkRead {
    pub user_id: UserId,
    pub other_user_id: UserId,
}

/// `{ "result": ... }` wrapper used by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub result: Option<T>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseId {
    Int(i64),
    Float(f64),
    Text(String),
}

/// Integer ids, numeric strings, or nothing. Anything else is treated as absent.
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<UserId>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let parsed = raw.and_then(|value| match serde_json::from_value::<LooseId>(value) {
        Ok(LooseId::Int(id)) => Some(id),
        Ok(LooseId::Float(f)) if f.fract() == 0.0 => Some(f as i64),
        Ok(LooseId::Text(text)) => text.trim().parse().ok(),
        _ => None,
    });
    Ok(parsed.filter(|id| *id > 0))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(serde_json::Value::Bool(b)) => b,
        Some(serde_json::Value::Number(n)) => n.as_i64().map(|v| v != 0).unwrap_or(false),
        Some(serde_json::Value::String(s)) => matches!(s.as_str(), "1" | "true"),
        _ => false,
    })
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
}

fn unknown_sent_at() -> DateTime<Utc> {
    UNKNOWN_SENT_AT
}

/// Like `lenient_timestamp`, but a record is never rejected for its timestamp
fn lenient_record_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let parsed = match &raw {
        Some(serde_json::Value::String(text)) => parse_timestamp(text),
        _ => None,
    };
    Ok(parsed.unwrap_or_else(|| {
        tracing::debug!("Unusable sent_at {:?}, keeping record with unknown time", raw);
        UNKNOWN_SENT_AT
    }))
}

/// RFC 3339, or a naive `YYYY-MM-DD HH:MM:SS[.fff]` taken as UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
