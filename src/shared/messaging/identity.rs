//! Conversation Identity
//!
//! A conversation is the unordered pair of its two participants. The key is
//! built from participant ids whenever both are known; records that lost an
//! endpoint id fall back to their username labels so moderation can still
//! group (and delete) them.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::message::{MessageRecord, UserId};

/// Label used when a record carries no sender name
pub const UNKNOWN_SENDER: &str = "[Unknown Sender]";

/// Label used when a record carries no receiver name
pub const UNKNOWN_RECEIVER: &str = "[Unknown Receiver]";

/// Canonical, order-independent identifier of a two-party conversation
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationKey {
    /// Both participant ids are known; stored as `(low, high)`
    Participants(UserId, UserId),
    /// Fallback on display names; stored in lexical order
    Labels(String, String),
}

/// Key for the conversation between `a` and `b`, whichever order they come in
pub fn conversation_key(a: UserId, b: UserId) -> ConversationKey {
    if a <= b {
        ConversationKey::Participants(a, b)
    } else {
        ConversationKey::Participants(b, a)
    }
}

impl ConversationKey {
    /// Key for two display labels, whichever order they come in
    pub fn from_labels(a: impl Into<String>, b: impl Into<String>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            ConversationKey::Labels(a, b)
        } else {
            ConversationKey::Labels(b, a)
        }
    }

    /// Ids when both endpoints are present, username labels otherwise
    pub fn for_record(record: &MessageRecord) -> Self {
        match (record.sender_id, record.receiver_id) {
            (Some(sender), Some(receiver)) => conversation_key(sender, receiver),
            _ => Self::from_labels(sender_label(record), receiver_label(record)),
        }
    }

    /// The participant that is not `user`, for id keys that contain `user`
    pub fn counterpart(&self, user: UserId) -> Option<UserId> {
        match self {
            ConversationKey::Participants(lo, hi) if *lo == user => Some(*hi),
            ConversationKey::Participants(lo, hi) if *hi == user => Some(*lo),
            _ => None,
        }
    }

    /// Whether this key was derived from ids
    pub fn is_resolved(&self) -> bool {
        matches!(self, ConversationKey::Participants(..))
    }
}

impl fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversationKey::Participants(lo, hi) => write!(f, "{}:{}", lo, hi),
            ConversationKey::Labels(lo, hi) => write!(f, "{} ↔ {}", lo, hi),
        }
    }
}

/// Sender display name, or the unknown-sender placeholder
pub fn sender_label(record: &MessageRecord) -> &str {
    record
        .sender_username
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(UNKNOWN_SENDER)
}

/// Receiver display name, or the unknown-receiver placeholder
pub fn receiver_label(record: &MessageRecord) -> &str {
    record
        .receiver_username
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(UNKNOWN_RECEIVER)
}
