//! Conversation Thread
//!
//! Turns the two-party feed into the list a thread renders: malformed and
//! duplicate records removed, oldest first, each message tagged with its
//! direction relative to the viewer.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::message::{Message, MessageRecord, UserId};

/// Direction of a message relative to the viewer. Display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Outgoing,
    Incoming,
}

/// A message positioned in a thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub message: Message,
    pub direction: Direction,
}

impl ThreadMessage {
    pub fn is_outgoing(&self) -> bool {
        self.direction == Direction::Outgoing
    }

    /// "You" for outgoing messages, otherwise the sender's name or id
    pub fn sender_label(&self) -> String {
        match self.direction {
            Direction::Outgoing => "You".to_string(),
            Direction::Incoming => self
                .message
                .sender_username
                .clone()
                .unwrap_or_else(|| format!("User {}", self.message.sender_id)),
        }
    }
}

/// Order and classify a thread feed for `current_user`
pub fn build_thread<I>(records: I, current_user: UserId) -> Vec<ThreadMessage>
where
    I: IntoIterator<Item = MessageRecord>,
{
    let mut seen_ids = HashSet::new();
    let mut messages: Vec<Message> = records
        .into_iter()
        .filter_map(|record| match Message::try_from(record) {
            Ok(message) => Some(message),
            Err(e) => {
                tracing::warn!("Skipping malformed thread record: {}", e);
                None
            }
        })
        .filter(|message| {
            let fresh = seen_ids.insert(message.id);
            if !fresh {
                tracing::debug!("Dropping duplicate message {}", message.id);
            }
            fresh
        })
        .collect();

    messages.sort_by(Message::chronological);

    messages
        .into_iter()
        .map(|message| {
            let direction = if message.sender_id == current_user {
                Direction::Outgoing
            } else {
                Direction::Incoming
            };
            ThreadMessage { message, direction }
        })
        .collect()
}
